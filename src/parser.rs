/*!
Recursive‑descent parser producing the owned [`ast`](crate::ast) consumed by the
resolver and the interpreter.

### Cost

Every token is consumed once via `advance()`, so a parse is **Θ(n)** in the
number of tokens. Error recovery (`synchronize`) only discards tokens up to the
next statement boundary.

### Logging Policy

| Location                     | Level  | Purpose                                   |
|------------------------------|--------|-------------------------------------------|
| `Parser::new`, `parse`       | `info` | Lifecycle milestones.                     |
| `declaration`                | `debug`| High‑level descent into grammar branches. |

--------------------------------------------------------------------------------
Grammar (EBNF)
--------------

```text
program        → declaration* EOF ;
declaration    → classDecl | funDecl | varDecl | statement ;
classDecl      → "class" IDENT ( "<" IDENT )? "{" function* "}" ;
funDecl        → "fun" function ;
function       → IDENT "(" parameters? ")" block ;
varDecl        → "var" IDENT ( "=" expression )? ";" ;
statement      → exprStmt | forStmt | ifStmt | printStmt | returnStmt
               | whileStmt | breakStmt | block ;
forStmt        → "for" "(" ( varDecl | exprStmt | ";" )
                 expression? ";" expression? ")" statement ;
breakStmt      → "break" ";" ;
block          → "{" declaration* "}" ;
expression     → comma ;
comma          → assignment ( "," assignment )* ;
assignment     → ( call "." )? IDENT "=" assignment | conditional ;
conditional    → logic_or ( "?" expression ":" conditional )? ;
logic_or       → logic_and ( "or" logic_and )* ;
logic_and      → equality  ( "and" equality )* ;
equality       → comparison ( ( "!=" | "==" ) comparison )* ;
comparison     → term ( ( ">" | ">=" | "<" | "<=" ) term )* ;
term           → factor ( ( "-" | "+" ) factor )* ;
factor         → unary ( ( "/" | "*" ) unary )* ;
unary          → ( "!" | "-" ) unary | call ;
call           → primary ( "(" arguments? ")" | "." IDENT )* ;
arguments      → assignment ( "," assignment )* ;
primary        → NUMBER | STRING | "true" | "false" | "nil" | "this"
               | IDENT | "(" expression ")" | "super" "." IDENT ;
```

`for` loops are lowered here to `{ init; while (cond) { body; incr; } }`.
*/

use std::rc::Rc;

use crate::ast::{
    BinaryOp, ClassDecl, Expr, ExprIds, FunctionDecl, Ident, LiteralValue, LogicalOp, Stmt,
    UnaryOp, VariableRef,
};
use crate::error::{LoxError, Result};
use crate::token::{Token, TokenType};

use log::{debug, info};

const MAX_ARITY: usize = 255;

/// Top‑level parser over an immutable slice of tokens.
pub struct Parser<'a, 'ids> {
    tokens: &'a [Token<'a>],
    current: usize,
    ids: &'ids mut ExprIds,
    /// Number of `?` whose `:` has not been reached yet.
    open_conditionals: usize,
    /// Errors that do not require resynchronisation.
    errors: Vec<LoxError>,
}

impl<'a, 'ids> Parser<'a, 'ids> {
    /// Construct a new parser. `tokens` must end with an `EOF` token.
    pub fn new(tokens: &'a [Token<'a>], ids: &'ids mut ExprIds) -> Self {
        info!("Parser created with {} tokens", tokens.len());

        Self {
            tokens,
            current: 0,
            ids,
            open_conditionals: 0,
            errors: Vec::new(),
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse an entire program. Every syntax error is collected; the parser
    /// resynchronises after each one, so the statement list is best effort.
    pub fn parse(mut self) -> (Vec<Stmt>, Vec<LoxError>) {
        info!("Beginning parse phase");

        let mut statements: Vec<Stmt> = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        info!(
            "Parsed {} statement(s) with {} error(s)",
            statements.len(),
            self.errors.len()
        );

        (statements, self.errors)
    }

    // ──────────────────────── declaration rules ───────────────────

    fn declaration(&mut self) -> Option<Stmt> {
        debug!("Entering declaration at line {}", self.peek().line);

        let result = if self.matches(TokenType::CLASS) {
            self.class_declaration()
        } else if self.matches(TokenType::FUN) {
            self.function("function").map(Stmt::Function)
        } else if self.matches(TokenType::VAR) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(e) => {
                self.errors.push(e);
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self) -> Result<Stmt> {
        let name = self.consume_ident("Expected class name.")?;

        let superclass = if self.matches(TokenType::LESS) {
            let name = self.consume_ident("Expected superclass name.")?;
            Some(VariableRef {
                id: self.ids.fresh(),
                name,
            })
        } else {
            None
        };

        self.consume(TokenType::LEFT_BRACE, "Expected '{' before class body.")?;

        let mut methods: Vec<Rc<FunctionDecl>> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            methods.push(self.function("method")?);
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after class body.")?;

        Ok(Stmt::Class(ClassDecl {
            name,
            superclass,
            methods,
        }))
    }

    fn function(&mut self, kind: &str) -> Result<Rc<FunctionDecl>> {
        let name = self.consume_ident(&format!("Expected {} name.", kind))?;

        self.consume(
            TokenType::LEFT_PAREN,
            &format!("Expected '(' after {} name.", kind),
        )?;

        let mut params: Vec<Ident> = Vec::new();
        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if params.len() >= MAX_ARITY {
                    let err = self.error_at(
                        self.peek(),
                        format!("Can't have more than {} parameters.", MAX_ARITY),
                    );
                    self.errors.push(err);
                }

                params.push(self.consume_ident("Expected parameter name.")?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after parameters.")?;

        self.consume(
            TokenType::LEFT_BRACE,
            &format!("Expected '{{' before {} body.", kind),
        )?;
        let body = self.block()?;

        Ok(Rc::new(FunctionDecl { name, params, body }))
    }

    fn var_declaration(&mut self) -> Result<Stmt> {
        let name = self.consume_ident("Expected variable name.")?;

        let initializer: Option<Expr> = if self.matches(TokenType::EQUAL) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            TokenType::SEMICOLON,
            "Expected ';' after variable declaration.",
        )?;

        Ok(Stmt::Var { name, initializer })
    }

    // ───────────────────────── statement rules ────────────────────

    fn statement(&mut self) -> Result<Stmt> {
        if self.matches(TokenType::FOR) {
            self.for_statement()
        } else if self.matches(TokenType::IF) {
            self.if_statement()
        } else if self.matches(TokenType::WHILE) {
            self.while_statement()
        } else if self.matches(TokenType::RETURN) {
            self.return_statement()
        } else if self.matches(TokenType::BREAK) {
            self.break_statement()
        } else if self.matches(TokenType::LEFT_BRACE) {
            Ok(Stmt::Block(self.block()?))
        } else if self.matches(TokenType::PRINT) {
            self.print_statement()
        } else {
            self.expression_statement()
        }
    }

    fn for_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'for'.")?;

        let initializer = if self.matches(TokenType::SEMICOLON) {
            None
        } else if self.matches(TokenType::VAR) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(TokenType::SEMICOLON) {
            self.expression()?
        } else {
            Expr::Literal(LiteralValue::True)
        };
        self.consume(TokenType::SEMICOLON, "Expected ';' after loop condition.")?;

        let increment = if !self.check(TokenType::RIGHT_PAREN) {
            Some(self.expression()?)
        } else {
            None
        };
        let paren = self.consume(TokenType::RIGHT_PAREN, "Expected ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![
                body,
                Stmt::Expression {
                    expr: increment,
                    line: paren.line,
                },
            ]);
        }

        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        let expr = self.expression()?;
        let semicolon = self.consume(TokenType::SEMICOLON, "Expected ';' after value.")?;
        Ok(Stmt::Print {
            expr,
            line: semicolon.line,
        })
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let expr = self.expression()?;
        let semicolon = self.consume(TokenType::SEMICOLON, "Expected ';' after expression.")?;
        Ok(Stmt::Expression {
            expr,
            line: semicolon.line,
        })
    }

    fn if_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.matches(TokenType::ELSE) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenType::LEFT_PAREN, "Expected '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenType::RIGHT_PAREN, "Expected ')' after condition.")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    fn return_statement(&mut self) -> Result<Stmt> {
        let line = self.previous().line;
        let value = if !self.check(TokenType::SEMICOLON) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::SEMICOLON, "Expected ';' after return value.")?;
        Ok(Stmt::Return { line, value })
    }

    fn break_statement(&mut self) -> Result<Stmt> {
        let line = self.previous().line;
        self.consume(TokenType::SEMICOLON, "Expected ';' after 'break'.")?;
        Ok(Stmt::Break { line })
    }

    fn block(&mut self) -> Result<Vec<Stmt>> {
        let mut statements: Vec<Stmt> = Vec::new();

        while !self.check(TokenType::RIGHT_BRACE) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(TokenType::RIGHT_BRACE, "Expected '}' after block.")?;
        Ok(statements)
    }

    // ─────────────────────── expression rules ─────────────────────

    fn expression(&mut self) -> Result<Expr> {
        self.comma()
    }

    fn comma(&mut self) -> Result<Expr> {
        let mut expr = self.assignment()?;

        while self.matches(TokenType::COMMA) {
            let line = self.previous().line;
            let right = self.assignment()?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator: BinaryOp::Comma,
                line,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn assignment(&mut self) -> Result<Expr> {
        let expr = self.conditional()?;

        if self.matches(TokenType::EQUAL) {
            let equals = self.previous();
            let value = Box::new(self.assignment()?);

            match expr {
                Expr::Variable(target) => return Ok(Expr::Assign { target, value }),

                Expr::Get { object, name } => return Ok(Expr::Set { object, name, value }),

                // Reported, but the parser is not confused: no need to synchronize.
                _ => {
                    let err = self.error_at(equals, "Invalid assignment target.");
                    self.errors.push(err);
                }
            }
        }

        Ok(expr)
    }

    fn conditional(&mut self) -> Result<Expr> {
        let expr = self.logical_or()?;

        if self.matches(TokenType::QUESTION) {
            self.open_conditionals += 1;
            let then_branch = self.expression();
            self.open_conditionals -= 1;
            let then_branch = then_branch?;

            self.consume(
                TokenType::COLON,
                "Expected ':' after then branch of conditional expression.",
            )?;

            let else_branch = self.conditional()?;

            // A `:` here belongs to an enclosing `?` unless none is open.
            if self.open_conditionals == 0 && self.check(TokenType::COLON) {
                return Err(self.error_at(
                    self.peek(),
                    "Expected only one ':' in a conditional expression.",
                ));
            }

            return Ok(Expr::Ternary {
                condition: Box::new(expr),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            });
        }

        Ok(expr)
    }

    fn logical_or(&mut self) -> Result<Expr> {
        let mut expr = self.logical_and()?;

        while self.matches(TokenType::OR) {
            let right = self.logical_and()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator: LogicalOp::Or,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr> {
        let mut expr = self.equality()?;

        while self.matches(TokenType::AND) {
            let right = self.equality()?;

            expr = Expr::Logical {
                left: Box::new(expr),
                operator: LogicalOp::And,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    /// Shared loop of every left‑associative binary precedence level.
    fn binary_level(
        &mut self,
        operators: &[TokenType],
        operand: fn(&mut Self) -> Result<Expr>,
    ) -> Result<Expr> {
        let mut expr = operand(self)?;

        while operators.iter().any(|tt| self.check(tt.clone())) {
            let token = self.advance();
            let operator = binary_operator(&token.token_type);
            let right = operand(self)?;

            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                line: token.line,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr> {
        self.binary_level(
            &[TokenType::BANG_EQUAL, TokenType::EQUAL_EQUAL],
            Self::comparison,
        )
    }

    fn comparison(&mut self) -> Result<Expr> {
        self.binary_level(
            &[
                TokenType::GREATER,
                TokenType::GREATER_EQUAL,
                TokenType::LESS,
                TokenType::LESS_EQUAL,
            ],
            Self::term,
        )
    }

    fn term(&mut self) -> Result<Expr> {
        self.binary_level(&[TokenType::MINUS, TokenType::PLUS], Self::factor)
    }

    fn factor(&mut self) -> Result<Expr> {
        self.binary_level(&[TokenType::STAR, TokenType::SLASH], Self::unary)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.matches(TokenType::BANG) || self.matches(TokenType::MINUS) {
            let token = self.previous();
            let operator = match token.token_type {
                TokenType::BANG => UnaryOp::Not,
                _ => UnaryOp::Negate,
            };
            let right = self.unary()?;

            return Ok(Expr::Unary {
                operator,
                line: token.line,
                right: Box::new(right),
            });
        }

        self.call()
    }

    fn call(&mut self) -> Result<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.matches(TokenType::LEFT_PAREN) {
                expr = self.finish_call(expr)?;
            } else if self.matches(TokenType::DOT) {
                let name = self.consume_ident("Expected property name after '.'.")?;

                expr = Expr::Get {
                    object: Box::new(expr),
                    name,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr> {
        let mut arguments: Vec<Expr> = Vec::new();

        if !self.check(TokenType::RIGHT_PAREN) {
            loop {
                if arguments.len() >= MAX_ARITY {
                    let err = self.error_at(
                        self.peek(),
                        format!("Can't have more than {} arguments.", MAX_ARITY),
                    );
                    self.errors.push(err);
                }

                arguments.push(self.enclosed(Self::assignment)?);

                if !self.matches(TokenType::COMMA) {
                    break;
                }
            }
        }

        let paren = self.consume(TokenType::RIGHT_PAREN, "Expected ')' after arguments.")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren_line: paren.line,
            arguments,
        })
    }

    fn primary(&mut self) -> Result<Expr> {
        if self.matches(TokenType::FALSE) {
            return Ok(Expr::Literal(LiteralValue::False));
        }
        if self.matches(TokenType::TRUE) {
            return Ok(Expr::Literal(LiteralValue::True));
        }
        if self.matches(TokenType::NIL) {
            return Ok(Expr::Literal(LiteralValue::Nil));
        }

        match &self.peek().token_type {
            TokenType::NUMBER(n) => {
                let n = *n;
                self.advance();
                return Ok(Expr::Literal(LiteralValue::Number(n)));
            }
            TokenType::STRING(s) => {
                let s = s.clone();
                self.advance();
                return Ok(Expr::Literal(LiteralValue::Str(s)));
            }
            _ => {}
        }

        if self.matches(TokenType::THIS) {
            let keyword = self.previous();
            return Ok(Expr::This(VariableRef {
                id: self.ids.fresh(),
                name: Ident::new("this", keyword.line),
            }));
        }

        if self.matches(TokenType::SUPER) {
            let keyword = self.previous();
            self.consume(TokenType::DOT, "Expected '.' after 'super'.")?;
            let method = self.consume_ident("Expected superclass method name.")?;

            return Ok(Expr::Super {
                keyword: VariableRef {
                    id: self.ids.fresh(),
                    name: Ident::new("super", keyword.line),
                },
                method,
            });
        }

        if self.matches(TokenType::IDENTIFIER) {
            let name = self.previous();
            return Ok(Expr::Variable(VariableRef {
                id: self.ids.fresh(),
                name: Ident::new(name.lexeme, name.line),
            }));
        }

        if self.matches(TokenType::LEFT_PAREN) {
            let expr = self.enclosed(Self::expression)?;
            self.consume(TokenType::RIGHT_PAREN, "Expected ')' after expression.")?;
            return Ok(Expr::Grouping(Box::new(expr)));
        }

        self.error_production()
    }

    /// Parses a bracketed sub-expression, where no outer `?` can claim a `:`.
    fn enclosed(&mut self, rule: fn(&mut Self) -> Result<Expr>) -> Result<Expr> {
        let open = std::mem::take(&mut self.open_conditionals);
        let expr = rule(self);
        self.open_conditionals = open;
        expr
    }

    /// Nothing matched `primary`. A binary operator here is missing its left
    /// operand; its right operand is parsed and dropped before reporting.
    fn error_production(&mut self) -> Result<Expr> {
        if self.is_at_end() {
            return Err(self.error_at(self.peek(), "Expected expression."));
        }

        let token = self.peek();

        match token.token_type {
            TokenType::COMMA
            | TokenType::BANG_EQUAL
            | TokenType::EQUAL_EQUAL
            | TokenType::GREATER
            | TokenType::GREATER_EQUAL
            | TokenType::LESS
            | TokenType::LESS_EQUAL
            | TokenType::PLUS
            | TokenType::SLASH
            | TokenType::STAR => {
                self.advance();
                // Consume the would-be right operand so recovery resumes after it;
                // only the missing left operand is reported.
                let _ = self.expression();
                Err(self.error_at(token, "Binary operator expected a left-hand operand."))
            }
            _ => Err(self.error_at(token, "Expected expression.")),
        }
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn matches(&mut self, ttype: TokenType) -> bool {
        if self.check(ttype) {
            self.advance();

            return true;
        }

        false
    }

    #[inline(always)]
    fn consume(&mut self, ttype: TokenType, message: &str) -> Result<&'a Token<'a>> {
        if self.check(ttype) {
            return Ok(self.advance());
        }

        Err(self.error_at(self.peek(), message))
    }

    fn consume_ident(&mut self, message: &str) -> Result<Ident> {
        let token = self.consume(TokenType::IDENTIFIER, message)?;
        Ok(Ident::new(token.lexeme, token.line))
    }

    #[inline(always)]
    fn check(&self, ttype: TokenType) -> bool {
        if self.is_at_end() {
            return false;
        }

        self.peek().token_type == ttype
    }

    #[inline(always)]
    fn advance(&mut self) -> &'a Token<'a> {
        if !self.is_at_end() {
            self.current += 1;
        }

        self.previous()
    }

    #[inline(always)]
    fn is_at_end(&self) -> bool {
        matches!(self.peek().token_type, TokenType::EOF)
    }

    #[inline(always)]
    fn peek(&self) -> &'a Token<'a> {
        &self.tokens[self.current]
    }

    #[inline(always)]
    fn previous(&self) -> &'a Token<'a> {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn error_at(&self, token: &Token<'_>, message: impl Into<String>) -> LoxError {
        let lexeme = match token.token_type {
            TokenType::EOF => None,
            _ => Some(token.lexeme),
        };

        LoxError::parse(token.line, lexeme, message)
    }

    /// Discards tokens until it thinks it is at a statement boundary.
    fn synchronize(&mut self) {
        self.advance(); // skip the token that caused the error

        while !self.is_at_end() {
            if matches!(self.previous().token_type, TokenType::SEMICOLON) {
                return;
            }

            match self.peek().token_type {
                TokenType::CLASS
                | TokenType::FUN
                | TokenType::VAR
                | TokenType::FOR
                | TokenType::IF
                | TokenType::WHILE
                | TokenType::PRINT
                | TokenType::RETURN
                | TokenType::BREAK => return,
                _ => {}
            }

            self.advance();
        }
    }
}

/// Maps an operator token to its AST operator. Only called for tokens listed
/// in a precedence level of [`Parser::binary_level`].
fn binary_operator(token_type: &TokenType) -> BinaryOp {
    match token_type {
        TokenType::PLUS => BinaryOp::Add,
        TokenType::MINUS => BinaryOp::Subtract,
        TokenType::STAR => BinaryOp::Multiply,
        TokenType::SLASH => BinaryOp::Divide,
        TokenType::EQUAL_EQUAL => BinaryOp::Equal,
        TokenType::BANG_EQUAL => BinaryOp::NotEqual,
        TokenType::LESS => BinaryOp::Less,
        TokenType::LESS_EQUAL => BinaryOp::LessEqual,
        TokenType::GREATER => BinaryOp::Greater,
        TokenType::GREATER_EQUAL => BinaryOp::GreaterEqual,
        other => unreachable!("{:?} is not a binary operator", other),
    }
}
