//! Parenthesised prefix rendering of the AST, used by the `parse` command.

use crate::ast::{BinaryOp, Expr, FunctionDecl, LiteralValue, LogicalOp, Stmt, UnaryOp};

pub struct AstPrinter;

impl AstPrinter {
    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression { expr, .. } => format!("(; {})", self.print(expr)),

            Stmt::Print { expr, .. } => format!("(print {})", self.print(expr)),

            Stmt::Var { name, initializer } => match initializer {
                Some(expr) => format!("(var {} {})", name.name, self.print(expr)),
                None => format!("(var {})", name.name),
            },

            Stmt::Block(statements) => format!("(block{})", self.print_body(statements)),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    self.print(condition),
                    self.print_stmt(then_branch),
                    self.print_stmt(else_branch)
                ),
                None => format!(
                    "(if {} {})",
                    self.print(condition),
                    self.print_stmt(then_branch)
                ),
            },

            Stmt::While { condition, body } => {
                format!("(while {} {})", self.print(condition), self.print_stmt(body))
            }

            Stmt::Break { .. } => "(break)".to_string(),

            Stmt::Function(function) => self.print_function("fun", function),

            Stmt::Return { value, .. } => match value {
                Some(expr) => format!("(return {})", self.print(expr)),
                None => "(return)".to_string(),
            },

            Stmt::Class(class) => {
                let mut out = format!("(class {}", class.name.name);
                if let Some(superclass) = &class.superclass {
                    out.push_str(&format!(" < {}", superclass.name.name));
                }
                for method in &class.methods {
                    out.push(' ');
                    out.push_str(&self.print_function("method", method));
                }
                out.push(')');
                out
            }
        }
    }

    pub fn print(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(literal) => match literal {
                LiteralValue::Number(n) => {
                    if n.fract() == 0.0 {
                        format!("{:.1}", n)
                    } else {
                        n.to_string()
                    }
                }
                LiteralValue::Str(s) => s.to_string(),
                LiteralValue::True => "true".to_string(),
                LiteralValue::False => "false".to_string(),
                LiteralValue::Nil => "nil".to_string(),
            },

            Expr::Unary {
                operator, right, ..
            } => {
                let op_str = match operator {
                    UnaryOp::Negate => "-",
                    UnaryOp::Not => "!",
                };

                format!("({} {})", op_str, self.print(right))
            }

            Expr::Binary {
                left,
                operator,
                right,
                ..
            } => format!(
                "({} {} {})",
                binary_symbol(*operator),
                self.print(left),
                self.print(right)
            ),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let op_str = match operator {
                    LogicalOp::And => "and",
                    LogicalOp::Or => "or",
                };

                format!("({} {} {})", op_str, self.print(left), self.print(right))
            }

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => format!(
                "(?: {} {} {})",
                self.print(condition),
                self.print(then_branch),
                self.print(else_branch)
            ),

            Expr::Grouping(expr) => format!("(group {})", self.print(expr)),

            Expr::Variable(variable) => variable.name.name.clone(),

            Expr::Assign { target, value } => {
                format!("(= {} {})", target.name.name, self.print(value))
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                let mut out = format!("(call {}", self.print(callee));
                for argument in arguments {
                    out.push(' ');
                    out.push_str(&self.print(argument));
                }
                out.push(')');
                out
            }

            Expr::Get { object, name } => format!("(. {} {})", self.print(object), name.name),

            Expr::Set {
                object,
                name,
                value,
            } => format!(
                "(= (. {} {}) {})",
                self.print(object),
                name.name,
                self.print(value)
            ),

            Expr::This(_) => "this".to_string(),

            Expr::Super { method, .. } => format!("(super {})", method.name),
        }
    }

    fn print_function(&self, keyword: &str, function: &FunctionDecl) -> String {
        let params: Vec<&str> = function.params.iter().map(|p| p.name.as_str()).collect();

        format!(
            "({} {} ({}){})",
            keyword,
            function.name.name,
            params.join(" "),
            self.print_body(&function.body)
        )
    }

    fn print_body(&self, statements: &[Stmt]) -> String {
        statements
            .iter()
            .map(|stmt| format!(" {}", self.print_stmt(stmt)))
            .collect()
    }
}

fn binary_symbol(operator: BinaryOp) -> &'static str {
    match operator {
        BinaryOp::Add => "+",
        BinaryOp::Subtract => "-",
        BinaryOp::Multiply => "*",
        BinaryOp::Divide => "/",
        BinaryOp::Equal => "==",
        BinaryOp::NotEqual => "!=",
        BinaryOp::Less => "<",
        BinaryOp::LessEqual => "<=",
        BinaryOp::Greater => ">",
        BinaryOp::GreaterEqual => ">=",
        BinaryOp::Comma => ",",
    }
}
