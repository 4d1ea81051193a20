//! Abstract syntax tree handed from the parser to the resolver and interpreter.
//!
//! Expressions that name a binding (`Variable`, `Assign`, `This`, `Super`)
//! carry an [`ExprId`]. The resolver keys its distance table on that id, so
//! two textually identical references at different positions stay distinct.

use std::rc::Rc;

use serde::Serialize;

/// Stable identity of a binding-referencing expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ExprId(pub u32);

/// Hands out fresh [`ExprId`]s. One generator must outlive every program fed
/// to the same interpreter, otherwise ids of separate REPL lines would collide.
#[derive(Debug, Default)]
pub struct ExprIds {
    next: u32,
}

impl ExprIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self) -> ExprId {
        let id = ExprId(self.next);
        self.next += 1;
        id
    }
}

/// An identifier as it appeared in the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ident {
    pub name: String,
    pub line: usize,
}

impl Ident {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
        }
    }
}

/// A literal constant that appears directly in the source code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralValue {
    Number(f64),
    Str(String),
    True,
    False,
    Nil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Negate,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    /// `a, b`: evaluate both, yield `b`.
    Comma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOp {
    And,
    Or,
}

/// A reference to a named binding, resolved statically when it is local.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableRef {
    pub id: ExprId,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Literal(LiteralValue),

    Unary {
        operator: UnaryOp,
        line: usize,
        right: Box<Expr>,
    },

    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        line: usize,
        right: Box<Expr>,
    },

    /// Short‑circuiting `and` / `or`.
    Logical {
        left: Box<Expr>,
        operator: LogicalOp,
        right: Box<Expr>,
    },

    /// `condition ? then_branch : else_branch`
    Ternary {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },

    Grouping(Box<Expr>),

    Variable(VariableRef),

    Assign {
        target: VariableRef,
        value: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        /// Line of the closing `)`, retained for error reporting.
        paren_line: usize,
        arguments: Vec<Expr>,
    },

    /// object.property
    Get { object: Box<Expr>, name: Ident },

    /// object.property = value
    Set {
        object: Box<Expr>,
        name: Ident,
        value: Box<Expr>,
    },

    This(VariableRef),

    /// `super.method`; `keyword` is the reference to the `super` binding.
    Super { keyword: VariableRef, method: Ident },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDecl {
    pub name: Ident,
    pub superclass: Option<VariableRef>,
    pub methods: Vec<Rc<FunctionDecl>>,
}

/// A program is a sequence of these nodes returned by the parser.
/// `for` loops never appear here: the parser lowers them to `While`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stmt {
    /// `line` is that of the terminating `;`.
    Expression {
        expr: Expr,
        line: usize,
    },

    Print {
        expr: Expr,
        line: usize,
    },

    Var {
        name: Ident,
        initializer: Option<Expr>,
    },

    Block(Vec<Stmt>),

    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    While {
        condition: Expr,
        body: Box<Stmt>,
    },

    Break {
        line: usize,
    },

    Function(Rc<FunctionDecl>),

    Return {
        line: usize,
        value: Option<Expr>,
    },

    Class(ClassDecl),
}
