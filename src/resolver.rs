//! Static resolver pass for the **Lox** runtime.
//!
//! This resolver does three things in one AST walk:
//! 1. Build lexical scopes (stack of `HashMap<&str,bool>` tracking declared/defined).
//! 2. Report static errors (redeclaration, read in own initializer, misplaced
//!    `return` / `break` / `this` / `super`, self-inheritance).
//! 3. Record, for *each* local variable occurrence, how many scopes separate
//!    the use from its binding. Anything not found in a local scope is left out
//!    of the table and looked up among the globals at run time, which is what
//!    lets top-level functions refer to each other before both are defined.
//!
//! Resolution never stops at the first error; every problem is collected.

use crate::ast::{ClassDecl, Expr, ExprId, FunctionDecl, Ident, Stmt, VariableRef};
use crate::error::{LoxError, ResolveError};
use log::{debug, info};
use std::collections::HashMap;

/// Scope distance of every locally resolved binding reference.
pub type Locals = HashMap<ExprId, usize>;

/// What kind of function body are we in?  Used to validate `return`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Method,
    Initializer,
}

/// Are we inside a class body, and does it have a superclass?
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Output of a resolver pass.
#[derive(Debug, Default)]
pub struct Resolution {
    pub locals: Locals,
    pub errors: Vec<LoxError>,
}

pub struct Resolver<'a> {
    scopes: Vec<HashMap<&'a str, bool>>, // false=declared, true=defined
    locals: Locals,
    errors: Vec<LoxError>,
    current_function: FunctionType,
    current_class: ClassType,
    in_loop: bool,
}

impl<'a> Resolver<'a> {
    pub fn new() -> Self {
        info!("Resolver instantiated");

        Resolver {
            scopes: Vec::new(),
            locals: Locals::new(),
            errors: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            in_loop: false,
        }
    }

    /// Walk all top‑level statements.
    pub fn resolve(mut self, statements: &'a [Stmt]) -> Resolution {
        info!(
            "Beginning resolve pass over {} statement(s)",
            statements.len()
        );

        self.resolve_stmts(statements);

        info!(
            "Resolved {} local reference(s), {} error(s)",
            self.locals.len(),
            self.errors.len()
        );

        Resolution {
            locals: self.locals,
            errors: self.errors,
        }
    }

    fn resolve_stmts(&mut self, statements: &'a [Stmt]) {
        for stmt in statements {
            self.resolve_stmt(stmt);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statement resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::Block(statements) => {
                self.begin_scope();
                self.resolve_stmts(statements);
                self.end_scope();
            }

            Stmt::Var { name, initializer } => {
                // declare → resolve initializer → define
                self.declare(name);
                if let Some(expr) = initializer {
                    self.resolve_expr(expr);
                }
                self.define(name);
            }

            Stmt::Function(function) => {
                // The name is visible inside its own body, for recursion.
                self.declare(&function.name);
                self.define(&function.name);
                self.resolve_function(function, FunctionType::Function);
            }

            Stmt::Class(class) => self.resolve_class(class),

            Stmt::Expression { expr, .. } | Stmt::Print { expr, .. } => self.resolve_expr(expr),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }

            Stmt::While { condition, body } => {
                self.resolve_expr(condition);

                let enclosing = self.in_loop;
                self.in_loop = true;
                self.resolve_stmt(body);
                self.in_loop = enclosing;
            }

            Stmt::Break { line } => {
                if !self.in_loop {
                    self.error(*line, "break", ResolveError::BreakOutsideLoop);
                }
            }

            Stmt::Return { line, value } => {
                if self.current_function == FunctionType::None {
                    self.error(*line, "return", ResolveError::ReturnOutsideFunction);
                }

                if let Some(value) = value {
                    if self.current_function == FunctionType::Initializer {
                        self.error(*line, "return", ResolveError::ReturnValueFromInitializer);
                    }
                    self.resolve_expr(value);
                }
            }
        }
    }

    fn resolve_class(&mut self, class: &'a ClassDecl) {
        let enclosing_class = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(&class.name);
        self.define(&class.name);

        if let Some(superclass) = &class.superclass {
            if superclass.name.name == class.name.name {
                self.error_at(&superclass.name, ResolveError::SelfInheritingClass);
            }

            self.current_class = ClassType::Subclass;
            self.resolve_variable(superclass);

            self.begin_scope();
            self.define_implicit("super");
        }

        self.begin_scope();
        self.define_implicit("this");

        for method in &class.methods {
            let kind = if method.name.name == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };

            self.resolve_function(method, kind);
        }

        self.end_scope();

        if class.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expression resolution
    // ─────────────────────────────────────────────────────────────────────────

    fn resolve_expr(&mut self, expr: &'a Expr) {
        match expr {
            Expr::Literal(_) => {}

            Expr::Grouping(inner) => self.resolve_expr(inner),

            Expr::Unary { right, .. } => self.resolve_expr(right),

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            }

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(condition);
                self.resolve_expr(then_branch);
                self.resolve_expr(else_branch);
            }

            Expr::Variable(variable) => self.resolve_variable(variable),

            Expr::Assign { target, value } => {
                // First resolve RHS, then bind LHS
                self.resolve_expr(value);
                self.resolve_local(target.id, &target.name);
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                self.resolve_expr(callee);
                for argument in arguments {
                    self.resolve_expr(argument);
                }
            }

            // Property names are dispatched dynamically; only the receiver resolves.
            Expr::Get { object, .. } => self.resolve_expr(object),

            Expr::Set { object, value, .. } => {
                self.resolve_expr(value);
                self.resolve_expr(object);
            }

            Expr::This(keyword) => {
                if self.current_class == ClassType::None {
                    self.error_at(&keyword.name, ResolveError::ThisOutsideClass);
                    return;
                }

                self.resolve_local(keyword.id, &keyword.name);
            }

            Expr::Super { keyword, .. } => {
                match self.current_class {
                    ClassType::None => {
                        self.error_at(&keyword.name, ResolveError::SuperOutsideClass);
                    }
                    ClassType::Class => {
                        self.error_at(&keyword.name, ResolveError::SuperWithoutSuperclass);
                    }
                    ClassType::Subclass => {}
                }

                self.resolve_local(keyword.id, &keyword.name);
            }
        }
    }

    fn resolve_variable(&mut self, variable: &'a VariableRef) {
        // Cannot read in own initializer
        if let Some(scope) = self.scopes.last() {
            if scope.get(variable.name.name.as_str()) == Some(&false) {
                self.error_at(&variable.name, ResolveError::SelfReferentialInitializer);
            }
        }

        self.resolve_local(variable.id, &variable.name);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Function helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Enter a fresh scope for a function’s parameters + body.
    fn resolve_function(&mut self, function: &'a FunctionDecl, kind: FunctionType) {
        let enclosing_function = self.current_function;
        let enclosing_loop = self.in_loop;
        self.current_function = kind;
        // A loop around the declaration does not make `break` legal in the body.
        self.in_loop = false;

        self.begin_scope();
        for param in &function.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_stmts(&function.body);
        self.end_scope();

        self.current_function = enclosing_function;
        self.in_loop = enclosing_loop;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scope management
    // ─────────────────────────────────────────────────────────────────────────

    #[inline]
    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    #[inline]
    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Globals are never tracked, so redeclaring one is allowed.
    fn declare(&mut self, name: &'a Ident) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };

        if scope.insert(name.name.as_str(), false).is_some() {
            self.error_at(name, ResolveError::DuplicateDeclaration);
        }
    }

    fn define(&mut self, name: &'a Ident) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.name.as_str(), true);
        }
    }

    fn define_implicit(&mut self, name: &'static str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, true);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding‑distance helper
    // ─────────────────────────────────────────────────────────────────────────

    /// Record this occurrence as a local at depth `d`, or leave it out of the
    /// table when no local scope binds it.
    fn resolve_local(&mut self, id: ExprId, name: &Ident) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name.name.as_str()) {
                debug!("Resolved '{}' ({:?}) at depth {}", name.name, id, depth);
                self.locals.insert(id, depth);
                return;
            }
        }

        debug!("Resolved '{}' ({:?}) as global", name.name, id);
    }

    fn error_at(&mut self, name: &Ident, kind: ResolveError) {
        self.error(name.line, &name.name, kind);
    }

    fn error(&mut self, line: usize, lexeme: &str, kind: ResolveError) {
        self.errors.push(LoxError::resolve(line, lexeme, kind));
    }
}

impl Default for Resolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}
