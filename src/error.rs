//! Centralised error hierarchy for the **Lox runtime**.
//!
//! Static failures (scanner, parser, resolver) and the single terminal runtime
//! failure are all expressed as a [`LoxError`] so the driver can collect them
//! in one [`Diagnostics`](crate::diagnostics::Diagnostics) sink.
//!
//! The module **does not** print diagnostics itself.

use thiserror::Error;

use log::info;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error. `location` is either empty, ` at end` or
    /// ` at 'lexeme'`.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        location: String,
        line: usize,
    },

    /// Static‑analysis failure found by the resolver.
    #[error("[line {line}] Error{location}: {kind}")]
    Resolve {
        kind: ResolveError,
        location: String,
        line: usize,
    },

    /// Runtime evaluation error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(line: usize, lexeme: Option<&str>, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", line, message);

        LoxError::Parse {
            message,
            location: location(lexeme),
            line,
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve(line: usize, lexeme: &str, kind: ResolveError) -> Self {
        info!("Creating Resolve error: line={}, kind={:?}", line, kind);

        LoxError::Resolve {
            kind,
            location: location(Some(lexeme)),
            line,
        }
    }

    /// Is this a static (lexical, syntactic or resolution) error?
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            LoxError::Lex { .. } | LoxError::Parse { .. } | LoxError::Resolve { .. }
        )
    }
}

/// `None` marks the end of input.
fn location(lexeme: Option<&str>) -> String {
    match lexeme {
        Some(lexeme) => format!(" at '{}'", lexeme),
        None => " at end".to_string(),
    }
}

/// Static rules enforced by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Already a variable with this name in this scope.")]
    DuplicateDeclaration,

    #[error("Can't read local variable in its own initializer.")]
    SelfReferentialInitializer,

    #[error("A class can't inherit from itself.")]
    SelfInheritingClass,

    #[error("Can't use 'this' outside of a class.")]
    ThisOutsideClass,

    #[error("Can't use 'super' outside of a class.")]
    SuperOutsideClass,

    #[error("Can't use 'super' in a class with no superclass.")]
    SuperWithoutSuperclass,

    #[error("Can't return from top-level code.")]
    ReturnOutsideFunction,

    #[error("Can't return a value from an initializer.")]
    ReturnValueFromInitializer,

    #[error("'break' is allowed only inside loops.")]
    BreakOutsideLoop,
}

/// A runtime failure together with the source line that triggered it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Runtime error: {kind}")]
pub struct RuntimeError {
    pub line: usize,
    pub kind: RuntimeErrorKind,
}

impl RuntimeError {
    pub fn new(line: usize, kind: RuntimeErrorKind) -> Self {
        info!("Creating Runtime error: line={}, kind={:?}", line, kind);

        Self { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeErrorKind {
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(String),

    #[error("{0}")]
    TypeError(&'static str),

    #[error("Division by zero.")]
    DivisionByZero,

    #[error("Can only call functions and classes.")]
    NotCallable,

    #[error("Expected {expected} arguments but got {found}.")]
    ArityMismatch { expected: usize, found: usize },

    #[error("Only instances have properties.")]
    NotAnInstance,

    #[error("Undefined property '{0}'.")]
    UndefinedProperty(String),

    /// Failure reported by a native function.
    #[error("{0}")]
    Native(String),

    #[error("Failed to write output: {0}")]
    Output(String),

    /// The resolver promised a binding that the environment chain does not hold.
    #[error("Internal error: no binding for '{name}' at distance {distance}.")]
    UnresolvedBinding { name: String, distance: usize },
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_runtime_errors_are_not_static() {
        let errors = [
            LoxError::lex(1, "Unterminated string."),
            LoxError::parse(2, None, "Expected expression."),
            LoxError::resolve(3, "this", ResolveError::ThisOutsideClass),
            LoxError::from(RuntimeError::new(4, RuntimeErrorKind::DivisionByZero)),
        ];

        for error in &errors {
            let expected = match error {
                LoxError::Lex { .. } | LoxError::Parse { .. } | LoxError::Resolve { .. } => true,
                LoxError::Runtime(_) => false,
            };
            assert_eq!(error.is_static(), expected, "{}", error);
        }
    }

    #[test]
    fn rendering() {
        assert_eq!(
            LoxError::parse(2, None, "Expected expression.").to_string(),
            "[line 2] Error at end: Expected expression."
        );
        assert_eq!(
            LoxError::from(RuntimeError::new(4, RuntimeErrorKind::DivisionByZero)).to_string(),
            "[line 4] Runtime error: Division by zero."
        );
    }
}
