//! Runs source text through every phase: scan → parse → resolve → interpret.

use std::io::Write;

use log::{debug, info};

use crate::ast::{ExprIds, Stmt};
use crate::diagnostics::Diagnostics;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner;

/// One interpreter plus the state that must persist across programs fed to
/// it (REPL lines share globals and expression ids).
pub struct Session {
    interpreter: Interpreter,
    ids: ExprIds,
}

impl Session {
    pub fn new(out: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::new(out),
            ids: ExprIds::new(),
        }
    }

    /// A session whose bare expression statements echo their value.
    pub fn interactive(out: Box<dyn Write>) -> Self {
        let mut session = Self::new(out);
        session.interpreter.set_repl_mode(true);
        session
    }

    /// Scans and parses `source`, reporting lexical and syntax errors.
    pub fn parse(&mut self, source: &str, diagnostics: &mut Diagnostics) -> Vec<Stmt> {
        let (tokens, lex_errors) = scanner::scan(source);
        for error in lex_errors {
            diagnostics.report(error);
        }

        let (statements, parse_errors) = Parser::new(&tokens, &mut self.ids).parse();
        for error in parse_errors {
            diagnostics.report(error);
        }

        statements
    }

    /// Runs `source` to completion. Static errors suppress execution; a
    /// runtime error stops it at the failing statement.
    pub fn run(&mut self, source: &str) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        let statements = self.parse(source, &mut diagnostics);
        if diagnostics.had_error() {
            info!("Skipping resolution: syntax errors reported");
            return diagnostics;
        }

        let resolution = Resolver::new().resolve(&statements);
        for error in resolution.errors {
            diagnostics.report(error);
        }
        if diagnostics.had_error() {
            info!("Skipping interpretation: resolution errors reported");
            return diagnostics;
        }

        self.interpreter.resolve(resolution.locals);

        if let Err(error) = self.interpreter.interpret(&statements) {
            debug!("Runtime error: {}", error);
            diagnostics.report_runtime(error);
        }

        diagnostics
    }
}
