//! Shared reporting surface for every phase of a run.
//!
//! The scanner, parser and resolver push as many static errors as they find;
//! the interpreter pushes at most one runtime error, after which execution of
//! the current program stops.

use log::debug;

use crate::error::{LoxError, RuntimeError};

#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<LoxError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: LoxError) {
        debug!("Diagnostic reported: {}", error);

        self.errors.push(error);
    }

    pub fn report_runtime(&mut self, error: RuntimeError) {
        self.report(LoxError::Runtime(error));
    }

    /// Was any lexical, syntactic or resolution error reported?
    pub fn had_error(&self) -> bool {
        self.errors.iter().any(LoxError::is_static)
    }

    pub fn had_runtime_error(&self) -> bool {
        self.runtime_error().is_some()
    }

    pub fn runtime_error(&self) -> Option<&RuntimeError> {
        self.errors.iter().find_map(|e| match e {
            LoxError::Runtime(err) => Some(err),
            _ => None,
        })
    }

    pub fn errors(&self) -> &[LoxError] {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}
