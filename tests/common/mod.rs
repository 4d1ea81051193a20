#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::{Diagnostics, Session};

/// An output sink the test keeps a handle to after giving one to the session.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs one program in a fresh session.
pub fn run(source: &str) -> (String, Diagnostics) {
    let out = SharedBuffer::default();
    let mut session = Session::new(Box::new(out.clone()));
    let diagnostics = session.run(source);
    (out.contents(), diagnostics)
}

/// Runs a program expected to finish without any diagnostic and returns the
/// printed lines.
pub fn run_ok(source: &str) -> Vec<String> {
    let (output, diagnostics) = run(source);
    let messages: Vec<String> = diagnostics.errors().iter().map(|e| e.to_string()).collect();
    assert!(diagnostics.is_empty(), "unexpected errors: {:?}", messages);
    output.lines().map(str::to_owned).collect()
}

/// Rendered diagnostics of a program, one string per error.
pub fn messages(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics.errors().iter().map(|e| e.to_string()).collect()
}
