//! The capability shared by everything a call expression can invoke:
//! native functions, user functions (closures) and classes.

use std::fmt;
use std::rc::Rc;

use log::debug;

use crate::class::LoxClass;
use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::function::{LoxFunction, NativeFunction};
use crate::interpreter::{IResult, Interpreter};
use crate::value::Value;

#[derive(Debug, Clone)]
pub enum Callable {
    Native(Rc<NativeFunction>),
    Function(Rc<LoxFunction>),
    Class(Rc<LoxClass>),
}

impl Callable {
    /// Number of arguments a call must supply.
    pub fn arity(&self) -> usize {
        match self {
            Callable::Native(native) => native.arity,
            Callable::Function(function) => function.arity(),
            Callable::Class(class) => class.arity(),
        }
    }

    /// Invokes the callable. `line` is the call site, used for errors raised
    /// by the callee itself rather than by its body.
    pub fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        line: usize,
    ) -> IResult<Value> {
        if arguments.len() != self.arity() {
            return Err(RuntimeError::new(
                line,
                RuntimeErrorKind::ArityMismatch {
                    expected: self.arity(),
                    found: arguments.len(),
                },
            ));
        }

        debug!("Calling {} with {} argument(s)", self, arguments.len());

        match self {
            Callable::Native(native) => (native.func)(&arguments)
                .map_err(|msg| RuntimeError::new(line, RuntimeErrorKind::Native(msg))),

            Callable::Function(function) => function.call(interpreter, arguments),

            Callable::Class(class) => LoxClass::instantiate(class, interpreter, arguments),
        }
    }
}

impl PartialEq for Callable {
    /// Callables are equal only when they are the same runtime entity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Native(a), Callable::Native(b)) => Rc::ptr_eq(a, b),
            (Callable::Function(a), Callable::Function(b)) => Rc::ptr_eq(a, b),
            (Callable::Class(a), Callable::Class(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(_) => write!(f, "<native fn>"),
            Callable::Function(function) => write!(f, "<fn {}>", function.name()),
            Callable::Class(class) => write!(f, "{}", class.name),
        }
    }
}
