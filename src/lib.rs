pub mod ast;
pub mod ast_printer;
pub mod callable;
pub mod class;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod function;
pub mod interpreter;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod session;
pub mod token;
pub mod value;

pub use diagnostics::Diagnostics;
pub use error::{LoxError, RuntimeError, RuntimeErrorKind};
pub use interpreter::Interpreter;
pub use session::Session;
pub use value::Value;
