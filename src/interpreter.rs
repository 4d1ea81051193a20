//! Tree-walking evaluator.
//!
//! Statement execution returns a [`Flow`] so that `break` and `return` travel
//! as ordinary values up to the loop or call that consumes them. Runtime
//! errors travel separately as `Err(RuntimeError)` and abort the program.

use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use chrono::Utc;
use log::{debug, info};

use crate::ast::{BinaryOp, ClassDecl, Expr, ExprId, Ident, LiteralValue, LogicalOp, Stmt, UnaryOp};
use crate::callable::Callable;
use crate::class::{LoxClass, LoxInstance};
use crate::environment::{EnvRef, Environment};
use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::function::{LoxFunction, NativeFunction};
use crate::resolver::Locals;
use crate::value::Value;

/// Convenient alias for interpreter results.
pub type IResult<T> = Result<T, RuntimeError>;

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    /// Unwinds to the innermost enclosing loop.
    Break,
    /// Unwinds to the innermost enclosing call, carrying the result.
    Return(Value),
}

pub struct Interpreter {
    globals: EnvRef,
    environment: EnvRef,
    locals: Locals,
    out: Box<dyn Write>,
    repl_mode: bool,
}

impl Interpreter {
    /// Creates an interpreter printing to `out`, with the native functions
    /// (`clock`) already defined as globals.
    pub fn new(out: Box<dyn Write>) -> Self {
        info!("Initializing Interpreter");

        let globals = Environment::new().into_ref();

        debug!("Defining native function 'clock'");

        globals.borrow_mut().define(
            "clock",
            Value::Callable(Callable::Native(Rc::new(NativeFunction {
                name: "clock",
                arity: 0,
                func: clock,
            }))),
        );

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: Locals::new(),
            out,
            repl_mode: false,
        }
    }

    /// In REPL mode a bare expression statement also prints its value.
    pub fn set_repl_mode(&mut self, repl_mode: bool) {
        self.repl_mode = repl_mode;
    }

    /// Adds the distances computed by a resolver pass.
    pub fn resolve(&mut self, locals: Locals) {
        debug!("Recording {} resolved local(s)", locals.len());
        self.locals.extend(locals);
    }

    /// Interprets a list of statements (a "program"). The first runtime error
    /// aborts the remaining statements.
    pub fn interpret(&mut self, statements: &[Stmt]) -> IResult<()> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            self.execute(stmt)?;
        }

        info!("Interpretation completed successfully");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────────

    pub fn execute(&mut self, stmt: &Stmt) -> IResult<Flow> {
        match stmt {
            Stmt::Expression { expr, line } => {
                let value = self.evaluate(expr)?;
                if self.repl_mode {
                    self.print(&value, *line)?;
                }
                Ok(Flow::Normal)
            }

            Stmt::Print { expr, line } => {
                let value = self.evaluate(expr)?;
                self.print(&value, *line)?;
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Variable '{}' defined with value: {}", name.name, value);
                self.environment.borrow_mut().define(&name.name, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let environment = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(statements, environment.into_ref())
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute(body)? {
                        Flow::Normal => {}
                        Flow::Break => break,
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::Break { .. } => Ok(Flow::Break),

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.name);
                let function =
                    LoxFunction::new(Rc::clone(declaration), Rc::clone(&self.environment), false);
                self.environment.borrow_mut().define(
                    &declaration.name.name,
                    Value::Callable(Callable::Function(Rc::new(function))),
                );
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            }

            Stmt::Class(class) => {
                self.execute_class(class)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Runs `statements` inside `environment`, restoring the current
    /// environment afterwards whether or not they succeed.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: EnvRef) -> IResult<Flow> {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(Flow::Normal);
        for stmt in statements {
            result = self.execute(stmt);
            if !matches!(result, Ok(Flow::Normal)) {
                break;
            }
        }

        self.environment = previous;
        result
    }

    fn execute_class(&mut self, class: &ClassDecl) -> IResult<()> {
        debug!("Defining class '{}'", class.name.name);

        let superclass = match &class.superclass {
            Some(reference) => match self.look_up_variable(reference.id, &reference.name)? {
                Value::Callable(Callable::Class(superclass)) => Some(superclass),
                _ => {
                    return Err(RuntimeError::new(
                        reference.name.line,
                        RuntimeErrorKind::TypeError("Superclass must be a class."),
                    ))
                }
            },
            None => None,
        };

        self.environment
            .borrow_mut()
            .define(&class.name.name, Value::Nil);

        let enclosing = Rc::clone(&self.environment);
        if let Some(superclass) = &superclass {
            let mut environment = Environment::with_enclosing(Rc::clone(&enclosing));
            environment.define(
                "super",
                Value::Callable(Callable::Class(Rc::clone(superclass))),
            );
            self.environment = environment.into_ref();
        }

        let methods = class
            .methods
            .iter()
            .map(|method| {
                let function = LoxFunction::new(
                    Rc::clone(method),
                    Rc::clone(&self.environment),
                    method.name.name == "init",
                );
                (method.name.name.clone(), Rc::new(function))
            })
            .collect::<HashMap<_, _>>();

        let value = Value::Callable(Callable::Class(Rc::new(LoxClass::new(
            class.name.name.clone(),
            superclass,
            methods,
        ))));

        self.environment = enclosing;
        self.environment.borrow_mut().assign(&class.name, value)
    }

    fn print(&mut self, value: &Value, line: usize) -> IResult<()> {
        writeln!(self.out, "{}", value)
            .map_err(|e| RuntimeError::new(line, RuntimeErrorKind::Output(e.to_string())))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────────

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> IResult<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary {
                operator,
                line,
                right,
            } => {
                let right = self.evaluate(right)?;
                match (operator, right) {
                    (UnaryOp::Negate, Value::Number(n)) => Ok(Value::Number(-n)),
                    (UnaryOp::Negate, _) => Err(RuntimeError::new(
                        *line,
                        RuntimeErrorKind::TypeError("Operand must be a number."),
                    )),
                    (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
                }
            }

            Expr::Binary {
                left,
                operator,
                line,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                binary(*operator, left, right, *line)
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let short_circuits = match operator {
                    LogicalOp::Or => left.is_truthy(),
                    LogicalOp::And => !left.is_truthy(),
                };

                if short_circuits {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            }

            Expr::Variable(variable) => self.look_up_variable(variable.id, &variable.name),

            Expr::Assign { target, value } => {
                let value = self.evaluate(value)?;

                match self.locals.get(&target.id) {
                    Some(&distance) => Environment::assign_at(
                        &self.environment,
                        distance,
                        &target.name,
                        value.clone(),
                    )?,
                    None => self
                        .globals
                        .borrow_mut()
                        .assign(&target.name, value.clone())?,
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren_line,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(argument)?);
                }

                match callee.as_callable() {
                    Some(callable) => callable.call(self, values, *paren_line),
                    None => Err(RuntimeError::new(
                        *paren_line,
                        RuntimeErrorKind::NotCallable,
                    )),
                }
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => LoxInstance::get(&instance, name),
                _ => Err(RuntimeError::new(
                    name.line,
                    RuntimeErrorKind::NotAnInstance,
                )),
            },

            Expr::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(RuntimeError::new(
                        name.line,
                        RuntimeErrorKind::NotAnInstance,
                    ));
                };

                let value = self.evaluate(value)?;
                instance.borrow_mut().set(name, value.clone());
                Ok(value)
            }

            Expr::This(keyword) => self.look_up_variable(keyword.id, &keyword.name),

            Expr::Super { keyword, method } => self.evaluate_super(keyword.id, &keyword.name, method),
        }
    }

    /// `super.method`: look the method up from the superclass of the
    /// lexically enclosing class, then bind it to the current `this`, which
    /// always lives one scope inside `super`.
    fn evaluate_super(&mut self, id: ExprId, keyword: &Ident, method: &Ident) -> IResult<Value> {
        let distance = self.locals.get(&id).copied().ok_or_else(|| {
            RuntimeError::new(
                keyword.line,
                RuntimeErrorKind::UnresolvedBinding {
                    name: keyword.name.clone(),
                    distance: 0,
                },
            )
        })?;

        let superclass = match Environment::get_at(&self.environment, distance, keyword)? {
            Value::Callable(Callable::Class(class)) => class,
            _ => {
                return Err(RuntimeError::new(
                    keyword.line,
                    RuntimeErrorKind::TypeError("Superclass must be a class."),
                ))
            }
        };

        let this = Ident::new("this", keyword.line);
        let Value::Instance(instance) =
            Environment::get_at(&self.environment, distance.saturating_sub(1), &this)?
        else {
            return Err(RuntimeError::new(
                keyword.line,
                RuntimeErrorKind::NotAnInstance,
            ));
        };

        match superclass.find_method(&method.name) {
            Some(found) => Ok(Value::Callable(Callable::Function(Rc::new(
                found.bind(instance),
            )))),
            None => Err(RuntimeError::new(
                method.line,
                RuntimeErrorKind::UndefinedProperty(method.name.clone()),
            )),
        }
    }

    /// Locals go straight to the resolved scope; everything else is a global.
    fn look_up_variable(&self, id: ExprId, name: &Ident) -> IResult<Value> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, name),
            None => self.globals.borrow().get(name),
        }
    }
}

/// Applies a binary operator to two evaluated operands.
fn binary(operator: BinaryOp, left: Value, right: Value, line: usize) -> IResult<Value> {
    let numbers_only = || {
        RuntimeError::new(
            line,
            RuntimeErrorKind::TypeError("Operands must be numbers."),
        )
    };

    match operator {
        BinaryOp::Equal => Ok(Value::Bool(left == right)),
        BinaryOp::NotEqual => Ok(Value::Bool(left != right)),
        BinaryOp::Comma => Ok(right),

        BinaryOp::Add => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
            (Value::String(a), b) => Ok(Value::String(format!("{}{}", a, b))),
            (a, Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
            _ => Err(RuntimeError::new(
                line,
                RuntimeErrorKind::TypeError("Operands must be two numbers or two strings."),
            )),
        },

        BinaryOp::Divide => match (left, right) {
            (Value::Number(_), Value::Number(b)) if b == 0.0 => {
                Err(RuntimeError::new(line, RuntimeErrorKind::DivisionByZero))
            }
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),
            _ => Err(numbers_only()),
        },

        BinaryOp::Subtract
        | BinaryOp::Multiply
        | BinaryOp::Less
        | BinaryOp::LessEqual
        | BinaryOp::Greater
        | BinaryOp::GreaterEqual => {
            let (Value::Number(a), Value::Number(b)) = (left, right) else {
                return Err(numbers_only());
            };

            Ok(match operator {
                BinaryOp::Subtract => Value::Number(a - b),
                BinaryOp::Multiply => Value::Number(a * b),
                BinaryOp::Less => Value::Bool(a < b),
                BinaryOp::LessEqual => Value::Bool(a <= b),
                BinaryOp::Greater => Value::Bool(a > b),
                _ => Value::Bool(a >= b),
            })
        }
    }
}

/// Seconds since the Unix epoch.
fn clock(_args: &[Value]) -> Result<Value, String> {
    let now = Utc::now();
    let seconds = now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1e6;

    debug!("Native function 'clock' returned: {}", seconds);

    Ok(Value::Number(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_coerces_the_non_string_side() {
        assert_eq!(
            binary(BinaryOp::Add, Value::Number(1.0), "a".into(), 1),
            Ok(Value::from("1a"))
        );
        assert_eq!(
            binary(BinaryOp::Add, "a".into(), Value::Bool(true), 1),
            Ok(Value::from("atrue"))
        );
    }

    #[test]
    fn plus_without_strings_needs_two_numbers() {
        let err = binary(BinaryOp::Add, Value::Nil, Value::Number(1.0), 4).unwrap_err();

        assert_eq!(err.line, 4);
        assert!(matches!(err.kind, RuntimeErrorKind::TypeError(_)));
    }

    #[test]
    fn dividing_by_zero_is_an_error() {
        let err = binary(BinaryOp::Divide, Value::Number(1.0), Value::Number(0.0), 2).unwrap_err();

        assert_eq!(err.kind, RuntimeErrorKind::DivisionByZero);
    }

    #[test]
    fn equality_never_fails_across_types() {
        assert_eq!(
            binary(BinaryOp::Equal, Value::Nil, Value::Bool(false), 1),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            binary(BinaryOp::NotEqual, Value::from("1"), Value::Number(1.0), 1),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn clock_is_after_2020() {
        let Ok(Value::Number(now)) = clock(&[]) else {
            panic!("clock did not return a number");
        };

        assert!(now > 1_577_836_800.0);
    }
}
