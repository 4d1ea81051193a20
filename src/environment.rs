use crate::ast::Ident;
use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a scope. Closures keep their defining scope alive through it.
pub type EnvRef = Rc<RefCell<Environment>>;

/// Runtime storage for one lexical scope, linked to its enclosing scope.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// A root scope with no parent (the globals).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wraps `self` in a shared handle.
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Binds `name` in this scope only, overwriting any previous binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Looks `name` up along the whole chain.
    pub fn get(&self, name: &Ident) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.name) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    /// Mutates the nearest scope that already binds `name`.
    pub fn assign(&mut self, name: &Ident, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(&name.name) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }

    /// Reads `name` from the scope exactly `distance` links up from `env`.
    pub fn get_at(env: &EnvRef, distance: usize, name: &Ident) -> Result<Value, RuntimeError> {
        let scope = Self::ancestor(env, distance, name)?;
        let value = scope.borrow().values.get(&name.name).cloned();

        value.ok_or_else(|| unresolved(name, distance))
    }

    /// Writes `name` in the scope exactly `distance` links up from `env`.
    pub fn assign_at(
        env: &EnvRef,
        distance: usize,
        name: &Ident,
        value: Value,
    ) -> Result<(), RuntimeError> {
        let scope = Self::ancestor(env, distance, name)?;
        let mut scope = scope.borrow_mut();

        match scope.values.get_mut(&name.name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(unresolved(name, distance)),
        }
    }

    fn ancestor(env: &EnvRef, distance: usize, name: &Ident) -> Result<EnvRef, RuntimeError> {
        let mut scope = Rc::clone(env);

        for _ in 0..distance {
            let parent = scope
                .borrow()
                .enclosing
                .clone()
                .ok_or_else(|| unresolved(name, distance))?;
            scope = parent;
        }

        Ok(scope)
    }
}

fn undefined(name: &Ident) -> RuntimeError {
    RuntimeError::new(
        name.line,
        RuntimeErrorKind::UndefinedVariable(name.name.clone()),
    )
}

fn unresolved(name: &Ident, distance: usize) -> RuntimeError {
    RuntimeError::new(
        name.line,
        RuntimeErrorKind::UnresolvedBinding {
            name: name.name.clone(),
            distance,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Ident {
        Ident::new(name, 1)
    }

    #[test]
    fn get_walks_the_enclosing_chain() {
        let globals = Environment::new().into_ref();
        globals.borrow_mut().define("a", Value::Number(1.0));

        let inner = Environment::with_enclosing(Rc::clone(&globals));

        assert_eq!(inner.get(&ident("a")), Ok(Value::Number(1.0)));
    }

    #[test]
    fn get_of_unknown_name_is_undefined_variable() {
        let env = Environment::new();

        let err = env.get(&ident("missing")).unwrap_err();

        assert_eq!(
            err.kind,
            RuntimeErrorKind::UndefinedVariable("missing".to_string())
        );
    }

    #[test]
    fn assign_never_creates_a_binding() {
        let mut env = Environment::new();

        assert!(env.assign(&ident("x"), Value::Nil).is_err());
        assert!(env.get(&ident("x")).is_err());
    }

    #[test]
    fn assign_updates_the_nearest_definition() {
        let globals = Environment::new().into_ref();
        globals.borrow_mut().define("a", Value::Number(1.0));
        let mut inner = Environment::with_enclosing(Rc::clone(&globals));

        inner.assign(&ident("a"), Value::Number(2.0)).unwrap();

        assert_eq!(
            globals.borrow().get(&ident("a")),
            Ok(Value::Number(2.0))
        );
    }

    #[test]
    fn get_at_skips_shadowing_bindings() {
        let outer = Environment::new().into_ref();
        outer.borrow_mut().define("a", Value::String("outer".into()));
        let inner = Environment::with_enclosing(Rc::clone(&outer)).into_ref();
        inner.borrow_mut().define("a", Value::String("inner".into()));

        assert_eq!(
            Environment::get_at(&inner, 1, &ident("a")),
            Ok(Value::String("outer".into()))
        );
        assert_eq!(
            Environment::get_at(&inner, 0, &ident("a")),
            Ok(Value::String("inner".into()))
        );
    }

    #[test]
    fn assign_at_writes_only_the_target_scope() {
        let outer = Environment::new().into_ref();
        outer.borrow_mut().define("a", Value::Number(1.0));
        let inner = Environment::with_enclosing(Rc::clone(&outer)).into_ref();
        inner.borrow_mut().define("a", Value::Number(10.0));

        Environment::assign_at(&inner, 1, &ident("a"), Value::Number(2.0)).unwrap();

        assert_eq!(
            Environment::get_at(&outer, 0, &ident("a")),
            Ok(Value::Number(2.0))
        );
        assert_eq!(
            Environment::get_at(&inner, 0, &ident("a")),
            Ok(Value::Number(10.0))
        );
    }

    #[test]
    fn walking_past_the_root_is_an_internal_error() {
        let root = Environment::new().into_ref();

        let err = Environment::get_at(&root, 3, &ident("a")).unwrap_err();

        assert!(matches!(
            err.kind,
            RuntimeErrorKind::UnresolvedBinding { distance: 3, .. }
        ));
    }
}
