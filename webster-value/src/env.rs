//! Environment for variable bindings.

use crate::Object;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared reference to an environment frame.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One frame of the scope chain.
#[derive(Debug, Default)]
pub struct Environment {
    /// Variable bindings in this frame.
    bindings: FxHashMap<String, Object>,
    /// Enclosing frame, only used for lookup.
    outer: Option<EnvRef>,
}

impl Environment {
    /// Create a new global environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a child frame of `outer`.
    pub fn new_enclosed(outer: &EnvRef) -> EnvRef {
        Environment {
            bindings: FxHashMap::default(),
            outer: Some(Rc::clone(outer)),
        }
        .into_ref()
    }

    /// Wrap in `Rc<RefCell<_>>`.
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Look up a variable, walking outwards through the enclosing frames.
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.bindings.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref()?.borrow().get(name),
        }
    }

    /// Bind `name` in this frame. Never touches an enclosing frame, a binding of the same
    /// name further out is shadowed rather than overwritten.
    pub fn set(&mut self, name: impl Into<String>, value: Object) -> Object {
        self.bindings.insert(name.into(), value.clone());
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut env = Environment::new();
        assert_eq!(env.set("x", Object::Integer(42)), Object::Integer(42));
        assert_eq!(env.get("x"), Some(Object::Integer(42)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_scope_chain() {
        let global = Environment::new().into_ref();
        global.borrow_mut().set("x", Object::Integer(1));

        let child = Environment::new_enclosed(&global);
        child.borrow_mut().set("y", Object::Integer(2));

        // child can see the enclosing bindings
        assert_eq!(child.borrow().get("x"), Some(Object::Integer(1)));
        assert_eq!(child.borrow().get("y"), Some(Object::Integer(2)));

        // the enclosing frame cannot see the child's bindings
        assert_eq!(global.borrow().get("y"), None);
    }

    #[test]
    fn test_set_shadows_outer_binding() {
        let global = Environment::new().into_ref();
        global.borrow_mut().set("x", Object::Integer(1));

        let child = Environment::new_enclosed(&global);
        child.borrow_mut().set("x", Object::Integer(2));

        assert_eq!(child.borrow().get("x"), Some(Object::Integer(2)));
        assert_eq!(global.borrow().get("x"), Some(Object::Integer(1)));
        assert!(child.borrow().bindings.contains_key("x"));
    }

    #[test]
    fn test_outer_updates_are_visible() {
        let global = Environment::new().into_ref();
        let child = Environment::new_enclosed(&global);
        assert_eq!(child.borrow().get("late"), None);

        global.borrow_mut().set("late", Object::Boolean(true));
        assert_eq!(child.borrow().get("late"), Some(Object::Boolean(true)));
    }

    #[test]
    fn test_deep_chain() {
        let global = Environment::new().into_ref();
        global.borrow_mut().set("root", Object::Null);

        let mut env = Rc::clone(&global);
        for _ in 0..100 {
            env = Environment::new_enclosed(&env);
        }
        assert_eq!(env.borrow().get("root"), Some(Object::Null));
        assert!(env.borrow().bindings.is_empty());
    }
}
