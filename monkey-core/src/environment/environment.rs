use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::value::Value;

/// One lexical scope. Lookups fall through to `outer`, which is shared with
/// every other scope (and closure) created inside it.
#[derive(Default, Debug)]
pub struct Environment {
    store: HashMap<String, Value>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_enclosed(outer: Rc<RefCell<Environment>>) -> Self {
        Self {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer
                .as_ref()
                .and_then(|outer| outer.borrow().get(name)),
        }
    }

    /// Binds `name` in this scope only, shadowing any outer binding.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.store.insert(name.into(), value);
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::Environment;
    use crate::environment::prelude::{Value, TRUE};

    #[test]
    fn test_lookup_falls_through_to_outer() {
        let global = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().set("a", Value::from(1));

        let inner = Environment::new_enclosed(global.clone());

        assert_eq!(inner.get("a"), Some(Value::from(1)));
        assert_eq!(inner.get("b"), None);
    }

    #[test]
    fn test_shadowing_stays_local() {
        let global = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().set("a", Value::from(1));

        let mut inner = Environment::new_enclosed(global.clone());
        inner.set("a", TRUE);

        assert_eq!(inner.get("a"), Some(TRUE));
        assert_eq!(global.borrow().get("a"), Some(Value::from(1)));
        assert!(inner.contains_local("a"));
        assert_eq!(global.borrow().len(), 1);
    }

    #[test]
    fn test_outer_updates_are_visible() {
        let global = Rc::new(RefCell::new(Environment::new()));
        let inner = Environment::new_enclosed(global.clone());

        global.borrow_mut().set("late", Value::from(7));

        assert_eq!(inner.get("late"), Some(Value::from(7)));
    }
}
