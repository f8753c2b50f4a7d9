//! Lexical environments.
//!
//! A scope is a flat map plus an optional parent link. The session root
//! grows by one binding per evaluated node; function invocations layer a
//! fresh child over the scope captured by the closure. Lookup walks the
//! parent chain and never mutates anything it passes through.

use std::rc::Rc;

use hashbrown::HashMap;

use crate::values::Value;

#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: HashMap<String, Value>,
    parent: Option<Rc<Scope>>,
}

impl Scope {
    pub fn root() -> Self {
        Self::default()
    }

    /// A new frame whose lookups fall back to `parent`.
    pub fn child(parent: Rc<Scope>) -> Self {
        Self {
            bindings: HashMap::new(),
            parent: Some(parent),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut scope = self;
        loop {
            if let Some(value) = scope.bindings.get(name) {
                return Some(value);
            }
            scope = scope.parent.as_deref()?;
        }
    }

    /// Whether this frame itself binds `name`.
    pub fn binds(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Bind a name in this frame. Existing bindings are never replaced;
    /// returns `false` if the name was already bound here.
    pub fn define(&mut self, name: impl Into<String>, value: Value) -> bool {
        match self.bindings.entry(name.into()) {
            hashbrown::hash_map::Entry::Occupied(_) => false,
            hashbrown::hash_map::Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_parents() {
        let mut root = Scope::root();
        assert!(root.define("a", Value::Number(1.0)));
        let root = Rc::new(root);

        let mut frame = Scope::child(root.clone());
        frame.define("b", Value::Number(2.0));

        assert_eq!(frame.lookup("a"), Some(&Value::Number(1.0)));
        assert_eq!(frame.lookup("b"), Some(&Value::Number(2.0)));
        assert_eq!(root.lookup("b"), None);
    }

    #[test]
    fn child_shadows_parent() {
        let mut root = Scope::root();
        root.define("x", Value::Number(1.0));
        let mut frame = Scope::child(Rc::new(root));
        frame.define("x", Value::Number(2.0));
        assert_eq!(frame.lookup("x"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn define_is_append_only() {
        let mut scope = Scope::root();
        assert!(scope.define("x", Value::Number(1.0)));
        assert!(!scope.define("x", Value::Number(2.0)));
        assert_eq!(scope.lookup("x"), Some(&Value::Number(1.0)));
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn snapshot_survives_later_growth() {
        let mut root = Rc::new(Scope::root());
        Rc::make_mut(&mut root).define("a", Value::Number(1.0));
        let captured = root.clone();
        Rc::make_mut(&mut root).define("b", Value::Number(2.0));

        assert!(captured.lookup("b").is_none());
        assert!(root.lookup("a").is_some());
        assert!(root.lookup("b").is_some());
    }
}
