//! The environment chain: scope frames linked by an outer pointer, per
//! spec §4.4.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::types::Type;
use crate::value::{BuiltinValue, NativeFn, Value};

struct Binding {
    value: Value,
    declared_type: Option<Type>,
}

struct EnvironmentData {
    bindings: RefCell<HashMap<String, Binding>>,
    outer: Option<Env>,
    /// Only populated on the root environment; every descendant shares it
    /// by walking to the root, matching spec §4.4's "built-ins table is
    /// inherited by reference."
    builtins: RefCell<HashMap<String, BuiltinValue>>,
}

/// A reference-counted handle to a scope frame (§9: environments as
/// shared handles; cycles through closures-over-their-own-definitions are
/// expected and not collected, a documented trade-off rather than a leak).
#[derive(Clone)]
pub struct Env(Rc<EnvironmentData>);

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Env(..)")
    }
}

impl Env {
    /// A fresh root environment with an empty built-ins table.
    pub fn root() -> Env {
        Env(Rc::new(EnvironmentData {
            bindings: RefCell::new(HashMap::new()),
            outer: None,
            builtins: RefCell::new(HashMap::new()),
        }))
    }

    /// A new environment enclosing `outer`. The built-ins table is not
    /// copied; lookups walk the `outer` chain to find it.
    pub fn new_enclosed(outer: &Env) -> Env {
        Env(Rc::new(EnvironmentData {
            bindings: RefCell::new(HashMap::new()),
            outer: Some(outer.clone()),
            builtins: RefCell::new(HashMap::new()),
        }))
    }

    fn root_handle(&self) -> &Env {
        let mut current = self;
        loop {
            match &current.0.outer {
                Some(outer) => current = outer,
                None => return current,
            }
        }
    }

    /// Register a built-in before user code runs. Always lands on the
    /// ultimate root so every descendant scope can see it.
    pub fn register_builtin(
        &self,
        name: &'static str,
        param_types: Vec<Type>,
        return_type: Type,
        native_fn: NativeFn,
    ) {
        let root = self.root_handle();
        root.0.builtins.borrow_mut().insert(
            name.to_string(),
            BuiltinValue { name, param_types, return_type, native_fn },
        );
    }

    /// `get(name)`: built-ins first, then the current scope's bindings,
    /// then the `outer` chain, per spec §4.4.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(builtin) = self.root_handle().0.builtins.borrow().get(name) {
            return Some(Value::Builtin(builtin.clone()));
        }
        let mut current: &EnvironmentData = &self.0;
        loop {
            if let Some(binding) = current.bindings.borrow().get(name) {
                return Some(binding.value.clone());
            }
            match &current.outer {
                Some(outer) => current = &outer.0,
                None => return None,
            }
        }
    }

    /// The declared type of `name`, if any scope in the chain recorded one.
    pub fn declared_type(&self, name: &str) -> Option<Type> {
        let mut current: &EnvironmentData = &self.0;
        loop {
            if let Some(binding) = current.bindings.borrow().get(name) {
                return binding.declared_type.clone();
            }
            match &current.outer {
                Some(outer) => current = &outer.0,
                None => return None,
            }
        }
    }

    /// Plain `set`: stores in the current scope only, never an ancestor
    /// (spec §4.4). If the current scope already declared a type for
    /// `name`, validate assignability, returning `Err` with a message on
    /// mismatch.
    pub fn define(&self, name: &str, value: Value) {
        self.0
            .bindings
            .borrow_mut()
            .insert(name.to_string(), Binding { value, declared_type: None });
    }

    pub fn define_typed(&self, name: &str, value: Value, declared_type: Type) {
        self.0
            .bindings
            .borrow_mut()
            .insert(name.to_string(), Binding { value, declared_type: Some(declared_type) });
    }

    /// Assign to `name`, walking outward to find the scope that declared
    /// it (so mutation of an outer binding from an inner scope is
    /// visible, matching the "for loop writes to outer vars" requirement
    /// in spec §9). Introduces the binding in the current scope if no
    /// scope in the chain already has it, per spec §4.3's "first
    /// assignment introduces a binding" rule.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), String> {
        if let Some(declared) = self.declared_type(name) {
            let actual = value.vibe_type();
            if !Type::is_assignable(&actual, &declared) {
                return Err(format!(
                    "cannot assign value of type {} to slot of type {}",
                    actual, declared
                ));
            }
        }
        if self.assign_existing(name, value.clone()) {
            return Ok(());
        }
        self.define(name, value);
        Ok(())
    }

    fn assign_existing(&self, name: &str, value: Value) -> bool {
        let mut current = self.clone();
        loop {
            let found = {
                let mut bindings = current.0.bindings.borrow_mut();
                if let Some(binding) = bindings.get_mut(name) {
                    binding.value = value.clone();
                    true
                } else {
                    false
                }
            };
            if found {
                return true;
            }
            let next = current.0.outer.clone();
            match next {
                Some(outer) => current = outer,
                None => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_set_never_mutates_ancestor() {
        let root = Env::root();
        root.define("x", Value::Integer(1));
        let child = Env::new_enclosed(&root);
        child.define("x", Value::Integer(2));
        assert_eq!(root.get("x").unwrap().to_display_string(), "1");
        assert_eq!(child.get("x").unwrap().to_display_string(), "2");
    }

    #[test]
    fn assign_walks_to_declaring_scope() {
        let root = Env::root();
        root.define("x", Value::Integer(1));
        let child = Env::new_enclosed(&root);
        child.assign("x", Value::Integer(9)).unwrap();
        assert_eq!(root.get("x").unwrap().to_display_string(), "9");
    }

    #[test]
    fn get_walks_outer_chain() {
        let root = Env::root();
        root.define("x", Value::Integer(1));
        let child = Env::new_enclosed(&root);
        assert_eq!(child.get("x").unwrap().to_display_string(), "1");
    }

    #[test]
    fn builtins_visible_through_all_scopes() {
        let root = Env::root();
        root.register_builtin("id", vec![Type::Any], Type::Any, Rc::new(|args| args[0].clone()));
        let child = Env::new_enclosed(&root);
        assert!(matches!(child.get("id"), Some(Value::Builtin(_))));
    }

    #[test]
    fn typed_slot_rejects_incompatible_assignment() {
        let root = Env::root();
        root.define_typed("x", Value::Integer(1), Type::Int);
        let err = root.assign("x", Value::String("no".into())).unwrap_err();
        assert!(err.contains("cannot assign"));
    }

    #[test]
    fn closure_sees_later_mutation_of_captured_env() {
        let root = Env::root();
        root.define("counter", Value::Integer(0));
        // Simulate a closure capturing `root`.
        let captured = root.clone();
        root.assign("counter", Value::Integer(5)).unwrap();
        assert_eq!(captured.get("counter").unwrap().to_display_string(), "5");
    }
}
