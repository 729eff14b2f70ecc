//! Named multi-stack for loop-variable scoping.

use crate::value::Value;
use std::collections::BTreeMap;

/// A mapping from names to independent LIFO value stacks.
///
/// Each FOR loop pushes its variable on entry and pops it on exit, so
/// nested loops reusing the same variable name never collide: the inner
/// loop shadows the outer binding and restores it when it finishes.
#[derive(Debug, Default)]
pub struct MultiStack {
    stacks: BTreeMap<String, Vec<Value>>,
}

impl MultiStack {
    /// Create an empty multi-stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a value onto the stack for `name`, creating it if needed.
    pub fn push(&mut self, name: &str, value: Value) {
        self.stacks.entry(name.to_string()).or_default().push(value);
    }

    /// Pop the top value for `name`. Empty stacks are removed.
    pub fn pop(&mut self, name: &str) -> Option<Value> {
        let stack = self.stacks.get_mut(name)?;
        let value = stack.pop();
        if stack.is_empty() {
            self.stacks.remove(name);
        }
        value
    }

    /// The current (topmost) value bound to `name`, if any.
    pub fn peek(&self, name: &str) -> Option<&Value> {
        self.stacks.get(name)?.last()
    }

    /// Replace the topmost value for `name`.
    /// Returns `false` if the name has no binding.
    pub fn set_top(&mut self, name: &str, value: Value) -> bool {
        match self.stacks.get_mut(name).and_then(|s| s.last_mut()) {
            Some(top) => {
                *top = value;
                true
            }
            None => false,
        }
    }

    /// `true` when no name has any binding.
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadowing_and_restore() {
        let mut stacks = MultiStack::new();
        stacks.push("i", Value::Int(1));
        stacks.push("i", Value::Int(10));
        assert_eq!(stacks.peek("i"), Some(&Value::Int(10)));

        assert_eq!(stacks.pop("i"), Some(Value::Int(10)));
        assert_eq!(stacks.peek("i"), Some(&Value::Int(1)));

        assert_eq!(stacks.pop("i"), Some(Value::Int(1)));
        assert_eq!(stacks.peek("i"), None);
        assert!(stacks.is_empty());
    }

    #[test]
    fn set_top_only_touches_the_current_binding() {
        let mut stacks = MultiStack::new();
        stacks.push("i", Value::Int(1));
        stacks.push("i", Value::Int(2));
        assert!(stacks.set_top("i", Value::Int(99)));
        assert_eq!(stacks.pop("i"), Some(Value::Int(99)));
        assert_eq!(stacks.peek("i"), Some(&Value::Int(1)));
    }

    #[test]
    fn set_top_on_unbound_name_is_false() {
        let mut stacks = MultiStack::new();
        assert!(!stacks.set_top("missing", Value::Int(0)));
    }
}
