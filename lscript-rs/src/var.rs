//! Variable store.
//!
//! Maps variable names to [`Value`]s.  A name that was never assigned reads
//! as `None`; there is no stored "false" or "unset" value.  The store is
//! cleared at the start of every run and written only by command handlers.

use std::collections::HashMap;

use crate::script::value::Value;

/// Name → value table for one interpreter instance.
#[derive(Debug, Default)]
pub struct VarStore {
    vars: HashMap<String, Value>,
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or overwrite) a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Current value, or `None` if the name was never assigned.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.vars.get_mut(name)
    }

    /// Returns `true` if the variable is set.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Drop every variable.
    pub fn clear(&mut self) {
        self.vars.clear();
    }

    /// Iterate over all variables (unordered).
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.vars.iter()
    }

    /// All variables sorted by name.
    pub fn sorted(&self) -> Vec<(&String, &Value)> {
        let mut all: Vec<_> = self.vars.iter().collect();
        all.sort_by(|a, b| a.0.cmp(b.0));
        all
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
