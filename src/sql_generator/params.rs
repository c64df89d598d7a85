//! Per-statement parameter bindings
//!
//! Placeholder names come from a counter owned by the bag, so every compiler that
//! writes into one statement draws from the same sequence and names never repeat.

use super::errors::CompileError;
use crate::expr::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBag {
    prefix: String,
    next: usize,
    entries: Vec<(String, Value)>,
}

impl ParameterBag {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
            entries: Vec::new(),
        }
    }

    /// Bind `value` under a fresh placeholder and return the placeholder.
    pub fn bind(&mut self, value: Value) -> Result<String, CompileError> {
        let name = format!("{}p{}", self.prefix, self.next);
        self.next += 1;
        if self.entries.iter().any(|(existing, _)| *existing == name) {
            return Err(CompileError::ParameterCollision(name));
        }
        self.entries.push((name.clone(), value));
        Ok(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for ParameterBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
