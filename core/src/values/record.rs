use crate::evaluator::EvalError;
use crate::is_banned_name;

use super::Value;

/// An ordered, string-keyed record.
///
/// Lookups only ever see keys that were inserted into this record; there
/// is no inherited or fallback lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field. Replacing keeps the original position.
    ///
    /// Banned names are refused so no record can ever carry them.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<(), EvalError> {
        let key = key.into();
        if is_banned_name(&key) {
            return Err(EvalError::DisallowedKey { key });
        }
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}
