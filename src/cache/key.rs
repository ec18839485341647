//! Cache key derivation.

use crate::Result;
use serde_json::{Map, Value};
use std::fmt;

/// How argument objects are serialized into a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyMode {
    /// Object keys keep the order the caller built them in, so `{a, b}` and
    /// `{b, a}` are different requests.
    #[default]
    AsGiven,
    /// Object keys are sorted recursively first; differently ordered but
    /// otherwise equal arguments share one entry.
    Sorted,
}

/// `"<func>:<json args>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn derive(func: &str, args: &Value, mode: KeyMode) -> Result<Self> {
        let serialized = match mode {
            KeyMode::AsGiven => serde_json::to_string(args)?,
            KeyMode::Sorted => serde_json::to_string(&sorted(args))?,
        };
        Ok(Self(format!("{}:{}", func, serialized)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut pairs: Vec<(&String, &Value)> = map.iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = Map::with_capacity(pairs.len());
            for (k, v) in pairs {
                out.insert(k.clone(), sorted(v));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
