//! Tagged value tree for free-form configuration sections.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A configuration value as found in a declaration file or a snapshot.
///
/// Maps are the only interior nodes flattening descends into; lists are
/// compared as leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ConfigValue>),
    Map(ConfigMap),
}

impl ConfigValue {
    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Render this value as the text used for leaf comparison.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => f.write_str("null"),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::String(s) => f.write_str(s),
            ConfigValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            ConfigValue::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Integer(i)
    }
}

/// Flatten a map into dot-separated leaf keys with rendered values.
///
/// Only maps are descended into. Keys come back in lexical order.
pub fn flatten(map: &ConfigMap) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    flatten_into(map, "", &mut out);
    out
}

fn flatten_into(map: &ConfigMap, prefix: &str, out: &mut BTreeMap<String, String>) {
    for (key, value) in map {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            ConfigValue::Map(inner) => flatten_into(inner, &full, out),
            leaf => {
                out.insert(full, leaf.render());
            }
        }
    }
}

/// Look up a dot-separated key path inside a map.
pub fn lookup<'a>(map: &'a ConfigMap, dotted: &str) -> Option<&'a ConfigValue> {
    let mut parts = dotted.split('.');
    let first = parts.next()?;
    let mut current = map.get(first)?;
    for part in parts {
        current = current.as_map()?.get(part)?;
    }
    Some(current)
}
