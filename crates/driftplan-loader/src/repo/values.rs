//! Conversion of untyped YAML config sections into [`ConfigValue`] trees.

use driftplan_core::model::{ConfigMap, ConfigValue};
use serde_yaml::{Mapping, Value};

/// Convert a YAML mapping into a config map with string keys.
pub(crate) fn config_map(mapping: &Mapping) -> ConfigMap {
    mapping
        .iter()
        .map(|(k, v)| (key_string(k), config_value(v)))
        .collect()
}

pub(crate) fn config_value(value: &Value) -> ConfigValue {
    match value {
        Value::Null => ConfigValue::Null,
        Value::Bool(b) => ConfigValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => ConfigValue::Integer(i),
            None => n.as_f64().map_or(ConfigValue::Null, ConfigValue::Float),
        },
        Value::String(s) => ConfigValue::String(s.clone()),
        Value::Sequence(items) => ConfigValue::List(items.iter().map(config_value).collect()),
        Value::Mapping(m) => ConfigValue::Map(config_map(m)),
        // Tags such as `!!str` carry no meaning for comparison.
        Value::Tagged(tagged) => config_value(&tagged.value),
    }
}

fn key_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
