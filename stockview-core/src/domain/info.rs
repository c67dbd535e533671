//! InfoRecord: the provider's descriptive key/value record for a security.
//!
//! Coverage varies by security and by provider, so every lookup is total:
//! an absent key reads as [`InfoValue::Missing`].

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Raw field value as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum InfoValue {
    Text(String),
    Number(f64),
    #[default]
    Missing,
}

impl From<serde_json::Value> for InfoValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => InfoValue::Text(s),
            serde_json::Value::Number(n) => n.as_f64().map_or(InfoValue::Missing, InfoValue::Number),
            serde_json::Value::Bool(b) => InfoValue::Number(if b { 1.0 } else { 0.0 }),
            _ => InfoValue::Missing,
        }
    }
}

impl<'de> Deserialize<'de> for InfoValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(InfoValue::from)
    }
}

impl From<f64> for InfoValue {
    fn from(v: f64) -> Self {
        InfoValue::Number(v)
    }
}

impl From<&str> for InfoValue {
    fn from(v: &str) -> Self {
        InfoValue::Text(v.to_string())
    }
}

impl<T: Into<InfoValue>> From<Option<T>> for InfoValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(InfoValue::Missing, Into::into)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InfoRecord {
    fields: BTreeMap<String, InfoValue>,
}

static MISSING: InfoValue = InfoValue::Missing;

impl InfoRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<InfoValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<InfoValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> &InfoValue {
        self.fields.get(key).unwrap_or(&MISSING)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            InfoValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, InfoValue)> for InfoRecord {
    fn from_iter<I: IntoIterator<Item = (String, InfoValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_reads_as_missing() {
        let record = InfoRecord::new().with("sector", "Technology");
        assert_eq!(record.get("beta"), &InfoValue::Missing);
        assert_eq!(record.text("sector"), Some("Technology"));
        assert_eq!(record.text("beta"), None);
    }

    #[test]
    fn deserializes_mixed_json_values() {
        let record: InfoRecord = serde_json::from_str(
            r#"{"longName":"Apple Inc.","marketCap":3.1e12,"beta":null,"flag":true,"nested":{"raw":1}}"#,
        )
        .unwrap();
        assert_eq!(record.get("longName"), &InfoValue::Text("Apple Inc.".into()));
        assert_eq!(record.get("marketCap"), &InfoValue::Number(3.1e12));
        assert_eq!(record.get("beta"), &InfoValue::Missing);
        assert_eq!(record.get("flag"), &InfoValue::Number(1.0));
        assert_eq!(record.get("nested"), &InfoValue::Missing);
    }

    #[test]
    fn option_converts_to_missing() {
        let record = InfoRecord::new().with("trailingPE", None::<f64>);
        assert_eq!(record.get("trailingPE"), &InfoValue::Missing);
        assert_eq!(record.len(), 1);
    }
}
