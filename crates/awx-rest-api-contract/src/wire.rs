//! Wire encodings used by AWX for fields whose JSON shape differs from the model
//!
//! AWX stores `extra_vars` as a text blob and `job_tags` as a single
//! comma-separated string. Models keep the structured form and use these
//! helpers through `#[serde(with = ...)]` attributes. Decoding is lenient so
//! that objects returned by the API can be read back into a model.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// `extra_vars`: a JSON object sent as JSON text
pub mod json_text {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S>(value: &Map<String, Value>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = serde_json::to_string(value).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Map::new()),
            Value::Object(map) => Ok(map),
            Value::String(text) => parse_text(&text).map_err(D::Error::custom),
            other => Err(D::Error::custom(format!(
                "expected a JSON object or JSON text for extra_vars, got {other}"
            ))),
        }
    }

    /// Parse the text form of `extra_vars`
    ///
    /// AWX returns `""` or the empty YAML document `"---"` for unset variables.
    pub fn parse_text(text: &str) -> Result<Map<String, Value>, String> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "---" {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(format!("extra_vars must be a JSON object, got {other}")),
            Err(e) => Err(format!("extra_vars is not valid JSON: {e}")),
        }
    }
}

/// `job_tags`: a set of tags sent as one comma-separated string
pub mod comma_separated {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S>(tags: &BTreeSet<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let joined = tags.iter().map(String::as_str).collect::<Vec<_>>().join(",");
        serializer.serialize_str(&joined)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(BTreeSet::new()),
            Value::String(text) => Ok(split(&text)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(tag) => Ok(tag),
                    other => Err(D::Error::custom(format!("job tag must be a string, got {other}"))),
                })
                .collect(),
            other => Err(D::Error::custom(format!(
                "expected a comma-separated string for job_tags, got {other}"
            ))),
        }
    }

    /// Split a comma-separated tag list, dropping blanks
    pub fn split(text: &str) -> BTreeSet<String> {
        text.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Decode `null` and `""` as `None`
///
/// AWX reports an unset choice field such as `webhook_service` as an empty
/// string rather than `null`.
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        value => T::deserialize(value).map(Some).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        #[serde(with = "json_text", default)]
        extra_vars: Map<String, Value>,
        #[serde(with = "comma_separated", default)]
        job_tags: BTreeSet<String>,
        #[serde(default, deserialize_with = "empty_as_none")]
        service: Option<String>,
    }

    #[test]
    fn test_extra_vars_sent_as_json_text() {
        let mut extra_vars = Map::new();
        extra_vars.insert("version".into(), json!("1.2.3"));
        let payload = Payload {
            extra_vars,
            job_tags: BTreeSet::new(),
            service: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["extra_vars"], json!("{\"version\":\"1.2.3\"}"));
    }

    #[test]
    fn test_job_tags_joined_with_commas() {
        let payload = Payload {
            extra_vars: Map::new(),
            job_tags: ["deploy", "backup"].iter().map(|s| s.to_string()).collect(),
            service: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["job_tags"], json!("backup,deploy"));
    }

    #[test]
    fn test_decodes_awx_response_shapes() {
        let payload: Payload = serde_json::from_value(json!({
            "extra_vars": "---",
            "job_tags": " deploy, ,backup ",
            "service": ""
        }))
        .unwrap();

        assert!(payload.extra_vars.is_empty());
        assert_eq!(payload.job_tags.len(), 2);
        assert!(payload.job_tags.contains("deploy"));
        assert_eq!(payload.service, None);
    }

    #[test]
    fn test_extra_vars_rejects_non_object_text() {
        assert!(json_text::parse_text("[1, 2]").is_err());
        assert!(json_text::parse_text("key: value").is_err());
        assert_eq!(json_text::parse_text("{\"a\": 1}").unwrap()["a"], json!(1));
    }
}
