//! Result model shared by all probes
//!
//! Every probe execution produces exactly one [`ProbeResult`]: a status
//! classification, a human-readable description, and an insertion-ordered
//! map of structured details.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::time::Duration;

use crate::registry::ProbeKind;

/// Placeholder for absent header/field values
pub const ABSENT: &str = "N/A";

/// Classification of a single probe outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No issue found
    Ok,
    /// Non-fatal concern
    Warning,
    /// Check could not complete or found a genuine problem
    Fail,
    /// Placeholder synthesized by callers before results arrive;
    /// the engine never emits this
    Pending,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Warning => write!(f, "warning"),
            Self::Fail => write!(f, "fail"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

/// A single detail value: string, integer, boolean, or list of strings
///
/// Deliberately closed - no nested objects, so the serialized shape is
/// exactly predictable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DetailValue {
    /// Free-form text
    Text(String),
    /// Counter, byte size, or status code
    Int(u64),
    /// Flag
    Bool(bool),
    /// Ordered list of strings (DNS records, redirect chains, ...)
    List(Vec<String>),
}

impl From<&str> for DetailValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DetailValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u64> for DetailValue {
    fn from(value: u64) -> Self {
        Self::Int(value)
    }
}

impl From<u16> for DetailValue {
    fn from(value: u16) -> Self {
        Self::Int(u64::from(value))
    }
}

impl From<bool> for DetailValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for DetailValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// String-keyed map of probe details, preserved in insertion order
///
/// Serializes as a JSON object with keys in the order they were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Details {
    entries: Vec<(String, DetailValue)>,
}

impl Details {
    /// Create an empty detail map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key/value pair
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<DetailValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Append a key/value pair, builder-style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DetailValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&DetailValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DetailValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for Details {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Outcome of one probe execution
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    /// Identifier of the probe that produced this result
    pub id: String,
    /// Display name of the probe
    pub name: String,
    /// Status classification
    pub status: Status,
    /// Human-readable summary
    pub description: String,
    /// Structured details, insertion-ordered
    pub details: Details,
}

impl ProbeResult {
    /// Create a result for the given probe kind
    pub fn new(
        kind: ProbeKind,
        status: Status,
        description: impl Into<String>,
        details: Details,
    ) -> Self {
        Self {
            id: kind.id().to_string(),
            name: kind.display_name().to_string(),
            status,
            description: description.into(),
            details,
        }
    }

    /// Create a `fail` result carrying an error message in `details.error`
    pub fn failure(kind: ProbeKind, description: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(
            kind,
            Status::Fail,
            description,
            Details::new().with("error", error.into()),
        )
    }

    /// Create the `fail` result for a probe that exceeded its deadline
    pub fn timeout(kind: ProbeKind, deadline: Duration) -> Self {
        let details = Details::new()
            .with(
                "error",
                format!("Probe did not complete within {}s.", deadline.as_secs()),
            )
            .with("timeout", true);
        Self::new(kind, Status::Fail, "Probe timed out.", details)
    }

    /// Create the synthetic result emitted when a probe escapes its
    /// no-throw contract entirely (e.g. its task panicked)
    pub fn runner_failure(error: impl Into<String>) -> Self {
        Self {
            id: "unknown".to_string(),
            name: "Unknown Test".to_string(),
            status: Status::Fail,
            description: "Test runner failed.".to_string(),
            details: Details::new().with("error", error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_preserve_insertion_order() {
        let details = Details::new()
            .with("zulu", "z")
            .with("alpha", "a")
            .with("mike", 3u64);

        let keys: Vec<&str> = details.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn details_serialize_in_order() {
        let details = Details::new()
            .with("b_second", 2u64)
            .with("a_first", "one")
            .with("c_third", true);

        let json = serde_json::to_string(&details).unwrap();
        assert_eq!(json, r#"{"b_second":2,"a_first":"one","c_third":true}"#);
    }

    #[test]
    fn detail_value_variants_serialize() {
        let details = Details::new()
            .with("text", "hello")
            .with("int", 42u64)
            .with("bool", false)
            .with("list", vec!["a".to_string(), "b".to_string()]);

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["text"], "hello");
        assert_eq!(json["int"], 42);
        assert_eq!(json["bool"], false);
        assert_eq!(json["list"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Status::Ok).unwrap(), r#""ok""#);
        assert_eq!(
            serde_json::to_string(&Status::Warning).unwrap(),
            r#""warning""#
        );
        assert_eq!(serde_json::to_string(&Status::Fail).unwrap(), r#""fail""#);
        assert_eq!(
            serde_json::to_string(&Status::Pending).unwrap(),
            r#""pending""#
        );
    }

    #[test]
    fn probe_result_serializes_expected_shape() {
        let result = ProbeResult::new(
            ProbeKind::HttpInspector,
            Status::Ok,
            "Request completed with status 200.",
            Details::new().with("status", 200u64),
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["id"], "http-inspector");
        assert_eq!(json["name"], "HTTP Inspector");
        assert_eq!(json["status"], "ok");
        assert_eq!(json["details"]["status"], 200);
    }

    #[test]
    fn runner_failure_shape() {
        let result = ProbeResult::runner_failure("task panicked");
        assert_eq!(result.id, "unknown");
        assert_eq!(result.status, Status::Fail);
        assert_eq!(result.description, "Test runner failed.");
        assert_eq!(
            result.details.get("error"),
            Some(&DetailValue::Text("task panicked".to_string()))
        );
    }

    #[test]
    fn timeout_result_carries_flag() {
        let result = ProbeResult::timeout(ProbeKind::DnsResolver, Duration::from_secs(5));
        assert_eq!(result.id, "dns-resolver");
        assert_eq!(result.status, Status::Fail);
        assert_eq!(result.details.get("timeout"), Some(&DetailValue::Bool(true)));
    }
}
