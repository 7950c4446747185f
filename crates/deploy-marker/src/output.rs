// Copyright 2026 Oxide Computer Company

//! The JSON document printed by the `out` script.

use serde::Serialize;
use serde_json::Value;

/// The `ref` reported when the deployments API did not return an id.
pub const MISSING_REF: &str = "None";

/// The version produced by a put step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Version {
    /// The deployment id assigned by New Relic.
    #[serde(rename = "ref")]
    pub reference: String,
}

/// What the `out` script prints on success.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceOutput {
    /// The version Concourse records for this put.
    pub version: Version,
    /// The raw API response, or nothing if the response was empty.
    pub metadata: Vec<Value>,
}

/// Builds the output document from the deployments API response.
///
/// The version ref is `response.deployment.id` (strings as-is, anything
/// else in its JSON form), or `"None"` if there is no such id. An empty
/// response (`null`, `{}`, `[]`, `""`, `0`, `false`) yields no metadata.
///
/// ```
/// use deploy_marker::build_output;
/// use serde_json::json;
///
/// let output = build_output(&json!({"deployment": {"id": 42}}));
/// assert_eq!(output.version.reference, "42");
/// assert_eq!(output.metadata, vec![json!({"deployment": {"id": 42}})]);
/// ```
pub fn build_output(response: &Value) -> ResourceOutput {
    if is_empty(response) {
        return ResourceOutput {
            version: Version { reference: MISSING_REF.to_owned() },
            metadata: Vec::new(),
        };
    }

    let reference = match response.pointer("/deployment/id") {
        None | Some(Value::Null) => MISSING_REF.to_owned(),
        Some(Value::String(id)) => id.clone(),
        Some(id) => id.to_string(),
    };

    ResourceOutput {
        version: Version { reference },
        metadata: vec![response.clone()],
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
