//! Mapping from raw DAV property names to the canonical tag schema.

use serde_json::{Map, Value};

use crate::dav::DavResource;
use crate::tags::Tag;
use crate::Result;

/// Canonical field name for a raw DAV property key.
///
/// Known keys map to their camel-case form; every other key (`id`, `color`,
/// `getetag`, `object-ids`, ...) passes through unchanged.
pub fn canonical_field(key: &str) -> &str {
    match key {
        "display-name" => "displayName",
        "user-visible" => "userVisible",
        "user-assignable" => "userAssignable",
        "can-assign" => "canAssign",
        other => other,
    }
}

/// Remap one raw property map into the canonical schema.
///
/// Only the `displayName` value is touched: the server may deliver it as a
/// richer node, so it is coerced to a string. Everything else passes through
/// as-is.
pub fn normalize_props(props: &Map<String, Value>) -> Map<String, Value> {
    props
        .iter()
        .map(|(key, value)| {
            let field = canonical_field(key);
            let value = if field == "displayName" {
                Value::String(stringify(value))
            } else {
                value.clone()
            };
            (field.to_string(), value)
        })
        .collect()
}

/// Normalize raw multistatus records into tag records.
pub fn parse_tags(resources: &[DavResource]) -> Result<Vec<Tag>> {
    resources
        .iter()
        .map(|resource| {
            let props = normalize_props(&resource.props);
            Ok(serde_json::from_value(Value::Object(props))?)
        })
        .collect()
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
