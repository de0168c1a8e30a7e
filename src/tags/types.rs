use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry in the tag vocabulary.
///
/// The id is server-assigned and immutable; `can_assign` is computed by the
/// server for the requesting user and is not writable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "userVisible")]
    pub user_visible: bool,
    #[serde(rename = "userAssignable")]
    pub user_assignable: bool,
    #[serde(rename = "canAssign", default, skip_serializing_if = "Option::is_none")]
    pub can_assign: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "getetag", default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// Input for tag creation; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTag {
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "userVisible")]
    pub user_visible: bool,
    #[serde(rename = "userAssignable")]
    pub user_assignable: bool,
    #[serde(rename = "canAssign", default, skip_serializing_if = "Option::is_none")]
    pub can_assign: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CreateTag {
    /// New tag with the default visibility flags.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            user_visible: true,
            user_assignable: true,
            can_assign: Some(true),
            color: None,
        }
    }
}

/// Reference to one tagged object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ObjectRef {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }
}

/// Full membership of a tag's association set for one association type.
///
/// The etag is an opaque concurrency token for the whole set; it must be
/// passed back unmodified on the next write.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationSet {
    pub etag: String,
    pub objects: Vec<Value>,
}

/// Locally-cached view of a file node and its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub path: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}
