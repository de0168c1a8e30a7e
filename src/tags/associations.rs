use std::sync::Arc;

use serde_json::Value;

use crate::dav::{body, DavTransport};
use crate::tags::{AssociationSet, ObjectRef, Tag};
use crate::Result;

/// Read and replace the object-association set of a tag.
///
/// Unlike [`TagRepository`](crate::tags::TagRepository), failures propagate
/// unmodified: no logging, no wrapping, no events.
pub struct AssociationRepository {
    dav: Arc<dyn DavTransport>,
}

impl AssociationRepository {
    pub fn new(dav: Arc<dyn DavTransport>) -> Self {
        Self { dav }
    }

    /// Current membership of the association set, scoped by association
    /// type (e.g. `files`), plus its concurrency token.
    pub async fn get_objects(&self, tag: &Tag, kind: &str) -> Result<AssociationSet> {
        let path = format!("/systemtags/{}/{}", tag.id, kind);
        let resource = self.dav.stat(&path, body::OBJECT_IDS_BODY).await?;

        // a set that was never written has no etag yet
        let etag = match resource.props.get("getetag") {
            Some(Value::String(etag)) if !etag.is_empty() => etag.clone(),
            _ => String::from("\"\""),
        };
        let objects = flatten_object_ids(resource.props.get("object-ids"));
        Ok(AssociationSet { etag, objects })
    }

    /// Replace the full membership of the association set.
    ///
    /// This overwrites whatever is on the server. The caller must pass the
    /// etag observed on the last read; the server rejects writes against a
    /// stale token.
    pub async fn set_objects(
        &self,
        tag: &Tag,
        kind: &str,
        objects: &[ObjectRef],
        etag: &str,
    ) -> Result<()> {
        let path = format!("/systemtags/{}/{}", tag.id, kind);
        let body = body::proppatch_set_object_ids(objects);
        self.dav.proppatch(&path, &body, Some(etag)).await
    }
}

/// The `object-ids` property holds one entry or a list; flatten either into
/// a plain list of values.
fn flatten_object_ids(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Object(map)) => map
            .values()
            .flat_map(|entry| match entry {
                Value::Array(items) => items.clone(),
                other => vec![other.clone()],
            })
            .collect(),
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flatten_handles_single_and_multiple_entries() {
        let single = json!({ "object-id": 101 });
        assert_eq!(flatten_object_ids(Some(&single)), vec![json!(101)]);

        let multiple = json!({ "object-id": [101, 205] });
        assert_eq!(
            flatten_object_ids(Some(&multiple)),
            vec![json!(101), json!(205)]
        );
    }

    #[test]
    fn flatten_treats_missing_or_empty_as_no_objects() {
        assert!(flatten_object_ids(None).is_empty());
        // an empty <object-ids/> element parses as an empty string
        assert!(flatten_object_ids(Some(&json!(""))).is_empty());
    }
}
