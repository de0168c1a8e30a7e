//! Helpers for the tag list cached on a file node.
//!
//! This is UI-side bookkeeping, not part of the DAV flow: the attribute
//! mirrors what the server last reported, and rewriting it notifies other
//! views of the same node.

use serde_json::{json, Value};

use crate::events::{Event, Notifier};
use crate::tags::Node;

/// Tag names cached on a node's `system-tags` attribute.
///
/// The attribute holds one entry or a list, each either a plain string or a
/// parsed prop object whose `text` field carries the name.
pub fn node_system_tags(node: &Node) -> Vec<String> {
    let attribute = node
        .attributes
        .get("system-tags")
        .and_then(|tags| tags.get("system-tag"));
    let Some(attribute) = attribute else {
        return Vec::new();
    };
    let entries = match attribute {
        Value::Array(entries) => entries.clone(),
        single => vec![single.clone()],
    };
    entries
        .iter()
        .filter_map(|entry| match entry {
            Value::String(name) => Some(name.clone()),
            Value::Object(props) => props.get("text").and_then(Value::as_str).map(str::to_owned),
            _ => None,
        })
        .collect()
}

/// Rewrite the cached tag list and broadcast the change.
pub fn set_node_system_tags(node: &mut Node, tags: Vec<String>, notifier: &dyn Notifier) {
    node.attributes
        .insert("system-tags".to_string(), json!({ "system-tag": tags }));
    notifier.emit(Event::NodeUpdated(node.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<Event>>,
    }

    impl Notifier for RecordingNotifier {
        fn emit(&self, event: Event) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn node_with_attribute(attribute: Value) -> Node {
        let mut attributes = Map::new();
        attributes.insert("system-tags".to_string(), json!({ "system-tag": attribute }));
        Node {
            path: "/files/admin/report.pdf".to_string(),
            attributes,
        }
    }

    #[test]
    fn missing_attribute_means_no_tags() {
        let node = Node {
            path: "/files/admin/report.pdf".to_string(),
            attributes: Map::new(),
        };
        assert!(node_system_tags(&node).is_empty());
    }

    #[test]
    fn single_string_entry() {
        let node = node_with_attribute(json!("Invoices"));
        assert_eq!(node_system_tags(&node), vec!["Invoices"]);
    }

    #[test]
    fn prop_objects_yield_their_text() {
        let node = node_with_attribute(json!([
            "Invoices",
            { "text": "Archive", "can-assign": true },
        ]));
        assert_eq!(node_system_tags(&node), vec!["Invoices", "Archive"]);
    }

    #[test]
    fn set_rewrites_attribute_and_emits() {
        let notifier = RecordingNotifier::default();
        let mut node = node_with_attribute(json!("Old"));

        set_node_system_tags(&mut node, vec!["Invoices".to_string()], &notifier);

        assert_eq!(node_system_tags(&node), vec!["Invoices"]);
        let events = notifier.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "node:updated");
    }
}
