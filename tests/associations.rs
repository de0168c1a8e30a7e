mod common;

use std::sync::Arc;

use serde_json::{json, Map};

use common::{FakeReply, FakeTransport};
use davtags::dav::DavResource;
use davtags::tags::{AssociationRepository, ObjectRef, Tag};
use davtags::Error;

fn setup() -> (Arc<FakeTransport>, AssociationRepository) {
    let dav = Arc::new(FakeTransport::new());
    let repo = AssociationRepository::new(dav.clone());
    (dav, repo)
}

fn sample_tag() -> Tag {
    Tag {
        id: 7,
        display_name: "Invoices".to_string(),
        user_visible: true,
        user_assignable: true,
        can_assign: None,
        color: None,
        etag: None,
    }
}

fn association_resource(etag: Option<&str>, object_ids: serde_json::Value) -> DavResource {
    let mut props = Map::new();
    if let Some(etag) = etag {
        props.insert("getetag".to_string(), json!(etag));
    }
    props.insert("object-ids".to_string(), object_ids);
    DavResource {
        path: "/systemtags/7/files".to_string(),
        props,
    }
}

#[tokio::test]
async fn get_returns_etag_and_flattened_objects() {
    let (dav, repo) = setup();
    dav.push(FakeReply::One(association_resource(
        Some("\"abc123\""),
        json!({ "object-id": [101, 205] }),
    )));

    let set = repo.get_objects(&sample_tag(), "files").await.unwrap();
    assert_eq!(set.etag, "\"abc123\"");
    assert_eq!(set.objects, vec![json!(101), json!(205)]);

    let calls = dav.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "STAT");
    assert_eq!(calls[0].path, "/systemtags/7/files");
    assert!(calls[0].body.contains("<nc:object-ids />"));
    assert!(calls[0].body.contains("<d:getetag />"));
}

#[tokio::test]
async fn get_flattens_a_single_entry() {
    let (dav, repo) = setup();
    dav.push(FakeReply::One(association_resource(
        Some("\"abc123\""),
        json!({ "object-id": 101 }),
    )));

    let set = repo.get_objects(&sample_tag(), "files").await.unwrap();
    assert_eq!(set.objects, vec![json!(101)]);
}

#[tokio::test]
async fn get_without_etag_substitutes_the_empty_quoted_token() {
    let (dav, repo) = setup();
    dav.push(FakeReply::One(association_resource(None, json!(""))));

    let set = repo.get_objects(&sample_tag(), "files").await.unwrap();
    assert_eq!(set.etag, "\"\"");
    assert!(set.objects.is_empty());
}

#[tokio::test]
async fn set_sends_the_desired_membership_with_the_token() {
    let (dav, repo) = setup();
    dav.push(FakeReply::Done);

    let objects = vec![ObjectRef::new("101", "file")];
    repo.set_objects(&sample_tag(), "files", &objects, "\"abc123\"")
        .await
        .unwrap();

    let calls = dav.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "PROPPATCH");
    assert_eq!(calls[0].path, "/systemtags/7/files");
    assert_eq!(calls[0].if_match.as_deref(), Some("\"abc123\""));
    assert!(calls[0].body.contains("<d:set>"));
    assert!(!calls[0].body.contains("<d:remove>"));
    assert!(calls[0]
        .body
        .contains("<nc:object-id><nc:id>101</nc:id><nc:type>file</nc:type></nc:object-id>"));
}

#[tokio::test]
async fn clearing_the_set_uses_the_remove_form() {
    let (dav, repo) = setup();
    dav.push(FakeReply::Done);

    repo.set_objects(&sample_tag(), "files", &[], "\"abc123\"")
        .await
        .unwrap();

    let calls = dav.calls();
    assert!(calls[0].body.contains("<d:remove>"));
    assert!(!calls[0].body.contains("<d:set>"));
    assert_eq!(calls[0].if_match.as_deref(), Some("\"abc123\""));
}

#[tokio::test]
async fn write_failures_propagate_unmodified() {
    let (dav, repo) = setup();
    dav.push(FakeReply::Fail(Error::Api {
        code: 412,
        message: "precondition failed".to_string(),
    }));

    let error = repo
        .set_objects(&sample_tag(), "files", &[], "\"stale\"")
        .await
        .unwrap_err();
    // no repository-level wrapping, unlike the tag operations
    assert!(matches!(error, Error::Api { code: 412, .. }));
}

#[tokio::test]
async fn read_failures_propagate_unmodified() {
    let (dav, repo) = setup();
    dav.push(FakeReply::Fail(Error::Api {
        code: 404,
        message: "not found".to_string(),
    }));

    let error = repo.get_objects(&sample_tag(), "files").await.unwrap_err();
    assert!(matches!(error, Error::Api { code: 404, .. }));
}
