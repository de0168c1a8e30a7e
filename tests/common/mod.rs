#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;

use davtags::dav::{DavResource, DavTransport};
use davtags::events::{Event, Notifier};
use davtags::{Error, Result};

/// One recorded DAV round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub path: String,
    pub body: String,
    pub if_match: Option<String>,
}

/// Scripted reply for the next transport call.
pub enum FakeReply {
    List(Vec<DavResource>),
    One(DavResource),
    Headers(HeaderMap),
    Done,
    Fail(Error),
}

/// Transport double that replays a script and records every call.
#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<FakeReply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: FakeReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &str, path: &str, body: String, if_match: Option<&str>) {
        self.calls.lock().unwrap().push(RecordedCall {
            method: method.to_string(),
            path: path.to_string(),
            body,
            if_match: if_match.map(str::to_owned),
        });
    }

    fn next(&self) -> FakeReply {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport script exhausted")
    }
}

#[async_trait]
impl DavTransport for FakeTransport {
    async fn propfind(
        &self,
        path: &str,
        body: &str,
        _glob: Option<&str>,
    ) -> Result<Vec<DavResource>> {
        self.record("PROPFIND", path, body.to_string(), None);
        match self.next() {
            FakeReply::List(resources) => Ok(resources),
            FakeReply::Fail(error) => Err(error),
            _ => panic!("unexpected reply for PROPFIND"),
        }
    }

    async fn stat(&self, path: &str, body: &str) -> Result<DavResource> {
        self.record("STAT", path, body.to_string(), None);
        match self.next() {
            FakeReply::One(resource) => Ok(resource),
            FakeReply::Fail(error) => Err(error),
            _ => panic!("unexpected reply for stat"),
        }
    }

    async fn post(&self, path: &str, body: &Value) -> Result<HeaderMap> {
        self.record("POST", path, body.to_string(), None);
        match self.next() {
            FakeReply::Headers(headers) => Ok(headers),
            FakeReply::Fail(error) => Err(error),
            _ => panic!("unexpected reply for POST"),
        }
    }

    async fn proppatch(&self, path: &str, body: &str, if_match: Option<&str>) -> Result<()> {
        self.record("PROPPATCH", path, body.to_string(), if_match);
        match self.next() {
            FakeReply::Done => Ok(()),
            FakeReply::Fail(error) => Err(error),
            _ => panic!("unexpected reply for PROPPATCH"),
        }
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.record("DELETE", path, String::new(), None);
        match self.next() {
            FakeReply::Done => Ok(()),
            FakeReply::Fail(error) => Err(error),
            _ => panic!("unexpected reply for DELETE"),
        }
    }
}

/// Notifier double collecting every published event.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<Event>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn emit(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}
