use std::sync::Arc;

use reqwest::header::CONTENT_LOCATION;
use serde_json::Value;
use tracing::error;

use crate::dav::{body, DavTransport};
use crate::events::{Event, Notifier};
use crate::tags::location::parse_id_from_location;
use crate::tags::normalize::parse_tags;
use crate::tags::{CreateTag, Tag};
use crate::{Error, Result};

const SYSTEMTAGS_PATH: &str = "/systemtags";

/// CRUD over the tag vocabulary at `/systemtags`.
///
/// Failures are logged once here and re-signaled as a normalized,
/// operation-specific error; successful mutations publish one domain event.
pub struct TagRepository {
    dav: Arc<dyn DavTransport>,
    notifier: Arc<dyn Notifier>,
}

impl TagRepository {
    pub fn new(dav: Arc<dyn DavTransport>, notifier: Arc<dyn Notifier>) -> Self {
        Self { dav, notifier }
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        match self.fetch_tag_list().await {
            Ok(tags) => Ok(tags),
            Err(error) => {
                error!(%error, "Failed to load tags");
                Err(Error::LoadTags(Box::new(error)))
            }
        }
    }

    pub async fn get_tag(&self, id: i64) -> Result<Tag> {
        match self.fetch_tag(id).await {
            Ok(tag) => Ok(tag),
            Err(error) => {
                error!(%error, "Failed to load tag");
                Err(Error::LoadTag(Box::new(error)))
            }
        }
    }

    /// Create a tag and return the id of the newly created tag.
    ///
    /// The creation response has no usable body; the id is recovered from
    /// its `Content-Location` header.
    pub async fn create_tag(&self, tag: &CreateTag) -> Result<i64> {
        let payload = format_tag(serde_json::to_value(tag)?);
        match self.dav.post(SYSTEMTAGS_PATH, &payload).await {
            Ok(headers) => {
                let location = headers
                    .get(CONTENT_LOCATION)
                    .and_then(|value| value.to_str().ok());
                match location {
                    Some(location) => {
                        self.notifier.emit(Event::TagCreated(tag.clone()));
                        parse_id_from_location(location)
                    }
                    None => {
                        error!("Missing \"Content-Location\" header");
                        Err(Error::MissingContentLocation)
                    }
                }
            }
            Err(error) if error.status() == Some(409) => {
                error!(%error, "A tag with the same name already exists");
                Err(Error::TagNameExists)
            }
            Err(error) => {
                error!(%error, "Failed to create tag");
                Err(Error::CreateTag(Box::new(error)))
            }
        }
    }

    pub async fn update_tag(&self, tag: &Tag) -> Result<()> {
        let path = format!("{SYSTEMTAGS_PATH}/{}", tag.id);
        let body = body::proppatch_update_tag(tag);
        match self.dav.proppatch(&path, &body, None).await {
            Ok(()) => {
                self.notifier.emit(Event::TagUpdated(tag.clone()));
                Ok(())
            }
            Err(error) => {
                error!(%error, "Failed to update tag");
                Err(Error::UpdateTag(Box::new(error)))
            }
        }
    }

    pub async fn delete_tag(&self, tag: &Tag) -> Result<()> {
        let path = format!("{SYSTEMTAGS_PATH}/{}", tag.id);
        match self.dav.delete(&path).await {
            Ok(()) => {
                self.notifier.emit(Event::TagDeleted(tag.clone()));
                Ok(())
            }
            Err(error) => {
                error!(%error, "Failed to delete tag");
                Err(Error::DeleteTag(Box::new(error)))
            }
        }
    }

    async fn fetch_tag_list(&self) -> Result<Vec<Tag>> {
        // the glob filters out the collection root itself
        let resources = self
            .dav
            .propfind(SYSTEMTAGS_PATH, body::TAG_LIST_BODY, Some("/systemtags/*"))
            .await?;
        parse_tags(&resources)
    }

    async fn fetch_tag(&self, id: i64) -> Result<Tag> {
        let path = format!("{SYSTEMTAGS_PATH}/{id}");
        let resource = self.dav.stat(&path, body::TAG_LIST_BODY).await?;
        let mut tags = parse_tags(std::slice::from_ref(&resource))?;
        tags.pop()
            .ok_or_else(|| Error::InvalidData(format!("no tag record at {path}")))
    }
}

/// Rename `displayName` to the wire field `name` for the creation POST.
///
/// Inputs that already carry `name` and no `displayName` pass through
/// unchanged.
pub fn format_tag(mut tag: Value) -> Value {
    let Some(map) = tag.as_object_mut() else {
        return tag;
    };
    if map.contains_key("name") && !map.contains_key("displayName") {
        return tag;
    }
    if let Some(display_name) = map.remove("displayName") {
        map.insert("name".to_string(), display_name);
    }
    tag
}
