//! Plain-HTTP endpoints that sit next to the DAV collection.

use reqwest::Client;
use serde_json::{json, Value};
use tracing::error;
use url::Url;

use crate::{Error, Result};

const APP_ID: &str = "systemtags";
const RESTRICT_CREATION_KEY: &str = "restrict_creation_to_admin";

#[derive(Debug, Clone)]
pub struct RestApi {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl RestApi {
    pub fn new(endpoint: &str, username: &str, password: &str) -> Result<Self> {
        let base_url = Url::parse(&format!("{}/", endpoint.trim_end_matches('/')))?;
        Ok(Self {
            client: Client::new(),
            base_url,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Toggle whether tag creation is restricted to administrators.
    ///
    /// Writes the app config value through the provisioning endpoint; shares
    /// no state with the tag or association paths.
    pub async fn set_creation_restricted_to_admin(&self, enabled: bool) -> Result<Value> {
        let value = if enabled { "1" } else { "0" };
        let url = self.base_url.join(&format!(
            "ocs/v2.php/apps/provisioning_api/api/v1/config/apps/{APP_ID}/{RESTRICT_CREATION_KEY}"
        ))?;
        let response = self
            .client
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .header("OCS-APIRequest", "true")
            .json(&json!({ "value": value }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                code: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }

    /// Ids of the tags the user attached most recently.
    pub async fn last_used_tag_ids(&self) -> Result<Vec<i64>> {
        match self.fetch_last_used().await {
            Ok(ids) => Ok(ids),
            Err(error) => {
                error!(%error, "Failed to load last used tags");
                Err(Error::LoadLastUsedTags(Box::new(error)))
            }
        }
    }

    async fn fetch_last_used(&self) -> Result<Vec<i64>> {
        let url = self.base_url.join("index.php/apps/systemtags/lastused")?;
        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                code: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        // the endpoint reports ids as strings
        let ids: Vec<String> = response.json().await?;
        Ok(ids.iter().filter_map(|id| id.parse::<i64>().ok()).collect())
    }
}
