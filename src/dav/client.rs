use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, IF_MATCH};
use reqwest::{Client, Method, RequestBuilder};
use url::Url;

use crate::dav::multistatus::{parse_multistatus, DavResource};
use crate::{Error, Result};

const XML_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// One DAV round trip against the collection root.
///
/// The transport performs no interpretation of status codes beyond
/// success/failure; that is the repositories' job.
#[async_trait]
pub trait DavTransport: Send + Sync {
    /// PROPFIND with `Depth: 1`, optionally filtered to paths matching `glob`.
    async fn propfind(
        &self,
        path: &str,
        body: &str,
        glob: Option<&str>,
    ) -> Result<Vec<DavResource>>;

    /// Single-resource PROPFIND (`Depth: 0`).
    async fn stat(&self, path: &str, body: &str) -> Result<DavResource>;

    /// POST a JSON body; the interesting part of the response is its headers.
    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<HeaderMap>;

    /// PROPPATCH, with an `If-Match` precondition when `if_match` is given.
    async fn proppatch(&self, path: &str, body: &str, if_match: Option<&str>) -> Result<()>;

    async fn delete(&self, path: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct DavClient {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl DavClient {
    pub fn new(endpoint: &str, dav_root: &str, username: &str, password: &str) -> Result<Self> {
        let base_url = Url::parse(&format!(
            "{}/{}/",
            endpoint.trim_end_matches('/'),
            dav_root.trim_matches('/')
        ))?;

        let mut headers = HeaderMap::new();
        // so the server knows it is a request from a client, not a form post
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url_for(path)?;
        Ok(self
            .client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password)))
    }

    /// Hrefs come back absolute; strip the collection root so callers see
    /// the same relative paths they asked for.
    fn relative_path(&self, href: &str) -> String {
        let root = self.base_url.path().trim_end_matches('/');
        match href.strip_prefix(root) {
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            _ => href.to_string(),
        }
    }

    async fn send_propfind(&self, path: &str, body: &str, depth: &str) -> Result<Vec<DavResource>> {
        let response = self
            .request(dav_method("PROPFIND")?, path)?
            .header("Depth", depth)
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body.to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                code: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let text = response.text().await?;
        Ok(parse_multistatus(&text)?
            .into_iter()
            .map(|mut resource| {
                resource.path = self.relative_path(&resource.path);
                resource
            })
            .collect())
    }
}

#[async_trait]
impl DavTransport for DavClient {
    async fn propfind(
        &self,
        path: &str,
        body: &str,
        glob: Option<&str>,
    ) -> Result<Vec<DavResource>> {
        let mut resources = self.send_propfind(path, body, "1").await?;
        if let Some(pattern) = glob {
            let matcher = glob_to_regex(pattern)?;
            resources.retain(|resource| matcher.is_match(resource.path.trim_end_matches('/')));
        }
        Ok(resources)
    }

    async fn stat(&self, path: &str, body: &str) -> Result<DavResource> {
        self.send_propfind(path, body, "0")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidData("empty multistatus response".to_string()))
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<HeaderMap> {
        let response = self
            .request(Method::POST, path)?
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                code: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.headers().clone())
    }

    async fn proppatch(&self, path: &str, body: &str, if_match: Option<&str>) -> Result<()> {
        let mut request = self
            .request(dav_method("PROPPATCH")?, path)?
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body.to_string());

        if let Some(etag) = if_match {
            let value = HeaderValue::from_str(etag)
                .map_err(|_| Error::InvalidData(format!("invalid If-Match value: {etag}")))?;
            request = request.header(IF_MATCH, value);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                code: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let response = self.request(Method::DELETE, path)?.send().await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                code: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}

fn dav_method(name: &str) -> Result<Method> {
    Method::from_bytes(name.as_bytes())
        .map_err(|_| Error::InvalidData(format!("invalid HTTP method: {name}")))
}

/// Compile a path glob into a matcher; `*` matches one non-empty segment.
fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut regex = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => regex.push_str("[^/]+"),
            c if "\\.+()|[]{}^$?".contains(c) => {
                regex.push('\\');
                regex.push(c);
            }
            c => regex.push(c),
        }
    }
    regex.push('$');
    Regex::new(&regex).map_err(|e| Error::InvalidData(format!("invalid glob pattern: {e}")))
}
