//! Registry client
//!
//! Read-only access to the Docker Hub tags API. The pipeline only talks to
//! the [`RegistryClient`] trait so tests can substitute an in-memory registry.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::config;
use crate::error::{Result, ScanError};
use crate::images::TagManifest;
use crate::log_debug;

const MODULE: &str = "registry";

/// Outcome of a tag lookup that did not fail
#[derive(Debug, Clone)]
pub enum TagLookup {
    Found(TagManifest),
    NotFound,
}

/// Source of tag metadata
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Fetch the tag document of `org/repo:tag`
    async fn tag_metadata(&self, org: &str, repo: &str, tag: &str) -> Result<TagLookup>;

    /// Check whether `org/repo:tag` exists
    async fn tag_exists(&self, org: &str, repo: &str, tag: &str) -> Result<bool> {
        Ok(matches!(
            self.tag_metadata(org, repo, tag).await?,
            TagLookup::Found(_)
        ))
    }
}

/// How a registry status code is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusClass {
    Found,
    NotFound,
    Unexpected,
}

fn classify_status(status: StatusCode) -> StatusClass {
    if status.is_success() {
        StatusClass::Found
    } else if status == StatusCode::NOT_FOUND {
        StatusClass::NotFound
    } else {
        StatusClass::Unexpected
    }
}

/// Docker Hub implementation of [`RegistryClient`]
pub struct DockerHubClient {
    client: Client,
    base_url: String,
}

impl DockerHubClient {
    /// Create a client for the given API base URL
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://hub.docker.com`
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config::app::USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn tag_url(&self, org: &str, repo: &str, tag: &str) -> String {
        format!(
            "{}/v2/repositories/{}/{}/tags/{}",
            self.base_url, org, repo, tag
        )
    }

    async fn get(&self, org: &str, repo: &str, tag: &str) -> Result<(StatusClass, reqwest::Response)> {
        let url = self.tag_url(org, repo, tag);
        log_debug!(MODULE, "GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        log_debug!(MODULE, "HTTP Status Code: {}", status.as_u16());

        match classify_status(status) {
            StatusClass::Unexpected => Err(ScanError::UnexpectedStatus {
                image: format!("{}/{}:{}", org, repo, tag),
                status: status.as_u16(),
            }),
            class => Ok((class, response)),
        }
    }
}

#[async_trait]
impl RegistryClient for DockerHubClient {
    async fn tag_metadata(&self, org: &str, repo: &str, tag: &str) -> Result<TagLookup> {
        let (class, response) = self.get(org, repo, tag).await?;
        if class == StatusClass::NotFound {
            return Ok(TagLookup::NotFound);
        }

        let body = response.bytes().await?;
        let manifest: TagManifest = serde_json::from_slice(&body)?;
        Ok(TagLookup::Found(manifest))
    }

    // Status only; the body is dropped unread
    async fn tag_exists(&self, org: &str, repo: &str, tag: &str) -> Result<bool> {
        let (class, _) = self.get(org, repo, tag).await?;
        if class == StatusClass::NotFound {
            log_debug!(MODULE, "Image {}/{}:{} does not exist", org, repo, tag);
        }
        Ok(class == StatusClass::Found)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory registry for pipeline tests

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Canned response for one `org/repo:tag`
    #[derive(Debug, Clone)]
    pub enum FakeTag {
        Manifest(TagManifest),
        Status(u16),
    }

    /// Registry answering from a fixed table; unknown tags are 404
    #[derive(Default)]
    pub struct FakeRegistry {
        tags: HashMap<String, FakeTag>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeRegistry {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_tag(mut self, reference: &str, tag: FakeTag) -> Self {
            self.tags.insert(reference.to_string(), tag);
            self
        }

        /// Every reference requested so far, in request order
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl RegistryClient for FakeRegistry {
        async fn tag_metadata(&self, org: &str, repo: &str, tag: &str) -> Result<TagLookup> {
            let reference = format!("{}/{}:{}", org, repo, tag);
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(reference.clone());
            }

            match self.tags.get(&reference) {
                Some(FakeTag::Manifest(manifest)) => Ok(TagLookup::Found(manifest.clone())),
                Some(FakeTag::Status(404)) | None => Ok(TagLookup::NotFound),
                Some(FakeTag::Status(status)) => Err(ScanError::UnexpectedStatus {
                    image: reference,
                    status: *status,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(StatusCode::OK), StatusClass::Found);
        assert_eq!(classify_status(StatusCode::NO_CONTENT), StatusClass::Found);
        assert_eq!(classify_status(StatusCode::NOT_FOUND), StatusClass::NotFound);
        assert_eq!(classify_status(StatusCode::TOO_MANY_REQUESTS), StatusClass::Unexpected);
        assert_eq!(classify_status(StatusCode::BAD_GATEWAY), StatusClass::Unexpected);
    }

    #[test]
    fn test_tag_url() {
        let client = DockerHubClient::new("https://hub.docker.com/", Duration::from_secs(5))
            .expect("client");
        assert_eq!(
            client.tag_url("adoptopenjdk", "openjdk8-openj9", "jdk8u-ubi-nightly"),
            "https://hub.docker.com/v2/repositories/adoptopenjdk/openjdk8-openj9/tags/jdk8u-ubi-nightly"
        );
    }

    #[test]
    fn test_parse_tag_document() {
        let body = r#"{
            "name": "jdk8u-alpine-nightly",
            "last_updated": "2020-05-04T10:11:12.345678Z",
            "images": [{"architecture": "amd64", "os": "linux"}, {"architecture": "arm64"}]
        }"#;
        let manifest: TagManifest = serde_json::from_str(body).expect("parse");
        assert_eq!(manifest.last_updated.as_deref(), Some("2020-05-04T10:11:12.345678Z"));
        assert_eq!(manifest.images.map(|i| i.len()), Some(2));
    }

    #[tokio::test]
    async fn test_default_tag_exists_uses_metadata() {
        use testing::{FakeRegistry, FakeTag};

        let registry = FakeRegistry::new()
            .with_tag("org/repo:there", FakeTag::Manifest(TagManifest::default()))
            .with_tag("org/repo:broken", FakeTag::Status(500));

        assert!(registry.tag_exists("org", "repo", "there").await.expect("exists"));
        assert!(!registry.tag_exists("org", "repo", "missing").await.expect("missing"));
        assert!(matches!(
            registry.tag_exists("org", "repo", "broken").await,
            Err(ScanError::UnexpectedStatus { status: 500, .. })
        ));
    }
}
