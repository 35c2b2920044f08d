//! Version registry lookups

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::version::{newest_release, Version};
use crate::error::UpdateCheckError;

pub const DOCKER_HUB_API: &str = "https://hub.docker.com/v2/repositories";

/// Source of the latest published version
pub trait VersionRegistry: Send {
    fn latest_version(&self) -> Result<Version, UpdateCheckError>;
}

#[derive(Debug, Deserialize)]
struct TagPage {
    #[serde(default)]
    results: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

/// Docker Hub tag listing for one image repository
#[derive(Debug, Clone)]
pub struct DockerHubRegistry {
    image: String,
    base_url: String,
    timeout: Duration,
}

impl DockerHubRegistry {
    pub fn new(image: impl Into<String>, timeout: Duration) -> Self {
        Self {
            image: image.into(),
            base_url: DOCKER_HUB_API.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn tags_url(&self) -> String {
        format!(
            "{}/{}/tags?page_size=100",
            self.base_url.trim_end_matches('/'),
            self.image
        )
    }

    async fn fetch_latest(&self) -> Result<Version, UpdateCheckError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let url = self.tags_url();
        tracing::debug!(%url, "querying registry for newer release");

        let page: TagPage = client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        latest_from_page(&page, &self.image)
    }
}

fn latest_from_page(page: &TagPage, image: &str) -> Result<Version, UpdateCheckError> {
    newest_release(page.results.iter().map(|tag| tag.name.as_str())).ok_or_else(|| {
        UpdateCheckError::NoReleases {
            image: image.to_string(),
        }
    })
}

impl VersionRegistry for DockerHubRegistry {
    /// Runs the request on a private current-thread runtime owned by the caller's thread
    fn latest_version(&self) -> Result<Version, UpdateCheckError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(UpdateCheckError::Runtime)?;

        runtime.block_on(self.fetch_latest())
    }
}
