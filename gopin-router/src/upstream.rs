//! Fetching the live ref advertisement of a repository.

use async_trait::async_trait;
use gopin_refs::Advertisement;
use gopin_semver::CandidateSet;
use tracing::debug;

use crate::{Error, Result, RouterOptions};

/// A repository's advertisement together with the candidates derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRefs {
    /// The advertisement as received.
    pub advertisement: Advertisement,
    /// The versions found among its tags and branches.
    pub candidates: CandidateSet,
}

impl UpstreamRefs {
    /// Derive the candidates of `advertisement`.
    pub fn new(advertisement: Advertisement) -> Self {
        let candidates = CandidateSet::from_refs(advertisement.refs());
        Self {
            advertisement,
            candidates,
        }
    }

    /// Parse `data` as an advertisement and derive its candidates.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Ok(Self::new(Advertisement::from_bytes(data)?))
    }
}

/// Where dispatch gets ref advertisements from.
#[async_trait]
pub trait RefSource: Send + Sync {
    /// Fetch the current refs of `author/repo`.
    async fn fetch_refs(&self, author: &str, repo: &str) -> Result<UpstreamRefs>;
}

/// Fetches advertisements from GitHub over smart HTTP.
#[derive(Debug, Clone)]
pub struct GithubRefSource {
    client: reqwest::Client,
    base_url: String,
}

impl GithubRefSource {
    /// Create a source using the GitHub URL, timeout and user agent of `options`.
    pub fn new(options: &RouterOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.fetch_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: options.github_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The URL the advertisement of `author/repo` is fetched from.
    pub fn refs_url(&self, author: &str, repo: &str) -> String {
        format!("{}/{author}/{repo}.git/info/refs?service=git-upload-pack", self.base_url)
    }
}

#[async_trait]
impl RefSource for GithubRefSource {
    async fn fetch_refs(&self, author: &str, repo: &str) -> Result<UpstreamRefs> {
        let url = self.refs_url(author, repo);
        debug!(%url, "fetching refs");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                url,
            });
        }
        let data = response.bytes().await?;
        let refs = UpstreamRefs::from_bytes(data.to_vec())?;
        debug!(
            refs = refs.advertisement.refs().len(),
            candidates = refs.candidates.len(),
            "fetched refs"
        );
        Ok(refs)
    }
}
