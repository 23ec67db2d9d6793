//! Configuration management for the router

use crate::{Error, Result};
use std::net::SocketAddr;
use std::time::Duration;

/// Ref name the advertisement is rewritten around for commit-pinned requests.
pub const SYNTHETIC_TAG: &str = "refs/tags/thisisnotathinginanyrepo";

/// Configuration options for the router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterOptions {
    /// Address the HTTP service listens on
    pub listen: SocketAddr,

    /// Public domain of this proxy, used in go-get import paths
    pub domain: String,

    /// Development mode, which advertises `http` instead of `https` to `go get`
    pub dev: bool,

    /// Base URL of GitHub, for ref fetches and upload-pack redirects
    pub github_url: String,

    /// Timeout for upstream ref fetches
    pub fetch_timeout: Duration,

    /// Ref name used when virtualizing around a literal commit id
    pub synthetic_tag: String,

    /// User agent of upstream requests
    pub user_agent: String,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 3000)),
            domain: "localhost:3000".into(),
            dev: false,
            github_url: "https://github.com".into(),
            fetch_timeout: Duration::from_secs(10),
            synthetic_tag: SYNTHETIC_TAG.into(),
            user_agent: format!("gopin/{}", crate::VERSION),
        }
    }
}

impl RouterOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listen address
    pub fn with_listen(mut self, listen: SocketAddr) -> Self {
        self.listen = listen;
        self
    }

    /// Set the public domain
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Enable or disable development mode
    pub fn with_dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    /// Set the GitHub base URL
    pub fn with_github_url(mut self, url: impl Into<String>) -> Self {
        self.github_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Set the upstream fetch timeout
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Set the synthetic tag name
    pub fn with_synthetic_tag(mut self, name: impl Into<String>) -> Self {
        self.synthetic_tag = name.into();
        self
    }

    /// Set the upstream user agent
    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// The scheme `go get` should use to reach this proxy
    pub fn scheme(&self) -> &'static str {
        if self.dev {
            "http"
        } else {
            "https"
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.domain.is_empty() || self.domain.contains("://") || self.domain.contains('/') {
            return Err(Error::config(format!(
                "domain must be a bare host name, got {:?}",
                self.domain
            )));
        }
        if !(self.github_url.starts_with("https://") || self.github_url.starts_with("http://")) {
            return Err(Error::config(format!(
                "GitHub URL must be an http(s) URL, got {:?}",
                self.github_url
            )));
        }
        if self.fetch_timeout.is_zero() {
            return Err(Error::config("fetch timeout must not be zero"));
        }
        if !self.synthetic_tag.starts_with("refs/tags/") || self.synthetic_tag.len() == "refs/tags/".len() {
            return Err(Error::config(format!(
                "synthetic tag must be a full tag name, got {:?}",
                self.synthetic_tag
            )));
        }
        if self.user_agent.is_empty() {
            return Err(Error::config("user agent must not be empty"));
        }
        Ok(())
    }
}
