//! Common types and structures used throughout request dispatch

use crate::grammar::PathParts;

/// Subpath git fetches the ref advertisement from.
pub const INFO_REFS: &str = "/info/refs";

/// Subpath git negotiates packs on.
pub const UPLOAD_PACK: &str = "/git-upload-pack";

/// The tree presented when no version was resolved.
pub const DEFAULT_TREE: &str = "master";

/// The parts of an inbound HTTP request dispatch looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IncomingRequest<'a> {
    /// The request path, without query.
    pub path: &'a str,
    /// Whether the query carries `go-get=1`.
    pub go_get: bool,
    /// The `Host` header, if any.
    pub host: Option<&'a str>,
}

impl<'a> IncomingRequest<'a> {
    /// A plain request for `path`.
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Mark this request as a `go get` probe.
    pub fn with_go_get(mut self, go_get: bool) -> Self {
        self.go_get = go_get;
        self
    }

    /// Set the host the request was addressed to.
    pub fn with_host(mut self, host: &'a str) -> Self {
        self.host = Some(host);
        self
    }
}

/// What every URL grammar normalizes a request into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    /// The GitHub user or organization.
    pub author: String,
    /// The GitHub repository.
    pub repo: String,
    /// Everything after the package root, like `/info/refs` or `/sub/pkg`. May be empty.
    pub subpath: String,
    /// The selector in canonical form, the literal commit id, or empty for bare requests.
    pub selector: String,
    /// The tree name presented to downstream clients.
    pub github_tree: String,
    /// The advertisement to send for `/info/refs`, if it was fetched.
    pub refs_data: Option<Vec<u8>>,
}

impl PackageRequest {
    pub(crate) fn new(parts: PathParts<'_>, selector: impl Into<String>, github_tree: impl Into<String>) -> Self {
        Self {
            author: parts.author.to_owned(),
            repo: parts.repo.to_owned(),
            subpath: parts.subpath.to_owned(),
            selector: selector.into(),
            github_tree: github_tree.into(),
            refs_data: None,
        }
    }
}
