//! Turning a dispatched [`PackageRequest`] into one of the four response shapes.

use crate::{IncomingRequest, PackageRequest, RouterOptions, DEFAULT_TREE, INFO_REFS, UPLOAD_PACK};

/// Content type of a smart-HTTP ref advertisement.
pub const ADVERTISEMENT_CONTENT_TYPE: &str = "application/x-git-upload-pack-advertisement";

/// Content type of the go-get page.
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// What a package request is answered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageResponse {
    /// `301 Moved Permanently` to `location`.
    Redirect {
        /// The target URL.
        location: String,
    },
    /// A ref advertisement for git.
    Advertisement(Vec<u8>),
    /// The meta-tag page `go get` reads import metadata from.
    GoGet(String),
}

/// Choose the response for `package` by its subpath.
pub fn respond(options: &RouterOptions, request: &IncomingRequest<'_>, package: PackageRequest) -> PackageResponse {
    match package.subpath.as_str() {
        UPLOAD_PACK => PackageResponse::Redirect {
            location: format!("{}/{}/{}/git-upload-pack", options.github_url, package.author, package.repo),
        },
        INFO_REFS => PackageResponse::Advertisement(package.refs_data.unwrap_or_default()),
        _ if request.go_get => PackageResponse::GoGet(go_get_metadata(options, &package)),
        _ => PackageResponse::Redirect {
            location: format!(
                "https://{}/#/packages/{}/{}",
                request.host.unwrap_or(&options.domain),
                package.author,
                package.repo
            ),
        },
    }
}

/// The page `go get` expects from an unknown import path domain before it starts cloning.
pub fn go_get_metadata(options: &RouterOptions, package: &PackageRequest) -> String {
    let mut root = format!("{}/{}/{}", options.domain, package.author, package.repo);
    if !package.selector.is_empty() {
        root.push('@');
        root.push_str(&package.selector);
    }
    let github = format!("github.com/{}/{}", package.author, package.repo);
    let tree = if package.github_tree.is_empty() {
        DEFAULT_TREE
    } else {
        package.github_tree.as_str()
    };
    let scheme = options.scheme();
    let subpath = &package.subpath;

    format!(
        "<html><head>\
         <meta name=\"go-import\" content=\"{root} git {scheme}://{root}\">\
         <meta name=\"go-source\" content=\"{root} _ https://{github}/tree/{tree}{{/dir}} https://{github}/blob/{tree}{{/dir}}/{{file}}#L{{line}}\">\
         </head><body>go get {root}{subpath}</body></html>"
    )
}
