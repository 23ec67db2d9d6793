//! Request dispatch: one path in, one [`PackageRequest`] out.

use std::sync::Arc;

use gopin_semver::resolve;
use tracing::{debug, info};

use crate::{
    grammar::{Grammars, RefPinned, SemverPinned},
    shape::{respond, PackageResponse},
    Error, IncomingRequest, PackageRequest, RefSource, Result, RouterOptions, DEFAULT_TREE, INFO_REFS,
};

/// Tries the URL grammars in priority order and gathers what the matching one needs from upstream.
pub struct Dispatcher {
    grammars: Grammars,
    source: Arc<dyn RefSource>,
    options: RouterOptions,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("grammars", &self.grammars)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Validate `options`, compile the grammars and use `source` for upstream refs.
    pub fn new(options: RouterOptions, source: Arc<dyn RefSource>) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            grammars: Grammars::new()?,
            source,
            options,
        })
    }

    /// The options this dispatcher was created with.
    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Dispatch `request` and shape the response.
    pub async fn handle(&self, request: &IncomingRequest<'_>) -> Result<PackageResponse> {
        let package = self.dispatch(request).await?;
        Ok(respond(&self.options, request, package))
    }

    /// Interpret `request` as a semver-pinned, ref-pinned or bare package request, in that order.
    ///
    /// The first grammar that accepts the path decides the outcome, errors included. A
    /// semver-pinned path whose selector is invalid is not accepted.
    pub async fn dispatch(&self, request: &IncomingRequest<'_>) -> Result<PackageRequest> {
        let mut attempts = Vec::with_capacity(3);

        match self.grammars.semver_pinned(request.path) {
            Ok(pinned) => return self.semver_pinned(request, pinned).await,
            Err(err) => attempts.push(err),
        }
        match self.grammars.ref_pinned(request.path) {
            Ok(pinned) => return self.ref_pinned(pinned).await,
            Err(err) => attempts.push(err),
        }
        match self.grammars.bare(request.path) {
            Ok(parts) => {
                debug!("bare package request");
                let mut package = PackageRequest::new(parts, "", DEFAULT_TREE);
                if parts.subpath == INFO_REFS {
                    let upstream = self.source.fetch_refs(parts.author, parts.repo).await?;
                    package.refs_data = Some(upstream.advertisement.into_bytes());
                }
                return Ok(package);
            }
            Err(err) => attempts.push(err),
        }

        Err(Error::InvalidPackageRequest {
            path: request.path.to_owned(),
            attempts,
        })
    }

    async fn semver_pinned(&self, request: &IncomingRequest<'_>, pinned: SemverPinned<'_>) -> Result<PackageRequest> {
        let SemverPinned { parts, selector } = pinned;
        debug!(%selector, "found a version selector");

        let mut package = PackageRequest::new(parts, selector.to_string(), DEFAULT_TREE);
        if !(request.go_get || parts.subpath == INFO_REFS) {
            return Ok(package);
        }

        debug!("fetching refs for a go get or info/refs request");
        let upstream = self.source.fetch_refs(parts.author, parts.repo).await?;
        let candidate = resolve(&selector, &upstream.candidates).map_err(|err| match err {
            resolve::Error::NoSuchPackageVersion { selector } => {
                info!(%selector, candidates = upstream.candidates.len(), "no candidate satisfies the selector");
                Error::NoSuchPackageVersion {
                    author: parts.author.to_owned(),
                    repo: parts.repo.to_owned(),
                    selector,
                }
            }
        })?;
        info!(%selector, candidate = %candidate.ref_name, version = %candidate.version, "resolved version");

        package.refs_data = Some(
            upstream
                .advertisement
                .virtualize(&candidate.ref_name, &candidate.hash)?,
        );
        package.github_tree = candidate.label;
        Ok(package)
    }

    async fn ref_pinned(&self, pinned: RefPinned<'_>) -> Result<PackageRequest> {
        let RefPinned { parts, reference, id } = pinned;
        debug!(reference, "found a commit id");

        let mut package = PackageRequest::new(parts, reference, reference);
        if parts.subpath == INFO_REFS {
            let upstream = self.source.fetch_refs(parts.author, parts.repo).await?;
            package.refs_data = Some(upstream.advertisement.virtualize(&self.options.synthetic_tag, &id)?);
        }
        Ok(package)
    }
}
