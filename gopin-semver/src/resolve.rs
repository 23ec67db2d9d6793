//! Narrow the candidates matching a selector down to one.

use crate::{
    candidate::{Candidate, CandidateSet},
    selector::{Suffix, VersionSelector},
};

/// The error returned by [`resolve()`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The selector is well-formed, but no candidate satisfies it.
    #[error("No version satisfies the selector \"{selector}\"")]
    NoSuchPackageVersion {
        /// The canonical form of the selector.
        selector: String,
    },
}

/// Pick the one candidate `selector` resolves to.
///
/// If several candidates match, open ranges (a `-` suffix or any wildcard) pick the highest of
/// them and everything else picks the lowest.
pub fn resolve(selector: &VersionSelector, candidates: &CandidateSet) -> Result<Candidate, Error> {
    let matched = candidates.matching(selector);
    let chosen = if prefers_highest(selector) {
        matched.highest()
    } else {
        matched.lowest()
    };
    chosen.cloned().ok_or_else(|| Error::NoSuchPackageVersion {
        selector: selector.to_string(),
    })
}

/// Return `true` if `selector` describes a range in which the most recent version is wanted.
///
/// A `+` suffix combined with a wildcard would also qualify, but never gets here as such selectors
/// are rejected when parsed.
pub fn prefers_highest(selector: &VersionSelector) -> bool {
    selector.suffix() == Suffix::LessThan || selector.has_wildcard()
}
