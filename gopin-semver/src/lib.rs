//! gopin-semver: the version selector language of the gopin package proxy.
//!
//! A selector such as `~1.2`, `1.x` or `2-` is parsed and validated by [`VersionSelector`], matched
//! against the versions a repository actually has in its tags and branches ([`CandidateSet`]) and
//! narrowed down to exactly one [`Candidate`] by [`resolve()`].
//!
#![deny(missing_docs, rust_2018_idioms)]

pub mod candidate;
pub mod resolve;
pub mod selector;

pub use candidate::{Candidate, CandidateSet, Version};
pub use resolve::resolve;
pub use selector::{Prefix, Segment, Suffix, VersionSelector};
