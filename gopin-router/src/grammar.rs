//! The URL grammars a package request path can take.
//!
//! | grammar       | shape                                   |
//! |---------------|-----------------------------------------|
//! | semver-pinned | `/<author>/<repo>@<selector><subpath>`  |
//! | ref-pinned    | `/<author>/<repo>@<40-hex><subpath>`    |
//! | bare          | `/<author>/<repo><subpath>`             |

use std::fmt;

use gix_hash::ObjectId;
use gopin_semver::{selector, VersionSelector};
use regex::Regex;

use crate::error::GrammarError;

const AUTHOR_REPO: &str = r"^/([a-zA-Z0-9][a-zA-Z0-9\-]*[a-zA-Z0-9])/([a-zA-Z0-9.\-_]+)";
const REF: &str = "([a-fA-F0-9]{40})";
const SUBPATH: &str = r"((?:/[a-zA-Z0-9][-.a-zA-Z0-9]*)*)";

/// Names one of the URL grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarKind {
    /// `/<author>/<repo>@<selector><subpath>`
    SemverPinned,
    /// `/<author>/<repo>@<40-hex><subpath>`
    RefPinned,
    /// `/<author>/<repo><subpath>`
    Bare,
}

impl fmt::Display for GrammarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GrammarKind::SemverPinned => "semver-pinned",
            GrammarKind::RefPinned => "ref-pinned",
            GrammarKind::Bare => "bare",
        })
    }
}

/// The parts every grammar captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathParts<'a> {
    /// The GitHub user or organization.
    pub author: &'a str,
    /// The GitHub repository.
    pub repo: &'a str,
    /// The remainder of the path, possibly empty.
    pub subpath: &'a str,
}

/// A path accepted by the semver-pinned grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemverPinned<'a> {
    /// Author, repository and subpath.
    pub parts: PathParts<'a>,
    /// The validated selector.
    pub selector: VersionSelector,
}

/// A path accepted by the ref-pinned grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefPinned<'a> {
    /// Author, repository and subpath.
    pub parts: PathParts<'a>,
    /// The commit id as written in the path.
    pub reference: &'a str,
    /// The commit id.
    pub id: ObjectId,
}

/// The three grammars, compiled once.
#[derive(Debug, Clone)]
pub struct Grammars {
    semver_pinned: Regex,
    ref_pinned: Regex,
    bare: Regex,
}

impl Grammars {
    /// Compile all grammars.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            semver_pinned: Regex::new(&format!("{AUTHOR_REPO}@{}{SUBPATH}$", selector::PATTERN))?,
            ref_pinned: Regex::new(&format!("{AUTHOR_REPO}@{REF}{SUBPATH}$"))?,
            bare: Regex::new(&format!("{AUTHOR_REPO}{SUBPATH}$"))?,
        })
    }

    /// Match `path` as `/<author>/<repo>@<selector><subpath>` and validate the selector.
    pub fn semver_pinned<'a>(&self, path: &'a str) -> Result<SemverPinned<'a>, GrammarError> {
        let caps = self.semver_pinned.captures(path).ok_or(GrammarError::NoMatch {
            grammar: GrammarKind::SemverPinned,
        })?;
        let part = |idx: usize| caps.get(idx).map_or("", |m| m.as_str());
        let selector = VersionSelector::parse(part(3), part(4), part(5), part(6), part(7), part(8), part(9))?;
        Ok(SemverPinned {
            parts: PathParts {
                author: part(1),
                repo: part(2),
                subpath: part(3 + selector::PATTERN_GROUPS),
            },
            selector,
        })
    }

    /// Match `path` as `/<author>/<repo>@<40-hex><subpath>`.
    pub fn ref_pinned<'a>(&self, path: &'a str) -> Result<RefPinned<'a>, GrammarError> {
        let no_match = || GrammarError::NoMatch {
            grammar: GrammarKind::RefPinned,
        };
        let caps = self.ref_pinned.captures(path).ok_or_else(no_match)?;
        let part = |idx: usize| caps.get(idx).map_or("", |m| m.as_str());
        let reference = part(3);
        let id = ObjectId::from_hex(reference.to_ascii_lowercase().as_bytes()).map_err(|_| no_match())?;
        Ok(RefPinned {
            parts: PathParts {
                author: part(1),
                repo: part(2),
                subpath: part(4),
            },
            reference,
            id,
        })
    }

    /// Match `path` as `/<author>/<repo><subpath>`.
    pub fn bare<'a>(&self, path: &'a str) -> Result<PathParts<'a>, GrammarError> {
        let caps = self.bare.captures(path).ok_or(GrammarError::NoMatch {
            grammar: GrammarKind::Bare,
        })?;
        let part = |idx: usize| caps.get(idx).map_or("", |m| m.as_str());
        Ok(PathParts {
            author: part(1),
            repo: part(2),
            subpath: part(3),
        })
    }
}
