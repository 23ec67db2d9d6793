//! The version selector grammar.
//!
//! ```text
//! [~^]? <major> ( . (<minor>|x) )? ( . (<patch>|x) )? ( - <label> ( . (<n>|x) )? )? [-+]?
//! ```
//!
//! `~` and `^` widen a selector the way npm does, `x` (or `X`) is a wildcard, and a trailing `-` or
//! `+` turns the selector into a strict "less than" or "greater than" bound.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

/// The selector grammar, unanchored and with exactly seven capture groups: prefix, major, minor,
/// patch, prerelease label, prerelease version and suffix.
pub const PATTERN: &str =
    r"([~^]?)([0-9]+)(?:\.([0-9]+|[xX]))?(?:\.([0-9]+|[xX]))?(?:-([a-zA-Z0-9\-_]+[a-zA-Z0-9])(?:\.([0-9]+|[xX]))?)?([-+]?)";

/// The number of capture groups in [`PATTERN`].
pub const PATTERN_GROUPS: usize = 7;

const TILDE: char = '~';
const CARAT: char = '^';
const LESS_THAN: char = '-';
const GREATER_THAN: char = '+';
const WILDCARD: char = 'x';

/// One of the optional dotted parts of a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Segment {
    /// The segment was left out.
    #[default]
    Unspecified,
    /// A concrete number.
    Number(u64),
    /// `x` or `X`: any value.
    Wildcard,
}

impl Segment {
    fn parse(name: SegmentName, input: &str) -> Result<Self, Error> {
        match input {
            "" => Ok(Segment::Unspecified),
            "x" | "X" => Ok(Segment::Wildcard),
            _ => parse_number(input).map(Segment::Number).ok_or_else(|| Error::IllegalSegment {
                segment: name,
                value: input.to_owned(),
            }),
        }
    }

    /// Return `true` unless the segment is [`Segment::Unspecified`].
    pub fn is_specified(&self) -> bool {
        !matches!(self, Segment::Unspecified)
    }

    /// Return `true` if this is [`Segment::Wildcard`].
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard)
    }

    /// The concrete number, if there is one.
    pub fn number(&self) -> Option<u64> {
        match self {
            Segment::Number(n) => Some(*n),
            Segment::Unspecified | Segment::Wildcard => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Unspecified => Ok(()),
            Segment::Number(n) => write!(f, "{n}"),
            Segment::Wildcard => write!(f, "{WILDCARD}"),
        }
    }
}

/// The range-widening prefix of a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Prefix {
    /// No prefix.
    #[default]
    None,
    /// `~`: patch-level changes are allowed.
    Tilde,
    /// `^`: minor- and patch-level changes are allowed.
    Carat,
}

impl Prefix {
    fn parse(input: &str) -> Result<Self, Error> {
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(Prefix::None),
            (Some(TILDE), None) => Ok(Prefix::Tilde),
            (Some(CARAT), None) => Ok(Prefix::Carat),
            _ => Err(Error::IllegalPrefix {
                prefix: input.to_owned(),
            }),
        }
    }

    fn as_char(self) -> Option<char> {
        match self {
            Prefix::None => None,
            Prefix::Tilde => Some(TILDE),
            Prefix::Carat => Some(CARAT),
        }
    }
}

/// The comparison suffix of a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Suffix {
    /// No suffix.
    #[default]
    None,
    /// `-`: only versions strictly below the selector.
    LessThan,
    /// `+`: only versions strictly above the selector.
    GreaterThan,
}

impl Suffix {
    fn parse(input: &str) -> Result<Self, Error> {
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Ok(Suffix::None),
            (Some(LESS_THAN), None) => Ok(Suffix::LessThan),
            (Some(GREATER_THAN), None) => Ok(Suffix::GreaterThan),
            _ => Err(Error::IllegalSuffix {
                suffix: input.to_owned(),
            }),
        }
    }

    fn as_char(self) -> Option<char> {
        match self {
            Suffix::None => None,
            Suffix::LessThan => Some(LESS_THAN),
            Suffix::GreaterThan => Some(GREATER_THAN),
        }
    }
}

/// Names the part of a selector an [`Error`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum SegmentName {
    Prefix,
    Major,
    Minor,
    Patch,
    PrereleaseLabel,
    PrereleaseVersion,
    Suffix,
}

impl fmt::Display for SegmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SegmentName::Prefix => "prefix",
            SegmentName::Major => "major version",
            SegmentName::Minor => "minor version",
            SegmentName::Patch => "patch version",
            SegmentName::PrereleaseLabel => "prerelease label",
            SegmentName::PrereleaseVersion => "prerelease version",
            SegmentName::Suffix => "suffix",
        })
    }
}

/// The reasons a selector can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error("Illegal prefix {prefix:?}, expected nothing, \"~\" or \"^\"")]
    IllegalPrefix { prefix: String },
    #[error("Illegal suffix {suffix:?}, expected nothing, \"-\" or \"+\"")]
    IllegalSuffix { suffix: String },
    #[error("Missing or illegal major version {major:?}")]
    MissingOrIllegalMajor { major: String },
    #[error("Illegal {segment} {value:?}")]
    IllegalSegment { segment: SegmentName, value: String },
    #[error("The {segment} is specified but the {missing} is not")]
    GapBetweenSegments { segment: SegmentName, missing: SegmentName },
    #[error("The {segment} follows the wildcard {wildcard}")]
    SegmentTrailingWildcard { segment: SegmentName, wildcard: SegmentName },
    #[error("A prefix cannot be combined with a wildcard or suffix, found one in the {segment}")]
    PrefixConflict { segment: SegmentName },
    #[error("A suffix cannot be combined with the wildcard {segment}")]
    SuffixConflict { segment: SegmentName },
    #[error("{input:?} is not a version selector")]
    Unparseable { input: String },
}

/// The kind of an [`Error`], without its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ErrorKind {
    IllegalPrefix,
    IllegalSuffix,
    MissingOrIllegalMajor,
    IllegalSegment,
    GapBetweenSegments,
    SegmentTrailingWildcard,
    PrefixConflict,
    SuffixConflict,
    Unparseable,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IllegalPrefix { .. } => ErrorKind::IllegalPrefix,
            Error::IllegalSuffix { .. } => ErrorKind::IllegalSuffix,
            Error::MissingOrIllegalMajor { .. } => ErrorKind::MissingOrIllegalMajor,
            Error::IllegalSegment { .. } => ErrorKind::IllegalSegment,
            Error::GapBetweenSegments { .. } => ErrorKind::GapBetweenSegments,
            Error::SegmentTrailingWildcard { .. } => ErrorKind::SegmentTrailingWildcard,
            Error::PrefixConflict { .. } => ErrorKind::PrefixConflict,
            Error::SuffixConflict { .. } => ErrorKind::SuffixConflict,
            Error::Unparseable { .. } => ErrorKind::Unparseable,
        }
    }

    /// The part of the selector this error is about, if it is about a single part.
    pub fn segment(&self) -> Option<SegmentName> {
        match self {
            Error::IllegalPrefix { .. } => Some(SegmentName::Prefix),
            Error::IllegalSuffix { .. } => Some(SegmentName::Suffix),
            Error::MissingOrIllegalMajor { .. } => Some(SegmentName::Major),
            Error::IllegalSegment { segment, .. }
            | Error::GapBetweenSegments { segment, .. }
            | Error::SegmentTrailingWildcard { segment, .. }
            | Error::PrefixConflict { segment }
            | Error::SuffixConflict { segment } => Some(*segment),
            Error::Unparseable { .. } => None,
        }
    }
}

/// A validated version selector.
///
/// The major version is always a concrete number, segments never leave gaps and nothing follows a
/// wildcard. The [`Display`](fmt::Display) form is canonical and parses back into an equal selector.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionSelector {
    prefix: Prefix,
    major: u64,
    minor: Segment,
    patch: Segment,
    prerelease_label: Option<String>,
    prerelease_version: Segment,
    suffix: Suffix,
}

impl VersionSelector {
    /// Validate the raw parts of a selector as captured by [`PATTERN`].
    ///
    /// Empty strings stand for absent parts. The first failing check wins, in this order: prefix,
    /// suffix, major, segment syntax, gaps, segments trailing a wildcard, prefix conflicts and
    /// suffix conflicts.
    pub fn parse(
        prefix: &str,
        major: &str,
        minor: &str,
        patch: &str,
        prerelease_label: &str,
        prerelease_version: &str,
        suffix: &str,
    ) -> Result<Self, Error> {
        let prefix = Prefix::parse(prefix)?;
        let suffix = Suffix::parse(suffix)?;
        let major = parse_number(major).ok_or_else(|| Error::MissingOrIllegalMajor {
            major: major.to_owned(),
        })?;
        let minor = Segment::parse(SegmentName::Minor, minor)?;
        let patch = Segment::parse(SegmentName::Patch, patch)?;
        let prerelease_version = Segment::parse(SegmentName::PrereleaseVersion, prerelease_version)?;
        let prerelease_label = match prerelease_label {
            "" => None,
            label if is_label(label) => Some(label.to_owned()),
            label => {
                return Err(Error::IllegalSegment {
                    segment: SegmentName::PrereleaseLabel,
                    value: label.to_owned(),
                })
            }
        };

        let tiers = [
            (SegmentName::Minor, minor.is_specified(), minor.is_wildcard()),
            (SegmentName::Patch, patch.is_specified(), patch.is_wildcard()),
            (SegmentName::PrereleaseLabel, prerelease_label.is_some(), false),
            (
                SegmentName::PrereleaseVersion,
                prerelease_version.is_specified(),
                prerelease_version.is_wildcard(),
            ),
        ];

        let mut previous = (SegmentName::Major, true);
        for (name, specified, _) in tiers {
            if specified && !previous.1 {
                return Err(Error::GapBetweenSegments {
                    segment: name,
                    missing: previous.0,
                });
            }
            previous = (name, specified);
        }

        let mut wildcard = None;
        for (name, specified, is_wildcard) in tiers {
            match wildcard {
                Some(wildcard) if specified => {
                    return Err(Error::SegmentTrailingWildcard { segment: name, wildcard });
                }
                Some(_) => {}
                None if is_wildcard => wildcard = Some(name),
                None => {}
            }
        }

        if prefix != Prefix::None {
            if let Some(segment) = wildcard {
                return Err(Error::PrefixConflict { segment });
            }
            if suffix != Suffix::None {
                return Err(Error::PrefixConflict {
                    segment: SegmentName::Suffix,
                });
            }
        }
        if suffix != Suffix::None {
            if let Some(segment) = wildcard {
                return Err(Error::SuffixConflict { segment });
            }
        }

        Ok(VersionSelector {
            prefix,
            major,
            minor,
            patch,
            prerelease_label,
            prerelease_version,
            suffix,
        })
    }

    /// The range-widening prefix.
    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    /// The major version.
    pub fn major(&self) -> u64 {
        self.major
    }

    /// The minor version segment.
    pub fn minor(&self) -> Segment {
        self.minor
    }

    /// The patch version segment.
    pub fn patch(&self) -> Segment {
        self.patch
    }

    /// The prerelease label, like `alpha` in `1.2.3-alpha.4`.
    pub fn prerelease_label(&self) -> Option<&str> {
        self.prerelease_label.as_deref()
    }

    /// The prerelease version segment, like `4` in `1.2.3-alpha.4`.
    pub fn prerelease_version(&self) -> Segment {
        self.prerelease_version
    }

    /// The comparison suffix.
    pub fn suffix(&self) -> Suffix {
        self.suffix
    }

    /// Return `true` if the minor, patch or prerelease version is a wildcard.
    pub fn has_wildcard(&self) -> bool {
        self.minor.is_wildcard() || self.patch.is_wildcard() || self.prerelease_version.is_wildcard()
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(c) = self.prefix.as_char() {
            write!(f, "{c}")?;
        }
        write!(f, "{}", self.major)?;
        for segment in [self.minor, self.patch] {
            if segment.is_specified() {
                write!(f, ".{segment}")?;
            }
        }
        if let Some(label) = &self.prerelease_label {
            write!(f, "-{label}")?;
            if self.prerelease_version.is_specified() {
                write!(f, ".{}", self.prerelease_version)?;
            }
        }
        if let Some(c) = self.suffix.as_char() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl FromStr for VersionSelector {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        static SELECTOR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(&format!("^(?:{PATTERN})$")).expect("selector pattern is valid"));

        let caps = SELECTOR.captures(input).ok_or_else(|| Error::Unparseable {
            input: input.to_owned(),
        })?;
        let part = |idx: usize| caps.get(idx).map_or("", |m| m.as_str());
        VersionSelector::parse(part(1), part(2), part(3), part(4), part(5), part(6), part(7))
    }
}

/// Parse a non-empty run of ASCII digits.
pub(crate) fn parse_number(input: &str) -> Option<u64> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}

fn is_label(input: &str) -> bool {
    input.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        && input.bytes().last().is_some_and(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kind(parts: [&str; 7]) -> ErrorKind {
        let [prefix, major, minor, patch, label, version, suffix] = parts;
        VersionSelector::parse(prefix, major, minor, patch, label, version, suffix)
            .expect_err("selector is invalid")
            .kind()
    }

    fn display(parts: [&str; 7]) -> String {
        let [prefix, major, minor, patch, label, version, suffix] = parts;
        VersionSelector::parse(prefix, major, minor, patch, label, version, suffix)
            .expect("selector is valid")
            .to_string()
    }

    #[test]
    fn rejects_malformed_parts() {
        assert_eq!(kind(["6", "1", "", "", "", "", ""]), ErrorKind::IllegalPrefix);
        assert_eq!(kind(["~~", "1", "", "", "", "", ""]), ErrorKind::IllegalPrefix);
        assert_eq!(kind(["", "1", "", "", "", "", "?"]), ErrorKind::IllegalSuffix);
        assert_eq!(kind(["", "c", "", "", "", "", ""]), ErrorKind::MissingOrIllegalMajor);
        assert_eq!(kind(["", "", "", "", "", "", ""]), ErrorKind::MissingOrIllegalMajor);
        assert_eq!(kind(["", "+1", "", "", "", "", ""]), ErrorKind::MissingOrIllegalMajor);
        assert_eq!(kind(["", "1", "z", "", "", "", ""]), ErrorKind::IllegalSegment);
        assert_eq!(kind(["~", "1", "1", "z", "", "", ""]), ErrorKind::IllegalSegment);
        assert_eq!(kind(["~", "1", "1", "1", "alpha", "z", ""]), ErrorKind::IllegalSegment);
        assert_eq!(kind(["", "1", "1", "1", "al pha", "", ""]), ErrorKind::IllegalSegment);
    }

    #[test]
    fn rejects_gaps() {
        assert_eq!(kind(["", "1", "", "1", "", "", ""]), ErrorKind::GapBetweenSegments);
        assert_eq!(kind(["~", "1", "1", "", "alpha", "", ""]), ErrorKind::GapBetweenSegments);
        assert_eq!(kind(["~", "1", "1", "", "", "x", ""]), ErrorKind::GapBetweenSegments);
    }

    #[test]
    fn rejects_segments_after_a_wildcard() {
        assert_eq!(kind(["", "1", "x", "1", "", "", ""]), ErrorKind::SegmentTrailingWildcard);
        assert_eq!(kind(["", "1", "x", "x", "", "", ""]), ErrorKind::SegmentTrailingWildcard);
        assert_eq!(kind(["", "1", "1", "x", "alpha", "", ""]), ErrorKind::SegmentTrailingWildcard);
    }

    #[test]
    fn rejects_conflicts() {
        assert_eq!(kind(["~", "1", "x", "", "", "", ""]), ErrorKind::PrefixConflict);
        assert_eq!(kind(["~", "1", "1", "x", "", "", ""]), ErrorKind::PrefixConflict);
        assert_eq!(kind(["~", "1", "1", "1", "alpha", "x", ""]), ErrorKind::PrefixConflict);
        assert_eq!(kind(["~", "1", "2", "", "", "", "+"]), ErrorKind::PrefixConflict);
        assert_eq!(kind(["", "1", "2", "x", "", "", "+"]), ErrorKind::SuffixConflict);
        assert_eq!(kind(["", "1", "2", "x", "", "", "x"]), ErrorKind::IllegalSuffix);
    }

    #[test]
    fn errors_name_the_offending_segment() {
        let err = VersionSelector::parse("", "1", "x", "1", "", "", "").unwrap_err();
        assert_eq!(
            err,
            Error::SegmentTrailingWildcard {
                segment: SegmentName::Patch,
                wildcard: SegmentName::Minor,
            }
        );
        assert_eq!(err.segment(), Some(SegmentName::Patch));
        assert_eq!(err.to_string(), "The patch version follows the wildcard minor version");
    }

    #[test]
    fn major_only() {
        let s = VersionSelector::parse("", "1", "", "", "", "", "").unwrap();
        assert_eq!(s.prefix(), Prefix::None);
        assert_eq!(s.major(), 1);
        assert_eq!(s.minor(), Segment::Unspecified);
        assert_eq!(s.patch(), Segment::Unspecified);
        assert_eq!(s.prerelease_label(), None);
        assert_eq!(s.prerelease_version(), Segment::Unspecified);
        assert_eq!(s.suffix(), Suffix::None);
        assert_eq!(s.to_string(), "1");
    }

    #[test]
    fn fully_specified() {
        let s = VersionSelector::parse("", "1", "2", "3", "beta", "43", "+").unwrap();
        assert_eq!(s.minor(), Segment::Number(2));
        assert_eq!(s.patch(), Segment::Number(3));
        assert_eq!(s.prerelease_label(), Some("beta"));
        assert_eq!(s.prerelease_version(), Segment::Number(43));
        assert_eq!(s.suffix(), Suffix::GreaterThan);
        assert!(!s.has_wildcard());

        let s = VersionSelector::parse("", "1", "2", "3", "alpha", "X", "").unwrap();
        assert_eq!(s.prerelease_version(), Segment::Wildcard);
        assert!(s.has_wildcard());
    }

    #[test]
    fn canonical_display() {
        assert_eq!(display(["", "1", "", "", "", "", ""]), "1");
        assert_eq!(display(["", "2", "", "", "", "", "-"]), "2-");
        assert_eq!(display(["~", "1", "", "", "", "", ""]), "~1");
        assert_eq!(display(["^", "1", "", "", "", "", ""]), "^1");
        assert_eq!(display(["~", "1", "2", "", "", "", ""]), "~1.2");
        assert_eq!(display(["", "1", "2", "3", "", "", ""]), "1.2.3");
        assert_eq!(display(["", "1", "X", "", "", "", ""]), "1.x");
        assert_eq!(display(["", "1", "2", "x", "", "", ""]), "1.2.x");
        assert_eq!(display(["", "1", "2", "3", "alpha", "", ""]), "1.2.3-alpha");
        assert_eq!(display(["", "1", "2", "3", "alpha", "x", ""]), "1.2.3-alpha.x");
        assert_eq!(display(["", "1", "2", "3", "alpha", "4", ""]), "1.2.3-alpha.4");
        assert_eq!(display(["", "1", "2", "3", "alpha", "4", "+"]), "1.2.3-alpha.4+");
        assert_eq!(display(["", "1", "2", "3", "alpha", "4", "-"]), "1.2.3-alpha.4-");
        assert_eq!(display(["", "007", "", "", "", "", ""]), "7");
    }

    #[test]
    fn from_str_uses_the_same_grammar() {
        let s: VersionSelector = "^1.2.3".parse().unwrap();
        assert_eq!(s.prefix(), Prefix::Carat);
        assert_eq!(s.patch(), Segment::Number(3));

        let s: VersionSelector = "2-".parse().unwrap();
        assert_eq!(s.suffix(), Suffix::LessThan);

        let s: VersionSelector = "1.2.3-rc_1.x".parse().unwrap();
        assert_eq!(s.prerelease_label(), Some("rc_1"));
        assert_eq!(s.prerelease_version(), Segment::Wildcard);

        assert_eq!("v1.2".parse::<VersionSelector>().unwrap_err().kind(), ErrorKind::Unparseable);
        assert_eq!("1.2.3.4".parse::<VersionSelector>().unwrap_err().kind(), ErrorKind::Unparseable);
        assert_eq!("~1.x".parse::<VersionSelector>().unwrap_err().kind(), ErrorKind::PrefixConflict);
    }

    #[test]
    fn display_round_trips() {
        for text in ["1", "~1.2", "^0.3.1", "1.x", "1.2.x", "3-", "1.2.3-beta.2+", "1.2.3-beta.x"] {
            let s: VersionSelector = text.parse().unwrap();
            assert_eq!(s.to_string(), text);
            assert_eq!(s.to_string().parse::<VersionSelector>().unwrap(), s);
        }
    }
}
