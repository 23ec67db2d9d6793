//! Versions a repository actually has, and matching them against selectors.

use std::{cmp::Ordering, collections::BTreeMap, fmt, sync::LazyLock};

use gix_hash::ObjectId;
use gopin_refs::RefRecord;
use regex::Regex;

use crate::selector::{parse_number, Prefix, Segment, Suffix, VersionSelector};

const TAGS: &str = "refs/tags/";
const HEADS: &str = "refs/heads/";

/// A concrete version as read from a ref name such as `v1.2.3-rc.4`.
///
/// Versions are totally ordered: by major, minor and patch with absent parts counting as `0`, then
/// a release above every prerelease of the same triple, then by prerelease label and number.
/// Equality follows the order, so `1.2` and `1.2.0` are equal.
#[derive(Debug, Clone, Default)]
pub struct Version {
    /// The major version.
    pub major: u64,
    /// The minor version, if the name has one.
    pub minor: Option<u64>,
    /// The patch version, if the name has one.
    pub patch: Option<u64>,
    /// The prerelease label, like `rc` in `1.2.3-rc.4`.
    pub prerelease_label: Option<String>,
    /// The prerelease number, like `4` in `1.2.3-rc.4`.
    pub prerelease_version: Option<u64>,
}

impl Version {
    /// Read a version from a short ref name like `v1.2.3` or `1.2.3-beta.1`, or return `None` if
    /// the name isn't one.
    pub fn parse(name: &str) -> Option<Self> {
        static VERSION: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^v?([0-9]+)(?:\.([0-9]+))?(?:\.([0-9]+))?(?:-([0-9A-Za-z_\-]*[0-9A-Za-z])(?:\.([0-9]+))?)?$")
                .expect("version pattern is valid")
        });

        let caps = VERSION.captures(name)?;
        let number = |idx: usize| caps.get(idx).and_then(|m| parse_number(m.as_str()));
        Some(Version {
            major: number(1)?,
            minor: number(2),
            patch: number(3),
            prerelease_label: caps.get(4).map(|m| m.as_str().to_owned()),
            prerelease_version: number(5),
        })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let triple = |v: &Version| (v.major, v.minor.unwrap_or(0), v.patch.unwrap_or(0));
        triple(self)
            .cmp(&triple(other))
            .then_with(|| match (&self.prerelease_label, &other.prerelease_label) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
            .then_with(|| {
                self.prerelease_version
                    .unwrap_or(0)
                    .cmp(&other.prerelease_version.unwrap_or(0))
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        for part in [self.minor, self.patch].into_iter().flatten() {
            write!(f, ".{part}")?;
        }
        if let Some(label) = &self.prerelease_label {
            write!(f, "-{label}")?;
            if let Some(n) = self.prerelease_version {
                write!(f, ".{n}")?;
            }
        }
        Ok(())
    }
}

impl VersionSelector {
    /// Return `true` if `version` satisfies this selector.
    ///
    /// An unspecified prerelease label places no constraint on the label of `version`.
    pub fn matches(&self, version: &Version) -> bool {
        let ordering = self.compare(version);
        match self.suffix() {
            Suffix::LessThan => return ordering == Ordering::Greater,
            Suffix::GreaterThan => return ordering == Ordering::Less,
            Suffix::None => {}
        }

        let same_major = version.major == self.major();
        let same_minor = self.minor().number() == Some(version.minor.unwrap_or(0));
        match self.prefix() {
            Prefix::Tilde if self.patch().is_specified() => {
                same_major && same_minor && ordering != Ordering::Greater
            }
            Prefix::Carat if self.minor().is_specified() => {
                same_major && (self.major() != 0 || same_minor) && ordering != Ordering::Greater
            }
            Prefix::None | Prefix::Tilde | Prefix::Carat => ordering == Ordering::Equal,
        }
    }

    /// Compare this selector to `version` over the parts the selector specifies, stopping at the
    /// first part that is unspecified or a wildcard.
    fn compare(&self, version: &Version) -> Ordering {
        let numbers = [
            (Segment::Number(self.major()), Some(version.major)),
            (self.minor(), version.minor),
            (self.patch(), version.patch),
        ];
        for (segment, actual) in numbers {
            match segment {
                Segment::Number(n) => match n.cmp(&actual.unwrap_or(0)) {
                    Ordering::Equal => {}
                    unequal => return unequal,
                },
                Segment::Unspecified | Segment::Wildcard => return Ordering::Equal,
            }
        }

        let Some(label) = self.prerelease_label() else {
            return Ordering::Equal;
        };
        let Some(actual) = version.prerelease_label.as_deref() else {
            return Ordering::Less;
        };
        match label.cmp(actual) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
        match self.prerelease_version() {
            Segment::Number(n) => n.cmp(&version.prerelease_version.unwrap_or(0)),
            Segment::Unspecified | Segment::Wildcard => Ordering::Equal,
        }
    }
}

/// One resolvable version of a repository, backed by a real ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The full ref name, like `refs/tags/v1.2.3`.
    pub ref_name: String,
    /// The commit the ref points to, peeled if it is an annotated tag.
    pub hash: ObjectId,
    /// The short ref name, like `v1.2.3`, which is also the tree name on GitHub.
    pub label: String,
    /// The version read from the label.
    pub version: Version,
}

impl Candidate {
    /// Create a candidate for `record` if it is a tag or branch named like a version.
    pub fn from_ref(record: &RefRecord) -> Option<Self> {
        let ref_name = record.unpeeled_name();
        let label = ref_name
            .strip_prefix(TAGS)
            .or_else(|| ref_name.strip_prefix(HEADS))?;
        Some(Candidate {
            version: Version::parse(label)?,
            label: label.to_owned(),
            ref_name: ref_name.to_owned(),
            hash: record.id,
        })
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.ref_name.cmp(&other.ref_name))
            .then_with(|| self.hash.cmp(&other.hash))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The candidates of one repository snapshot, kept sorted from lowest to highest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    /// Derive candidates from the tags and branches among `refs`.
    ///
    /// Annotated tags are represented by the commit of their peeled `^{}` line.
    pub fn from_refs(refs: &[RefRecord]) -> Self {
        let mut by_name = BTreeMap::new();
        for record in refs {
            let Some(candidate) = Candidate::from_ref(record) else {
                continue;
            };
            if record.is_peeled() {
                by_name.insert(candidate.ref_name.clone(), candidate);
            } else {
                by_name.entry(candidate.ref_name.clone()).or_insert(candidate);
            }
        }
        by_name.into_values().collect()
    }

    /// The candidates satisfying `selector`.
    pub fn matching(&self, selector: &VersionSelector) -> CandidateSet {
        CandidateSet {
            candidates: self
                .candidates
                .iter()
                .filter(|c| selector.matches(&c.version))
                .cloned()
                .collect(),
        }
    }

    /// The highest candidate.
    pub fn highest(&self) -> Option<&Candidate> {
        self.candidates.last()
    }

    /// The lowest candidate.
    pub fn lowest(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// The number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Return `true` if there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Iterate candidates from lowest to highest.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }
}

impl FromIterator<Candidate> for CandidateSet {
    fn from_iter<T: IntoIterator<Item = Candidate>>(iter: T) -> Self {
        let mut candidates: Vec<_> = iter.into_iter().collect();
        candidates.sort();
        CandidateSet { candidates }
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn v(name: &str) -> Version {
        Version::parse(name).expect("valid version")
    }

    fn sel(text: &str) -> VersionSelector {
        text.parse().expect("valid selector")
    }

    fn record(hex_digit: char, name: &str) -> RefRecord {
        let hex: String = std::iter::repeat(hex_digit).take(40).collect();
        RefRecord::new(ObjectId::from_hex(hex.as_bytes()).expect("valid hex"), name)
    }

    #[test]
    fn version_names() {
        let version = v("v1.2.3-rc.4");
        assert_eq!(version.major, 1);
        assert_eq!(version.minor, Some(2));
        assert_eq!(version.patch, Some(3));
        assert_eq!(version.prerelease_label.as_deref(), Some("rc"));
        assert_eq!(version.prerelease_version, Some(4));
        assert_eq!(version.to_string(), "1.2.3-rc.4");

        assert_eq!(v("2").minor, None);
        assert!(Version::parse("release-2").is_none());
        assert!(Version::parse("v1.2.3.4").is_none());
        assert!(Version::parse("master").is_none());
    }

    #[test]
    fn version_order() {
        assert!(v("1.2.3") < v("1.10.0"));
        assert!(v("1.2.3-rc.1") < v("1.2.3"));
        assert!(v("1.2.3-alpha.9") < v("1.2.3-beta"));
        assert!(v("1.2.3-beta.1") < v("1.2.3-beta.2"));
        assert_eq!(v("1.2"), v("v1.2.0"));
    }

    #[test]
    fn exact_and_wildcard_matching() {
        assert!(sel("1").matches(&v("1.4.2")));
        assert!(!sel("1").matches(&v("2.0.0")));
        assert!(sel("1.2.3").matches(&v("v1.2.3")));
        assert!(!sel("1.2.3").matches(&v("1.2.4")));
        assert!(sel("1.2").matches(&v("1.2")));
        assert!(sel("1.0.0").matches(&v("1")));
        assert!(sel("1.x").matches(&v("1.9.0")));
        assert!(sel("1.2.x").matches(&v("1.2.7")));
        assert!(!sel("1.2.x").matches(&v("1.3.0")));
    }

    #[test]
    fn unspecified_labels_match_any_prerelease() {
        assert!(sel("1.2.3").matches(&v("1.2.3-rc.1")));
        assert!(sel("1.x").matches(&v("1.3.0-rc.1")));
        assert!(sel("2-").matches(&v("1.10.0-beta")));
        assert!(!sel("1.2.3").matches(&v("1.2.4-rc.1")));
        assert!(sel("1.2.3-rc").matches(&v("1.2.3-rc.1")));
        assert!(sel("1.2.3-rc.x").matches(&v("1.2.3-rc.7")));
        assert!(sel("1.2.3-rc.1").matches(&v("1.2.3-rc.1")));
        assert!(!sel("1.2.3-rc.1").matches(&v("1.2.3-rc.2")));
        assert!(!sel("1.2.3-rc").matches(&v("1.2.3")));
    }

    #[test]
    fn tilde_widening() {
        assert!(sel("~1.2.3").matches(&v("1.2.3")));
        assert!(sel("~1.2.3").matches(&v("1.2.9")));
        assert!(!sel("~1.2.3").matches(&v("1.2.2")));
        assert!(!sel("~1.2.3").matches(&v("1.3.0")));
        assert!(sel("~1.2").matches(&v("1.2.5")));
        assert!(!sel("~1.2").matches(&v("1.3.0")));
        assert!(sel("~1").matches(&v("1.3.0")));
    }

    #[test]
    fn carat_widening() {
        assert!(sel("^1.2.3").matches(&v("1.2.3")));
        assert!(sel("^1.2.3").matches(&v("1.9.0")));
        assert!(!sel("^1.2.3").matches(&v("1.2.2")));
        assert!(!sel("^1.2.3").matches(&v("2.0.0")));
        assert!(sel("^1.2").matches(&v("1.2.0")));
        assert!(!sel("^1.2").matches(&v("1.1.9")));
        assert!(sel("^0.2.3").matches(&v("0.2.5")));
        assert!(!sel("^0.2.3").matches(&v("0.3.0")));
        assert!(sel("^1").matches(&v("1.0.0")));
    }

    #[test]
    fn suffix_bounds() {
        assert!(sel("2-").matches(&v("1.9.9")));
        assert!(!sel("2-").matches(&v("2.0.0")));
        assert!(!sel("2-").matches(&v("2.5.0")));
        assert!(sel("1.2+").matches(&v("1.3.0")));
        assert!(!sel("1.2+").matches(&v("1.2.9")));
        assert!(sel("1.2.3+").matches(&v("1.2.4")));
        assert!(!sel("1.2.3+").matches(&v("1.2.3")));
        assert!(sel("1.2.3-rc.1+").matches(&v("1.2.3")));
        assert!(sel("1.2.3-rc.1+").matches(&v("1.2.3-rc.2")));
        assert!(!sel("1.2.3-rc.1-").matches(&v("1.2.3")));
    }

    #[test]
    fn candidates_come_from_tags_and_branches() {
        let refs = [
            record('1', "HEAD"),
            record('1', "refs/heads/master"),
            record('2', "refs/heads/v2"),
            record('3', "refs/tags/v1.0.0"),
            record('4', "refs/tags/v1.0.0^{}"),
            record('5', "refs/tags/1.1.0"),
            record('6', "refs/tags/nightly"),
            record('7', "refs/pull/12/head"),
        ];
        let set = CandidateSet::from_refs(&refs);
        let labels: Vec<_> = set.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["v1.0.0", "1.1.0", "v2"]);

        let annotated = set.lowest().expect("non-empty");
        assert_eq!(annotated.ref_name, "refs/tags/v1.0.0");
        assert_eq!(annotated.hash, record('4', "x").id);
        assert_eq!(set.highest().map(|c| c.ref_name.as_str()), Some("refs/heads/v2"));
    }

    #[test]
    fn matching_keeps_the_order() {
        let refs = [
            record('1', "refs/tags/v1.3.0"),
            record('2', "refs/tags/v1.2.0"),
            record('3', "refs/tags/v2.0.0"),
        ];
        let set = CandidateSet::from_refs(&refs).matching(&sel("1.x"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.lowest().map(|c| c.label.as_str()), Some("v1.2.0"));
        assert_eq!(set.highest().map(|c| c.label.as_str()), Some("v1.3.0"));
        assert!(CandidateSet::default().matching(&sel("1")).is_empty());
    }
}
