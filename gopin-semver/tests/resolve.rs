use gix_hash::ObjectId;
use gopin_refs::RefRecord;
use gopin_semver::{resolve, resolve::Error, CandidateSet, VersionSelector};
use pretty_assertions::assert_eq;

fn tag(idx: usize, label: &str) -> RefRecord {
    let hex = format!("{idx:040x}");
    RefRecord::new(ObjectId::from_hex(hex.as_bytes()).expect("valid hex"), format!("refs/tags/{label}"))
}

fn selector(text: &str) -> VersionSelector {
    text.parse().expect("valid selector")
}

const LABELS: &[&str] = &[
    "v0.9.0", "v1.0.0", "v1.2.0", "v1.2.5", "v1.2.9", "v1.3.0-rc.1", "v1.3.0", "v1.9.0", "v2.0.0-beta.2", "v2.1.0",
];

#[test]
fn selection_does_not_depend_on_ref_order() {
    let forward: Vec<_> = LABELS.iter().enumerate().map(|(idx, l)| tag(idx + 1, l)).collect();
    let mut backward = forward.clone();
    backward.reverse();
    let mut shuffled = forward.clone();
    shuffled.rotate_left(4);
    shuffled.swap(0, 7);

    for text in ["1", "~1.2", "^1.2.3", "1.x", "1.2.x", "1.3.0", "2-", "1.2+", "1.3.0-rc.x", "2.0.0-beta.1+", "0.9.0"] {
        let expected = resolve(&selector(text), &CandidateSet::from_refs(&forward)).expect("resolvable");
        for refs in [&backward, &shuffled] {
            let actual = resolve(&selector(text), &CandidateSet::from_refs(refs)).expect("resolvable");
            assert_eq!(actual, expected, "{text}");
        }
    }
}

#[test]
fn representative_selectors() {
    let refs: Vec<_> = LABELS.iter().enumerate().map(|(idx, l)| tag(idx + 1, l)).collect();
    let set = CandidateSet::from_refs(&refs);
    let label = |text: &str| resolve(&selector(text), &set).map(|c| c.label);

    assert_eq!(label("1").unwrap(), "v1.0.0");
    assert_eq!(label("~1.2").unwrap(), "v1.2.0");
    assert_eq!(label("^1.2.3").unwrap(), "v1.2.5");
    assert_eq!(label("1.x").unwrap(), "v1.9.0");
    assert_eq!(label("2-").unwrap(), "v1.9.0");
    assert_eq!(label("1.3.0-rc.x").unwrap(), "v1.3.0-rc.1");
    assert_eq!(label("2.0.0-beta.1+").unwrap(), "v2.0.0-beta.2");
    assert_eq!(label("1.3.0").unwrap(), "v1.3.0-rc.1");
    assert_eq!(label("2.0.0").unwrap(), "v2.0.0-beta.2");
    assert_eq!(
        label("3.0.0"),
        Err(Error::NoSuchPackageVersion {
            selector: "3.0.0".into()
        })
    );
}

#[test]
fn resolved_candidate_carries_the_peeled_commit() {
    let refs = vec![
        tag(0xaa, "v1.0.0"),
        RefRecord::new(tag(0xbb, "x").id, "refs/tags/v1.0.0^{}"),
        tag(0xcc, "v1.1.0"),
    ];
    let candidate = resolve(&selector("~1.0"), &CandidateSet::from_refs(&refs)).unwrap();
    assert_eq!(candidate.ref_name, "refs/tags/v1.0.0");
    assert_eq!(candidate.hash, tag(0xbb, "x").id);
}
