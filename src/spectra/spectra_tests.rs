use super::*;

fn sample() -> Spectra<String> {
    let mut b = SpectraBuilder::new();
    for id in ["a.rs:1", "a.rs:2", "a.rs:3", "b.rs:7"] {
        b.add_node(id.to_string());
    }
    b.add_trace_with_nodes(Outcome::Failed, ["a.rs:1", "a.rs:2"].map(String::from))
        .unwrap();
    b.add_trace_with_nodes(Outcome::Passed, ["a.rs:1", "b.rs:7"].map(String::from))
        .unwrap();
    b.add_trace_with_nodes(Outcome::Passed, ["a.rs:1"].map(String::from))
        .unwrap();
    b.build()
}

// =========================================================================
// Building
// =========================================================================

#[test]
fn test_add_node_is_idempotent() {
    let mut b: SpectraBuilder<String> = SpectraBuilder::new();
    let first = b.add_node("x".into());
    let again = b.add_node("x".into());
    let other = b.add_node("y".into());
    assert_eq!(first, again);
    assert_ne!(first, other);
    assert_eq!(b.build().node_count(), 2);
}

#[test]
fn test_nodes_keep_insertion_order() {
    let s = sample();
    let ids: Vec<&str> = s.nodes().map(|n| n.identifier().as_str()).collect();
    assert_eq!(ids, vec!["a.rs:1", "a.rs:2", "a.rs:3", "b.rs:7"]);
    assert_eq!(s.nodes().len(), 4);
}

#[test]
fn test_set_involved_unknown_node_fails() {
    let mut b: SpectraBuilder<String> = SpectraBuilder::new();
    b.add_node("known".into());
    let t = b.add_trace(Outcome::Failed);
    let err = b.set_involved(t, "missing").unwrap_err();
    assert_eq!(
        err,
        LocalizeError::UnknownNode {
            trace: 0,
            node: "\"missing\"".into()
        }
    );
}

#[test]
fn test_set_involved_unknown_trace_fails() {
    let mut b: SpectraBuilder<u32> = SpectraBuilder::new();
    b.add_node(1);
    let err = b.set_involved(4, &1u32).unwrap_err();
    assert_eq!(err, LocalizeError::UnknownTrace { index: 4, count: 0 });
}

#[test]
fn test_add_trace_with_unknown_node_leaves_builder_unchanged() {
    let mut b: SpectraBuilder<u32> = SpectraBuilder::new();
    b.add_node(1);
    assert!(b.add_trace_with_nodes(Outcome::Passed, [1u32, 2]).is_err());
    let s = b.build();
    assert_eq!(s.trace_count(), 0);
    assert_eq!(s.hit_count(), 0);
}

#[test]
fn test_duplicate_involvement_is_noop() {
    let mut b: SpectraBuilder<u32> = SpectraBuilder::new();
    b.add_node(7);
    let t = b.add_trace(Outcome::Failed);
    b.set_involved(t, &7u32).unwrap();
    b.set_involved(t, &7u32).unwrap();
    let s = b.build();
    assert_eq!(s.hit_count(), 1);
    assert_eq!(s.traces()[0].involvement_count(), 1);
}

// =========================================================================
// Queries
// =========================================================================

#[test]
fn test_get_node_and_has_node() {
    let s = sample();
    assert!(s.has_node("a.rs:3"));
    assert!(!s.has_node("c.rs:1"));

    let node = s.get_node("b.rs:7").unwrap();
    assert_eq!(node.identifier(), "b.rs:7");
    assert_eq!(node.id().index(), 3);
    assert_eq!(s.node(node.id()), Some(node));
}

#[test]
fn test_get_node_missing_is_not_found() {
    let s = sample();
    assert_eq!(
        s.get_node("nope").unwrap_err(),
        LocalizeError::NodeNotFound("\"nope\"".into())
    );
}

#[test]
fn test_trace_involvement() {
    let s = sample();
    let t = &s.traces()[0];
    assert!(t.is_failed());
    assert_eq!(t.index(), 0);
    assert!(t.is_involved(s.get_node("a.rs:1").unwrap()));
    assert!(t.is_involved(s.get_node("a.rs:2").unwrap()));
    assert!(!t.is_involved(s.get_node("a.rs:3").unwrap()));
    assert!(!t.is_involved(s.get_node("b.rs:7").unwrap()));
}

#[test]
fn test_outcome_partitions() {
    let s = sample();
    assert_eq!(s.total_failed(), 1);
    assert_eq!(s.total_passed(), 2);
    assert_eq!(s.failed_traces().count(), 1);
    assert_eq!(s.passed_traces().count(), 2);
    assert_eq!(Outcome::from_success(true), Outcome::Passed);
    assert_eq!(Outcome::from_success(false), Outcome::Failed);
    assert_eq!(Outcome::Failed.to_string(), "FAILED");
}

#[test]
fn test_covering_traces_sorted() {
    let s = sample();
    let a1 = s.get_node("a.rs:1").unwrap();
    assert_eq!(s.covering_traces(a1), &[0, 1, 2]);
    let a3 = s.get_node("a.rs:3").unwrap();
    assert!(s.covering_traces(a3).is_empty());
}

#[test]
fn test_counts_per_node() {
    let s = sample();
    assert_eq!(
        s.counts(s.get_node("a.rs:1").unwrap()),
        Counts::new(1, 0, 2, 0)
    );
    assert_eq!(
        s.counts(s.get_node("a.rs:2").unwrap()),
        Counts::new(1, 0, 0, 2)
    );
    assert_eq!(
        s.counts(s.get_node("a.rs:3").unwrap()),
        Counts::new(0, 1, 0, 2)
    );
    assert_eq!(
        s.counts(s.get_node("b.rs:7").unwrap()),
        Counts::new(0, 1, 1, 1)
    );
    assert_eq!(s.all_counts().len(), 4);
}

#[test]
fn test_empty_spectra() {
    let s: Spectra<String> = SpectraBuilder::new().build();
    assert_eq!(s.node_count(), 0);
    assert_eq!(s.trace_count(), 0);
    assert!(s.all_counts().is_empty());
}

// =========================================================================
// Properties
// =========================================================================

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_counts_sum_to_trace_count(
            node_count in 1usize..40,
            traces in prop::collection::vec(
                (any::<bool>(), prop::collection::vec(0usize..40, 0..20)),
                0..15,
            ),
        ) {
            let mut b = SpectraBuilder::new();
            for n in 0..node_count {
                b.add_node(n);
            }
            for (failed, covered) in &traces {
                let outcome = if *failed { Outcome::Failed } else { Outcome::Passed };
                let covered: Vec<usize> =
                    covered.iter().map(|n| n % node_count).collect();
                b.add_trace_with_nodes(outcome, covered).unwrap();
            }
            let s = b.build();

            for c in s.all_counts() {
                prop_assert_eq!(c.total(), s.trace_count());
                prop_assert_eq!(c.failed(), s.total_failed());
                prop_assert_eq!(c.passed(), s.total_passed());
            }
        }

        #[test]
        fn prop_hit_count_matches_involvement(
            node_count in 1usize..30,
            traces in prop::collection::vec(prop::collection::vec(0usize..30, 0..10), 0..10),
        ) {
            let mut b = SpectraBuilder::new();
            for n in 0..node_count {
                b.add_node(n);
            }
            for covered in &traces {
                let covered: Vec<usize> =
                    covered.iter().map(|n| n % node_count).collect();
                b.add_trace_with_nodes(Outcome::Passed, covered).unwrap();
            }
            let s = b.build();

            let per_trace: usize = s.traces().iter().map(Trace::involvement_count).sum();
            prop_assert_eq!(per_trace, s.hit_count());
        }
    }
}
