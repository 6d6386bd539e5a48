//! Round-trip and ordering properties of the mappings text form

use cadm_mappings::{from_text, to_text, MappingEntry, MappingsError, UnsavedChanges};
use proptest::prelude::*;

fn arb_word() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.*-]{0,10}"
}

fn arb_rule() -> impl Strategy<Value = MappingEntry> {
    (
        proptest::collection::vec(arb_word(), 0..4),
        prop_oneof![arb_word(), Just(String::new()), Just("web: prod #1".to_string())],
        arb_word(),
    )
        .prop_map(|(branches, pattern, target)| MappingEntry::new(branches, pattern, target))
}

proptest! {
    #[test]
    fn prop_round_trip(rules in proptest::collection::vec(arb_rule(), 0..6)) {
        let text = to_text(&rules).unwrap();
        prop_assert_eq!(from_text(&text).unwrap(), rules);
    }

    #[test]
    fn prop_reordering_changes_text(
        a in arb_rule(),
        b in arb_rule(),
    ) {
        prop_assume!(a != b);
        let forward = to_text(&[a.clone(), b.clone()]).unwrap();
        let backward = to_text(&[b, a]).unwrap();
        prop_assert_ne!(forward, backward);
    }

    #[test]
    fn prop_dirty_iff_nonempty(ops in proptest::collection::vec((any::<bool>(), 0u8..4), 0..20)) {
        let mut map = UnsavedChanges::new();
        let mut model = std::collections::BTreeSet::new();
        for (set, key) in ops {
            let key = format!("k{key}");
            if set {
                map = map.set_content(key.clone(), "x");
                model.insert(key);
            } else {
                map = map.clear(&key);
                model.remove(&key);
            }
        }
        prop_assert_eq!(map.is_dirty(), !model.is_empty());
        prop_assert_eq!(map.keys().map(str::to_string).collect::<Vec<_>>(), model.into_iter().collect::<Vec<_>>());
    }
}

#[test]
fn malformed_text_keeps_error_location() {
    let err = from_text("- sourceBranches: [main]\n  agentPattern: [unterminated\n").unwrap_err();
    match err {
        MappingsError::Parse { location, message } => {
            assert!(!message.is_empty());
            assert_ne!(location.to_string(), "");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}
