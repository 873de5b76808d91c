//! Property tests for the dev/test and automation tag checks

use costchef::tags::{format_tags, TagClassifier, TagSet};
use proptest::prelude::*;

/// Randomly re-case every character of `s`.
fn recase(s: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), s.len()).prop_map(move |upper| {
        s.chars()
            .zip(upper)
            .map(|(c, u)| {
                if u {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn staging_in_any_case_is_dev_test(value in recase("staging"), key in "[A-Za-z]{1,12}") {
        let classifier = TagClassifier::default();
        let tags = TagSet::new().with_freeform(key, value);
        prop_assert!(classifier.is_dev_test(&tags));
    }

    #[test]
    fn dev_test_label_in_defined_tags_counts(value in recase("qa"), ns in "[A-Za-z]{1,8}") {
        let classifier = TagClassifier::default();
        let tags = TagSet::new().with_defined(ns, "Env", value);
        prop_assert!(classifier.is_dev_test(&tags));
    }

    #[test]
    fn labels_must_match_the_whole_value(prefix in "[a-z]{1,5}") {
        let classifier = TagClassifier::default();
        let tags = TagSet::new().with_freeform("env", format!("{}staging", prefix));
        prop_assert!(!classifier.is_dev_test(&tags));
    }

    #[test]
    fn automation_fragment_anywhere_in_key(
        before in "[A-Za-z-]{0,6}",
        after in "[A-Za-z-]{0,6}",
    ) {
        let classifier = TagClassifier::default();
        let key = format!("{}Auto-Shutdown-Schedule{}", before, after);
        let tags = TagSet::new().with_freeform(key, "weekdays");
        prop_assert!(classifier.has_automation_tag(&tags));
    }

    #[test]
    fn formatted_tags_have_one_entry_per_tag(n in 1usize..6) {
        let mut tags = TagSet::new();
        for i in 0..n {
            tags = tags.with_freeform(format!("k{}", i), "v");
        }
        let formatted = format_tags(&tags);
        prop_assert_eq!(formatted.split("; ").count(), n);
    }
}

#[test]
fn empty_tags_are_not_dev_test() {
    let classifier = TagClassifier::default();
    assert!(!classifier.is_dev_test(&TagSet::new()));
    assert!(!classifier.has_automation_tag(&TagSet::new()));
    assert_eq!(format_tags(&TagSet::new()), "N/A");
}
