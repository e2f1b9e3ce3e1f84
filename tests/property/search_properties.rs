//! Property-based tests for the text-indexing helpers

use proptest::prelude::*;

use docstore_triggers::{category_array, friendly_url, soundex, trigrams};

proptest! {
    /// Soundex codes are empty or exactly 4 characters: an uppercase
    /// letter followed by digits 0-6.
    #[test]
    fn soundex_shape(input in "\\PC{0,20}") {
        let code = soundex(&input);
        if input.chars().any(|c| c.is_ascii_alphabetic()) {
            prop_assert_eq!(code.len(), 4);
            let mut chars = code.chars();
            prop_assert!(chars.next().unwrap().is_ascii_uppercase());
            prop_assert!(chars.all(|c| ('0'..='6').contains(&c)));
        } else {
            prop_assert!(code.is_empty());
        }
    }

    /// Soundex ignores case entirely.
    #[test]
    fn soundex_case_insensitive(input in "[a-zA-Z]{1,12}") {
        prop_assert_eq!(soundex(&input.to_lowercase()), soundex(&input.to_uppercase()));
    }

    /// Every trigram is a 3-char window of the input, yielded at most
    /// once, and never more windows than the input admits.
    #[test]
    fn trigram_windows(input in "[a-z]{0,16}") {
        let grams: Vec<String> = trigrams(&input).collect();
        let bound = input.chars().count().saturating_sub(2);
        prop_assert!(grams.len() <= bound);
        let mut seen = std::collections::HashSet::new();
        for gram in &grams {
            prop_assert_eq!(gram.chars().count(), 3);
            prop_assert!(input.contains(gram.as_str()));
            prop_assert!(seen.insert(gram.clone()));
        }
    }

    /// Friendly URLs only ever contain lowercase alphanumerics, hyphens,
    /// and the slash delimiter, and slugifying twice changes nothing.
    #[test]
    fn friendly_url_charset_and_idempotence(input in "\\PC{0,30}") {
        let slug = friendly_url(&input);
        prop_assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'));
        prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        prop_assert_eq!(friendly_url(&slug), slug.clone());
    }

    /// Category arrays walk from the full path down to the root segment.
    #[test]
    fn category_array_prefixes(segments in prop::collection::vec("[a-z]{1,5}", 1..5)) {
        let path = segments.join("/");
        let prefixes = category_array(&path);
        prop_assert_eq!(prefixes.len(), segments.len());
        prop_assert_eq!(&prefixes[0], &path);
        for pair in prefixes.windows(2) {
            prop_assert!(pair[0].starts_with(pair[1].as_str()));
            prop_assert!(pair[0].len() > pair[1].len());
        }
        prop_assert_eq!(prefixes.last().unwrap(), &segments[0]);
    }
}
