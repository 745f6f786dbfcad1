//! tests/similarity_tests.rs
//! Los valores esperados salen de difflib.SequenceMatcher(None, a, b).ratio().

#[cfg(test)]
mod tests {
    use crate::services::similarity::{logic_similarity_percent, Match, SequenceMatcher};
    use crate::tests::fixtures::{CAT_LOGIC, QUIZ_LOGIC};

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn opcodes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "esperado {}, obtenido {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_ratio_classic_example() {
        let a = chars("abcd");
        let b = chars("bcde");
        assert_close(SequenceMatcher::new(&a, &b).ratio(), 0.75);
    }

    #[test]
    fn test_empty_signatures() {
        let empty: Vec<String> = vec![];
        let one = opcodes(&["looks_say"]);
        assert_eq!(logic_similarity_percent(&empty, &empty), 100.0);
        assert_eq!(logic_similarity_percent(&empty, &one), 0.0);
        assert_eq!(logic_similarity_percent(&one, &empty), 0.0);
    }

    #[test]
    fn test_one_changed_block_is_character_level() {
        let a = opcodes(&["event_whenflagclicked", "looks_say", "control_forever"]);
        let b = opcodes(&["event_whenflagclicked", "looks_think", "control_forever"]);
        assert_close(logic_similarity_percent(&a, &b), 91.66666666666666);
    }

    #[test]
    fn test_unrelated_scripts_still_share_characters() {
        let cat = opcodes(CAT_LOGIC);
        let quiz = opcodes(QUIZ_LOGIC);
        assert_close(logic_similarity_percent(&cat, &quiz), 34.78260869565217);
    }

    #[test]
    fn test_appended_block_is_symmetric() {
        let a = opcodes(CAT_LOGIC);
        let mut b = a.clone();
        b.push("looks_hide".to_string());

        assert_close(logic_similarity_percent(&a, &b), 95.65217391304348);
        assert_close(logic_similarity_percent(&b, &a), 95.65217391304348);
    }

    #[test]
    fn test_long_signatures_apply_autojunk() {
        // b tiene 764 caracteres: los más frecuentes dejan de iniciar matches
        let a = opcodes(&CAT_LOGIC.repeat(6));
        let b = opcodes(&[CAT_LOGIC.repeat(3), QUIZ_LOGIC.repeat(3)].concat());
        assert_close(logic_similarity_percent(&a, &b), 50.30100334448161);
    }

    #[test]
    fn test_longest_match_prefers_earliest() {
        let a = vec![1, 2, 9, 1, 2];
        let b = vec![1, 2];
        let m = SequenceMatcher::new(&a, &b).find_longest_match(0, a.len(), 0, b.len());
        assert_eq!(m, Match { a: 0, b: 0, size: 2 });
    }

    #[test]
    fn test_matching_blocks() {
        let a = chars("abxcd");
        let b = chars("abcd");
        let blocks = SequenceMatcher::new(&a, &b).matching_blocks();
        assert_eq!(
            blocks,
            vec![Match { a: 0, b: 0, size: 2 }, Match { a: 3, b: 2, size: 2 }]
        );
    }
}
