//! Property tests for the equivalence engine and the rubric.

use proptest::prelude::*;
use resultgrade::{
    Hint, ResultSet, Tier, Value, grade,
    grade::{rows_exact_order, rows_unsorted_equivalence, rows_unsorted_quick_guess},
};

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        (-3i64..3).prop_map(Value::Int),
        (-2i32..2).prop_map(|f| Value::Float(f64::from(f) / 2.0)),
        "[a-c]{0,2}".prop_map(Value::Text),
    ]
}

prop_compose! {
    fn result_set()(width in 1usize..5, height in 0usize..6)
        (rows in prop::collection::vec(prop::collection::vec(value(), width), height),
         width in Just(width)) -> ResultSet {
        let columns: Vec<String> = (0..width).map(|c| format!("c{c}")).collect();
        ResultSet::new(columns, rows).expect("rows match width")
    }
}

prop_compose! {
    /// A result set plus a shuffled copy: same columns permuted, rows reordered.
    fn shuffled_pair()(table in result_set())
        (column_order in Just((0..table.column_count()).collect::<Vec<_>>()).prop_shuffle(),
         row_order in Just((0..table.row_count()).collect::<Vec<_>>()).prop_shuffle(),
         table in Just(table)) -> (ResultSet, ResultSet) {
        let columns: Vec<String> = column_order
            .iter()
            .map(|&c| table.columns()[c].clone())
            .collect();
        let rows = row_order
            .iter()
            .map(|&r| column_order.iter().map(|&c| table.rows()[r][c].clone()).collect())
            .collect();
        let shuffled = ResultSet::new(columns, rows).expect("same shape");
        (table, shuffled)
    }
}

proptest! {
    #[test]
    fn grading_a_result_against_itself_is_exact(table in result_set()) {
        let verdict = grade(&table, &table);
        prop_assert_eq!(verdict.tier(), Tier::ExactMatch);
        prop_assert!(verdict.hints().is_empty());
    }

    #[test]
    fn column_and_row_permutations_are_equivalent((a, b) in shuffled_pair()) {
        prop_assert!(rows_unsorted_equivalence(&a, &b));
        prop_assert!(rows_unsorted_equivalence(&b, &a));
        prop_assert!(rows_unsorted_quick_guess(&a, &b));
    }

    #[test]
    fn exact_order_implies_quick_guess(table in result_set()) {
        let copy = table.clone();
        prop_assert!(rows_exact_order(&copy, &table));
        prop_assert!(rows_unsorted_quick_guess(&copy, &table));
    }

    #[test]
    fn equivalence_implies_quick_guess(a in result_set(), b in result_set()) {
        if rows_unsorted_equivalence(&a, &b) {
            prop_assert!(rows_unsorted_quick_guess(&a, &b));
        }
    }

    #[test]
    fn shape_mismatch_is_never_equivalent(a in result_set(), b in result_set()) {
        prop_assume!(a.column_count() != b.column_count() || a.row_count() != b.row_count());
        prop_assert!(!rows_unsorted_equivalence(&a, &b));
    }

    #[test]
    fn verdicts_use_fixed_scores_and_unique_hints(a in result_set(), b in result_set()) {
        let verdict = grade(&a, &b);
        prop_assert!([0.0, 0.4, 0.6, 0.8, 1.0].contains(&verdict.score()));

        let hints = verdict.hints();
        for (i, hint) in hints.iter().enumerate() {
            prop_assert!(!hints[i + 1..].contains(hint));
        }
        let row_hint = a.row_count() != b.row_count();
        prop_assert_eq!(
            hints.iter().any(|h| matches!(h, Hint::TooManyRows | Hint::TooFewRows)),
            row_hint
        );
    }
}
