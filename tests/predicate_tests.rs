//! Tests for the structural predicates.

use resultgrade::{
    GraderConfig, ResultSet, Value,
    grade::{
        Predicate, PredicateOutcome, columns_count_close, columns_count_exact,
        columns_count_linear, columns_exact_order, columns_name_set_equal, rows_count_close,
        rows_count_exact, rows_count_linear, rows_exact_order,
    },
};

fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> ResultSet {
    ResultSet::new(columns.iter().copied(), rows).expect("well-formed result set")
}

fn ints(count: usize) -> ResultSet {
    table(&["n"], (0..count as i64).map(|n| vec![Value::Int(n)]).collect())
}

fn columns(names: &[&str]) -> ResultSet {
    table(names, vec![])
}

#[test]
fn rows_count_close_boundary_is_inclusive() {
    let grader = ints(10);
    assert!(rows_count_close(&ints(5), &grader, 0.5));
    assert!(!rows_count_close(&ints(4), &grader, 0.5));
    assert!(rows_count_close(&ints(15), &grader, 0.5));
    assert!(!rows_count_close(&ints(16), &grader, 0.5));
}

#[test]
fn count_close_with_empty_grader_only_accepts_empty_student() {
    assert!(rows_count_close(&ints(0), &ints(0), 0.5));
    assert!(!rows_count_close(&ints(1), &ints(0), 0.5));
    assert!(columns_count_close(&columns(&[]), &columns(&[]), 0.5));
    assert!(!columns_count_close(&columns(&["a"]), &columns(&[]), 0.5));
}

#[test]
fn columns_count_close_uses_grader_as_denominator() {
    let grader = columns(&["a", "b", "c", "d"]);
    assert!(columns_count_close(&columns(&["a", "b"]), &grader, 0.5));
    assert!(!columns_count_close(&columns(&["a"]), &grader, 0.5));
    assert!(columns_count_close(&columns(&["a", "b", "c"]), &grader, 0.25));
}

#[test]
fn exact_counts() {
    assert!(rows_count_exact(&ints(3), &ints(3)));
    assert!(!rows_count_exact(&ints(3), &ints(2)));
    assert!(columns_count_exact(&columns(&["a", "b"]), &columns(&["x", "y"])));
    assert!(!columns_count_exact(&columns(&["a"]), &columns(&["x", "y"])));
}

#[test]
fn linear_fractions() {
    assert_eq!(rows_count_linear(&ints(10), &ints(10)), 1.0);
    assert_eq!(rows_count_linear(&ints(5), &ints(10)), 0.5);
    assert_eq!(rows_count_linear(&ints(15), &ints(10)), 0.5);
    assert_eq!(rows_count_linear(&ints(30), &ints(10)), 0.0);
    assert_eq!(rows_count_linear(&ints(0), &ints(0)), 1.0);
    assert_eq!(rows_count_linear(&ints(2), &ints(0)), 0.0);
    assert_eq!(columns_count_linear(&columns(&["a"]), &columns(&["a", "b"])), 0.5);
}

#[test]
fn column_names_as_multiset() {
    let grader = columns(&["id", "name", "id"]);
    assert!(columns_name_set_equal(&columns(&["name", "id", "id"]), &grader));
    assert!(!columns_name_set_equal(&columns(&["name", "name", "id"]), &grader));
    assert!(!columns_name_set_equal(&columns(&["name", "id"]), &grader));
}

#[test]
fn column_order_is_positional() {
    let grader = columns(&["id", "name"]);
    assert!(columns_exact_order(&columns(&["id", "name"]), &grader));
    assert!(!columns_exact_order(&columns(&["name", "id"]), &grader));
}

#[test]
fn rows_exact_order_is_type_sensitive() {
    let grader = table(&["n"], vec![vec![Value::Int(1)]]);
    let as_text = table(&["n"], vec![vec![Value::Text("1".into())]]);
    let as_float = table(&["n"], vec![vec![Value::Float(1.0)]]);
    assert!(rows_exact_order(&grader.clone(), &grader));
    assert!(!rows_exact_order(&as_text, &grader));
    assert!(!rows_exact_order(&as_float, &grader));
}

#[test]
fn predicate_enum_dispatches_to_functions() {
    let config = GraderConfig::default();
    let student = ints(5);
    let grader = ints(10);

    assert_eq!(
        Predicate::RowsCountClose.evaluate(&student, &grader, &config),
        PredicateOutcome::Bool(true)
    );
    assert_eq!(
        Predicate::RowsCountExact.evaluate(&student, &grader, &config),
        PredicateOutcome::Bool(false)
    );
    assert_eq!(
        Predicate::RowsCountLinear.evaluate(&student, &grader, &config),
        PredicateOutcome::Fraction(0.5)
    );

    let strict = GraderConfig::default().with_rows_close_threshold(0.1);
    assert!(
        !Predicate::RowsCountClose
            .evaluate(&student, &grader, &strict)
            .passed()
    );
}

#[test]
fn predicate_names_are_unique_snake_case() {
    let mut names: Vec<_> = Predicate::ALL.iter().map(Predicate::name).collect();
    assert!(names.iter().all(|n| n.chars().all(|c| c.is_ascii_lowercase() || c == '_')));
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), Predicate::ALL.len());
}

#[test]
fn fractional_outcomes_pass_only_at_one() {
    assert!(PredicateOutcome::Fraction(1.0).passed());
    assert!(!PredicateOutcome::Fraction(0.99).passed());
    assert_eq!(PredicateOutcome::Bool(true).value(), 1.0);
    assert_eq!(PredicateOutcome::Bool(false).value(), 0.0);
}
