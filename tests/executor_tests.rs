//! Tests for SQLite execution and grading sessions.

use resultgrade::{
    Grader, GraderConfig, Hint, QueryError, QueryExecutor, SqliteExecutor, Tier, Value,
};

const SCHEMA: &str = r#"
    CREATE TABLE batting (player TEXT, year INTEGER, hits INTEGER, avg REAL);
    INSERT INTO batting VALUES ('ruth', 1927, 192, 0.356);
    INSERT INTO batting VALUES ('gehrig', 1927, 218, 0.373);
    INSERT INTO batting VALUES ('cobb', 1911, 248, 0.420);
    INSERT INTO batting VALUES ('nobody', 1900, NULL, NULL);
"#;

fn executor() -> SqliteExecutor {
    let executor = SqliteExecutor::in_memory().expect("open in-memory database");
    executor.execute_batch(SCHEMA).expect("load schema");
    executor
}

fn session() -> Grader<SqliteExecutor> {
    Grader::builder().executor(executor()).build()
}

#[test]
fn executes_select_with_typed_values() {
    let result = executor()
        .execute("SELECT player, hits, avg FROM batting WHERE year = 1911")
        .expect("query runs");

    assert_eq!(result.columns(), &["player", "hits", "avg"]);
    assert_eq!(result.rows(), &[vec![
        Value::Text("cobb".into()),
        Value::Int(248),
        Value::Float(0.420),
    ]]);
}

#[test]
fn nulls_come_back_as_null() {
    let result = executor()
        .execute("SELECT hits FROM batting WHERE player = 'nobody'")
        .expect("query runs");
    assert_eq!(result.rows(), &[vec![Value::Null]]);
}

#[test]
fn empty_result_keeps_its_columns() {
    let result = executor()
        .execute("SELECT player, year FROM batting WHERE year > 2000")
        .expect("query runs");
    assert_eq!(result.column_count(), 2);
    assert_eq!(result.row_count(), 0);
}

#[test]
fn invalid_query_is_an_error_not_an_empty_result() {
    let err = executor()
        .execute("SELEC player FROM batting")
        .expect_err("syntax error");
    assert!(matches!(err, QueryError::InvalidQuery { .. }), "{err:?}");
    assert!(err.to_string().starts_with("SQLite error"));

    let err = executor()
        .execute("SELECT missing_column FROM batting")
        .expect_err("unknown column");
    assert!(matches!(err, QueryError::InvalidQuery { .. }), "{err:?}");

    let err = executor()
        .execute("SELECT 'unterminated FROM batting")
        .expect_err("unrecognized token");
    assert!(matches!(err, QueryError::InvalidQuery { .. }), "{err:?}");
}

#[test]
fn only_one_statement_may_be_submitted() {
    let executor = executor();
    let err = executor
        .execute("SELECT player FROM batting; DELETE FROM batting")
        .expect_err("second statement");
    assert!(matches!(err, QueryError::InvalidQuery { .. }), "{err:?}");
    assert!(err.to_string().contains("DELETE FROM batting"));

    let remaining = executor
        .execute("SELECT player FROM batting")
        .expect("table untouched");
    assert_eq!(remaining.row_count(), 4);
}

#[test]
fn trailing_semicolons_and_comments_are_allowed() {
    let executor = executor();
    for query in [
        "SELECT player FROM batting;",
        "SELECT player FROM batting; ;",
        "SELECT player FROM batting; -- all players",
        "SELECT player FROM batting /* no filter */;",
        "SELECT player FROM batting WHERE player <> ';DROP'",
    ] {
        let result = executor.execute(query).expect(query);
        assert_eq!(result.row_count(), 4, "{query}");
    }
}

#[test]
fn statements_without_columns_are_rejected() {
    let err = executor()
        .execute("DELETE FROM batting")
        .expect_err("not a query");
    assert!(matches!(err, QueryError::NotAQuery(_)), "{err:?}");
}

#[test]
fn grading_session_scores_equivalent_query() {
    let graded = session()
        .grade_query(
            "SELECT player, year FROM batting WHERE year = 1927 ORDER BY player DESC",
            "SELECT player, year FROM batting WHERE year = 1927 ORDER BY player",
        )
        .expect("both queries run");

    assert_eq!(graded.verdict.tier(), Tier::EquivalentUpToOrder);
    assert_eq!(graded.verdict.hints(), &[Hint::RowsOutOfOrder]);
    assert!(graded.breakdown.is_none());
    assert!(graded.render_results().contains("gehrig"));
}

#[test]
fn grading_session_reports_too_many_rows() {
    let graded = session()
        .grade_query(
            "SELECT player FROM batting",
            "SELECT player FROM batting WHERE year = 1927",
        )
        .expect("both queries run");

    // same single column, so the structural tier still applies
    assert_eq!(graded.verdict.tier(), Tier::PartialStructuralMatch);
    assert_eq!(graded.verdict.hints(), &[Hint::TooManyRows]);
}

#[test]
fn grading_session_propagates_student_errors() {
    let err = session()
        .grade_query("SELECT nope FROM batting", "SELECT player FROM batting")
        .expect_err("student query fails");
    assert!(matches!(err, QueryError::InvalidQuery { .. }));
}

#[test]
fn grading_session_continues_after_a_failed_query() {
    let grader = session();
    let expected = grader
        .executor()
        .execute("SELECT player FROM batting WHERE year = 1927")
        .expect("grader query runs");

    let queries = [
        "SELEC player FROM batting",
        "DELETE FROM batting",
        "SELECT player FROM batting WHERE year = 1927",
        "",
        "SELECT player FROM batting",
    ]
    .map(String::from);
    let outcomes: Vec<_> = grader.grade_queries(queries, &expected).collect();

    // the empty line ends the session
    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0].1, Err(QueryError::InvalidQuery { .. })));
    assert!(matches!(outcomes[1].1, Err(QueryError::NotAQuery(_))));
    let (query, graded) = &outcomes[2];
    assert_eq!(query, "SELECT player FROM batting WHERE year = 1927");
    let graded = graded.as_ref().expect("valid query is graded");
    assert_eq!(graded.verdict.tier(), Tier::ExactMatch);
}

#[test]
fn grading_against_a_stored_grader_result_with_breakdown() {
    let grader = Grader::builder()
        .executor(executor())
        .config(GraderConfig::default())
        .breakdown(true)
        .build();
    let expected = grader
        .executor()
        .execute("SELECT player, hits FROM batting WHERE hits IS NOT NULL")
        .expect("grader query runs");

    let graded = grader
        .grade_against(
            "SELECT hits AS h, player AS p FROM batting WHERE hits IS NOT NULL",
            &expected,
        )
        .expect("student query runs");

    assert_eq!(graded.verdict.tier(), Tier::EquivalentUpToOrder);
    assert_eq!(graded.verdict.hints(), &[Hint::ColumnsNamedIncorrectly]);
    let breakdown = graded.breakdown.expect("breakdown requested");
    assert!(
        breakdown
            .passed()
            .any(|e| e.predicate.name() == "rows_unsorted_equivalence")
    );
}
