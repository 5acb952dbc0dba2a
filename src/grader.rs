#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! A grading session: one executor, one grader query, many student queries.

use typed_builder::TypedBuilder;

use crate::{
    config::GraderConfig,
    executor::{QueryError, QueryExecutor},
    grade::{Breakdown, Rubric, RubricVerdict},
    types::ResultSet,
};

/// Everything produced by grading one student query.
#[derive(Debug, Clone)]
pub struct GradedQuery {
    /// Result of the student's query
    pub student:   ResultSet,
    /// Result of the grader's query
    pub grader:    ResultSet,
    /// Score and hints
    pub verdict:   RubricVerdict,
    /// Full predicate breakdown, when requested
    pub breakdown: Option<Breakdown>,
}

impl GradedQuery {
    /// Renders both result sets, grader first.
    pub fn render_results(&self) -> String {
        format!(
            "Grader Results:\n{}\nStudent Results:\n{}",
            self.grader.to_table(),
            self.student.to_table()
        )
    }
}

/// Executes student and grader queries and compares their result sets.
#[derive(TypedBuilder)]
pub struct Grader<E: QueryExecutor> {
    /// Backend used to run both queries
    executor:  E,
    /// Thresholds and limits
    #[builder(default)]
    config:    GraderConfig,
    /// Whether to also compute the full predicate breakdown
    #[builder(default)]
    breakdown: bool,
}

impl<E: QueryExecutor> Grader<E> {
    /// Returns the executor.
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Grades `student_query` against `grader_query`.
    ///
    /// Either query failing aborts grading with that error.
    pub fn grade_query(
        &self,
        student_query: &str,
        grader_query: &str,
    ) -> Result<GradedQuery, QueryError> {
        let student = self.executor.execute(student_query)?;
        let grader = self.executor.execute(grader_query)?;
        Ok(self.grade_results(student, grader))
    }

    /// Grades `student_query` against a grader result set computed earlier,
    /// so an interactive session only runs the grader query once.
    pub fn grade_against(
        &self,
        student_query: &str,
        grader: &ResultSet,
    ) -> Result<GradedQuery, QueryError> {
        let student = self.executor.execute(student_query)?;
        Ok(self.grade_results(student, grader.clone()))
    }

    /// Grades each student query in turn against `grader`, stopping at the
    /// first empty query.
    ///
    /// A query that fails yields its error and the session moves on to the
    /// next one.
    pub fn grade_queries<I>(
        &self,
        student_queries: I,
        grader: &ResultSet,
    ) -> impl Iterator<Item = (String, Result<GradedQuery, QueryError>)>
    where
        I: IntoIterator<Item = String>,
    {
        student_queries
            .into_iter()
            .map(|query| query.trim().to_string())
            .take_while(|query| !query.is_empty())
            .map(move |query| {
                let graded = self.grade_against(&query, grader);
                if let Err(e) = &graded {
                    tracing::debug!(%query, error = %e, "Student query failed");
                }
                (query, graded)
            })
    }

    /// Grades two result sets that have already been produced.
    pub fn grade_results(&self, student: ResultSet, grader: ResultSet) -> GradedQuery {
        let rubric = Rubric::new(self.config.clone());
        let verdict = rubric.grade(&student, &grader);
        let breakdown = self.breakdown.then(|| rubric.breakdown(&student, &grader));

        tracing::info!(
            score = verdict.score(),
            hints = verdict.hints().len(),
            "Graded student result set"
        );

        GradedQuery {
            student,
            grader,
            verdict,
            breakdown,
        }
    }
}
