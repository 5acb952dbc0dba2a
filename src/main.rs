#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # resultgrade
//! ## Introduction
//!
//! Grades SQL homework by comparing the rows a student's query returns with
//! the rows a reference query returns.
//!
//! `resultgrade interactive --database lahman.db` asks for the reference query
//! once, then grades every student query typed afterwards. `resultgrade
//! compare student.json grader.json` grades two stored result sets.

use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use resultgrade::{
    GradedQuery, Grader, GraderConfig, QueryError, QueryExecutor, ResultSet, SqliteExecutor,
};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade student queries typed at a prompt
    Interactive {
        /// SQLite database both queries run against
        database:      PathBuf,
        /// Reference query; prompted for when absent
        grader_query:  Option<String>,
        /// Print both result sets before the verdict
        print_results: bool,
        /// Print every predicate outcome
        breakdown:     bool,
    },
    /// Grade two result sets stored as JSON
    Compare {
        /// Student result set file
        student:       PathBuf,
        /// Grader result set file
        grader:        PathBuf,
        /// Print both result sets before the verdict
        print_results: bool,
        /// Print every predicate outcome
        breakdown:     bool,
        /// Emit the verdict as JSON
        json:          bool,
    },
}

/// Parsed command line.
#[derive(Debug, Clone)]
struct Opts {
    /// Log at DEBUG instead of INFO
    verbose: bool,
    /// Subcommand to run
    cmd:     Cmd,
}

/// parses the print-results switch
fn print_results_switch() -> impl Parser<bool> {
    long("print-results")
        .short('p')
        .help("Print grader and student results")
        .switch()
}

/// parses the breakdown switch
fn breakdown_switch() -> impl Parser<bool> {
    long("breakdown")
        .short('b')
        .help("Print the outcome of every predicate")
        .switch()
}

/// parses the `interactive` subcommand
fn interactive_cmd() -> impl Parser<Cmd> {
    let database = long("database")
        .short('d')
        .help("Path to the SQLite database")
        .argument::<PathBuf>("PATH");
    let grader_query = long("grader-query")
        .short('g')
        .help("Reference query (prompted for when omitted)")
        .argument::<String>("SQL")
        .optional();
    let print_results = print_results_switch();
    let breakdown = breakdown_switch();

    construct!(Cmd::Interactive {
        database,
        grader_query,
        print_results,
        breakdown
    })
    .to_options()
    .command("interactive")
    .help("Grade student queries against a reference query")
}

/// parses the `compare` subcommand
fn compare_cmd() -> impl Parser<Cmd> {
    let print_results = print_results_switch();
    let breakdown = breakdown_switch();
    let json = long("json").help("Print the verdict as JSON").switch();
    let student = positional::<PathBuf>("STUDENT").help("Student result set (JSON)");
    let grader = positional::<PathBuf>("GRADER").help("Grader result set (JSON)");

    construct!(Cmd::Compare {
        print_results,
        breakdown,
        json,
        student,
        grader
    })
    .to_options()
    .command("compare")
    .help("Grade two stored result sets")
}

/// Parse the command line arguments and return `Opts`
fn options() -> Opts {
    let verbose = long("verbose")
        .short('v')
        .help("Log debug output")
        .switch();
    let interactive = interactive_cmd();
    let compare = compare_cmd();
    let cmd = construct!([interactive, compare]);

    construct!(Opts { verbose, cmd })
        .to_options()
        .descr("Grades SQL query results against a reference")
        .run()
}

/// Prints one grading outcome to the terminal.
fn report(graded: &GradedQuery, print_results: bool) {
    if print_results {
        println!("{}", graded.render_results());
    }

    println!("{}", graded.verdict.to_table());

    if let Some(breakdown) = &graded.breakdown {
        println!("{}", breakdown.to_table());
    }
}

/// Prints `prompt` and reads one trimmed line; `None` on end of input.
fn prompt_line(input: &mut impl BufRead, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush().context("Could not flush stdout")?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("Could not read from stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Runs the interactive grading loop.
fn interactive(
    database: PathBuf,
    grader_query: Option<String>,
    print_results: bool,
    breakdown: bool,
    config: GraderConfig,
) -> Result<()> {
    let executor = SqliteExecutor::open(&database)?;
    let grader = Grader::builder()
        .executor(executor)
        .config(config)
        .breakdown(breakdown)
        .build();

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    let grader_query = match grader_query {
        Some(q) => q,
        None => match prompt_line(&mut input, "Enter Grader Query: ")? {
            Some(q) if !q.is_empty() => q,
            _ => anyhow::bail!("No grader query given"),
        },
    };
    let expected = grader
        .executor()
        .execute(&grader_query)
        .with_context(|| format!("Grader query failed: {grader_query}"))?;

    let student_queries = std::iter::from_fn(|| {
        prompt_line(&mut input, "Enter Student Query: ").unwrap_or_else(|e| {
            tracing::error!("{e:#}");
            None
        })
    });
    for (_, graded) in grader.grade_queries(student_queries, &expected) {
        match graded {
            Ok(graded) => report(&graded, print_results),
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
    }

    Ok(())
}

/// Reads a result set from a JSON file.
fn load_result_set(path: &Path) -> Result<ResultSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    ResultSet::from_json(&text).with_context(|| format!("Could not parse {}", path.display()))
}

fn main() -> Result<()> {
    dotenv().ok();
    let opts = options();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let level = if opts.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::registry()
        .with(fmt)
        .with(LevelFilter::from_level(level))
        .init();

    let config = GraderConfig::from_env();
    config.validate()?;

    match opts.cmd {
        Cmd::Interactive {
            database,
            grader_query,
            print_results,
            breakdown,
        } => interactive(database, grader_query, print_results, breakdown, config)?,
        Cmd::Compare {
            student,
            grader,
            print_results,
            breakdown,
            json,
        } => {
            let student = load_result_set(&student)?;
            let grader = load_result_set(&grader)?;
            let session = Grader::builder()
                .executor(NoExecutor)
                .config(config)
                .breakdown(breakdown)
                .build();
            let graded = session.grade_results(student, grader);

            if json {
                let out = serde_json::json!({
                    "score": graded.verdict.score(),
                    "tier": graded.verdict.tier(),
                    "hints": graded.verdict.hint_messages(),
                    "breakdown": graded.breakdown,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                report(&graded, print_results);
            }
        }
    };

    Ok(())
}

/// Executor for sessions that only grade stored result sets.
struct NoExecutor;

impl QueryExecutor for NoExecutor {
    fn execute(&self, statement: &str) -> Result<ResultSet, QueryError> {
        Err(QueryError::Execution(format!(
            "No database is attached; cannot run `{statement}`"
        )))
    }
}
