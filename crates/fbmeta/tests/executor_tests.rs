//! Executor integration tests against a recording fake of the driver
//! seam: category ordering, allow-list filtering, first-failure abort,
//! and the build-path report.

use fbmeta::error::{MetaError, Result};
use fbmeta::executor::{run_batch, run_update, StatementRunner};
use fbmeta::script::{ClassifiedScripts, ScriptFile};
use std::path::PathBuf;

/// Records executed statements; fails any statement containing the
/// configured marker.
#[derive(Default)]
struct RecordingRunner {
    executed: Vec<String>,
    fail_on: Option<String>,
}

impl RecordingRunner {
    fn failing_on(marker: &str) -> Self {
        Self {
            executed: Vec::new(),
            fail_on: Some(marker.to_string()),
        }
    }
}

impl StatementRunner for RecordingRunner {
    fn execute_ddl(&mut self, sql: &str) -> Result<()> {
        if let Some(marker) = &self.fail_on {
            if sql.contains(marker.as_str()) {
                return Err(MetaError::Connection("simulated driver failure".into()));
            }
        }
        self.executed.push(sql.to_string());
        Ok(())
    }
}

fn script(name: &str, text: &str) -> ScriptFile {
    ScriptFile {
        path: PathBuf::from(name),
        raw_text: text.to_string(),
    }
}

#[test]
fn update_executes_domains_then_tables_then_procedures() {
    // Deliberately fed in reverse category order.
    let classified = ClassifiedScripts::from_scripts(vec![
        script("a_proc.sql", "CREATE PROCEDURE P AS BEGIN END;"),
        script("b_table.sql", "CREATE TABLE T (ID INTEGER);"),
        script("c_domain.sql", "CREATE DOMAIN AGE AS SMALLINT;"),
    ]);

    let mut runner = RecordingRunner::default();
    let summary = run_update(&classified, &mut runner).unwrap();

    assert_eq!(summary.executed(), 3);
    assert!(runner.executed[0].starts_with("CREATE DOMAIN"));
    assert!(runner.executed[1].starts_with("CREATE TABLE"));
    assert!(runner.executed[2].starts_with("CREATE PROCEDURE"));
}

#[test]
fn update_preserves_file_and_statement_order_within_a_category() {
    let classified = ClassifiedScripts::from_scripts(vec![
        script(
            "10_tables.sql",
            "CREATE TABLE A (ID INTEGER);\nCREATE TABLE B (ID INTEGER);",
        ),
        script("20_tables.sql", "CREATE TABLE C (ID INTEGER);"),
    ]);

    let mut runner = RecordingRunner::default();
    run_update(&classified, &mut runner).unwrap();

    let tables: Vec<&str> = runner
        .executed
        .iter()
        .map(|s| s.split_whitespace().nth(2).unwrap())
        .collect();
    assert_eq!(tables, vec!["A", "B", "C"]);
}

#[test]
fn update_aborts_on_first_failure_with_context() {
    let classified = ClassifiedScripts::from_scripts(vec![
        script("domain.sql", "CREATE DOMAIN AGE AS SMALLINT;"),
        script(
            "tables.sql",
            "CREATE TABLE GOOD (ID INTEGER);\nCREATE TABLE BROKEN (ID INTEGER);",
        ),
        script("proc.sql", "CREATE PROCEDURE P AS BEGIN END;"),
    ]);

    let mut runner = RecordingRunner::failing_on("BROKEN");
    let err = run_update(&classified, &mut runner).unwrap_err();

    match err {
        MetaError::Execution {
            category,
            statement,
            message,
        } => {
            assert_eq!(category, "tables");
            assert!(statement.contains("BROKEN"));
            assert!(message.contains("simulated driver failure"));
        }
        other => panic!("expected Execution error, got {:?}", other),
    }

    // Nothing after the failing statement ran, in any category.
    assert_eq!(runner.executed.len(), 2);
    assert!(runner.executed.iter().all(|s| !s.contains("PROCEDURE")));
}

#[test]
fn update_silently_drops_statements_outside_the_allow_list() {
    let classified = ClassifiedScripts::from_scripts(vec![script(
        "mixed.sql",
        "CREATE TABLE T (ID INTEGER);\n\
         INSERT INTO T VALUES (1);\n\
         GRANT ALL ON T TO PUBLIC;",
    )]);

    let mut runner = RecordingRunner::default();
    let summary = run_update(&classified, &mut runner).unwrap();

    assert_eq!(summary.tables.executed, 1);
    assert_eq!(summary.tables.filtered, 2);
    assert_eq!(runner.executed.len(), 1);
}

#[test]
fn update_with_only_unsupported_files_executes_nothing() {
    let classified =
        ClassifiedScripts::from_scripts(vec![script("data.sql", "INSERT INTO T VALUES (1);")]);

    let mut runner = RecordingRunner::default();
    let summary = run_update(&classified, &mut runner).unwrap();

    assert_eq!(summary.executed(), 0);
    assert!(runner.executed.is_empty());
    assert_eq!(summary.skipped_files, vec!["data.sql"]);
}

#[test]
fn update_rejects_unparseable_script() {
    let classified = ClassifiedScripts::from_scripts(vec![script(
        "bad.sql",
        "CREATE TABLE T (NAME VARCHAR(10) DEFAULT 'oops);",
    )]);

    let mut runner = RecordingRunner::default();
    let err = run_update(&classified, &mut runner).unwrap_err();
    assert!(matches!(err, MetaError::Execution { .. }));
    assert!(runner.executed.is_empty());
}

#[test]
fn batch_records_one_result_per_script_and_stops_at_first_failure() {
    let scripts = vec![
        script("01_ok.sql", "CREATE DOMAIN AGE AS SMALLINT;"),
        script("02_bad.sql", "CREATE TABLE BROKEN (ID INTEGER);"),
        script("03_never.sql", "CREATE TABLE AFTER_FAIL (ID INTEGER);"),
    ];

    let mut runner = RecordingRunner::failing_on("BROKEN");
    let report = run_batch(&scripts, &mut runner);

    assert!(!report.is_success());
    assert_eq!(report.results.len(), 2);

    assert_eq!(report.results[0].script_name, "01_ok.sql");
    assert!(report.results[0].success);

    assert_eq!(report.results[1].script_name, "02_bad.sql");
    assert!(!report.results[1].success);
    assert!(!report.results[1].message.is_empty());

    assert!(runner.executed.iter().all(|s| !s.contains("AFTER_FAIL")));
}

#[test]
fn batch_runs_whole_files_without_classification_or_allow_list() {
    // The build path executes everything in the file, DML included.
    let scripts = vec![script(
        "seed.sql",
        "CREATE TABLE T (ID INTEGER);\nINSERT INTO T VALUES (1);",
    )];

    let mut runner = RecordingRunner::default();
    let report = run_batch(&scripts, &mut runner);

    assert!(report.is_success());
    assert_eq!(runner.executed.len(), 2);
    assert!(runner.executed[1].starts_with("INSERT"));
}
