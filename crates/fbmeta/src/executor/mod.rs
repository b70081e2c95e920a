//! Statement execution: the transactional update executor and the
//! per-script batch executor used by build.

use crate::error::{MetaError, Result};
use crate::report::ExecutionReport;
use crate::script::{split_statements, Category, ClassifiedScripts, ScriptFile};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

/// Executes one SQL statement against the database.
///
/// The update path implements this over a shared transaction, the build
/// path over an auto-committing connection; tests use recording fakes.
pub trait StatementRunner {
    fn execute_ddl(&mut self, sql: &str) -> Result<()>;
}

/// Whether a statement may execute under the given category.
///
/// The comparison is on the whitespace-normalized, uppercased statement
/// head, so formatting differences never defeat the allow-list.
pub fn is_statement_allowed(statement: &str, category: Category) -> bool {
    category.allowed_prefixes().iter().any(|prefix| {
        let words = prefix.split_whitespace().count();
        statement_head(statement, words) == *prefix
    })
}

fn statement_head(statement: &str, words: usize) -> String {
    statement
        .split_whitespace()
        .take(words)
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Per-category statement counts for an update run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CategoryCounts {
    /// Statements executed.
    pub executed: usize,
    /// Statements dropped by the allow-list.
    pub filtered: usize,
}

/// What an update run did.
#[derive(Debug, Default, Serialize)]
pub struct UpdateSummary {
    pub domains: CategoryCounts,
    pub tables: CategoryCounts,
    pub procedures: CategoryCounts,
    /// Files that matched no supported category and were skipped.
    pub skipped_files: Vec<String>,
}

impl UpdateSummary {
    /// Total statements executed across all categories.
    pub fn executed(&self) -> usize {
        self.domains.executed + self.tables.executed + self.procedures.executed
    }

    /// Total statements dropped by the allow-list.
    pub fn filtered(&self) -> usize {
        self.domains.filtered + self.tables.filtered + self.procedures.filtered
    }
}

/// Execute classified scripts against one transaction, in fixed category
/// order: domains, then tables, then procedures.
///
/// Within a category, files run in discovery order and statements in
/// script order. The first failing statement aborts the whole run with its
/// category, text, and driver message. This function never commits or
/// rolls back; the caller owns the transaction boundary and must roll back
/// on `Err` and commit on `Ok`.
pub fn run_update(
    scripts: &ClassifiedScripts,
    runner: &mut dyn StatementRunner,
) -> Result<UpdateSummary> {
    let mut summary = UpdateSummary {
        skipped_files: scripts.skipped.clone(),
        ..UpdateSummary::default()
    };

    summary.domains = run_category(Category::Domain, &scripts.domains, runner)?;
    summary.tables = run_category(Category::Table, &scripts.tables, runner)?;
    summary.procedures = run_category(Category::Procedure, &scripts.procedures, runner)?;

    Ok(summary)
}

fn run_category(
    category: Category,
    files: &[ScriptFile],
    runner: &mut dyn StatementRunner,
) -> Result<CategoryCounts> {
    let mut counts = CategoryCounts::default();
    if files.is_empty() {
        return Ok(counts);
    }

    info!("Processing {}: {} file(s)", category.label(), files.len());

    for file in files {
        let statements = split_statements(&file.raw_text).map_err(|e| {
            MetaError::execution(
                category.label(),
                format!("<script {}>", file.file_name()),
                e.to_string(),
            )
        })?;

        for statement in statements {
            if !is_statement_allowed(&statement.text, category) {
                debug!(
                    "Dropping statement not allowed for {}: {}",
                    category.label(),
                    statement_head(&statement.text, 3)
                );
                counts.filtered += 1;
                continue;
            }

            runner.execute_ddl(&statement.text).map_err(|e| {
                MetaError::execution(category.label(), statement.text.clone(), e.to_string())
            })?;
            counts.executed += 1;
        }
    }

    Ok(counts)
}

/// Execute scripts as whole-file batches, recording one report entry per
/// script.
///
/// Used by the build path: no classification, no allow-list. Execution
/// stops at the first failing script, but the report still lists every
/// script attempted so the operator sees what ran and what did not.
pub fn run_batch(scripts: &[ScriptFile], runner: &mut dyn StatementRunner) -> ExecutionReport {
    let mut report = ExecutionReport::new();

    for script in scripts {
        let name = script.file_name();
        let start = Instant::now();

        match run_script(script, runner) {
            Ok(count) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!("Executed {} statement(s) from {}", count, name);
                report.record(name, true, "OK", elapsed);
            }
            Err(message) => {
                let elapsed = start.elapsed().as_millis() as u64;
                report.record(name, false, message, elapsed);
                break;
            }
        }
    }

    report
}

fn run_script(
    script: &ScriptFile,
    runner: &mut dyn StatementRunner,
) -> std::result::Result<usize, String> {
    let statements = split_statements(&script.raw_text).map_err(|e| e.to_string())?;

    let mut count = 0;
    for statement in statements {
        runner
            .execute_ddl(&statement.text)
            .map_err(|e| e.to_string())?;
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list_accepts_ddl_for_its_kind() {
        assert!(is_statement_allowed(
            "CREATE DOMAIN AGE AS SMALLINT",
            Category::Domain
        ));
        assert!(is_statement_allowed(
            "recreate table T (id int)",
            Category::Table
        ));
        assert!(is_statement_allowed(
            "CREATE OR ALTER PROCEDURE P AS BEGIN END",
            Category::Procedure
        ));
    }

    #[test]
    fn test_allow_list_rejects_other_kinds_and_dml() {
        assert!(!is_statement_allowed("INSERT INTO T VALUES (1)", Category::Table));
        assert!(!is_statement_allowed("GRANT ALL ON T TO PUBLIC", Category::Table));
        assert!(!is_statement_allowed(
            "CREATE TABLE T (X INT)",
            Category::Domain
        ));
        assert!(!is_statement_allowed(
            "CREATE PROCEDURE P AS BEGIN END",
            Category::Table
        ));
    }

    #[test]
    fn test_allow_list_normalizes_whitespace_and_respects_word_boundaries() {
        assert!(is_statement_allowed(
            "CREATE\n    TABLE T (X INT)",
            Category::Table
        ));
        // A longer first word must not match on the raw prefix.
        assert!(!is_statement_allowed(
            "CREATE TABLESPACE X",
            Category::Table
        ));
    }
}
