//! The three operation flows: build, update, export.
//!
//! This module owns the transaction boundary for updates and the
//! drop-after-failure policy for builds; the executors below it never
//! commit, roll back, or delete anything.

use crate::catalog;
use crate::driver::{self, ConnectParams};
use crate::error::Result;
use crate::executor;
use crate::lifecycle;
use crate::report::ExecutionReport;
use crate::script::{self, ClassifiedScripts, ScriptFile};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub use crate::catalog::ExportSummary;
pub use crate::executor::UpdateSummary;

/// Options for a build run.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Target database file, or a directory to synthesize one in.
    pub db_target: PathBuf,
    /// Directory of scripts to apply; `None` builds an empty database.
    pub scripts_dir: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl BuildOptions {
    fn connect_params(&self, db_path: PathBuf) -> ConnectParams {
        ConnectParams {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            db_path,
        }
    }
}

/// Result of a build run.
///
/// A script failure is not an `Err`: it lives in the report, with
/// `database_dropped` recording that the cleanup ran, so callers can
/// still show the full per-script report.
#[derive(Debug, Serialize)]
pub struct BuildOutcome {
    /// Resolved path of the database file.
    pub database_path: PathBuf,

    /// Per-script outcomes, in execution order.
    pub report: ExecutionReport,

    /// True when a script failure caused the new database to be dropped.
    pub database_dropped: bool,
}

impl BuildOutcome {
    /// True when every script succeeded.
    pub fn is_success(&self) -> bool {
        self.report.is_success()
    }
}

/// Create a new database and apply the scripts directory to it.
///
/// Scripts are discovered and read before the database is created, so a
/// bad directory never creates a file that immediately needs dropping.
/// They then run as whole-file batches in file-name order. On any script
/// failure the new database is dropped again; a failed drop escalates to
/// a fatal cleanup error.
pub fn build_database(options: &BuildOptions) -> Result<BuildOutcome> {
    let scripts = options
        .scripts_dir
        .as_deref()
        .map(script::discover_scripts)
        .transpose()?;

    let database_path = lifecycle::resolve_database_path(&options.db_target);
    let params = options.connect_params(database_path.clone());
    lifecycle::create(&params)?;

    let Some(scripts) = scripts else {
        info!("No scripts directory given; created empty database");
        return Ok(BuildOutcome {
            database_path,
            report: ExecutionReport::new(),
            database_dropped: false,
        });
    };

    info!("Executing {} script(s) against the new database", scripts.len());

    let report = match execute_build_scripts(&params, &scripts) {
        Ok(report) => report,
        Err(e) => {
            // Could not even run the scripts; the fresh file still has to go.
            lifecycle::drop_after_failure(&params)?;
            return Err(e);
        }
    };

    let database_dropped = if report.is_success() {
        false
    } else {
        lifecycle::drop_after_failure(&params)?;
        true
    };

    Ok(BuildOutcome {
        database_path,
        report,
        database_dropped,
    })
}

fn execute_build_scripts(params: &ConnectParams, scripts: &[ScriptFile]) -> Result<ExecutionReport> {
    let mut conn = driver::connect_with_params(params)?;
    Ok(executor::run_batch(scripts, &mut conn))
}

/// Apply incremental scripts to an existing database in one transaction.
///
/// Scripts are classified into domain/table/procedure buckets and run in
/// that order regardless of file order; unsupported files are skipped
/// with a diagnostic. The transaction commits only when every statement
/// succeeded; any failure rolls the whole run back.
pub fn update_database(connection_string: &str, scripts_dir: &Path) -> Result<UpdateSummary> {
    let scripts = script::discover_scripts(scripts_dir)?;
    let classified = ClassifiedScripts::from_scripts(scripts);

    if classified.is_empty() {
        info!("No script matched a supported category; nothing to execute");
        return Ok(UpdateSummary {
            skipped_files: classified.skipped,
            ..UpdateSummary::default()
        });
    }

    let mut conn = driver::connect(connection_string)?;
    let mut tx = driver::begin_transaction(&mut conn)?;

    match executor::run_update(&classified, &mut tx) {
        Ok(summary) => {
            tx.commit()?;
            info!(
                "Update committed: {} statement(s) executed, {} filtered",
                summary.executed(),
                summary.filtered()
            );
            Ok(summary)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback() {
                error!("Rollback after failed update also failed: {}", rollback_err);
            } else {
                info!("Update rolled back; no changes were committed");
            }
            Err(e)
        }
    }
}

/// Reconstruct DDL scripts for every domain, table, and procedure in an
/// existing database.
///
/// The output directory is created if absent. Idempotent: re-running
/// overwrites the same per-object files.
pub fn export_scripts(connection_string: &str, output_dir: &Path) -> Result<ExportSummary> {
    let mut conn = driver::connect(connection_string)?;
    std::fs::create_dir_all(output_dir)?;

    let summary = ExportSummary {
        domains: catalog::export_domains(&mut conn, output_dir)?,
        tables: catalog::export_tables(&mut conn, output_dir)?,
        procedures: catalog::export_procedures(&mut conn, output_dir)?,
    };

    info!(
        "Export finished: {} domain(s), {} table(s), {} procedure(s)",
        summary.domains, summary.tables, summary.procedures
    );
    Ok(summary)
}
