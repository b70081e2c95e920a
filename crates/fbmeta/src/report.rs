//! Per-script execution reporting for the build path.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of executing one script.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// Script file name.
    pub script_name: String,

    /// Whether every statement in the script succeeded.
    pub success: bool,

    /// "OK" on success, the driver's message on failure.
    pub message: String,

    /// Wall-clock execution time for the script.
    pub duration_ms: u64,
}

/// Ordered, append-only record of script outcomes.
///
/// The overall success flag is not stored: it is computed as "no recorded
/// failure", so it cannot disagree with the entries.
#[derive(Debug, Default, Serialize)]
pub struct ExecutionReport {
    /// When the run started.
    pub started_at: Option<DateTime<Utc>>,

    /// One entry per attempted script, in execution order.
    pub results: Vec<ExecutionResult>,
}

impl ExecutionReport {
    /// Create an empty report stamped with the current time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            results: Vec::new(),
        }
    }

    /// Append one script outcome.
    pub fn record(
        &mut self,
        script_name: impl Into<String>,
        success: bool,
        message: impl Into<String>,
        duration_ms: u64,
    ) {
        self.results.push(ExecutionResult {
            script_name: script_name.into(),
            success,
            message: message.into(),
            duration_ms,
        });
    }

    /// True when every recorded script succeeded.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }

    /// The first failing entry, if any.
    pub fn first_failure(&self) -> Option<&ExecutionResult> {
        self.results.iter().find(|r| !r.success)
    }

    /// Number of scripts that succeeded.
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Render the report for operators.
    pub fn render(&self) -> String {
        let mut out = String::from("Script execution report:\n");
        for result in &self.results {
            let status = if result.success { "OK  " } else { "FAIL" };
            out.push_str(&format!(
                "  {}  {} ({} ms)",
                status, result.script_name, result.duration_ms
            ));
            if !result.success {
                out.push_str(&format!(": {}", result.message));
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "Scripts: {}/{} succeeded\n",
            self.succeeded(),
            self.results.len()
        ));
        out
    }

    /// Serialize the report to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
