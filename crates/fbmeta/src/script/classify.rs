//! Keyword-based script classification.

use super::ScriptFile;
use tracing::warn;

/// The object kind a script defines.
///
/// Execution order during an update is always Domain, then Table, then
/// Procedure: later kinds may reference earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Domain,
    Table,
    Procedure,
    /// The script defines none of the supported kinds. Never executed.
    Unsupported,
}

impl Category {
    /// Human-readable label used in progress output and error context.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Domain => "domains",
            Category::Table => "tables",
            Category::Procedure => "procedures",
            Category::Unsupported => "unsupported",
        }
    }

    /// Statement prefixes that may execute under this category.
    ///
    /// Statements not starting with one of these are silently dropped by
    /// the executor: bundled DML, grants, and the like must not run as a
    /// side effect of a schema update.
    pub fn allowed_prefixes(&self) -> &'static [&'static str] {
        match self {
            Category::Domain => &["CREATE DOMAIN", "ALTER DOMAIN"],
            Category::Table => &["CREATE TABLE", "RECREATE TABLE", "ALTER TABLE"],
            Category::Procedure => &[
                "CREATE PROCEDURE",
                "ALTER PROCEDURE",
                "CREATE OR ALTER PROCEDURE",
            ],
            Category::Unsupported => &[],
        }
    }
}

const DOMAIN_KEYWORDS: &[&str] = &["CREATE DOMAIN", "CREATE OR ALTER DOMAIN", "ALTER DOMAIN"];
const TABLE_KEYWORDS: &[&str] = &["CREATE TABLE", "RECREATE TABLE", "ALTER TABLE"];
const PROCEDURE_KEYWORDS: &[&str] = &[
    "CREATE PROCEDURE",
    "CREATE OR ALTER PROCEDURE",
    "ALTER PROCEDURE",
];

/// Classify a script by the defining keywords in its text.
///
/// Case-insensitive substring scan with fixed precedence: domain keywords,
/// then table keywords, then procedure keywords; first match wins. This is
/// a heuristic, not a parser.
// TODO: a file mixing object kinds (a table plus a procedure) classifies as
// its first matching kind only; keep one object kind per file.
pub fn classify(raw_text: &str) -> Category {
    let upper = raw_text.to_uppercase();

    if contains_any(&upper, DOMAIN_KEYWORDS) {
        Category::Domain
    } else if contains_any(&upper, TABLE_KEYWORDS) {
        Category::Table
    } else if contains_any(&upper, PROCEDURE_KEYWORDS) {
        Category::Procedure
    } else {
        Category::Unsupported
    }
}

fn contains_any(upper: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| upper.contains(kw))
}

/// Scripts bucketed by category, preserving discovery order within each
/// bucket.
#[derive(Debug, Default)]
pub struct ClassifiedScripts {
    pub domains: Vec<ScriptFile>,
    pub tables: Vec<ScriptFile>,
    pub procedures: Vec<ScriptFile>,
    /// File names of scripts that matched no supported category.
    pub skipped: Vec<String>,
}

impl ClassifiedScripts {
    /// Classify a discovered script set into ordered buckets.
    ///
    /// Unsupported files are recorded and reported as skipped; they are a
    /// diagnostic, never an error.
    pub fn from_scripts(scripts: Vec<ScriptFile>) -> Self {
        let mut out = ClassifiedScripts::default();

        for script in scripts {
            match classify(&script.raw_text) {
                Category::Domain => out.domains.push(script),
                Category::Table => out.tables.push(script),
                Category::Procedure => out.procedures.push(script),
                Category::Unsupported => {
                    let name = script.file_name();
                    warn!("Skipping script (no supported object kind): {}", name);
                    out.skipped.push(name);
                }
            }
        }

        out
    }

    /// True when no bucket holds an executable script.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.tables.is_empty() && self.procedures.is_empty()
    }
}
