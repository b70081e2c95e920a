//! SQL script files: discovery, classification, statement splitting.

mod classify;
mod split;

pub use classify::{classify, ClassifiedScripts, Category};
pub use split::{split_statements, SplitError, Statement};

use crate::error::{MetaError, Result};
use std::path::{Path, PathBuf};

/// One SQL script file, read into memory at discovery time.
#[derive(Debug, Clone)]
pub struct ScriptFile {
    /// Full path of the file on disk.
    pub path: PathBuf,
    /// The file's complete text.
    pub raw_text: String,
}

impl ScriptFile {
    /// File name portion of the path, for diagnostics and reports.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Discover `*.sql` files directly under `dir` (non-recursive) and read
/// their contents.
///
/// Files are returned sorted by file name, case-insensitively, so script
/// authors control execution order with numeric prefixes. An empty result
/// is an error: running against zero scripts is always a caller mistake.
pub fn discover_scripts(dir: &Path) -> Result<Vec<ScriptFile>> {
    if !dir.is_dir() {
        return Err(MetaError::Path(format!(
            "Scripts directory not found: {}",
            dir.display()
        )));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && has_sql_extension(p))
        .collect();

    paths.sort_by_key(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    });

    if paths.is_empty() {
        return Err(MetaError::ScriptDiscovery(format!(
            "No *.sql files found in: {}",
            dir.display()
        )));
    }

    let mut scripts = Vec::with_capacity(paths.len());
    for path in paths {
        let raw_text = std::fs::read_to_string(&path)?;
        scripts.push(ScriptFile { path, raw_text });
    }

    Ok(scripts)
}

fn has_sql_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("sql"))
        .unwrap_or(false)
}
