//! Database file lifecycle: target path resolution, creation, and the
//! drop-after-failure cleanup step.

use crate::driver::{self, ConnectParams};
use crate::error::{MetaError, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// Resolve the build target into a concrete database file path.
///
/// A target that already names a `.fdb` file (case-insensitive) is used
/// as-is. Anything else is treated as a directory and a unique file name
/// is synthesized from the UTC timestamp plus a random suffix, so
/// repeated builds into the same directory never collide.
pub fn resolve_database_path(target: &Path) -> PathBuf {
    let has_fdb_extension = target
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("fdb"))
        .unwrap_or(false);

    if has_fdb_extension {
        return target.to_path_buf();
    }

    let file_name = format!(
        "{}_{}.fdb",
        Utc::now().format("%Y%m%d_%H%M%S"),
        Uuid::new_v4()
    );
    target.join(file_name)
}

/// Refuse to build over an existing file.
///
/// Creation must never overwrite: an existing file at the resolved path
/// is a refusal with no side effects.
pub fn ensure_absent(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(MetaError::Creation(format!(
            "Database file already exists: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Create a new database at the parameters' path, refusing overwrites.
pub fn create(params: &ConnectParams) -> Result<()> {
    ensure_absent(&params.db_path)?;
    driver::create_database(params)
}

/// Drop a freshly created database after a failed build.
///
/// A drop failure is escalated to [`MetaError::Cleanup`]: the tool must
/// not continue as if the failed artifact were gone, and the operator has
/// to remove the file by hand.
pub fn drop_after_failure(params: &ConnectParams) -> Result<()> {
    warn!(
        "Build failed; dropping newly created database {}",
        params.db_path.display()
    );

    driver::drop_database(params).map_err(|e| {
        MetaError::Cleanup(format!(
            "Remove the database file by hand: {}. Drop failed with: {}",
            params.db_path.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fdb_target_is_used_as_is() {
        let target = Path::new("/data/app.fdb");
        assert_eq!(resolve_database_path(target), target);

        let upper = Path::new("/data/APP.FDB");
        assert_eq!(resolve_database_path(upper), upper);
    }

    #[test]
    fn test_bare_directory_gets_synthesized_file_name() {
        let resolved = resolve_database_path(Path::new("/data/builds"));
        assert_eq!(resolved.parent(), Some(Path::new("/data/builds")));

        let name = resolved.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with(".fdb"));
        // yyyymmdd_hhmmss prefix, then the random suffix.
        assert_eq!(name.as_bytes()[8], b'_');
        assert!(name.len() > "20250101_120000_.fdb".len());
    }

    #[test]
    fn test_synthesized_names_are_unique() {
        let a = resolve_database_path(Path::new("/data"));
        let b = resolve_database_path(Path::new("/data"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_existing_file_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("existing.fdb");
        std::fs::write(&path, b"not empty").unwrap();

        let err = ensure_absent(&path).unwrap_err();
        assert!(matches!(err, MetaError::Creation(_)));
        // Refusal has no side effects.
        assert_eq!(std::fs::read(&path).unwrap(), b"not empty");
    }

    #[test]
    fn test_absent_file_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ensure_absent(&dir.path().join("fresh.fdb")).is_ok());
    }
}
