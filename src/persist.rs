use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::NamedTempFile;

use crate::errors::SimdbenchError;
use crate::types::{BenchmarkRow, BenchmarkTable};

/// Default location of the results table, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "./results/benchmark.csv";

/// Write the table as headerless CSV, one `\n`-terminated line per row.
///
/// The previous contents of `path` are replaced in one step (see
/// [`replace_file`]), so a failed write leaves any previous results intact.
/// The parent directory must already exist.
pub fn write_table(table: &[BenchmarkRow], path: &Path) -> Result<()> {
    replace_file(path, |tmp| {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(tmp);
        for row in table {
            writer.serialize(row)?;
        }
        writer.flush()
    })
    .map_err(|source| SimdbenchError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), rows = table.len(), "results table written");
    Ok(())
}

/// Replace the file at `path` with whatever `fill` writes.
///
/// `fill` writes into a temporary file in the destination directory, which is
/// renamed over the destination only once `fill` succeeds. A symlink at
/// `path` is followed so its target gets the new contents. An existing file
/// keeps its permissions; a new one is created 0644 on unix.
pub fn replace_file<F>(path: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> io::Result<()>,
{
    let target = resolve_target(path);
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    fill(&mut tmp)?;

    let permissions = match fs::metadata(&target) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => new_file_permissions(),
    };
    if let Some(permissions) = permissions {
        tmp.as_file().set_permissions(permissions)?;
    }

    tmp.persist(&target).map_err(|e| e.error)?;
    Ok(())
}

fn resolve_target(path: &Path) -> PathBuf {
    match fs::symlink_metadata(path) {
        // a dangling link cannot be resolved; it gets replaced by a file
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

// NamedTempFile is created 0600
#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

/// Read a table previously written by [`write_table`].
pub fn read_table(path: &Path) -> Result<BenchmarkTable> {
    let read_err = |detail: String| SimdbenchError::OutputRead {
        path: path.to_path_buf(),
        detail,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| read_err(e.to_string()))?;

    let table = reader
        .deserialize::<BenchmarkRow>()
        .collect::<Result<BenchmarkTable, csv::Error>>()
        .map_err(|e| read_err(e.to_string()))?;

    Ok(table)
}
