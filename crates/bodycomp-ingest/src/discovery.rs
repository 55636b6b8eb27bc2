//! Weight-file discovery.

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::{IngestError, Result};

/// List files in the weight-files folder whose names match the mask.
///
/// Non-recursive. Results are sorted by file name so that multi-file runs
/// process and deduplicate in a reproducible order.
pub fn list_weight_files(folder: &Path, mask: &str) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(IngestError::FolderNotFound {
            path: folder.to_path_buf(),
        });
    }
    let pattern = Pattern::new(mask).map_err(|source| IngestError::InvalidFileMask {
        mask: mask.to_string(),
        source,
    })?;

    let entries = std::fs::read_dir(folder).map_err(|source| IngestError::FolderRead {
        path: folder.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::FolderRead {
            path: folder.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| pattern.matches(name))
            .unwrap_or(false);
        if matches {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}
