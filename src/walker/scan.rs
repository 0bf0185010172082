//! Local directory scanner
//!
//! Depth-first, top-down traversal: the files of a directory are visited
//! before its sub-directories, and entries are sorted by name so candidate
//! order is stable from run to run.
//!
//! Symlinked files are read through; symlinked directories are not entered.
//! An unreadable scan root is fatal, an unreadable sub-directory is logged
//! and skipped.

use crate::config::SweepConfig;
use crate::error::Result;
use crate::formats::FileKind;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// A file selected for loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Bare file name, e.g. `sales.csv`
    pub file_name: String,

    /// Full path to the file
    pub path: PathBuf,

    /// Containing directory relative to the root, e.g. `/2023/q1`;
    /// empty for files directly in the root
    pub sub_path: String,

    /// Format resolved from the extension
    pub kind: FileKind,
}

/// Result of scanning a root directory
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Candidates in traversal order
    pub candidates: Vec<Candidate>,

    /// Directories read
    pub dirs: u64,

    /// Regular files seen, supported or not
    pub files: u64,

    /// Sub-directories or entries that could not be read
    pub errors: u64,
}

/// Walk `config.root` and collect every file with a supported extension
/// whose name passes the configured filter
pub fn scan(config: &SweepConfig) -> Result<ScanResult> {
    let root = config.root.as_path();
    let mut result = ScanResult::default();

    // The root must be readable; everything below it is best effort
    let root_entries = read_sorted(root)?;
    let mut stack: Vec<PathBuf> = Vec::new();
    visit_dir(config, root, root_entries, &mut stack, &mut result);

    while let Some(dir) = stack.pop() {
        match read_sorted(&dir) {
            Ok(entries) => visit_dir(config, &dir, entries, &mut stack, &mut result),
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Skipping unreadable directory");
                result.errors += 1;
            }
        }
    }

    debug!(
        dirs = result.dirs,
        files = result.files,
        candidates = result.candidates.len(),
        "Scan finished"
    );

    Ok(result)
}

fn read_sorted(dir: &Path) -> std::io::Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

fn visit_dir(
    config: &SweepConfig,
    dir: &Path,
    entries: Vec<fs::DirEntry>,
    stack: &mut Vec<PathBuf>,
    result: &mut ScanResult,
) {
    result.dirs += 1;
    let mut subdirs = Vec::new();

    for entry in entries {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot stat entry");
                result.errors += 1;
                continue;
            }
        };

        let is_file = if file_type.is_dir() {
            subdirs.push(path);
            continue;
        } else if file_type.is_symlink() {
            fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false)
        } else {
            file_type.is_file()
        };

        if !is_file {
            continue;
        }
        result.files += 1;

        let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
            debug!(path = %path.display(), "Skipping non UTF-8 file name");
            continue;
        };

        let Some(kind) = FileKind::from_file_name(&file_name) else {
            continue;
        };

        if !config.is_selected(&file_name) {
            trace!(file = %file_name, "Filtered out");
            continue;
        }

        debug!(path = %path.display(), kind = kind.name(), "Candidate");
        result.candidates.push(Candidate {
            sub_path: sub_path(&config.root, dir),
            file_name,
            path,
            kind,
        });
    }

    // Reverse so the first sub-directory is popped first
    stack.extend(subdirs.into_iter().rev());
}

/// Directory of a file relative to the root, as `/a/b`
pub fn sub_path(root: &Path, dir: &Path) -> String {
    match dir.strip_prefix(root) {
        Ok(relative) => relative
            .components()
            .map(|c| format!("/{}", c.as_os_str().to_string_lossy()))
            .collect(),
        Err(_) => String::new(),
    }
}
