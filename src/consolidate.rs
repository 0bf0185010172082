//! Consolidator - turns a directory of tabular files into one database
//!
//! The run has three phases:
//! - Scan the root for candidates (see [`crate::walker::scan`])
//! - Group candidates by file name and load each group
//! - Name the surviving tables and write them to `<root>/db.sqlite`
//!
//! Naming only depends on how many files of a group loaded into a non-empty
//! table, so a group is fully loaded before any of its tables is written.
//! Only one group is held in memory at a time.

use crate::config::{NameFilter, SweepConfig};
use crate::db::TableWriter;
use crate::error::{FileOutcome, Result};
use crate::naming::{group_by_name, table_name, NameRegistry};
use crate::table::Table;
use crate::walker::{scan, Candidate};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Result of a completed run
#[derive(Debug)]
pub struct SweepReport {
    /// Location of the database file, whether or not anything was written
    pub db_path: PathBuf,

    /// One outcome per candidate, in traversal order within name groups
    pub outcomes: Vec<FileOutcome>,

    /// Directories scanned
    pub dirs: u64,

    /// Files seen during the scan
    pub files: u64,

    /// Unreadable directories or entries
    pub scan_errors: u64,

    /// Time taken for the run
    pub duration: Duration,
}

impl SweepReport {
    /// Path of the database, if at least one table was written
    pub fn database(&self) -> Option<&Path> {
        if self.tables_written() > 0 {
            Some(&self.db_path)
        } else {
            None
        }
    }

    /// Outcomes that produced a table
    pub fn written(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_written())
    }

    /// Outcomes that were skipped
    pub fn skipped(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_written())
    }

    pub fn tables_written(&self) -> usize {
        self.written().count()
    }

    /// Rows inserted across all tables
    pub fn total_rows(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|o| match o {
                FileOutcome::Written { rows, .. } => *rows as u64,
                FileOutcome::Skipped { .. } => 0,
            })
            .sum()
    }
}

/// Progress snapshot, reported after every candidate
#[derive(Debug, Clone, Default)]
pub struct SweepProgress {
    /// Candidates found by the scan
    pub total: u64,

    /// Candidates loaded so far
    pub processed: u64,

    pub tables_written: u64,
    pub rows_written: u64,
    pub skipped: u64,

    /// Time since the run started
    pub elapsed: Duration,
}

impl SweepProgress {
    /// Rows inserted per second
    pub fn rows_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.rows_written as f64 / secs
        } else {
            0.0
        }
    }
}

/// Drives a single consolidation run
pub struct Consolidator {
    config: SweepConfig,
}

impl Consolidator {
    pub fn new(config: SweepConfig) -> Self {
        Self { config }
    }

    /// Run without progress reporting
    pub fn run(self) -> Result<SweepReport> {
        self.run_with_progress(|_| {})
    }

    /// Run, calling `on_progress` after every candidate
    pub fn run_with_progress<F>(mut self, mut on_progress: F) -> Result<SweepReport>
    where
        F: FnMut(&SweepProgress),
    {
        let start_time = Instant::now();

        // Canonical root so the returned database path is absolute
        self.config.root = self.config.root.canonicalize()?;

        info!(
            root = %self.config.root.display(),
            filter = self.config.filter.as_ref().map(NameFilter::pattern),
            "Starting sweep"
        );

        let scanned = scan(&self.config)?;
        let db_path = self.config.db_path();
        let mut writer = TableWriter::open(&db_path)?;

        let mut progress = SweepProgress {
            total: scanned.candidates.len() as u64,
            ..Default::default()
        };
        let mut outcomes = Vec::with_capacity(scanned.candidates.len());
        let mut names = NameRegistry::new();

        for group in group_by_name(scanned.candidates) {
            let loaded = load_group(group);
            let shared = loaded.iter().filter(|(_, r)| r.is_ok()).count() > 1;

            for (candidate, result) in loaded {
                progress.processed += 1;

                let outcome = match result {
                    Ok(table) => {
                        let name = names.claim(table_name(
                            &candidate.file_name,
                            &candidate.sub_path,
                            shared,
                        ));
                        let rows = writer.write_table(&name, &table, self.config.write_index)?;
                        debug!(
                            path = %candidate.path.display(),
                            table = %name,
                            rows,
                            "Stored table"
                        );
                        progress.tables_written += 1;
                        progress.rows_written += rows as u64;
                        FileOutcome::Written {
                            path: candidate.path,
                            table: name,
                            rows,
                        }
                    }
                    Err(reason) => {
                        progress.skipped += 1;
                        FileOutcome::Skipped {
                            path: candidate.path,
                            reason,
                        }
                    }
                };

                outcomes.push(outcome);
                progress.elapsed = start_time.elapsed();
                on_progress(&progress);
            }
        }

        writer.close()?;

        let duration = start_time.elapsed();
        info!(
            tables = progress.tables_written,
            rows = progress.rows_written,
            skipped = progress.skipped,
            duration_ms = duration.as_millis() as u64,
            "Sweep completed"
        );

        Ok(SweepReport {
            db_path,
            outcomes,
            dirs: scanned.dirs,
            files: scanned.files,
            scan_errors: scanned.errors,
            duration,
        })
    }
}

/// Load every file of a name group, keeping the failure reason for skips
fn load_group(group: Vec<Candidate>) -> Vec<(Candidate, std::result::Result<Table, String>)> {
    group
        .into_iter()
        .map(|candidate| {
            let result = candidate.kind.load(&candidate.path).map_err(|e| {
                if e.is_empty_table() {
                    debug!(path = %candidate.path.display(), "Skipping empty table");
                } else {
                    warn!(path = %candidate.path.display(), error = %e, "Skipping unreadable file");
                }
                e.to_string()
            });
            (candidate, result)
        })
        .collect()
}

/// Consolidate every tabular file under `root` into `<root>/db.sqlite`
///
/// `filter` is a regular expression that must match the whole file name.
/// Returns the absolute database path when at least one table was written,
/// `None` otherwise (the file may still exist, empty).
pub fn consolidate(root: impl AsRef<Path>, filter: Option<&str>) -> Result<Option<PathBuf>> {
    let mut config = SweepConfig::new(root.as_ref());
    if let Some(pattern) = filter {
        config = config.with_filter(NameFilter::new(pattern)?);
    }

    let report = Consolidator::new(config).run()?;
    Ok(report.database().map(Path::to_path_buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn table_names(outcomes: &[FileOutcome]) -> Vec<&str> {
        outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Written { table, .. } => Some(table.as_str()),
                FileOutcome::Skipped { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_report_counts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.csv", "x,y\n1,2\n3,4\n");
        write(dir.path(), "b.json", "not json");

        let report = Consolidator::new(SweepConfig::new(dir.path())).run().unwrap();
        assert_eq!(report.tables_written(), 1);
        assert_eq!(report.skipped().count(), 1);
        assert_eq!(report.total_rows(), 2);
        assert!(report.database().is_some());
    }

    #[test]
    fn test_suffix_only_counts_survivors() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "one/data.csv", "x\n1\n");
        write(dir.path(), "two/data.csv", "");
        write(dir.path(), "three/data.csv", "x\n");

        let report = Consolidator::new(SweepConfig::new(dir.path())).run().unwrap();
        assert_eq!(table_names(&report.outcomes), vec!["data.csv"]);
    }

    #[test]
    fn test_case_insensitive_collision() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/Data.csv", "x\n1\n");
        write(dir.path(), "b/data.csv", "x\n2\n");

        let report = Consolidator::new(SweepConfig::new(dir.path())).run().unwrap();
        let mut names = table_names(&report.outcomes);
        names.sort();
        assert_eq!(names, vec!["Data.csv/a", "data.csv/b"]);
    }

    #[test]
    fn test_case_only_differences_never_replace_a_table() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Data.csv", "x\n1\n");
        write(dir.path(), "data.csv", "x\n2\n");

        let report = Consolidator::new(SweepConfig::new(dir.path())).run().unwrap();
        assert_eq!(table_names(&report.outcomes), vec!["Data.csv", "data.csv.1"]);

        let conn = rusqlite::Connection::open(&report.db_path).unwrap();
        assert_eq!(
            crate::db::list_tables(&conn).unwrap(),
            vec!["Data.csv", "data.csv.1"]
        );
    }

    #[test]
    fn test_progress_reported_per_candidate() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.csv", "x\n1\n");
        write(dir.path(), "b.csv", "x\n1\n");
        write(dir.path(), "c.txt", "ignored");

        let mut seen = Vec::new();
        Consolidator::new(SweepConfig::new(dir.path()))
            .run_with_progress(|p| seen.push((p.processed, p.total)))
            .unwrap();
        assert_eq!(seen, vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_consolidate_rejects_bad_filter() {
        let dir = tempfile::tempdir().unwrap();
        assert!(consolidate(dir.path(), Some("(")).is_err());
    }
}
