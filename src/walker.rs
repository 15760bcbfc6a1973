use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::converter::{ConvertError, EntryConverter};
use crate::models::JournalExport;

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("Failed to create export directory {}: {source}", path.display())]
    ExportDirError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read journal file {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse journal file {}: {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Entry {index} of {}: {source}", journal.display())]
    EntryError {
        journal: PathBuf,
        index: usize,
        #[source]
        source: ConvertError,
    },
}

/// Everything needed to convert one exported journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalJob {
    pub name: String,
    /// Folder holding photos/, videos/ and audios/
    pub import_dir: PathBuf,
    pub journal_file: PathBuf,
    pub export_dir: PathBuf,
    pub base_tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkSummary {
    pub name: String,
    pub entries: usize,
    pub renamed: usize,
    pub export_dir: PathBuf,
}

/// Read and parse a Day One JSON export
pub fn load_export(path: &Path) -> Result<JournalExport, WalkError> {
    let contents = fs::read_to_string(path).map_err(|source| WalkError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| WalkError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert every entry of a journal, in export order.
///
/// Stops at the first entry that fails; earlier entries stay written.
pub fn convert_journal(job: &JournalJob) -> Result<WalkSummary, WalkError> {
    fs::create_dir_all(&job.export_dir).map_err(|source| WalkError::ExportDirError {
        path: job.export_dir.clone(),
        source,
    })?;

    let export = load_export(&job.journal_file)?;
    info!(
        "Journal '{}': {} entries in {}",
        job.name,
        export.entries.len(),
        job.journal_file.display()
    );

    let mut converter = EntryConverter::new(&job.import_dir, &job.export_dir, job.base_tags.clone());
    let mut renamed = 0;
    for (index, raw) in export.entries.iter().enumerate() {
        let converted = converter.convert(raw).map_err(|source| WalkError::EntryError {
            journal: job.journal_file.clone(),
            index,
            source,
        })?;
        renamed += converted.renames.len();
    }

    Ok(WalkSummary {
        name: job.name.clone(),
        entries: export.entries.len(),
        renamed,
        export_dir: job.export_dir.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn job_in(root: &Path) -> JournalJob {
        JournalJob {
            name: "Daily Reflection".to_string(),
            import_dir: root.to_path_buf(),
            journal_file: root.join("Daily Reflection.json"),
            export_dir: root.join("out").join("Daily Reflection"),
            base_tags: vec!["#dayoneimport".to_string()],
        }
    }

    #[test]
    fn test_convert_journal_creates_export_dir() {
        let dir = tempdir().unwrap();
        let job = job_in(dir.path());
        let export = json!({
            "metadata": { "version": "1.0" },
            "entries": [
                { "creationDate": "2021-06-18T21:15:41Z", "timeZone": "UTC", "text": "one" },
                { "creationDate": "2021-06-19T21:15:41Z", "timeZone": "UTC", "text": "two" }
            ]
        });
        fs::write(&job.journal_file, export.to_string()).unwrap();

        let summary = convert_journal(&job).unwrap();

        assert_eq!(summary.entries, 2);
        assert_eq!(summary.renamed, 0);
        assert_eq!(fs::read_dir(&job.export_dir).unwrap().count(), 4);
        assert!(job.export_dir.join("20210619211541 - Sat Jun 19 2021.md").is_file());
    }

    #[test]
    fn test_empty_journal() {
        let dir = tempdir().unwrap();
        let job = job_in(dir.path());
        fs::write(&job.journal_file, r#"{"entries": []}"#).unwrap();

        let summary = convert_journal(&job).unwrap();
        assert_eq!(summary.entries, 0);
        assert!(job.export_dir.is_dir());
    }

    #[test]
    fn test_missing_journal_file() {
        let dir = tempdir().unwrap();
        let job = job_in(dir.path());
        assert!(matches!(
            convert_journal(&job),
            Err(WalkError::ReadError { .. })
        ));
    }

    #[test]
    fn test_bad_json() {
        let dir = tempdir().unwrap();
        let job = job_in(dir.path());
        fs::write(&job.journal_file, "{ entries: ").unwrap();
        assert!(matches!(
            convert_journal(&job),
            Err(WalkError::ParseError { .. })
        ));
    }

    #[test]
    fn test_failing_entry_reports_index() {
        let dir = tempdir().unwrap();
        let job = job_in(dir.path());
        let export = json!({
            "entries": [
                { "creationDate": "2021-06-18T21:15:41Z", "timeZone": "UTC" },
                { "creationDate": "not a date", "timeZone": "UTC" }
            ]
        });
        fs::write(&job.journal_file, export.to_string()).unwrap();

        match convert_journal(&job) {
            Err(WalkError::EntryError { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected entry error, got {other:?}"),
        }
        // The first entry was already written
        assert_eq!(fs::read_dir(&job.export_dir).unwrap().count(), 2);
    }
}
