use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;

use crate::markdown;
use crate::media::{self, AttachmentRename, MediaError};
use crate::models::{EntryError, JournalEntry};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{0}")]
    EntryError(#[from] EntryError),
    #[error("{0}")]
    MediaError(#[from] MediaError),
    #[error("Failed to serialize entry backup: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("Failed to write {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One converted entry: the note, the backup record and what was renamed
#[derive(Debug, Clone)]
pub struct ConvertedEntry {
    pub stem: String,
    pub markdown: String,
    pub source: Value,
    pub renames: Vec<AttachmentRename>,
}

impl ConvertedEntry {
    pub fn markdown_file_name(&self) -> String {
        format!("{}.md", self.stem)
    }

    pub fn json_file_name(&self) -> String {
        format!("{}.json", self.stem)
    }

    /// Source record as JSON indented by four spaces, keys in export order
    pub fn source_json(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.source.serialize(&mut ser)?;
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Converts Day One entries of one journal into Obsidian notes.
///
/// Every output pair gets a distinct stem within the lifetime of the
/// converter: a second entry at the same local second gets " (2)", " (3)"
/// and so on appended. Across runs the names are deterministic, so running
/// again over the same export overwrites the previous output.
pub struct EntryConverter {
    import_dir: PathBuf,
    export_dir: PathBuf,
    base_tags: Vec<String>,
    claimed_stems: HashSet<String>,
}

impl EntryConverter {
    pub fn new(
        import_dir: impl Into<PathBuf>,
        export_dir: impl Into<PathBuf>,
        base_tags: Vec<String>,
    ) -> Self {
        Self {
            import_dir: import_dir.into(),
            export_dir: export_dir.into(),
            base_tags,
            claimed_stems: HashSet::new(),
        }
    }

    pub fn import_dir(&self) -> &Path {
        &self.import_dir
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn base_tags(&self) -> &[String] {
        &self.base_tags
    }

    /// Convert one raw export record and write `<stem>.md` and `<stem>.json`
    pub fn convert(&mut self, raw: &Value) -> Result<ConvertedEntry, ConvertError> {
        let entry = JournalEntry::from_value(raw)?;
        let timestamp = entry.timestamp()?;
        let stem = self.claim_stem(markdown::file_stem(&timestamp.local));
        debug!("Converting entry created {} as '{}'", entry.creation_date, stem);

        let body = entry.text.as_deref().map(markdown::normalize_body);
        let relinked = media::relink(&self.import_dir, &entry, body)?;
        let tags = markdown::collect_tags(&self.base_tags, &entry);
        let note = markdown::render_note(
            &entry,
            &timestamp.created,
            &timestamp.local,
            relinked.text.as_deref(),
            &tags,
        );

        let converted = ConvertedEntry {
            stem,
            markdown: note,
            source: raw.clone(),
            renames: relinked.renames,
        };
        self.write_outputs(&converted)?;
        Ok(converted)
    }

    fn claim_stem(&mut self, stem: String) -> String {
        if self.claimed_stems.insert(stem.clone()) {
            return stem;
        }

        let mut suffix = 2;
        loop {
            let candidate = format!("{stem} ({suffix})");
            if self.claimed_stems.insert(candidate.clone()) {
                warn!("Another entry already uses '{}', writing '{}' instead", stem, candidate);
                return candidate;
            }
            suffix += 1;
        }
    }

    fn write_outputs(&self, converted: &ConvertedEntry) -> Result<(), ConvertError> {
        let md_path = self.export_dir.join(converted.markdown_file_name());
        info!("Writing obsidian md file {}", md_path.display());
        write_file(&md_path, &converted.markdown)?;

        let json_path = self.export_dir.join(converted.json_file_name());
        info!("Writing day one json file to {}", json_path.display());
        write_file(&json_path, &converted.source_json()?)?;

        Ok(())
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), ConvertError> {
    fs::write(path, contents).map_err(|source| ConvertError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}
