//! Attachment relinking.
//!
//! Day One exports media named by content hash and references it from the
//! entry text through `dayone-moment:` URIs. Obsidian wants the file named
//! by something stable and an `![[file]]` embed in the text.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

use crate::models::{Attachment, JournalEntry};

/// Day One only records audio as m4a, whatever the descriptor says
pub const AUDIO_EXTENSION: &str = "m4a";

static PHOTO_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!\[\]\(dayone-moment://([^)\s]+)\)").expect("photo reference pattern is valid")
});

static VIDEO_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!\[\]\(dayone-moment:/video/([^)\s]+)\)")
        .expect("video reference pattern is valid")
});

static AUDIO_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!\[\]\(dayone-moment:/audio/([^)\s]+)\)")
        .expect("audio reference pattern is valid")
});

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{kind} attachment {identifier} has no file type")]
    MissingType { kind: MediaKind, identifier: String },
    #[error("Failed to rename {} to {}: {source}", from.display(), to.display())]
    RenameError {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Photo,
    Video,
    Audio,
}

impl MediaKind {
    pub const ALL: [MediaKind; 3] = [MediaKind::Photo, MediaKind::Video, MediaKind::Audio];

    /// Sub-folder of the import directory holding this kind of media
    pub fn folder(self) -> &'static str {
        match self {
            MediaKind::Photo => "photos",
            MediaKind::Video => "videos",
            MediaKind::Audio => "audios",
        }
    }

    pub fn attachments(self, entry: &JournalEntry) -> &[Attachment] {
        match self {
            MediaKind::Photo => &entry.photos,
            MediaKind::Video => &entry.videos,
            MediaKind::Audio => &entry.audios,
        }
    }

    fn reference_pattern(self) -> &'static Regex {
        match self {
            MediaKind::Photo => Lazy::force(&PHOTO_REFERENCE),
            MediaKind::Video => Lazy::force(&VIDEO_REFERENCE),
            MediaKind::Audio => Lazy::force(&AUDIO_REFERENCE),
        }
    }

    /// File extension used both on disk and in the embed
    pub fn extension(self, attachment: &Attachment) -> Result<&str, MediaError> {
        match self {
            MediaKind::Audio => Ok(AUDIO_EXTENSION),
            _ => attachment
                .file_type
                .as_deref()
                .ok_or_else(|| MediaError::MissingType {
                    kind: self,
                    identifier: attachment.identifier.clone(),
                }),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRename {
    pub kind: MediaKind,
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Text and renames produced by relinking one entry
#[derive(Debug, Clone, Default)]
pub struct Relinked {
    pub text: Option<String>,
    pub renames: Vec<AttachmentRename>,
}

/// Rename `<md5>.<ext>` to `<identifier>.<ext>` if the hash-named file is still there.
///
/// Returns `None` when there was nothing to rename, which is the normal case
/// once an export has been converted before.
pub fn rename_attachment(
    import_dir: &Path,
    kind: MediaKind,
    attachment: &Attachment,
) -> Result<Option<AttachmentRename>, MediaError> {
    let extension = kind.extension(attachment)?;
    let folder = import_dir.join(kind.folder());
    let from = folder.join(format!("{}.{}", attachment.md5, extension));

    if !from.is_file() {
        debug!("No {} file at {}, skipping rename", kind, from.display());
        return Ok(None);
    }

    let to = folder.join(format!("{}.{}", attachment.identifier, extension));
    info!("Renaming {} file from {} to {}", kind, from.display(), to.display());
    fs::rename(&from, &to).map_err(|source| MediaError::RenameError {
        from: from.clone(),
        to: to.clone(),
        source,
    })?;

    Ok(Some(AttachmentRename { kind, from, to }))
}

/// Replace `dayone-moment:` references to known attachments with Obsidian embeds.
///
/// References to identifiers not in `attachments` are left as they are.
pub fn rewrite_references(
    text: &str,
    kind: MediaKind,
    attachments: &[Attachment],
) -> Result<String, MediaError> {
    let mut extensions = HashMap::new();
    for attachment in attachments {
        extensions.insert(attachment.identifier.as_str(), kind.extension(attachment)?);
    }

    let rewritten = kind
        .reference_pattern()
        .replace_all(text, |caps: &Captures| {
            let identifier = &caps[1];
            match extensions.get(identifier) {
                Some(extension) => format!("![[{identifier}.{extension}]]"),
                None => caps[0].to_string(),
            }
        });

    Ok(rewritten.into_owned())
}

/// Relink every photo, video and audio of an entry.
///
/// Files are renamed even when the entry has no text; the text rewrite does
/// not depend on whether a rename happened.
pub fn relink(
    import_dir: &Path,
    entry: &JournalEntry,
    text: Option<String>,
) -> Result<Relinked, MediaError> {
    let mut relinked = Relinked {
        text,
        renames: Vec::new(),
    };

    for kind in MediaKind::ALL {
        let attachments = kind.attachments(entry);
        if attachments.is_empty() {
            continue;
        }

        for attachment in attachments {
            if let Some(rename) = rename_attachment(import_dir, kind, attachment)? {
                relinked.renames.push(rename);
            }
        }

        if let Some(text) = relinked.text.as_deref() {
            relinked.text = Some(rewrite_references(text, kind, attachments)?);
        }
    }

    Ok(relinked)
}
