pub mod cli;
pub mod config;
pub mod converter;
pub mod markdown;
pub mod media;
pub mod models;
pub mod utils;
pub mod walker;

pub use config::Config;
pub use converter::{ConvertedEntry, EntryConverter};
pub use models::{Attachment, JournalEntry, JournalExport, Location};
pub use walker::{JournalJob, WalkSummary, convert_journal};
