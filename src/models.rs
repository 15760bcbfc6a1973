use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Malformed journal entry: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Invalid creation date '{value}': {source}")]
    InvalidCreationDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),
}

/// Top-level Day One export document.
///
/// Entries stay as raw JSON so the backup copy written next to each
/// markdown file is the record exactly as exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalExport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub entries: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub creation_date: String, // ISO 8601, usually UTC ("2021-06-18T21:15:41Z")
    pub time_zone: String,     // IANA name, e.g. America/New_York
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub photos: Vec<Attachment>,
    #[serde(default)]
    pub videos: Vec<Attachment>,
    #[serde(default)]
    pub audios: Vec<Attachment>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub starred: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub place_name: Option<String>,
    pub locality_name: Option<String>,
    pub administrative_area: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub identifier: String,
    pub md5: String,
    #[serde(rename = "type", default)]
    pub file_type: Option<String>,
}

/// Creation instant of an entry, both as recorded and in the entry's own zone.
#[derive(Debug, Clone)]
pub struct EntryTimestamp {
    pub created: DateTime<FixedOffset>,
    pub local: DateTime<Tz>,
}

impl JournalEntry {
    /// Build the typed view of a raw export record
    pub fn from_value(value: &Value) -> Result<Self, EntryError> {
        Ok(Self::deserialize(value)?)
    }

    /// Parse the creation date and localize it into the recorded time zone
    pub fn timestamp(&self) -> Result<EntryTimestamp, EntryError> {
        let created = DateTime::parse_from_rfc3339(&self.creation_date).map_err(|source| {
            EntryError::InvalidCreationDate {
                value: self.creation_date.clone(),
                source,
            }
        })?;
        let zone: Tz = self
            .time_zone
            .parse()
            .map_err(|_| EntryError::UnknownTimeZone(self.time_zone.clone()))?;

        Ok(EntryTimestamp {
            created,
            local: created.with_timezone(&zone),
        })
    }

    /// Latitude/longitude pair, only when the location carries both
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.location.as_ref().and_then(Location::coordinates)
    }
}

impl Location {
    /// Place, locality, area and country joined with ", ", skipping missing parts
    pub fn display_name(&self) -> String {
        [
            &self.place_name,
            &self.locality_name,
            &self.administrative_area,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}
