//! Markdown pieces of an Obsidian note built from a Day One entry.
//!
//! Everything here is pure string building; file renames and writes live in
//! `media` and `converter`.

use chrono::{DateTime, FixedOffset, Timelike};
use chrono_tz::Tz;

use crate::models::JournalEntry;

/// Output filename stem: "20210618171541 - Fri Jun 18 2021"
pub const FILE_STEM_FORMAT: &str = "%Y%m%d%H%M%S - %a %b %d %Y";

/// Page header: "Friday, 18 June 2021 at 5:15 PM"
pub const HEADER_FORMAT: &str = "%A, %-d %B %Y at %-I:%M %p";

/// Day One stores entries without a time of day at midday
const UNSET_TIME_SUFFIX: &str = " at 12:00 PM";

pub const STARRED_TAG: &str = "#starred";

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

pub fn file_stem(local: &DateTime<Tz>) -> String {
    local.format(FILE_STEM_FORMAT).to_string()
}

/// Render the recorded creation instant, e.g. "2021-06-18 21:15:41+00:00"
pub fn format_created(created: &DateTime<FixedOffset>) -> String {
    if created.nanosecond() == 0 {
        created.format("%Y-%m-%d %H:%M:%S%:z").to_string()
    } else {
        created.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string()
    }
}

/// Render a coordinate the way it appears in the export ("40.0", not "40")
pub fn format_coordinate(value: f64) -> String {
    format!("{value:?}")
}

pub fn front_matter(entry: &JournalEntry, created: &DateTime<FixedOffset>) -> String {
    let mut block = String::from("---\n");
    block.push_str(&format!("- created: {}\n", format_created(created)));
    if let Some((latitude, longitude)) = entry.coordinates() {
        block.push_str(&format!(
            "- location: [{},{}]\n",
            format_coordinate(latitude),
            format_coordinate(longitude)
        ));
    }
    block.push_str("---\n");
    block
}

pub fn header(local: &DateTime<Tz>) -> String {
    let title = local.format(HEADER_FORMAT).to_string();
    let title = title.strip_suffix(UNSET_TIME_SUFFIX).unwrap_or(&title);
    format!("## {title}\n")
}

/// Drop markdown escapes and turn Unicode line/paragraph separators into newlines
pub fn normalize_body(text: &str) -> String {
    text.replace('\\', "")
        .replace('\u{2028}', "\n")
        .replace('\u{2029}', "\n\n")
}

/// Turn a Day One tag into an Obsidian hashtag.
///
/// Spaces become hyphens first, then each "---" (typically from " - ") is
/// collapsed to a single hyphen, scanning left to right without overlap.
pub fn format_tag(tag: &str) -> String {
    format!("#{}", tag.replace(' ', "-").replace("---", "-"))
}

/// Base tags, then the entry's own tags, then the starred marker.
///
/// Always builds a new list; `base` is left as it was.
pub fn collect_tags(base: &[String], entry: &JournalEntry) -> Vec<String> {
    let mut tags = base.to_vec();
    tags.extend(entry.tags.iter().map(|tag| format_tag(tag)));
    if entry.starred {
        tags.push(STARRED_TAG.to_string());
    }
    tags
}

pub fn back_matter(entry: &JournalEntry, tags: &[String]) -> String {
    let mut block = String::from("\n\n---\n");

    if let Some(location) = &entry.location {
        let name = location.display_name();
        let coordinates = location.coordinates().map(|(latitude, longitude)| {
            (format_coordinate(latitude), format_coordinate(longitude))
        });

        if !name.is_empty() {
            match &coordinates {
                Some((latitude, longitude)) => {
                    block.push_str(&format!("[{name}](geo:{latitude},{longitude})\n"))
                }
                None => block.push_str(&format!("{name}\n")),
            }
        }

        if let Some((latitude, longitude)) = &coordinates {
            block.push_str(&format!(
                "- GPS: [{latitude}, {longitude}]({MAPS_SEARCH_URL}{latitude},{longitude})\n"
            ));
        }
    }

    if !tags.is_empty() {
        block.push_str(&format!("- Tags: {}\n", tags.join(" ")));
    }

    block
}

/// Assemble the complete note: front matter, header, body, back matter
pub fn render_note(
    entry: &JournalEntry,
    created: &DateTime<FixedOffset>,
    local: &DateTime<Tz>,
    body: Option<&str>,
    tags: &[String],
) -> String {
    let mut note = front_matter(entry, created);
    note.push_str(&header(local));
    if let Some(body) = body {
        note.push_str(body);
    }
    note.push_str(&back_matter(entry, tags));
    note
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: serde_json::Value) -> JournalEntry {
        JournalEntry::from_value(&value).unwrap()
    }

    fn new_york(creation_date: &str) -> JournalEntry {
        entry(json!({
            "creationDate": creation_date,
            "timeZone": "America/New_York"
        }))
    }

    #[test]
    fn test_file_stem_uses_local_time() {
        let stamp = new_york("2021-06-18T21:15:41Z").timestamp().unwrap();
        assert_eq!(file_stem(&stamp.local), "20210618171541 - Fri Jun 18 2021");
    }

    #[test]
    fn test_file_stem_crosses_midnight() {
        let stamp = new_york("2021-06-19T02:00:00Z").timestamp().unwrap();
        assert_eq!(file_stem(&stamp.local), "20210618220000 - Fri Jun 18 2021");
    }

    #[test]
    fn test_header_with_time() {
        let stamp = new_york("2021-06-18T21:15:41Z").timestamp().unwrap();
        assert_eq!(header(&stamp.local), "## Friday, 18 June 2021 at 5:15 PM\n");

        let stamp = new_york("2021-01-05T14:05:00Z").timestamp().unwrap();
        assert_eq!(header(&stamp.local), "## Tuesday, 5 January 2021 at 9:05 AM\n");
    }

    #[test]
    fn test_header_drops_midday() {
        // 16:00 UTC is 12:00 EDT
        let stamp = new_york("2021-06-18T16:00:00Z").timestamp().unwrap();
        assert_eq!(header(&stamp.local), "## Friday, 18 June 2021\n");
    }

    #[test]
    fn test_header_keeps_midnight_and_near_midday() {
        let stamp = new_york("2021-06-18T04:00:00Z").timestamp().unwrap();
        assert_eq!(header(&stamp.local), "## Friday, 18 June 2021 at 12:00 AM\n");

        let stamp = new_york("2021-06-18T16:01:00Z").timestamp().unwrap();
        assert_eq!(header(&stamp.local), "## Friday, 18 June 2021 at 12:01 PM\n");
    }

    #[test]
    fn test_front_matter_without_location() {
        let entry = new_york("2021-06-18T21:15:41Z");
        let stamp = entry.timestamp().unwrap();
        assert_eq!(
            front_matter(&entry, &stamp.created),
            "---\n- created: 2021-06-18 21:15:41+00:00\n---\n"
        );
    }

    #[test]
    fn test_front_matter_with_location() {
        let entry = entry(json!({
            "creationDate": "2021-06-18T21:15:41Z",
            "timeZone": "America/New_York",
            "location": { "placeName": "Home", "latitude": 40.0, "longitude": -73.9654 }
        }));
        let stamp = entry.timestamp().unwrap();
        assert_eq!(
            front_matter(&entry, &stamp.created),
            "---\n- created: 2021-06-18 21:15:41+00:00\n- location: [40.0,-73.9654]\n---\n"
        );
    }

    #[test]
    fn test_format_created_keeps_fraction_and_offset() {
        let created = DateTime::parse_from_rfc3339("2021-06-18T21:15:41.5+02:00").unwrap();
        assert_eq!(format_created(&created), "2021-06-18 21:15:41.500000+02:00");
    }

    #[test]
    fn test_normalize_body() {
        assert_eq!(normalize_body("Done\\. Really\\!"), "Done. Really!");
        assert_eq!(normalize_body("Hello\\nWorld"), "HellonWorld");
        assert_eq!(normalize_body("one\u{2028}two\u{2029}three"), "one\ntwo\n\nthree");
    }

    #[test]
    fn test_format_tag() {
        assert_eq!(format_tag("travel"), "#travel");
        assert_eq!(format_tag("road trip"), "#road-trip");
        assert_eq!(format_tag("work - meetings"), "#work-meetings");
        assert_eq!(format_tag("a  b---c"), "#a--b-c");
    }

    #[test]
    fn test_collect_tags_leaves_base_untouched() {
        let base = vec!["#dailyjournal".to_string(), "#dayoneimport".to_string()];
        let entry = entry(json!({
            "creationDate": "2021-06-18T21:15:41Z",
            "timeZone": "UTC",
            "tags": ["road trip"],
            "starred": true
        }));

        let tags = collect_tags(&base, &entry);
        assert_eq!(
            tags,
            vec!["#dailyjournal", "#dayoneimport", "#road-trip", "#starred"]
        );
        assert_eq!(base.len(), 2);

        // A second entry starts from the same base again
        let plain = new_york("2021-06-18T21:15:41Z");
        assert_eq!(collect_tags(&base, &plain), base);
    }

    #[test]
    fn test_back_matter_without_location() {
        let entry = new_york("2021-06-18T21:15:41Z");
        let block = back_matter(&entry, &["#dayoneimport".to_string()]);
        assert_eq!(block, "\n\n---\n- Tags: #dayoneimport\n");
        assert!(!block.contains("GPS"));
        assert!(!block.contains("geo:"));
    }

    #[test]
    fn test_back_matter_with_location_and_coordinates() {
        let entry = entry(json!({
            "creationDate": "2021-06-18T21:15:41Z",
            "timeZone": "UTC",
            "location": {
                "placeName": "Central Park",
                "localityName": "New York",
                "country": "United States",
                "latitude": 40.7812,
                "longitude": -73.9665
            }
        }));
        let block = back_matter(&entry, &[]);
        assert_eq!(
            block,
            "\n\n---\n\
             [Central Park, New York, United States](geo:40.7812,-73.9665)\n\
             - GPS: [40.7812, -73.9665](https://www.google.com/maps/search/?api=1&query=40.7812,-73.9665)\n"
        );
    }

    #[test]
    fn test_back_matter_location_without_coordinates() {
        let entry = entry(json!({
            "creationDate": "2021-06-18T21:15:41Z",
            "timeZone": "UTC",
            "location": { "localityName": "Lisbon", "country": "Portugal" }
        }));
        assert_eq!(back_matter(&entry, &[]), "\n\n---\nLisbon, Portugal\n");
    }

    #[test]
    fn test_render_note_without_body() {
        let entry = new_york("2021-06-18T21:15:41Z");
        let stamp = entry.timestamp().unwrap();
        let note = render_note(&entry, &stamp.created, &stamp.local, None, &[]);
        assert_eq!(
            note,
            "---\n- created: 2021-06-18 21:15:41+00:00\n---\n\
             ## Friday, 18 June 2021 at 5:15 PM\n\
             \n\n---\n"
        );
    }
}
