//! Per-author fact timelines handed to the text generator with the style
//! instructions.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const NO_FACTS: &str = "No facts available for this user.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactEvent {
    pub date: String,
    pub description: String,
}

/// Author id → events, as stored in the facts JSON file.
pub type FactBook = BTreeMap<String, Vec<FactEvent>>;

pub fn load_facts(path: &Path) -> Result<FactBook> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DD[T ]HH:MM:SS` and bare dates.
pub fn parse_event_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// The author's events, oldest first, as a numbered list.
///
/// Events with an unreadable date go last, in file order.
pub fn facts_for(book: &FactBook, author: &str) -> String {
    let Some(events) = book.get(author) else {
        return NO_FACTS.to_string();
    };
    let mut dated: Vec<(Option<NaiveDateTime>, &FactEvent)> = events
        .iter()
        .map(|e| {
            let date = parse_event_date(&e.date);
            if date.is_none() {
                warn!("unreadable date {:?} in facts for {author}", e.date);
            }
            (date, e)
        })
        .collect();
    dated.sort_by_key(|(date, _)| (date.is_none(), *date));

    dated
        .iter()
        .enumerate()
        .map(|(i, (_, e))| format!("* {}. {}", i + 1, e.description))
        .collect::<Vec<_>>()
        .join("\n")
}
