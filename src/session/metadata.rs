//! Typed metadata parsed from a session's general file.
//!
//! The general file uses the same `key: value` line grammar as the data
//! files, but every line must match it and values are scalar. The `TIME`
//! field is mandatory and doubles as the session's unique identifier.

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::parsers::{classify, ClassifiedEntry};

/// Timestamp format of the mandatory `TIME` field
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single typed metadata value.
///
/// The typing pass runs in order: literal `"0"`/`"1"` become booleans, then
/// numeric-looking text becomes an integer or float, everything else stays
/// text.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl MetaValue {
    /// Type one raw value string
    pub fn from_raw(raw: &str) -> MetaValue {
        match raw {
            "0" => MetaValue::Bool(false),
            "1" => MetaValue::Bool(true),
            _ => {
                if raw.contains('.') {
                    match raw.parse::<f64>() {
                        Ok(number) if number.is_finite() => MetaValue::Float(number),
                        _ => MetaValue::Text(raw.to_string()),
                    }
                } else {
                    match raw.parse::<i64>() {
                        Ok(number) => MetaValue::Int(number),
                        Err(_) => MetaValue::Text(raw.to_string()),
                    }
                }
            }
        }
    }

    /// Rendered form for listings and labels
    pub fn display(&self) -> String {
        match self {
            MetaValue::Bool(flag) => flag.to_string(),
            MetaValue::Int(number) => number.to_string(),
            MetaValue::Float(number) => number.to_string(),
            MetaValue::Text(text) => text.clone(),
        }
    }
}

/// Why a general file failed to parse
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("general file is missing the mandatory TIME field")]
    MissingTime,

    #[error("TIME value {value:?} does not match the format YYYY-MM-DD HH:MM:SS")]
    BadTimestamp { value: String },

    #[error("general file line {line:?} has no separator")]
    FreeFormLine { line: String },
}

/// The typed record from a session's general file.
///
/// Fields keep their file order; a duplicate key overwrites in place (last
/// occurrence wins, though duplicates are not expected).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneralMetadata {
    /// Parsed `TIME` value, the canonical session identity
    pub time: NaiveDateTime,
    fields: Vec<(String, MetaValue)>,
}

impl GeneralMetadata {
    /// Parse a whole general file.
    ///
    /// Every line must classify to a key/value pair; blank lines are
    /// tolerated, free-form lines are not.
    pub fn parse(text: &str) -> Result<GeneralMetadata, MetadataError> {
        let mut fields: Vec<(String, MetaValue)> = vec![];
        let mut raw_time: Option<String> = None;

        for line in text.lines() {
            match classify(line) {
                ClassifiedEntry::Pair { key, value } => {
                    if key == "TIME" {
                        raw_time = Some(value.clone());
                    }
                    let typed = MetaValue::from_raw(&value);
                    match fields.iter_mut().find(|(k, _)| *k == key) {
                        Some((_, slot)) => *slot = typed,
                        None => fields.push((key, typed)),
                    }
                }
                ClassifiedEntry::Blank => {}
                ClassifiedEntry::Unclassified(line) => {
                    return Err(MetadataError::FreeFormLine { line });
                }
            }
        }

        let raw_time = raw_time.ok_or(MetadataError::MissingTime)?;
        let time = NaiveDateTime::parse_from_str(&raw_time, TIME_FORMAT)
            .map_err(|_| MetadataError::BadTimestamp { value: raw_time })?;

        Ok(GeneralMetadata { time, fields })
    }

    /// Fields in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// A field rendered as display text, empty if absent
    pub fn display(&self, key: &str) -> String {
        if key == "TIME" {
            return self.time.format(TIME_FORMAT).to_string();
        }
        self.get(key).map(MetaValue::display).unwrap_or_default()
    }

    /// Filesystem-safe archival name: the timestamp with `:` replaced by `;`
    pub fn folder_name(&self) -> String {
        self.time.format(TIME_FORMAT).to_string().replace(':', ";")
    }

    /// Multi-line human label: VERSION, timestamp, and COMMENT when present
    pub fn identifier(&self) -> String {
        let mut label = String::new();
        if let Some(version) = self.get("VERSION") {
            label.push_str(&version.display());
            label.push('\n');
        }
        label.push_str(&self.time.format(TIME_FORMAT).to_string());
        if let Some(comment) = self.get("COMMENT") {
            let comment = comment.display();
            if !comment.is_empty() {
                label.push('\n');
                label.push_str(&comment);
            }
        }
        label
    }
}
