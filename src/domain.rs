use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{ValueEnum, builder::PossibleValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::ALL_NOTES_LABEL;

#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteId {
    Number(u64),
    Text(String),
}

impl NoteId {
    pub fn new(id: u64) -> Self {
        NoteId::Number(id)
    }

    pub fn as_number(&self) -> Option<u64> {
        match self {
            NoteId::Number(n) => Some(*n),
            NoteId::Text(_) => None,
        }
    }

    /// Numeric input becomes a numeric id so ids typed on the command line
    /// match the ones stored as JSON numbers.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        raw.parse::<u64>()
            .map(NoteId::Number)
            .unwrap_or_else(|_| NoteId::Text(raw.to_string()))
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteId::Number(n) => write!(f, "{}", n),
            NoteId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    Work,
    Personal,
    Ideas,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Work, Category::Personal, Category::Ideas];

    pub fn label(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Ideas => "Ideas",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl ValueEnum for Category {
    fn value_variants<'a>() -> &'a [Self] {
        &Self::ALL
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.label()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Filter value for the sidebar. `All` is the "All Notes" entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ActiveCategory {
    #[default]
    All,
    Only(Category),
}

impl ActiveCategory {
    pub fn options() -> Vec<ActiveCategory> {
        std::iter::once(ActiveCategory::All)
            .chain(Category::ALL.iter().copied().map(ActiveCategory::Only))
            .collect()
    }

    pub fn label(self) -> &'static str {
        match self {
            ActiveCategory::All => ALL_NOTES_LABEL,
            ActiveCategory::Only(category) => category.label(),
        }
    }

    pub fn matches(self, category: Category) -> bool {
        match self {
            ActiveCategory::All => true,
            ActiveCategory::Only(active) => active == category,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub description: String,
    pub category: Category,
    #[serde(
        rename = "createdAt",
        default,
        deserialize_with = "lenient_created_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Accepts RFC 3339, a bare date or date-time, or epoch milliseconds.
/// Anything else reads as `None` so one odd timestamp cannot sink the
/// whole collection.
fn lenient_created_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawTimestamp::Millis(ms)) => DateTime::from_timestamp_millis(ms),
        Some(RawTimestamp::Text(text)) => parse_timestamp(&text),
        Some(RawTimestamp::Other(_)) | None => None,
    })
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title and description cannot be empty.")]
    EmptyField,
    #[error("A note with this title already exists in this category.")]
    DuplicateTitle,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Note '{0}' not found")]
    NotFound(NoteId),
}

pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Fields that passed validation, already trimmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidFields {
    pub title: String,
    pub description: String,
    pub category: Category,
}

/// Checks the write-time rules for a note. `editing` is skipped in the
/// duplicate scan; on create it is `None` and nothing is skipped.
pub fn validate_note(
    notes: &[Note],
    editing: Option<&NoteId>,
    title: &str,
    description: &str,
    category: Category,
) -> Result<ValidFields, ValidationError> {
    let title = title.trim();
    let description = description.trim();

    if title.is_empty() || description.is_empty() {
        return Err(ValidationError::EmptyField);
    }

    let normalized = title.to_lowercase();
    let duplicate = notes.iter().any(|note| {
        Some(&note.id) != editing
            && note.category == category
            && normalize_title(&note.title) == normalized
    });

    if duplicate {
        return Err(ValidationError::DuplicateTitle);
    }

    Ok(ValidFields {
        title: title.to_string(),
        description: description.to_string(),
        category,
    })
}

/// Visible subset of `notes` in store order.
pub fn filter_notes<'a>(notes: &'a [Note], active: ActiveCategory, search: &str) -> Vec<&'a Note> {
    let needle = search.to_lowercase();
    notes
        .iter()
        .filter(|note| active.matches(note.category))
        .filter(|note| {
            needle.is_empty()
                || note.title.to_lowercase().contains(&needle)
                || note.description.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn count_in(notes: &[Note], active: ActiveCategory) -> usize {
    notes.iter().filter(|note| active.matches(note.category)).count()
}
