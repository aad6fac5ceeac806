//! Note model and request payloads

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;
use crate::{Error, Result};

/// Longest title the backend accepts.
pub const MAX_TITLE_CHARS: usize = 255;

/// Server-assigned note identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(i64);

impl NoteId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for NoteId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A note as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub owner_id: UserId,
    pub title: String,
    pub content: String,
    /// User tags, in the order they were entered
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub ai_summary: Option<String>,
    #[serde(default)]
    pub ai_tags: Option<Vec<String>>,
    pub is_pinned: bool,
    pub is_archived: bool,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// User tags, empty when absent.
    #[must_use]
    pub fn user_tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// AI-derived tags, empty when absent.
    #[must_use]
    pub fn ai_tag_list(&self) -> &[String] {
        self.ai_tags.as_deref().unwrap_or_default()
    }

    /// Get the first line of content, truncated to `max_len` characters
    #[must_use]
    pub fn content_preview(&self, max_len: usize) -> String {
        self.content
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(max_len)
            .collect()
    }
}

/// Payload for `POST /notes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_archived: bool,
    /// Ask the backend to summarize and tag the note
    #[serde(default = "default_use_ai")]
    pub use_ai: bool,
}

impl NewNote {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: None,
            is_pinned: false,
            is_archived: false,
            use_ai: true,
        }
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = if tags.is_empty() { None } else { Some(tags) };
        self
    }

    #[must_use]
    pub const fn pinned(mut self, is_pinned: bool) -> Self {
        self.is_pinned = is_pinned;
        self
    }

    #[must_use]
    pub const fn use_ai(mut self, use_ai: bool) -> Self {
        self.use_ai = use_ai;
        self
    }

    /// Reject payloads the backend would refuse.
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_content(&self.content)
    }
}

/// Partial update for `PUT /notes/{id}`; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    /// Recompute the AI summary and tags without changing anything else
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub regenerate_ai: bool,
}

impl NotePatch {
    #[must_use]
    pub fn pin(is_pinned: bool) -> Self {
        Self {
            is_pinned: Some(is_pinned),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn archive(is_archived: bool) -> Self {
        Self {
            is_archived: Some(is_archived),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn regenerate() -> Self {
        Self {
            regenerate_ai: true,
            ..Self::default()
        }
    }

    /// Whether applying this patch archives the note.
    #[must_use]
    pub const fn archives(&self) -> bool {
        matches!(self.is_archived, Some(true))
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.is_pinned.is_none()
            && self.is_archived.is_none()
            && !self.regenerate_ai
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(content) = &self.content {
            validate_content(content)?;
        }
        Ok(())
    }
}

/// Server-side listing filter for `GET /notes`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    /// Submitted search text; matched by the backend against title/content
    pub search: Option<String>,
    pub include_archived: bool,
}

impl ListFilter {
    /// Query parameters; defaults are omitted.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|value| !value.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if self.include_archived {
            pairs.push(("include_archived", "true".to_string()));
        }
        pairs
    }
}

const fn default_use_ai() -> bool {
    true
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::Validation("Title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(Error::Validation(format!(
            "Title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::Validation("Content is required".to_string()));
    }
    Ok(())
}
