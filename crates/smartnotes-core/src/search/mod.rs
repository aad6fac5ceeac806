//! Client-side view filtering over already-loaded notes.
//!
//! This is display-only derivation. Archived inclusion is a server-side
//! listing parameter and never handled here.

use std::collections::BTreeSet;

use crate::models::Note;

/// Notes whose title, content or AI summary contains `query`, case-insensitively.
///
/// Order is preserved. A blank query returns every note.
#[must_use]
pub fn filter_notes(notes: &[Note], query: &str) -> Vec<Note> {
    if query.trim().is_empty() {
        return notes.to_vec();
    }
    let lowered = query.to_lowercase();
    notes
        .iter()
        .filter(|note| note_matches_query(note, &lowered))
        .cloned()
        .collect()
}

/// `lowered_query` must already be lower-cased.
#[must_use]
pub fn note_matches_query(note: &Note, lowered_query: &str) -> bool {
    note.title.to_lowercase().contains(lowered_query)
        || note.content.to_lowercase().contains(lowered_query)
        || note
            .ai_summary
            .as_deref()
            .is_some_and(|summary| summary.to_lowercase().contains(lowered_query))
}

/// Return a sorted, deduplicated list of user and AI tags across notes.
#[must_use]
pub fn collect_tags(notes: &[Note]) -> Vec<String> {
    let mut tags = BTreeSet::new();
    for note in notes {
        for tag in note.user_tags().iter().chain(note.ai_tag_list()) {
            let tag = tag.trim();
            if !tag.is_empty() {
                tags.insert(tag.to_lowercase());
            }
        }
    }
    tags.into_iter().collect()
}
