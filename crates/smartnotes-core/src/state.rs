//! Shared client state types.

use crate::models::{ListFilter, Note, UserProfile};

/// Whether a validated session currently backs the note collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClientPhase {
    #[default]
    Unauthenticated,
    Authenticated,
}

/// Immutable view of everything a presentation layer needs to render.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientSnapshot {
    pub phase: ClientPhase,
    pub user: Option<UserProfile>,
    /// Most recent authentication failure, for display
    pub feedback: Option<String>,
    pub filter: ListFilter,
    pub view_query: String,
    /// Full loaded collection, in store order
    pub notes: Vec<Note>,
    /// `notes` narrowed by `view_query`
    pub visible: Vec<Note>,
}
