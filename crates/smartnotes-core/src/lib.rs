//! smartnotes-core - Client library for the Smart Notes backend
//!
//! This crate holds the wire models, the HTTP gateway, session management and
//! the in-memory note store shared by every Smart Notes front end.
//! [`NotesClient`] ties them together: it owns the session and the store and
//! keeps them consistent across sign-in, sign-out and token expiry.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod search;
pub mod state;
pub mod store;
pub mod util;

#[cfg(test)]
pub mod testing;

pub use auth::{MemoryTokenStore, Session, SessionManager, TokenPersistence};
pub use client::NotesClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use gateway::{HttpGateway, NotesGateway};
pub use models::{ListFilter, NewNote, Note, NoteId, NotePatch, UserProfile};
pub use state::{ClientPhase, ClientSnapshot};
pub use store::{LoadOutcome, NoteStore};
