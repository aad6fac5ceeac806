//! Data models for SmartNotes

mod note;
pub mod timestamp;
mod user;

pub use note::{ListFilter, NewNote, Note, NoteId, NotePatch, MAX_TITLE_CHARS};
pub use user::{Credentials, SignupPayload, TokenResponse, UserId, UserProfile};
