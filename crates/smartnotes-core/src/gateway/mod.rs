//! Remote gateway to the notes/auth backend.
//!
//! The gateway is stateless: every call carries the bearer token it needs.
//! [`HttpGateway`] talks to the real backend; tests substitute fakes.

mod http;

use async_trait::async_trait;

pub use http::HttpGateway;

use crate::models::{
    Credentials, ListFilter, NewNote, Note, NoteId, NotePatch, SignupPayload, TokenResponse,
    UserProfile,
};
use crate::Result;

#[async_trait]
pub trait NotesGateway: Send + Sync + 'static {
    /// `POST /auth/signup`
    async fn signup(&self, payload: &SignupPayload) -> Result<UserProfile>;

    /// `POST /auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse>;

    /// `GET /auth/me`; any failure means the token is unusable.
    async fn fetch_profile(&self, token: &str) -> Result<UserProfile>;

    /// `GET /notes?search=&include_archived=`
    async fn list_notes(&self, token: &str, filter: &ListFilter) -> Result<Vec<Note>>;

    /// `GET /notes/{id}`
    async fn fetch_note(&self, token: &str, id: NoteId) -> Result<Note>;

    /// `POST /notes`
    async fn create_note(&self, token: &str, payload: &NewNote) -> Result<Note>;

    /// `PUT /notes/{id}`
    async fn update_note(&self, token: &str, id: NoteId, patch: &NotePatch) -> Result<Note>;

    /// `DELETE /notes/{id}`
    async fn delete_note(&self, token: &str, id: NoteId) -> Result<()>;
}
