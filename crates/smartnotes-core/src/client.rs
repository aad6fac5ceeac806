//! Session-to-store coordination.
//!
//! `NotesClient` is the single controller owning the session and the note
//! store. Entering the authenticated phase binds the store to the profile and
//! loads it; leaving it empties the store before anything else happens.

use std::sync::Arc;

use crate::auth::{Session, SessionManager, TokenPersistence};
use crate::gateway::NotesGateway;
use crate::models::{Credentials, ListFilter, NewNote, Note, NoteId, NotePatch, SignupPayload, UserProfile};
use crate::search::filter_notes;
use crate::state::{ClientPhase, ClientSnapshot};
use crate::store::{LoadOutcome, NoteStore};
use crate::{Error, Result};

pub struct NotesClient<G: NotesGateway, S: TokenPersistence> {
    session: SessionManager<G, S>,
    store: NoteStore<G>,
    filter: ListFilter,
    view_query: String,
    phase: ClientPhase,
}

impl<G: NotesGateway, S: TokenPersistence> NotesClient<G, S> {
    pub fn new(gateway: G, tokens: S) -> Self {
        Self::with_shared_gateway(Arc::new(gateway), tokens)
    }

    pub fn with_shared_gateway(gateway: Arc<G>, tokens: S) -> Self {
        Self {
            session: SessionManager::new(Arc::clone(&gateway), tokens),
            store: NoteStore::new(gateway),
            filter: ListFilter::default(),
            view_query: String::new(),
            phase: ClientPhase::Unauthenticated,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> ClientPhase {
        self.phase
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        self.session.session()
    }

    #[must_use]
    pub const fn store(&self) -> &NoteStore<G> {
        &self.store
    }

    #[must_use]
    pub const fn filter(&self) -> &ListFilter {
        &self.filter
    }

    /// Restore a persisted session, if any, and load its notes.
    pub async fn start(&mut self) -> Result<ClientPhase> {
        if self.resume().await? == ClientPhase::Authenticated {
            self.load_initial().await;
        }
        Ok(self.phase)
    }

    pub async fn login(&mut self, credentials: &Credentials) -> Result<UserProfile> {
        let profile = self.session.login(credentials).await?;
        self.enter_authenticated(&profile).await;
        Ok(profile)
    }

    /// Restore a persisted session without loading notes, for callers that
    /// only act on individual notes.
    pub async fn resume(&mut self) -> Result<ClientPhase> {
        match self.session.resume().await {
            Ok(Some(profile)) => {
                self.store.attach(profile.id).await;
                self.phase = ClientPhase::Authenticated;
                tracing::info!(user_id = profile.id, "Session restored");
                Ok(self.phase)
            }
            Ok(None) => {
                self.leave_authenticated().await;
                Ok(self.phase)
            }
            Err(error) => {
                self.leave_authenticated().await;
                Err(error)
            }
        }
    }

    pub async fn signup(&mut self, payload: &SignupPayload) -> Result<UserProfile> {
        let profile = self.session.signup(payload).await?;
        self.enter_authenticated(&profile).await;
        Ok(profile)
    }

    /// Tear down the session. The collection is emptied even if clearing
    /// durable storage fails.
    pub async fn logout(&mut self) -> Result<()> {
        self.store.clear().await;
        self.phase = ClientPhase::Unauthenticated;
        self.session.logout()
    }

    /// Toggle server-side inclusion of archived notes; reloads on change.
    pub async fn set_include_archived(&mut self, include_archived: bool) -> Result<()> {
        if self.filter.include_archived == include_archived {
            return Ok(());
        }
        let filter = ListFilter {
            include_archived,
            ..self.filter.clone()
        };
        self.apply_filter(filter).await
    }

    /// Submit a server-side search; blank text clears it. Reloads on change.
    pub async fn submit_search(&mut self, query: &str) -> Result<()> {
        let search = Some(query.trim().to_string()).filter(|value| !value.is_empty());
        if self.filter.search == search {
            return Ok(());
        }
        let filter = ListFilter {
            search,
            ..self.filter.clone()
        };
        self.apply_filter(filter).await
    }

    /// Set the live client-side query. Never touches the remote.
    pub fn set_view_query(&mut self, query: impl Into<String>) {
        self.view_query = query.into();
    }

    #[must_use]
    pub fn view_query(&self) -> &str {
        &self.view_query
    }

    /// Re-fetch the collection with the current filter.
    pub async fn refresh(&mut self) -> Result<LoadOutcome> {
        let token = self.require_token()?;
        let result = self.store.load(&token, &self.filter).await;
        self.settle(result).await
    }

    pub async fn create_note(&mut self, payload: &NewNote) -> Result<Note> {
        let token = self.require_token()?;
        let result = self.store.create(&token, payload).await;
        self.settle(result).await
    }

    pub async fn update_note(&mut self, id: NoteId, patch: &NotePatch) -> Result<Note> {
        let token = self.require_token()?;
        let result = self.store.update(&token, id, patch).await;
        self.settle(result).await
    }

    pub async fn set_pinned(&mut self, id: NoteId, is_pinned: bool) -> Result<Note> {
        self.update_note(id, &NotePatch::pin(is_pinned)).await
    }

    pub async fn set_archived(&mut self, id: NoteId, is_archived: bool) -> Result<Note> {
        self.update_note(id, &NotePatch::archive(is_archived)).await
    }

    pub async fn regenerate_note(&mut self, id: NoteId) -> Result<Note> {
        let token = self.require_token()?;
        let result = self.store.regenerate(&token, id).await;
        self.settle(result).await
    }

    pub async fn delete_note(&mut self, id: NoteId) -> Result<()> {
        let token = self.require_token()?;
        let result = self.store.delete(&token, id).await;
        self.settle(result).await
    }

    pub async fn fetch_note(&mut self, id: NoteId) -> Result<Note> {
        let token = self.require_token()?;
        let result = self.store.fetch(&token, id).await;
        self.settle(result).await
    }

    /// Loaded notes narrowed by the live view query.
    pub async fn visible_notes(&self) -> Vec<Note> {
        filter_notes(&self.store.snapshot().await, &self.view_query)
    }

    pub async fn snapshot(&self) -> ClientSnapshot {
        let notes = self.store.snapshot().await;
        let visible = filter_notes(&notes, &self.view_query);
        let session = self.session.session();
        ClientSnapshot {
            phase: self.phase,
            user: session.user().cloned(),
            feedback: session.feedback().map(ToString::to_string),
            filter: self.filter.clone(),
            view_query: self.view_query.clone(),
            notes,
            visible,
        }
    }

    async fn enter_authenticated(&mut self, profile: &UserProfile) {
        self.store.attach(profile.id).await;
        self.phase = ClientPhase::Authenticated;
        tracing::info!(user_id = profile.id, "Session active; loading notes");
        self.load_initial().await;
    }

    async fn load_initial(&mut self) {
        if let Err(error) = self.refresh().await {
            tracing::warn!("Initial note load failed: {}", error);
        }
    }

    async fn leave_authenticated(&mut self) {
        self.store.clear().await;
        self.phase = ClientPhase::Unauthenticated;
    }

    /// The filter is committed only once its listing has loaded, so a failed
    /// reload can be retried. While signed out it is committed directly and
    /// used by the next session's first load.
    async fn apply_filter(&mut self, filter: ListFilter) -> Result<()> {
        if self.phase == ClientPhase::Authenticated {
            let token = self.require_token()?;
            let result = self.store.load(&token, &filter).await;
            self.settle(result).await?;
        }
        self.filter = filter;
        Ok(())
    }

    fn require_token(&self) -> Result<String> {
        match (self.phase, self.session.token()) {
            (ClientPhase::Authenticated, Some(token)) => Ok(token.to_string()),
            _ => Err(Error::Authentication("Not signed in".to_string())),
        }
    }

    /// An authentication failure on a note operation means the token expired.
    async fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(error) = &result {
            if error.is_authentication() && self.phase == ClientPhase::Authenticated {
                tracing::info!("Session expired: {}", error.message());
                self.leave_authenticated().await;
                self.session.invalidate(&error.message());
            }
        }
        result
    }
}
