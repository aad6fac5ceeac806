//! Authoritative in-memory collection of the signed-in user's notes.
//!
//! Every mutation goes to the remote first; the local collection only changes
//! once the remote has answered, and then only from the remote's answer. A
//! failed call leaves the collection exactly as it was.
//!
//! `load` replaces the whole collection. A listing older than the one already
//! applied is discarded, and so is any response that arrives after the store
//! was cleared for a session change.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::gateway::NotesGateway;
use crate::models::{ListFilter, NewNote, Note, NoteId, NotePatch, UserId};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The listing replaced the collection.
    Applied { count: usize },
    /// A newer applied load or a session change made this response stale.
    Superseded,
}

#[derive(Debug, Default)]
struct StoreState {
    notes: Vec<Note>,
    filter: ListFilter,
    owner: Option<UserId>,
    /// Last generation handed out to a `load` request.
    load_generation: u64,
    /// Generation of the listing the collection currently holds. Never goes backwards.
    applied_generation: u64,
    /// Bumped whenever the collection is torn down for a session change.
    epoch: u64,
}

impl StoreState {
    fn ensure_owned(&self, note: &Note) -> Result<()> {
        match self.owner {
            Some(owner) if owner != note.owner_id => Err(Error::Remote(format!(
                "note {} belongs to another user",
                note.id
            ))),
            _ => Ok(()),
        }
    }
}

pub struct NoteStore<G: NotesGateway> {
    gateway: Arc<G>,
    state: Arc<Mutex<StoreState>>,
    revision: Arc<watch::Sender<u64>>,
}

impl<G: NotesGateway> Clone for NoteStore<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            state: Arc::clone(&self.state),
            revision: Arc::clone(&self.revision),
        }
    }
}

impl<G: NotesGateway> NoteStore<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            gateway,
            state: Arc::new(Mutex::new(StoreState::default())),
            revision: Arc::new(revision),
        }
    }

    /// Receiver that observes a new revision after every applied change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Copy of the current collection, in display order.
    pub async fn snapshot(&self) -> Vec<Note> {
        self.state.lock().await.notes.clone()
    }

    pub async fn get(&self, id: NoteId) -> Option<Note> {
        self.state
            .lock()
            .await
            .notes
            .iter()
            .find(|note| note.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.notes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.notes.is_empty()
    }

    /// Filter of the listing the collection currently holds.
    pub async fn filter(&self) -> ListFilter {
        self.state.lock().await.filter.clone()
    }

    pub async fn owner(&self) -> Option<UserId> {
        self.state.lock().await.owner
    }

    /// Empty the collection and bind it to a new owner.
    pub async fn attach(&self, owner: UserId) {
        let mut state = self.state.lock().await;
        state.notes.clear();
        state.owner = Some(owner);
        state.epoch += 1;
        drop(state);
        tracing::debug!(owner, "Note store attached");
        self.notify();
    }

    /// Empty the collection for a session teardown. In-flight responses are dropped.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        state.notes.clear();
        state.owner = None;
        state.epoch += 1;
        drop(state);
        tracing::debug!("Note store cleared");
        self.notify();
    }

    /// Replace the collection with the remote listing for `filter`.
    pub async fn load(&self, token: &str, filter: &ListFilter) -> Result<LoadOutcome> {
        let (generation, epoch) = {
            let mut state = self.state.lock().await;
            state.load_generation += 1;
            (state.load_generation, state.epoch)
        };

        let notes = self.gateway.list_notes(token, filter).await?;

        let mut state = self.state.lock().await;
        if state.epoch != epoch || state.applied_generation > generation {
            tracing::warn!(generation, "Discarding superseded note listing");
            return Ok(LoadOutcome::Superseded);
        }
        for note in &notes {
            state.ensure_owned(note)?;
        }
        let count = notes.len();
        state.notes = notes;
        state.filter = filter.clone();
        state.applied_generation = generation;
        drop(state);

        tracing::debug!(count, "Note listing applied");
        self.notify();
        Ok(LoadOutcome::Applied { count })
    }

    /// Create a note and place the server's copy at the front of the collection.
    pub async fn create(&self, token: &str, payload: &NewNote) -> Result<Note> {
        payload.validate()?;
        let epoch = self.epoch().await;

        let note = self.gateway.create_note(token, payload).await?;

        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            tracing::warn!(id = %note.id, "Discarding create response from a previous session");
            return Ok(note);
        }
        state.ensure_owned(&note)?;
        state.notes.retain(|existing| existing.id != note.id);
        state.notes.insert(0, note.clone());
        drop(state);

        self.notify();
        Ok(note)
    }

    /// Send a partial update and swap in the server's copy, keeping its position.
    ///
    /// Archiving while archived notes are not listed removes the entry.
    pub async fn update(&self, token: &str, id: NoteId, patch: &NotePatch) -> Result<Note> {
        patch.validate()?;
        let epoch = self.epoch().await;

        let note = self.gateway.update_note(token, id, patch).await?;

        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            tracing::warn!(%id, "Discarding update response from a previous session");
            return Ok(note);
        }
        state.ensure_owned(&note)?;
        if patch.archives() && !state.filter.include_archived {
            state.notes.retain(|existing| existing.id != id);
        } else if let Some(slot) = state.notes.iter_mut().find(|existing| existing.id == id) {
            *slot = note.clone();
        }
        drop(state);

        self.notify();
        Ok(note)
    }

    /// Ask the remote to recompute the AI summary and tags.
    pub async fn regenerate(&self, token: &str, id: NoteId) -> Result<Note> {
        self.update(token, id, &NotePatch::regenerate()).await
    }

    pub async fn delete(&self, token: &str, id: NoteId) -> Result<()> {
        let epoch = self.epoch().await;

        self.gateway.delete_note(token, id).await?;

        let mut state = self.state.lock().await;
        if state.epoch != epoch {
            return Ok(());
        }
        state.notes.retain(|existing| existing.id != id);
        drop(state);

        self.notify();
        Ok(())
    }

    /// Fetch one note and refresh its entry if the collection holds it.
    pub async fn fetch(&self, token: &str, id: NoteId) -> Result<Note> {
        let epoch = self.epoch().await;

        let note = self.gateway.fetch_note(token, id).await?;

        let mut state = self.state.lock().await;
        if state.epoch == epoch {
            state.ensure_owned(&note)?;
            if let Some(slot) = state.notes.iter_mut().find(|existing| existing.id == id) {
                *slot = note.clone();
                drop(state);
                self.notify();
            }
        }
        Ok(note)
    }

    async fn epoch(&self) -> u64 {
        self.state.lock().await.epoch
    }

    fn notify(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}
