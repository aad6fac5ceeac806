//! In-process backend double for unit tests.
//!
//! Mirrors the backend's observable behavior: per-user ownership, listing
//! order (`is_pinned desc, updated_at desc`), archived filtering, search over
//! title/content, AI enrichment on create/regenerate, and bearer-token checks.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::oneshot;

use crate::gateway::NotesGateway;
use crate::models::{
    Credentials, ListFilter, NewNote, Note, NoteId, NotePatch, SignupPayload, TokenResponse,
    UserId, UserProfile,
};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Signup,
    Login,
    FetchProfile,
    List,
    FetchNote,
    Create,
    Update,
    Delete,
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 26, 12, 0, 0).unwrap()
}

/// A standalone note owned by user 1.
pub fn note_fixture(id: i64, title: &str, content: &str) -> Note {
    Note {
        id: NoteId::new(id),
        owner_id: 1,
        title: title.to_string(),
        content: content.to_string(),
        tags: None,
        ai_summary: None,
        ai_tags: None,
        is_pinned: false,
        is_archived: false,
        created_at: base_time(),
        updated_at: base_time(),
    }
}

#[derive(Default)]
pub struct FakeGateway {
    backend: Mutex<Backend>,
}

struct Account {
    profile: UserProfile,
    password: String,
}

#[derive(Default)]
struct Backend {
    accounts: Vec<Account>,
    tokens: HashMap<String, UserId>,
    notes: Vec<Note>,
    next_user_id: i64,
    next_note_id: i64,
    next_token: u64,
    ticks: i64,
    enrichments: u64,
    failures: Vec<(Op, Error)>,
    calls: Vec<Op>,
    list_gates: VecDeque<oneshot::Receiver<()>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn backend(&self) -> MutexGuard<'_, Backend> {
        self.backend.lock().unwrap()
    }

    pub fn add_user(&self, username: &str, password: &str) -> UserProfile {
        let mut backend = self.backend();
        backend.register(&format!("{username}@example.com"), username, None, password)
    }

    /// Mint a token for an existing user without going through login.
    pub fn issue_token(&self, user_id: UserId) -> String {
        self.backend().mint_token(user_id)
    }

    /// Invalidate every outstanding token, as an expiry would.
    pub fn revoke_tokens(&self) {
        self.backend().tokens.clear();
    }

    pub fn seed_note(&self, owner_id: UserId, title: &str, content: &str) -> Note {
        let mut backend = self.backend();
        let now = backend.tick();
        backend.next_note_id += 1;
        let note = Note {
            id: NoteId::new(backend.next_note_id),
            owner_id,
            created_at: now,
            updated_at: now,
            ..note_fixture(0, title, content)
        };
        backend.notes.push(note.clone());
        note
    }

    /// Overwrite a stored note directly, bypassing the API.
    pub fn edit_stored(&self, id: NoteId, edit: impl FnOnce(&mut Note)) {
        let mut backend = self.backend();
        if let Some(note) = backend.notes.iter_mut().find(|note| note.id == id) {
            edit(note);
        }
    }

    pub fn stored_note(&self, id: NoteId) -> Option<Note> {
        self.backend().notes.iter().find(|note| note.id == id).cloned()
    }

    pub fn fail_next(&self, op: Op, error: Error) {
        self.backend().failures.push((op, error));
    }

    pub fn calls(&self, op: Op) -> usize {
        self.backend().calls.iter().filter(|call| **call == op).count()
    }

    /// Hold the next listing response until the returned sender fires.
    pub fn hold_next_list(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.backend().list_gates.push_back(receiver);
        sender
    }

    fn begin(&self, op: Op) -> MutexGuard<'_, Backend> {
        let mut backend = self.backend();
        backend.calls.push(op);
        backend
    }
}

impl Backend {
    fn tick(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        base_time() + Duration::seconds(self.ticks)
    }

    fn take_failure(&mut self, op: Op) -> Result<()> {
        match self.failures.iter().position(|(failing, _)| *failing == op) {
            Some(index) => Err(self.failures.remove(index).1),
            None => Ok(()),
        }
    }

    fn register(
        &mut self,
        email: &str,
        username: &str,
        full_name: Option<String>,
        password: &str,
    ) -> UserProfile {
        self.next_user_id += 1;
        let created_at = self.tick();
        let profile = UserProfile {
            id: self.next_user_id,
            email: email.to_string(),
            username: username.to_string(),
            full_name,
            is_active: true,
            created_at,
        };
        self.accounts.push(Account {
            profile: profile.clone(),
            password: password.to_string(),
        });
        profile
    }

    fn mint_token(&mut self, user_id: UserId) -> String {
        self.next_token += 1;
        let token = format!("token-{}", self.next_token);
        self.tokens.insert(token.clone(), user_id);
        token
    }

    fn authorize(&self, token: &str) -> Result<UserId> {
        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| Error::Authentication("Could not validate credentials".to_string()))
    }

    fn owned_note_mut(&mut self, owner_id: UserId, id: NoteId) -> Result<&mut Note> {
        self.notes
            .iter_mut()
            .find(|note| note.id == id && note.owner_id == owner_id)
            .ok_or_else(|| Error::NotFound("Note not found".to_string()))
    }

    fn enrich(&mut self, title: &str, content: &str, tags: Option<&Vec<String>>) -> (String, Vec<String>) {
        self.enrichments += 1;
        let text = format!("{} {}", title.trim(), content.trim());
        let summary = text.chars().take(280).collect::<String>();
        let tags = tags
            .filter(|tags| !tags.is_empty())
            .cloned()
            .unwrap_or_else(|| vec![format!("auto-{}", self.enrichments)]);
        (summary, tags)
    }

    fn list(&mut self, token: &str, filter: &ListFilter) -> Result<Vec<Note>> {
        self.take_failure(Op::List)?;
        let owner_id = self.authorize(token)?;
        let search = filter.search.as_deref().map(str::to_lowercase);
        let mut notes = self
            .notes
            .iter()
            .filter(|note| note.owner_id == owner_id)
            .filter(|note| filter.include_archived || !note.is_archived)
            .filter(|note| {
                search.as_deref().map_or(true, |query| {
                    note.title.to_lowercase().contains(query)
                        || note.content.to_lowercase().contains(query)
                })
            })
            .cloned()
            .collect::<Vec<_>>();
        notes.sort_by(|a, b| {
            b.is_pinned
                .cmp(&a.is_pinned)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        Ok(notes)
    }
}

#[async_trait]
impl NotesGateway for FakeGateway {
    async fn signup(&self, payload: &SignupPayload) -> Result<UserProfile> {
        let mut backend = self.begin(Op::Signup);
        backend.take_failure(Op::Signup)?;
        if backend
            .accounts
            .iter()
            .any(|account| account.profile.username == payload.username)
        {
            return Err(Error::Remote("Username already registered".to_string()));
        }
        if backend
            .accounts
            .iter()
            .any(|account| account.profile.email == payload.email)
        {
            return Err(Error::Remote("Email already registered".to_string()));
        }
        Ok(backend.register(
            &payload.email,
            &payload.username,
            payload.full_name.clone(),
            &payload.password,
        ))
    }

    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        let mut backend = self.begin(Op::Login);
        backend.take_failure(Op::Login)?;
        let user_id = backend
            .accounts
            .iter()
            .find(|account| {
                account.profile.username == credentials.username
                    && account.password == credentials.password
            })
            .map(|account| account.profile.id)
            .ok_or_else(|| Error::Authentication("Incorrect username or password".to_string()))?;
        Ok(TokenResponse {
            access_token: backend.mint_token(user_id),
            token_type: "bearer".to_string(),
        })
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile> {
        let mut backend = self.begin(Op::FetchProfile);
        backend.take_failure(Op::FetchProfile)?;
        let user_id = backend.authorize(token)?;
        backend
            .accounts
            .iter()
            .find(|account| account.profile.id == user_id)
            .map(|account| account.profile.clone())
            .ok_or_else(|| Error::Authentication("User not found".to_string()))
    }

    async fn list_notes(&self, token: &str, filter: &ListFilter) -> Result<Vec<Note>> {
        let (result, gate) = {
            let mut backend = self.begin(Op::List);
            let gate = backend.list_gates.pop_front();
            (backend.list(token, filter), gate)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }

    async fn fetch_note(&self, token: &str, id: NoteId) -> Result<Note> {
        let mut backend = self.begin(Op::FetchNote);
        backend.take_failure(Op::FetchNote)?;
        let owner_id = backend.authorize(token)?;
        backend.owned_note_mut(owner_id, id).map(|note| note.clone())
    }

    async fn create_note(&self, token: &str, payload: &NewNote) -> Result<Note> {
        let mut backend = self.begin(Op::Create);
        backend.take_failure(Op::Create)?;
        let owner_id = backend.authorize(token)?;
        let (ai_summary, ai_tags) = if payload.use_ai {
            let (summary, tags) = backend.enrich(&payload.title, &payload.content, payload.tags.as_ref());
            (Some(summary), Some(tags))
        } else {
            (None, None)
        };
        let now = backend.tick();
        backend.next_note_id += 1;
        let note = Note {
            id: NoteId::new(backend.next_note_id),
            owner_id,
            title: payload.title.clone(),
            content: payload.content.clone(),
            tags: payload.tags.clone(),
            ai_summary,
            ai_tags,
            is_pinned: payload.is_pinned,
            is_archived: payload.is_archived,
            created_at: now,
            updated_at: now,
        };
        backend.notes.push(note.clone());
        Ok(note)
    }

    async fn update_note(&self, token: &str, id: NoteId, patch: &NotePatch) -> Result<Note> {
        let mut backend = self.begin(Op::Update);
        backend.take_failure(Op::Update)?;
        let owner_id = backend.authorize(token)?;
        let mut note = backend.owned_note_mut(owner_id, id)?.clone();

        let mut content_changed = false;
        if let Some(title) = patch.title.as_ref().filter(|title| **title != note.title) {
            note.title.clone_from(title);
            content_changed = true;
        }
        if let Some(content) = patch.content.as_ref().filter(|content| **content != note.content) {
            note.content.clone_from(content);
            content_changed = true;
        }
        if let Some(tags) = &patch.tags {
            note.tags = Some(tags.clone());
        }
        if let Some(is_pinned) = patch.is_pinned {
            note.is_pinned = is_pinned;
        }
        if let Some(is_archived) = patch.is_archived {
            note.is_archived = is_archived;
        }
        if patch.regenerate_ai || content_changed {
            let (summary, tags) = backend.enrich(&note.title, &note.content, note.tags.as_ref());
            note.ai_summary = Some(summary);
            note.ai_tags = Some(tags);
        }
        note.updated_at = backend.tick();

        *backend.owned_note_mut(owner_id, id)? = note.clone();
        Ok(note)
    }

    async fn delete_note(&self, token: &str, id: NoteId) -> Result<()> {
        let mut backend = self.begin(Op::Delete);
        backend.take_failure(Op::Delete)?;
        let owner_id = backend.authorize(token)?;
        backend.owned_note_mut(owner_id, id)?;
        backend.notes.retain(|note| note.id != id);
        Ok(())
    }
}
