//! Session registry
//!
//! Each session's schema is private to it; the store only maps ids to
//! sessions and serialises access to the map. Sessions idle longer than the
//! configured TTL are dropped, and the least recently used one is evicted
//! when the store is full.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppResult, SessionError};
use crate::models::{AnswerInputs, FormTemplate};
use crate::services::{EditorAction, Submission};
use crate::workflow::form_session::{FormPage, FormSession};

pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

#[derive(Debug)]
struct Slot {
    session: FormSession,
    touched_at: Instant,
    /// Monotonic use counter; orders slots for eviction
    last_use: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    slots: HashMap<Uuid, Slot>,
    clock: u64,
}

impl Sessions {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn prune_idle(&mut self, ttl: Duration) {
        let before = self.slots.len();
        self.slots.retain(|_, slot| slot.touched_at.elapsed() <= ttl);
        let dropped = before - self.slots.len();
        if dropped > 0 {
            info!("dropped {} idle session(s)", dropped);
        }
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .slots
            .iter()
            .min_by_key(|(_, slot)| slot.last_use)
            .map(|(id, _)| *id);
        if let Some(id) = oldest {
            self.slots.remove(&id);
            info!("session {} evicted, store full", id);
        }
    }
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<Sessions>,
    templates: HashMap<String, FormTemplate>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SessionStore {
    pub fn new(templates: Vec<FormTemplate>) -> Self {
        Self::with_limits(templates, DEFAULT_IDLE_TTL, DEFAULT_MAX_SESSIONS)
    }

    /// `max_sessions` is raised to 1 when given as 0
    pub fn with_limits(templates: Vec<FormTemplate>, idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(Sessions::default()),
            templates: templates.into_iter().map(|t| (t.name.clone(), t)).collect(),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.keys().cloned().collect();
        names.sort();
        names
    }

    /// Opens a session, empty or seeded from a named template
    pub fn create(&self, template: Option<&str>) -> AppResult<FormPage> {
        let id = Uuid::new_v4();
        let session = match template {
            None => FormSession::new(id),
            Some(name) => {
                let template = self.templates.get(name).ok_or_else(|| {
                    SessionError::TemplateNotFound {
                        name: name.to_string(),
                    }
                })?;
                FormSession::with_schema(id, template.to_schema())
            }
        };

        let page = session.page();
        {
            let mut sessions = self.sessions.lock();
            sessions.prune_idle(self.idle_ttl);
            while sessions.slots.len() >= self.max_sessions {
                sessions.evict_oldest();
            }
            let last_use = sessions.tick();
            sessions.slots.insert(
                id,
                Slot {
                    session,
                    touched_at: Instant::now(),
                    last_use,
                },
            );
        }
        info!("session {} opened (template: {:?})", id, template);
        Ok(page)
    }

    /// Runs `f` against one session and marks it as used
    pub fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut FormSession) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut sessions = self.sessions.lock();
        sessions.prune_idle(self.idle_ttl);
        let last_use = sessions.tick();
        let slot = sessions
            .slots
            .get_mut(&id)
            .ok_or(SessionError::NotFound { id })?;
        slot.touched_at = Instant::now();
        slot.last_use = last_use;
        debug!("session {} touched", id);
        f(&mut slot.session)
    }

    pub fn page(&self, id: Uuid) -> AppResult<FormPage> {
        self.with_session(id, |session| Ok(session.page()))
    }

    pub fn apply(&self, id: Uuid, action: EditorAction) -> AppResult<FormPage> {
        self.with_session(id, |session| {
            session.apply(action)?;
            Ok(session.page())
        })
    }

    pub fn submit(&self, id: Uuid, inputs: &AnswerInputs) -> AppResult<Submission> {
        self.with_session(id, |session| session.submit(inputs))
    }

    pub fn remove(&self, id: Uuid) -> AppResult<()> {
        self.sessions
            .lock()
            .slots
            .remove(&id)
            .map(|_| info!("session {} closed", id))
            .ok_or_else(|| SessionError::NotFound { id }.into())
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
