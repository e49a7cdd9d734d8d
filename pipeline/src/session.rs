//! Session state: the cached parse/answer pair and its file-backed store.
//!
//! The original design kept the last parsed questions and the last answer
//! sheet in process-wide mutable globals. Here the state is an explicit
//! object owned by the pipeline orchestrator and passed by reference, with
//! a generation counter standing in for the missing in-flight guard: a run
//! that was superseded before its network round-trip completed cannot
//! overwrite the cache of the newer run.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use formkey_core::{AnswerSheet, Question};

use crate::error::Result;

/// Opaque token tying a commit back to the run that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken(u64);

/// In-memory cache of the last successful run.
///
/// Set on a successful parse/fetch, read on demand for idempotent
/// re-application, overwritten by the next successful run. Never torn down
/// mid-session.
///
/// # Examples
///
/// ```
/// use formkey_core::{AnswerResult, AnswerSheet, Question};
/// use formkey_pipeline::session::SessionState;
///
/// let mut session = SessionState::new();
/// assert!(session.cached().is_none());
///
/// let token = session.begin_run();
/// let committed = session.commit(
///     token,
///     vec![Question::with_text("Q")],
///     AnswerSheet::new(vec![AnswerResult::single("Q", "a")]),
/// );
/// assert!(committed);
/// assert!(session.cached().is_some());
/// ```
#[derive(Debug, Default)]
pub struct SessionState {
    questions: Vec<Question>,
    answers: Option<AnswerSheet>,
    generation: u64,
    fetched_at: Option<String>,
}

/// Serializable snapshot of a committed session, for the file store.
#[derive(Debug, Serialize, Deserialize)]
struct SessionSnapshot {
    questions: Vec<Question>,
    answers: AnswerSheet,
    fetched_at: Option<String>,
}

impl SessionState {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new run, invalidating any still-outstanding older run.
    pub fn begin_run(&mut self) -> RunToken {
        self.generation += 1;
        RunToken(self.generation)
    }

    /// Stores a completed run's results, unless a newer run has started
    /// since `token` was issued. Returns whether the commit won.
    pub fn commit(
        &mut self,
        token: RunToken,
        questions: Vec<Question>,
        answers: AnswerSheet,
    ) -> bool {
        if token.0 != self.generation {
            warn!(
                token = token.0,
                current = self.generation,
                "discarding stale run completion"
            );
            return false;
        }
        self.questions = questions;
        self.answers = Some(answers);
        self.fetched_at = Some(chrono::Utc::now().to_rfc3339());
        true
    }

    /// The cached question/answer pair, when a run has committed.
    pub fn cached(&self) -> Option<(&[Question], &AnswerSheet)> {
        self.answers
            .as_ref()
            .map(|sheet| (self.questions.as_slice(), sheet))
    }

    /// RFC 3339 timestamp of the last committed fetch.
    pub fn fetched_at(&self) -> Option<&str> {
        self.fetched_at.as_deref()
    }
}

/// JSON file persistence for a committed session.
///
/// Lets a new process re-apply the previous run's answers without another
/// network round-trip. Loading is best-effort: a missing or corrupt file
/// reads as "no session".
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Creates a store at the given file path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Persists the session's committed pair. No-op when nothing has been
    /// committed yet.
    pub fn save(&self, session: &SessionState) -> Result<()> {
        let Some((questions, answers)) = session.cached() else {
            return Ok(());
        };
        let snapshot = SessionSnapshot {
            questions: questions.to_vec(),
            answers: answers.clone(),
            fetched_at: session.fetched_at().map(ToOwned::to_owned),
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Loads a previously saved session, or `None` when the file is
    /// missing or unreadable.
    pub fn load(&self) -> Option<SessionState> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let snapshot: SessionSnapshot = serde_json::from_str(&raw).ok()?;
        Some(SessionState {
            questions: snapshot.questions,
            answers: Some(snapshot.answers),
            generation: 0,
            fetched_at: snapshot.fetched_at,
        })
    }
}
