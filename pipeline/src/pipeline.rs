//! Pipeline orchestration: decode → parse → submit → reconcile.
//!
//! The three external triggers map onto [`Pipeline::solve`],
//! [`Pipeline::clear`], and [`Pipeline::reapply`]. The orchestrator owns
//! the [`SessionState`] and the [`AnswerClient`]; callers own the capture
//! and the candidate nodes.

use tracing::{info, warn};

use formkey_core::{FormCapture, Question};

use crate::client::AnswerClient;
use crate::error::{PipelineError, Result};
use crate::reconcile::{self, CandidateNode};
use crate::session::SessionState;

/// Parses a capture into questions, including the multi-select overwrite.
///
/// Runs the question parser over the capture's items, then copies each raw
/// item's checkbox signal onto the question at the same index — the
/// index alignment the parser guarantees is what makes this overwrite
/// well-defined.
///
/// # Examples
///
/// ```
/// use formkey_core::{FormCapture, RawItem};
/// use formkey_pipeline::parse_capture;
///
/// let capture = FormCapture {
///     items: vec![RawItem::new(r#"%.@.[0,"Pick all"]"#).multi_select()],
///     option_texts: vec![],
/// };
/// let questions = parse_capture(&capture);
/// assert!(questions[0].is_multi_select);
/// ```
pub fn parse_capture(capture: &FormCapture) -> Vec<Question> {
    let mut questions = crate::parser::parse_raw_items(&capture.items);
    for (question, item) in questions.iter_mut().zip(&capture.items) {
        if item.is_multi_select {
            question.is_multi_select = true;
        }
    }
    questions
}

/// Orchestrator for the solve / clear / reapply triggers.
///
/// # Examples
///
/// ```no_run
/// use formkey_core::{FormCapture, RawItem};
/// use formkey_pipeline::Pipeline;
///
/// # async fn run() -> formkey_pipeline::Result<()> {
/// let mut pipeline = Pipeline::new()?;
/// let capture = FormCapture {
///     items: vec![RawItem::new(r#"%.@.[0,"What is 2+2?",[[1,[[0,"3"],[1,"4"]]]]]"#)],
///     option_texts: vec!["3".to_string(), "4".to_string()],
/// };
/// let mut nodes = capture.option_texts.clone();
/// pipeline.solve(&capture, &mut nodes).await?;
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    client: AnswerClient,
    session: SessionState,
}

impl Pipeline {
    /// Creates a pipeline against the default answer service deployment.
    pub fn new() -> Result<Self> {
        Ok(Self::with_client(AnswerClient::new()?))
    }

    /// Creates a pipeline with a custom client.
    pub fn with_client(client: AnswerClient) -> Self {
        Self {
            client,
            session: SessionState::new(),
        }
    }

    /// The session cache, for persistence or inspection.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Replaces the session cache, e.g. with one loaded from a
    /// [`SessionStore`](crate::session::SessionStore).
    pub fn restore_session(&mut self, session: SessionState) {
        self.session = session;
    }

    /// Runs the full pipeline: parse the capture, submit the questions,
    /// commit the answers to the session, and reconcile them onto `nodes`.
    ///
    /// Halts with [`PipelineError::NoQuestions`] before any network call
    /// when the capture has no items, and with a transport/service error
    /// before reconciliation when the submission fails. A completion that
    /// lost to a newer run is discarded without touching any node.
    pub async fn solve<N: CandidateNode>(
        &mut self,
        capture: &FormCapture,
        nodes: &mut [N],
    ) -> Result<()> {
        if capture.is_empty() {
            return Err(PipelineError::NoQuestions);
        }

        let token = self.session.begin_run();
        let questions = parse_capture(capture);
        info!(questions = questions.len(), "parsed capture");

        let sheet = self.client.fetch_answers(&questions).await?;

        if !self.session.commit(token, questions, sheet) {
            warn!("run superseded before completion; skipping reconciliation");
            return Ok(());
        }

        if let Some((questions, sheet)) = self.session.cached() {
            reconcile::apply_answers(sheet, questions, nodes);
        }
        Ok(())
    }

    /// Re-applies the cached answers from the last successful run.
    ///
    /// Fails visibly with [`PipelineError::NoCache`] when no run has
    /// committed yet.
    pub fn reapply<N: CandidateNode>(&self, nodes: &mut [N]) -> Result<()> {
        let Some((questions, sheet)) = self.session.cached() else {
            return Err(PipelineError::NoCache);
        };
        reconcile::apply_answers(sheet, questions, nodes);
        Ok(())
    }

    /// Strips answer marks from every node.
    pub fn clear<N: CandidateNode>(&self, nodes: &mut [N]) {
        reconcile::clear_marks(nodes);
    }
}
