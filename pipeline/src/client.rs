//! HTTP client for the external answer service.
//!
//! The service accepts the parsed questions as `{"question": [...]}` and
//! replies with `{"result": [...]}` on success or `{"error": "..."}` on
//! failure (also embedded in non-2xx payloads). One POST per run, no
//! retries.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use formkey_core::{AnswerResult, AnswerSheet, Question, SubmitRequest};

use crate::error::{PipelineError, Result};

/// Default deployment of the answer service.
pub const DEFAULT_BASE_URL: &str = "https://google-forms-ashen.vercel.app";

/// Resource path for question submission.
const ANSWER_PATH: &str = "/api/gemini/content";

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Raw reply envelope. `result` and `error` are mutually exclusive in
/// practice but the service is not trusted on that.
#[derive(Debug, Deserialize)]
struct AnswerReply {
    #[serde(default)]
    result: Vec<AnswerResult>,
    #[serde(default)]
    error: Option<String>,
}

/// Async client for the answer service.
///
/// Builds its [`reqwest::Client`] once with a request timeout; clones of
/// the inner client are cheap, so one `AnswerClient` serves a whole
/// session.
pub struct AnswerClient {
    http: reqwest::Client,
    base_url: String,
}

impl AnswerClient {
    /// Creates a client against [`DEFAULT_BASE_URL`].
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom deployment.
    ///
    /// A trailing slash on `base_url` is tolerated.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Submits parsed questions and returns the decoded answer sheet.
    ///
    /// Halting failures: transport errors ([`PipelineError::Http`]),
    /// non-2xx responses with the payload's `error` message when one can be
    /// extracted ([`PipelineError::Status`]), and application-level errors
    /// reported inside a 2xx reply ([`PipelineError::Api`]).
    pub async fn fetch_answers(&self, questions: &[Question]) -> Result<AnswerSheet> {
        let url = format!("{}{}", self.base_url, ANSWER_PATH);
        let body = SubmitRequest {
            question: questions.to_vec(),
        };

        debug!(url = %url, questions = questions.len(), "submitting parsed questions");
        let response = self.http.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<AnswerReply>()
                .await
                .ok()
                .and_then(|reply| reply.error)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unrecognized error payload")
                        .to_string()
                });
            return Err(PipelineError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let reply: AnswerReply = response.json().await?;
        if let Some(message) = reply.error {
            return Err(PipelineError::Api(message));
        }

        info!(answers = reply.result.len(), "received answer sheet");
        Ok(AnswerSheet::new(reply.result))
    }
}
