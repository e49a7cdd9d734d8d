//! Form question extraction and answer reconciliation.
//!
//! This crate turns scraped form captures into normalized
//! [`Question`](formkey_core::Question) records, submits them to an
//! external answer service, and reconciles the
//! returned answers back onto the page's option texts. It is built from
//! three cooperating pieces:
//!
//! - [`entity`] — decodes the HTML-entity-encoded serialized params blob
//!   into readable text (tags stripped, references resolved).
//! - [`parser`] — extracts question text, description, and option labels
//!   from the decoded blob using targeted pattern anchors, with per-item
//!   failure isolation: a malformed item yields a default question and
//!   never aborts the batch.
//! - [`reconcile`] — matches answer strings back onto candidate text nodes
//!   and appends/strips the `" +"` marker, idempotently.
//!
//! Around the core sit the [`client`] (async HTTP submission), the
//! [`session`] cache (explicit state with stale-completion protection),
//! and the [`Pipeline`] orchestrator wiring the three external triggers:
//! solve, clear, and reapply-from-cache.
//!
//! # Example
//!
//! ```
//! use formkey_core::{AnswerResult, AnswerSheet, FormCapture, RawItem};
//! use formkey_pipeline::{parse_capture, reconcile};
//!
//! let capture = FormCapture {
//!     items: vec![RawItem::new(
//!         r#"%.@.[0,"What is 2+2?","Pick one",[[1,[[0,"3"],[1,"4"]]]]]"#,
//!     )],
//!     option_texts: vec!["3".to_string(), "4".to_string()],
//! };
//!
//! let questions = parse_capture(&capture);
//! assert_eq!(questions[0].options, vec!["3", "4"]);
//!
//! // Answers normally come back from the service; reconcile them locally.
//! let sheet = AnswerSheet::new(vec![AnswerResult::single("What is 2+2?", "4")]);
//! let mut nodes = capture.option_texts.clone();
//! reconcile::apply_answers(&sheet, &questions, &mut nodes);
//! assert_eq!(nodes, vec!["3", "4 +"]);
//! ```

pub mod client;
pub mod entity;
pub mod error;
pub mod parser;
mod pipeline;
pub mod reconcile;
pub mod session;

pub use client::{AnswerClient, DEFAULT_BASE_URL};
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, parse_capture};
