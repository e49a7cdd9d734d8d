//! Core record types and shared text primitives for form answer-key
//! extraction.
//!
//! This crate defines the data model flowing through the pipeline:
//!
//! - [`RawItem`] — one scraped form item (serialized params, image URL,
//!   checkbox signal), never mutated after creation.
//! - [`Question`] — the normalized record the parser produces, one per raw
//!   item and index-aligned with the input.
//! - [`AnswerResult`] / [`AnswerSheet`] — the answer service's reply, keyed
//!   by echoed question text.
//! - [`FormCapture`] — the input boundary: raw items plus the flat pool of
//!   candidate option texts.
//!
//! Text normalization shared by the parser and the reconciler lives in
//! [`text`].
//!
//! # Example
//!
//! ```
//! use formkey_core::{AnswerResult, AnswerSheet, Question};
//!
//! let questions = vec![Question::with_text("What is  2+2?")];
//! let sheet = AnswerSheet::new(vec![AnswerResult::single("What is 2+2?", "4")]);
//!
//! let hit = sheet.find_for_question(&questions[0].text).unwrap();
//! assert_eq!(hit.answer.to_trimmed_list(), vec!["4"]);
//! ```

pub mod text;
mod types;

pub use types::{
    AnswerResult, AnswerSheet, AnswerText, FormCapture, Question, RawItem, SubmitRequest,
};
