//! Record types for form question extraction and answer reconciliation.
//!
//! This module defines the data model shared by the parsing pipeline and the
//! CLI. The types are designed for serialization with [`serde`]; field names
//! on the wire follow the answer service's JSON contract (`imgUrl`,
//! `isCheckbox`, `fullQuestion`, ...) while the Rust fields stay snake_case.

use serde::{Deserialize, Serialize};

/// One raw scraped form item, before parsing.
///
/// Produced by whatever walked the page: the serialized `data-params`
/// attribute value, the item's image source if any, and whether the item
/// renders checkbox-style (multi-select) inputs. Items are never mutated
/// after creation.
///
/// # Examples
///
/// ```
/// use formkey_core::RawItem;
///
/// let item: RawItem = serde_json::from_str(
///     r#"{"data-params": "%.@.[0,\"Q\"]", "img-url": null, "isCheckbox": true}"#,
/// ).unwrap();
/// assert!(item.is_multi_select);
/// assert!(item.image_url.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawItem {
    /// The opaque serialized attribute value, HTML-entity-encoded.
    #[serde(rename = "data-params", default)]
    pub serialized_params: String,
    /// Image source attached to the item, when present.
    #[serde(rename = "img-url", default)]
    pub image_url: Option<String>,
    /// Checkbox-detection signal from the scraper.
    #[serde(rename = "isCheckbox", default)]
    pub is_multi_select: bool,
}

impl RawItem {
    /// Creates an item from a serialized params string.
    ///
    /// # Examples
    ///
    /// ```
    /// use formkey_core::RawItem;
    ///
    /// let item = RawItem::new("%.@.[0,\"What?\"]");
    /// assert!(!item.is_multi_select);
    /// ```
    pub fn new(serialized_params: &str) -> Self {
        Self {
            serialized_params: serialized_params.to_string(),
            ..Default::default()
        }
    }

    /// Attaches an image URL.
    pub fn with_image_url(mut self, url: &str) -> Self {
        self.image_url = Some(url.to_string());
        self
    }

    /// Marks the item as checkbox-style (multi-select).
    pub fn multi_select(mut self) -> Self {
        self.is_multi_select = true;
        self
    }
}

/// A normalized form question.
///
/// Produced by the parser, one per [`RawItem`], in input order. Every field
/// falls back to its default on a failed extraction so a malformed item never
/// aborts the batch. `is_multi_select` is the one field the caller overwrites
/// after parsing, copying the checkbox signal from the paired raw item.
///
/// # Examples
///
/// ```
/// use formkey_core::Question;
///
/// let q = Question::default();
/// assert!(q.text.is_empty());
/// assert!(q.options.is_empty());
/// assert!(q.image_alt_text.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Primary prompt. Empty when unrecoverable.
    #[serde(default)]
    pub text: String,
    /// Secondary prompt shown under the question. Empty when absent.
    #[serde(default)]
    pub description: String,
    /// Answer choices offered, in source order. Possibly empty.
    #[serde(default)]
    pub options: Vec<String>,
    /// Image attached to the question, carried through from the raw item.
    #[serde(rename = "imgUrl", default)]
    pub image_url: Option<String>,
    /// Alt text for the image. Reserved; currently always `None`.
    #[serde(rename = "imgText", default)]
    pub image_alt_text: Option<String>,
    /// Whether the question accepts multiple answers.
    #[serde(rename = "isCheckbox", default)]
    pub is_multi_select: bool,
}

impl Question {
    /// Creates a question with the given prompt text.
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }

    /// The prompt with whitespace runs collapsed and ends trimmed, the form
    /// used when matching against an answer's `fullQuestion`.
    ///
    /// # Examples
    ///
    /// ```
    /// use formkey_core::Question;
    ///
    /// let q = Question::with_text("  What   is\n 2+2? ");
    /// assert_eq!(q.normalized_text(), "What is 2+2?");
    /// ```
    pub fn normalized_text(&self) -> String {
        crate::text::collapse_ws(&self.text)
    }
}

/// Answer payload for one question: a single choice or an ordered list.
///
/// The service sends a JSON string for single-answer questions and a JSON
/// array of strings for multi-select ones; the untagged representation
/// accepts both.
///
/// # Examples
///
/// ```
/// use formkey_core::AnswerText;
///
/// let one: AnswerText = serde_json::from_str(r#""4""#).unwrap();
/// assert_eq!(one.to_trimmed_list(), vec!["4"]);
///
/// let many: AnswerText = serde_json::from_str(r#"[" a ", "b"]"#).unwrap();
/// assert_eq!(many.to_trimmed_list(), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerText {
    /// Single answer string.
    One(String),
    /// Ordered list of answer strings.
    Many(Vec<String>),
}

impl AnswerText {
    /// Normalizes to a list of trimmed strings.
    pub fn to_trimmed_list(&self) -> Vec<String> {
        match self {
            Self::One(answer) => vec![answer.trim().to_string()],
            Self::Many(answers) => answers.iter().map(|a| a.trim().to_string()).collect(),
        }
    }
}

/// One answered question as returned by the answer service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// The question text the answer belongs to, echoed back by the service.
    #[serde(rename = "fullQuestion")]
    pub full_question: String,
    /// The answer(s) selected by the service.
    pub answer: AnswerText,
}

impl AnswerResult {
    /// Creates a single-answer result.
    pub fn single(full_question: &str, answer: &str) -> Self {
        Self {
            full_question: full_question.to_string(),
            answer: AnswerText::One(answer.to_string()),
        }
    }

    /// Creates a multi-answer result.
    pub fn multiple(full_question: &str, answers: &[&str]) -> Self {
        Self {
            full_question: full_question.to_string(),
            answer: AnswerText::Many(answers.iter().map(|a| a.to_string()).collect()),
        }
    }

    /// The echoed question with whitespace runs collapsed and ends trimmed.
    pub fn normalized_question(&self) -> String {
        crate::text::collapse_ws(&self.full_question)
    }
}

/// The full set of answers for one submission.
///
/// Wire shape `{"result": [...]}`. A reply with no `result` field
/// deserializes as empty, which downstream code treats the same as absent.
///
/// # Examples
///
/// ```
/// use formkey_core::AnswerSheet;
///
/// let sheet: AnswerSheet = serde_json::from_str("{}").unwrap();
/// assert!(sheet.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSheet {
    /// Per-question answers, at most one entry per submitted question.
    #[serde(default)]
    pub result: Vec<AnswerResult>,
}

impl AnswerSheet {
    /// Wraps a list of answer results.
    pub fn new(result: Vec<AnswerResult>) -> Self {
        Self { result }
    }

    /// `true` when the sheet carries no answers.
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    /// Finds the first result whose normalized question text equals `text`
    /// under the same normalization.
    pub fn find_for_question(&self, text: &str) -> Option<&AnswerResult> {
        let wanted = crate::text::collapse_ws(text);
        self.result
            .iter()
            .find(|r| r.normalized_question() == wanted)
    }
}

/// Request body submitted to the answer service: `{"question": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// The parsed questions, in page order.
    pub question: Vec<Question>,
}

/// One scraped page: the raw items plus the flat pool of candidate
/// answer-option texts.
///
/// The option texts are deliberately a single flat list, not grouped per
/// item — reconciliation matches across the whole pool (see the reconciler
/// docs for the consequence).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormCapture {
    /// Raw per-item records, in page order.
    #[serde(default)]
    pub items: Vec<RawItem>,
    /// Candidate answer-option texts, in page order.
    #[serde(rename = "optionTexts", default)]
    pub option_texts: Vec<String>,
}

impl FormCapture {
    /// `true` when the capture holds no items at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
