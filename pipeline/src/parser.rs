//! Parser for the serialized question params format.
//!
//! Form items carry their question data in an undocumented array-like
//! textual encoding: a `%.@.[` prefix, a numeric type tag, quoted string
//! literals, and nested bracket groups, e.g.
//!
//! ```text
//! %.@.[0,"What is 2+2?","Pick one",[[1,[[0,"3"],[1,"4"]]]]]
//! ```
//!
//! Rather than a general grammar over that format, the parser uses targeted
//! pattern anchors for the three fields it needs — question text,
//! description, and option labels — and tolerates the absence of any of
//! them independently. Robustness over completeness: a field that does not
//! match its anchor stays at its default and the rest of the item still
//! parses.
//!
//! Accepted limitation: quoted strings containing escaped quotes are not
//! handled. A literal `"` inside a label or prompt terminates extraction at
//! that boundary. Callers get the truncated prefix, not an error.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use formkey_core::{Question, RawItem};

use crate::entity;

/// Regex anchors for the serialized params format.
static PATTERNS: LazyLock<ParamPatterns> = LazyLock::new(ParamPatterns::new);

struct ParamPatterns {
    /// Leading structure: prefix, integer tag, first quoted string.
    question_text: Regex,
    /// Same anchor, second quoted string.
    description: Regex,
    /// `[[<int>,[<option-list>]]]` — numeric tag plus nested list.
    options_block: Regex,
    /// First quoted substring of one option segment.
    quoted_label: Regex,
}

impl ParamPatterns {
    fn new() -> Self {
        // All patterns are compile-time constants; expect() failing means the
        // pattern itself is wrong.
        Self {
            question_text: Regex::new(r#"^%\.@\.\[\d+,"([^"]+)""#)
                .expect("static regex must compile"),
            description: Regex::new(r#"^%\.@\.\[\d+,"[^"]+","([^"]+)""#)
                .expect("static regex must compile"),
            options_block: Regex::new(r#"\[\[\d+,\[(.*?)\]\]\]"#)
                .expect("static regex must compile"),
            quoted_label: Regex::new(r#""([^"]+)""#).expect("static regex must compile"),
        }
    }
}

/// Parses a batch of raw items into questions.
///
/// One-to-one, order-preserving: the output is always exactly as long as
/// the input, so callers can keep relying on index alignment between the
/// two lists. A malformed item produces a default [`Question`] (everything
/// empty) and a logged warning; it never affects its siblings.
///
/// The returned questions always have `is_multi_select == false`; copying
/// the checkbox signal from each paired [`RawItem`] is the caller's move.
///
/// # Examples
///
/// ```
/// use formkey_core::RawItem;
/// use formkey_pipeline::parser::parse_raw_items;
///
/// let items = vec![
///     RawItem::new(r#"%.@.[0,"What is 2+2?","Pick one",[[1,[[0,"3"],[1,"4"]]]]]"#),
///     RawItem::new("garbage"),
/// ];
/// let questions = parse_raw_items(&items);
///
/// assert_eq!(questions.len(), 2);
/// assert_eq!(questions[0].text, "What is 2+2?");
/// assert_eq!(questions[0].description, "Pick one");
/// assert_eq!(questions[0].options, vec!["3", "4"]);
/// assert!(questions[1].text.is_empty());
/// ```
pub fn parse_raw_items(items: &[RawItem]) -> Vec<Question> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let question = parse_raw_item(item);
            if question.text.is_empty() {
                warn!(
                    index,
                    params_len = item.serialized_params.len(),
                    "no question text recovered from serialized params"
                );
            }
            question
        })
        .collect()
}

/// Parses a single raw item. Infallible: unmatched anchors leave their
/// fields at the default.
pub fn parse_raw_item(item: &RawItem) -> Question {
    let decoded = entity::decode(&item.serialized_params);

    let mut question = Question {
        image_url: item.image_url.clone(),
        ..Default::default()
    };

    if let Some(caps) = PATTERNS.question_text.captures(&decoded) {
        question.text = caps[1].to_string();
    }

    if let Some(caps) = PATTERNS.description.captures(&decoded) {
        question.description = caps[1].to_string();
    }

    if let Some(caps) = PATTERNS.options_block.captures(&decoded) {
        question.options = split_option_labels(&caps[1]);
        debug!(
            options = question.options.len(),
            "extracted option labels from bracketed block"
        );
    }

    question
}

/// Splits the inner option list on its `],[` segment boundaries and pulls
/// the first quoted substring out of each segment. Segments with no quoted
/// substring are dropped rather than kept as placeholders.
fn split_option_labels(inner: &str) -> Vec<String> {
    inner
        .split("],[")
        .filter_map(|segment| {
            PATTERNS
                .quoted_label
                .captures(segment)
                .map(|caps| caps[1].to_string())
        })
        .collect()
}
