//! Answer reconciliation: matching service answers back onto option texts.
//!
//! The reconciler receives the parsed questions, the answer sheet keyed by
//! echoed question text, and a flat pool of candidate text nodes. It marks
//! each matched option by appending [`MARKER_SUFFIX`] to the node's text,
//! and can strip those marks again. Matching is text-only: question-to-
//! answer matching collapses whitespace on both sides, answer-to-node
//! matching compares trimmed text exactly.
//!
//! # Flat-pool hazard
//!
//! The candidate pool is global, not scoped per question. When two
//! questions offer an identically-worded option, the answer marks the first
//! occurrence in the pool — which can be the other question's node. This is
//! an inherited property of the flat-pool design, kept deliberately;
//! scoping nodes per question would change observable behavior.

use tracing::{debug, error, warn};

use formkey_core::{AnswerSheet, Question};

/// Suffix appended to a matched option's text.
pub const MARKER_SUFFIX: &str = " +";

/// A text-bearing UI node the reconciler can read and rewrite.
///
/// The reconciler never owns the nodes; it only reads and replaces their
/// text content. `String` implements the trait so plain text pools (tests,
/// captures) work directly.
pub trait CandidateNode {
    /// Current text content.
    fn text(&self) -> String;
    /// Replaces the text content.
    fn set_text(&mut self, text: String);
}

impl CandidateNode for String {
    fn text(&self) -> String {
        self.clone()
    }

    fn set_text(&mut self, text: String) {
        *self = text;
    }
}

impl<T: CandidateNode + ?Sized> CandidateNode for Box<T> {
    fn text(&self) -> String {
        (**self).text()
    }

    fn set_text(&mut self, text: String) {
        (**self).set_text(text)
    }
}

/// Applies an answer sheet to the candidate pool.
///
/// For each question, in order: find the first answer whose echoed question
/// text matches under whitespace collapsing, normalize its answer(s) to
/// trimmed strings, and for each one mark the first pool node whose trimmed
/// text equals it exactly. A node whose text already contains `+` is left
/// untouched, which makes re-application with the same arguments a visible
/// no-op. Unmatched questions and answers are logged and skipped; nothing
/// here aborts the batch.
///
/// Fails fast without touching any node when the sheet is empty or there
/// are no questions.
///
/// # Examples
///
/// ```
/// use formkey_core::{AnswerResult, AnswerSheet, Question};
/// use formkey_pipeline::reconcile::apply_answers;
///
/// let questions = vec![Question::with_text("What is 2+2?")];
/// let sheet = AnswerSheet::new(vec![AnswerResult::single("What is 2+2?", "4")]);
/// let mut nodes = vec!["3".to_string(), "4".to_string()];
///
/// apply_answers(&sheet, &questions, &mut nodes);
/// assert_eq!(nodes, vec!["3", "4 +"]);
/// ```
pub fn apply_answers<N: CandidateNode>(
    sheet: &AnswerSheet,
    questions: &[Question],
    nodes: &mut [N],
) {
    if sheet.is_empty() || questions.is_empty() {
        error!(
            answers = sheet.result.len(),
            questions = questions.len(),
            "invalid reconciliation input; nothing applied"
        );
        return;
    }

    for (index, question) in questions.iter().enumerate() {
        let Some(result) = sheet.find_for_question(&question.text) else {
            warn!(index, "no answer found for question");
            continue;
        };

        for answer in result.answer.to_trimmed_list() {
            mark_first_match(&answer, nodes);
        }
    }

    debug!("answer reconciliation completed");
}

/// Marks the first node whose trimmed text equals `answer`. First match
/// wins; duplicate-text nodes elsewhere in the pool stay unmarked.
fn mark_first_match<N: CandidateNode>(answer: &str, nodes: &mut [N]) {
    let Some(node) = nodes.iter_mut().find(|node| node.text().trim() == answer) else {
        warn!(answer, "no candidate node matched answer text");
        return;
    };

    let current = node.text();
    if current.contains('+') {
        debug!(answer, "candidate already marked; leaving untouched");
        return;
    }

    node.set_text(format!("{current}{MARKER_SUFFIX}"));
    debug!(answer, "marked correct answer");
}

/// Strips the marker suffix from every node.
///
/// Removes a trailing `" +"` (the `+` and the single space before it, at
/// the end of the text only) and trims the remainder. Safe on nodes that
/// were never marked.
///
/// # Examples
///
/// ```
/// use formkey_pipeline::reconcile::clear_marks;
///
/// let mut nodes = vec!["4 +".to_string(), "3".to_string()];
/// clear_marks(&mut nodes);
/// assert_eq!(nodes, vec!["4", "3"]);
/// ```
pub fn clear_marks<N: CandidateNode>(nodes: &mut [N]) {
    for node in nodes.iter_mut() {
        let current = node.text();
        let stripped = current.strip_suffix(MARKER_SUFFIX).unwrap_or(&current);
        node.set_text(stripped.trim().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formkey_core::AnswerResult;

    fn sheet_one(question: &str, answer: &str) -> AnswerSheet {
        AnswerSheet::new(vec![AnswerResult::single(question, answer)])
    }

    #[test]
    fn test_marks_matching_node_and_leaves_rest() {
        let questions = vec![Question::with_text("What is 2+2?")];
        let sheet = sheet_one("What is 2+2?", "4");
        let mut nodes = vec!["3".to_string(), "4".to_string()];

        apply_answers(&sheet, &questions, &mut nodes);
        assert_eq!(nodes, vec!["3", "4 +"]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let questions = vec![Question::with_text("Q")];
        let sheet = sheet_one("Q", "yes");
        let mut nodes = vec!["yes".to_string(), "no".to_string()];

        apply_answers(&sheet, &questions, &mut nodes);
        let after_first = nodes.clone();
        apply_answers(&sheet, &questions, &mut nodes);
        assert_eq!(nodes, after_first);
    }

    #[test]
    fn test_apply_clear_apply_round_trips() {
        let questions = vec![Question::with_text("Q")];
        let sheet = sheet_one("Q", "b");
        let mut nodes = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        apply_answers(&sheet, &questions, &mut nodes);
        let marked = nodes.clone();
        assert_eq!(marked, vec!["a", "b +", "c"]);

        clear_marks(&mut nodes);
        assert_eq!(nodes, vec!["a", "b", "c"]);

        apply_answers(&sheet, &questions, &mut nodes);
        assert_eq!(nodes, marked);
    }

    #[test]
    fn test_clear_on_clean_nodes_is_noop() {
        let mut nodes = vec!["a".to_string(), "b".to_string()];
        clear_marks(&mut nodes);
        assert_eq!(nodes, vec!["a", "b"]);
    }

    #[test]
    fn test_clear_only_strips_trailing_marker() {
        // A '+' inside the label is content, not a marker.
        let mut nodes = vec!["2+2".to_string(), "x + y".to_string(), "done +".to_string()];
        clear_marks(&mut nodes);
        assert_eq!(nodes, vec!["2+2", "x + y", "done"]);
    }

    #[test]
    fn test_empty_sheet_applies_nothing() {
        let questions = vec![Question::with_text("Q")];
        let mut nodes = vec!["a".to_string()];
        apply_answers(&AnswerSheet::default(), &questions, &mut nodes);
        assert_eq!(nodes, vec!["a"]);
    }

    #[test]
    fn test_empty_questions_applies_nothing() {
        let sheet = sheet_one("Q", "a");
        let mut nodes = vec!["a".to_string()];
        apply_answers(&sheet, &[], &mut nodes);
        assert_eq!(nodes, vec!["a"]);
    }

    #[test]
    fn test_unmatched_question_skipped_batch_continues() {
        let questions = vec![
            Question::with_text("Unanswered"),
            Question::with_text("Answered"),
        ];
        let sheet = sheet_one("Answered", "pick me");
        let mut nodes = vec!["pick me".to_string()];

        apply_answers(&sheet, &questions, &mut nodes);
        assert_eq!(nodes, vec!["pick me +"]);
    }

    #[test]
    fn test_question_matching_collapses_whitespace() {
        let questions = vec![Question::with_text("  What\n  is   2+2? ")];
        let sheet = sheet_one("What is 2+2?", "4");
        let mut nodes = vec!["4".to_string()];

        apply_answers(&sheet, &questions, &mut nodes);
        assert_eq!(nodes, vec!["4 +"]);
    }

    #[test]
    fn test_node_matching_trims_but_does_not_collapse() {
        let questions = vec![Question::with_text("Q")];
        let sheet = sheet_one("Q", "two words");
        // Inner whitespace differs: trim-equality must not match this node.
        let mut nodes = vec!["two  words".to_string()];

        apply_answers(&sheet, &questions, &mut nodes);
        assert_eq!(nodes, vec!["two  words"]);
    }

    #[test]
    fn test_multi_answer_marks_each_choice() {
        let questions = vec![Question::with_text("Pick all")];
        let sheet = AnswerSheet::new(vec![AnswerResult::multiple("Pick all", &["a", " c "])]);
        let mut nodes = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        apply_answers(&sheet, &questions, &mut nodes);
        assert_eq!(nodes, vec!["a +", "b", "c +"]);
    }

    #[test]
    fn test_label_containing_plus_is_never_marked() {
        // Inherited guard semantics: the '+' containment check also catches
        // labels that legitimately contain '+'.
        let questions = vec![Question::with_text("Q")];
        let sheet = sheet_one("Q", "2+2");
        let mut nodes = vec!["2+2".to_string()];

        apply_answers(&sheet, &questions, &mut nodes);
        assert_eq!(nodes, vec!["2+2"]);
    }

    #[test]
    fn test_flat_pool_marks_first_occurrence_across_questions() {
        // Two questions share an option label; the pool-wide scan marks the
        // first occurrence regardless of which question it belongs to.
        let questions = vec![Question::with_text("Q2")];
        let sheet = sheet_one("Q2", "Both");
        let mut nodes = vec![
            "Both".to_string(), // visually belongs to Q1
            "Only".to_string(),
            "Both".to_string(), // visually belongs to Q2
        ];

        apply_answers(&sheet, &questions, &mut nodes);
        assert_eq!(nodes, vec!["Both +", "Only", "Both"]);
    }

    #[test]
    fn test_boxed_nodes_work_through_the_trait() {
        let questions = vec![Question::with_text("Q")];
        let sheet = sheet_one("Q", "a");
        let mut nodes: Vec<Box<String>> = vec![Box::new("a".to_string())];

        apply_answers(&sheet, &questions, &mut nodes);
        assert_eq!(*nodes[0], "a +");
    }
}
