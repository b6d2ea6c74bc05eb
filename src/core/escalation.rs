//! Pure escalation gate applied at the end of every non-casual path

/// Answer value signalling that a human must take over.
pub const ESCALATION_SENTINEL: &str = "ESCALATE";

/// Canned reply when the web fallback also finds nothing.
pub const NO_INFORMATION_ANSWER: &str =
    "I couldn't find information about this. Please contact the university directly.";

/// Literal phrase that always escalates, independent of the configured uncertainty list.
pub const ESCALATION_PHRASE: &str = "i don't know";

/// Pure: Decide whether the final answer must be replaced by the sentinel
///
/// A missing answer is treated as the empty string, so it always escalates
/// unless `min_answer_length` is zero and confidence is high.
pub fn should_escalate(answer: Option<&str>, low_confidence: bool, min_answer_length: usize) -> bool {
    let lowered = answer.unwrap_or_default().to_lowercase();

    lowered.contains(ESCALATION_PHRASE)
        || lowered.chars().count() < min_answer_length
        || low_confidence
}
