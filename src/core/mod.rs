//! Core business logic module with pure functions
//!
//! Following the "functional core, imperative shell" pattern, nothing in here
//! performs network or file I/O. Classification rules, evidence formatting,
//! prompt assembly and the escalation gate are all plain functions over
//! their inputs, so they can be tested without adapters or mocks.

pub mod classify;
pub mod escalation;
pub mod evidence;
pub mod prompts;

pub use classify::{
    classify_by_keywords, select_label, Classification, Intent, IntentLabel, KeywordRules,
    LabelScore,
};
pub use escalation::{should_escalate, ESCALATION_SENTINEL, NO_INFORMATION_ANSWER};
pub use evidence::{
    contains_uncertainty, format_web_results, has_sufficient_context, join_snippets,
    DocumentSnippet, WebResult,
};
