//! Plain-text rendering of engine output

use crate::classifier::ClassifierOutcome;
use crate::workflow::DeskResponse;
use std::fmt::Write;

/// Shown instead of the escalation sentinel.
pub const ESCALATION_MESSAGE: &str = "Unable to find exact answer. Please contact school admin.";

/// Shown when answer generation fails outright.
pub const GENERATION_FAILED_MESSAGE: &str = "An error occurred while generating the answer.";

/// Pure: Answer text followed by sources, when there are any
pub fn render_response(response: &DeskResponse) -> String {
    if response.is_escalation() {
        return ESCALATION_MESSAGE.to_string();
    }

    let mut out = response.answer.clone();
    if response.has_citations() {
        out.push_str("\n\nSources:");
        for result in &response.web_results {
            let title = if result.title.trim().is_empty() {
                "No title"
            } else {
                result.title.as_str()
            };
            let _ = write!(out, "\n- {}: {}", title, result.url);
        }
    }
    out
}

/// Pure: Classification triple and the path that produced it
pub fn render_classification(outcome: &ClassifierOutcome) -> String {
    let c = outcome.classification;
    let mut out = format!(
        "intent: {}\nis_casual: {}\nneeds_web_search: {}\nsource: {}",
        c.intent, c.is_casual, c.needs_web_search, outcome.source
    );
    if let Some(reason) = &outcome.fallback_reason {
        let _ = write!(out, "\nfallback_reason: {}", reason);
    }
    out
}

/// Pure: Stage trace line printed with `-v`
pub fn render_stages(response: &DeskResponse) -> String {
    let names: Vec<&str> = response.stages.iter().map(|s| s.name()).collect();
    format!("stages: {}", names.join(" -> "))
}
