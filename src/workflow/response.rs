use super::context::RequestContext;
use super::stage::Stage;
use crate::core::classify::Intent;
use crate::core::escalation::ESCALATION_SENTINEL;
use crate::core::evidence::{DocumentSnippet, WebResult};
use serde::Serialize;
use std::time::Duration;

/// What a caller gets back from one invocation.
///
/// `answer` is always set. Callers detect a hand-off to a human by checking
/// [`DeskResponse::is_escalation`], and show `web_results` as citations only
/// when the list is non-empty.
#[derive(Debug, Clone, Serialize)]
pub struct DeskResponse {
    pub answer: String,
    pub escalated: bool,
    pub intent: Intent,
    pub is_casual: bool,
    pub needs_web_search: bool,
    pub low_confidence: bool,
    pub web_results: Vec<WebResult>,
    pub knowledge_docs: Vec<DocumentSnippet>,
    /// Stages in the order they ran.
    pub stages: Vec<Stage>,
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
}

impl DeskResponse {
    pub(crate) fn from_context(ctx: RequestContext, stages: Vec<Stage>, elapsed: Duration) -> Self {
        let (classification, knowledge_docs, web_results, low_confidence, answer) =
            ctx.into_parts();

        let answer = answer.unwrap_or_else(|| ESCALATION_SENTINEL.to_string());

        Self {
            escalated: answer == ESCALATION_SENTINEL,
            answer,
            intent: classification.map_or(Intent::General, |c| c.intent),
            is_casual: classification.is_some_and(|c| c.is_casual),
            needs_web_search: classification.is_some_and(|c| c.needs_web_search),
            low_confidence,
            web_results,
            knowledge_docs,
            stages,
            elapsed,
        }
    }

    pub fn is_escalation(&self) -> bool {
        self.answer == ESCALATION_SENTINEL
    }

    pub fn has_citations(&self) -> bool {
        !self.web_results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classify::Classification;

    #[test]
    fn test_unset_answer_becomes_sentinel() {
        let ctx = RequestContext::new("q").classified(Classification::general());
        let response = DeskResponse::from_context(ctx, vec![Stage::Classify], Duration::ZERO);

        assert!(response.is_escalation());
        assert!(response.escalated);
        assert_eq!(response.intent, Intent::General);
    }

    #[test]
    fn test_answer_and_flags_carried_over() {
        let ctx = RequestContext::new("hi")
            .classified(Classification::casual())
            .with_answer("Hello there!");
        let response = DeskResponse::from_context(
            ctx,
            vec![Stage::Classify, Stage::HandleCasual],
            Duration::from_millis(5),
        );

        assert_eq!(response.answer, "Hello there!");
        assert!(!response.is_escalation());
        assert!(response.is_casual);
        assert!(!response.has_citations());
        assert_eq!(response.stages.len(), 2);
    }

    #[test]
    fn test_serializes_elapsed_as_humantime() {
        let ctx = RequestContext::new("q").with_answer("x");
        let response = DeskResponse::from_context(ctx, vec![], Duration::from_millis(1500));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["elapsed"], "1s 500ms");
        assert_eq!(json["intent"], "general");
    }
}
