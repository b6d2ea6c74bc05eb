use super::context::RequestContext;
use super::routing::{
    route_after_classify, route_after_fallback_check, route_after_vector_retrieval,
    ClassifyRoute, FallbackRoute, RetrievalRoute,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named nodes of the answering workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Classify,
    HandleCasual,
    RetrieveKnowledge,
    CheckParallel,
    RetrieveWeb,
    ResolveHybrid,
    ResolveWithFallbackCheck,
    WebFallback,
    Escalate,
}

impl Stage {
    pub const ENTRY: Stage = Stage::Classify;

    pub const ALL: [Stage; 9] = [
        Stage::Classify,
        Stage::HandleCasual,
        Stage::RetrieveKnowledge,
        Stage::CheckParallel,
        Stage::RetrieveWeb,
        Stage::ResolveHybrid,
        Stage::ResolveWithFallbackCheck,
        Stage::WebFallback,
        Stage::Escalate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Classify => "classify",
            Stage::HandleCasual => "handle_casual",
            Stage::RetrieveKnowledge => "retrieve_knowledge",
            Stage::CheckParallel => "check_parallel",
            Stage::RetrieveWeb => "retrieve_web",
            Stage::ResolveHybrid => "resolve_hybrid",
            Stage::ResolveWithFallbackCheck => "resolve_with_fallback_check",
            Stage::WebFallback => "web_fallback",
            Stage::Escalate => "escalate",
        }
    }

    /// Edge selection after this stage has run. `None` means END.
    pub fn next(&self, ctx: &RequestContext) -> Option<Stage> {
        match self {
            Stage::Classify => match route_after_classify(ctx) {
                ClassifyRoute::Casual => Some(Stage::HandleCasual),
                ClassifyRoute::ParallelRetrieve | ClassifyRoute::VectorOnly => {
                    Some(Stage::RetrieveKnowledge)
                }
            },
            Stage::RetrieveKnowledge => Some(Stage::CheckParallel),
            Stage::CheckParallel => match route_after_vector_retrieval(ctx) {
                RetrievalRoute::DoWebSearch => Some(Stage::RetrieveWeb),
                RetrievalRoute::VectorOnlyResolve => Some(Stage::ResolveWithFallbackCheck),
            },
            Stage::RetrieveWeb => Some(Stage::ResolveHybrid),
            Stage::ResolveHybrid => Some(Stage::Escalate),
            Stage::ResolveWithFallbackCheck => match route_after_fallback_check(ctx) {
                FallbackRoute::WebFallback => Some(Stage::WebFallback),
                FallbackRoute::Escalate => Some(Stage::Escalate),
            },
            Stage::WebFallback => Some(Stage::Escalate),
            Stage::HandleCasual | Stage::Escalate => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::HandleCasual | Stage::Escalate)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pure: Walk the graph from the entry stage with fixed routing inputs
///
/// Stage bodies are not run; the flags are held constant. Useful for dry
/// runs and for checking that every path terminates.
pub fn plan_path(ctx: &RequestContext) -> Vec<Stage> {
    let mut path = vec![Stage::ENTRY];
    let mut current = Stage::ENTRY;
    while let Some(next) = current.next(ctx) {
        path.push(next);
        current = next;
        if path.len() > Stage::ALL.len() {
            break;
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classify::{Classification, Intent};

    fn ctx(is_casual: bool, needs_web: bool, low_confidence: bool) -> RequestContext {
        RequestContext::new("q")
            .classified(Classification::new(Intent::General, is_casual, needs_web))
            .with_low_confidence(low_confidence)
    }

    #[test]
    fn test_casual_path() {
        assert_eq!(
            plan_path(&ctx(true, false, false)),
            vec![Stage::Classify, Stage::HandleCasual]
        );
    }

    #[test]
    fn test_hybrid_path() {
        assert_eq!(
            plan_path(&ctx(false, true, true)),
            vec![
                Stage::Classify,
                Stage::RetrieveKnowledge,
                Stage::CheckParallel,
                Stage::RetrieveWeb,
                Stage::ResolveHybrid,
                Stage::Escalate,
            ]
        );
    }

    #[test]
    fn test_vector_only_paths() {
        assert_eq!(
            plan_path(&ctx(false, false, false)),
            vec![
                Stage::Classify,
                Stage::RetrieveKnowledge,
                Stage::CheckParallel,
                Stage::ResolveWithFallbackCheck,
                Stage::Escalate,
            ]
        );
        assert_eq!(
            plan_path(&ctx(false, false, true)),
            vec![
                Stage::Classify,
                Stage::RetrieveKnowledge,
                Stage::CheckParallel,
                Stage::ResolveWithFallbackCheck,
                Stage::WebFallback,
                Stage::Escalate,
            ]
        );
    }

    #[test]
    fn test_every_path_ends_at_a_terminal_stage() {
        for is_casual in [false, true] {
            for needs_web in [false, true] {
                for low in [false, true] {
                    let path = plan_path(&ctx(is_casual, needs_web, low));
                    let last = path.last().unwrap();
                    assert!(last.is_terminal(), "path {path:?} did not terminate");
                    assert!(path.len() <= 6);
                }
            }
        }
    }

    #[test]
    fn test_stage_names_are_unique() {
        let mut names: Vec<_> = Stage::ALL.iter().map(|s| s.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Stage::ALL.len());
    }
}
