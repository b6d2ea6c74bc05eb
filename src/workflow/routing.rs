//! Routing decisions at each branching junction
//!
//! Predicates are pure functions of the request context. Each junction has
//! its own closed set of outcomes so every branch must be wired explicitly.

use super::context::RequestContext;
use serde::Serialize;
use std::fmt;

/// Outcome of the junction after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifyRoute {
    Casual,
    /// Knowledge retrieval followed by web search. Executed sequentially.
    ParallelRetrieve,
    VectorOnly,
}

/// Outcome of the junction after knowledge retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalRoute {
    DoWebSearch,
    VectorOnlyResolve,
}

/// Outcome of the junction after the knowledge-only answer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackRoute {
    WebFallback,
    Escalate,
}

pub fn route_after_classify(ctx: &RequestContext) -> ClassifyRoute {
    if ctx.is_casual() {
        ClassifyRoute::Casual
    } else if ctx.needs_web_search() {
        ClassifyRoute::ParallelRetrieve
    } else {
        ClassifyRoute::VectorOnly
    }
}

pub fn route_after_vector_retrieval(ctx: &RequestContext) -> RetrievalRoute {
    if ctx.needs_web_search() {
        RetrievalRoute::DoWebSearch
    } else {
        RetrievalRoute::VectorOnlyResolve
    }
}

pub fn route_after_fallback_check(ctx: &RequestContext) -> FallbackRoute {
    if ctx.low_confidence() {
        FallbackRoute::WebFallback
    } else {
        FallbackRoute::Escalate
    }
}

impl fmt::Display for ClassifyRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyRoute::Casual => write!(f, "casual"),
            ClassifyRoute::ParallelRetrieve => write!(f, "parallel_retrieve"),
            ClassifyRoute::VectorOnly => write!(f, "vector_only"),
        }
    }
}

impl fmt::Display for RetrievalRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrievalRoute::DoWebSearch => write!(f, "do_web_search"),
            RetrievalRoute::VectorOnlyResolve => write!(f, "vector_only_resolve"),
        }
    }
}

impl fmt::Display for FallbackRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackRoute::WebFallback => write!(f, "web_fallback"),
            FallbackRoute::Escalate => write!(f, "escalate"),
        }
    }
}
