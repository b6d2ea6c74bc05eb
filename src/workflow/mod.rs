//! Answering workflow
//!
//! A fixed, acyclic graph of stages threads one [`RequestContext`] per query:
//!
//! ```text
//! classify ─┬─ casual ──────────────► handle_casual ─► END
//!           └─ otherwise ──► retrieve_knowledge ─► check_parallel
//! check_parallel ─┬─ needs web ─► retrieve_web ─► resolve_hybrid ─► escalate
//!                 └─ otherwise ─► resolve_with_fallback_check
//! resolve_with_fallback_check ─┬─ low confidence ─► web_fallback ─► escalate
//!                              └─ otherwise ──────────────────────► escalate
//! escalate ─► END
//! ```
//!
//! Stages run strictly one after another.

pub mod context;
pub mod engine;
pub mod response;
pub mod routing;
pub mod stage;
mod stages;

pub use context::RequestContext;
pub use engine::{Engine, EngineBuilder, EngineSettings};
pub use response::DeskResponse;
pub use routing::{ClassifyRoute, FallbackRoute, RetrievalRoute};
pub use stage::{plan_path, Stage};
