//! # unidesk
//!
//! Query routing engine for a university support desk. Each question is
//! classified, answered from a pre-indexed knowledge store and/or a
//! domain-restricted web search, and escalated to a human when the answer
//! cannot be trusted.
//!
//! ## Usage
//!
//! ```bash
//! unidesk ask "When is the scholarship deadline?"
//! unidesk classify "hi"
//! ```
//!
//! ## Modules
//!
//! - `abstractions` - Trait seams for the classifier, retriever, web search and LLM, with mocks
//! - `app` - Logging setup and the composition root
//! - `classifier` - Remote zero-shot classification with keyword fallback
//! - `cli` - Command-line argument parsing and rendering
//! - `config` - Layered configuration (defaults, TOML, environment)
//! - `core` - Pure decision functions: keyword rules, prompts, evidence, escalation
//! - `workflow` - Request context, stage graph and the engine entry point

pub mod abstractions;
pub mod app;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod workflow;

pub use error::{ClassifierError, Error, Result};
pub use workflow::{DeskResponse, Engine};
