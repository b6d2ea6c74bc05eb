//! Application wiring
//!
//! Logging setup and the composition root that turns a [`DeskConfig`]
//! into a ready [`Engine`](crate::workflow::Engine).
//!
//! [`DeskConfig`]: crate::config::DeskConfig

pub mod bootstrap;
pub mod logging;

pub use bootstrap::{
    build_adapters, build_classifier, build_engine, build_engine_with, build_retriever, Adapters,
};
pub use logging::{init_logging, log_filter};
