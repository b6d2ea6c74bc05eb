//! Command-line front end
//!
//! Argument parsing, command routing and plain-text rendering. The engine
//! knows nothing about any of this.

pub mod args;
pub mod render;
pub mod router;

pub use args::{Cli, Commands};
pub use render::{
    render_classification, render_response, render_stages, ESCALATION_MESSAGE,
    GENERATION_FAILED_MESSAGE,
};
pub use router::execute_command;
