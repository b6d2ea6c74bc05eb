//! CLI argument structures

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Answer university support questions from the knowledge base and the web
#[derive(Parser)]
#[command(name = "unidesk")]
#[command(about = "unidesk - University support desk query routing", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer a single question
    Ask {
        /// The question to answer
        query: String,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Answer questions read line by line from stdin
    Chat,
    /// Show how a query would be classified
    Classify {
        /// The query to classify
        query: String,
    },
    /// Print the effective configuration (credentials omitted)
    Config,
}
