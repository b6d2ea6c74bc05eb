//! Command routing and execution

use crate::app::{build_classifier, build_engine};
use crate::cli::args::Commands;
use crate::cli::render::{
    render_classification, render_response, render_stages, GENERATION_FAILED_MESSAGE,
};
use crate::config::DeskConfig;
use crate::workflow::Engine;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::error;

const EXIT_WORDS: &[&str] = &["exit", "quit"];

/// Execute a CLI command against an already loaded configuration
pub async fn execute_command(command: Commands, config: &DeskConfig, verbose: u8) -> Result<()> {
    match command {
        Commands::Ask { query, json } => run_ask(&query, json, config, verbose).await,
        Commands::Chat => run_chat(config, verbose).await,
        Commands::Classify { query } => run_classify(&query, config).await,
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

async fn run_ask(query: &str, json: bool, config: &DeskConfig, verbose: u8) -> Result<()> {
    let engine = build_engine(config).context("Failed to set up the answering engine")?;

    let response = engine
        .invoke(query)
        .await
        .context(GENERATION_FAILED_MESSAGE)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        if verbose >= 1 {
            eprintln!("{}", render_stages(&response));
        }
        println!("{}", render_response(&response));
    }
    Ok(())
}

async fn run_chat(config: &DeskConfig, verbose: u8) -> Result<()> {
    let engine = build_engine(config).context("Failed to set up the answering engine")?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&query.to_lowercase().as_str()) {
            break;
        }

        let reply = answer_line(&engine, query, verbose).await;
        stdout.write_all(reply.as_bytes()).await?;
        stdout.write_all(b"\n\n").await?;
    }

    Ok(())
}

/// One chat turn. A failed turn is reported and the loop keeps going.
async fn answer_line(engine: &Engine, query: &str, verbose: u8) -> String {
    match engine.invoke(query).await {
        Ok(response) => {
            if verbose >= 1 {
                eprintln!("{}", render_stages(&response));
            }
            render_response(&response)
        }
        Err(e) => {
            error!("Answer generation failed: {}", e);
            GENERATION_FAILED_MESSAGE.to_string()
        }
    }
}

async fn run_classify(query: &str, config: &DeskConfig) -> Result<()> {
    let classifier = build_classifier(config)?;
    let outcome = classifier.classify(query).await;
    println!("{}", render_classification(&outcome));
    Ok(())
}
