//! CLI for the chunkguard chunk-loading runtime.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use chunkguard_core::config;

use commands::{run_config, run_fallback, run_simulate};

/// Top-level CLI for chunkguard.
#[derive(Debug, Parser)]
#[command(name = "chunkguard")]
#[command(about = "chunkguard: resilient chunk loading with retries and CDN-origin fallback", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Page the runtime is simulated in.
#[derive(Debug, Args, Clone, PartialEq, Eq)]
pub struct PageArgs {
    /// Page location; its origin is what the fallback persists.
    #[arg(long, default_value = "https://app.example.com/")]
    pub origin: String,
    /// Stylesheet href present in the page (repeatable).
    #[arg(long = "css", value_name = "HREF")]
    pub css: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Load one chunk against a scripted host and report every request.
    Simulate {
        /// Chunk id (digits = numeric id, otherwise a name).
        chunk: String,

        /// Fail the first N attempts.
        #[arg(long, default_value = "0", value_name = "N")]
        fail: u32,

        /// Fail every attempt (overrides --fail).
        #[arg(long)]
        always_fail: bool,

        /// Retry budget; anything but a positive integer falls back to 1.
        #[arg(long, value_name = "N")]
        max_retries: Option<String>,

        /// Fixed delay before each retry, in milliseconds.
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,

        /// Static cache-bust token.
        #[arg(long, value_name = "TOKEN")]
        cache_bust: Option<String>,

        /// Compile-time name of the chunk, matched against the config allow-list.
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Run the origin-fallback heuristic once and persist its choice.
    Fallback {
        /// The page origin was already selected earlier in this page's life.
        #[arg(long)]
        local_host_loaded: bool,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show the config path and effective loader options.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Simulate {
                chunk,
                fail,
                always_fail,
                max_retries,
                delay_ms,
                cache_bust,
                name,
                page,
            } => {
                let fail = if always_fail { u32::MAX } else { fail };
                let overrides = commands::SimulateOverrides {
                    max_retries,
                    delay_ms,
                    cache_bust,
                };
                run_simulate(&cfg, &chunk, name.as_deref(), fail, overrides, &page).await?
            }
            CliCommand::Fallback {
                local_host_loaded,
                page,
            } => run_fallback(&cfg, local_host_loaded, &page)?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
