//! Reelsmith - unattended short-video production pipeline.
//!
//! Main entry point for the Reelsmith CLI.

use std::net::SocketAddr;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use reelsmith_pipeline::{Conductor, collect_run};
use reelsmith_server::{Server, ServerConfig, production_stages};

/// Reelsmith - unattended short-video production pipeline
#[derive(Parser)]
#[command(name = "reelsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP trigger server
    Serve {
        /// Address to bind to (overrides REELSMITH_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// Execute one run from environment defaults and print the report
    Run,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "reelsmith=debug,reelsmith_pipeline=debug,reelsmith_server=debug,\
         reelsmith_script=debug,reelsmith_voice=debug,reelsmith_footage=debug,\
         reelsmith_media=debug,reelsmith_publish=debug,reelsmith_webhook=debug,info"
    } else {
        "reelsmith=info,reelsmith_pipeline=info,reelsmith_server=info,warn"
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Serve { bind } => serve(bind).await,
        Commands::Run => run_once().await,
    }
}

async fn serve(bind: Option<SocketAddr>) -> Result<()> {
    let mut config = ServerConfig::from_env();
    if let Some(addr) = bind {
        config = config.with_bind_address(addr);
    }

    let stages = production_stages().context("failed to assemble pipeline stages")?;
    Server::new(stages, config)
        .run()
        .await
        .context("server exited with error")?;
    Ok(())
}

async fn run_once() -> Result<()> {
    let config = reelsmith_config::from_env().context("failed to read run configuration")?;
    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("invalid configuration: {}", error);
        }
        anyhow::bail!("run configuration failed validation");
    }

    let stages = production_stages().context("failed to assemble pipeline stages")?;
    let conductor = Conductor::new(stages, config);
    let run_id = conductor.run_id();

    let report = collect_run(run_id, conductor.into_stream()).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.ok {
        std::process::exit(1);
    }
    Ok(())
}
