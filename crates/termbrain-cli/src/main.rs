use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use termbrain_core::{models, HfClient, SessionEngine, Settings};

mod app;
mod commands;

#[derive(Parser)]
#[command(name = "termbrain")]
#[command(about = "Termbrain - streaming AI terminal with persistent context")]
#[command(version)]
struct Cli {
    /// Run a single prompt and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Model to use (menu index, id, or label)
    #[arg(short, long)]
    model: Option<String>,

    /// Workspace directory (uploads, generated files, session state)
    #[arg(long)]
    workspace: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load();
    if let Some(workspace) = cli.workspace {
        settings.workspace_dir = workspace;
        // The override becomes the default for later runs.
        if let Err(e) = settings.save() {
            eprintln!("Warning: could not persist settings: {e}");
        }
    }
    settings.ensure_dirs()?;

    // The only fatal-at-startup path: no credential and none provided.
    let token = match settings.load_token() {
        Some(token) => token,
        None => app::first_run_token(&settings)?,
    };

    let catalog = models::default_catalog();
    let model = match cli.model {
        Some(ref choice) => models::select(&catalog, choice)
            .cloned()
            .context("model catalog is empty")?,
        None if cli.prompt.is_some() => catalog[0].clone(),
        None => app::pick_model(&catalog, &settings)?,
    };

    let client = Box::new(HfClient::new(token.clone()));
    let engine = SessionEngine::new(client, settings, model)?;

    if let Some(prompt) = cli.prompt {
        app::run_single_prompt(engine, &prompt).await
    } else {
        app::run_repl(engine, catalog, token).await
    }
}
