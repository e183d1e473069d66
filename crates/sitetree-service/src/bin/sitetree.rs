//! Sitetree Binary Entry Point

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use std::path::PathBuf;
use std::sync::Arc;

use sitetree_core::SiteConfig;
use sitetree_service::{
    spawn_coordinator, GlobalState, MarkdownRenderer, ServiceSettings, Site, CONFIG_FILE_NAME,
};

#[derive(Parser)]
#[command(name = "sitetree", about = "Map a folder of Markdown notes onto site routes")]
struct Cli {
    /// Config file (defaults to sitetree.yaml in the content root, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Content root, overriding the config file
    #[arg(long)]
    root: Option<PathBuf>,

    /// off, error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<LevelFilter>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every route with its source file as JSON
    Routes,
    /// Print the navigation tree as JSON
    Nav,
    /// Render one route to HTML
    Render { route: String },
}

fn load_config(cli: &Cli) -> anyhow::Result<SiteConfig> {
    let candidate = cli.config.clone().or_else(|| {
        let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("."));
        let path = root.join(CONFIG_FILE_NAME);
        path.is_file().then_some(path)
    });

    let mut config = match candidate {
        Some(path) => SiteConfig::load(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SiteConfig::default(),
    };

    if let Some(root) = &cli.root {
        config.content.root = root.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = ServiceSettings::default();

    env_logger::Builder::new()
        .filter_level(cli.log_level.unwrap_or(settings.log_level.to_filter()))
        .parse_default_env()
        .init();

    let config = load_config(&cli)?;
    info!("content root: {}", config.content.root.display());

    let state = GlobalState::new(config, settings);
    let mut handle = spawn_coordinator(state.clone());

    let status = handle.scan().await?;
    if let Some(err) = status.last_error {
        bail!(err);
    }

    let site = Site::new(state.clone(), Arc::new(MarkdownRenderer));
    let snapshot = state
        .current()
        .await
        .ok_or_else(|| anyhow!("no snapshot was published"))?;

    match cli.command {
        Command::Routes => {
            println!("{}", serde_json::to_string_pretty(snapshot.routes())?);
        }
        Command::Nav => {
            println!("{}", serde_json::to_string_pretty(snapshot.nav())?);
        }
        Command::Render { route } => {
            let page = site
                .render(&route)
                .await
                .ok_or_else(|| anyhow!("no document at {}", route))?;
            println!("{}", page.html);
        }
    }

    Ok(())
}
