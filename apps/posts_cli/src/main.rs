use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    Collaborators, ControllerOptions, HttpPostRepository, MemoryPostRepository, PostRepository,
    TableController,
};
use shared::domain::Post;
use tracing_subscriber::EnvFilter;

mod config;
mod console;
mod dialogs;
mod notifier;
mod render;
mod shell;

use crate::{
    console::Console,
    dialogs::{TerminalConfirmation, TerminalPostForm},
    notifier::TerminalNotifier,
    shell::Shell,
};

#[derive(Parser, Debug)]
#[command(about = "Browse and edit a remote collection of posts")]
struct Args {
    /// Settings file; defaults to ./posts.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    page_size: Option<usize>,
    /// Work against an in-memory collection instead of the server.
    #[arg(long)]
    offline: bool,
    /// JSON array of posts to start the offline collection with.
    #[arg(long, requires = "offline")]
    seed: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Print the first page and exit.
    List,
    /// Interactive session (default).
    Shell,
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_seed(path: &PathBuf) -> Result<Vec<Post>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("seed file '{}' is not a JSON array of posts", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url.clone() {
        settings.server_url = server_url;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    settings.offline |= args.offline;
    settings.validate()?;

    init_tracing(&settings.log_filter);

    let repository: Arc<dyn PostRepository> = if settings.offline {
        let seed = match &args.seed {
            Some(path) => load_seed(path)?,
            None => Vec::new(),
        };
        tracing::info!(posts = seed.len(), "using in-memory post collection");
        Arc::new(MemoryPostRepository::with_posts(seed))
    } else {
        let repository = HttpPostRepository::new(&settings.server_url)
            .with_context(|| format!("cannot use server url '{}'", settings.server_url))?;
        tracing::info!(server_url = repository.server_url(), "using remote post collection");
        Arc::new(repository)
    };

    let console = Arc::new(Console::stdio());
    let notifier = Arc::new(TerminalNotifier::new(Arc::clone(&console)));
    let controller = TableController::new(
        Collaborators {
            repository,
            forms: Arc::new(TerminalPostForm::new(Arc::clone(&console))),
            confirmations: Arc::new(TerminalConfirmation::new(Arc::clone(&console))),
            notifications: notifier.clone(),
        },
        ControllerOptions {
            paginator: settings.paginator()?,
            notification_duration: settings.notification_duration(),
        },
    );
    let mut shell = Shell::new(controller, console, notifier);

    match args.command.unwrap_or(Command::Shell) {
        Command::List => {
            if let Err(err) = shell.print_once().await {
                tracing::error!(error = %err, "could not list posts");
                return Err(err.into());
            }
        }
        Command::Shell => shell.run().await,
    }

    Ok(())
}
