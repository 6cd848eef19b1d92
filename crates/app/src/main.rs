//! Booth Console - market object-address registry
//!
//! A line-oriented console for visitors and operators: list and inspect
//! booths, claim an empty booth, review pending claims, and read the
//! dashboard figures. State lives only as long as the process.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use booth_core::{BoothRegistry, EventConfig};
use clap::Parser;
use directories::ProjectDirs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod command;
mod session;

use session::{Flow, Session};

/// Name of the event file looked up in the config directory
const EVENT_FILE: &str = "event.toml";

#[derive(Debug, Parser)]
#[command(name = "booth-console", version, about = "Market booth address registry console")]
struct Args {
    /// Event file (defaults to the config directory, then the built-in demo)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print records and statistics as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let registry = BoothRegistry::from_config(&config).context("Failed to seed booth registry")?;

    tracing::info!(
        prefix = %registry.prefix(),
        booths = registry.len(),
        "Starting booth console"
    );

    let mut session = Session::new(registry, args.json);
    run(&mut session)
}

/// Explicit path, then `<config dir>/event.toml`, then the demo event
fn load_config(path: Option<&Path>) -> Result<EventConfig> {
    if let Some(path) = path {
        return EventConfig::load_from_file(path)
            .with_context(|| format!("Failed to load event file {}", path.display()));
    }

    if let Some(path) = default_config_path().filter(|p| p.exists()) {
        tracing::info!(path = %path.display(), "Loading event file");
        return EventConfig::load_from_file(&path)
            .with_context(|| format!("Failed to load event file {}", path.display()));
    }

    tracing::info!("No event file found, using built-in demo event");
    EventConfig::demo().context("Built-in demo event is invalid")
}

fn default_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("dev", "onyx", "booth")?;
    Some(dirs.config_dir().join(EVENT_FILE))
}

fn run(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    if let Some(title) = session.registry().title() {
        writeln!(stdout, "{}", title)?;
    }
    writeln!(stdout, "Type 'help' for commands.")?;

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let command = match command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(stdout, "{:#}", e)?;
                continue;
            }
        };

        let today = session.registry().today();
        if session.execute(command, today, &mut stdout)? == Flow::Quit {
            break;
        }
    }

    Ok(())
}
