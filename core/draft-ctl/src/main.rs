//! draft-ctl: inspect and manage saved editor drafts.
//!
//! ```bash
//! draft-ctl list
//! draft-ctl show /challenges/hello-world
//! draft-ctl check /challenges/hello-world --starter starter.py
//! draft-ctl save /challenges/hello-world --file solution.py
//! draft-ctl clear /challenges/hello-world
//! draft-ctl prompts enable
//! ```

mod commands;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use draft_core::StorageConfig;

#[derive(Parser, Debug)]
#[command(name = "draft-ctl", version, about = "Manage saved editor drafts")]
struct Cli {
    /// Data directory (defaults to ~/.pyquest)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List saved drafts
    List,
    /// Print the saved draft for a route
    Show { route: String },
    /// Report what a page load would decide for a route and starter file
    Check {
        route: String,
        #[arg(long)]
        starter: PathBuf,
    },
    /// Save a file's contents as the draft for a route
    Save {
        route: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete the saved draft for a route
    Clear { route: String },
    /// Inspect or change the resume prompt preference
    Prompts {
        #[command(subcommand)]
        action: commands::PromptsAction,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let storage = cli
        .data_dir
        .clone()
        .map(StorageConfig::new)
        .unwrap_or_default();

    let _log_guard = logging::init(&storage.log_dir());

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Command::List => commands::list(&storage, &mut stdout),
        Command::Show { route } => commands::show(&storage, &route, &mut stdout),
        Command::Check { route, starter } => {
            commands::check(&storage, &route, &starter, &mut stdout)
        }
        Command::Save { route, file } => commands::save(&storage, &route, &file, &mut stdout),
        Command::Clear { route } => commands::clear(&storage, &route, &mut stdout),
        Command::Prompts { action } => commands::prompts(&storage, action, &mut stdout),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("draft-ctl: {}", e);
            ExitCode::FAILURE
        }
    }
}
