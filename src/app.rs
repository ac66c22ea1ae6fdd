//! Command-line parsing and command routing.

use crate::commands;
use crate::config;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

/// A terminal voice-memo recorder
#[derive(Parser)]
#[command(name = "taper")]
#[command(version)]
#[command(about = "Record, list and play back voice memos in the terminal")]
#[command(long_about = "Record, list and play back voice memos in the terminal.\n\n\
    Recordings are written to the cache directory and listed newest first for\n\
    the rest of the session. The list is not kept between runs.\n\n\
    KEYS:\n    r record, s stop, ↑↓ select, ↵ play, q quit\n\n\
    Sending SIGUSR1 to a running recorder stops the current recording, which\n\
    lets a global hotkey drive it:\n    $ pkill -USR1 taper")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/taper/taper.toml\n    Logs:               ~/.local/state/taper/taper.log.*"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the recorder screen (default)
    #[command(visible_alias = "r")]
    Record,

    /// List audio input devices usable as `audio.device`
    #[command(name = "list-devices")]
    ListDevices,

    /// Show the last 50 lines of the newest log file
    Logs,

    /// Open the configuration file in your editor
    Config,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   taper completions bash > taper.bash
    ///   taper completions zsh > _taper
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the application for the parsed command line.
///
/// # Errors
/// - If logging initialization fails
/// - If the selected command fails
pub fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // These print to the terminal and need neither logging nor config.
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "taper", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => return commands::handle_list_devices(),
        Some(Commands::Logs) => return commands::handle_logs(),
        _ => {}
    }

    logging::init_logging()?;
    config::ensure_config()?;

    match cli.command {
        None | Some(Commands::Record) => commands::handle_record(),
        Some(Commands::Config) => commands::handle_config(),
        Some(Commands::Completions { .. }) | Some(Commands::ListDevices) | Some(Commands::Logs) => {
            unreachable!("handled before logging is initialized")
        }
    }
}
