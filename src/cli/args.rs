use std::ffi::OsString;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
    error::ErrorKind,
};
use clap_complete::Shell;

use crate::utils;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resume playback, or play the given track
    Play(PlayOptions),

    /// Pause playback
    Pause,

    /// Authorize with Spotify again and store fresh credentials
    Auth,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct PlayOptions {
    /// Track or episode to play, as spotify:track:<id> or an open.spotify.com link
    #[clap(value_parser = utils::parse_track_uri)]
    pub uri: Option<String>,
}

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct CompletionsOption {
    pub shell: Shell,
}

/// Parses the command line, program name included.
///
/// Returns `None` when the caller should print [`super::usage`]: no
/// subcommand, an unknown one, or an argument that does not parse. Help and
/// version requests are printed by clap and end the process.
pub fn parse<I, T>(args: I) -> Option<Command>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => cli.command,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => None,
    }
}

/// The clap command tree, for shell completion generation.
pub fn command() -> clap::Command {
    Cli::command()
}
