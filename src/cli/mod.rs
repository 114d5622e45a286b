//! # CLI Module
//!
//! Command bodies behind the `spotplay` binary. Each command builds the token
//! manager over the on-disk credential store, runs one operation and reports
//! the outcome with the console macros. Fatal errors end the process with
//! exit code 1 through [`crate::error!`].
//!
//! ## Commands
//!
//! - [`play`] - Resume playback, or start a given track or episode
//! - [`pause`] - Pause playback
//! - [`auth`] - Force a fresh authorization and store new credentials
//! - [`usage`] - Two-line usage text for empty or unknown input
//! - [`parse`] - Command line parsing; `None` means print [`usage`]
//!
//! ## Usage
//!
//! ```bash
//! spotplay play                                   # resume
//! spotplay play spotify:track:4uLU6hMCjMI75M1A2tKUQC
//! spotplay pause
//! ```

mod args;
mod auth;
mod playback;

use crate::{
    config::Config,
    management::{FileCredentialStore, TokenManager},
    spotify::auth::SystemBrowser,
};

pub use args::{Command, CompletionsOption, PlayOptions, command, parse};
pub use auth::auth;
pub use playback::pause;
pub use playback::play;

/// Prints the two-line usage text.
pub fn usage() {
    let bin = env!("CARGO_PKG_NAME");
    println!("Usage: {bin} play [<spotify:track:URI>]");
    println!("       {bin} pause");
}

fn token_manager(config: &Config) -> TokenManager<'_, FileCredentialStore, SystemBrowser> {
    TokenManager::new(
        config,
        FileCredentialStore::new(config.token_path.clone()),
        SystemBrowser,
    )
}
