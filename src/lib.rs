//! Spotify Playback Remote Library
//!
//! This library provides the pieces behind the `spotplay` command: an OAuth 2.0
//! Authorization Code flow against the Spotify accounts service, local
//! persistence of the resulting credentials, transparent token refresh, and the
//! two playback mutations (play/resume and pause) of the Spotify Web API.
//!
//! # Modules
//!
//! - `api` - HTTP handler for the local OAuth callback listener
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `errors` - Error taxonomy shared by every layer
//! - `management` - Credential persistence and the token lifecycle
//! - `server` - Single-use loopback HTTP listener for the OAuth redirect
//! - `spotify` - Spotify accounts and player API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotplay::{config::Config, management::{FileCredentialStore, TokenManager}, spotify};
//!
//! #[tokio::main]
//! async fn main() -> spotplay::Res<()> {
//!     let config = Config::from_env()?;
//!     let store = FileCredentialStore::new(config.token_path.clone());
//!     let tokens = TokenManager::new(&config, store, spotify::auth::SystemBrowser);
//!     let player = spotify::player::PlaybackClient::new(&config, &tokens);
//!     player.pause().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use errors::{ConfigError, Error, StoreError};

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible operation in the crate reports an [`Error`], so callers can
/// match on the failure class (configuration, credential store, token
/// exchange, playback) instead of inspecting strings.
///
/// # Example
///
/// ```
/// use spotplay::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational message with a blue bullet point.
///
/// Used for general information and status updates, such as the
/// authorization URL the operator has to visit.
///
/// # Example
///
/// ```
/// info!("Go to this URL and authorize the app:\n{}", url);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playback paused.");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the process with exit code 1 right after printing. Only the
/// binary and the `cli` layer use it; library code returns [`Error`] instead.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues the operator should notice, e.g. a rejected
/// refresh token that triggers a new authorization.
///
/// # Example
///
/// ```
/// warning!("Failed to open browser, please open the URL manually");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
