use std::{io, net::SocketAddr, path::PathBuf, time::Duration};

use thiserror::Error;

/// Problems with the process configuration. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required configuration value `{0}`; set it in the environment or a .env file")]
    Missing(&'static str),

    #[error("invalid value for `{var}`: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("failed to load environment file {path}: {reason}")]
    EnvFile { path: PathBuf, reason: String },
}

/// Failures of the credential store.
///
/// `NotFound` and `Corrupt` both mean "not authenticated" to the token manager.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no stored credentials at {0}")]
    NotFound(PathBuf),

    #[error("stored credentials at {path} are unreadable: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("credential file i/o failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("token request rejected with `{code}`: {}", .description.as_deref().unwrap_or("no description given"))]
    TokenExchange {
        code: String,
        description: Option<String>,
    },

    #[error("token endpoint response carried no access_token")]
    MissingAccessToken,

    #[error("authorization was denied: {0}")]
    AuthorizationDenied(String),

    #[error("no authorization callback received within {} seconds", .0.as_secs())]
    AuthorizationTimeout(Duration),

    #[error("callback listener stopped before an authorization code arrived")]
    ListenerClosed,

    #[error("failed to bind callback listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("no active playback device found; start Spotify on a device and try again")]
    NoActiveDevice,

    #[error("request failed with status {status}: {body}")]
    Playback { status: u16, body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// The provider no longer accepts the refresh token; re-authorizing fixes it.
    pub fn is_invalid_grant(&self) -> bool {
        matches!(self, Error::TokenExchange { code, .. } if code == "invalid_grant")
    }
}
