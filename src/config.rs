//! Configuration management for the Spotify playback remote.
//!
//! This module handles loading configuration values from environment variables
//! and `.env` files. Values are read once at process start into a [`Config`]
//! which is then passed by reference to the token manager and playback client.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the current working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use url::Url;

use crate::errors::ConfigError;

pub const CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const REDIRECT_URI: &str = "SPOTIFY_API_REDIRECT_URI";
pub const AUTH_SCOPE: &str = "SPOTIFY_API_AUTH_SCOPE";
pub const AUTH_URL: &str = "SPOTIFY_API_AUTH_URL";
pub const TOKEN_URL: &str = "SPOTIFY_API_TOKEN_URL";
pub const API_URL: &str = "SPOTIFY_API_URL";
pub const TOKEN_PATH: &str = "SPOTPLAY_TOKEN_PATH";
pub const AUTH_TIMEOUT: &str = "SPOTPLAY_AUTH_TIMEOUT";

const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";
const DEFAULT_SCOPE: &str = "user-modify-playback-state user-read-playback-state";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 120;

/// Runtime configuration, constructed once per process.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    /// Must match the redirect URI registered for the Spotify application.
    pub redirect_uri: Url,
    /// Address the callback listener binds, derived from `redirect_uri`.
    pub callback_addr: SocketAddr,
    pub scope: String,
    pub auth_url: Url,
    pub token_url: Url,
    /// Web API base, without trailing slash.
    pub api_url: String,
    pub token_path: PathBuf,
    /// Upper bound for waiting on the browser redirect.
    pub auth_timeout: Duration,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// Fails fast with [`ConfigError::Missing`] when the client id or secret
    /// is absent, rather than failing later inside the OAuth handshake.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let client_id = get(CLIENT_ID).ok_or(ConfigError::Missing(CLIENT_ID))?;
        let client_secret = get(CLIENT_SECRET).ok_or(ConfigError::Missing(CLIENT_SECRET))?;

        let redirect_uri = parse_url(
            REDIRECT_URI,
            &get(REDIRECT_URI).unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
        )?;
        let callback_addr = callback_addr(&redirect_uri)?;

        let auth_url = parse_url(
            AUTH_URL,
            &get(AUTH_URL).unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
        )?;
        let token_url = parse_url(
            TOKEN_URL,
            &get(TOKEN_URL).unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
        )?;
        let api_url = get(API_URL).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        parse_url(API_URL, &api_url)?;

        let auth_timeout = match get(AUTH_TIMEOUT) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    var: AUTH_TIMEOUT,
                    reason: e.to_string(),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        var: AUTH_TIMEOUT,
                        reason: "timeout must be at least one second".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_AUTH_TIMEOUT_SECS),
        };

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            callback_addr,
            scope: get(AUTH_SCOPE).unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            auth_url,
            token_url,
            api_url: api_url.trim_end_matches('/').to_string(),
            token_path: get(TOKEN_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(default_token_path),
            auth_timeout,
        })
    }

    /// Route the callback listener serves, taken from the redirect URI path.
    pub fn callback_path(&self) -> &str {
        self.redirect_uri.path()
    }
}

/// Loads `.env` files into the process environment.
///
/// Looks in the working directory first, then in the platform-specific local
/// data directory under `spotplay/.env`:
/// - Linux: `~/.local/share/spotplay/.env`
/// - macOS: `~/Library/Application Support/spotplay/.env`
/// - Windows: `%LOCALAPPDATA%/spotplay/.env`
///
/// Variables already present in the environment are never overridden, and
/// missing files are not an error.
pub fn load_env() -> Result<(), ConfigError> {
    dotenv::dotenv().ok();

    let path = data_dir().join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| ConfigError::EnvFile {
            path,
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotplay");
    path
}

fn default_token_path() -> PathBuf {
    let mut path = data_dir();
    path.push("cache/token.json");
    path
}

fn parse_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        var,
        reason: e.to_string(),
    })
}

fn callback_addr(redirect_uri: &Url) -> Result<SocketAddr, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        var: REDIRECT_URI,
        reason: reason.to_string(),
    };

    if redirect_uri.scheme() != "http" {
        return Err(invalid("the callback listener only speaks plain http"));
    }

    let ip = match redirect_uri.host_str() {
        Some("localhost") => IpAddr::V4(Ipv4Addr::LOCALHOST),
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .map_err(|_| invalid("host must be localhost or a loopback IP address"))?,
        None => return Err(invalid("redirect URI has no host")),
    };
    if !ip.is_loopback() {
        return Err(invalid("host must be a loopback address"));
    }

    let port = redirect_uri
        .port_or_known_default()
        .ok_or_else(|| invalid("redirect URI has no port"))?;

    Ok(SocketAddr::new(ip, port))
}
