use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Seconds before the computed expiry at which a token is already treated as stale.
pub const EXPIRY_MARGIN_SECS: i64 = 240;

/// The persisted credential record. Serialized with exactly these three keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

impl Credentials {
    /// Record for a freshly completed authorization-code exchange.
    pub fn issued(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.unwrap_or_default(),
            expires_in: response.expires_in,
        }
    }

    /// Record for a refresh response. Spotify may rotate the refresh token;
    /// when it does not, the previous one is carried forward.
    pub fn refreshed(response: TokenResponse, previous_refresh_token: &str) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .filter(|token| !token.is_empty())
                .unwrap_or_else(|| previous_refresh_token.to_string()),
            expires_in: response.expires_in,
        }
    }
}

/// A credential record together with the instant it was written.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub credentials: Credentials,
    pub saved_at: DateTime<Utc>,
}

impl StoredCredentials {
    pub fn expires_at(&self) -> DateTime<Utc> {
        i64::try_from(self.credentials.expires_in)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|ttl| self.saved_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + TimeDelta::seconds(EXPIRY_MARGIN_SECS) >= self.expires_at()
    }
}

/// Successful answer of the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_expires_in() -> u64 {
    3600
}

/// Error answer of the token endpoint (RFC 6749 section 5.2).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Error envelope of the Web API: `{"error": {"status": 404, "message": "...", "reason": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub status: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body of `PUT /me/player/play` when a specific item should be played.
#[derive(Debug, Clone, Serialize)]
pub struct PlayRequest {
    pub uris: Vec<String>,
}

/// What a successful playback command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Playing(String),
    Resumed,
    Paused,
}

impl fmt::Display for PlaybackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackOutcome::Playing(uri) => write!(f, "Track {uri} is now playing!"),
            PlaybackOutcome::Resumed => write!(f, "Playback resumed."),
            PlaybackOutcome::Paused => write!(f, "Playback paused."),
        }
    }
}
