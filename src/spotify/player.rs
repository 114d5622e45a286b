use reqwest::{Client, Response, StatusCode, header::CONTENT_LENGTH};

use crate::{
    Res,
    config::Config,
    errors::Error,
    management::{CredentialStore, TokenManager},
    spotify::auth::Browser,
    types::{ApiErrorResponse, PlayRequest, PlaybackOutcome},
    warning,
};

const NO_ACTIVE_DEVICE: &str = "NO_ACTIVE_DEVICE";

/// Client for the playback mutations of the Web API player endpoints.
pub struct PlaybackClient<'a, S, B>
where
    S: CredentialStore,
    B: Browser,
{
    config: &'a Config,
    tokens: &'a TokenManager<'a, S, B>,
    client: Client,
}

impl<'a, S, B> PlaybackClient<'a, S, B>
where
    S: CredentialStore,
    B: Browser,
{
    pub fn new(config: &'a Config, tokens: &'a TokenManager<'a, S, B>) -> Self {
        Self {
            config,
            tokens,
            client: Client::new(),
        }
    }

    /// Starts playback of `track_uri`, or resumes the current context when
    /// no URI is given.
    ///
    /// # Errors
    ///
    /// - [`Error::NoActiveDevice`] when no Spotify client is available to play on
    /// - [`Error::Playback`] for any other non-2xx answer, with the response body
    pub async fn resume_or_play(&self, track_uri: Option<&str>) -> Res<PlaybackOutcome> {
        let body = track_uri.map(|uri| PlayRequest {
            uris: vec![uri.to_string()],
        });
        self.put("me/player/play", body.as_ref()).await?;

        Ok(match track_uri {
            Some(uri) => PlaybackOutcome::Playing(uri.to_string()),
            None => PlaybackOutcome::Resumed,
        })
    }

    /// Pauses playback on the active device.
    pub async fn pause(&self) -> Res<PlaybackOutcome> {
        self.put("me/player/pause", None).await?;
        Ok(PlaybackOutcome::Paused)
    }

    /// Sends the mutation, refreshing the token and retrying exactly once
    /// when the API answers 401.
    async fn put(&self, endpoint: &str, body: Option<&PlayRequest>) -> Res<()> {
        let token = self.tokens.access_token().await?;
        let mut res = self.send(endpoint, body, &token).await?;

        if res.status() == StatusCode::UNAUTHORIZED {
            warning!("Access token was rejected. Refreshing token and retrying...");
            let token = self.tokens.refresh_stored().await?;
            res = self.send(endpoint, body, &token).await?;
        }

        check_response(res).await
    }

    async fn send(&self, endpoint: &str, body: Option<&PlayRequest>, token: &str) -> Res<Response> {
        let url = format!("{}/{}", self.config.api_url, endpoint);
        let mut req = self.client.put(url).bearer_auth(token);
        req = match body {
            Some(body) => req.json(body),
            // the player API answers 411 to a bodyless PUT without a length
            None => req.header(CONTENT_LENGTH, 0),
        };
        Ok(req.send().await?)
    }
}

async fn check_response(res: Response) -> Res<()> {
    let status = res.status();
    if status.is_success() {
        return Ok(());
    }

    let body = res.text().await.unwrap_or_default();
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
        if api_error.error.reason.as_deref() == Some(NO_ACTIVE_DEVICE) {
            return Err(Error::NoActiveDevice);
        }
    }

    Err(Error::Playback {
        status: status.as_u16(),
        body,
    })
}
