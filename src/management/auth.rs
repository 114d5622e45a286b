use std::time::Duration;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tokio::{sync::mpsc, time::timeout};

use crate::{
    Res,
    api::{CallbackEvent, CallbackState},
    config::Config,
    errors::Error,
    info,
    management::CredentialStore,
    server::CallbackServer,
    spotify::{self, auth::Browser},
    success,
    types::Credentials,
    utils, warning,
};

/// Owns the OAuth token lifecycle.
///
/// Decides between the stored token, a refresh and a full authorization flow,
/// and keeps the credential store up to date along the way.
pub struct TokenManager<'a, S, B>
where
    S: CredentialStore,
    B: Browser,
{
    config: &'a Config,
    store: S,
    browser: B,
    client: Client,
}

impl<'a, S, B> TokenManager<'a, S, B>
where
    S: CredentialStore,
    B: Browser,
{
    pub fn new(config: &'a Config, store: S, browser: B) -> Self {
        Self {
            config,
            store,
            browser,
            client: Client::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a bearer token that is believed to be valid.
    ///
    /// A missing or unreadable record starts the authorization flow, an
    /// expired one is refreshed, a live one is returned as is.
    pub async fn access_token(&self) -> Res<String> {
        match self.store.load().await {
            Err(e) => {
                info!("No usable credentials ({}). Starting authorization.", e);
                self.authorize().await
            }
            Ok(stored) if stored.is_expired(Utc::now()) => {
                info!("Access token expired, refreshing...");
                self.refresh(&stored.credentials.refresh_token).await
            }
            Ok(stored) => Ok(stored.credentials.access_token),
        }
    }

    /// Refreshes using whatever refresh token is currently stored.
    ///
    /// Used when the API rejected a token the local expiry check accepted.
    pub async fn refresh_stored(&self) -> Res<String> {
        match self.store.load().await {
            Ok(stored) => self.refresh(&stored.credentials.refresh_token).await,
            Err(e) => {
                info!("No usable credentials ({}). Starting authorization.", e);
                self.authorize().await
            }
        }
    }

    /// Exchanges `refresh_token` for a new access token and persists it.
    ///
    /// An `invalid_grant` answer falls back to a new authorization flow; any
    /// other failure is returned to the caller.
    pub async fn refresh(&self, refresh_token: &str) -> Res<String> {
        if refresh_token.is_empty() {
            warning!("No refresh token stored. Re-authorizing...");
            return self.authorize().await;
        }

        match spotify::auth::refresh_token(&self.client, self.config, refresh_token).await {
            Ok(response) => {
                let credentials = Credentials::refreshed(response, refresh_token);
                self.store.save(&credentials).await?;
                Ok(credentials.access_token)
            }
            Err(e) if e.is_invalid_grant() => {
                warning!("Refresh token is no longer valid. Re-authorizing...");
                self.authorize().await
            }
            Err(e) => Err(e),
        }
    }

    /// Runs the Authorization Code flow once and persists the result.
    ///
    /// Binds the loopback listener, shows (and tries to open) the consent URL,
    /// then waits at most `config.auth_timeout` for the redirect. The listener
    /// is stopped on every exit path before this returns.
    pub async fn authorize(&self) -> Res<String> {
        let state = utils::generate_state();
        let (events_tx, mut events) = mpsc::channel(1);

        let server = CallbackServer::start(
            self.config.callback_addr,
            self.config.callback_path(),
            CallbackState {
                expected_state: state.clone(),
                events: events_tx,
            },
        )
        .await?;

        let auth_url = spotify::auth::authorization_url(self.config, &state);
        info!("Go to this URL and authorize the app:\n{}", auth_url);
        if self.browser.open(auth_url.as_str()).is_err() {
            warning!("Failed to open browser. Please navigate to the URL above manually.");
        }

        let pb = waiting_spinner();
        let event = timeout(self.config.auth_timeout, events.recv()).await;
        pb.finish_and_clear();

        // only the wait for the redirect is bounded, the exchange is not
        let result = match event {
            Ok(Some(CallbackEvent::Code { code, done })) => {
                let result = self.exchange_code(&code).await;
                let _ = done.send(result.is_ok());
                result
            }
            Ok(Some(CallbackEvent::Denied(reason))) => Err(Error::AuthorizationDenied(reason)),
            Ok(None) => Err(Error::ListenerClosed),
            Err(_) => Err(Error::AuthorizationTimeout(self.config.auth_timeout)),
        };

        // closing the channel lets pending callbacks answer before shutdown
        drop(events);
        server.stop().await;

        result
    }

    async fn exchange_code(&self, code: &str) -> Res<String> {
        let response = spotify::auth::exchange_code(&self.client, self.config, code).await?;
        if response.refresh_token.is_none() {
            warning!("Token endpoint issued no refresh token; you will have to re-authorize once it expires.");
        }

        let credentials = Credentials::issued(response);
        self.store.save(&credentials).await?;
        success!("Authorization complete, credentials saved.");
        Ok(credentials.access_token)
    }
}

fn waiting_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for authorization in the browser...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
