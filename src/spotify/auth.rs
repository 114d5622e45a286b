use std::io;

use reqwest::{Client, Response, header::AUTHORIZATION};
use url::Url;

use crate::{
    Res,
    config::Config,
    errors::Error,
    types::{TokenErrorResponse, TokenResponse},
    utils,
};

/// Opens the authorization URL for the operator.
pub trait Browser {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Launches the platform's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        webbrowser::open(url)
    }
}

/// Builds the URL of Spotify's consent page.
///
/// Carries the client id, the registered redirect URI, the requested scopes,
/// `response_type=code` and the per-flow `state` that the callback has to echo.
pub fn authorization_url(config: &Config, state: &str) -> Url {
    let mut url = config.auth_url.clone();
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", config.redirect_uri.as_str())
        .append_pair("scope", &config.scope)
        .append_pair("state", state);
    url
}

/// Exchanges an authorization code for tokens.
///
/// Authenticates the client with HTTP Basic auth as Spotify documents for the
/// Authorization Code flow. The `redirect_uri` has to be byte-identical to the
/// one sent in the authorization request.
///
/// # Errors
///
/// - [`Error::TokenExchange`] when the provider rejects the code
/// - [`Error::MissingAccessToken`] when a 2xx answer has no `access_token`
/// - [`Error::Http`] on transport failures
pub async fn exchange_code(client: &Client, config: &Config, code: &str) -> Res<TokenResponse> {
    let res = client
        .post(config.token_url.clone())
        .header(
            AUTHORIZATION,
            utils::basic_auth_header(&config.client_id, &config.client_secret),
        )
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    token_response(res).await
}

/// Obtains a new access token with a refresh token.
///
/// Client credentials travel in the form body here. The response may or may
/// not contain a new refresh token; see [`crate::types::Credentials::refreshed`].
pub async fn refresh_token(
    client: &Client,
    config: &Config,
    refresh_token: &str,
) -> Res<TokenResponse> {
    let res = client
        .post(config.token_url.clone())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ])
        .send()
        .await?;

    token_response(res).await
}

async fn token_response(res: Response) -> Res<TokenResponse> {
    let status = res.status();
    let body = res.text().await?;

    if status.is_success() {
        return serde_json::from_str::<TokenResponse>(&body)
            .ok()
            .filter(|token| !token.access_token.is_empty())
            .ok_or(Error::MissingAccessToken);
    }

    Err(match serde_json::from_str::<TokenErrorResponse>(&body) {
        Ok(err) => Error::TokenExchange {
            code: err.error,
            description: err.error_description,
        },
        Err(_) => Error::TokenExchange {
            code: status.as_u16().to_string(),
            description: Some(body).filter(|b| !b.is_empty()),
        },
    })
}
