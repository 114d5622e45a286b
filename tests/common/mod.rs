#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    io,
    net::TcpListener as StdListener,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::{AUTHORIZATION, CONTENT_LENGTH}},
    routing::{post, put},
};
use serde_json::{Value, json};
use spotplay::{config::Config, spotify::auth::Browser};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use url::Url;

#[derive(Debug, Clone)]
pub struct TokenCall {
    pub authorization: Option<String>,
    pub form: HashMap<String, String>,
}

impl TokenCall {
    pub fn grant_type(&self) -> &str {
        self.form.get("grant_type").map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone)]
pub struct PlayerCall {
    pub action: String,
    pub authorization: Option<String>,
    pub content_length: Option<String>,
    pub body: String,
}

struct ProviderState {
    token_calls: Mutex<Vec<TokenCall>>,
    player_calls: Mutex<Vec<PlayerCall>>,
    code_reply: Mutex<(StatusCode, Value)>,
    code_delay: Mutex<Duration>,
    refresh_reply: Mutex<(StatusCode, Value)>,
    player_replies: Mutex<VecDeque<(StatusCode, String)>>,
}

/// Local stand-in for the accounts service and the player API.
pub struct MockProvider {
    pub base_url: String,
    state: Arc<ProviderState>,
}

impl MockProvider {
    pub async fn start() -> Self {
        let state = Arc::new(ProviderState {
            token_calls: Mutex::new(Vec::new()),
            player_calls: Mutex::new(Vec::new()),
            code_reply: Mutex::new((
                StatusCode::OK,
                json!({"access_token": "A", "refresh_token": "R", "expires_in": 3600}),
            )),
            code_delay: Mutex::new(Duration::ZERO),
            refresh_reply: Mutex::new((
                StatusCode::OK,
                json!({"access_token": "B", "expires_in": 3600}),
            )),
            player_replies: Mutex::new(VecDeque::new()),
        });

        let app = Router::new()
            .route("/api/token", post(token))
            .route("/v1/me/player/{action}", put(player))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn on_code(&self, status: StatusCode, body: Value) {
        *self.state.code_reply.lock().unwrap() = (status, body);
    }

    /// Holds every code exchange answer back for `delay`.
    pub fn delay_code(&self, delay: Duration) {
        *self.state.code_delay.lock().unwrap() = delay;
    }

    pub fn on_refresh(&self, status: StatusCode, body: Value) {
        *self.state.refresh_reply.lock().unwrap() = (status, body);
    }

    /// Queues player answers; once drained every call gets 204.
    pub fn queue_player(&self, status: StatusCode, body: &str) {
        self.state
            .player_replies
            .lock()
            .unwrap()
            .push_back((status, body.to_string()));
    }

    pub fn token_calls(&self) -> Vec<TokenCall> {
        self.state.token_calls.lock().unwrap().clone()
    }

    pub fn player_calls(&self) -> Vec<PlayerCall> {
        self.state.player_calls.lock().unwrap().clone()
    }
}

async fn token(
    State(state): State<Arc<ProviderState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let call = TokenCall {
        authorization: header(&headers),
        form,
    };
    let reply = match call.grant_type() {
        "authorization_code" => state.code_reply.lock().unwrap().clone(),
        "refresh_token" => state.refresh_reply.lock().unwrap().clone(),
        _ => (
            StatusCode::BAD_REQUEST,
            json!({"error": "unsupported_grant_type"}),
        ),
    };
    let delay = match call.grant_type() {
        "authorization_code" => *state.code_delay.lock().unwrap(),
        _ => Duration::ZERO,
    };
    state.token_calls.lock().unwrap().push(call);
    tokio::time::sleep(delay).await;
    (reply.0, Json(reply.1))
}

async fn player(
    State(state): State<Arc<ProviderState>>,
    Path(action): Path<String>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    state.player_calls.lock().unwrap().push(PlayerCall {
        action,
        authorization: header(&headers),
        content_length: headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    state
        .player_replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((StatusCode::NO_CONTENT, String::new()))
}

fn header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// What the simulated operator does after the consent page opens.
#[derive(Debug, Clone)]
pub enum Redirect {
    /// Approve: redirect with the given code.
    Code(String),
    /// First hit the callback without a code, then approve.
    MissingCodeThenCode(String),
    /// First redirect with a forged state, then approve.
    WrongStateThenCode(String),
    /// Decline on the consent page.
    Deny,
    /// Never come back.
    Ignore,
}

/// Browser stand-in that follows the redirect like Spotify would.
#[derive(Clone)]
pub struct FakeBrowser {
    redirect: Redirect,
    opened: Arc<Mutex<Vec<String>>>,
    visits: Arc<Mutex<Option<JoinHandle<Vec<(u16, String)>>>>>,
}

impl FakeBrowser {
    pub fn new(redirect: Redirect) -> Self {
        Self {
            redirect,
            opened: Arc::new(Mutex::new(Vec::new())),
            visits: Arc::new(Mutex::new(None)),
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    /// Status and body of every callback request the browser made.
    pub async fn responses(&self) -> Vec<(u16, String)> {
        let handle = self.visits.lock().unwrap().take();
        match handle {
            Some(handle) => handle.await.unwrap(),
            None => Vec::new(),
        }
    }
}

impl Browser for FakeBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        self.opened.lock().unwrap().push(url.to_string());

        let url = Url::parse(url).map_err(io::Error::other)?;
        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
        let redirect_uri = params["redirect_uri"].clone();
        let state = params["state"].clone();

        let targets: Vec<Vec<(&str, String)>> = match &self.redirect {
            Redirect::Code(code) => vec![vec![("code", code.clone()), ("state", state)]],
            Redirect::MissingCodeThenCode(code) => vec![
                vec![("state", state.clone())],
                vec![("code", code.clone()), ("state", state)],
            ],
            Redirect::WrongStateThenCode(code) => vec![
                vec![("code", "forged".to_string()), ("state", "nope".to_string())],
                vec![("code", code.clone()), ("state", state)],
            ],
            Redirect::Deny => vec![vec![
                ("error", "access_denied".to_string()),
                ("state", state),
            ]],
            Redirect::Ignore => Vec::new(),
        };

        let requests: Vec<Url> = targets
            .into_iter()
            .map(|query| Url::parse_with_params(&redirect_uri, query).unwrap())
            .collect();

        let handle = tokio::spawn(async move {
            let client = reqwest::Client::builder().no_proxy().build().unwrap();
            let mut responses = Vec::new();
            for request in requests {
                let res = client.get(request).send().await.unwrap();
                let status = res.status().as_u16();
                responses.push((status, res.text().await.unwrap()));
            }
            responses
        });
        *self.visits.lock().unwrap() = Some(handle);
        Ok(())
    }
}

/// A loopback port nobody listens on right now.
pub fn free_port() -> u16 {
    StdListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

pub fn token_path(dir: &TempDir) -> PathBuf {
    dir.path().join("cache").join("token.json")
}

pub fn config(provider: &MockProvider, dir: &TempDir) -> Config {
    config_with(provider, dir, &[])
}

pub fn config_with(provider: &MockProvider, dir: &TempDir, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("SPOTIFY_CLIENT_ID".to_string(), "client-id".to_string()),
        ("SPOTIFY_CLIENT_SECRET".to_string(), "client-secret".to_string()),
        (
            "SPOTIFY_API_REDIRECT_URI".to_string(),
            format!("http://127.0.0.1:{}/callback", free_port()),
        ),
        (
            "SPOTIFY_API_AUTH_URL".to_string(),
            format!("{}/authorize", provider.base_url),
        ),
        (
            "SPOTIFY_API_TOKEN_URL".to_string(),
            format!("{}/api/token", provider.base_url),
        ),
        (
            "SPOTIFY_API_URL".to_string(),
            format!("{}/v1", provider.base_url),
        ),
        (
            "SPOTPLAY_TOKEN_PATH".to_string(),
            token_path(dir).display().to_string(),
        ),
        ("SPOTPLAY_AUTH_TIMEOUT".to_string(), "10".to_string()),
    ]);
    for (key, value) in extra {
        vars.insert(key.to_string(), value.to_string());
    }

    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}
