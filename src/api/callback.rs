use axum::{Extension, extract::Query, http::StatusCode, response::Html};
use serde::Deserialize;
use tokio::sync::{mpsc, oneshot};

use crate::warning;

const COMPLETE_PAGE: &str =
    "<h2>Authorization complete.</h2><p>You can close this window and return to the terminal.</p>";
const EXCHANGE_FAILED_PAGE: &str =
    "<h4>Authorization failed.</h4><p>The authorization code could not be exchanged, see the terminal for details.</p>";
const MISSING_CODE_PAGE: &str = "<h4>Authorization failed.</h4><p>No authorization code was supplied.</p>";
const STATE_MISMATCH_PAGE: &str =
    "<h4>Authorization failed.</h4><p>The request does not belong to this authorization attempt.</p>";
const DENIED_PAGE: &str = "<h4>Authorization denied.</h4><p>You can close this window.</p>";
const ALREADY_DONE_PAGE: &str = "<h4>Authorization already handled.</h4><p>You can close this window.</p>";

/// Query string of the OAuth redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// What the callback hands over to the waiting authorization flow.
#[derive(Debug)]
pub enum CallbackEvent {
    /// A code arrived. The flow answers on `done` once the exchange finished,
    /// so the browser learns the outcome.
    Code {
        code: String,
        done: oneshot::Sender<bool>,
    },
    /// The operator declined on the consent page.
    Denied(String),
}

#[derive(Debug, Clone)]
pub struct CallbackState {
    pub expected_state: String,
    pub events: mpsc::Sender<CallbackEvent>,
}

pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(shared_state): Extension<CallbackState>,
) -> (StatusCode, Html<&'static str>) {
    if params.state.as_deref() != Some(shared_state.expected_state.as_str()) {
        warning!("Ignoring callback with missing or unexpected state parameter.");
        return (StatusCode::BAD_REQUEST, Html(STATE_MISMATCH_PAGE));
    }

    if let Some(reason) = params.error {
        let _ = shared_state.events.send(CallbackEvent::Denied(reason)).await;
        return (StatusCode::FORBIDDEN, Html(DENIED_PAGE));
    }

    let Some(code) = params.code else {
        return (StatusCode::BAD_REQUEST, Html(MISSING_CODE_PAGE));
    };

    let (done, exchanged) = oneshot::channel();
    if shared_state
        .events
        .send(CallbackEvent::Code { code, done })
        .await
        .is_err()
    {
        return (StatusCode::GONE, Html(ALREADY_DONE_PAGE));
    }

    match exchanged.await {
        Ok(true) => (StatusCode::OK, Html(COMPLETE_PAGE)),
        Ok(false) => (StatusCode::INTERNAL_SERVER_ERROR, Html(EXCHANGE_FAILED_PAGE)),
        // the flow finished with an earlier callback or gave up
        Err(_) => (StatusCode::GONE, Html(ALREADY_DONE_PAGE)),
    }
}
