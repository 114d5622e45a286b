use std::net::SocketAddr;

use axum::{Extension, Router, routing::get};
use tokio::{sync::oneshot, task::JoinHandle};

use crate::{Res, api, errors::Error, warning};

/// Single-use loopback listener for the OAuth redirect.
///
/// The listener is bound by [`CallbackServer::start`] and released by
/// [`CallbackServer::stop`]. Dropping the value without calling `stop` still
/// signals shutdown, so no socket outlives the authorization flow.
pub struct CallbackServer {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<std::io::Result<()>>>,
}

impl CallbackServer {
    pub async fn start(addr: SocketAddr, path: &str, state: api::CallbackState) -> Res<Self> {
        let app = Router::new().route(path, get(api::callback).layer(Extension(state)));

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| Error::Bind { addr, source })?;

        let (shutdown, signal) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = signal.await;
                })
                .await
        });

        Ok(Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        })
    }

    /// Stops accepting connections and waits until in-flight responses are
    /// written and the socket is closed.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }

        if let Some(handle) = self.handle.take() {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warning!("Callback listener stopped with an error: {}", e),
                Err(e) => warning!("Callback listener task failed: {}", e),
            }
        }
    }
}

impl Drop for CallbackServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}
