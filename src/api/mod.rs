//! # API Module
//!
//! HTTP handlers served by the transient loopback listener that catches the
//! Spotify OAuth redirect.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the redirect from Spotify's authorization server.
//!   It validates the `state` parameter and hands the authorization code to the
//!   waiting flow in [`crate::management::TokenManager::authorize`], then tells
//!   the browser whether the exchange worked.
//!
//! The route path is not fixed here: [`crate::server::CallbackServer`] mounts
//! the handler at the path of the configured redirect URI.
//!
//! ## Behaviour
//!
//! | Request | Response | Flow |
//! |---|---|---|
//! | wrong or missing `state` | 400 | keeps listening |
//! | `error=<reason>` | 403 | ends with `AuthorizationDenied` |
//! | no `code` | 400 | keeps listening |
//! | `code`, exchange ok | 200 | done |
//! | `code`, exchange failed | 500 | ends with the exchange error |
//! | any request after the first code | 410 | already done |

mod callback;

pub use callback::{CallbackEvent, CallbackParams, CallbackState, callback};
