//! # Spotify Integration Module
//!
//! This module is the integration layer between spotplay and Spotify's
//! services: the accounts service (OAuth 2.0 authorization and token endpoint)
//! and the Web API player endpoints.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer (play, pause, auth)
//!          ↓
//! PlaybackClient ──→ TokenManager ──→ CredentialStore
//!          ↓               ↓
//!          ↓         CallbackServer (loopback redirect)
//!          ↓               ↓
//! Web API player     Accounts service (/authorize, /api/token)
//! ```
//!
//! ## Modules
//!
//! ### Authentication
//!
//! [`auth`] - Accounts service requests:
//! - **Authorization URL**: client id, redirect URI, scopes and `state`
//! - **Code Exchange**: `authorization_code` grant with HTTP Basic client auth
//! - **Token Refresh**: `refresh_token` grant with client credentials in the body
//! - **Browser Launch**: [`auth::Browser`] seam, [`auth::SystemBrowser`] by default
//!
//! ### Playback
//!
//! [`player`] - Player mutations:
//! - `PUT /me/player/play` with `{"uris": [...]}` to play a given item
//! - `PUT /me/player/play` without body to resume
//! - `PUT /me/player/pause`
//!
//! A 401 answer triggers exactly one token refresh and one retry with the new
//! token. The `NO_ACTIVE_DEVICE` reason is reported as
//! [`crate::Error::NoActiveDevice`] so the operator knows to start a client.
//!
//! ## Endpoints
//!
//! Base URLs come from [`crate::config::Config`], which makes it possible to
//! point the client at a local stand-in of the Spotify services.

pub mod auth;
pub mod player;
