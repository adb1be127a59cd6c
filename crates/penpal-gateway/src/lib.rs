//! HTTP surface of Penpal.
//!
//! # Architecture
//!
//! - [`server::router`] — the axum [`axum::Router`] with all endpoints
//! - [`handlers`] — one async fn per endpoint: bind body → prompt → provider → interpret
//! - [`error::ApiError`] — every failure rendered as `{"detail": ...}`
//! - [`extract::Json`] — JSON extractor whose rejections are `ApiError`s
//! - [`state::AppState`] — provider + settings, built once at startup

pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{build_state, router, serve, shutdown_signal};
pub use state::AppState;
