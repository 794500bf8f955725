//! HTTP and WebSocket surface for the facewatch pipeline.

pub mod app;
pub mod config;
pub mod handlers;
pub mod request_log;
pub mod session;

pub use app::{build_pipeline, build_router, AppState};
