//! # ModKit - shared plumbing for userdesk modules
//!
//! - **HTTP**: [`TracedClient`], a `reqwest` wrapper that opens an `outgoing_http`
//!   span per request and propagates W3C trace context.
//! - **Shutdown**: [`shutdown::wait_for_shutdown`] resolves on SIGINT/SIGTERM (Ctrl+C on Windows).

pub use anyhow::Result;

// HTTP utilities
pub mod http;
pub use http::client::{ClientOptions, HttpError, TracedClient};

pub mod shutdown;
