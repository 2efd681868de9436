pub mod auth;
pub mod controller;
pub mod error;
pub mod filter;
pub mod messages;
pub mod ports;
pub mod session_guard;
pub mod state;
