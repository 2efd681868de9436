//! HTTP utilities for modkit
//!
//! Outgoing client plus trace-context header helpers.

pub mod client;
pub mod trace_context;
