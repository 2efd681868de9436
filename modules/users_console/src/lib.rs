// === PUBLIC CONTRACT ===
pub mod contract;

// Re-export the public contract components
pub use contract::{client, error, model};

// === MODULE WIRING ===
pub mod config;
pub mod module;
pub use module::UsersConsole;

// === SCREEN / EVENT LOOP ===
pub mod screen;

// === INTERNAL MODULES ===
// Exposed for front-ends and tests; `contract`, `module` and `screen` are the
// intended entry points.
pub mod domain;
pub mod infra;
