//! OAuth credential lifecycle.
//!
//! Per-provider constant modules describe each flow; [`flow`] drives the
//! interactive browser login, and [`AuthManager`] serves fresh access
//! tokens to the adapters, refreshing stale ones on demand.

pub mod callback;
pub mod codex;
pub mod flow;
pub mod gemini;
pub mod iflow;
pub mod manager;
pub mod pkce;

pub use manager::{AuthManager, TokenEndpoints};
