//! Terminal client for the cursor presence relay.
//!
//! Mirrors the server roster locally, reconciles remote pointers into the
//! local viewport and shows chat bubbles, pings and gestures until they
//! expire.

pub mod app;
pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;

pub use app::{ClientApp, Notice, Outcome};
pub use runner::run_client;
