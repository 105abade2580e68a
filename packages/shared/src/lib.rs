//! Utilities shared by the Cursors server and client binaries.

pub mod logger;
pub mod time;
