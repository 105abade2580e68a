//! Repository の実装
//!
//! - `inmemory`: プロセス内の `Registry` を使った実装

pub mod inmemory;

pub use inmemory::InMemorySessionRepository;
