//! Remote reconciliation for the Glow mood store.
//!
//! This crate owns everything network-facing: the record service
//! contract, its HTTP implementation, the push/pull sync engine, the
//! configuration file, and the per-user session that wires a store, a
//! navigator, and an engine together.
//!
//! # Features
//!
//! - **Service contract**: async trait over year feeds and field pushes
//! - **HTTP client**: per-user routes with timeouts and typed errors
//! - **Local-first edits**: failed pushes queue for caller-driven replay
//! - **Sessions**: login bulk-load, warm navigation window, month paging

pub mod config;
pub mod engine;
pub mod http;
pub mod service;
pub mod session;

// Re-exports from shared crates
pub use glow_data;

// Re-exports
pub use config::{CalendarConfig, Config, ConfigError, SyncConfig};
pub use engine::{PendingEdit, SyncEngine, SyncError, SyncResult, SyncStatus};
pub use http::HttpRecordService;
pub use service::{RecordService, ServiceError};
pub use session::Session;
