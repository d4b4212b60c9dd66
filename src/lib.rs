// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod autolink;
pub mod classify;
pub mod config;
pub mod contest;
pub mod ingest;
pub mod metrics;
pub mod store;
pub mod video;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::classify::{ContestBoard, TemporalState};
pub use crate::contest::{Contest, Platform};
