// crates/framedeck-api/src/lib.rs
//
// No egui dependency — communicates with framedeck-ui via channels only.
//
// To add a new backend capability:
//   1. Add the request/response method to client.rs
//   2. Add an ApiEvent variant in framedeck-core's api_types.rs
//   3. Wire a spawn method in worker.rs

pub mod client;
pub mod error;
pub mod multipart;
pub mod worker;

// Re-export the main public API so framedeck-ui imports are simple.
pub use client::{DownloadTarget, FrameServer};
pub use error::ApiError;
pub use framedeck_core::api_types::ApiEvent;
pub use worker::ApiWorker;
