//! Subsidecar core - idempotent subtitle sidecar extraction.
//!
//! Decides, per media file, whether embedded text-based subtitle streams
//! still need extraction to sidecar files, builds the ffmpeg invocation that
//! extracts them, and marks processed files with an embedded metadata tag so
//! repeated runs converge to a stable, non-duplicating state.
//!
//! This crate contains the decision engine and orchestration only. The host
//! that walks libraries, stores settings, and schedules work supplies its
//! collaborators through the traits in [`probe`], [`records`], and
//! [`command`].

pub mod command;
pub mod config;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod probe;
pub mod records;
pub mod selection;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
