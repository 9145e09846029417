//! Markdown formatting for steps, reports, comparisons and history.
//!
//! Domain models implement `Display` directly (see [`models`]); collections
//! and contextual views are newtype wrappers so that empty collections and
//! progress-specific flags are handled in one place. Everything renders to
//! markdown, which the CLI passes through its terminal renderer.
//!
//! ```rust
//! use geoscope_core::{display::ProgressView, ProgressTracker};
//!
//! let mut tracker = ProgressTracker::new();
//! tracker.start_analysis();
//!
//! let output = ProgressView(&tracker.snapshot()).to_string();
//! assert!(output.contains("Strategic Planning"));
//! assert!(output.contains("0/7"));
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: step progress and history listings
//! - [`status`]: error panel, operation status and connection status
//! - [`datetime`]: timestamp formatting
//! - [`models`]: Display implementations for domain models

pub mod collections;
pub mod datetime;
pub mod models;
pub mod status;

pub use collections::{ArchivedEntries, HistoryEntries, ProgressView};
pub use datetime::LocalDateTime;
pub use status::{ConnectionStatus, ErrorPanel, OperationStatus};

/// Formats a `[0, 1]` rate as a percentage with one decimal.
pub fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}
