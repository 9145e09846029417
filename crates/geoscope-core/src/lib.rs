//! Core library for the Geoscope GEO visibility client.
//!
//! The heavy lifting (querying AI platforms, generating hypotheses and
//! recommendations, self-evaluation) happens in a remote analysis service.
//! This crate is the client side of it:
//!
//! - [`tracker`]: step-by-step progress of the current analysis attempt;
//! - [`reconcile`]: folds the service's reasoning trace back into the tracker;
//! - [`session`]: the request flow tying form validation, optimistic
//!   progress, the service call and reconciliation together;
//! - [`client`]: the [`AnalysisService`] trait and its HTTP implementation;
//! - [`config`]: base URL resolution, including demo mode;
//! - [`archive`]: local SQLite copy of completed analyses;
//! - [`display`]: markdown formatting for the terminal.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use geoscope_core::{
//!     config::ApiConfig, presets::analysis_preset, AnalysisSession, HttpAnalysisClient,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpAnalysisClient::new(ApiConfig::from_env(None, None)?);
//! let mut session = AnalysisSession::new(client);
//!
//! let preset = analysis_preset(2).ok_or("no such preset")?;
//! let result = session.run_analysis(preset.into()).await?;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod client;
pub mod config;
pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod presets;
pub mod reconcile;
pub mod session;
pub mod tracker;

// Re-export commonly used types
pub use archive::{Archive, ArchiveBuilder};
pub use client::{AnalysisService, HttpAnalysisClient};
pub use config::{ApiConfig, ConnectionMode};
pub use db::{analysis_queries::ArchivedEntry, Database};
pub use display::{ArchivedEntries, ErrorPanel, HistoryEntries, OperationStatus, ProgressView};
pub use error::{GeoscopeError, Result};
pub use models::{AnalysisResult, AnalysisStep, StepKind, StepStatus, StepUpdate};
pub use params::{AnalysisForm, CompareForm, ListHistory};
pub use session::AnalysisSession;
pub use tracker::{Generation, ProgressSnapshot, ProgressTracker};
