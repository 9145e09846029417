//! Data models for analysis steps, requests and service results.
//!
//! Wire types mirror the JSON exchanged with the analysis service and decode
//! leniently: every collection defaults to empty so sparse responses still
//! produce a usable [`AnalysisResult`]. Step payloads are a tagged union
//! ([`StepDetail`]) keyed by [`StepKind`].
//!
//! Display implementations for these models live in [`crate::display`].
//!
//! # Examples
//!
//! ```rust
//! use geoscope_core::models::{AnalysisStep, StepKind, StepStatus, StepUpdate};
//!
//! let mut step = AnalysisStep::pending(
//!     "planning",
//!     Some(StepKind::Planning),
//!     "Strategic Planning",
//!     "Creating analysis strategy with AI",
//!     "Analyze query intent and create an execution plan",
//! );
//! step.apply(StepUpdate::status(StepStatus::Running));
//! assert_eq!(step.status, StepStatus::Running);
//! ```

pub mod request;
pub mod result;
pub mod status;
pub mod step;
pub mod update;


pub use request::{AnalysisRequest, CompareRequest};
pub use result::{
    AnalysisResult, CitationData, CompetitorComparison, ComparisonAnalysis, ComparisonResult,
    DomainVisibility, EvaluationMetrics, HealthResponse, HistoryEntry, HistoryResponse,
    Hypothesis, QualityScores, Recommendation, TraceEntry, VisibilityScore,
};
pub use status::{Platform, Priority, StepKind, StepStatus};
pub use step::{AnalysisStep, QueryRecord, StepDetail};
pub use update::StepUpdate;
