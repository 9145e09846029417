//! Partial update applied to a single step.

use serde_json::Value;

use super::{StepDetail, StepStatus};

/// A partial update merged into a step by the tracker.
///
/// Every field is optional; `None` leaves the step's current value in place.
///
/// ```rust
/// use geoscope_core::models::{StepStatus, StepUpdate};
///
/// let update = StepUpdate::status(StepStatus::Completed)
///     .with_duration(0.5)
///     .with_llm_output("Strategy created");
/// assert_eq!(update.status, Some(StepStatus::Completed));
/// assert_eq!(update.duration, Some(0.5));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepUpdate {
    pub status: Option<StepStatus>,
    pub duration: Option<f64>,
    pub llm_output: Option<String>,
    pub results: Option<Value>,
    pub reported_status: Option<String>,
    pub detail: Option<StepDetail>,
}

impl StepUpdate {
    /// An update that only changes the status.
    pub fn status(status: StepStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_llm_output(mut self, llm_output: impl Into<String>) -> Self {
        self.llm_output = Some(llm_output.into());
        self
    }

    pub fn with_detail(mut self, detail: StepDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Whether applying this update would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
