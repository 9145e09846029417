//! Progress tracking for a single analysis attempt.
//!
//! [`ProgressTracker`] owns the ordered step list shown while an analysis is
//! in flight. Two producers write into it:
//!
//! - the optimistic routine, which guesses early step transitions before the
//!   service has answered, via [`ProgressTracker::apply_optimistic`];
//! - reconciliation ([`crate::reconcile`]), which overwrites the guesses with
//!   the service's reasoning trace once the response arrives.
//!
//! Every attempt gets a fresh [`Generation`]. Optimistic writes carry the
//! generation they were issued under and are dropped once that generation is
//! stale or has settled, either reconciled or failed, so ground truth always wins.
//!
//! ```rust
//! use geoscope_core::{
//!     models::{StepStatus, StepUpdate},
//!     ProgressTracker,
//! };
//!
//! let mut tracker = ProgressTracker::new();
//! let generation = tracker.start_analysis();
//! assert!(tracker.is_analyzing());
//!
//! tracker.apply_optimistic(generation, "planning", StepUpdate::status(StepStatus::Running));
//! assert_eq!(tracker.step("planning").unwrap().status, StepStatus::Running);
//! ```

use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::models::{AnalysisStep, QueryRecord, StepDetail, StepKind, StepStatus, StepUpdate};

/// Identifies one analysis attempt. Strictly increasing per tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Point-in-time copy of the tracker for the presentation layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProgressSnapshot {
    pub generation: Generation,
    pub analyzing: bool,
    /// Whether the steps reflect the service's reasoning trace
    pub reconciled: bool,
    pub steps: Vec<AnalysisStep>,
}

impl ProgressSnapshot {
    /// Number of steps in a terminal state.
    pub fn finished_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.status.is_terminal()).count()
    }

    /// The step currently running, if any.
    pub fn running_step(&self) -> Option<&AnalysisStep> {
        self.steps.iter().find(|s| s.status == StepStatus::Running)
    }
}

/// Explicitly-owned step state for the current analysis attempt.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    steps: Vec<AnalysisStep>,
    analyzing: bool,
    generation: Generation,
    reconciled: bool,
    settled: bool,
}

impl ProgressTracker {
    /// Creates an idle tracker with no steps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the step list to the seven-step template, all pending.
    pub fn initialize(&mut self) {
        self.steps = template();
    }

    /// Begins a new attempt and returns its generation.
    ///
    /// Any step state from a previous attempt is discarded.
    pub fn start_analysis(&mut self) -> Generation {
        self.generation = Generation(self.generation.0 + 1);
        self.reconciled = false;
        self.settled = false;
        self.analyzing = true;
        self.initialize();
        debug!("Started analysis attempt {}", self.generation);
        self.generation
    }

    /// Clears the in-progress flag. Step statuses are left as they are.
    pub fn complete_analysis(&mut self) {
        self.analyzing = false;
    }

    /// Merges `update` into the step with `step_id`.
    ///
    /// Returns `false` and changes nothing when no step has that id.
    pub fn update_step(&mut self, step_id: &str, update: StepUpdate) -> bool {
        match self.steps.iter_mut().find(|s| s.id == step_id) {
            Some(step) => {
                step.apply(update);
                true
            }
            None => {
                trace!("Ignoring update for unknown step '{step_id}'");
                false
            }
        }
    }

    /// Appends a platform query record to a data collection step.
    ///
    /// Returns `false` when the step is unknown or already carries a payload
    /// of another kind.
    pub fn append_query_detail(&mut self, step_id: &str, record: QueryRecord) -> bool {
        let Some(step) = self.steps.iter_mut().find(|s| s.id == step_id) else {
            return false;
        };

        match &mut step.detail {
            Some(StepDetail::DataCollection { queries }) => {
                queries.push(record);
                true
            }
            None => {
                step.detail = Some(StepDetail::DataCollection {
                    queries: vec![record],
                });
                true
            }
            Some(other) => {
                debug!(
                    "Step '{step_id}' carries a {} payload, not appending query",
                    other.kind()
                );
                false
            }
        }
    }

    /// Applies a provisional update issued under `generation`.
    ///
    /// The write is discarded when a newer attempt has started or when the
    /// attempt has already settled.
    pub fn apply_optimistic(&mut self, generation: Generation, step_id: &str, update: StepUpdate) -> bool {
        if !self.accepts_optimistic(generation) {
            debug!(
                "Dropping optimistic update for '{step_id}' from attempt {generation} (current {}, settled: {})",
                self.generation, self.settled
            );
            return false;
        }
        self.update_step(step_id, update)
    }

    /// Whether optimistic writes from `generation` are still welcome.
    pub fn accepts_optimistic(&self, generation: Generation) -> bool {
        generation == self.generation && !self.settled
    }

    /// Appends a step that is not part of the template.
    pub(crate) fn push_step(&mut self, step: AnalysisStep) {
        self.steps.push(step);
    }

    /// Records that `generation` now reflects the service's response.
    pub(crate) fn mark_reconciled(&mut self, generation: Generation) {
        if generation == self.generation {
            self.reconciled = true;
            self.settled = true;
        }
    }

    /// Closes `generation` to optimistic writes without touching its steps.
    pub(crate) fn settle(&mut self, generation: Generation) {
        if generation == self.generation {
            self.settled = true;
        }
    }

    pub fn steps(&self) -> &[AnalysisStep] {
        &self.steps
    }

    pub fn step(&self, step_id: &str) -> Option<&AnalysisStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_reconciled(&self) -> bool {
        self.reconciled
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            generation: self.generation,
            analyzing: self.analyzing,
            reconciled: self.reconciled,
            steps: self.steps.clone(),
        }
    }
}

/// The fixed seven-step template, in pipeline order.
pub fn template() -> Vec<AnalysisStep> {
    StepKind::ALL.into_iter().map(template_step).collect()
}

fn template_step(kind: StepKind) -> AnalysisStep {
    let step = |title: &str, subtitle: &str, description: &str| {
        AnalysisStep::pending(kind.as_str(), Some(kind), title, subtitle, description)
    };
    match kind {
        StepKind::Planning => step(
            "Strategic Planning",
            "Creating analysis strategy with AI",
            "Analyzing query intent and creating an execution plan",
        )
        .with_agent("Planning Agent"),
        StepKind::DataCollection => step(
            "Data Collection",
            "Querying AI platforms in parallel",
            "Executing parallel queries across AI platforms",
        ),
        StepKind::Analysis => step(
            "Pattern Analysis",
            "Analyzing visibility patterns and competitive gaps",
            "Statistical analysis of citation data",
        ),
        StepKind::Hypothesis => step(
            "Hypothesis Generation",
            "Explaining why patterns exist",
            "Generating causal explanations for the observed visibility",
        )
        .with_agent("Hypothesis Agent"),
        StepKind::Recommendations => step(
            "Recommendations",
            "Suggesting how to improve",
            "Generating actionable recommendations",
        )
        .with_agent("Recommender Agent"),
        StepKind::Evaluation => step(
            "Quality Validation",
            "Self-critique and improvement",
            "Evaluating output quality and regenerating weak hypotheses",
        )
        .with_agent("Evaluator Agent"),
        StepKind::Synthesis => step(
            "Synthesis",
            "Combining all insights",
            "Creating the executive summary",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE_IDS: [&str; 7] = [
        "planning",
        "data_collection",
        "analysis",
        "hypothesis",
        "recommendations",
        "evaluation",
        "synthesis",
    ];

    fn record(platform: &str) -> QueryRecord {
        QueryRecord {
            platform: platform.to_string(),
            query: "best crm".to_string(),
            ..QueryRecord::default()
        }
    }

    #[test]
    fn test_initialize_produces_pending_template() {
        let mut tracker = ProgressTracker::new();
        tracker.initialize();

        let ids: Vec<&str> = tracker.steps().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, TEMPLATE_IDS);
        for step in tracker.steps() {
            assert_eq!(step.status, StepStatus::Pending);
            assert!(!step.has_payload());
            assert_eq!(step.reported_status, None);
        }
    }

    #[test]
    fn test_start_and_complete_analysis() {
        let mut tracker = ProgressTracker::new();
        assert!(!tracker.is_analyzing());

        let first = tracker.start_analysis();
        assert!(tracker.is_analyzing());
        assert_eq!(tracker.steps().len(), 7);

        tracker.update_step("planning", StepUpdate::status(StepStatus::Completed));
        tracker.complete_analysis();
        assert!(!tracker.is_analyzing());
        assert_eq!(tracker.step("planning").unwrap().status, StepStatus::Completed);

        let second = tracker.start_analysis();
        assert!(second > first);
        assert_eq!(tracker.step("planning").unwrap().status, StepStatus::Pending);
    }

    #[test]
    fn test_unknown_step_update_is_noop() {
        let mut tracker = ProgressTracker::new();
        tracker.start_analysis();
        tracker.update_step("planning", StepUpdate::default().with_llm_output("plan"));
        let before = tracker.steps().to_vec();

        let applied = tracker.update_step(
            "does_not_exist",
            StepUpdate::status(StepStatus::Completed).with_duration(1.0),
        );

        assert!(!applied);
        assert_eq!(tracker.steps(), before.as_slice());
    }

    #[test]
    fn test_merge_is_non_destructive() {
        let mut tracker = ProgressTracker::new();
        tracker.start_analysis();
        let others_before: Vec<AnalysisStep> = tracker.steps()[1..].to_vec();

        tracker.update_step("planning", StepUpdate::default().with_llm_output("X"));
        tracker.update_step("planning", StepUpdate::status(StepStatus::Completed));

        let planning = tracker.step("planning").unwrap();
        assert_eq!(planning.status, StepStatus::Completed);
        assert_eq!(planning.llm_output.as_deref(), Some("X"));
        assert_eq!(&tracker.steps()[1..], others_before.as_slice());
    }

    #[test]
    fn test_append_query_detail_accumulates() {
        let mut tracker = ProgressTracker::new();
        tracker.start_analysis();

        assert!(tracker.append_query_detail("data_collection", record("chatgpt")));
        assert!(tracker.append_query_detail("data_collection", record("perplexity")));

        match &tracker.step("data_collection").unwrap().detail {
            Some(StepDetail::DataCollection { queries }) => {
                let platforms: Vec<&str> = queries.iter().map(|q| q.platform.as_str()).collect();
                assert_eq!(platforms, ["chatgpt", "perplexity"]);
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn test_append_query_detail_rejects_unknown_or_foreign_payload() {
        let mut tracker = ProgressTracker::new();
        tracker.start_analysis();
        tracker.update_step(
            "synthesis",
            StepUpdate::default().with_detail(StepDetail::Synthesis { summary: None }),
        );

        assert!(!tracker.append_query_detail("missing", record("chatgpt")));
        assert!(!tracker.append_query_detail("synthesis", record("chatgpt")));
    }

    #[test]
    fn test_optimistic_writes_from_stale_generation_are_dropped() {
        let mut tracker = ProgressTracker::new();
        let first = tracker.start_analysis();
        let second = tracker.start_analysis();

        assert!(!tracker.apply_optimistic(first, "planning", StepUpdate::status(StepStatus::Running)));
        assert_eq!(tracker.step("planning").unwrap().status, StepStatus::Pending);

        assert!(tracker.apply_optimistic(second, "planning", StepUpdate::status(StepStatus::Running)));
        assert_eq!(tracker.step("planning").unwrap().status, StepStatus::Running);
    }

    #[test]
    fn test_optimistic_writes_after_reconciliation_are_dropped() {
        let mut tracker = ProgressTracker::new();
        let generation = tracker.start_analysis();
        tracker.update_step("data_collection", StepUpdate::status(StepStatus::Completed));
        tracker.mark_reconciled(generation);

        assert!(!tracker.apply_optimistic(
            generation,
            "data_collection",
            StepUpdate::status(StepStatus::Running)
        ));
        assert_eq!(
            tracker.step("data_collection").unwrap().status,
            StepStatus::Completed
        );
    }

    #[test]
    fn test_optimistic_writes_after_settling_are_dropped() {
        let mut tracker = ProgressTracker::new();
        let generation = tracker.start_analysis();
        tracker.apply_optimistic(generation, "planning", StepUpdate::status(StepStatus::Running));
        tracker.settle(generation);

        assert!(!tracker.accepts_optimistic(generation));
        assert!(!tracker.apply_optimistic(
            generation,
            "planning",
            StepUpdate::status(StepStatus::Completed)
        ));
        assert_eq!(tracker.step("planning").unwrap().status, StepStatus::Running);
        assert!(!tracker.is_reconciled());

        let next = tracker.start_analysis();
        assert!(tracker.accepts_optimistic(next));
    }

    #[test]
    fn test_snapshot_reports_progress() {
        let mut tracker = ProgressTracker::new();
        tracker.start_analysis();
        tracker.update_step("planning", StepUpdate::status(StepStatus::Completed));
        tracker.update_step("data_collection", StepUpdate::status(StepStatus::Running));

        let snapshot = tracker.snapshot();
        assert!(snapshot.analyzing);
        assert_eq!(snapshot.finished_steps(), 1);
        assert_eq!(snapshot.running_step().map(|s| s.id.as_str()), Some("data_collection"));
    }
}
