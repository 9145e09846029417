//! Reconciliation of optimistic step state with the service's reasoning trace.
//!
//! Runs once per completed analysis. Each [`TraceEntry`] is mapped onto a
//! tracker step through [`map_trace_label`], its status, duration, narrative
//! and output are merged in, and kind-specific detail is attached. A final
//! sweep then marks every template step completed, so steps the backend never
//! reported (e.g. a synthesis stage without its own trace entry) do not stay
//! pending forever. The raw backend status is preserved in
//! `reported_status`, which lets the presentation layer tell reported and
//! swept steps apart.

use log::{debug, warn};

use crate::{
    models::{
        AnalysisResult, AnalysisStep, StepDetail, StepKind, StepStatus, StepUpdate, TraceEntry,
    },
    tracker::{Generation, ProgressTracker},
};

/// Backend stage label → tracker step id.
const STEP_MAPPING: [(&str, &str); 7] = [
    ("planning", "planning"),
    ("data_collection", "data_collection"),
    ("analysis", "analysis"),
    ("hypothesis_generation", "hypothesis"),
    ("recommendation_generation", "recommendations"),
    ("evaluation", "evaluation"),
    ("synthesis", "synthesis"),
];

/// Maps a backend stage label to a tracker step id.
///
/// Unmapped labels pass through unchanged.
///
/// ```rust
/// use geoscope_core::reconcile::map_trace_label;
///
/// assert_eq!(map_trace_label("hypothesis_generation"), "hypothesis");
/// assert_eq!(map_trace_label("web_search"), "web_search");
/// ```
pub fn map_trace_label(label: &str) -> &str {
    STEP_MAPPING
        .iter()
        .find(|(backend, _)| *backend == label)
        .map_or(label, |(_, step_id)| *step_id)
}

/// Outcome counters for one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    /// Trace entries merged into existing steps
    pub applied: usize,
    /// Trace entries that created an extra step
    pub added: usize,
    /// Template steps the backend did not report on
    pub unreported: usize,
}

/// Overwrites the tracker's optimistic state with `result`.
///
/// Returns `None` without touching the tracker when `generation` is no longer
/// the tracker's current attempt.
pub fn reconcile(
    tracker: &mut ProgressTracker,
    generation: Generation,
    result: &AnalysisResult,
) -> Option<ReconcileReport> {
    if generation != tracker.generation() {
        warn!(
            "Discarding result {} for stale attempt {generation} (current {})",
            result.id,
            tracker.generation()
        );
        return None;
    }

    let mut report = ReconcileReport::default();
    for entry in &result.reasoning_trace {
        let step_id = map_trace_label(&entry.step);
        let kind = StepKind::from_id(step_id);
        let update = trace_update(entry, kind, result);

        if tracker.step(step_id).is_some() {
            tracker.update_step(step_id, update);
            report.applied += 1;
        } else {
            debug!("Trace label '{}' has no template step, adding it", entry.step);
            let mut step = AnalysisStep::pending(
                step_id,
                kind,
                humanize(step_id),
                entry.agent.clone().unwrap_or_default(),
                String::new(),
            );
            step.apply(update);
            tracker.push_step(step);
            report.added += 1;
        }
    }

    for kind in StepKind::ALL {
        let id = kind.as_str();
        if tracker.step(id).is_some_and(|s| s.reported_status.is_none()) {
            report.unreported += 1;
        }
        tracker.update_step(id, StepUpdate::status(StepStatus::Completed));
    }

    tracker.mark_reconciled(generation);
    debug!(
        "Reconciled attempt {generation}: {} applied, {} added, {} unreported",
        report.applied, report.added, report.unreported
    );
    Some(report)
}

fn trace_update(entry: &TraceEntry, kind: Option<StepKind>, result: &AnalysisResult) -> StepUpdate {
    let reported = entry
        .status
        .clone()
        .unwrap_or_else(|| StepStatus::Completed.as_str().to_string());
    let status = reported.parse::<StepStatus>().unwrap_or_else(|e| {
        warn!("{e} for step '{}', treating as error", entry.step);
        StepStatus::Error
    });

    let llm_output = entry.llm_output.clone().or_else(|| {
        entry
            .reasoning_steps
            .as_ref()
            .map(|steps| steps.join("\n"))
    });

    StepUpdate {
        status: Some(status),
        duration: entry.duration,
        llm_output,
        results: entry.output.clone(),
        reported_status: Some(reported),
        detail: kind.and_then(|kind| trace_detail(entry, kind, result)),
    }
}

fn trace_detail(entry: &TraceEntry, kind: StepKind, result: &AnalysisResult) -> Option<StepDetail> {
    match kind {
        StepKind::DataCollection => entry
            .queries_detail
            .clone()
            .map(|queries| StepDetail::DataCollection { queries }),
        StepKind::Hypothesis => entry
            .hypotheses_detail
            .clone()
            .map(|hypotheses| StepDetail::Hypothesis { hypotheses }),
        StepKind::Recommendations => entry
            .recommendations_detail
            .clone()
            .map(|recommendations| StepDetail::Recommendations { recommendations }),
        StepKind::Evaluation => entry
            .output
            .clone()
            .map(|evaluation_results| StepDetail::Evaluation { evaluation_results }),
        StepKind::Synthesis => Some(StepDetail::Synthesis {
            summary: Some(result.summary.clone()).filter(|s| !s.is_empty()),
        }),
        StepKind::Planning | StepKind::Analysis => None,
    }
}

/// `web_search` → `Web Search`
fn humanize(id: &str) -> String {
    id.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::models::{Hypothesis, QueryRecord, Recommendation};

    fn started() -> (ProgressTracker, Generation) {
        let mut tracker = ProgressTracker::new();
        let generation = tracker.start_analysis();
        (tracker, generation)
    }

    fn result_with(trace: Vec<TraceEntry>) -> AnalysisResult {
        AnalysisResult {
            id: "analysis-1".to_string(),
            summary: "Brand trails competitors".to_string(),
            reasoning_trace: trace,
            ..AnalysisResult::default()
        }
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(map_trace_label("planning"), "planning");
        assert_eq!(map_trace_label("recommendation_generation"), "recommendations");
        assert_eq!(map_trace_label("custom_stage"), "custom_stage");
    }

    #[test]
    fn test_empty_trace_completes_every_step() {
        let (mut tracker, generation) = started();
        let report = reconcile(&mut tracker, generation, &result_with(vec![])).unwrap();

        assert_eq!(report.unreported, 7);
        for step in tracker.steps() {
            assert_eq!(step.status, StepStatus::Completed);
            assert!(!step.has_payload());
        }
    }

    #[test]
    fn test_error_status_is_swept_but_reported_status_kept() {
        let (mut tracker, generation) = started();
        let mut entry = TraceEntry::new("data_collection");
        entry.status = Some("partial_failure".to_string());

        reconcile(&mut tracker, generation, &result_with(vec![entry])).unwrap();

        let step = tracker.step("data_collection").unwrap();
        assert_eq!(step.status, StepStatus::Completed);
        assert_eq!(step.reported_status.as_deref(), Some("partial_failure"));
    }

    #[test]
    fn test_hypothesis_label_updates_hypothesis_step() {
        let (mut tracker, generation) = started();
        let mut entry = TraceEntry::new("hypothesis_generation");
        entry.duration = Some(2.5);
        entry.hypotheses_detail = Some(vec![Hypothesis {
            title: "Thin review coverage".to_string(),
            confidence: 0.7,
            ..Hypothesis::default()
        }]);

        let report = reconcile(&mut tracker, generation, &result_with(vec![entry])).unwrap();

        assert_eq!(report.applied, 1);
        assert!(tracker.step("hypothesis_generation").is_none());
        let step = tracker.step("hypothesis").unwrap();
        assert_eq!(step.duration, Some(2.5));
        match &step.detail {
            Some(StepDetail::Hypothesis { hypotheses }) => {
                assert_eq!(hypotheses[0].title, "Thin review coverage");
            }
            other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_label_is_keyed_verbatim() {
        let (mut tracker, generation) = started();
        let mut entry = TraceEntry::new("web_search");
        entry.agent = Some("SearchAgent".to_string());
        entry.duration = Some(1.2);

        let report = reconcile(&mut tracker, generation, &result_with(vec![entry])).unwrap();

        assert_eq!(report.added, 1);
        assert_eq!(tracker.steps().len(), 8);
        let step = tracker.step("web_search").unwrap();
        assert_eq!(step.kind, None);
        assert_eq!(step.title, "Web Search");
        assert_eq!(step.status, StepStatus::Completed);
        assert_eq!(step.duration, Some(1.2));
    }

    #[test]
    fn test_narrative_falls_back_to_reasoning_steps() {
        let (mut tracker, generation) = started();
        let mut analysis = TraceEntry::new("analysis");
        analysis.reasoning_steps = Some(vec!["1. Count".to_string(), "2. Compare".to_string()]);
        let mut planning = TraceEntry::new("planning");
        planning.llm_output = Some("Plan ready".to_string());
        planning.reasoning_steps = Some(vec!["ignored".to_string()]);

        reconcile(&mut tracker, generation, &result_with(vec![analysis, planning])).unwrap();

        assert_eq!(
            tracker.step("analysis").unwrap().llm_output.as_deref(),
            Some("1. Count\n2. Compare")
        );
        assert_eq!(
            tracker.step("planning").unwrap().llm_output.as_deref(),
            Some("Plan ready")
        );
    }

    #[test]
    fn test_kind_specific_enrichment() {
        let (mut tracker, generation) = started();
        let mut collection = TraceEntry::new("data_collection");
        collection.queries_detail = Some(vec![QueryRecord {
            platform: "perplexity".to_string(),
            query: "best crm".to_string(),
            brand_mentioned: true,
            ..QueryRecord::default()
        }]);
        let mut recommendations = TraceEntry::new("recommendation_generation");
        recommendations.recommendations_detail = Some(vec![Recommendation {
            title: "Publish comparisons".to_string(),
            ..Recommendation::default()
        }]);
        let mut evaluation = TraceEntry::new("evaluation");
        evaluation.output = Some(json!({"hypotheses_improved": 1}));
        let synthesis = TraceEntry::new("synthesis");

        reconcile(
            &mut tracker,
            generation,
            &result_with(vec![collection, recommendations, evaluation, synthesis]),
        )
        .unwrap();

        assert!(matches!(
            &tracker.step("data_collection").unwrap().detail,
            Some(StepDetail::DataCollection { queries }) if queries.len() == 1 && queries[0].brand_mentioned
        ));
        assert!(matches!(
            &tracker.step("recommendations").unwrap().detail,
            Some(StepDetail::Recommendations { recommendations }) if recommendations.len() == 1
        ));
        let evaluation = tracker.step("evaluation").unwrap();
        assert_eq!(evaluation.results, Some(json!({"hypotheses_improved": 1})));
        assert_eq!(
            evaluation.detail,
            Some(StepDetail::Evaluation {
                evaluation_results: json!({"hypotheses_improved": 1})
            })
        );
        assert_eq!(
            tracker.step("synthesis").unwrap().detail,
            Some(StepDetail::Synthesis {
                summary: Some("Brand trails competitors".to_string())
            })
        );
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let (mut tracker, stale) = started();
        let current = tracker.start_analysis();

        assert_eq!(reconcile(&mut tracker, stale, &result_with(vec![])), None);
        assert!(tracker.steps().iter().all(|s| s.status == StepStatus::Pending));
        assert!(tracker.accepts_optimistic(current));
    }

    #[test]
    fn test_reconciliation_closes_optimistic_window() {
        let (mut tracker, generation) = started();
        reconcile(&mut tracker, generation, &result_with(vec![])).unwrap();

        assert!(tracker.is_reconciled());
        assert!(!tracker.apply_optimistic(
            generation,
            "data_collection",
            StepUpdate::status(StepStatus::Running)
        ));
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("web_search"), "Web Search");
        assert_eq!(humanize("x"), "X");
    }
}
