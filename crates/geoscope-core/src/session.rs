//! The request flow behind one analysis page.
//!
//! An [`AnalysisSession`] validates the form, starts a new tracker attempt,
//! fires the optimistic progress routine, awaits the service and finally
//! reconciles the tracker with the returned trace. Every tracker change is
//! published as a [`ProgressSnapshot`] on a `watch` channel.

use std::{sync::Arc, time::Duration};

use log::{debug, info, warn};
use tokio::sync::{watch, Mutex};

use crate::{
    archive::Archive,
    client::AnalysisService,
    config::ConnectionMode,
    error::{GeoscopeError, Result},
    models::{
        AnalysisRequest, AnalysisResult, CompareRequest, ComparisonResult, HealthResponse,
        HistoryResponse, StepStatus, StepUpdate,
    },
    params::{AnalysisForm, CompareForm, ListHistory},
    reconcile::reconcile,
    tracker::{Generation, ProgressSnapshot, ProgressTracker},
};

/// How long the optimistic routine pretends planning takes.
pub const PLANNING_DELAY: Duration = Duration::from_millis(500);

/// Drives analyses against an [`AnalysisService`].
pub struct AnalysisSession<S> {
    service: S,
    tracker: Arc<Mutex<ProgressTracker>>,
    progress: Arc<watch::Sender<ProgressSnapshot>>,
    archive: Option<Archive>,
    planning_delay: Duration,
    last_result: Option<AnalysisResult>,
    last_error: Option<String>,
}

impl<S: AnalysisService> AnalysisSession<S> {
    pub fn new(service: S) -> Self {
        let (progress, _) = watch::channel(ProgressSnapshot::default());
        Self {
            service,
            tracker: Arc::new(Mutex::new(ProgressTracker::new())),
            progress: Arc::new(progress),
            archive: None,
            planning_delay: PLANNING_DELAY,
            last_result: None,
            last_error: None,
        }
    }

    /// Keeps a copy of every completed analysis in `archive`.
    pub fn with_archive(mut self, archive: Archive) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Overrides the simulated planning time.
    pub fn with_planning_delay(mut self, delay: Duration) -> Self {
        self.planning_delay = delay;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn archive(&self) -> Option<&Archive> {
        self.archive.as_ref()
    }

    /// Shared handle to the tracker, for observers that need more than snapshots.
    pub fn tracker(&self) -> Arc<Mutex<ProgressTracker>> {
        Arc::clone(&self.tracker)
    }

    /// Receives a snapshot after every tracker change.
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.progress.subscribe()
    }

    pub async fn snapshot(&self) -> ProgressSnapshot {
        self.tracker.lock().await.snapshot()
    }

    pub fn last_result(&self) -> Option<&AnalysisResult> {
        self.last_result.as_ref()
    }

    /// Message of the most recent failure, cleared when a new attempt starts.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Runs one analysis end to end.
    ///
    /// # Errors
    ///
    /// Returns `GeoscopeError::InvalidInput` if the form does not validate; the
    /// tracker is left untouched.
    /// Returns `GeoscopeError::BackendUnavailable` in demo mode, also before
    /// the tracker is touched.
    /// Returns the service's error if the request fails; the tracker keeps the
    /// step states it had reached and the message is kept in
    /// [`last_error`](Self::last_error).
    pub async fn run_analysis(&mut self, form: AnalysisForm) -> Result<AnalysisResult> {
        let request = AnalysisRequest::try_from(form)?;

        if !self.service.is_available() {
            let err = GeoscopeError::backend_unavailable(ConnectionMode::Demo.message());
            self.last_error = Some(err.user_message());
            return Err(err);
        }

        let generation = {
            let mut tracker = self.tracker.lock().await;
            let generation = tracker.start_analysis();
            publish(&self.progress, &tracker);
            generation
        };
        self.last_result = None;
        self.last_error = None;

        info!(
            "Analyzing '{}' for {} (attempt {generation})",
            request.query, request.brand_domain
        );
        tokio::spawn(optimistic_progress(
            Arc::clone(&self.tracker),
            Arc::clone(&self.progress),
            generation,
            self.planning_delay,
            planning_narrative(&request),
        ));

        match self.service.analyze(&request).await {
            Ok(result) => {
                {
                    let mut tracker = self.tracker.lock().await;
                    if let Some(report) = reconcile(&mut tracker, generation, &result) {
                        debug!("Reconciliation of {}: {report:?}", result.id);
                    }
                    tracker.complete_analysis();
                    publish(&self.progress, &tracker);
                }

                if let Some(archive) = &self.archive {
                    if let Err(e) = archive.save(&result).await {
                        warn!("Failed to archive analysis {}: {e}", result.id);
                    }
                }

                self.last_result = Some(result.clone());
                Ok(result)
            }
            Err(err) => {
                {
                    let mut tracker = self.tracker.lock().await;
                    tracker.settle(generation);
                    tracker.complete_analysis();
                    publish(&self.progress, &tracker);
                }
                warn!("Analysis attempt {generation} failed: {err}");
                self.last_error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Compares several domains for one query.
    pub async fn compare(&self, form: CompareForm) -> Result<ComparisonResult> {
        let request = CompareRequest::try_from(form)?;
        self.service.compare(&request).await
    }

    /// Lists analyses stored by the service.
    pub async fn history(&self, params: ListHistory) -> Result<HistoryResponse> {
        self.service.history(&params).await
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.service.health().await
    }
}

fn publish(progress: &watch::Sender<ProgressSnapshot>, tracker: &ProgressTracker) {
    progress.send_replace(tracker.snapshot());
}

fn planning_narrative(request: &AnalysisRequest) -> String {
    format!(
        "Strategy created: Testing {} query variations across {} platforms",
        request.num_queries,
        request.platforms.len()
    )
}

/// Guesses early step transitions while the service is still working.
async fn optimistic_progress(
    tracker: Arc<Mutex<ProgressTracker>>,
    progress: Arc<watch::Sender<ProgressSnapshot>>,
    generation: Generation,
    delay: Duration,
    narrative: String,
) {
    let write = |step_id: &'static str, update: StepUpdate| {
        let tracker = Arc::clone(&tracker);
        let progress = Arc::clone(&progress);
        async move {
            let mut tracker = tracker.lock().await;
            let applied = tracker.apply_optimistic(generation, step_id, update);
            if applied {
                publish(&progress, &tracker);
            }
            applied
        }
    };

    if !write("planning", StepUpdate::status(StepStatus::Running)).await {
        return;
    }

    tokio::time::sleep(delay).await;

    let planned = StepUpdate::status(StepStatus::Completed)
        .with_duration(delay.as_secs_f64())
        .with_llm_output(narrative);
    if write("planning", planned).await {
        write("data_collection", StepUpdate::status(StepStatus::Running)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Platform, StepKind};

    #[test]
    fn test_planning_narrative() {
        let request = AnalysisRequest {
            query: "best CRM".to_string(),
            brand_domain: "hubspot.com".to_string(),
            competitors: vec![],
            platforms: vec![Platform::Chatgpt, Platform::Perplexity],
            num_queries: 5,
        };
        assert_eq!(
            planning_narrative(&request),
            "Strategy created: Testing 5 query variations across 2 platforms"
        );
    }

    #[tokio::test]
    async fn test_optimistic_progress_sequence() {
        let tracker = Arc::new(Mutex::new(ProgressTracker::new()));
        let (progress, receiver) = watch::channel(ProgressSnapshot::default());
        let generation = tracker.lock().await.start_analysis();

        optimistic_progress(
            Arc::clone(&tracker),
            Arc::new(progress),
            generation,
            Duration::from_millis(1),
            "Strategy created".to_string(),
        )
        .await;

        let tracker = tracker.lock().await;
        let planning = tracker.step(StepKind::Planning.as_str()).unwrap();
        assert_eq!(planning.status, StepStatus::Completed);
        assert_eq!(planning.llm_output.as_deref(), Some("Strategy created"));
        assert_eq!(
            tracker.step("data_collection").unwrap().status,
            StepStatus::Running
        );
        assert_eq!(receiver.borrow().running_step().map(|s| s.id.as_str()), Some("data_collection"));
    }

    #[tokio::test]
    async fn test_optimistic_progress_stops_for_stale_attempt() {
        let tracker = Arc::new(Mutex::new(ProgressTracker::new()));
        let (progress, _receiver) = watch::channel(ProgressSnapshot::default());
        let stale = tracker.lock().await.start_analysis();
        tracker.lock().await.start_analysis();

        optimistic_progress(
            Arc::clone(&tracker),
            Arc::new(progress),
            stale,
            Duration::from_millis(1),
            String::new(),
        )
        .await;

        let tracker = tracker.lock().await;
        assert!(tracker.steps().iter().all(|s| s.status == StepStatus::Pending));
    }
}
