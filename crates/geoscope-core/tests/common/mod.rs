#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use geoscope_core::{
    models::{
        AnalysisRequest, CompareRequest, ComparisonResult, DomainVisibility, HealthResponse,
        HistoryResponse, Platform, QueryRecord, TraceEntry,
    },
    AnalysisForm, AnalysisResult, AnalysisService, ArchiveBuilder, GeoscopeError, ListHistory,
    Result,
};
use tempfile::TempDir;

/// What the scripted service answers to `analyze`.
pub enum Outcome {
    Succeed(AnalysisResult),
    Fail { status: u16, detail: String },
}

/// Analysis service double with a scripted answer.
pub struct ScriptedService {
    pub available: bool,
    pub outcome: Outcome,
    pub latency: Duration,
    pub requests: Mutex<Vec<AnalysisRequest>>,
    pub calls: AtomicUsize,
}

impl ScriptedService {
    pub fn succeeding(result: AnalysisResult) -> Self {
        Self::with_outcome(Outcome::Succeed(result))
    }

    pub fn failing(status: u16, detail: &str) -> Self {
        Self::with_outcome(Outcome::Fail {
            status,
            detail: detail.to_string(),
        })
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::succeeding(AnalysisResult::default())
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            available: true,
            outcome,
            latency: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisService for ScriptedService {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match &self.outcome {
            Outcome::Succeed(result) => Ok(AnalysisResult {
                request: request.clone(),
                ..result.clone()
            }),
            Outcome::Fail { status, detail } => Err(GeoscopeError::Remote {
                status: *status,
                detail: detail.clone(),
            }),
        }
    }

    async fn compare(&self, request: &CompareRequest) -> Result<ComparisonResult> {
        let mut result = ComparisonResult {
            query: request.query.clone(),
            comparison: request
                .domains
                .iter()
                .enumerate()
                .map(|(i, domain)| DomainVisibility {
                    domain: domain.clone(),
                    visibility_rate: 0.1 * (i + 1) as f64,
                    mentions: i as u32 + 1,
                    ..DomainVisibility::default()
                })
                .collect(),
            ..ComparisonResult::default()
        };
        result.rank();
        Ok(result)
    }

    async fn history(&self, _params: &ListHistory) -> Result<HistoryResponse> {
        Ok(HistoryResponse::default())
    }

    async fn health(&self) -> Result<HealthResponse> {
        Ok(HealthResponse {
            status: "healthy".to_string(),
            ..HealthResponse::default()
        })
    }
}

pub fn crm_form() -> AnalysisForm {
    AnalysisForm {
        query: "best CRM software for small business".to_string(),
        brand_domain: "hubspot.com".to_string(),
        competitors: "salesforce.com, zoho.com".to_string(),
        platforms: vec![Platform::Chatgpt, Platform::Perplexity],
        num_queries: 5,
    }
}

pub fn trace_entry(step: &str, status: &str, duration: f64) -> TraceEntry {
    TraceEntry {
        status: Some(status.to_string()),
        duration: Some(duration),
        ..TraceEntry::new(step)
    }
}

pub fn query_record(platform: &str, brand_mentioned: bool) -> QueryRecord {
    QueryRecord {
        platform: platform.to_string(),
        query: "best CRM software for small business".to_string(),
        brand_mentioned,
        ..QueryRecord::default()
    }
}

/// Result with the two-entry trace from the happy-path scenario.
pub fn two_step_result(id: &str) -> AnalysisResult {
    let mut collection = trace_entry("data_collection", "completed", 3.1);
    collection.queries_detail = Some(vec![
        query_record("chatgpt", true),
        query_record("perplexity", false),
    ]);

    AnalysisResult {
        id: id.to_string(),
        timestamp: "2024-05-01T12:30:45".to_string(),
        summary: "HubSpot is mentioned in half of the responses.".to_string(),
        reasoning_trace: vec![trace_entry("planning", "completed", 0.4), collection],
        ..AnalysisResult::default()
    }
}

/// Builds an archive in a fresh temporary directory.
pub async fn create_test_archive() -> (TempDir, geoscope_core::Archive) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let archive = ArchiveBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create archive");
    (temp_dir, archive)
}
