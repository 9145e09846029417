//! Response payloads returned by the analysis service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{AnalysisRequest, Priority, QueryRecord};

/// Citation data for one query on one platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitationData {
    pub query: String,
    pub platform: String,
    pub brand_mentioned: bool,
    #[serde(default)]
    pub citation_position: Option<u32>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub competitors_mentioned: Vec<String>,
    #[serde(default)]
    pub raw_response: String,
}

/// Visibility metrics for one domain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VisibilityScore {
    pub domain: String,
    #[serde(default)]
    pub total_mentions: u32,
    /// Share of responses that mention the domain, in `[0, 1]`
    #[serde(default)]
    pub mention_rate: f64,
    #[serde(default)]
    pub avg_position: Option<f64>,
    /// Mentions per platform
    #[serde(default)]
    pub platforms: BTreeMap<String, u32>,
}

/// Brand score next to every competitor's score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CompetitorComparison {
    #[serde(default)]
    pub brand_score: VisibilityScore,
    #[serde(default)]
    pub competitor_scores: Vec<VisibilityScore>,
    #[serde(default)]
    pub visibility_gap: f64,
    #[serde(default)]
    pub top_competitor: Option<String>,
}

/// Causal explanation for a visibility pattern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Hypothesis {
    pub title: String,
    #[serde(default)]
    pub explanation: String,
    /// Confidence in `[0, 1]`
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, alias = "evidence")]
    pub supporting_evidence: Vec<String>,
}

/// Actionable recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Recommendation {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub impact_score: f64,
    #[serde(default)]
    pub effort_score: f64,
    #[serde(default)]
    pub action_items: Vec<String>,
    #[serde(default)]
    pub expected_outcome: String,
}

/// One agent's self-reported execution record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TraceEntry {
    /// Backend stage label, e.g. `hypothesis_generation`
    pub step: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_steps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queries_detail: Option<Vec<QueryRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypotheses_detail: Option<Vec<Hypothesis>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations_detail: Option<Vec<Recommendation>>,
    /// Fields this client does not interpret (timestamps, inputs, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TraceEntry {
    /// Creates an entry with only the stage label set.
    pub fn new(step: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            ..Self::default()
        }
    }
}

/// Quality scores for one class of generated output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct QualityScores {
    #[serde(default)]
    pub total_evaluated: u32,
    #[serde(default)]
    pub average_quality_score: f64,
    #[serde(default)]
    pub improvements_made: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Self-critique results produced by the evaluation stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EvaluationMetrics {
    #[serde(default)]
    pub evaluation_performed: bool,
    #[serde(default)]
    pub hypotheses: Option<QualityScores>,
    #[serde(default)]
    pub recommendations: Option<QualityScores>,
    #[serde(default)]
    pub reflexion_stats: Option<Value>,
}

impl EvaluationMetrics {
    pub fn is_empty(&self) -> bool {
        !self.evaluation_performed && self.hypotheses.is_none() && self.recommendations.is_none()
    }
}

/// Authoritative result of one analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AnalysisResult {
    #[serde(default)]
    pub id: String,
    /// ISO-8601 timestamp as sent by the service
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub request: AnalysisRequest,
    #[serde(default)]
    pub citations: Vec<CitationData>,
    #[serde(default)]
    pub visibility_scores: CompetitorComparison,
    #[serde(default)]
    pub hypotheses: Vec<Hypothesis>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub reasoning_trace: Vec<TraceEntry>,
    #[serde(default)]
    pub step_timings: BTreeMap<String, f64>,
    #[serde(default)]
    pub errors: Vec<Value>,
    #[serde(default)]
    pub evaluation_metrics: Option<EvaluationMetrics>,
}

/// Visibility of one domain in a comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DomainVisibility {
    pub domain: String,
    #[serde(default)]
    pub visibility_rate: f64,
    #[serde(default)]
    pub mentions: u32,
    #[serde(default)]
    pub platforms: BTreeMap<String, u32>,
}

/// Condensed analysis attached to a comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ComparisonAnalysis {
    #[serde(default)]
    pub hypotheses: Vec<Hypothesis>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub summary: String,
}

/// Result of `POST /compare`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ComparisonResult {
    pub query: String,
    #[serde(default)]
    pub comparison: Vec<DomainVisibility>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub full_analysis: Option<ComparisonAnalysis>,
}

impl ComparisonResult {
    /// Sorts domains by visibility rate, highest first, and refreshes the winner.
    pub fn rank(&mut self) {
        self.comparison
            .sort_by(|a, b| b.visibility_rate.total_cmp(&a.visibility_rate));
        self.winner = self.comparison.first().map(|d| d.domain.clone());
    }
}

/// Summary row for a past analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HistoryEntry {
    pub analysis_id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub visibility_rate: f64,
    #[serde(default)]
    pub num_hypotheses: u32,
    #[serde(default)]
    pub num_recommendations: u32,
}

impl From<&AnalysisResult> for HistoryEntry {
    fn from(result: &AnalysisResult) -> Self {
        HistoryEntry {
            analysis_id: result.id.clone(),
            timestamp: result.timestamp.clone(),
            query: result.request.query.clone(),
            brand: result.request.brand_domain.clone(),
            visibility_rate: result.visibility_scores.brand_score.mention_rate,
            num_hypotheses: saturating_count(result.hypotheses.len()),
            num_recommendations: saturating_count(result.recommendations.len()),
        }
    }
}

pub(crate) fn saturating_count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Result of `GET /history`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HistoryResponse {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub analyses: Vec<HistoryEntry>,
}

/// Result of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub services: BTreeMap<String, bool>,
}
