//! Analysis step model and its per-kind payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Hypothesis, Recommendation, StepKind, StepStatus, StepUpdate};

/// One platform query issued during data collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct QueryRecord {
    pub platform: String,
    pub query: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub brand_mentioned: bool,
    #[serde(default)]
    pub competitors_mentioned: Vec<String>,
    /// Citation context, only reported by platforms that cite sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<String>,
}

/// Kind-specific payload attached to a step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepDetail {
    Planning,
    DataCollection {
        #[serde(default)]
        queries: Vec<QueryRecord>,
    },
    Analysis,
    Hypothesis {
        #[serde(default)]
        hypotheses: Vec<Hypothesis>,
    },
    Recommendations {
        #[serde(default)]
        recommendations: Vec<Recommendation>,
    },
    Evaluation {
        evaluation_results: Value,
    },
    Synthesis {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        summary: Option<String>,
    },
}

impl StepDetail {
    /// The step kind this payload belongs to.
    pub fn kind(&self) -> StepKind {
        match self {
            StepDetail::Planning => StepKind::Planning,
            StepDetail::DataCollection { .. } => StepKind::DataCollection,
            StepDetail::Analysis => StepKind::Analysis,
            StepDetail::Hypothesis { .. } => StepKind::Hypothesis,
            StepDetail::Recommendations { .. } => StepKind::Recommendations,
            StepDetail::Evaluation { .. } => StepKind::Evaluation,
            StepDetail::Synthesis { .. } => StepKind::Synthesis,
        }
    }
}

/// Represents one stage of the remote analysis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisStep {
    /// Stable identifier, unique within an attempt
    pub id: String,

    /// Pipeline stage; `None` for steps created from unrecognized backend labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<StepKind>,

    pub title: String,
    pub subtitle: String,

    /// Name of the agent responsible for this step, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,

    pub description: String,

    pub status: StepStatus,

    /// Elapsed seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Narrative produced by the step's agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_output: Option<String>,

    /// Free-form output reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,

    /// Raw status string the backend reported for this step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<StepDetail>,
}

impl AnalysisStep {
    /// Creates a pending step with no payload.
    pub fn pending(
        id: impl Into<String>,
        kind: Option<StepKind>,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            subtitle: subtitle.into(),
            agent_name: None,
            description: description.into(),
            status: StepStatus::Pending,
            duration: None,
            llm_output: None,
            results: None,
            reported_status: None,
            detail: None,
        }
    }

    /// Sets the agent responsible for the step.
    pub fn with_agent(mut self, agent_name: impl Into<String>) -> Self {
        self.agent_name = Some(agent_name.into());
        self
    }

    /// Merges a partial update. Fields the update leaves unset are kept.
    pub fn apply(&mut self, update: StepUpdate) {
        let StepUpdate {
            status,
            duration,
            llm_output,
            results,
            reported_status,
            detail,
        } = update;

        if let Some(status) = status {
            self.status = status;
        }
        if duration.is_some() {
            self.duration = duration;
        }
        if llm_output.is_some() {
            self.llm_output = llm_output;
        }
        if results.is_some() {
            self.results = results;
        }
        if reported_status.is_some() {
            self.reported_status = reported_status;
        }
        if detail.is_some() {
            self.detail = detail;
        }
    }

    /// Whether anything beyond the template has been attached to this step.
    pub fn has_payload(&self) -> bool {
        self.duration.is_some()
            || self.llm_output.is_some()
            || self.results.is_some()
            || self.detail.is_some()
    }
}
