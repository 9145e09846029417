//! Enumerations shared by steps, requests and results.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of step statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step has not started yet
    #[default]
    Pending,

    /// Step is being executed by the backend
    Running,

    /// Step finished
    Completed,

    /// Step failed or only partially succeeded
    Error,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "running" | "in_progress" | "inprogress" => Ok(StepStatus::Running),
            "completed" | "complete" | "done" | "success" => Ok(StepStatus::Completed),
            "error" | "failed" | "failure" | "partial_failure" => Ok(StepStatus::Error),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StepStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Error => "error",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geoscope_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(StepStatus::Running.with_icon(), "➤ Running");
    /// assert_eq!(StepStatus::Pending.with_icon(), "○ Pending");
    /// assert_eq!(StepStatus::Error.with_icon(), "✗ Error");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Completed => "✓ Completed",
            StepStatus::Running => "➤ Running",
            StepStatus::Pending => "○ Pending",
            StepStatus::Error => "✗ Error",
        }
    }

    /// Whether the step has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Error)
    }
}

/// The fixed set of pipeline stages the tracker knows about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Planning,
    DataCollection,
    Analysis,
    Hypothesis,
    Recommendations,
    Evaluation,
    Synthesis,
}

impl StepKind {
    /// All kinds in pipeline order.
    pub const ALL: [StepKind; 7] = [
        StepKind::Planning,
        StepKind::DataCollection,
        StepKind::Analysis,
        StepKind::Hypothesis,
        StepKind::Recommendations,
        StepKind::Evaluation,
        StepKind::Synthesis,
    ];

    /// Tracker step identifier for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Planning => "planning",
            StepKind::DataCollection => "data_collection",
            StepKind::Analysis => "analysis",
            StepKind::Hypothesis => "hypothesis",
            StepKind::Recommendations => "recommendations",
            StepKind::Evaluation => "evaluation",
            StepKind::Synthesis => "synthesis",
        }
    }

    /// Look up a kind by tracker step identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == id)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AI platforms the service can query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Chatgpt,
    Perplexity,
    Claude,
    GoogleAi,
}

impl Platform {
    /// Platforms selected when the user does not choose any explicitly.
    pub const DEFAULTS: [Platform; 2] = [Platform::Chatgpt, Platform::Perplexity];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Chatgpt => "chatgpt",
            Platform::Perplexity => "perplexity",
            Platform::Claude => "claude",
            Platform::GoogleAi => "google_ai",
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chatgpt" => Ok(Platform::Chatgpt),
            "perplexity" => Ok(Platform::Perplexity),
            "claude" => Ok(Platform::Claude),
            "google_ai" | "google-ai" | "googleai" => Ok(Platform::GoogleAi),
            _ => Err(format!("Invalid platform: {s}")),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommendation priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
