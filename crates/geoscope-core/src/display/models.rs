//! Display implementations for domain models.
//!
//! Kept apart from the model definitions; every implementation writes
//! markdown.

use std::fmt;

use serde_json::Value;

use super::{datetime::ServiceTime, percent};
use crate::models::{
    AnalysisResult, AnalysisStep, ComparisonResult, EvaluationMetrics, HealthResponse,
    HistoryEntry, Hypothesis, QualityScores, QueryRecord, Recommendation, StepDetail,
    StepStatus, VisibilityScore,
};

/// Queries listed per data collection step before the rest are summarized.
const MAX_LISTED_QUERIES: usize = 10;

impl AnalysisStep {
    /// Writes the step, optionally flagging it as swept to completion without
    /// a backend report.
    pub(super) fn fmt_step(&self, f: &mut fmt::Formatter<'_>, unreported: bool) -> fmt::Result {
        writeln!(f, "### {} ({})", self.title, self.status.with_icon())?;
        writeln!(f)?;

        let mut meta = vec![format!("*{}*", self.subtitle)];
        if let Some(agent) = &self.agent_name {
            meta.push(format!("Agent: {agent}"));
        }
        if let Some(duration) = self.duration {
            meta.push(format!("{duration:.1}s"));
        }
        writeln!(f, "{}", meta.join(" · "))?;
        writeln!(f)?;

        if unreported {
            writeln!(f, "> Not reported by backend")?;
            writeln!(f)?;
        } else if let Some(reported) = &self.reported_status {
            if reported.parse::<StepStatus>().ok() != Some(self.status) {
                writeln!(f, "> Backend reported: {reported}")?;
                writeln!(f)?;
            }
        }

        if let Some(output) = self.llm_output.as_deref().filter(|o| !o.trim().is_empty()) {
            writeln!(f, "{output}")?;
            writeln!(f)?;
        }

        if let Some(detail) = &self.detail {
            fmt_detail(f, detail)?;
        }

        Ok(())
    }
}

impl fmt::Display for AnalysisStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_step(f, false)
    }
}

fn fmt_detail(f: &mut fmt::Formatter<'_>, detail: &StepDetail) -> fmt::Result {
    match detail {
        StepDetail::DataCollection { queries } if !queries.is_empty() => {
            writeln!(f, "#### Queries")?;
            writeln!(f)?;
            for record in queries.iter().take(MAX_LISTED_QUERIES) {
                write!(f, "{record}")?;
            }
            if queries.len() > MAX_LISTED_QUERIES {
                writeln!(f, "- … {} more", queries.len() - MAX_LISTED_QUERIES)?;
            }
            writeln!(f)
        }
        StepDetail::Hypothesis { hypotheses } if !hypotheses.is_empty() => {
            for hypothesis in hypotheses {
                writeln!(
                    f,
                    "- {} (confidence {})",
                    hypothesis.title,
                    percent(hypothesis.confidence)
                )?;
            }
            writeln!(f)
        }
        StepDetail::Recommendations { recommendations } if !recommendations.is_empty() => {
            for recommendation in recommendations {
                writeln!(
                    f,
                    "- [{}] {}",
                    recommendation.priority.as_str().to_uppercase(),
                    recommendation.title
                )?;
            }
            writeln!(f)
        }
        StepDetail::Evaluation { evaluation_results } => {
            if let Value::Object(fields) = evaluation_results {
                for (key, value) in fields {
                    writeln!(f, "- {key}: {}", compact(value))?;
                }
                writeln!(f)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Scalars as plain text, everything else as compact JSON.
fn compact(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for QueryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.brand_mentioned { "✓" } else { "✗" };
        write!(f, "- {mark} {}: \"{}\"", self.platform, self.query)?;
        if !self.competitors_mentioned.is_empty() {
            write!(f, " (competitors: {})", self.competitors_mentioned.join(", "))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (confidence {})", self.title, percent(self.confidence))?;
        writeln!(f)?;
        if !self.explanation.is_empty() {
            writeln!(f, "{}", self.explanation)?;
            writeln!(f)?;
        }
        for evidence in &self.supporting_evidence {
            writeln!(f, "- {evidence}")?;
        }
        if !self.supporting_evidence.is_empty() {
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} [{}]",
            self.title,
            self.priority.as_str().to_uppercase()
        )?;
        writeln!(f)?;
        if !self.description.is_empty() {
            writeln!(f, "{}", self.description)?;
            writeln!(f)?;
        }
        writeln!(
            f,
            "Impact {:.1} · Effort {:.1}",
            self.impact_score, self.effort_score
        )?;
        writeln!(f)?;
        for item in &self.action_items {
            writeln!(f, "- {item}")?;
        }
        if !self.action_items.is_empty() {
            writeln!(f)?;
        }
        if !self.expected_outcome.is_empty() {
            writeln!(f, "Expected outcome: {}", self.expected_outcome)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

fn fmt_score_row(f: &mut fmt::Formatter<'_>, score: &VisibilityScore, is_brand: bool) -> fmt::Result {
    let domain = if is_brand {
        format!("**{}**", score.domain)
    } else {
        score.domain.clone()
    };
    let position = score
        .avg_position
        .map_or_else(|| "-".to_string(), |p| format!("{p:.1}"));
    writeln!(
        f,
        "| {domain} | {} | {} | {position} |",
        score.total_mentions,
        percent(score.mention_rate)
    )
}

fn fmt_quality(f: &mut fmt::Formatter<'_>, label: &str, scores: &QualityScores) -> fmt::Result {
    writeln!(
        f,
        "- {label}: {} evaluated, average quality {:.2}, {} improved",
        scores.total_evaluated, scores.average_quality_score, scores.improvements_made
    )
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.evaluation_performed {
            return writeln!(f, "Evaluation was not performed.");
        }
        if let Some(scores) = &self.hypotheses {
            fmt_quality(f, "Hypotheses", scores)?;
        }
        if let Some(scores) = &self.recommendations {
            fmt_quality(f, "Recommendations", scores)?;
        }
        Ok(())
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scores = &self.visibility_scores;
        writeln!(f, "# Visibility Report: {}", self.request.brand_domain)?;
        writeln!(f)?;

        writeln!(f, "- Query: {}", self.request.query)?;
        writeln!(f, "- Analysis ID: {}", self.id)?;
        if !self.timestamp.is_empty() {
            writeln!(f, "- Timestamp: {}", ServiceTime(&self.timestamp))?;
        }
        if !self.request.platforms.is_empty() {
            let platforms: Vec<&str> = self.request.platforms.iter().map(|p| p.as_str()).collect();
            writeln!(f, "- Platforms: {}", platforms.join(", "))?;
        }
        writeln!(f, "- Citations collected: {}", self.citations.len())?;

        writeln!(f, "\n## Visibility")?;
        writeln!(f)?;
        writeln!(f, "| Domain | Mentions | Mention rate | Avg position |")?;
        writeln!(f, "|:-|-:|-:|-:|")?;
        fmt_score_row(f, &scores.brand_score, true)?;
        for competitor in &scores.competitor_scores {
            fmt_score_row(f, competitor, false)?;
        }
        writeln!(f)?;
        writeln!(f, "Visibility gap: {}", percent(scores.visibility_gap))?;
        if let Some(top) = &scores.top_competitor {
            writeln!(f, "Top competitor: {top}")?;
        }

        if !self.summary.is_empty() {
            writeln!(f, "\n## Summary")?;
            writeln!(f)?;
            writeln!(f, "{}", self.summary)?;
        }

        if !self.hypotheses.is_empty() {
            writeln!(f, "\n## Hypotheses")?;
            writeln!(f)?;
            for (i, hypothesis) in self.hypotheses.iter().enumerate() {
                write!(f, "### {}. {hypothesis}", i + 1)?;
            }
        }

        if !self.recommendations.is_empty() {
            writeln!(f, "\n## Recommendations")?;
            writeln!(f)?;
            for (i, recommendation) in self.recommendations.iter().enumerate() {
                write!(f, "### {}. {recommendation}", i + 1)?;
            }
        }

        if let Some(metrics) = self.evaluation_metrics.as_ref().filter(|m| !m.is_empty()) {
            writeln!(f, "\n## Quality Evaluation")?;
            writeln!(f)?;
            write!(f, "{metrics}")?;
        }

        if !self.errors.is_empty() {
            writeln!(f, "\n## Errors")?;
            writeln!(f)?;
            for error in &self.errors {
                writeln!(f, "- {}", compact(error))?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Comparison: {}", self.query)?;
        writeln!(f)?;

        if self.comparison.is_empty() {
            writeln!(f, "No domains compared.")?;
        } else {
            writeln!(f, "| Rank | Domain | Visibility | Mentions |")?;
            writeln!(f, "|-:|:-|-:|-:|")?;
            for (i, domain) in self.comparison.iter().enumerate() {
                writeln!(
                    f,
                    "| {} | {} | {} | {} |",
                    i + 1,
                    domain.domain,
                    percent(domain.visibility_rate),
                    domain.mentions
                )?;
            }
        }

        if let Some(winner) = &self.winner {
            writeln!(f)?;
            writeln!(f, "Winner: **{winner}**")?;
        }

        if let Some(analysis) = &self.full_analysis {
            if !analysis.summary.is_empty() {
                writeln!(f, "\n## Summary")?;
                writeln!(f)?;
                writeln!(f, "{}", analysis.summary)?;
            }
            if !analysis.recommendations.is_empty() {
                writeln!(f, "\n## Recommendations")?;
                writeln!(f)?;
                for recommendation in &analysis.recommendations {
                    writeln!(
                        f,
                        "- [{}] {}",
                        recommendation.priority.as_str().to_uppercase(),
                        recommendation.title
                    )?;
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} ({})", self.query, self.brand)?;
        writeln!(f)?;
        writeln!(f, "- ID: {}", self.analysis_id)?;
        if !self.timestamp.is_empty() {
            writeln!(f, "- Analyzed: {}", ServiceTime(&self.timestamp))?;
        }
        writeln!(f, "- Visibility: {}", percent(self.visibility_rate))?;
        writeln!(
            f,
            "- Insights: {} hypotheses, {} recommendations",
            self.num_hypotheses, self.num_recommendations
        )
    }
}

impl fmt::Display for HealthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Status: {}", self.status)?;
        if !self.version.is_empty() {
            writeln!(f, "- Version: {}", self.version)?;
        }
        for (service, up) in &self.services {
            writeln!(f, "- {service}: {}", if *up { "✓" } else { "✗" })?;
        }
        Ok(())
    }
}
