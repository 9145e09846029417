//! Collection wrapper types for displaying groups of domain objects.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    db::analysis_queries::ArchivedEntry,
    models::{HistoryEntry, StepStatus},
    tracker::ProgressSnapshot,
};

/// Step-by-step progress of one analysis attempt.
///
/// Once the attempt has been reconciled, steps the backend never reported on
/// are flagged.
pub struct ProgressView<'a>(pub &'a ProgressSnapshot);

impl fmt::Display for ProgressView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;
        if snapshot.steps.is_empty() {
            return writeln!(f, "No analysis started.");
        }

        writeln!(
            f,
            "## Analysis Progress ({}/{})",
            snapshot.finished_steps(),
            snapshot.steps.len()
        )?;
        writeln!(f)?;

        for step in &snapshot.steps {
            let unreported = snapshot.reconciled
                && step.kind.is_some()
                && step.status == StepStatus::Completed
                && step.reported_status.is_none();
            step.fmt_step(f, unreported)?;
        }
        Ok(())
    }
}

/// History rows returned by the analysis service.
pub struct HistoryEntries(pub Vec<HistoryEntry>);

impl HistoryEntries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for HistoryEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No analyses found.");
        }
        for entry in &self.0 {
            write!(f, "{entry}")?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// History rows from the local archive.
pub struct ArchivedEntries(pub Vec<ArchivedEntry>);

impl ArchivedEntries {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ArchivedEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No analyses found.");
        }
        for archived in &self.0 {
            write!(f, "{}", archived.entry)?;
            writeln!(f, "- Saved: {}", LocalDateTime(&archived.saved_at))?;
            writeln!(f)?;
        }
        Ok(())
    }
}
