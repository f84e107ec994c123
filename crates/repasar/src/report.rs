//! Run report: ordered per-step outcomes aggregated over the walkthrough.
//!
//! Best-effort milestone capture means a step may be skipped (expected control
//! absent) or fail (timeout, evaluation error) without halting the run; the
//! report is where those outcomes land instead of being swallowed.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Outcome status of a single walkthrough step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// All milestone screenshots for the step were captured
    Captured,
    /// An expected control was absent; logged and skipped
    Skipped,
    /// The step hit an error mid-flight
    Failed,
}

/// Result of one named walkthrough step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Step name
    pub name: String,
    /// Outcome status
    pub status: StepStatus,
    /// Artifact files the step produced (debug captures included)
    pub artifacts: Vec<PathBuf>,
    /// Absence note or error message
    pub detail: Option<String>,
    /// Step duration
    pub duration: Duration,
}

impl StepOutcome {
    /// Create a captured outcome
    #[must_use]
    pub fn captured(name: impl Into<String>, artifacts: Vec<PathBuf>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Captured,
            artifacts,
            detail: None,
            duration,
        }
    }

    /// Create a skipped outcome; `artifacts` holds any debug capture
    #[must_use]
    pub fn skipped(
        name: impl Into<String>,
        detail: impl Into<String>,
        artifacts: Vec<PathBuf>,
        duration: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Skipped,
            artifacts,
            detail: Some(detail.into()),
            duration,
        }
    }

    /// Create a failed outcome; `artifacts` holds whatever the step wrote
    /// before it errored, so the report stays a complete ledger of the
    /// files on disk.
    #[must_use]
    pub fn failed(
        name: impl Into<String>,
        error: impl Into<String>,
        artifacts: Vec<PathBuf>,
        duration: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Failed,
            artifacts,
            detail: Some(error.into()),
            duration,
        }
    }
}

/// Aggregated walkthrough report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    /// Ordered step outcomes
    pub steps: Vec<StepOutcome>,
}

impl RunReport {
    /// Create an empty report
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step outcome
    pub fn push(&mut self, outcome: StepOutcome) {
        self.steps.push(outcome);
    }

    /// Number of captured steps
    #[must_use]
    pub fn captured(&self) -> usize {
        self.count(StepStatus::Captured)
    }

    /// Number of skipped steps
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(StepStatus::Skipped)
    }

    /// Number of failed steps
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(StepStatus::Failed)
    }

    /// Whether every step captured its milestones
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.steps
            .iter()
            .all(|s| s.status == StepStatus::Captured)
    }

    /// Ordered artifact paths across all steps
    #[must_use]
    pub fn artifacts(&self) -> Vec<&Path> {
        self.steps
            .iter()
            .flat_map(|s| s.artifacts.iter().map(PathBuf::as_path))
            .collect()
    }

    /// One-line-per-step human-readable summary
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            let tag = match step.status {
                StepStatus::Captured => "captured",
                StepStatus::Skipped => "skipped",
                StepStatus::Failed => "FAILED",
            };
            out.push_str(&format!(
                "{:<22} {:<8} {} artifact(s)",
                step.name,
                tag,
                step.artifacts.len()
            ));
            if let Some(ref detail) = step.detail {
                out.push_str(&format!(" - {detail}"));
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "{} captured, {} skipped, {} failed, {} artifact(s)",
            self.captured(),
            self.skipped(),
            self.failed(),
            self.artifacts().len()
        ));
        out
    }

    fn count(&self, status: StepStatus) -> usize {
        self.steps.iter().filter(|s| s.status == status).count()
    }
}
