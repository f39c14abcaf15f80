//! Workflow stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position in the extract → analyze pipeline.
///
/// Failures from `Extracting` or `Analyzing` fall back to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStage {
    #[default]
    Idle,
    Extracting,
    Extracted,
    Analyzing,
    Analyzed,
}

impl WorkflowStage {
    /// Whether a service call is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Extracting | Self::Analyzing)
    }

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::Extracted => "extracted",
            Self::Analyzing => "analyzing",
            Self::Analyzed => "analyzed",
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
