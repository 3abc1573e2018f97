use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisKind, Verdict};

/// Statistics about a monitoring session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorStats {
    /// Total analyses recorded across all three capture kinds
    pub total_analyses: u64,

    /// How many of those analyses reported a violation
    pub violations_detected: u64,

    /// When the most recent analysis was recorded
    pub last_analysis: Option<DateTime<Utc>>,
}

/// A single recorded violation, append-only for the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// Which capture cadence produced this analysis
    pub kind: AnalysisKind,

    /// The verdict as received from the backend
    pub verdict: Verdict,

    /// When the violation was recorded
    pub timestamp: DateTime<Utc>,
}
