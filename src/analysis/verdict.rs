use serde::{Deserialize, Serialize};

/// Which capture cadence produced an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisKind {
    Image,
    Audio,
    Multimodal,
}

impl AnalysisKind {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::Image => "Image Analysis",
            AnalysisKind::Audio => "Audio Analysis",
            AnalysisKind::Multimodal => "Multimodal Analysis",
        }
    }
}

/// Risk level reported by the analysis backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Analysis result from the backend
///
/// External, untrusted input: every field is optional and a missing or
/// malformed value degrades to a default at the point of use instead of
/// failing the whole response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(default)]
    pub violation: Option<bool>,

    /// Confidence 0-100
    #[serde(default)]
    pub confidence: Option<i64>,

    #[serde(rename = "riskLevel", default)]
    pub risk_level: Option<RiskLevel>,

    #[serde(default)]
    pub issues: Option<String>,

    #[serde(default)]
    pub recommendation: Option<String>,
}

impl Verdict {
    pub fn is_violation(&self) -> bool {
        self.violation.unwrap_or(false)
    }

    /// Confidence clamped to 0-100, default 0
    pub fn confidence_pct(&self) -> u8 {
        self.confidence.unwrap_or(0).clamp(0, 100) as u8
    }

    pub fn risk_level_or_default(&self) -> RiskLevel {
        self.risk_level.unwrap_or(RiskLevel::Medium)
    }

    /// Human-readable detail: issues, else recommendation, else a stock line
    pub fn detail(&self) -> &str {
        self.issues
            .as_deref()
            .or(self.recommendation.as_deref())
            .unwrap_or("Suspicious activity detected")
    }
}

/// Aggregate server-side summary for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(rename = "totalAnalyses", default)]
    pub total_analyses: u64,

    #[serde(rename = "violationCount", default)]
    pub violation_count: u64,

    #[serde(rename = "overallRisk", default)]
    pub overall_risk: Option<RiskLevel>,

    #[serde(rename = "needsReview", default)]
    pub needs_review: bool,
}

impl SessionSummary {
    /// One-line rendering for logs and the CLI
    pub fn render(&self) -> String {
        format!(
            "analyses={} violations={} risk={} review={}",
            self.total_analyses,
            self.violation_count,
            self.overall_risk.map(|r| r.as_str()).unwrap_or("UNKNOWN"),
            if self.needs_review { "yes" } else { "no" }
        )
    }
}
