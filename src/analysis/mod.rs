pub mod client;
pub mod verdict;

pub use client::AnalysisClient;
pub use verdict::{AnalysisKind, RiskLevel, SessionSummary, Verdict};
