use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::capture::CaptureConfig;

/// Configuration for a session monitor
///
/// The cadences are fixed by the proctoring protocol; the defaults are the
/// protocol values and are only overridden by tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Unique session identifier (e.g., "exam-2026-08-24-finals")
    pub session_id: String,

    /// Base URL of the analysis backend
    pub backend_url: String,

    /// Still-frame capture cadence
    pub image_interval: Duration,

    /// Audio segment flush cadence (recording cap + gap)
    pub audio_interval: Duration,

    /// Maximum recorded duration per audio segment
    pub segment_cap: Duration,

    /// Combined image+audio analysis cadence
    pub multimodal_interval: Duration,

    /// How long a violation alert stays visible
    pub alert_dismiss: Duration,

    /// How long the start confirmation banner stays visible
    pub banner_dismiss: Duration,

    /// Capture source settings
    #[serde(skip)]
    pub capture: CaptureConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            session_id: format!("exam-{}", uuid::Uuid::new_v4()),
            backend_url: "http://localhost:8080".to_string(),
            image_interval: Duration::from_secs(15),
            audio_interval: Duration::from_secs(22), // 20s recording + 2s gap
            segment_cap: Duration::from_secs(20),
            multimodal_interval: Duration::from_secs(45),
            alert_dismiss: Duration::from_secs(8),
            banner_dismiss: Duration::from_secs(3),
            capture: CaptureConfig::default(),
        }
    }
}
