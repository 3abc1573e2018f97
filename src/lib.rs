pub mod analysis;
pub mod capture;
pub mod config;
pub mod monitor;

pub use analysis::{AnalysisClient, AnalysisKind, RiskLevel, SessionSummary, Verdict};
pub use capture::{
    AudioBackend, AudioBackendFactory, AudioFrame, AudioSegment, CaptureConfig, SegmentRecorder,
    SyntheticAudioBackend, SyntheticVideoSource, VideoFrame, VideoSource,
};
pub use config::Config;
pub use monitor::{
    MonitorConfig, MonitorStats, SessionMonitor, UiSink, UiState, ViolationAlert, ViolationRecord,
};
