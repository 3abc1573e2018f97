//! Exam session monitoring
//!
//! This module provides the `SessionMonitor` coordinator that manages:
//! - Periodic webcam still-frame capture and upload
//! - Rolling microphone segment capture and upload
//! - Combined multimodal analysis on its own cadence
//! - Violation bookkeeping and UI surfacing

mod alerts;
mod config;
mod monitor;
mod stats;

pub use alerts::{UiSink, UiState, ViolationAlert};
pub use config::MonitorConfig;
pub use monitor::SessionMonitor;
pub use stats::{MonitorStats, ViolationRecord};
