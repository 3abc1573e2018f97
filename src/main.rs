use anyhow::Result;
use clap::Parser;
use exam_monitor::{
    AudioBackend, CaptureConfig, Config, MonitorConfig, SessionMonitor, SyntheticAudioBackend,
    SyntheticVideoSource, UiState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Run an exam monitoring session against the analysis backend using
/// synthetic capture sources.
#[derive(Parser, Debug)]
#[command(name = "exam-monitor", version)]
struct Args {
    /// Config file (e.g. config/exam-monitor.toml)
    #[arg(long)]
    config: Option<String>,

    /// Session identifier (generated when omitted)
    #[arg(long)]
    session_id: Option<String>,

    /// Analysis backend base URL (overrides config)
    #[arg(long)]
    backend_url: Option<String>,

    /// How long to monitor before stopping, in seconds
    #[arg(long, default_value_t = 60)]
    duration_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut monitor_config = MonitorConfig::default();

    if let Some(path) = &args.config {
        let cfg = Config::load(path)?;
        info!("Loaded config: {}", cfg.service.name);
        monitor_config.backend_url = cfg.backend.base_url;
        monitor_config.capture = CaptureConfig {
            sample_rate: cfg.capture.sample_rate,
            channels: cfg.capture.channels,
            jpeg_quality: cfg.capture.jpeg_quality,
        };
    }

    if let Some(url) = args.backend_url {
        monitor_config.backend_url = url;
    }
    if let Some(session_id) = args.session_id {
        monitor_config.session_id = session_id;
    }

    info!("exam-monitor v0.1.0");
    info!("Session: {}", monitor_config.session_id);
    info!("Backend: {}", monitor_config.backend_url);

    let ui = Arc::new(UiState::new(
        monitor_config.alert_dismiss,
        monitor_config.banner_dismiss,
    ));

    let monitor = SessionMonitor::new(
        monitor_config,
        Arc::new(SyntheticVideoSource::new()),
        Box::new(|capture| {
            Ok(Box::new(SyntheticAudioBackend::new(capture)) as Box<dyn AudioBackend>)
        }),
        ui,
    );

    monitor.start().await?;

    if monitor.is_degraded() {
        info!("Microphone unavailable, monitoring video-only");
    }

    tokio::time::sleep(Duration::from_secs(args.duration_secs)).await;

    monitor.stop().await?;

    let stats = monitor.stats().await;
    info!(
        "Session finished: {} analyses, {} violations",
        stats.total_analyses, stats.violations_detected
    );

    match monitor.session_summary().await {
        Some(summary) => info!("Server summary: {}", summary.render()),
        None => info!("No server summary available"),
    }

    Ok(())
}
