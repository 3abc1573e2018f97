use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info, warn};

use super::alerts::{UiSink, ViolationAlert};
use super::config::MonitorConfig;
use super::stats::{MonitorStats, ViolationRecord};
use crate::analysis::{AnalysisClient, AnalysisKind, SessionSummary, Verdict};
use crate::capture::{
    encode_audio_segment, encode_video_frame, AudioBackend, AudioBackendFactory, SegmentRecorder,
    VideoSource,
};

/// Stats and violation log, guarded together so the pair can never be
/// observed out of step.
#[derive(Default)]
struct MonitorState {
    stats: MonitorStats,
    violation_log: Vec<ViolationRecord>,
}

/// Coordinates the three capture-and-upload cadences of one exam session
///
/// Image, audio, and multimodal ticks run as independent interval tasks on
/// the runtime; none of them waits on another, and a slow upload never
/// delays the next tick (uploads are detached tasks). `stop()` aborts the
/// cadence tasks but leaves in-flight uploads to finish on their own.
pub struct SessionMonitor {
    config: MonitorConfig,

    /// Analysis backend client
    client: AnalysisClient,

    /// Where results and alerts are surfaced
    ui: Arc<dyn UiSink>,

    /// Webcam still-frame source
    video: Arc<dyn VideoSource>,

    /// Constructs the microphone backend at start()
    audio_factory: AudioBackendFactory,

    /// The single rolling audio segment shared by the fill task, the audio
    /// tick, and the multimodal tick
    recorder: Arc<SegmentRecorder>,

    /// Whether monitoring is currently active
    is_active: Arc<AtomicBool>,

    /// Set when microphone acquisition failed and monitoring continues
    /// video-only
    degraded: Arc<AtomicBool>,

    /// Stats and violation log
    state: Arc<Mutex<MonitorState>>,

    /// The acquired microphone backend, held so stop() can release it
    audio_backend: Arc<Mutex<Option<Box<dyn AudioBackend>>>>,

    /// Handles for the cadence and fill tasks, aborted at stop()
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl SessionMonitor {
    pub fn new(
        config: MonitorConfig,
        video: Arc<dyn VideoSource>,
        audio_factory: AudioBackendFactory,
        ui: Arc<dyn UiSink>,
    ) -> Self {
        let client = AnalysisClient::new(&config.backend_url, config.session_id.clone());
        let recorder = Arc::new(SegmentRecorder::new(config.segment_cap));

        Self {
            config,
            client,
            ui,
            video,
            audio_factory,
            recorder,
            is_active: Arc::new(AtomicBool::new(false)),
            degraded: Arc::new(AtomicBool::new(false)),
            state: Arc::new(Mutex::new(MonitorState::default())),
            audio_backend: Arc::new(Mutex::new(None)),
            tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }

    /// Whether monitoring is running video-only because the microphone
    /// could not be acquired
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::SeqCst)
    }

    /// Start monitoring
    ///
    /// Acquires the microphone and launches the capture cadences. A failed
    /// microphone acquisition does not abort the session: the monitor logs
    /// it, raises the degraded flag, and continues video-only.
    pub async fn start(&self) -> Result<()> {
        if self.is_active.load(Ordering::SeqCst) {
            warn!("Monitoring already started");
            return Ok(());
        }

        info!("Starting proctoring session: {}", self.config.session_id);

        self.is_active.store(true, Ordering::SeqCst);
        self.degraded.store(false, Ordering::SeqCst);

        self.start_audio_capture().await;

        let mut tasks = self.tasks.lock().await;
        tasks.push(self.spawn_image_ticks());
        tasks.push(self.spawn_audio_ticks());
        tasks.push(self.spawn_multimodal_ticks());
        drop(tasks);

        self.ui.monitor_started().await;

        info!("Proctoring session started");

        Ok(())
    }

    /// Stop monitoring
    ///
    /// Idempotent. Prevents future ticks, releases the microphone, and
    /// clears any half-recorded audio segment. Uploads already in flight
    /// are neither cancelled nor awaited.
    pub async fn stop(&self) -> Result<()> {
        if !self.is_active.swap(false, Ordering::SeqCst) {
            debug!("Monitoring not active, nothing to stop");
            return Ok(());
        }

        info!("Stopping proctoring session: {}", self.config.session_id);

        {
            let mut tasks = self.tasks.lock().await;
            for task in tasks.drain(..) {
                task.abort();
            }
        }

        {
            let mut backend = self.audio_backend.lock().await;
            if let Some(mut backend) = backend.take() {
                if let Err(e) = backend.stop().await {
                    error!("Failed to stop audio backend: {}", e);
                }
            }
        }

        self.recorder.reset().await;

        info!("Proctoring session stopped");

        Ok(())
    }

    /// Acquire the microphone and spawn the fill task draining frames into
    /// the segment recorder
    async fn start_audio_capture(&self) {
        let mut backend = match (self.audio_factory)(self.config.capture.clone()) {
            Ok(backend) => backend,
            Err(e) => {
                warn!("Microphone acquisition failed, continuing video-only: {:#}", e);
                self.degraded.store(true, Ordering::SeqCst);
                return;
            }
        };

        let mut audio_rx = match backend
            .start()
            .await
            .context("Failed to start audio capture")
        {
            Ok(rx) => rx,
            Err(e) => {
                warn!("Microphone capture failed, continuing video-only: {:#}", e);
                self.degraded.store(true, Ordering::SeqCst);
                return;
            }
        };

        info!("Microphone acquired ({})", backend.name());

        {
            let mut held = self.audio_backend.lock().await;
            *held = Some(backend);
        }

        let recorder = Arc::clone(&self.recorder);
        let is_active = Arc::clone(&self.is_active);

        let fill_task = tokio::spawn(async move {
            while let Some(frame) = audio_rx.recv().await {
                if !is_active.load(Ordering::SeqCst) {
                    break;
                }
                recorder.push(&frame).await;
            }
            debug!("Audio fill task stopped");
        });

        self.tasks.lock().await.push(fill_task);
    }

    /// Grab the current frame and encode it for upload
    ///
    /// Returns None, with a log line and nothing else, when the surface has
    /// no decoded dimensions yet or the grab fails.
    pub async fn capture_frame(&self) -> Option<String> {
        match self.video.grab().await {
            Ok(frame) if frame.has_dimensions() => Some(encode_video_frame(&frame)),
            Ok(_) => {
                debug!("Video surface has no decoded dimensions yet, skipping frame");
                None
            }
            Err(e) => {
                warn!("Frame capture failed: {:#}", e);
                None
            }
        }
    }

    fn spawn_image_ticks(&self) -> JoinHandle<()> {
        let period = self.config.image_interval;
        let is_active = Arc::clone(&self.is_active);
        let video = Arc::clone(&self.video);
        let client = self.client.clone();
        let state = Arc::clone(&self.state);
        let ui = Arc::clone(&self.ui);

        tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);

            loop {
                ticks.tick().await;

                if !is_active.load(Ordering::SeqCst) {
                    break;
                }

                let frame = match video.grab().await {
                    Ok(frame) if frame.has_dimensions() => frame,
                    Ok(_) => {
                        debug!("Video surface has no decoded dimensions yet, skipping frame");
                        continue;
                    }
                    Err(e) => {
                        warn!("Frame capture failed: {:#}", e);
                        continue;
                    }
                };

                let image = encode_video_frame(&frame);
                let client = client.clone();
                let state = Arc::clone(&state);
                let ui = Arc::clone(&ui);

                // Detached: a slow or hung upload must not delay the next tick
                tokio::spawn(async move {
                    match client.analyze_image(&image).await {
                        Ok(verdict) => {
                            record_result(&state, ui.as_ref(), verdict, AnalysisKind::Image).await;
                        }
                        Err(e) => warn!("Image analysis failed: {:#}", e),
                    }
                });
            }

            debug!("Image tick task stopped");
        })
    }

    fn spawn_audio_ticks(&self) -> JoinHandle<()> {
        let period = self.config.audio_interval;
        let is_active = Arc::clone(&self.is_active);
        let recorder = Arc::clone(&self.recorder);
        let client = self.client.clone();
        let state = Arc::clone(&self.state);
        let ui = Arc::clone(&self.ui);

        tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);

            loop {
                ticks.tick().await;

                if !is_active.load(Ordering::SeqCst) {
                    break;
                }

                let segment = match recorder.flush().await {
                    Some(segment) => segment,
                    None => {
                        debug!("No audio buffered this tick");
                        continue;
                    }
                };

                let audio = match encode_audio_segment(&segment) {
                    Ok(audio) => audio,
                    Err(e) => {
                        error!("Failed to encode audio segment: {:#}", e);
                        continue;
                    }
                };

                let client = client.clone();
                let state = Arc::clone(&state);
                let ui = Arc::clone(&ui);

                tokio::spawn(async move {
                    match client.analyze_audio(&audio).await {
                        Ok(verdict) => {
                            record_result(&state, ui.as_ref(), verdict, AnalysisKind::Audio).await;
                        }
                        Err(e) => warn!("Audio analysis failed: {:#}", e),
                    }
                });
            }

            debug!("Audio tick task stopped");
        })
    }

    fn spawn_multimodal_ticks(&self) -> JoinHandle<()> {
        let period = self.config.multimodal_interval;
        let is_active = Arc::clone(&self.is_active);
        let video = Arc::clone(&self.video);
        let recorder = Arc::clone(&self.recorder);
        let client = self.client.clone();
        let state = Arc::clone(&self.state);
        let ui = Arc::clone(&self.ui);

        tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);

            loop {
                ticks.tick().await;

                if !is_active.load(Ordering::SeqCst) {
                    break;
                }

                let frame = match video.grab().await {
                    Ok(frame) if frame.has_dimensions() => frame,
                    Ok(_) => continue,
                    Err(e) => {
                        warn!("Frame capture failed: {:#}", e);
                        continue;
                    }
                };

                // Reads the latest audio without stealing the audio tick's
                // flush; a video-only (degraded) session skips the combined
                // call entirely.
                let segment = match recorder.snapshot().await {
                    Some(segment) => segment,
                    None => {
                        debug!("No audio available for multimodal analysis");
                        continue;
                    }
                };

                let image = encode_video_frame(&frame);
                let audio = match encode_audio_segment(&segment) {
                    Ok(audio) => audio,
                    Err(e) => {
                        error!("Failed to encode audio segment: {:#}", e);
                        continue;
                    }
                };

                let client = client.clone();
                let state = Arc::clone(&state);
                let ui = Arc::clone(&ui);

                tokio::spawn(async move {
                    match client.analyze_multimodal(image, audio).await {
                        Ok(verdict) => {
                            record_result(&state, ui.as_ref(), verdict, AnalysisKind::Multimodal)
                                .await;
                        }
                        Err(e) => warn!("Multimodal analysis failed: {:#}", e),
                    }
                });
            }

            debug!("Multimodal tick task stopped");
        })
    }

    /// Record a verdict from any of the three upload paths
    pub async fn record_result(&self, verdict: Verdict, kind: AnalysisKind) {
        record_result(&self.state, self.ui.as_ref(), verdict, kind).await;
    }

    /// Current stats snapshot
    pub async fn stats(&self) -> MonitorStats {
        self.state.lock().await.stats.clone()
    }

    /// Snapshot of the append-only violation log
    pub async fn violations(&self) -> Vec<ViolationRecord> {
        self.state.lock().await.violation_log.clone()
    }

    /// Fetch the aggregate server-side summary; None on any failure
    pub async fn session_summary(&self) -> Option<SessionSummary> {
        self.client.session_summary().await
    }
}

/// Bump the counters and, for violations, append to the log and raise an
/// alert. All updates happen under one lock so the totals and the log can
/// never disagree, whichever upload paths land concurrently.
async fn record_result(
    state: &Mutex<MonitorState>,
    ui: &dyn UiSink,
    verdict: Verdict,
    kind: AnalysisKind,
) {
    let is_violation = verdict.is_violation();

    let stats = {
        let mut state = state.lock().await;
        state.stats.total_analyses += 1;
        state.stats.last_analysis = Some(Utc::now());

        if is_violation {
            state.stats.violations_detected += 1;
            state.violation_log.push(ViolationRecord {
                kind,
                verdict: verdict.clone(),
                timestamp: Utc::now(),
            });
        }

        state.stats.clone()
    };

    info!(
        "{} result: violation={} (total={}, violations={})",
        kind.label(),
        is_violation,
        stats.total_analyses,
        stats.violations_detected
    );

    if is_violation {
        ui.violation_alert(ViolationAlert::from_verdict(kind, &verdict))
            .await;
    }

    ui.stats_updated(stats).await;
}
