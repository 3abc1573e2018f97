//! Synthetic capture sources
//!
//! Stand-ins for real webcam/microphone devices, used by the CLI demo and
//! the integration tests. The video source hands out a canned JPEG frame;
//! the audio backend emits a sine tone in 100ms PCM frames.

use anyhow::Result;
use std::f32::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use super::backend::{AudioBackend, AudioFrame, CaptureConfig, VideoFrame, VideoSource};

// Smallest JPEG markers (SOI .. EOI) wrapped around a fixed payload, enough
// to look like an encoded still to anything that only transports the bytes.
const CANNED_JPEG: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00,
    0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xD9,
];

/// Video source producing a fixed frame at a fixed resolution
///
/// Created with `not_buffering()` it reports zero dimensions instead, the
/// same shape a real surface has before the first decoded frame.
pub struct SyntheticVideoSource {
    width: u32,
    height: u32,
}

impl SyntheticVideoSource {
    pub fn new() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }

    /// A source whose surface never gets decoded dimensions
    pub fn not_buffering() -> Self {
        Self {
            width: 0,
            height: 0,
        }
    }
}

impl Default for SyntheticVideoSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl VideoSource for SyntheticVideoSource {
    async fn grab(&self) -> Result<VideoFrame> {
        let jpeg = if self.width > 0 {
            CANNED_JPEG.to_vec()
        } else {
            Vec::new()
        };

        Ok(VideoFrame {
            width: self.width,
            height: self.height,
            jpeg,
        })
    }

    fn name(&self) -> &str {
        "synthetic-video"
    }
}

/// Microphone backend producing a 440 Hz tone in 100ms frames
pub struct SyntheticAudioBackend {
    config: CaptureConfig,
    is_capturing: Arc<AtomicBool>,
    producer: Option<JoinHandle<()>>,
}

impl SyntheticAudioBackend {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            is_capturing: Arc::new(AtomicBool::new(false)),
            producer: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for SyntheticAudioBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        let (tx, rx) = mpsc::channel(100);

        self.is_capturing.store(true, Ordering::SeqCst);

        let is_capturing = Arc::clone(&self.is_capturing);
        let sample_rate = self.config.sample_rate;
        let channels = self.config.channels;
        let samples_per_frame = (sample_rate as usize / 10) * channels as usize;

        let producer = tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_millis(100));
            let mut timestamp_ms = 0u64;
            let mut phase = 0f32;

            loop {
                interval.tick().await;

                if !is_capturing.load(Ordering::SeqCst) {
                    break;
                }

                let mut samples = Vec::with_capacity(samples_per_frame);
                for _ in 0..samples_per_frame {
                    samples.push((phase.sin() * 8192.0) as i16);
                    phase = (phase + 440.0 * TAU / sample_rate as f32) % TAU;
                }

                let frame = AudioFrame {
                    samples,
                    sample_rate,
                    channels,
                    timestamp_ms,
                };
                timestamp_ms += 100;

                if tx.send(frame).await.is_err() {
                    break;
                }
            }

            info!("Synthetic audio producer stopped");
        });

        self.producer = Some(producer);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.is_capturing.store(false, Ordering::SeqCst);

        if let Some(producer) = self.producer.take() {
            producer.abort();
        }

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.is_capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "synthetic-audio"
    }
}
