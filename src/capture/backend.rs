use anyhow::Result;
use tokio::sync::mpsc;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// A still frame captured from the exam webcam, already encoded as JPEG
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Decoded surface width in pixels (0 = video not yet buffering)
    pub width: u32,
    /// Decoded surface height in pixels
    pub height: u32,
    /// JPEG-encoded image bytes at the configured fixed quality
    pub jpeg: Vec<u8>,
}

impl VideoFrame {
    /// Whether the video surface had decoded dimensions when this frame
    /// was grabbed. Frames without dimensions carry no usable image.
    pub fn has_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Configuration for capture sources
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Target sample rate for microphone capture
    pub sample_rate: u32,
    /// Target channel count (1 = mono, 2 = stereo)
    pub channels: u16,
    /// JPEG quality for still frames (0-100)
    pub jpeg_quality: u8,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            jpeg_quality: 80,
        }
    }
}

/// Microphone capture backend trait
///
/// Platform capture (browser MediaRecorder, cpal, etc.) lives behind this
/// seam; the monitor only sees a stream of PCM frames.
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing and release the device
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Webcam still-frame source trait
#[async_trait::async_trait]
pub trait VideoSource: Send + Sync {
    /// Grab the current frame from the video surface
    ///
    /// A source that is connected but not yet buffering returns a frame
    /// with zero dimensions rather than an error.
    async fn grab(&self) -> Result<VideoFrame>;

    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Constructs the audio backend for a monitor. Injected at start() so the
/// monitor owns the acquisition failure path (degraded mode) rather than
/// the caller.
pub type AudioBackendFactory =
    Box<dyn Fn(CaptureConfig) -> Result<Box<dyn AudioBackend>> + Send + Sync>;
