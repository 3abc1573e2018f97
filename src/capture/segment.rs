use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::backend::AudioFrame;

/// One flushed audio segment, ready for encoding
#[derive(Debug, Clone)]
pub struct AudioSegment {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
}

impl AudioSegment {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[derive(Debug)]
struct SegmentState {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
    segment_start: Option<Instant>,
}

/// Rolling in-memory audio segment
///
/// Holds at most one segment at a time: the fill task appends frames, the
/// upload tick takes the whole buffer and clears it in one step. Frames
/// arriving after the per-segment cap are discarded until the next flush
/// starts a fresh segment (drop-oldest, never unbounded).
pub struct SegmentRecorder {
    /// Maximum recorded duration per segment
    cap: Duration,
    state: Mutex<SegmentState>,
}

impl SegmentRecorder {
    pub fn new(cap: Duration) -> Self {
        Self {
            cap,
            state: Mutex::new(SegmentState {
                samples: Vec::new(),
                sample_rate: 0,
                channels: 0,
                segment_start: None,
            }),
        }
    }

    /// Append a captured frame to the current segment
    ///
    /// The first frame after a flush (or after reset) opens the segment and
    /// fixes its sample format. Returns false when the frame was discarded
    /// because the segment already reached its cap.
    pub async fn push(&self, frame: &AudioFrame) -> bool {
        let mut state = self.state.lock().await;

        let start = *state.segment_start.get_or_insert_with(Instant::now);
        if start.elapsed() >= self.cap {
            debug!(
                "Segment cap reached, dropping frame ({} samples)",
                frame.samples.len()
            );
            return false;
        }

        if state.samples.is_empty() {
            state.sample_rate = frame.sample_rate;
            state.channels = frame.channels;
        }
        state.samples.extend_from_slice(&frame.samples);
        true
    }

    /// Take the buffered segment and clear it
    ///
    /// Clearing and restarting the segment clock happen under one lock, so
    /// no frame can land between the take and the next segment start.
    /// Returns None when nothing was buffered.
    pub async fn flush(&self) -> Option<AudioSegment> {
        let mut state = self.state.lock().await;
        state.segment_start = Some(Instant::now());

        if state.samples.is_empty() {
            return None;
        }

        Some(AudioSegment {
            samples: std::mem::take(&mut state.samples),
            sample_rate: state.sample_rate,
            channels: state.channels,
        })
    }

    /// Copy the buffered segment without clearing it
    ///
    /// Used by the multimodal tick, which reads the latest audio alongside
    /// a frame but must not steal the audio tick's flush.
    pub async fn snapshot(&self) -> Option<AudioSegment> {
        let state = self.state.lock().await;

        if state.samples.is_empty() {
            return None;
        }

        Some(AudioSegment {
            samples: state.samples.clone(),
            sample_rate: state.sample_rate,
            channels: state.channels,
        })
    }

    /// Discard all buffered samples and close the segment
    ///
    /// Called at stop() so a later start() cannot see stale audio.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.samples.clear();
        state.segment_start = None;
    }

    /// Number of samples currently buffered
    pub async fn buffered_samples(&self) -> usize {
        self.state.lock().await.samples.len()
    }
}
