pub mod backend;
pub mod encode;
pub mod segment;
pub mod synthetic;

pub use backend::{
    AudioBackend, AudioBackendFactory, AudioFrame, CaptureConfig, VideoFrame, VideoSource,
};
pub use encode::{encode_audio_segment, encode_video_frame};
pub use segment::{AudioSegment, SegmentRecorder};
pub use synthetic::{SyntheticAudioBackend, SyntheticVideoSource};
