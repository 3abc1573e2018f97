use anyhow::{Context, Result};
use base64::Engine;
use std::io::Cursor;

use super::backend::VideoFrame;
use super::segment::AudioSegment;

/// Encode an audio segment as a WAV container and base64 it for upload
pub fn encode_audio_segment(segment: &AudioSegment) -> Result<String> {
    let spec = hound::WavSpec {
        channels: segment.channels,
        sample_rate: segment.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .context("Failed to create WAV writer")?;

        for &sample in &segment.samples {
            writer
                .write_sample(sample)
                .context("Failed to write sample to WAV")?;
        }

        writer.finalize().context("Failed to finalize WAV")?;
    }

    Ok(base64::engine::general_purpose::STANDARD.encode(cursor.into_inner()))
}

/// Base64 the JPEG bytes of a captured frame
pub fn encode_video_frame(frame: &VideoFrame) -> String {
    base64::engine::general_purpose::STANDARD.encode(&frame.jpeg)
}
