/* ==========================================================================================
 *                          This file is part of the Bachelor Thesis project
 *                                   University of Wrocław
 *                         Author: Weronika Tarnawska (Index No. 331171)
 *                                         June 2025
 * ========================================================================================== */
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::buffer::{SampleBuffer, SAMPLE_MAX};
use crate::error::{DspError, Result};

/// Convert one raw sample to the 16-bit scale.
fn to_i16_scale(sample: f64, spec: &WavSpec) -> f64 {
    match spec.sample_format {
        SampleFormat::Float => sample * SAMPLE_MAX,
        SampleFormat::Int => sample * 2f64.powi(16 - spec.bits_per_sample as i32),
    }
}

/// Average interleaved frames down to one channel.
fn mix_to_mono(interleaved: &[f64], channels: usize) -> Vec<f64> {
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect()
}

/// Reads a PCM (8/16/24/32-bit int or 32-bit float) WAV file into a mono 16-bit buffer.
/// Multi-channel files are averaged to mono; other bit depths are rescaled to 16 bits.
pub fn read_wav(path: &str) -> Result<SampleBuffer> {
    let decode = |source| DspError::Decode {
        path: path.to_string(),
        source,
    };
    let mut reader = WavReader::open(path).map_err(decode)?;
    let spec = reader.spec();

    let raw: Vec<f64> = match spec.sample_format {
        SampleFormat::Int => reader
            .samples::<i32>()
            .map(|s| s.map(|v| to_i16_scale(v as f64, &spec)))
            .collect::<std::result::Result<_, _>>()
            .map_err(decode)?,
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| to_i16_scale(v as f64, &spec)))
            .collect::<std::result::Result<_, _>>()
            .map_err(decode)?,
    };

    if spec.channels > 1 {
        log::warn!("'{}' has {} channels, mixing down to mono", path, spec.channels);
    }
    if spec.bits_per_sample != 16 || spec.sample_format != SampleFormat::Int {
        log::warn!(
            "'{}' is {}-bit {:?}, converting to 16-bit PCM",
            path,
            spec.bits_per_sample,
            spec.sample_format
        );
    }

    let mono = mix_to_mono(&raw, spec.channels.max(1) as usize);
    log::debug!("read {} frames at {} Hz from '{}'", mono.len(), spec.sample_rate, path);
    SampleBuffer::from_real(&mono, spec.sample_rate)
}

/// Writes the buffer as a single-channel 16-bit PCM WAV file at its own sample rate.
pub fn save_wav(buffer: &SampleBuffer, path: &str) -> Result<()> {
    let encode = |source| DspError::Encode {
        path: path.to_string(),
        source,
    };
    let spec = WavSpec {
        channels: SampleBuffer::CHANNELS,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).map_err(encode)?;
    for &s in buffer.samples() {
        writer.write_sample(s).map_err(encode)?;
    }
    writer.finalize().map_err(encode)?;
    log::debug!("wrote {} samples to '{}'", buffer.len(), path);
    Ok(())
}
