use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::dsp::waveform::Waveform;

/// WAV spec for files we write: mono 16-bit PCM.
pub fn recording_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Create a WavWriter at the given path, creating parent directories as needed.
pub fn create_writer(path: &Path, spec: WavSpec) -> Result<WavWriter<std::io::BufWriter<std::fs::File>>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))
}

/// Write a waveform as mono 16-bit PCM. Samples outside [-1, 1] are clipped.
pub fn write_waveform(path: &Path, waveform: &Waveform) -> Result<()> {
    let mut writer = create_writer(path, recording_spec(waveform.sample_rate()))?;
    for &sample in waveform.samples() {
        let s16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(s16)
            .with_context(|| format!("Failed to write WAV samples: {}", path.display()))?;
    }
    writer
        .finalize()
        .with_context(|| format!("Failed to finalize WAV file: {}", path.display()))
}

/// Decode a WAV file into a mono waveform.
///
/// Integer PCM is scaled into [-1.0, 1.0] by the format's full-scale value;
/// float PCM is used as-is. Multichannel files are downmixed by averaging the
/// channels of each sample frame.
pub fn load_waveform(path: &Path) -> Result<Waveform> {
    let mut reader = WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Int => {
            let max_val = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<hound::Result<Vec<_>>>()
                .with_context(|| format!("Failed to read WAV samples: {}", path.display()))?
        }
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<hound::Result<Vec<_>>>()
            .with_context(|| format!("Failed to read WAV samples: {}", path.display()))?,
    };

    let samples = downmix(&interleaved, spec.channels);

    Waveform::new(samples, spec.sample_rate)
        .with_context(|| format!("Invalid audio in {}", path.display()))
}

/// Average interleaved channels down to one. Incomplete trailing frames are
/// dropped.
fn downmix(interleaved: &[f32], channels: u16) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
