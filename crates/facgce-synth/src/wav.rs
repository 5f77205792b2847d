//! WAV export for rendered buffers, for headless use and ear reference.

use std::path::Path;

use crate::{SynthError, SAMPLE_RATE};

/// Write mono f32 samples as 16-bit PCM at the synth sample rate.
pub fn write_wav(path: &Path, samples: &[f32]) -> Result<(), SynthError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}
