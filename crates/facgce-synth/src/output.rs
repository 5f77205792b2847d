//! Audio output: an explicitly-owned device handle for buffer playback.

use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{info, warn};

use crate::{SynthError, SAMPLE_RATE};

/// Handle to the default output device, configured for the synth sample
/// rate. Construct once per process and reuse; each [`play`](Self::play)
/// call builds its own short-lived stream, so invocations are independent
/// and the handle itself is never torn down.
pub struct AudioOutput {
    device: cpal::Device,
    config: cpal::StreamConfig,
}

impl AudioOutput {
    pub fn new() -> Result<Self, SynthError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(SynthError::NoDevice)?;
        let config = find_output_config(&device)?;

        info!(
            device = %device.name().unwrap_or_else(|_| "unknown".into()),
            channels = config.channels,
            "audio output ready"
        );
        Ok(Self { device, config })
    }

    /// Play a mono buffer through the device, blocking until it finishes.
    /// The buffer is duplicated across output channels.
    pub fn play(&self, samples: Vec<f32>) -> Result<(), SynthError> {
        if samples.is_empty() {
            return Ok(());
        }

        let channels = self.config.channels as usize;
        let duration = Duration::from_secs_f32(samples.len() as f32 / SAMPLE_RATE as f32);
        let mut position = 0usize;

        let stream = self.device.build_output_stream(
            &self.config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let value = samples.get(position).copied().unwrap_or(0.0);
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                    position += 1;
                }
            },
            |err| warn!("audio output stream error: {err}"),
            None,
        )?;

        stream.play()?;
        // small margin so the device drains its last buffer
        std::thread::sleep(duration + Duration::from_millis(150));
        Ok(())
    }
}

fn find_output_config(device: &cpal::Device) -> Result<cpal::StreamConfig, SynthError> {
    let rate = cpal::SampleRate(SAMPLE_RATE);
    let supported = device
        .supported_output_configs()?
        .find(|c| {
            c.sample_format() == cpal::SampleFormat::F32
                && c.min_sample_rate() <= rate
                && rate <= c.max_sample_rate()
        })
        .ok_or(SynthError::UnsupportedConfig)?;
    Ok(supported.with_sample_rate(rate).config())
}
