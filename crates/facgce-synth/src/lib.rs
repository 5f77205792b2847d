//! Plucked-string audio for the chord explorer.
//!
//! [`render_pluck`] runs the Karplus-Strong delay-line model for a single
//! string; [`render_strum`] mixes a whole shape with a per-string onset
//! stagger and runs it through the acoustic-body filter chain. Rendering is
//! pure buffer math; only [`AudioOutput`] touches the platform.

use rand::Rng;
use thiserror::Error;

pub mod filters;
pub mod karplus;
pub mod output;
pub mod wav;

pub use filters::{Biquad, BodyFilter, MASTER_GAIN};
pub use karplus::{delay_line_length, render_pluck, PLUCK_SECONDS, SAMPLE_RATE};
pub use output::AudioOutput;
pub use wav::write_wav;

/// Seconds between successive string onsets in a strum.
pub const STRUM_STAGGER_SECS: f32 = 0.035;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("querying audio output configurations failed: {0}")]
    DeviceQuery(#[from] cpal::SupportedStreamConfigsError),
    #[error("no f32 output configuration supports {SAMPLE_RATE} Hz")]
    UnsupportedConfig,
    #[error("building audio output stream failed: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("starting playback failed: {0}")]
    Play(#[from] cpal::PlayStreamError),
    #[error("WAV I/O failed: {0}")]
    Wav(#[from] hound::Error),
}

/// Render a set of string frequencies as one strummed buffer.
///
/// Each pluck starts [`STRUM_STAGGER_SECS`] after the previous one, low
/// string first. The mix is shaped by [`BodyFilter`] (which applies the
/// master gain) and clamped to [-1, 1].
pub fn render_strum(frequencies: &[f32], rng: &mut impl Rng) -> Vec<f32> {
    if frequencies.is_empty() {
        return Vec::new();
    }

    let stagger = (STRUM_STAGGER_SECS * SAMPLE_RATE as f32) as usize;
    let pluck_len = (SAMPLE_RATE as f32 * PLUCK_SECONDS) as usize;
    let total = pluck_len + stagger * (frequencies.len() - 1);

    let mut mix = vec![0.0f32; total];
    for (index, &frequency) in frequencies.iter().enumerate() {
        let pluck = render_pluck(frequency, rng);
        let offset = stagger * index;
        for (i, sample) in pluck.iter().enumerate() {
            mix[offset + i] += sample;
        }
    }

    let mut body = BodyFilter::new(SAMPLE_RATE as f32);
    body.process(&mut mix);
    for sample in &mut mix {
        *sample = sample.clamp(-1.0, 1.0);
    }
    mix
}
