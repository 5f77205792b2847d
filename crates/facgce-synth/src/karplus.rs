//! Karplus-Strong plucked-string model.
//!
//! A delay line the length of one period is seeded with noise and refined
//! by a two-point average each pass; the averaged value is blended with the
//! previous filtered sample and scaled by a frequency-dependent damping
//! factor before being written back. The pick-position comb pre-pass
//! simulates plucking at one fifth of the string length, which thins every
//! fifth harmonic.

use rand::Rng;

pub const SAMPLE_RATE: u32 = 44_100;
pub const PLUCK_SECONDS: f32 = 3.0;

/// Fraction of the delay line used as the pick-position comb offset.
const PICK_POSITION_DIVISOR: usize = 5;
/// One-pole blend toward the fresh two-point average.
const LOWPASS_BLEND: f32 = 0.7;

/// Delay-line length for a frequency: one period, rounded to samples.
pub fn delay_line_length(frequency: f32) -> usize {
    (SAMPLE_RATE as f32 / frequency).round() as usize
}

/// Loss factor per sample. Shorter (higher) strings get a slightly larger
/// coefficient so that low strings ring longer in absolute time.
fn damping_for(frequency: f32) -> f32 {
    0.994 + 0.004 * (frequency / 330.0).min(1.0)
}

/// Render one plucked string at `frequency` Hz.
///
/// The output is always exactly `SAMPLE_RATE * PLUCK_SECONDS` samples for
/// any positive frequency.
pub fn render_pluck(frequency: f32, rng: &mut impl Rng) -> Vec<f32> {
    debug_assert!(frequency > 0.0, "frequency must be positive");

    let delay_len = delay_line_length(frequency).max(1);
    let mut delay: Vec<f32> = (0..delay_len).map(|_| rng.gen_range(-1.0..=1.0)).collect();

    // Pick-position comb: average each cell with the one a fifth of the
    // string ahead, circularly.
    let offset = delay_len / PICK_POSITION_DIVISOR;
    if offset > 0 {
        let seeded = delay.clone();
        for i in 0..delay_len {
            delay[i] = 0.5 * (seeded[i] + seeded[(i + offset) % delay_len]);
        }
    }

    let total = (SAMPLE_RATE as f32 * PLUCK_SECONDS) as usize;
    let damping = damping_for(frequency);
    let mut output = vec![0.0f32; total];
    let mut position = 0usize;
    let mut previous = 0.0f32;

    for out in output.iter_mut() {
        let current = delay[position];
        let next = delay[(position + 1) % delay_len];
        *out = current;

        let average = 0.5 * (current + next);
        let filtered = (average * LOWPASS_BLEND + previous * (1.0 - LOWPASS_BLEND)) * damping;
        delay[position] = filtered;
        previous = filtered;
        position = (position + 1) % delay_len;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn delay_line_length_is_rounded_period() {
        assert_eq!(delay_line_length(440.0), 100); // 44100 / 440 = 100.227
        assert_eq!(delay_line_length(441.0), 100);
        assert_eq!(delay_line_length(110.0), 401); // 400.9
        assert_eq!(delay_line_length(87.31), 505); // low open F
    }

    #[test]
    fn output_length_is_exact_for_any_frequency() {
        let expected = (SAMPLE_RATE as f32 * PLUCK_SECONDS) as usize;
        for frequency in [27.5, 87.31, 196.0, 440.0, 1318.5] {
            let mut rng = StdRng::seed_from_u64(1);
            assert_eq!(render_pluck(frequency, &mut rng).len(), expected);
        }
    }

    #[test]
    fn pluck_decays_over_time() {
        let mut rng = StdRng::seed_from_u64(2);
        let buffer = render_pluck(220.0, &mut rng);

        let rms = |window: &[f32]| {
            (window.iter().map(|s| s * s).sum::<f32>() / window.len() as f32).sqrt()
        };
        let early = rms(&buffer[0..4410]);
        let late = rms(&buffer[buffer.len() - 4410..]);
        assert!(
            late < early * 0.5,
            "no decay: early {} late {}",
            early,
            late
        );
    }

    #[test]
    fn pluck_is_bounded_and_finite() {
        let mut rng = StdRng::seed_from_u64(3);
        let buffer = render_pluck(110.0, &mut rng);
        assert!(buffer.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    }

    #[test]
    fn low_strings_ring_longer() {
        let rms = |window: &[f32]| {
            (window.iter().map(|s| s * s).sum::<f32>() / window.len() as f32).sqrt()
        };

        let mut rng = StdRng::seed_from_u64(4);
        let low = render_pluck(87.31, &mut rng);
        let mut rng = StdRng::seed_from_u64(4);
        let high = render_pluck(329.63, &mut rng);

        // relative tail energy: low strings keep more of their attack level
        let tail = |buffer: &[f32]| {
            let attack = rms(&buffer[0..4410]);
            let end = rms(&buffer[buffer.len() - 22050..]);
            end / attack
        };
        assert!(tail(&low) > tail(&high));
    }

    #[test]
    fn seeded_rendering_is_reproducible() {
        let a = render_pluck(196.0, &mut StdRng::seed_from_u64(9));
        let b = render_pluck(196.0, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
