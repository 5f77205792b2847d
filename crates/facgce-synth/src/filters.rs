//! Acoustic-body tone shaping: a fixed chain of RBJ biquad sections.

/// Output gain applied after the filter chain.
pub const MASTER_GAIN: f32 = 0.4;

/// Direct-form-I biquad with normalized coefficients.
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    fn from_unnormalized(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    pub fn low_pass(sample_rate: f32, frequency: f32, q: f32) -> Self {
        let w0 = 2.0 * std::f32::consts::PI * frequency / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);

        Self::from_unnormalized(
            (1.0 - cos_w0) / 2.0,
            1.0 - cos_w0,
            (1.0 - cos_w0) / 2.0,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        )
    }

    pub fn peaking(sample_rate: f32, frequency: f32, q: f32, gain_db: f32) -> Self {
        let a = 10.0f32.powf(gain_db / 40.0);
        let w0 = 2.0 * std::f32::consts::PI * frequency / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);

        Self::from_unnormalized(
            1.0 + alpha * a,
            -2.0 * cos_w0,
            1.0 - alpha * a,
            1.0 + alpha / a,
            -2.0 * cos_w0,
            1.0 - alpha / a,
        )
    }

    /// Low shelf with unit slope.
    pub fn low_shelf(sample_rate: f32, frequency: f32, gain_db: f32) -> Self {
        let a = 10.0f32.powf(gain_db / 40.0);
        let w0 = 2.0 * std::f32::consts::PI * frequency / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        // S = 1
        let alpha = sin_w0 / 2.0 * std::f32::consts::SQRT_2;
        let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

        Self::from_unnormalized(
            a * ((a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha),
            2.0 * a * ((a - 1.0) - (a + 1.0) * cos_w0),
            a * ((a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha),
            (a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha,
            -2.0 * ((a - 1.0) + (a + 1.0) * cos_w0),
            (a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha,
        )
    }

    pub fn process_sample(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }

    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// The fixed resonance chain: low-pass 2.5 kHz, low-mid body peaks at
/// 180 Hz and 350 Hz, a low shelf at 250 Hz, then the master gain.
#[derive(Debug)]
pub struct BodyFilter {
    stages: [Biquad; 4],
    gain: f32,
}

impl BodyFilter {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            stages: [
                Biquad::low_pass(sample_rate, 2500.0, 0.7),
                Biquad::peaking(sample_rate, 180.0, 2.0, 6.0),
                Biquad::peaking(sample_rate, 350.0, 1.5, 4.0),
                Biquad::low_shelf(sample_rate, 250.0, 3.0),
            ],
            gain: MASTER_GAIN,
        }
    }

    pub fn process(&mut self, buffer: &mut [f32]) {
        for stage in &mut self.stages {
            stage.process(buffer);
        }
        for sample in buffer.iter_mut() {
            *sample *= self.gain;
        }
    }
}
