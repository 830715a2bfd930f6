//! FFT-based masking algorithm.
//!
//! Each block is transformed to the frequency domain; the bin with the
//! largest magnitude drives the dominant-frequency estimate. The tracked
//! peak persists across blocks as a monotonic observed maximum — the
//! algorithm's only cross-block memory — unless the configuration asks
//! for per-block reset. The output block is a square wave switching at
//! the configured period between two DAC levels.

use crate::config::{ConfigError, MaskingParams};
use crate::dsp::RealFft;

use super::Algorithm;

/// Dominant-frequency tracker with a masking waveform output.
///
/// `B` is the analysis block size; the plan, scratch spectrum and the
/// analysis window duration are all derived from it and the sample rate
/// at construction time.
pub struct Masking<const B: usize> {
    fft: RealFft<B>,
    scratch: [f32; B],
    spectrum: [f32; B],
    /// Analysis window duration in seconds: `B / sample_rate`.
    total_time: f32,
    period: usize,
    high: u8,
    low: u8,
    reset_per_block: bool,
    max_magnitude: f32,
    fundamental_freq: f32,
}

impl<const B: usize> Masking<B> {
    /// Build the algorithm (the `init` phase): allocate the transform
    /// plan, derive the window duration and zero the tracking state.
    pub fn new(sample_rate_hz: u32, params: &MaskingParams) -> Result<Self, ConfigError> {
        if sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if params.period == 0 {
            return Err(ConfigError::ZeroMaskingPeriod);
        }

        Ok(Masking {
            fft: RealFft::new()?,
            scratch: [0.0; B],
            spectrum: [0.0; B],
            total_time: B as f32 / sample_rate_hz as f32,
            period: params.period,
            high: params.high,
            low: params.low,
            reset_per_block: params.reset_per_block,
            max_magnitude: 0.0,
            fundamental_freq: 0.0,
        })
    }

    /// Tracked peak so far: `(magnitude, frequency_hz)`.
    pub fn peak(&self) -> (f32, f32) {
        (self.max_magnitude, self.fundamental_freq)
    }

    /// Zero the tracked peak magnitude and frequency.
    pub fn reset_tracking(&mut self) {
        self.max_magnitude = 0.0;
        self.fundamental_freq = 0.0;
    }
}

impl<const B: usize> Algorithm for Masking<B> {
    fn process(&mut self, input: &[u16], output: &mut [u8]) {
        debug_assert_eq!(input.len(), B);

        if self.reset_per_block {
            self.reset_tracking();
        }

        for (dst, &sample) in self.scratch.iter_mut().zip(input.iter()) {
            *dst = sample as f32;
        }
        self.fft.forward(&self.scratch, &mut self.spectrum);

        // Bin 0 is the DC offset of the ADC midpoint; skip it.
        for k in 1..B / 2 {
            let re = self.spectrum[2 * k];
            let im = self.spectrum[2 * k + 1];
            let magnitude = libm::sqrtf(re * re + im * im);
            // A degenerate bin is clamped out of the running maximum, not
            // propagated.
            if !magnitude.is_finite() {
                continue;
            }
            if magnitude > self.max_magnitude {
                self.max_magnitude = magnitude;
                self.fundamental_freq = k as f32 / self.total_time;
            }
        }

        for (i, out) in output.iter_mut().enumerate() {
            *out = if (i / self.period) % 2 == 0 {
                self.high
            } else {
                self.low
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::PI;

    use super::*;

    const B: usize = 256;
    const SAMPLE_RATE: u32 = 40_000;
    /// Bin width for this configuration: 40000 / 256 = 156.25 Hz.
    const BIN_HZ: f32 = SAMPLE_RATE as f32 / B as f32;

    fn params() -> MaskingParams {
        MaskingParams::default()
    }

    fn sine_block(freq_hz: f32, amplitude: f32) -> [u16; B] {
        let mut block = [0u16; B];
        for (i, s) in block.iter_mut().enumerate() {
            let t = i as f32 / SAMPLE_RATE as f32;
            *s = (2048.0 + amplitude * libm::sinf(2.0 * PI * freq_hz * t)) as u16;
        }
        block
    }

    #[test]
    fn rejects_zero_period() {
        let bad = MaskingParams {
            period: 0,
            ..params()
        };
        assert_eq!(
            Masking::<B>::new(SAMPLE_RATE, &bad).err(),
            Some(ConfigError::ZeroMaskingPeriod)
        );
    }

    #[test]
    fn rejects_zero_sample_rate() {
        assert_eq!(
            Masking::<B>::new(0, &params()).err(),
            Some(ConfigError::ZeroSampleRate)
        );
    }

    #[test]
    fn bin_aligned_sinusoid_tracks_its_frequency() {
        let mut algo = Masking::<B>::new(SAMPLE_RATE, &params()).unwrap();
        // Bin 8 center frequency: 8 * 156.25 = 1250 Hz.
        let input = sine_block(8.0 * BIN_HZ, 2000.0);
        let mut output = [0u8; B];
        algo.process(&input, &mut output);

        let (magnitude, freq) = algo.peak();
        assert!((freq - 1250.0).abs() <= BIN_HZ, "freq {freq}");
        // Rectangular window concentrates amplitude * B / 2 in the bin.
        let expected = 2000.0 * B as f32 / 2.0;
        assert!(
            (magnitude - expected).abs() / expected < 0.05,
            "magnitude {magnitude}"
        );
    }

    #[test]
    fn off_bin_sinusoid_lands_within_one_bin() {
        let mut algo = Masking::<B>::new(SAMPLE_RATE, &params()).unwrap();
        // The 1 kHz scenario: nearest bin center is 937.5 Hz (bin 6).
        let input = sine_block(1000.0, 2047.0);
        let mut output = [0u8; B];
        algo.process(&input, &mut output);

        let (_, freq) = algo.peak();
        assert!((freq - 1000.0).abs() <= BIN_HZ, "freq {freq}");
    }

    #[test]
    fn magnitude_proportional_to_amplitude() {
        let mut loud = Masking::<B>::new(SAMPLE_RATE, &params()).unwrap();
        let mut quiet = Masking::<B>::new(SAMPLE_RATE, &params()).unwrap();
        let mut output = [0u8; B];

        loud.process(&sine_block(1250.0, 2000.0), &mut output);
        quiet.process(&sine_block(1250.0, 1000.0), &mut output);

        let ratio = quiet.peak().0 / loud.peak().0;
        assert!((ratio - 0.5).abs() < 0.02, "ratio {ratio}");
    }

    #[test]
    fn peak_is_monotonic_across_blocks() {
        let mut algo = Masking::<B>::new(SAMPLE_RATE, &params()).unwrap();
        let mut output = [0u8; B];

        algo.process(&sine_block(1250.0, 2000.0), &mut output);
        let (loud_mag, loud_freq) = algo.peak();

        // A quieter block at another frequency must not displace the peak.
        algo.process(&sine_block(2500.0, 500.0), &mut output);
        assert_eq!(algo.peak(), (loud_mag, loud_freq));

        // A louder one must.
        algo.process(&sine_block(2500.0, 2047.0), &mut output);
        let (new_mag, new_freq) = algo.peak();
        assert!(new_mag > loud_mag);
        assert!((new_freq - 2500.0).abs() <= BIN_HZ);
    }

    #[test]
    fn reset_per_block_forgets_previous_peak() {
        let p = MaskingParams {
            reset_per_block: true,
            ..params()
        };
        let mut algo = Masking::<B>::new(SAMPLE_RATE, &p).unwrap();
        let mut output = [0u8; B];

        algo.process(&sine_block(1250.0, 2000.0), &mut output);
        algo.process(&sine_block(2500.0, 500.0), &mut output);

        // The tracked peak reflects only the most recent block.
        let (_, freq) = algo.peak();
        assert!((freq - 2500.0).abs() <= BIN_HZ, "freq {freq}");
    }

    #[test]
    fn output_is_square_wave_at_configured_period() {
        let p = MaskingParams {
            period: 4,
            high: 200,
            low: 10,
            reset_per_block: false,
        };
        let mut algo = Masking::<B>::new(SAMPLE_RATE, &p).unwrap();
        let input = sine_block(1250.0, 2000.0);
        let mut output = [0u8; B];
        algo.process(&input, &mut output);

        for (i, &s) in output.iter().enumerate() {
            let expected = if (i / 4) % 2 == 0 { 200 } else { 10 };
            assert_eq!(s, expected, "sample {i}");
        }
    }

    #[test]
    fn reset_tracking_zeroes_state() {
        let mut algo = Masking::<B>::new(SAMPLE_RATE, &params()).unwrap();
        let mut output = [0u8; B];
        algo.process(&sine_block(1250.0, 2000.0), &mut output);
        assert!(algo.peak().0 > 0.0);

        algo.reset_tracking();
        assert_eq!(algo.peak(), (0.0, 0.0));
    }
}
