//! Pass-through baseline algorithm.

use crate::constants::ADC_TO_DAC_SHIFT;

use super::Algorithm;

/// Copies the input block to the output block, scaling each 12-bit ADC
/// sample down to the 8-bit DAC range.
///
/// Stateless and trivially real-time safe; used as the minimum-latency
/// correctness baseline for the pipeline.
pub struct PassThrough;

impl PassThrough {
    /// Create the pass-through algorithm.
    pub const fn new() -> Self {
        PassThrough
    }
}

impl Default for PassThrough {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for PassThrough {
    fn process(&mut self, input: &[u16], output: &mut [u8]) {
        debug_assert_eq!(input.len(), output.len());
        for (out, &sample) in output.iter_mut().zip(input.iter()) {
            *out = (sample >> ADC_TO_DAC_SHIFT) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_scaled_input() {
        let mut algo = PassThrough::new();
        let input = [0u16, 16, 2048, 4095];
        let mut output = [0xFFu8; 4];
        algo.process(&input, &mut output);
        assert_eq!(output, [0, 1, 128, 255]);
    }

    #[test]
    fn idempotent_under_repeated_identical_input() {
        let mut algo = PassThrough::new();
        let mut input = [0u16; 256];
        for (i, s) in input.iter_mut().enumerate() {
            *s = (i * 16) as u16 % 4096;
        }

        let mut first = [0u8; 256];
        let mut second = [0u8; 256];
        algo.process(&input, &mut first);
        algo.process(&input, &mut second);
        assert_eq!(first, second);
    }
}
