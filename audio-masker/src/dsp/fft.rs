//! Forward real-input FFT plan.
//!
//! [`RealFft`] computes the spectrum of one `N`-sample block. The plan
//! precomputes its twiddle factors at construction (the algorithm's
//! `init` phase); [`forward()`](RealFft::forward) is allocation-free and
//! runs an iterative radix-2 transform over in-plan scratch storage.
//!
//! The output convention matches the rest of the pipeline: `N / 2`
//! complex bins as interleaved pairs, `output[2k]` the real part and
//! `output[2k + 1]` the imaginary part of bin `k`. For a bin-aligned
//! cosine of amplitude `A`, bin `k` has magnitude `A * N / 2`.

use core::f32::consts::PI;

use crate::config::ConfigError;

/// Precomputed forward transform plan for `N`-sample blocks.
///
/// `N` must be a power of two ≥ 2. Twiddle and scratch arrays are sized
/// `N` because const generics cannot express `N / 2`; only the first half
/// of the twiddle tables is used.
pub struct RealFft<const N: usize> {
    twiddle_re: [f32; N],
    twiddle_im: [f32; N],
    scratch_re: [f32; N],
    scratch_im: [f32; N],
}

impl<const N: usize> RealFft<N> {
    /// Build a plan, precomputing `N / 2` twiddle factors.
    ///
    /// Fails with [`ConfigError::InvalidBlockSize`] when `N` is not a
    /// power of two ≥ 2.
    pub fn new() -> Result<Self, ConfigError> {
        if N < 2 || !N.is_power_of_two() {
            return Err(ConfigError::InvalidBlockSize { block_size: N });
        }

        let mut twiddle_re = [0.0f32; N];
        let mut twiddle_im = [0.0f32; N];
        for (k, (re, im)) in twiddle_re
            .iter_mut()
            .zip(twiddle_im.iter_mut())
            .enumerate()
            .take(N / 2)
        {
            let angle = -2.0 * PI * k as f32 / N as f32;
            *re = libm::cosf(angle);
            *im = libm::sinf(angle);
        }

        Ok(RealFft {
            twiddle_re,
            twiddle_im,
            scratch_re: [0.0; N],
            scratch_im: [0.0; N],
        })
    }

    /// Transform one block.
    ///
    /// Writes `N / 2` interleaved complex bins into `output[..N]`; the
    /// upper half of `output` is left untouched beyond the packed bins.
    pub fn forward(&mut self, input: &[f32; N], output: &mut [f32; N]) {
        let bits = N.trailing_zeros();

        // Bit-reversal reordering into the scratch arrays.
        for (i, &sample) in input.iter().enumerate() {
            let j = i.reverse_bits() >> (usize::BITS - bits);
            self.scratch_re[j] = sample;
            self.scratch_im[j] = 0.0;
        }

        // Iterative Cooley-Tukey butterflies.
        let mut len = 2;
        while len <= N {
            let half = len / 2;
            let stride = N / len;
            let mut base = 0;
            while base < N {
                for off in 0..half {
                    let wr = self.twiddle_re[off * stride];
                    let wi = self.twiddle_im[off * stride];
                    let i = base + off;
                    let j = i + half;

                    let tr = wr * self.scratch_re[j] - wi * self.scratch_im[j];
                    let ti = wr * self.scratch_im[j] + wi * self.scratch_re[j];
                    self.scratch_re[j] = self.scratch_re[i] - tr;
                    self.scratch_im[j] = self.scratch_im[i] - ti;
                    self.scratch_re[i] += tr;
                    self.scratch_im[i] += ti;
                }
                base += len;
            }
            len <<= 1;
        }

        // Pack the lower half of the spectrum as interleaved re/im pairs.
        for k in 0..N / 2 {
            output[2 * k] = self.scratch_re[k];
            output[2 * k + 1] = self.scratch_im[k];
        }
    }
}
