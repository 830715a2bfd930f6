//! Block-processing algorithms and their selection.
//!
//! An algorithm is a capability over `(input_block, output_block)`: it
//! reads one completed block of ADC samples and fills one block of DAC
//! samples. Variants are chosen at configuration time through
//! [`AlgorithmKind`](crate::config::AlgorithmKind) and carried as a tagged
//! [`Variant`] — no heap, no `dyn` dispatch on the hot path.
//!
//! ## Lifecycle
//!
//! Construction ([`Variant::build`]) is the `init` phase: it derives all
//! state from the configuration and may fail with a fatal
//! [`ConfigError`](crate::config::ConfigError). Dropping the variant is
//! the `deinit` phase. Exactly one variant is active at a time; switching
//! builds the new one only after the old is dropped, and the worker must
//! be quiesced first (no in-flight [`process`](Algorithm::process) call —
//! enforced by `&mut` access).

mod pass_through;

#[cfg(feature = "dsp")]
mod masking;

pub use pass_through::PassThrough;

#[cfg(feature = "dsp")]
pub use masking::Masking;

use crate::config::{AlgorithmKind, ConfigError, PipelineConfig};

/// One block in, one block out.
///
/// `process` is called repeatedly with disjoint block views and must stay
/// allocation-free on the steady-state path; its deadline is one block
/// period.
pub trait Algorithm {
    /// Transform one input block into one output block.
    ///
    /// Both slices are exactly one block long.
    fn process(&mut self, input: &[u16], output: &mut [u8]);
}

/// Diagnostic scalars published for external telemetry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostics {
    /// Largest spectral magnitude observed so far.
    pub peak_magnitude: f32,
    /// Frequency (Hz) of that magnitude.
    pub fundamental_freq: f32,
}

/// The active algorithm, selected at configuration time.
pub enum Variant<const B: usize> {
    /// Minimum-latency correctness baseline.
    PassThrough(PassThrough),
    /// FFT-based dominant-frequency tracking and masking output.
    #[cfg(feature = "dsp")]
    Masking(Masking<B>),
}

impl<const B: usize> Variant<B> {
    /// Build the variant named by `config.algorithm` (the `init` phase).
    pub fn build(config: &PipelineConfig) -> Result<Self, ConfigError> {
        match config.algorithm {
            AlgorithmKind::PassThrough => Ok(Variant::PassThrough(PassThrough::new())),
            #[cfg(feature = "dsp")]
            AlgorithmKind::Masking => Ok(Variant::Masking(Masking::new(
                config.sample_rate_hz,
                &config.masking,
            )?)),
            #[cfg(not(feature = "dsp"))]
            AlgorithmKind::Masking => Err(ConfigError::AlgorithmUnavailable),
        }
    }

    /// Which kind this variant is.
    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Variant::PassThrough(_) => AlgorithmKind::PassThrough,
            #[cfg(feature = "dsp")]
            Variant::Masking(_) => AlgorithmKind::Masking,
        }
    }

    /// Diagnostic scalars, for variants that produce them.
    pub fn diagnostics(&self) -> Option<Diagnostics> {
        match self {
            Variant::PassThrough(_) => None,
            #[cfg(feature = "dsp")]
            Variant::Masking(m) => {
                let (peak_magnitude, fundamental_freq) = m.peak();
                Some(Diagnostics {
                    peak_magnitude,
                    fundamental_freq,
                })
            }
        }
    }
}

impl<const B: usize> Algorithm for Variant<B> {
    fn process(&mut self, input: &[u16], output: &mut [u8]) {
        match self {
            Variant::PassThrough(a) => a.process(input, output),
            #[cfg(feature = "dsp")]
            Variant::Masking(a) => a.process(input, output),
        }
    }
}
