//! Pipeline configuration and initialization-time validation.
//!
//! All parameters are fixed for the lifetime of the pipeline: the sample
//! rate, the selected algorithm variant and its parameters. The buffer
//! capacity `C` and block size `B` are const generics on the pipeline
//! types, so they are checked here against the values the rest of the
//! configuration assumes. Validation failures are fatal — the pipeline
//! must not start.

use thiserror::Error;

use crate::constants::{DEFAULT_MASKING_PERIOD, DEFAULT_SAMPLE_RATE_HZ, DAC_HALF_SCALE};

/// Which processing algorithm the worker context runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmKind {
    /// Minimum-latency baseline: output derived directly from input.
    PassThrough,
    /// FFT-based masking: tracks the dominant input frequency and drives
    /// a configurable masking waveform. Requires the `dsp` feature.
    Masking,
}

/// Parameters for the FFT-based masking variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskingParams {
    /// Square-wave switch period of the output waveform, in samples.
    pub period: usize,
    /// DAC level driven during the high half of the waveform.
    pub high: u8,
    /// DAC level driven during the low half of the waveform.
    pub low: u8,
    /// Reset the tracked peak magnitude/frequency at every block instead
    /// of accumulating a monotonic observed maximum.
    pub reset_per_block: bool,
}

impl Default for MaskingParams {
    fn default() -> Self {
        MaskingParams {
            period: DEFAULT_MASKING_PERIOD,
            high: DAC_HALF_SCALE,
            low: 0,
            reset_per_block: false,
        }
    }
}

/// Startup configuration for the sampling pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Timer interrupt frequency in Hz.
    pub sample_rate_hz: u32,
    /// Selected algorithm variant.
    pub algorithm: AlgorithmKind,
    /// Parameters for [`AlgorithmKind::Masking`].
    pub masking: MaskingParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            algorithm: AlgorithmKind::PassThrough,
            masking: MaskingParams::default(),
        }
    }
}

/// Fatal configuration faults, reported before the pipeline starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Block boundaries would straddle the buffer wraparound point.
    #[error("buffer capacity {capacity} is not divisible by block size {block_size}")]
    CapacityNotDivisible { capacity: usize, block_size: usize },

    /// Block size must be a nonzero power of two no larger than the capacity.
    #[error("invalid block size {block_size}")]
    InvalidBlockSize { block_size: usize },

    /// The analysis window duration would be undefined.
    #[error("sample rate must be nonzero")]
    ZeroSampleRate,

    /// The masking waveform would never switch.
    #[error("masking switch period must be nonzero")]
    ZeroMaskingPeriod,

    /// The selected algorithm is compiled out.
    #[error("masking algorithm requires the `dsp` feature")]
    AlgorithmUnavailable,
}

impl PipelineConfig {
    /// Validate this configuration against buffer capacity `C` and block
    /// size `B`.
    ///
    /// Returns the first fault found. A pipeline must not be started from
    /// a configuration that fails validation.
    pub fn validate<const C: usize, const B: usize>(&self) -> Result<(), ConfigError> {
        if B == 0 || B > C || !B.is_power_of_two() {
            return Err(ConfigError::InvalidBlockSize { block_size: B });
        }
        if C % B != 0 {
            return Err(ConfigError::CapacityNotDivisible {
                capacity: C,
                block_size: B,
            });
        }
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.masking.period == 0 {
            return Err(ConfigError::ZeroMaskingPeriod);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PipelineConfig::default();
        assert_eq!(config.validate::<2048, 256>(), Ok(()));
    }

    #[test]
    fn rejects_capacity_not_divisible() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.validate::<1000, 256>(),
            Err(ConfigError::CapacityNotDivisible {
                capacity: 1000,
                block_size: 256
            })
        );
    }

    #[test]
    fn rejects_non_power_of_two_block() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.validate::<2048, 96>(),
            Err(ConfigError::InvalidBlockSize { block_size: 96 })
        );
    }

    #[test]
    fn rejects_zero_block() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.validate::<2048, 0>(),
            Err(ConfigError::InvalidBlockSize { block_size: 0 })
        );
    }

    #[test]
    fn rejects_block_larger_than_capacity() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.validate::<128, 256>(),
            Err(ConfigError::InvalidBlockSize { block_size: 256 })
        );
    }

    #[test]
    fn rejects_zero_sample_rate() {
        let config = PipelineConfig {
            sample_rate_hz: 0,
            ..PipelineConfig::default()
        };
        assert_eq!(config.validate::<2048, 256>(), Err(ConfigError::ZeroSampleRate));
    }

    #[test]
    fn rejects_zero_masking_period() {
        let mut config = PipelineConfig::default();
        config.masking.period = 0;
        assert_eq!(
            config.validate::<2048, 256>(),
            Err(ConfigError::ZeroMaskingPeriod)
        );
    }
}
