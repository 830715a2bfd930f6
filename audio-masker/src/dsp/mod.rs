//! DSP math for the analysis algorithms.
//!
//! Pure-Rust, allocation-free implementations suitable for `no_std`
//! firmware targets; float math goes through `libm`.

pub mod fft;

pub use fft::RealFft;
