//! # audio-masker
//!
//! A `no_std`, zero-steady-state-allocation sampling and masking pipeline
//! for microcontroller audio devices. A hardware timer interrupt acquires
//! one ADC sample and emits one DAC sample per tick; every block of `B`
//! samples, a dispatch event crosses a lock-free queue to a worker context
//! that runs the selected processing algorithm with a one-block-period
//! deadline.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Storage | [`buffer`] | Input/output sample rings with an atomic cursor pair |
//! | Hand-off | [`dispatch`] | Bounded SPSC queue of ready-block events |
//! | Interrupt | [`sampler`] | The per-tick ISR routine and analog I/O traits |
//! | Deferred | [`worker`] | Block processing, deadline-miss detection |
//! | Algorithms | [`algorithm`] | Pass-through and FFT-based masking variants |
//! | DSP | [`dsp`] | Forward real FFT plan (feature-gated) |
//! | Diagnostics | [`diag`] / [`config`] | Counters, validated configuration |
//!
//! ## Quick start
//!
//! ```ignore
//! use audio_masker::{BufferPair, DispatchQueue, PipelineConfig, PipelineStats, Sampler, Worker};
//!
//! static BUFFERS: BufferPair<2048, 256> = BufferPair::new();
//! static QUEUE: DispatchQueue<8> = DispatchQueue::new();
//! static STATS: PipelineStats = PipelineStats::new();
//!
//! // At startup (fatal on configuration faults):
//! let config = PipelineConfig::default();
//! let mut worker = Worker::new(&BUFFERS, &QUEUE, &STATS, &config)?;
//! let mut sampler = Sampler::new(&BUFFERS, &QUEUE, &STATS);
//!
//! // In the timer ISR, once per sample tick:
//! sampler.tick(&mut adc, &mut dac);
//!
//! // In the low-priority task:
//! worker.run(|| { cortex_m::asm::wfi(); true });
//! ```
//!
//! ## Real-time contract
//!
//! The interrupt context never blocks, never allocates and never takes a
//! lock; every fault on that path reduces to drop-and-count. The worker
//! context may allocate only while building an algorithm variant, and
//! suspends only while parked on an empty queue. Buffer safety rests on
//! the cursor-offset invariant documented in [`buffer`].

#![no_std]

pub mod algorithm;
pub mod buffer;
pub mod config;
pub mod constants;
pub mod diag;
pub mod dispatch;
pub mod sampler;
pub mod worker;

#[cfg(feature = "dsp")]
pub mod dsp;

pub use algorithm::{Algorithm, Diagnostics, Variant};
pub use buffer::BufferPair;
pub use config::{AlgorithmKind, ConfigError, MaskingParams, PipelineConfig};
pub use diag::{PipelineStats, StatsSnapshot};
pub use dispatch::{DispatchEvent, DispatchQueue};
pub use sampler::{AnalogSink, AnalogSource, Sampler};
pub use worker::{BlockOutcome, Worker};
