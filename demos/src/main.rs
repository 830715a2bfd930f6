//! Host-side pipeline demo.
//!
//! Runs the full masking pipeline on two OS threads standing in for the
//! hardware contexts: one thread plays the timer ISR at roughly the
//! configured block cadence with a synthetic 1 kHz sine "ADC", the other
//! runs the worker loop. Prints the counters and the dominant-frequency
//! estimate after one second of audio.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p audio-masker-demos --bin host_pipeline
//! ```

use std::f32::consts::TAU;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use audio_masker::constants::{
    DEFAULT_BLOCK_SAMPLES as BLOCK, DEFAULT_BUFFER_CAPACITY as CAPACITY,
    DEFAULT_QUEUE_SLOTS as QUEUE_SLOTS, DEFAULT_SAMPLE_RATE_HZ as SAMPLE_RATE,
};
use audio_masker::{
    AlgorithmKind, AnalogSink, AnalogSource, BufferPair, DispatchQueue, PipelineConfig,
    PipelineStats, Sampler, Worker,
};
use log::info;

const TONE_HZ: f32 = 1000.0;

static BUFFERS: BufferPair<CAPACITY, BLOCK> = BufferPair::new();
static QUEUE: DispatchQueue<QUEUE_SLOTS> = DispatchQueue::new();
static STATS: PipelineStats = PipelineStats::new();
static DONE: AtomicBool = AtomicBool::new(false);

/// Synthetic ADC: a full-scale sine centered on the 12-bit midpoint.
struct SineSource {
    phase: f32,
    step: f32,
}

impl AnalogSource for SineSource {
    fn read(&mut self) -> u16 {
        let sample = 2048.0 + 2047.0 * self.phase.sin();
        self.phase += self.step;
        if self.phase > TAU {
            self.phase -= TAU;
        }
        sample as u16
    }
}

/// Synthetic DAC: counts writes and remembers the last level.
struct CaptureSink {
    writes: u64,
    last: u8,
}

impl AnalogSink for CaptureSink {
    fn write(&mut self, sample: u8) {
        self.writes += 1;
        self.last = sample;
    }
}

fn main() {
    env_logger::init();

    let config = PipelineConfig {
        sample_rate_hz: SAMPLE_RATE,
        algorithm: AlgorithmKind::Masking,
        ..PipelineConfig::default()
    };

    let mut worker =
        Worker::new(&BUFFERS, &QUEUE, &STATS, &config).expect("pipeline configuration");

    // One second of audio, paced one sleep per block period (6.4 ms).
    let isr = thread::spawn(|| {
        let mut sampler = Sampler::new(&BUFFERS, &QUEUE, &STATS);
        let mut source = SineSource {
            phase: 0.0,
            step: TAU * TONE_HZ / SAMPLE_RATE as f32,
        };
        let mut sink = CaptureSink { writes: 0, last: 0 };

        let block_period = Duration::from_micros(
            BLOCK as u64 * 1_000_000 / SAMPLE_RATE as u64,
        );
        for tick in 0..SAMPLE_RATE {
            sampler.tick(&mut source, &mut sink);
            if tick % BLOCK as u32 == BLOCK as u32 - 1 {
                thread::sleep(block_period);
            }
        }
        DONE.store(true, Ordering::Release);
        info!("sampler finished: {} DAC writes, last level {}", sink.writes, sink.last);
    });

    worker.run(|| {
        thread::yield_now();
        !DONE.load(Ordering::Acquire)
    });

    isr.join().expect("sampler thread");

    let snap = STATS.snapshot();
    println!(
        "blocks processed: {} (dispatched {}, dropped {}, deadline misses {})",
        snap.blocks_processed, snap.dispatches, snap.dispatches_dropped, snap.deadline_misses
    );
    if let Some(diag) = worker.diagnostics() {
        println!(
            "dominant frequency: {:.1} Hz (peak magnitude {:.0})",
            diag.fundamental_freq, diag.peak_magnitude
        );
    }
}
