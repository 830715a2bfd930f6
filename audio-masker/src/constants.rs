/// Default ADC sampling rate in Hz (timer interrupt frequency).
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 40_000;

/// Default circular buffer capacity, in samples.
pub const DEFAULT_BUFFER_CAPACITY: usize = 2048;

/// Default algorithm block size, in samples. Must divide the buffer capacity.
pub const DEFAULT_BLOCK_SAMPLES: usize = 256;

/// Default dispatch queue slot count. Usable capacity is one less.
pub const DEFAULT_QUEUE_SLOTS: usize = 8;

/// Full-scale 12-bit ADC sample.
pub const ADC_FULL_SCALE: u16 = 4095;

/// Half-scale 8-bit DAC level, the default masking switch level.
pub const DAC_HALF_SCALE: u8 = 128;

/// Default masking square-wave switch period, in samples.
pub const DEFAULT_MASKING_PERIOD: usize = 30;

/// Right-shift that scales a 12-bit ADC sample down to the 8-bit DAC range.
pub const ADC_TO_DAC_SHIFT: u32 = 4;
