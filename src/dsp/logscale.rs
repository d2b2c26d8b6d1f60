//! Logarithmic magnitude compression.

/// Gain applied to log10 magnitudes (amplitude-spectrum dB convention).
pub const LOG_GAIN: f32 = 20.0;

/// Floor applied before the logarithm. Zero or negative magnitudes are
/// clamped here so a degenerate bin can never produce a non-finite output.
const MAGNITUDE_EPSILON: f32 = 1.0e-20;

/// Maps linear magnitude onto a bounded dB-like scale, calibrated so a
/// magnitude equal to the transform size lands at 0 dB.
#[derive(Debug, Clone, Copy)]
pub struct LogCompressor {
    gain: f32,
    offset: f32,
}

impl LogCompressor {
    pub fn new(transform_size: usize) -> Self {
        Self::with_gain(LOG_GAIN, -LOG_GAIN * (transform_size as f32).log10())
    }

    /// General `n·log10(x) + k` form for callers with their own calibration.
    pub fn with_gain(gain: f32, offset: f32) -> Self {
        Self { gain, offset }
    }

    pub fn compress(&self, frame: &mut [f32]) {
        for value in frame.iter_mut() {
            *value = self.gain * value.max(MAGNITUDE_EPSILON).log10() + self.offset;
        }
    }
}
