//! Error taxonomy for the configuration edge.
//!
//! Every variant is rejected synchronously at the call that sets the
//! parameter; callers keep their prior state on rejection. Transport closure
//! is deliberately *not* here — it is the normal termination signal and is
//! modelled by [`crate::transport::TransportClosed`].

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("averaging coefficient must lie in (0, 1], got {0}")]
    InvalidAlpha(f32),

    #[error("transform size must be a non-zero power of two, got {0}")]
    InvalidTransformSize(usize),

    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),

    #[error("frame rate must be positive and finite, got {0}")]
    InvalidFrameRate(f32),

    #[error("history must retain at least one row")]
    InvalidHistoryRows,

    #[error("interpolation and decimation must both be positive, got {interpolation}:{decimation}")]
    InvalidResampleRatio { interpolation: u32, decimation: u32 },

    #[error("fractional bandwidth must lie in (0, 0.5), got {0}")]
    InvalidFractionalBandwidth(f32),
}
