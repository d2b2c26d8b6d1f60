//! Pipeline configuration and validation.

use crate::dsp::rate::decimation_factor;
use crate::dsp::window::WindowKind;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Default sample rate (Hz) assumed before the source reports one.
pub const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;

/// Default transform size (bins per spectral frame).
pub const DEFAULT_TRANSFORM_SIZE: usize = 512;

/// Default target display rate in frames per second.
pub const DEFAULT_FRAME_RATE: f32 = 15.0;

/// Whether the stream carries real samples or complex baseband samples.
///
/// The choice decides both the transform path and how many waterfall columns
/// a frame occupies: a real spectrum is conjugate-symmetric, so only the
/// lower half is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Real,
    Complex,
}

impl SourceKind {
    /// Number of waterfall columns a frame of `transform_size` bins fills.
    pub fn display_width(self, transform_size: usize) -> usize {
        match self {
            SourceKind::Real => transform_size / 2,
            SourceKind::Complex => transform_size,
        }
    }
}

/// Configuration for one waterfall pipeline instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Transform size (must be a power of two).
    pub transform_size: usize,
    /// Input sample rate in Hz.
    pub sample_rate: f32,
    /// Target display rate in spectral frames per second.
    pub frame_rate: f32,
    /// Start with time-averaging engaged.
    pub averaging_enabled: bool,
    /// Smoothing coefficient in (0, 1]; `None` selects `2 / frame_rate`.
    pub averaging_alpha: Option<f32>,
    /// Window applied ahead of the transform.
    pub window: WindowKind,
    /// Real or complex input stream.
    pub source: SourceKind,
    /// Center frequency in Hz, carried through for display labelling.
    pub baseband_freq: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            transform_size: DEFAULT_TRANSFORM_SIZE,
            sample_rate: DEFAULT_SAMPLE_RATE,
            frame_rate: DEFAULT_FRAME_RATE,
            averaging_enabled: false,
            averaging_alpha: None,
            window: WindowKind::BlackmanHarris,
            source: SourceKind::Complex,
            baseband_freq: 0.0,
        }
    }
}

impl PipelineConfig {
    /// Rejects any parameter the numeric hot path could choke on. A malformed
    /// configuration never gets past this edge.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.transform_size.is_power_of_two() {
            return Err(ConfigError::InvalidTransformSize(self.transform_size));
        }
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        let alpha = self.effective_alpha();
        if !alpha.is_finite() || alpha <= 0.0 || alpha > 1.0 {
            return Err(ConfigError::InvalidAlpha(alpha));
        }
        Ok(())
    }

    /// The smoothing coefficient actually used: the explicit value, or the
    /// `2 / frame_rate` rule of thumb capped at unity.
    pub fn effective_alpha(&self) -> f32 {
        match self.averaging_alpha {
            Some(alpha) => alpha,
            None => (2.0 / self.frame_rate).min(1.0),
        }
    }

    /// Current decimation factor between transform blocks and emitted frames.
    pub fn decimation(&self) -> usize {
        decimation_factor(self.sample_rate, self.transform_size, self.frame_rate)
    }

    /// Waterfall columns one emitted frame fills.
    pub fn display_width(&self) -> usize {
        self.source.display_width(self.transform_size)
    }

    /// Transport record length in bytes for one spectral frame.
    pub fn record_len(&self) -> usize {
        self.transform_size * core::mem::size_of::<f32>()
    }
}
