//! Scrolling intensity image fed one spectral row at a time.

use crate::config::SourceKind;
use crate::error::ConfigError;
use crate::render::colormap::Colormap;
use serde::{Deserialize, Serialize};

/// Rows of retained history in the display grid.
pub const DEFAULT_HISTORY_ROWS: usize = 300;

/// Quantization gain from dB to color index.
pub const DEFAULT_SCALE_FACTOR: f32 = 5.0;

/// Visual policy knobs, persisted alongside the pipeline settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterfallStyle {
    pub history_rows: usize,
    pub scale_factor: f32,
}

impl Default for WaterfallStyle {
    fn default() -> Self {
        Self {
            history_rows: DEFAULT_HISTORY_ROWS,
            scale_factor: DEFAULT_SCALE_FACTOR,
        }
    }
}

/// Owned snapshot of the index grid, handed to the host's paint routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaterfallImage {
    pub width: usize,
    pub height: usize,
    /// Row-major color indices, row 0 newest.
    pub indices: Vec<u8>,
}

impl WaterfallImage {
    /// Expand the index grid through a colormap into packed RGB bytes.
    pub fn to_rgb(&self, colormap: &Colormap) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.indices.len() * 3);
        for &index in &self.indices {
            rgb.extend_from_slice(&colormap.color(index));
        }
        rgb
    }
}

/// Scroll-only W×H grid of color indices. Row 0 always holds the most recent
/// frame; the grid is mutated only from the rendering context and reallocated
/// only by an explicit resize.
pub struct WaterfallBuffer {
    width: usize,
    height: usize,
    scale_factor: f32,
    source: SourceKind,
    indices: Vec<u8>,
    colormap: Colormap,
}

impl WaterfallBuffer {
    pub fn new(
        transform_size: usize,
        source: SourceKind,
        style: WaterfallStyle,
    ) -> Result<Self, ConfigError> {
        let width = source.display_width(transform_size);
        if width == 0 {
            return Err(ConfigError::InvalidTransformSize(transform_size));
        }
        if style.history_rows == 0 {
            return Err(ConfigError::InvalidHistoryRows);
        }
        Ok(Self {
            width,
            height: style.history_rows,
            scale_factor: style.scale_factor,
            source,
            indices: vec![0; width * style.history_rows],
            colormap: Colormap::waterfall(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn set_scale_factor(&mut self, scale_factor: f32) {
        self.scale_factor = scale_factor;
    }

    pub fn colormap(&self) -> &Colormap {
        &self.colormap
    }

    /// Raw row-major index grid, row 0 newest.
    pub fn rows(&self) -> &[u8] {
        &self.indices
    }

    /// Owned snapshot for the host's paint routine.
    pub fn image(&self) -> WaterfallImage {
        WaterfallImage {
            width: self.width,
            height: self.height,
            indices: self.indices.clone(),
        }
    }

    /// Destroy and reallocate the grid for a new transform size or source.
    pub fn resize(
        &mut self,
        transform_size: usize,
        source: SourceKind,
    ) -> Result<(), ConfigError> {
        let width = source.display_width(transform_size);
        if width == 0 {
            return Err(ConfigError::InvalidTransformSize(transform_size));
        }
        self.width = width;
        self.source = source;
        self.indices = vec![0; width * self.height];
        Ok(())
    }

    /// Change the retained history depth, clearing the grid.
    pub fn set_history_rows(&mut self, rows: usize) -> Result<(), ConfigError> {
        if rows == 0 {
            return Err(ConfigError::InvalidHistoryRows);
        }
        self.height = rows;
        self.indices = vec![0; self.width * rows];
        Ok(())
    }

    /// Quantize one dB value to a colormap index. Out-of-range values clamp
    /// to the table edges, never wrap; NaN saturates to index 0.
    pub fn quantize(&self, value: f32) -> u8 {
        (value * self.scale_factor).round().clamp(0.0, 255.0) as u8
    }

    /// Scroll the image down one row and paint `frame` into row 0.
    ///
    /// Real sources use the lower half of the conjugate-symmetric spectrum in
    /// ascending bin order. Complex sources fold the frame so negative
    /// frequencies (bins N/2..N) fill the left half and positive frequencies
    /// (bins 0..N/2) the right, putting DC at the midpoint column.
    ///
    /// This is the hot path: the scroll is one bulk move, not a per-row loop.
    pub fn push_row(&mut self, frame: &[f32]) {
        debug_assert!(frame.len() >= self.width);

        let width = self.width;
        self.indices
            .copy_within(0..(self.height - 1) * width, width);

        match self.source {
            SourceKind::Real => {
                for x in 0..width {
                    self.indices[x] = self.quantize(frame[x]);
                }
            }
            SourceKind::Complex => {
                let half = width / 2;
                for x in 0..half {
                    self.indices[x] = self.quantize(frame[half + x]);
                    self.indices[half + x] = self.quantize(frame[x]);
                }
            }
        }
    }
}
