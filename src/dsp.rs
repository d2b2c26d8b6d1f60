//! Core DSP stages of the waterfall pipeline.
//!
//! Each stage owns its own state and is driven from exactly one execution
//! context; the only cross-context hand-off happens downstream in
//! [`crate::transport`].

pub mod average;
pub mod logscale;
pub mod pipeline;
pub mod rate;
pub mod resample;
pub mod transform;
pub mod window;

/// One vector of magnitude-per-bin values produced by a single windowed
/// transform. Immutable once it crosses the transport; consumed exactly once
/// by the stage downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralFrame {
    bins: Vec<f32>,
}

impl SpectralFrame {
    pub fn new(bins: Vec<f32>) -> Self {
        Self { bins }
    }

    /// Decode one fixed-size transport record of native-endian `f32`s.
    /// The record length must be a multiple of four bytes; the transport
    /// guarantees this by construction.
    pub fn from_record(record: &[u8]) -> Self {
        debug_assert_eq!(record.len() % core::mem::size_of::<f32>(), 0);
        Self {
            bins: bytemuck::pod_collect_to_vec(record),
        }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    pub fn into_bins(self) -> Vec<f32> {
        self.bins
    }
}

impl AsRef<[f32]> for SpectralFrame {
    fn as_ref(&self) -> &[f32] {
        &self.bins
    }
}

#[cfg(test)]
mod tests {
    use super::SpectralFrame;

    #[test]
    fn record_decoding_round_trips() {
        let bins = vec![0.0f32, -1.5, 3.25, f32::MAX];
        let bytes: Vec<u8> = bytemuck::cast_slice(&bins).to_vec();
        let frame = SpectralFrame::from_record(&bytes);
        assert_eq!(frame.bins(), bins.as_slice());
    }
}
