//! Window functions applied ahead of the spectral transform.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

/// Window selection controlling spectral leakage characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    Rectangular,
    Hann,
    Hamming,
    Blackman,
    BlackmanHarris,
}

impl WindowKind {
    /// Cosine-sum term table; sign alternation is applied generically below.
    fn terms(self) -> &'static [f32] {
        match self {
            WindowKind::Rectangular => &[1.0],
            WindowKind::Hann => &[0.5, 0.5],
            WindowKind::Hamming => &[0.54, 0.46],
            WindowKind::Blackman => &[0.42, 0.5, 0.08],
            WindowKind::BlackmanHarris => &[0.358_75, 0.488_29, 0.141_28, 0.011_68],
        }
    }

    pub fn coefficients(self, len: usize) -> Vec<f32> {
        cosine_sum(len, self.terms())
    }

    /// Coefficient lookup through the process-global cache, shared across
    /// pipeline instances.
    pub fn cached(self, len: usize) -> Arc<[f32]> {
        WindowCache::global().get(self, len)
    }
}

/// Periodic generalized cosine-sum window:
/// `w[n] = Σ_k (-1)^k · a_k · cos(2πkn / len)`.
fn cosine_sum(len: usize, terms: &[f32]) -> Vec<f32> {
    (0..len)
        .map(|n| {
            let phase = (n as f32) * core::f32::consts::TAU / (len as f32);
            terms
                .iter()
                .enumerate()
                .map(|(k, &a)| {
                    let term = a * (k as f32 * phase).cos();
                    if k % 2 == 0 { term } else { -term }
                })
                .sum()
        })
        .collect()
}

/// Scale a sample buffer by window coefficients in place.
#[inline]
pub fn apply_window(buffer: &mut [f32], window: &[f32]) {
    debug_assert_eq!(buffer.len(), window.len());
    for (sample, coeff) in buffer.iter_mut().zip(window.iter()) {
        *sample *= *coeff;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct WindowKey {
    kind: WindowKind,
    len: usize,
}

struct WindowCache {
    entries: RwLock<FxHashMap<WindowKey, Arc<[f32]>>>,
}

impl WindowCache {
    fn global() -> &'static WindowCache {
        static INSTANCE: OnceLock<WindowCache> = OnceLock::new();
        INSTANCE.get_or_init(|| WindowCache {
            entries: RwLock::new(FxHashMap::default()),
        })
    }

    fn get(&self, kind: WindowKind, len: usize) -> Arc<[f32]> {
        if len == 0 {
            return Arc::from([]);
        }

        let key = WindowKey { kind, len };
        if let Some(existing) = self.entries.read().get(&key) {
            return Arc::clone(existing);
        }

        let mut write = self.entries.write();
        Arc::clone(
            write
                .entry(key)
                .or_insert_with(|| Arc::from(kind.coefficients(len))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangular_is_all_ones() {
        let coeffs = WindowKind::Rectangular.coefficients(64);
        assert!(coeffs.iter().all(|&c| (c - 1.0).abs() < 1e-6));
    }

    #[test]
    fn periodic_windows_are_symmetric_about_the_midpoint() {
        for kind in [
            WindowKind::Hann,
            WindowKind::Hamming,
            WindowKind::Blackman,
            WindowKind::BlackmanHarris,
        ] {
            let coeffs = kind.coefficients(256);
            for n in 1..256 {
                let mirrored = coeffs[256 - n];
                assert!(
                    (coeffs[n] - mirrored).abs() < 1e-5,
                    "{kind:?} asymmetric at {n}"
                );
            }
        }
    }

    #[test]
    fn blackman_harris_peaks_at_unity() {
        let coeffs = WindowKind::BlackmanHarris.coefficients(512);
        let peak = coeffs[256];
        assert!((peak - 1.0).abs() < 1e-5, "peak {peak}");
        // First sample sits in the deep sidelobe floor.
        assert!(coeffs[0].abs() < 1e-4);
    }

    #[test]
    fn cache_shares_one_allocation_per_key() {
        let a = WindowKind::Hann.cached(1024);
        let b = WindowKind::Hann.cached(1024);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 1024);
    }
}
