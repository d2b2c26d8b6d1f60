//! Windowed transform primitive: N time samples in, N magnitude bins out.
//!
//! Real input runs through a half-spectrum FFT and the conjugate-symmetric
//! bins are mirrored onto the upper half, so both paths hand the pipeline a
//! frame of exactly `transform_size` magnitudes. Magnitudes are raw (no
//! window or size normalization); level calibration is the log stage's
//! offset.

use crate::config::SourceKind;
use crate::dsp::window::{WindowKind, apply_window};
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

pub struct SpectralTransform {
    size: usize,
    window: Arc<[f32]>,
    magnitudes: Vec<f32>,
    backend: Backend,
}

enum Backend {
    Real {
        fft: Arc<dyn RealToComplex<f32>>,
        input: Vec<f32>,
        spectrum: Vec<Complex32>,
        scratch: Vec<Complex32>,
    },
    Complex {
        fft: Arc<dyn Fft<f32>>,
        buffer: Vec<Complex32>,
        scratch: Vec<Complex32>,
    },
}

impl SpectralTransform {
    pub fn new(size: usize, window: WindowKind, source: SourceKind) -> Self {
        assert!(size > 0, "transform size must be greater than zero");

        let backend = match source {
            SourceKind::Real => {
                let fft = RealFftPlanner::<f32>::new().plan_fft_forward(size);
                let spectrum = fft.make_output_vec();
                let scratch = fft.make_scratch_vec();
                Backend::Real {
                    fft,
                    input: vec![0.0; size],
                    spectrum,
                    scratch,
                }
            }
            SourceKind::Complex => {
                let fft = FftPlanner::<f32>::new().plan_fft_forward(size);
                let scratch = vec![Complex32::default(); fft.get_inplace_scratch_len()];
                Backend::Complex {
                    fft,
                    buffer: vec![Complex32::default(); size],
                    scratch,
                }
            }
        };

        Self {
            size,
            window: window.cached(size),
            magnitudes: vec![0.0; size],
            backend,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Transform one block of real samples. `samples.len()` must equal the
    /// transform size.
    pub fn magnitudes_real(&mut self, samples: &[f32]) -> &[f32] {
        let Backend::Real {
            fft,
            input,
            spectrum,
            scratch,
        } = &mut self.backend
        else {
            panic!("transform was built for a complex source");
        };
        debug_assert_eq!(samples.len(), self.size);

        input.copy_from_slice(samples);
        apply_window(input, &self.window);
        fft.process_with_scratch(input, spectrum, scratch)
            .expect("real FFT forward transform");

        let half = self.size / 2;
        for (k, value) in spectrum.iter().take(half + 1).enumerate() {
            self.magnitudes[k] = value.norm();
        }
        // Conjugate symmetry fills the upper half.
        for k in 1..half {
            self.magnitudes[self.size - k] = self.magnitudes[k];
        }
        &self.magnitudes
    }

    /// Transform one block of complex samples. `samples.len()` must equal the
    /// transform size.
    pub fn magnitudes_complex(&mut self, samples: &[Complex32]) -> &[f32] {
        let Backend::Complex {
            fft,
            buffer,
            scratch,
        } = &mut self.backend
        else {
            panic!("transform was built for a real source");
        };
        debug_assert_eq!(samples.len(), self.size);

        for ((slot, &sample), &coeff) in buffer.iter_mut().zip(samples).zip(self.window.iter()) {
            *slot = sample * coeff;
        }
        fft.process_with_scratch(buffer, scratch);

        for (slot, value) in self.magnitudes.iter_mut().zip(buffer.iter()) {
            *slot = value.norm();
        }
        &self.magnitudes
    }
}
