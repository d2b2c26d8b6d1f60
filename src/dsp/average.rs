//! Exponential time-averaging across successive spectral frames.

use crate::error::ConfigError;

/// Single-pole IIR smoother over magnitude vectors.
///
/// The running state vector is owned exclusively here and mutated only from
/// the numeric pipeline's context. Disabled mode is a strict pass-through;
/// re-enabling arms a reseed so the next frame replaces the stale state
/// instead of being smoothed against it.
#[derive(Debug, Clone)]
pub struct Averager {
    alpha: f32,
    enabled: bool,
    reseed: bool,
    state: Vec<f32>,
}

impl Averager {
    pub fn new(len: usize, alpha: f32, enabled: bool) -> Result<Self, ConfigError> {
        validate_alpha(alpha)?;
        Ok(Self {
            alpha,
            enabled,
            reseed: false,
            state: vec![0.0; len],
        })
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Out-of-range coefficients are rejected synchronously; the prior value
    /// is kept.
    pub fn set_alpha(&mut self, alpha: f32) -> Result<(), ConfigError> {
        validate_alpha(alpha)?;
        self.alpha = alpha;
        Ok(())
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.reseed = true;
        }
        self.enabled = enabled;
    }

    /// Reallocate the state vector for a new transform size.
    pub fn resize(&mut self, len: usize) {
        self.state.clear();
        self.state.resize(len, 0.0);
        self.reseed = true;
    }

    /// Smooth one frame in place: `state = α·frame + (1-α)·state`, with the
    /// smoothed state written back into the frame.
    pub fn apply(&mut self, frame: &mut [f32]) {
        if !self.enabled {
            return;
        }
        if self.state.len() != frame.len() {
            self.resize(frame.len());
        }
        if self.reseed {
            self.state.copy_from_slice(frame);
            self.reseed = false;
            return;
        }

        let alpha = self.alpha;
        for (slot, value) in self.state.iter_mut().zip(frame.iter_mut()) {
            *slot = alpha * *value + (1.0 - alpha) * *slot;
            *value = *slot;
        }
    }
}

pub(crate) fn validate_alpha(alpha: f32) -> Result<(), ConfigError> {
    if alpha.is_finite() && alpha > 0.0 && alpha <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidAlpha(alpha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_is_identity() {
        let mut avg = Averager::new(4, 0.5, false).unwrap();
        let mut frame = [1.0, 2.0, 3.0, 4.0];
        avg.apply(&mut frame);
        assert_eq!(frame, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn unit_alpha_is_identity() {
        let mut avg = Averager::new(3, 1.0, true).unwrap();
        for _ in 0..3 {
            let mut frame = [7.0, -2.0, 0.25];
            avg.apply(&mut frame);
            assert_eq!(frame, [7.0, -2.0, 0.25]);
        }
    }

    #[test]
    fn smooths_from_zero_state() {
        let mut avg = Averager::new(2, 0.5, true).unwrap();

        let mut frame = [4.0, 4.0];
        avg.apply(&mut frame);
        assert_eq!(frame, [2.0, 2.0]);

        let mut frame = [4.0, 4.0];
        avg.apply(&mut frame);
        assert_eq!(frame, [3.0, 3.0]);
    }

    #[test]
    fn converges_geometrically_to_a_constant_input() {
        let mut avg = Averager::new(1, 0.3, true).unwrap();
        let target = 10.0;

        let mut last_error = target;
        for _ in 0..60 {
            let mut frame = [target];
            avg.apply(&mut frame);
            let error = (target - frame[0]).abs();
            assert!(error <= last_error);
            last_error = error;
        }
        assert!(last_error < 1e-4, "residual error {last_error}");
    }

    #[test]
    fn reenabling_reseeds_with_the_next_frame() {
        let mut avg = Averager::new(2, 0.5, true).unwrap();
        let mut frame = [4.0, 4.0];
        avg.apply(&mut frame);

        avg.set_enabled(false);
        let mut frame = [100.0, 100.0];
        avg.apply(&mut frame);
        assert_eq!(frame, [100.0, 100.0]);

        // The state held [2, 2]; the first frame after re-enable must pass
        // through verbatim rather than smear against it.
        avg.set_enabled(true);
        let mut frame = [8.0, 8.0];
        avg.apply(&mut frame);
        assert_eq!(frame, [8.0, 8.0]);

        let mut frame = [0.0, 0.0];
        avg.apply(&mut frame);
        assert_eq!(frame, [4.0, 4.0]);
    }

    #[test]
    fn invalid_alpha_is_rejected_and_prior_kept() {
        let mut avg = Averager::new(2, 0.25, true).unwrap();
        for bad in [0.0, -0.5, 1.5, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                avg.set_alpha(bad),
                Err(ConfigError::InvalidAlpha(_))
            ));
            assert_eq!(avg.alpha(), 0.25);
        }
        avg.set_alpha(1.0).unwrap();
        assert_eq!(avg.alpha(), 1.0);
    }
}
