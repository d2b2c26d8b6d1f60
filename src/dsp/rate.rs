//! Emission rate control between transform blocks and displayed frames.

/// Decimation factor for the given input rate, transform size, and target
/// display rate. Degenerate combinations clamp to 1 (emit every block); this
/// is never an error.
pub fn decimation_factor(sample_rate: f32, transform_size: usize, frame_rate: f32) -> usize {
    let blocks_per_frame = sample_rate / transform_size as f32 / frame_rate;
    if blocks_per_frame.is_finite() && blocks_per_frame >= 1.0 {
        blocks_per_frame as usize
    } else {
        1
    }
}

/// Keep-one-in-N gate ahead of the transform.
///
/// Counting happens per transform-sized block, so the long-run output rate
/// approximates the target frame rate without any buffering delay. The
/// counter fires on the last block of each group of `decimation` blocks.
#[derive(Debug, Clone)]
pub struct RateController {
    decimation: usize,
    count: usize,
}

impl RateController {
    pub fn new(sample_rate: f32, transform_size: usize, frame_rate: f32) -> Self {
        Self {
            decimation: decimation_factor(sample_rate, transform_size, frame_rate),
            count: 0,
        }
    }

    /// Recompute the decimation factor after a rate or size change. The phase
    /// counter restarts, so the next emission happens after one full group.
    pub fn configure(
        &mut self,
        sample_rate: f32,
        transform_size: usize,
        frame_rate: f32,
    ) -> usize {
        self.decimation = decimation_factor(sample_rate, transform_size, frame_rate);
        self.count = 0;
        self.decimation
    }

    pub fn decimation(&self) -> usize {
        self.decimation
    }

    /// True exactly once per `decimation` consecutive calls.
    pub fn should_emit(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.decimation {
            self.count = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_floors_the_block_ratio() {
        // 20000 / 512 / 15 = 2.604…  ->  2
        assert_eq!(decimation_factor(20_000.0, 512, 15.0), 2);
        assert_eq!(decimation_factor(48_000.0, 1024, 15.0), 3);
    }

    #[test]
    fn factor_clamps_to_one() {
        // Fewer blocks per second than the display wants: emit every block.
        assert_eq!(decimation_factor(48_000.0, 2048, 30.0), 1);
        assert_eq!(decimation_factor(1.0, 512, 15.0), 1);
    }

    #[test]
    fn emits_once_per_group() {
        let mut rate = RateController::new(20_000.0, 512, 15.0);
        assert_eq!(rate.decimation(), 2);

        let emitted = (0..4).filter(|_| rate.should_emit()).count();
        assert_eq!(emitted, 2);
    }

    #[test]
    fn decimation_of_one_emits_every_block() {
        let mut rate = RateController::new(1_000.0, 512, 15.0);
        assert_eq!(rate.decimation(), 1);
        assert!((0..5).all(|_| rate.should_emit()));
    }

    #[test]
    fn configure_restarts_the_phase() {
        let mut rate = RateController::new(20_000.0, 512, 15.0);
        assert!(!rate.should_emit());

        // Halving the sample rate drops the factor to 1 mid-group.
        rate.configure(10_000.0, 512, 15.0);
        assert_eq!(rate.decimation(), 1);
        assert!(rate.should_emit());
    }
}
