//! Producer/consumer transport for completed spectral frames.
//!
//! One bounded, ordered, lossless stream of fixed-size records with exactly
//! one writer and one reader; the blocking read/write contract below is the
//! only cross-context discipline the pipeline needs.

pub mod channel;
pub mod reader;

pub use channel::{DEFAULT_CHANNEL_CAPACITY, FrameReceiver, FrameWriter, frame_channel};
pub use reader::FrameReader;

use thiserror::Error;

/// The other end of the frame transport has gone away.
///
/// Closure is the pipeline's one graceful shutdown path, not a failure; it
/// gets a distinct type rather than a `ConfigError` variant so the two can
/// never be confused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("frame transport closed")]
pub struct TransportClosed;
