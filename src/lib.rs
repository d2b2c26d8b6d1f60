//! Streaming spectral waterfall engine.
//!
//! A continuously arriving sample stream is decimated toward a target display
//! rate, transformed into magnitude spectra, optionally smoothed with a
//! single-pole average, compressed onto a dB scale, shipped across a
//! fixed-record transport to a background reader, and painted into a
//! scrolling color-indexed image. The host supplies samples and blits the
//! image; everything in between lives here.
//!
//! ```no_run
//! use specfall::{PipelineConfig, SourceKind, WaterfallBuffer, WaterfallSession, WaterfallStyle};
//!
//! let config = PipelineConfig {
//!     source: SourceKind::Real,
//!     sample_rate: 20_000.0,
//!     ..PipelineConfig::default()
//! };
//! let mut session = WaterfallSession::start(config).unwrap();
//! let mut image =
//!     WaterfallBuffer::new(config.transform_size, config.source, WaterfallStyle::default())
//!         .unwrap();
//!
//! session.pipeline.process_real(&vec![0.0; 4096]).unwrap();
//! while let Ok(frame) = session.rows.try_recv() {
//!     image.push_row(frame.bins());
//! }
//! ```

pub mod config;
pub mod dsp;
pub mod error;
pub mod render;
pub mod settings;
pub mod transport;
pub mod util;

pub use config::{PipelineConfig, SourceKind};
pub use dsp::SpectralFrame;
pub use dsp::pipeline::{PipelineHandle, WaterfallPipeline, WaterfallSession};
pub use dsp::window::WindowKind;
pub use error::ConfigError;
pub use render::colormap::Colormap;
pub use render::waterfall::{WaterfallBuffer, WaterfallImage, WaterfallStyle};
pub use settings::Settings;
pub use transport::TransportClosed;
