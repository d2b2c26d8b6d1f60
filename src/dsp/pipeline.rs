//! Producer-side assembly of the waterfall pipeline.
//!
//! Sample blocks flow through the rate gate, the windowed transform, the
//! averager and the log compressor, and leave as fixed-size records on the
//! frame transport. The numeric path runs synchronously in the caller's
//! context; the only cross-context hand-off is the transport write.

use crate::config::PipelineConfig;
use crate::dsp::SpectralFrame;
use crate::dsp::average::{Averager, validate_alpha};
use crate::dsp::logscale::LogCompressor;
use crate::dsp::rate::RateController;
use crate::dsp::transform::SpectralTransform;
use crate::error::ConfigError;
use crate::transport::channel::{DEFAULT_CHANNEL_CAPACITY, FrameWriter, frame_channel};
use crate::transport::reader::FrameReader;
use crate::transport::TransportClosed;
use crate::util::copy_from_deque;
use async_channel::Receiver;
use parking_lot::RwLock;
use rustfft::num_complex::Complex32;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
struct ControlState {
    average: bool,
    avg_alpha: f32,
    sample_rate: f32,
    baseband_freq: f64,
    version: u64,
}

/// Runtime control surface.
///
/// Handles are cheap to clone and safe to use concurrently with the numeric
/// pipeline; every change takes effect no later than the next processed
/// block. Invalid parameters are rejected here, at the edge, and never reach
/// the hot path.
#[derive(Debug, Clone)]
pub struct PipelineHandle {
    state: Arc<RwLock<ControlState>>,
}

impl PipelineHandle {
    pub fn set_average(&self, enabled: bool) {
        let mut state = self.state.write();
        state.average = enabled;
        state.version += 1;
    }

    pub fn set_avg_alpha(&self, alpha: f32) -> Result<(), ConfigError> {
        validate_alpha(alpha)?;
        let mut state = self.state.write();
        state.avg_alpha = alpha;
        state.version += 1;
        Ok(())
    }

    pub fn set_sample_rate(&self, sample_rate: f32) -> Result<(), ConfigError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate(sample_rate));
        }
        let mut state = self.state.write();
        state.sample_rate = sample_rate;
        state.version += 1;
        Ok(())
    }

    pub fn set_baseband_freq(&self, freq: f64) {
        let mut state = self.state.write();
        state.baseband_freq = freq;
        state.version += 1;
    }

    pub fn is_averaging(&self) -> bool {
        self.state.read().average
    }

    pub fn avg_alpha(&self) -> f32 {
        self.state.read().avg_alpha
    }

    pub fn sample_rate(&self) -> f32 {
        self.state.read().sample_rate
    }

    pub fn baseband_freq(&self) -> f64 {
        self.state.read().baseband_freq
    }
}

/// The numeric pipeline: owner of every per-stage state vector and of the
/// transport's write end. Dropping it closes the stream, which is the one
/// graceful shutdown path.
pub struct WaterfallPipeline {
    config: PipelineConfig,
    controls: Arc<RwLock<ControlState>>,
    seen_version: u64,
    rate: RateController,
    transform: SpectralTransform,
    averager: Averager,
    compressor: LogCompressor,
    writer: FrameWriter,
    pending_real: VecDeque<f32>,
    pending_complex: VecDeque<Complex32>,
    block_real: Vec<f32>,
    block_complex: Vec<Complex32>,
    scratch: Vec<f32>,
}

impl WaterfallPipeline {
    /// Build a pipeline writing into `writer`. The configuration is
    /// validated before any stage is constructed.
    pub fn new(
        config: PipelineConfig,
        writer: FrameWriter,
    ) -> Result<(Self, PipelineHandle), ConfigError> {
        config.validate()?;

        let alpha = config.effective_alpha();
        let n = config.transform_size;
        let controls = Arc::new(RwLock::new(ControlState {
            average: config.averaging_enabled,
            avg_alpha: alpha,
            sample_rate: config.sample_rate,
            baseband_freq: config.baseband_freq,
            version: 0,
        }));

        let pipeline = Self {
            rate: RateController::new(config.sample_rate, n, config.frame_rate),
            transform: SpectralTransform::new(n, config.window, config.source),
            averager: Averager::new(n, alpha, config.averaging_enabled)?,
            compressor: LogCompressor::new(n),
            writer,
            pending_real: VecDeque::new(),
            pending_complex: VecDeque::new(),
            block_real: vec![0.0; n],
            block_complex: vec![Complex32::default(); n],
            scratch: vec![0.0; n],
            seen_version: 0,
            controls: Arc::clone(&controls),
            config,
        };

        Ok((pipeline, PipelineHandle { state: controls }))
    }

    pub fn config(&self) -> PipelineConfig {
        self.config
    }

    pub fn decimation(&self) -> usize {
        self.rate.decimation()
    }

    /// Consume a block of real samples. Transform-sized chunks are gathered
    /// internally; the call blocks only while the transport applies
    /// backpressure. The pipeline must have been configured with
    /// [`crate::SourceKind::Real`].
    pub fn process_real(&mut self, samples: &[f32]) -> Result<(), TransportClosed> {
        self.sync_controls();
        self.pending_real.extend(samples.iter().copied());

        let n = self.config.transform_size;
        while self.pending_real.len() >= n {
            if !self.rate.should_emit() {
                self.pending_real.drain(..n);
                continue;
            }
            copy_from_deque(&mut self.block_real, &self.pending_real);
            self.pending_real.drain(..n);

            let magnitudes = self.transform.magnitudes_real(&self.block_real);
            self.scratch.copy_from_slice(magnitudes);
            self.emit()?;
        }
        Ok(())
    }

    /// Consume a block of complex baseband samples. The pipeline must have
    /// been configured with [`crate::SourceKind::Complex`].
    pub fn process_complex(&mut self, samples: &[Complex32]) -> Result<(), TransportClosed> {
        self.sync_controls();
        self.pending_complex.extend(samples.iter().copied());

        let n = self.config.transform_size;
        while self.pending_complex.len() >= n {
            if !self.rate.should_emit() {
                self.pending_complex.drain(..n);
                continue;
            }
            copy_from_deque(&mut self.block_complex, &self.pending_complex);
            self.pending_complex.drain(..n);

            let magnitudes = self.transform.magnitudes_complex(&self.block_complex);
            self.scratch.copy_from_slice(magnitudes);
            self.emit()?;
        }
        Ok(())
    }

    fn emit(&mut self) -> Result<(), TransportClosed> {
        self.averager.apply(&mut self.scratch);
        self.compressor.compress(&mut self.scratch);
        self.writer.write(bytemuck::cast_slice(&self.scratch))
    }

    /// Fold any pending control changes into the stages. Runs at block
    /// granularity, so a setter takes effect no later than the next frame.
    fn sync_controls(&mut self) {
        let state = *self.controls.read();
        if state.version == self.seen_version {
            return;
        }
        self.seen_version = state.version;

        self.averager.set_enabled(state.average);
        if let Err(err) = self.averager.set_alpha(state.avg_alpha) {
            warn!("keeping previous averaging coefficient: {err}");
        }

        if (state.sample_rate - self.config.sample_rate).abs() > f32::EPSILON {
            self.config.sample_rate = state.sample_rate;
            let decimation = self.rate.configure(
                state.sample_rate,
                self.config.transform_size,
                self.config.frame_rate,
            );
            debug!(sample_rate = state.sample_rate, decimation, "emission rate reconfigured");
        }

        self.config.averaging_enabled = state.average;
        self.config.averaging_alpha = Some(state.avg_alpha);
        self.config.baseband_freq = state.baseband_freq;
    }
}

/// A fully wired pipeline instance: producer side, control surface, row
/// notifications, and the background reader.
pub struct WaterfallSession {
    pub pipeline: WaterfallPipeline,
    pub handle: PipelineHandle,
    pub rows: Receiver<SpectralFrame>,
    pub reader: FrameReader,
}

impl WaterfallSession {
    /// Wire pipeline → frame channel → reader → row notifications.
    pub fn start(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let (writer, receiver) = frame_channel(config.record_len(), DEFAULT_CHANNEL_CAPACITY);
        let (pipeline, handle) = WaterfallPipeline::new(config, writer)?;
        let (reader, rows) = FrameReader::with_channel(receiver);
        Ok(Self {
            pipeline,
            handle,
            rows,
            reader,
        })
    }

    /// Close the stream and wait for the reader to drain and stop. Returns
    /// the row receiver so buffered frames can still be collected.
    pub fn finish(self) -> Receiver<SpectralFrame> {
        drop(self.pipeline);
        self.reader.join();
        self.rows
    }
}
