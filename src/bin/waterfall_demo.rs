//! Standalone demo: a complex sinusoid through the full pipeline, rendered
//! into a PPM image.
//!
//! The producer thread synthesizes baseband samples and drives the numeric
//! pipeline; the main thread plays the renderer, reacting to row
//! notifications from the background reader. Output path defaults to
//! `waterfall.ppm` and can be overridden by the first argument.

use anyhow::{Context, Result};
use rustfft::num_complex::Complex32;
use specfall::util::telemetry;
use specfall::{
    PipelineConfig, SourceKind, TransportClosed, WaterfallBuffer, WaterfallSession, WaterfallStyle,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::thread;
use tracing::info;

const SAMPLE_RATE: f32 = 20_000.0;
const TONE_HZ: f32 = 5_750.0;
const TRANSFORM_SIZE: usize = 512;
const SECONDS: f32 = 10.0;
const CHUNK: usize = 1_024;

fn main() -> Result<()> {
    telemetry::init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "waterfall.ppm".into());

    let config = PipelineConfig {
        transform_size: TRANSFORM_SIZE,
        sample_rate: SAMPLE_RATE,
        averaging_enabled: true,
        source: SourceKind::Complex,
        baseband_freq: 100e3,
        ..PipelineConfig::default()
    };

    let WaterfallSession {
        pipeline,
        handle,
        rows,
        reader,
    } = WaterfallSession::start(config)?;

    info!(
        decimation = pipeline.decimation(),
        "pipeline running: {} Hz around {} Hz, tone at {} Hz",
        SAMPLE_RATE,
        handle.baseband_freq(),
        TONE_HZ
    );

    let producer = thread::Builder::new()
        .name("waterfall-demo-source".into())
        .spawn(move || -> Result<(), TransportClosed> {
            let mut pipeline = pipeline;
            let step = core::f32::consts::TAU * TONE_HZ / SAMPLE_RATE;
            let mut phase = 0.0f32;
            let mut block = Vec::with_capacity(CHUNK);

            let total = (SAMPLE_RATE * SECONDS) as usize;
            let mut produced = 0;
            while produced < total {
                block.clear();
                for _ in 0..CHUNK.min(total - produced) {
                    block.push(Complex32::new(phase.cos(), phase.sin()) * 1_000.0);
                    phase = (phase + step) % core::f32::consts::TAU;
                }
                produced += block.len();
                pipeline.process_complex(&block)?;
            }
            Ok(())
        })
        .context("spawning source thread")?;

    let mut image = WaterfallBuffer::new(TRANSFORM_SIZE, config.source, WaterfallStyle::default())?;
    let mut painted = 0usize;
    while let Ok(frame) = rows.recv_blocking() {
        image.push_row(frame.bins());
        painted += 1;
        if painted == 100 {
            handle.set_average(false);
            info!("averaging disabled after {painted} rows");
        }
    }

    producer
        .join()
        .map_err(|_| anyhow::anyhow!("source thread panicked"))??;
    reader.join();

    write_ppm(&image, &output)?;
    info!("painted {painted} rows into {output}");
    Ok(())
}

fn write_ppm(buffer: &WaterfallBuffer, path: &str) -> Result<()> {
    let image = buffer.image();
    let rgb = image.to_rgb(buffer.colormap());

    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "P6\n{} {}\n255", image.width, image.height)?;
    out.write_all(&rgb)?;
    Ok(())
}
