//! Fixed-record byte transport between the numeric pipeline and the reader.
//!
//! The writer accepts an arbitrary byte stream and hands complete records to
//! a bounded queue; the reader only ever observes whole records. Closing the
//! write end is the sole termination signal, and trailing bytes short of a
//! record are discarded at closure, never delivered.

use super::TransportClosed;
use async_channel::{Receiver, Sender};
use tracing::warn;

/// In-flight records before the producer stalls on backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Create a connected writer/receiver pair carrying records of exactly
/// `record_len` bytes, with at most `capacity` records in flight.
pub fn frame_channel(record_len: usize, capacity: usize) -> (FrameWriter, FrameReceiver) {
    assert!(record_len > 0, "record length must be greater than zero");
    let (tx, rx) = async_channel::bounded(capacity.max(1));
    (
        FrameWriter {
            record_len,
            pending: Vec::new(),
            tx,
        },
        FrameReceiver { record_len, rx },
    )
}

/// Write end, owned by the numeric pipeline.
pub struct FrameWriter {
    record_len: usize,
    pending: Vec<u8>,
    tx: Sender<Box<[u8]>>,
}

impl FrameWriter {
    pub fn record_len(&self) -> usize {
        self.record_len
    }

    /// Append bytes to the stream, blocking while the transport applies
    /// backpressure (the producer stalls, it never drops). Fails only once
    /// the read end has gone away.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), TransportClosed> {
        if self.pending.is_empty() {
            // Aligned writes skip the accumulator entirely.
            let mut records = bytes.chunks_exact(self.record_len);
            for record in records.by_ref() {
                self.send(record)?;
            }
            self.pending.extend_from_slice(records.remainder());
            return Ok(());
        }

        self.pending.extend_from_slice(bytes);
        let mut offset = 0;
        let mut result = Ok(());
        while self.pending.len() - offset >= self.record_len {
            let end = offset + self.record_len;
            result = self.send_slice(offset, end);
            offset = end;
            if result.is_err() {
                break;
            }
        }
        self.pending.drain(..offset);
        result
    }

    /// Close the write end, signalling end of stream to the reader. Called
    /// implicitly when the writer is dropped.
    pub fn close(&mut self) {
        if !self.pending.is_empty() {
            warn!(
                "discarding {} trailing bytes short of a full record",
                self.pending.len()
            );
            self.pending.clear();
        }
        self.tx.close();
    }

    fn send_slice(&self, start: usize, end: usize) -> Result<(), TransportClosed> {
        let record: Box<[u8]> = self.pending[start..end].into();
        self.tx
            .send_blocking(record)
            .map_err(|_| TransportClosed)
    }

    fn send(&self, record: &[u8]) -> Result<(), TransportClosed> {
        self.tx
            .send_blocking(record.into())
            .map_err(|_| TransportClosed)
    }
}

impl Drop for FrameWriter {
    fn drop(&mut self) {
        self.close();
    }
}

/// Read end, owned by exactly one [`super::FrameReader`].
pub struct FrameReceiver {
    record_len: usize,
    rx: Receiver<Box<[u8]>>,
}

impl FrameReceiver {
    pub fn record_len(&self) -> usize {
        self.record_len
    }

    /// Block until one full record is available. Returns `None` once the
    /// write end has closed and every buffered record has been drained;
    /// that is the normal end of stream, not an error to retry.
    pub fn read_exact(&self) -> Option<Box<[u8]>> {
        self.rx.recv_blocking().ok()
    }
}
