//! Background reader turning the frame transport into row notifications.

use super::channel::FrameReceiver;
use crate::dsp::SpectralFrame;
use async_channel::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Row notifications in flight toward the renderer before the reader stalls.
pub const NOTIFY_CAPACITY: usize = 64;

/// Dedicated blocking-read worker. Exactly one exists per pipeline instance
/// and it is the unique owner of the transport's read end; it runs until the
/// write end closes or the notification target goes away.
pub struct FrameReader {
    handle: JoinHandle<()>,
}

impl FrameReader {
    /// Spawn the reader thread, forwarding each decoded frame as an ordered
    /// FIFO notification on `notify`.
    pub fn spawn(receiver: FrameReceiver, notify: Sender<SpectralFrame>) -> Self {
        let handle = thread::Builder::new()
            .name("specfall-frame-reader".into())
            .spawn(move || read_loop(receiver, notify))
            .expect("failed to spawn frame reader thread");
        Self { handle }
    }

    /// Create the notification channel and spawn in one step.
    pub fn with_channel(receiver: FrameReceiver) -> (Self, Receiver<SpectralFrame>) {
        let (tx, rx) = async_channel::bounded(NOTIFY_CAPACITY);
        (Self::spawn(receiver, tx), rx)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the reader to observe end of stream and stop.
    pub fn join(self) {
        let _ = self.handle.join();
    }
}

fn read_loop(receiver: FrameReceiver, notify: Sender<SpectralFrame>) {
    let mut rows = 0u64;
    while let Some(record) = receiver.read_exact() {
        let frame = SpectralFrame::from_record(&record);
        if notify.send_blocking(frame).is_err() {
            debug!("row consumer disposed; reader stopping");
            return;
        }
        rows += 1;
    }
    info!("frame transport closed after {rows} rows");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::channel::frame_channel;
    use std::time::Duration;

    fn encode(bins: &[f32]) -> Vec<u8> {
        bytemuck::cast_slice(bins).to_vec()
    }

    #[test]
    fn forwards_frames_in_producer_order_then_stops() {
        let (mut writer, receiver) = frame_channel(8, 16);
        let (reader, rows) = FrameReader::with_channel(receiver);

        for value in [1.0f32, 2.0, 3.0] {
            writer.write(&encode(&[value, -value])).unwrap();
        }
        drop(writer);

        for value in [1.0f32, 2.0, 3.0] {
            let frame = rows.recv_blocking().expect("row notification");
            assert_eq!(frame.bins(), &[value, -value]);
        }
        // End of stream: the notification channel closes behind the reader.
        assert!(rows.recv_blocking().is_err());

        reader.join();
    }

    #[test]
    fn survives_a_disposed_notification_target() {
        let (mut writer, receiver) = frame_channel(4, 16);
        let (reader, rows) = FrameReader::with_channel(receiver);
        drop(rows);

        // The reader drops the notification and stops; the writer then sees
        // the transport close. Neither side faults.
        let mut closed = false;
        for _ in 0..100 {
            if writer.write(&encode(&[0.5])).is_err() {
                closed = true;
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        assert!(closed, "writer never observed closure");
        reader.join();
    }

    #[test]
    fn reports_running_state_via_is_finished() {
        let (writer, receiver) = frame_channel(4, 16);
        let (reader, _rows) = FrameReader::with_channel(receiver);
        assert!(!reader.is_finished());

        drop(writer);
        // Closure is detected within one read cycle.
        for _ in 0..500 {
            if reader.is_finished() {
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        assert!(reader.is_finished());
        reader.join();
    }
}
