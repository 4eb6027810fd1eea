//! Single-slot handoff for the "current frame".
//!
//! One writer (the capture worker) and one reader (whoever analyzes).
//! Publishing overwrites any frame the reader has not picked up yet, so
//! the reader only ever sees the most recent capture. Neither end is
//! `Clone`; ownership enforces the single-writer / single-reader shape.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::shared::frame::Frame;

/// Creates a connected writer/reader pair with an empty slot.
pub fn frame_slot() -> (FrameWriter, FrameReader) {
    let (tx, rx) = crossbeam_channel::bounded(1);
    (
        FrameWriter {
            tx,
            evict: rx.clone(),
        },
        FrameReader { rx, latest: None },
    )
}

pub struct FrameWriter {
    tx: Sender<Arc<Frame>>,
    evict: Receiver<Arc<Frame>>,
}

impl FrameWriter {
    /// Replaces whatever is in the slot with `frame`. Never blocks.
    pub fn publish(&self, frame: Arc<Frame>) {
        while self.evict.try_recv().is_ok() {}
        // The slot is empty and this is the only sender, so this only
        // fails if the reader took the frame in between, which is fine.
        let _ = self.tx.try_send(frame);
    }
}

pub struct FrameReader {
    rx: Receiver<Arc<Frame>>,
    latest: Option<Arc<Frame>>,
}

impl FrameReader {
    /// Returns a frame published since the last call, if any.
    pub fn take_new(&mut self) -> Option<Arc<Frame>> {
        let mut fresh = None;
        loop {
            match self.rx.try_recv() {
                Ok(frame) => fresh = Some(frame),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if let Some(frame) = &fresh {
            self.latest = Some(Arc::clone(frame));
        }
        fresh
    }

    /// The most recent frame ever published, or `None` before the first.
    pub fn latest(&mut self) -> Option<Arc<Frame>> {
        self.take_new();
        self.latest.clone()
    }

    pub fn has_frame(&mut self) -> bool {
        self.latest().is_some()
    }

    /// Forgets the cached frame and anything still in the slot.
    pub fn clear(&mut self) {
        while self.rx.try_recv().is_ok() {}
        self.latest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: usize) -> Arc<Frame> {
        Arc::new(Frame::new(vec![index as u8; 12], 2, 2, 3, index))
    }

    #[test]
    fn test_reader_before_publish_has_no_frame() {
        let (_writer, mut reader) = frame_slot();
        assert!(!reader.has_frame());
        assert!(reader.latest().is_none());
        assert!(reader.take_new().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let (writer, mut reader) = frame_slot();
        writer.publish(frame(1));
        writer.publish(frame(2));
        writer.publish(frame(3));
        assert_eq!(reader.take_new().unwrap().index(), 3);
        assert!(reader.take_new().is_none());
    }

    #[test]
    fn test_latest_is_sticky_between_publishes() {
        let (writer, mut reader) = frame_slot();
        writer.publish(frame(1));
        assert_eq!(reader.latest().unwrap().index(), 1);
        assert_eq!(reader.latest().unwrap().index(), 1);
        writer.publish(frame(2));
        assert_eq!(reader.latest().unwrap().index(), 2);
    }

    #[test]
    fn test_latest_survives_writer_drop() {
        let (writer, mut reader) = frame_slot();
        writer.publish(frame(5));
        drop(writer);
        assert_eq!(reader.latest().unwrap().index(), 5);
        assert!(reader.take_new().is_none());
    }

    #[test]
    fn test_clear_forgets_frames() {
        let (writer, mut reader) = frame_slot();
        writer.publish(frame(1));
        assert!(reader.has_frame());
        writer.publish(frame(2));
        reader.clear();
        assert!(!reader.has_frame());
    }

    #[test]
    fn test_publish_from_another_thread() {
        let (writer, mut reader) = frame_slot();
        let handle = std::thread::spawn(move || {
            for i in 0..100 {
                writer.publish(frame(i));
            }
        });
        handle.join().unwrap();
        assert_eq!(reader.latest().unwrap().index(), 99);
    }
}
