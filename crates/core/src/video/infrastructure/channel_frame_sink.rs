use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::shared::display_image::DisplayImage;
use crate::video::domain::frame_sink::FrameSink;

/// Forwards display frames to another thread over a bounded channel.
///
/// When the consumer falls behind, new frames are dropped instead of
/// blocking the capture worker.
pub struct ChannelFrameSink {
    tx: Sender<DisplayImage>,
    dropped: usize,
}

impl ChannelFrameSink {
    /// Creates the sink and the receiving end for the display.
    pub fn bounded(capacity: usize) -> (Self, Receiver<DisplayImage>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
        (Self { tx, dropped: 0 }, rx)
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl FrameSink for ChannelFrameSink {
    fn present(&mut self, image: DisplayImage) {
        match self.tx.try_send(image) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => self.dropped += 1,
            Err(TrySendError::Disconnected(_)) => {
                if self.dropped == 0 {
                    log::debug!("Display receiver is gone; discarding frames");
                }
                self.dropped += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(index: usize) -> DisplayImage {
        DisplayImage {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
            frame_index: index,
        }
    }

    #[test]
    fn test_delivers_frames_in_order() {
        let (mut sink, rx) = ChannelFrameSink::bounded(4);
        sink.present(image(0));
        sink.present(image(1));
        let received: Vec<usize> = rx.try_iter().map(|i| i.frame_index).collect();
        assert_eq!(received, vec![0, 1]);
    }

    #[test]
    fn test_drops_when_full() {
        let (mut sink, rx) = ChannelFrameSink::bounded(1);
        sink.present(image(0));
        sink.present(image(1));
        assert_eq!(sink.dropped(), 1);
        assert_eq!(rx.try_recv().unwrap().frame_index, 0);
    }

    #[test]
    fn test_disconnected_receiver_does_not_panic() {
        let (mut sink, rx) = ChannelFrameSink::bounded(1);
        drop(rx);
        sink.present(image(0));
        assert_eq!(sink.dropped(), 1);
    }
}
