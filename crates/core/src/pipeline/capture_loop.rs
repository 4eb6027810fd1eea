use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::pipeline::clock::Clock;
use crate::pipeline::frame_slot::FrameWriter;
use crate::shared::constants::{FRAME_INTERVAL, READ_FAILURE_LOG_EVERY, READ_RETRY_INTERVAL};
use crate::shared::display_image::DisplayImage;
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::frame_source::FrameSource;

/// Cadence of the capture loop.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureConfig {
    /// Delay after a successful tick.
    pub frame_interval: Duration,
    /// Delay after a failed read.
    pub retry_interval: Duration,
    /// Consecutive failures between repeated warnings.
    pub failure_log_every: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            frame_interval: FRAME_INTERVAL,
            retry_interval: READ_RETRY_INTERVAL,
            failure_log_every: READ_FAILURE_LOG_EVERY,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub frames_captured: usize,
    pub read_failures: usize,
    pub consecutive_failures: usize,
    /// Time from the first tick until the loop saw the stop flag.
    pub streamed: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stop was requested; nothing was read.
    Stopped,
    /// A frame with this capture index was published.
    Captured(usize),
    /// The read failed; the tick was skipped.
    ReadFailed,
}

/// Everything the loop owns, handed back when it finishes.
pub struct CaptureParts {
    pub source: Box<dyn FrameSource>,
    pub writer: FrameWriter,
    pub sink: Box<dyn FrameSink>,
    pub clock: Box<dyn Clock>,
    pub stats: CaptureStats,
}

/// Pulls frames from an open source until the stop flag is set.
pub struct CaptureLoop {
    parts: CaptureParts,
    config: CaptureConfig,
    stop: Arc<AtomicBool>,
}

impl CaptureLoop {
    pub fn new(mut parts: CaptureParts, config: CaptureConfig, stop: Arc<AtomicBool>) -> Self {
        parts.stats = CaptureStats::default();
        Self {
            parts,
            config,
            stop,
        }
    }

    pub fn stats(&self) -> CaptureStats {
        self.parts.stats
    }

    /// One iteration: check stop, read, publish or back off.
    pub fn tick(&mut self) -> TickOutcome {
        if self.stop.load(Ordering::Acquire) {
            return TickOutcome::Stopped;
        }

        match self.parts.source.read_frame() {
            Ok(frame) => {
                let stats = &mut self.parts.stats;
                if stats.consecutive_failures > 0 {
                    log::info!(
                        "{} recovered after {} failed reads",
                        self.parts.source.describe(),
                        stats.consecutive_failures
                    );
                }
                stats.consecutive_failures = 0;
                stats.frames_captured += 1;

                let index = frame.index();
                let frame = Arc::new(frame);
                let display = DisplayImage::from_frame(&frame);
                self.parts.writer.publish(frame);
                self.parts.sink.present(display);
                self.parts.clock.sleep(self.config.frame_interval);
                TickOutcome::Captured(index)
            }
            Err(e) => {
                let stats = &mut self.parts.stats;
                stats.read_failures += 1;
                stats.consecutive_failures += 1;
                let streak = stats.consecutive_failures;
                if streak == 1 || streak % self.config.failure_log_every.max(1) == 0 {
                    log::warn!(
                        "{}: {e} ({streak} in a row, retrying)",
                        self.parts.source.describe()
                    );
                }
                self.parts.clock.sleep(self.config.retry_interval);
                TickOutcome::ReadFailed
            }
        }
    }

    /// Ticks until stopped, closes the source and returns the parts.
    pub fn run(mut self) -> CaptureParts {
        log::debug!("Capture loop started on {}", self.parts.source.describe());
        let started = self.parts.clock.now();
        while self.tick() != TickOutcome::Stopped {}
        self.parts.stats.streamed = self
            .parts
            .clock
            .now()
            .saturating_duration_since(started);
        self.parts.source.close();
        log::debug!(
            "Capture loop finished after {:.1}s: {} frames, {} failed reads",
            self.parts.stats.streamed.as_secs_f64(),
            self.parts.stats.frames_captured,
            self.parts.stats.read_failures
        );
        self.parts
    }
}
