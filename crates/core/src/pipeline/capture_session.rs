use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::pipeline::capture_loop::{CaptureConfig, CaptureLoop, CaptureParts, CaptureStats};
use crate::pipeline::clock::{Clock, SystemClock};
use crate::pipeline::frame_slot::FrameWriter;
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::frame_source::{CaptureError, FrameSource};

struct Worker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<CaptureParts>,
}

/// Start/stop control around a capture loop running on its own thread.
///
/// While idle the session owns the source, slot writer and sink. `start`
/// moves them into the worker; `stop` joins the worker and takes them
/// back, with the source already closed.
///
/// A worker panic is terminal: the parts die with the thread, `stop`
/// reports [`CaptureError::WorkerPanicked`] and so does every later
/// `start`. Build a new session to capture again. Release builds abort on
/// panic, so this only surfaces in unwinding builds.
pub struct CaptureSession {
    idle: Option<CaptureParts>,
    worker: Option<Worker>,
    config: CaptureConfig,
    device: String,
}

impl CaptureSession {
    pub fn new(source: Box<dyn FrameSource>, writer: FrameWriter, sink: Box<dyn FrameSink>) -> Self {
        Self::with_clock(
            source,
            writer,
            sink,
            Box::new(SystemClock),
            CaptureConfig::default(),
        )
    }

    pub fn with_clock(
        source: Box<dyn FrameSource>,
        writer: FrameWriter,
        sink: Box<dyn FrameSink>,
        clock: Box<dyn Clock>,
        config: CaptureConfig,
    ) -> Self {
        let device = source.describe();
        Self {
            idle: Some(CaptureParts {
                source,
                writer,
                sink,
                clock,
                stats: CaptureStats::default(),
            }),
            worker: None,
            config,
            device,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.worker.is_some()
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// Opens the source and starts the capture worker.
    ///
    /// On [`CaptureError::DeviceUnavailable`] the session stays idle and
    /// can be started again later.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.worker.is_some() {
            return Err(CaptureError::AlreadyStreaming);
        }
        // Only `None` after a worker panic took the parts down with it.
        let mut parts = self.idle.take().ok_or(CaptureError::WorkerPanicked)?;
        if let Err(e) = parts.source.open() {
            self.idle = Some(parts);
            return Err(e);
        }

        let stop = Arc::new(AtomicBool::new(false));
        let capture = CaptureLoop::new(parts, self.config.clone(), stop.clone());
        let handle = std::thread::spawn(move || capture.run());
        self.worker = Some(Worker { stop, handle });
        log::info!("Streaming from {}", self.device);
        Ok(())
    }

    /// Stops the worker and waits for it; the device is released on return.
    ///
    /// Returns the stats of the run that just ended, or zeroed stats when
    /// the session was not streaming.
    pub fn stop(&mut self) -> Result<CaptureStats, CaptureError> {
        let Some(worker) = self.worker.take() else {
            return Ok(CaptureStats::default());
        };
        worker.stop.store(true, Ordering::Release);
        let parts = worker.handle.join().map_err(|_| {
            log::error!("Capture worker for {} panicked", self.device);
            CaptureError::WorkerPanicked
        })?;
        let stats = parts.stats;
        self.idle = Some(parts);
        log::info!(
            "Stopped {} after {:.1}s ({} frames, {} failed reads)",
            self.device,
            stats.streamed.as_secs_f64(),
            stats.frames_captured,
            stats.read_failures
        );
        Ok(stats)
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        if self.is_streaming() {
            if let Err(e) = self.stop() {
                log::warn!("Stopping capture on drop failed: {e}");
            }
        }
    }
}
