use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for analysis stage events.
///
/// Lets the CLI print a timing summary and the desktop stay silent without
/// changing the use case.
pub trait PipelineLogger: Send {
    /// Record how long a named stage took for one analysis.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. faces or eyes found).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI-oriented logger that keeps per-stage timings and metrics and
/// reports them through `log` when asked for a summary.
pub struct StdoutPipelineLogger {
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
}

impl StdoutPipelineLogger {
    pub fn new() -> Self {
        Self {
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
        }
    }

    /// Number of analyses seen, taken from the most-recorded stage.
    pub fn runs(&self) -> usize {
        self.timings.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Analysis summary ({} runs, {:.1}s total):",
            self.runs(),
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = if durations.is_empty() {
                0.0
            } else {
                total_ms / durations.len() as f64
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.1}ms"
            ));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            let values = &self.metrics[name];
            let avg = if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            };
            lines.push(format!("  {name}: avg {avg:.1}"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.timing("detect_faces", 5.0);
        logger.metric("faces", 1.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_records_values() {
        let mut logger = StdoutPipelineLogger::new();
        logger.timing("detect_faces", 20.0);
        logger.timing("detect_faces", 30.0);
        logger.timing("annotate", 5.0);

        let detect = logger.timings_for("detect_faces").unwrap();
        assert_eq!(detect.len(), 2);
        assert_relative_eq!(detect[0], 20.0);
        assert_relative_eq!(detect[1], 30.0);
        assert_eq!(logger.timings_for("annotate").unwrap().len(), 1);
        assert!(logger.timings_for("preprocess").is_none());
    }

    #[test]
    fn test_runs_follow_most_recorded_stage() {
        let mut logger = StdoutPipelineLogger::new();
        assert_eq!(logger.runs(), 0);
        logger.timing("preprocess", 1.0);
        logger.timing("preprocess", 1.0);
        logger.timing("annotate", 1.0);
        assert_eq!(logger.runs(), 2);
    }

    #[test]
    fn test_summary_includes_timing_and_metrics() {
        let mut logger = StdoutPipelineLogger::new();
        logger.timing("preprocess", 4.0);
        logger.timing("detect_faces", 12.0);
        logger.metric("eyes", 1.0);
        logger.metric("eyes", 2.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Analysis summary (1 runs"));
        assert!(summary.contains("preprocess"));
        assert!(summary.contains("detect_faces"));
        assert!(summary.contains("eyes: avg 1.5"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = StdoutPipelineLogger::new();
        assert!(logger.summary_string().is_none());
    }
}
