use crate::domain::model::Outcome;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives one run: extract the table, compute the report, render the chart.
pub struct StatsEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> StatsEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn run(&self) -> Result<Outcome> {
        tracing::debug!("Loading dataset...");
        let frame = self.pipeline.extract()?;
        tracing::debug!("Loaded {} rows x {} columns", frame.n_rows(), frame.n_cols());

        let computed = self.pipeline.compute(&frame)?;
        for line in &computed.lines {
            println!("{}", line);
        }

        let outcome = self.pipeline.render(computed.chart)?;
        if let Outcome::Plot { filename } = &outcome {
            println!("Saved plot: {}", filename);
        }

        if let Some(stats) = self.monitor.get_stats() {
            tracing::info!(
                "Elapsed: {:.2?}, memory: {} MB (peak {} MB)",
                stats.elapsed_time,
                stats.memory_usage_mb,
                stats.peak_memory_mb
            );
        }

        Ok(outcome)
    }
}
