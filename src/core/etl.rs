use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor_enabled: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor_enabled: false,
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor_enabled,
        }
    }

    pub async fn run(&self) -> Result<String> {
        #[cfg(feature = "cli")]
        let monitor = crate::utils::monitor::SystemMonitor::new(self.monitor_enabled);
        #[cfg(not(feature = "cli"))]
        let _ = self.monitor_enabled;

        tracing::info!("Starting extraction...");
        let column = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} non-empty cells from column '{}'",
            column.values.len(),
            column.column
        );

        tracing::info!("De-duplicating...");
        let report = self.pipeline.transform(column).await?;
        tracing::info!(
            "Kept {} unique emails, removed {} duplicates",
            report.unique_count,
            report.duplicate_count
        );

        tracing::info!("Writing output...");
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Output saved to: {}", output_path);

        #[cfg(feature = "cli")]
        monitor.log_summary();

        Ok(output_path)
    }
}
