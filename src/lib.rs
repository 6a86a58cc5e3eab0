//! prodcheck -- production smoke-test harness.
//!
//! This crate probes a deployed backend and frontend over HTTP, records one
//! PASS/FAIL result per probe, and writes a JSON run report.

pub mod config;
pub mod probes;
pub mod report;
pub mod runner;

use anyhow::Result;
use tracing::Instrument;

use crate::config::HarnessConfig;
use crate::report::RunReport;
use crate::runner::ProbeRunner;

/// Run the full production suite and write the report.
pub async fn run(config: HarnessConfig) -> Result<RunReport> {
    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("run", %run_id);

    async move {
        tracing::info!(
            backend = %config.targets.backend,
            frontend = %config.targets.frontend,
            "Starting production test suite"
        );
        let runner = ProbeRunner::new(config)?;
        tracing::debug!(probes = ?runner.probe_names(), "registered probes");

        println!("🧪 Starting Production Testing Suite");
        println!("{}", "=".repeat(60));

        runner.run_all().await;
        runner.write_report().await
    }
    .instrument(span)
    .await
}
