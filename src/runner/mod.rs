//! Probe runner: owns the HTTP session, the result log, and the probe order.

pub mod log;

use std::time::Instant;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{info, warn};

use crate::config::HarnessConfig;
use crate::probes::{self, Probe, ProbeContext};
use crate::report::{ProbeResult, ProbeStatus, RunReport};

pub use self::log::ResultLog;

pub struct ProbeRunner {
    client: Client,
    config: HarnessConfig,
    probes: Vec<Box<dyn Probe>>,
    log: ResultLog,
}

impl ProbeRunner {
    /// Runner with the full production suite.
    pub fn new(config: HarnessConfig) -> Result<Self> {
        Self::with_probes(config, probes::default_suite())
    }

    /// Runner with an explicit probe list, run in the given order.
    pub fn with_probes(config: HarnessConfig, probes: Vec<Box<dyn Probe>>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeouts.frontend().max(config.timeouts.backend()))
            .user_agent(concat!("prodcheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            config,
            probes,
            log: ResultLog::new(),
        })
    }

    pub fn probe_names(&self) -> Vec<&'static str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    /// Append one result to the log and echo it to the console.
    pub async fn record(
        &self,
        name: &str,
        status: ProbeStatus,
        message: impl Into<String>,
        duration: Option<f64>,
    ) {
        let message = message.into();
        match status {
            ProbeStatus::Pass => info!(probe = name, %message, ?duration, "probe passed"),
            ProbeStatus::Fail => warn!(probe = name, %message, ?duration, "probe failed"),
        }
        self.log
            .append(ProbeResult::new(name, status, message, duration))
            .await;
    }

    /// Run a single probe, timing it and recording exactly one result.
    pub async fn run_probe(&self, probe: &dyn Probe) {
        let ctx = ProbeContext::new(&self.client, &self.config);
        let start = Instant::now();
        let outcome = probe.check(&ctx).await;
        let duration = Some(start.elapsed().as_secs_f64());

        match outcome {
            Ok(verdict) if verdict.passed => {
                self.record(probe.name(), ProbeStatus::Pass, verdict.message, duration)
                    .await
            }
            Ok(verdict) => {
                self.record(probe.name(), ProbeStatus::Fail, verdict.message, duration)
                    .await
            }
            Err(e) => {
                self.record(probe.name(), ProbeStatus::Fail, format!("Exception: {}", e), duration)
                    .await
            }
        }
    }

    /// Run every registered probe in order, pausing between them.
    /// Returns true iff no failures were recorded.
    pub async fn run_all(&self) -> bool {
        let pause = self.config.run.pause();
        for (idx, probe) in self.probes.iter().enumerate() {
            if idx > 0 && !pause.is_zero() {
                tokio::time::sleep(pause).await;
            }
            self.run_probe(probe.as_ref()).await;
        }
        self.log.failure_count().await == 0
    }

    /// Snapshot of everything recorded so far.
    pub async fn results(&self) -> Vec<ProbeResult> {
        self.log.snapshot().await
    }

    /// Fold the log into a report, print the summary, and write the JSON file.
    pub async fn write_report(&self) -> Result<RunReport> {
        let report = RunReport::from_results(self.log.snapshot().await);
        print!("{}", report.render_summary());

        let path = &self.config.run.report_path;
        report.write_json(path)?;
        info!(path = %path.display(), total = report.summary.total, "report written");
        println!("\n📄 Detailed report saved to: {}", path.display());
        println!("\n{}", report.render_verdict());

        Ok(report)
    }

    /// Same as [`write_report`](Self::write_report), returning only whether
    /// every probe passed.
    pub async fn generate_report(&self) -> Result<bool> {
        Ok(self.write_report().await?.all_passed())
    }
}
