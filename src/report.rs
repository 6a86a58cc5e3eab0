//! Probe results and the end-of-run report.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeStatus {
    Pass,
    Fail,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Pass => write!(f, "PASS"),
            ProbeStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Outcome of a single probe execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    #[serde(rename = "test")]
    pub name: String,
    pub status: ProbeStatus,
    pub message: String,
    /// Wall-clock seconds spent in the probe.
    pub duration: Option<f64>,
    pub timestamp: DateTime<Local>,
}

impl ProbeResult {
    pub fn new(name: &str, status: ProbeStatus, message: String, duration: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message,
            duration,
            timestamp: Local::now(),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == ProbeStatus::Pass
    }
}

/// Console line for a recorded result, coloured by status.
pub fn format_result_line(result: &ProbeResult) -> String {
    let color = match result.status {
        ProbeStatus::Pass => GREEN,
        ProbeStatus::Fail => RED,
    };
    let mut line = format!(
        "{}[{}]{} {}: {}",
        color, result.status, RESET, result.name, result.message
    );
    if let Some(secs) = result.duration {
        line.push_str(&format!(" ({:.2}s)", secs));
    }
    line
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage of passed probes; 0.0 for an empty run.
    pub success_rate: f64,
}

impl Summary {
    pub fn from_results(results: &[ProbeResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed()).count();
        let failed = total - passed;
        let success_rate = if total == 0 {
            0.0
        } else {
            passed as f64 / total as f64 * 100.0
        };
        Self {
            total,
            passed,
            failed,
            success_rate,
        }
    }
}

/// Full report for one run, as written to the JSON report file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub summary: Summary,
    pub details: Vec<ProbeResult>,
    pub timestamp: DateTime<Local>,
}

impl RunReport {
    pub fn from_results(details: Vec<ProbeResult>) -> Self {
        Self {
            summary: Summary::from_results(&details),
            details,
            timestamp: Local::now(),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.summary.failed == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProbeResult> {
        self.details.iter().filter(|r| !r.passed())
    }

    /// Human-readable summary block printed at the end of a run.
    pub fn render_summary(&self) -> String {
        let rule = "=".repeat(60);
        let mut out = String::new();
        out.push_str(&format!("\n{}\n📊 TEST RESULTS SUMMARY\n{}\n", rule, rule));
        out.push_str(&format!("✅ Passed: {}\n", self.summary.passed));
        out.push_str(&format!("❌ Failed: {}\n", self.summary.failed));
        out.push_str(&format!("📈 Success Rate: {:.1}%\n", self.summary.success_rate));

        if self.summary.failed > 0 {
            out.push_str("\n🔍 FAILED TESTS:\n");
            for result in self.failures() {
                out.push_str(&format!("   ❌ {}: {}\n", result.name, result.message));
            }
        }
        out
    }

    /// Closing verdict line.
    pub fn render_verdict(&self) -> String {
        if self.all_passed() {
            "🎉 All tests passed! Ready for production deployment.".to_string()
        } else {
            format!(
                "⚠️ {} tests failed. Please fix issues before deployment.",
                self.summary.failed
            )
        }
    }

    /// Write the report as pretty-printed JSON, replacing any previous file.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize run report")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report: {}", path.display()))?;
        Ok(())
    }
}
