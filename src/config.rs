//! TOML configuration for a prodcheck run.
//!
//! Every section has compiled-in defaults, so an empty (or absent) config
//! file yields the stock production gate. The config file path comes from
//! `--config`, then the `PRODCHECK_CONFIG` environment variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Environment variable `--config` falls back to.
pub const CONFIG_ENV: &str = "PRODCHECK_CONFIG";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_REPORT_PATH: &str = "test_report.json";
pub const DEFAULT_CORS_ORIGIN: &str = "https://mocko-designs.vercel.app";

// ---------------------------------------------------------------------------
// Acceptance thresholds
// ---------------------------------------------------------------------------

/// Status codes an API endpoint may answer with and still count as reachable.
pub const DEFAULT_API_ACCEPTED_STATUSES: [u16; 3] = [200, 401, 403];
/// Sequential `/health` requests fired to provoke a 429.
pub const DEFAULT_RATE_LIMIT_BURST: usize = 12;
/// Timed `/health` samples taken by the performance probe.
pub const DEFAULT_PERFORMANCE_SAMPLES: usize = 5;
/// Mean backend latency must stay strictly below this (seconds).
pub const DEFAULT_MAX_BACKEND_LATENCY_SECS: f64 = 0.5;
/// Frontend page load must stay strictly below this (seconds).
pub const DEFAULT_MAX_FRONTEND_LATENCY_SECS: f64 = 3.0;
/// Parallel `/health` requests issued by the concurrent-load probe.
pub const DEFAULT_LOAD_REQUESTS: usize = 20;
/// Size of the worker pool for the concurrent-load probe.
pub const DEFAULT_LOAD_WORKERS: usize = 20;
/// Minimum percentage of 200s under load (inclusive).
pub const DEFAULT_MIN_LOAD_SUCCESS_PERCENT: f64 = 95.0;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Where the config file path came from.
#[derive(Debug, Clone, Copy)]
pub enum ConfigSource<'a> {
    /// `--config` on the command line.
    Flag(&'a Path),
    /// The `PRODCHECK_CONFIG` environment variable.
    Env(&'a Path),
    /// No config file.
    Defaults,
}

/// Root configuration for a harness run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub targets: TargetConfig,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HarnessConfig {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded harness configuration");
        Ok(config)
    }

    /// Resolve the configuration for this invocation.
    ///
    /// A path given on the command line must load; a failure there is an
    /// error. A path taken from `PRODCHECK_CONFIG` that cannot be loaded only
    /// warns and falls back to defaults.
    pub fn resolve(source: ConfigSource<'_>) -> Result<Self> {
        match source {
            ConfigSource::Flag(path) => Self::load(path),
            ConfigSource::Env(path) => Self::load(path).or_else(|e| {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "PRODCHECK_CONFIG set but file could not be loaded, using defaults"
                );
                Ok(Self::default())
            }),
            ConfigSource::Defaults => {
                debug!("no config file given, using compiled-in defaults");
                Ok(Self::default())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// The service under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Base URL of the backend API (no trailing slash required).
    pub backend: String,
    /// Base URL of the frontend.
    pub frontend: String,
    /// `Origin` sent with the CORS preflight.
    pub cors_origin: String,
    /// Backend paths checked by the API endpoints probe, with display labels.
    pub api_endpoints: Vec<ApiEndpoint>,
    /// `Accept-Language` values checked by the international support probe.
    pub languages: Vec<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_BACKEND_URL.to_string(),
            frontend: DEFAULT_FRONTEND_URL.to_string(),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            api_endpoints: vec![
                ApiEndpoint::new("/api/v1/designs", "Designs endpoint"),
                ApiEndpoint::new("/api/v1/templates", "Templates endpoint"),
                ApiEndpoint::new("/api/v1/fonts", "Fonts endpoint"),
                ApiEndpoint::new("/api/v1/auth/me", "Auth endpoint"),
            ],
            languages: ["en-US", "es-ES", "fr-FR", "de-DE", "ja-JP", "zh-CN"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl TargetConfig {
    /// Join a backend-relative path onto the backend base URL.
    pub fn backend_url(&self, path: &str) -> String {
        format!("{}{}", self.backend.trim_end_matches('/'), path)
    }
}

/// One backend path exercised by the API endpoints probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub path: String,
    pub label: String,
}

impl ApiEndpoint {
    pub fn new(path: &str, label: &str) -> Self {
        Self {
            path: path.to_string(),
            label: label.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Pass/fail gates. Defaults are the `DEFAULT_*` constants above.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub api_accepted_statuses: Vec<u16>,
    pub rate_limit_burst: usize,
    pub performance_samples: usize,
    pub max_backend_latency_secs: f64,
    pub max_frontend_latency_secs: f64,
    pub load_requests: usize,
    pub load_workers: usize,
    pub min_load_success_percent: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            api_accepted_statuses: DEFAULT_API_ACCEPTED_STATUSES.to_vec(),
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
            performance_samples: DEFAULT_PERFORMANCE_SAMPLES,
            max_backend_latency_secs: DEFAULT_MAX_BACKEND_LATENCY_SECS,
            max_frontend_latency_secs: DEFAULT_MAX_FRONTEND_LATENCY_SECS,
            load_requests: DEFAULT_LOAD_REQUESTS,
            load_workers: DEFAULT_LOAD_WORKERS,
            min_load_success_percent: DEFAULT_MIN_LOAD_SUCCESS_PERCENT,
        }
    }
}

// ---------------------------------------------------------------------------
// Timeouts
// ---------------------------------------------------------------------------

/// Per-request timeouts, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Applied to every backend request.
    pub backend_secs: u64,
    /// Applied to every frontend request.
    pub frontend_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            backend_secs: 10,
            frontend_secs: 15,
        }
    }
}

impl TimeoutConfig {
    pub fn backend(&self) -> Duration {
        Duration::from_secs(self.backend_secs)
    }

    pub fn frontend(&self) -> Duration {
        Duration::from_secs(self.frontend_secs)
    }
}

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

/// Sequencing and output of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Pause inserted between consecutive probes (milliseconds).
    pub pause_ms: u64,
    /// Where the JSON report is written. Overwritten every run.
    pub report_path: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pause_ms: 500,
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }
}

impl RunConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum tracing level when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
