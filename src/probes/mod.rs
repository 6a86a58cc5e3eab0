//! Probes run against the service under test.
//!
//! Each probe issues one or more HTTP requests and classifies the outcome as
//! a [`Verdict`]. Timing and recording belong to the runner, so a probe can
//! never record more than one result.

use reqwest::header::{AsHeaderName, HeaderMap};
use reqwest::{Client, Method, RequestBuilder};
use thiserror::Error;

use crate::config::HarnessConfig;

pub mod api;
pub mod cors;
pub mod frontend;
pub mod health;
pub mod i18n;
pub mod load;
pub mod performance;
pub mod rate_limit;
pub mod security;

/// Failures that prevent a probe from classifying a response at all.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("load worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Classified outcome of a probe, before timing is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    pub message: String,
}

impl Verdict {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// Everything a probe may touch: the shared client and the run configuration.
pub struct ProbeContext<'a> {
    pub client: &'a Client,
    pub config: &'a HarnessConfig,
}

impl<'a> ProbeContext<'a> {
    pub fn new(client: &'a Client, config: &'a HarnessConfig) -> Self {
        Self { client, config }
    }

    /// Request against a backend path with the backend timeout applied.
    pub fn backend(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.config.targets.backend_url(path))
            .timeout(self.config.timeouts.backend())
    }

    /// GET of the frontend root with the frontend timeout applied.
    pub fn frontend(&self) -> RequestBuilder {
        self.client
            .get(&self.config.targets.frontend)
            .timeout(self.config.timeouts.frontend())
    }
}

/// Trait for all probes in the suite.
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    /// Name the result is recorded under.
    fn name(&self) -> &'static str;

    /// Issue the probe's request(s) and classify the outcome.
    async fn check(&self, ctx: &ProbeContext<'_>) -> Result<Verdict, ProbeError>;
}

/// The production suite, in execution order.
pub fn default_suite() -> Vec<Box<dyn Probe>> {
    vec![
        Box::new(health::HealthProbe),
        Box::new(cors::CorsProbe),
        Box::new(api::ApiEndpointsProbe),
        Box::new(security::SecurityHeadersProbe),
        Box::new(rate_limit::RateLimitProbe),
        Box::new(frontend::FrontendAccessibilityProbe),
        Box::new(performance::PerformanceProbe),
        Box::new(load::ConcurrentLoadProbe),
        Box::new(i18n::InternationalSupportProbe),
    ]
}

/// Header value as text, treating absent, empty and non-UTF-8 values alike.
/// Whitespace is a value.
pub(crate) fn header_text<K: AsHeaderName>(headers: &HeaderMap, name: K) -> Option<&str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}
