use reqwest::{Method, StatusCode};
use serde_json::Value;

use super::{Probe, ProbeContext, ProbeError, Verdict};

/// GET `/health` and expect `{"status": "healthy"}`.
pub struct HealthProbe;

#[async_trait::async_trait]
impl Probe for HealthProbe {
    fn name(&self) -> &'static str {
        "Health Check"
    }

    async fn check(&self, ctx: &ProbeContext<'_>) -> Result<Verdict, ProbeError> {
        let response = ctx.backend(Method::GET, "/health").send().await?;
        let status = response.status();
        let body = response.text().await?;
        classify(status, &body)
    }
}

fn classify(status: StatusCode, body: &str) -> Result<Verdict, ProbeError> {
    if status != StatusCode::OK {
        return Ok(Verdict::fail(format!("HTTP {}", status.as_u16())));
    }

    let data: Value = serde_json::from_str(body)?;
    if data.get("status").and_then(Value::as_str) == Some("healthy") {
        Ok(Verdict::pass("Service is healthy"))
    } else {
        Ok(Verdict::fail(format!("Unhealthy status: {}", data)))
    }
}
