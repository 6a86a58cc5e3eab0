use reqwest::{Method, StatusCode};

use super::{Probe, ProbeContext, ProbeError, Verdict};

/// Burst of sequential `/health` requests that should trip the limiter.
pub struct RateLimitProbe;

#[async_trait::async_trait]
impl Probe for RateLimitProbe {
    fn name(&self) -> &'static str {
        "Rate Limiting"
    }

    async fn check(&self, ctx: &ProbeContext<'_>) -> Result<Verdict, ProbeError> {
        let burst = ctx.config.thresholds.rate_limit_burst;
        let mut statuses = Vec::with_capacity(burst);
        for _ in 0..burst {
            let response = ctx.backend(Method::GET, "/health").send().await?;
            statuses.push(response.status().as_u16());
        }
        Ok(classify(&statuses))
    }
}

fn classify(statuses: &[u16]) -> Verdict {
    match statuses
        .iter()
        .position(|&s| s == StatusCode::TOO_MANY_REQUESTS.as_u16())
    {
        Some(idx) => Verdict::pass(format!(
            "Rate limiting is working (HTTP 429 on request {} of {})",
            idx + 1,
            statuses.len()
        )),
        None => Verdict::fail(format!("No rate limiting detected: {:?}", statuses)),
    }
}
