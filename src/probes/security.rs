use reqwest::header::HeaderMap;
use reqwest::Method;

use super::{header_text, Probe, ProbeContext, ProbeError, Verdict};

/// Headers every backend response must carry.
const REQUIRED_HEADERS: [&str; 4] = [
    "X-Content-Type-Options",
    "X-Frame-Options",
    "X-XSS-Protection",
    "Strict-Transport-Security",
];

pub struct SecurityHeadersProbe;

#[async_trait::async_trait]
impl Probe for SecurityHeadersProbe {
    fn name(&self) -> &'static str {
        "Security Headers"
    }

    async fn check(&self, ctx: &ProbeContext<'_>) -> Result<Verdict, ProbeError> {
        let response = ctx.backend(Method::GET, "/health").send().await?;
        Ok(classify(response.headers()))
    }
}

fn classify(headers: &HeaderMap) -> Verdict {
    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|name| header_text(headers, *name).is_none())
        .collect();

    if missing.is_empty() {
        Verdict::pass("All security headers present")
    } else {
        Verdict::fail(format!("Missing headers: {}", missing.join(", ")))
    }
}
