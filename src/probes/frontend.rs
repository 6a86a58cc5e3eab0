use reqwest::StatusCode;

use super::{Probe, ProbeContext, ProbeError, Verdict};

/// Markup markers every served page must contain.
const ACCESSIBILITY_CHECKS: [(&str, &str); 4] = [
    ("Meta viewport", "name=\"viewport\""),
    ("Title tag", "<title>"),
    ("Language attribute", "lang="),
    ("Alt attributes", "alt="),
];

/// Fetch the frontend root and look for basic accessibility markup.
pub struct FrontendAccessibilityProbe;

#[async_trait::async_trait]
impl Probe for FrontendAccessibilityProbe {
    fn name(&self) -> &'static str {
        "Frontend Accessibility"
    }

    async fn check(&self, ctx: &ProbeContext<'_>) -> Result<Verdict, ProbeError> {
        let response = ctx.frontend().send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(classify(status, &body))
    }
}

fn classify(status: StatusCode, html: &str) -> Verdict {
    if status != StatusCode::OK {
        return Verdict::fail(format!("HTTP {}", status.as_u16()));
    }

    let failed: Vec<&str> = ACCESSIBILITY_CHECKS
        .iter()
        .filter(|(_, marker)| !html.contains(marker))
        .map(|(label, _)| *label)
        .collect();

    if failed.is_empty() {
        Verdict::pass(format!("All {} checks passed", ACCESSIBILITY_CHECKS.len()))
    } else {
        Verdict::fail(format!("Failed: {}", failed.join(", ")))
    }
}
