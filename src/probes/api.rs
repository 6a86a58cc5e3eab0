use reqwest::Method;

use super::{Probe, ProbeContext, ProbeError, Verdict};

/// GET each configured API path; auth rejections still prove the route exists.
pub struct ApiEndpointsProbe;

#[async_trait::async_trait]
impl Probe for ApiEndpointsProbe {
    fn name(&self) -> &'static str {
        "API Endpoints"
    }

    async fn check(&self, ctx: &ProbeContext<'_>) -> Result<Verdict, ProbeError> {
        let mut observed = Vec::with_capacity(ctx.config.targets.api_endpoints.len());
        for endpoint in &ctx.config.targets.api_endpoints {
            let response = ctx.backend(Method::GET, &endpoint.path).send().await?;
            tracing::debug!(path = %endpoint.path, status = %response.status(), "API endpoint");
            observed.push((endpoint.label.as_str(), response.status().as_u16()));
        }
        Ok(classify(&observed, &ctx.config.thresholds.api_accepted_statuses))
    }
}

fn classify(observed: &[(&str, u16)], accepted: &[u16]) -> Verdict {
    let rejected: Vec<_> = observed
        .iter()
        .filter(|(_, code)| !accepted.contains(code))
        .collect();
    if rejected.is_empty() {
        Verdict::pass(listing(observed.iter()))
    } else {
        Verdict::fail(format!("Unexpected status - {}", listing(rejected.into_iter())))
    }
}

fn listing<'a>(entries: impl Iterator<Item = &'a (&'a str, u16)>) -> String {
    entries
        .map(|(label, code)| format!("{}: HTTP {}", label, code))
        .collect::<Vec<_>>()
        .join(", ")
}
