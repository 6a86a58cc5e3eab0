use reqwest::header::{
    HeaderMap, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD,
    ORIGIN,
};
use reqwest::Method;

use super::{header_text, Probe, ProbeContext, ProbeError, Verdict};

const PREFLIGHT_PATH: &str = "/api/v1/designs";
const PREFLIGHT_METHOD: &str = "POST";
const PREFLIGHT_HEADERS: &str = "Content-Type, Authorization";

/// CORS preflight against the designs API.
pub struct CorsProbe;

#[async_trait::async_trait]
impl Probe for CorsProbe {
    fn name(&self) -> &'static str {
        "CORS Configuration"
    }

    async fn check(&self, ctx: &ProbeContext<'_>) -> Result<Verdict, ProbeError> {
        let response = ctx
            .backend(Method::OPTIONS, PREFLIGHT_PATH)
            .header(ORIGIN, ctx.config.targets.cors_origin.as_str())
            .header(ACCESS_CONTROL_REQUEST_METHOD, PREFLIGHT_METHOD)
            .header(ACCESS_CONTROL_REQUEST_HEADERS, PREFLIGHT_HEADERS)
            .send()
            .await?;
        Ok(classify(response.headers()))
    }
}

fn classify(headers: &HeaderMap) -> Verdict {
    let Some(origin) = header_text(headers, &ACCESS_CONTROL_ALLOW_ORIGIN) else {
        return Verdict::fail("Missing CORS headers");
    };
    let methods = header_text(headers, &ACCESS_CONTROL_ALLOW_METHODS).unwrap_or("-");
    let allowed = header_text(headers, &ACCESS_CONTROL_ALLOW_HEADERS).unwrap_or("-");
    Verdict::pass(format!(
        "CORS headers present: allow-origin={}, allow-methods={}, allow-headers={}",
        origin, methods, allowed
    ))
}
