use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::{Method, StatusCode};

use super::{Probe, ProbeContext, ProbeError, Verdict};

/// `/health` must answer 200 whatever `Accept-Language` the client sends.
pub struct InternationalSupportProbe;

#[async_trait::async_trait]
impl Probe for InternationalSupportProbe {
    fn name(&self) -> &'static str {
        "International Support"
    }

    async fn check(&self, ctx: &ProbeContext<'_>) -> Result<Verdict, ProbeError> {
        let languages = &ctx.config.targets.languages;
        let mut outcomes = Vec::with_capacity(languages.len());
        for lang in languages {
            let response = ctx
                .backend(Method::GET, "/health")
                .header(ACCEPT_LANGUAGE, lang.as_str())
                .send()
                .await?;
            outcomes.push((lang.as_str(), response.status() == StatusCode::OK));
        }
        Ok(classify(&outcomes))
    }
}

fn classify(outcomes: &[(&str, bool)]) -> Verdict {
    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|(_, ok)| !ok)
        .map(|(lang, _)| *lang)
        .collect();

    if failed.is_empty() {
        Verdict::pass(format!("Supports {} language headers", outcomes.len()))
    } else {
        Verdict::fail(format!("Failed for languages: {}", failed.join(", ")))
    }
}
