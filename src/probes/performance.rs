use std::time::{Duration, Instant};

use reqwest::Method;

use super::{Probe, ProbeContext, ProbeError, Verdict};
use crate::config::Thresholds;

/// Mean backend latency over several `/health` samples plus one frontend load.
pub struct PerformanceProbe;

#[async_trait::async_trait]
impl Probe for PerformanceProbe {
    fn name(&self) -> &'static str {
        "Performance"
    }

    async fn check(&self, ctx: &ProbeContext<'_>) -> Result<Verdict, ProbeError> {
        let samples = ctx.config.thresholds.performance_samples;
        let mut api_times = Vec::with_capacity(samples);
        for _ in 0..samples {
            let start = Instant::now();
            ctx.backend(Method::GET, "/health").send().await?.bytes().await?;
            api_times.push(start.elapsed());
        }

        let start = Instant::now();
        ctx.frontend().send().await?.bytes().await?;
        let frontend_time = start.elapsed();

        Ok(classify(&api_times, frontend_time, &ctx.config.thresholds))
    }
}

fn mean_secs(samples: &[Duration]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(Duration::as_secs_f64).sum::<f64>() / samples.len() as f64
}

fn classify(api_times: &[Duration], frontend_time: Duration, thresholds: &Thresholds) -> Verdict {
    let api = mean_secs(api_times);
    let frontend = frontend_time.as_secs_f64();
    let timings = format!("API: {:.2}s, Frontend: {:.2}s", api, frontend);

    if api < thresholds.max_backend_latency_secs && frontend < thresholds.max_frontend_latency_secs {
        Verdict::pass(timings)
    } else {
        Verdict::fail(format!("Slow response - {}", timings))
    }
}
