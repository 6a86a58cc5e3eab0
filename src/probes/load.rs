//! Concurrent load probe.
//!
//! Fans out a fixed number of identical `/health` requests through a worker
//! pool bounded by a semaphore, joins every task, then tallies the share of
//! 200 responses. Completion order is irrelevant to the verdict.

use std::sync::Arc;

use reqwest::StatusCode;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use super::{Probe, ProbeContext, ProbeError, Verdict};

pub struct ConcurrentLoadProbe;

#[async_trait::async_trait]
impl Probe for ConcurrentLoadProbe {
    fn name(&self) -> &'static str {
        "Concurrent Load"
    }

    async fn check(&self, ctx: &ProbeContext<'_>) -> Result<Verdict, ProbeError> {
        let thresholds = &ctx.config.thresholds;
        let requests = thresholds.load_requests;
        let pool = Arc::new(Semaphore::new(thresholds.load_workers.max(1)));
        let url = ctx.config.targets.backend_url("/health");
        let timeout = ctx.config.timeouts.backend();

        let mut joins = JoinSet::new();
        for worker in 0..requests {
            let client = ctx.client.clone();
            let pool = Arc::clone(&pool);
            let url = url.clone();
            joins.spawn(async move {
                let Ok(_permit) = pool.acquire().await else {
                    return None;
                };
                match client.get(&url).timeout(timeout).send().await {
                    Ok(response) => Some(response.status().as_u16()),
                    Err(e) => {
                        debug!(worker, error = %e, "load request failed");
                        None
                    }
                }
            });
        }

        let mut outcomes = Vec::with_capacity(requests);
        while let Some(joined) = joins.join_next().await {
            outcomes.push(joined?);
        }

        let rate = success_rate(&outcomes);
        if rate >= thresholds.min_load_success_percent {
            Ok(Verdict::pass(format!(
                "{:.1}% success rate with {} concurrent users",
                rate, requests
            )))
        } else {
            Ok(Verdict::fail(format!("Only {:.1}% success rate", rate)))
        }
    }
}

/// Percentage of outcomes that were HTTP 200. `None` is a transport failure.
pub fn success_rate(outcomes: &[Option<u16>]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    let ok = outcomes
        .iter()
        .filter(|o| **o == Some(StatusCode::OK.as_u16()))
        .count();
    ok as f64 * 100.0 / outcomes.len() as f64
}
