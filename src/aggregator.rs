//! Queries every configured provider for the same conversion and picks the
//! best successful rate.

use futures::FutureExt;
use futures::future::join_all;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::core::rate::{
    ALL_FAILED_MESSAGE, ALL_PROVIDERS, NULL_REQUEST_MESSAGE, PROVIDER_EXCEPTION_MESSAGE,
};
use crate::core::{ConversionRequest, RateProvider, RateResult};

pub struct RateAggregator {
    providers: Vec<Arc<dyn RateProvider>>,
}

impl RateAggregator {
    /// Registration order of `providers` decides ties between equal rates.
    pub fn new(providers: Vec<Arc<dyn RateProvider>>) -> Self {
        Self { providers }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Returns the best rate, or an `AllProviders` failure. Never errors.
    pub async fn best_rate(&self, request: Option<&ConversionRequest>) -> RateResult {
        let Some(request) = request else {
            warn!("Null request received");
            return RateResult::failure(ALL_PROVIDERS, NULL_REQUEST_MESSAGE);
        };

        info!(
            from = %request.source_currency,
            to = %request.target_currency,
            amount = %request.amount,
            "Starting exchange rate comparison"
        );

        let started = Instant::now();
        let results = self.quote_all(request).await;
        let elapsed_ms = started.elapsed().as_millis();

        let best = select_best(&results);
        if best.is_success() {
            info!(
                rate = %best.rate(),
                provider = best.provider_name(),
                elapsed_ms,
                "Best rate found"
            );
        } else {
            warn!(elapsed_ms, "All providers failed to return valid rates");
        }
        best
    }

    /// Queries all providers concurrently and waits for every one of them.
    ///
    /// Results are in registration order. A provider that panics is reported
    /// as a failure and does not affect the others.
    pub async fn quote_all(&self, request: &ConversionRequest) -> Vec<RateResult> {
        let queries = self.providers.iter().map(|provider| async move {
            let name = provider.name();
            debug!(provider = name, "Querying provider");

            match AssertUnwindSafe(provider.query(request)).catch_unwind().await {
                Ok(result) if result.is_success() => {
                    debug!(provider = name, rate = %result.rate(), "Provider returned rate");
                    result
                }
                Ok(result) => {
                    warn!(
                        provider = name,
                        error = result.error_message().unwrap_or_default(),
                        "Provider failed"
                    );
                    result
                }
                Err(payload) => {
                    error!(
                        provider = name,
                        panic = panic_message(payload.as_ref()),
                        "Provider panicked"
                    );
                    RateResult::failure(name, PROVIDER_EXCEPTION_MESSAGE)
                }
            }
        });

        join_all(queries).await
    }
}

/// Highest successful rate; the earliest result wins a tie.
pub fn select_best(results: &[RateResult]) -> RateResult {
    results
        .iter()
        .filter(|r| r.is_success())
        .reduce(|best, r| if r.rate() > best.rate() { r } else { best })
        .cloned()
        .unwrap_or_else(|| RateResult::failure(ALL_PROVIDERS, ALL_FAILED_MESSAGE))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
