//! Exchange rate provider abstraction

use async_trait::async_trait;

use super::rate::{ConversionRequest, RateResult};

/// An upstream source of exchange-rate quotes.
///
/// Implementations report every failure (transport, parsing, or their own
/// validity rules) as a failed [`RateResult`] carrying [`RateProvider::name`],
/// and must be safe to call concurrently.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Stable identifying name, used in results and logs.
    fn name(&self) -> &str;

    async fn query(&self, request: &ConversionRequest) -> RateResult;
}
