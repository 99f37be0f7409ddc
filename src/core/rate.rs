//! Conversion request and normalized rate result types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Provider name used for results synthesized by the aggregator.
pub const ALL_PROVIDERS: &str = "AllProviders";
pub const ALL_FAILED_MESSAGE: &str = "All providers failed to return a valid rate.";
pub const NULL_REQUEST_MESSAGE: &str = "Request cannot be null.";
pub const PROVIDER_EXCEPTION_MESSAGE: &str = "Provider exception";

/// A single conversion query. Currencies and amount are passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub source_currency: String,
    pub target_currency: String,
    pub amount: Decimal,
}

impl ConversionRequest {
    pub fn new(source_currency: &str, target_currency: &str, amount: Decimal) -> Self {
        Self {
            source_currency: source_currency.to_string(),
            target_currency: target_currency.to_string(),
            amount,
        }
    }
}

/// Outcome of querying one provider, or the aggregated decision.
///
/// A failed result always carries a zero rate and an error message; a
/// successful one never carries a message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateResult {
    provider_name: String,
    rate: Decimal,
    is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl RateResult {
    pub fn success(provider_name: impl Into<String>, rate: Decimal) -> Self {
        Self {
            provider_name: provider_name.into(),
            rate,
            is_success: true,
            error_message: None,
        }
    }

    pub fn failure(provider_name: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            rate: Decimal::ZERO,
            is_success: false,
            error_message: Some(error_message.into()),
        }
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn is_success(&self) -> bool {
        self.is_success
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}
