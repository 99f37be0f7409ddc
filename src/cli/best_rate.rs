use anyhow::{Context, Result};

use super::ui::{StyleType, style_text};
use crate::aggregator::RateAggregator;
use crate::core::{ConversionRequest, RateResult};

/// Parses a request given as JSON. `null` is accepted and yields `None`.
pub fn parse_request(json: &str) -> Result<Option<ConversionRequest>> {
    serde_json::from_str(json).context("Failed to parse conversion request JSON")
}

pub async fn run(
    aggregator: &RateAggregator,
    request: Option<&ConversionRequest>,
    raw: bool,
) -> Result<()> {
    let result = aggregator.best_rate(request).await;

    if raw {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_result(&result));
    }
    Ok(())
}

pub fn format_result(result: &RateResult) -> String {
    if result.is_success() {
        format!(
            "Best rate: {} from {}",
            style_text(&result.rate().to_string(), StyleType::Best),
            style_text(result.provider_name(), StyleType::Title)
        )
    } else {
        format!(
            "No rate available ({}): {}",
            result.provider_name(),
            style_text(result.error_message().unwrap_or_default(), StyleType::Error)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_request() {
        let request = parse_request(
            r#"{"sourceCurrency": "USD", "targetCurrency": "INR", "amount": "1000.50"}"#,
        )
        .unwrap()
        .expect("request present");
        assert_eq!(request, ConversionRequest::new("USD", "INR", dec!(1000.50)));

        assert!(parse_request("null").unwrap().is_none());
        assert!(parse_request(r#"{"sourceCurrency": "USD"}"#).is_err());
    }

    #[test]
    fn test_format_result() {
        let text = console::strip_ansi_codes(&format_result(&RateResult::success(
            "Api2",
            dec!(0.91),
        )))
        .to_string();
        assert_eq!(text, "Best rate: 0.91 from Api2");

        let text = console::strip_ansi_codes(&format_result(&RateResult::failure(
            "AllProviders",
            "All providers failed to return a valid rate.",
        )))
        .to_string();
        assert_eq!(
            text,
            "No rate available (AllProviders): All providers failed to return a valid rate."
        );
    }
}
