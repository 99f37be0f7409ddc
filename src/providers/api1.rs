use anyhow::{Result, anyhow};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::util::{NON_SUCCESS_STATUS, build_client};
use crate::core::{ConversionRequest, RateProvider, RateResult};

const NAME: &str = "Api1";

#[derive(Serialize, Debug)]
struct Api1Request<'a> {
    from: &'a str,
    to: &'a str,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    value: Decimal,
}

#[derive(Deserialize, Debug)]
struct Api1Response {
    rate: Option<Decimal>,
}

/// Flat JSON provider. Treats a non-positive rate as invalid.
pub struct Api1Provider {
    base_url: String,
    client: reqwest::Client,
}

impl Api1Provider {
    pub fn new(base_url: &str, timeout: Option<std::time::Duration>) -> Result<Self> {
        Ok(Api1Provider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(timeout)?,
        })
    }

    async fn fetch_rate(&self, request: &ConversionRequest) -> Result<Decimal> {
        let url = format!("{}/api1/rate", self.base_url);
        let body = Api1Request {
            from: &request.source_currency,
            to: &request.target_currency,
            value: request.amount,
        };
        debug!("Requesting rate from {}", url);

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            debug!(status = %response.status(), "Api1 returned error status");
            return Err(anyhow!(NON_SUCCESS_STATUS));
        }

        // A literal `null` body counts as a missing rate
        let data: Option<Api1Response> = response.json().await?;
        match data.and_then(|d| d.rate) {
            Some(rate) if rate > Decimal::ZERO => Ok(rate),
            _ => Err(anyhow!("Invalid or missing rate")),
        }
    }
}

#[async_trait]
impl RateProvider for Api1Provider {
    fn name(&self) -> &str {
        NAME
    }

    #[instrument(name = "Api1Query", skip_all)]
    async fn query(&self, request: &ConversionRequest) -> RateResult {
        match self.fetch_rate(request).await {
            Ok(rate) => RateResult::success(NAME, rate),
            Err(e) => RateResult::failure(NAME, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api1/rate"))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn request() -> ConversionRequest {
        ConversionRequest::new("USD", "EUR", dec!(100))
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api1/rate"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "from": "USD",
                "to": "EUR",
                "value": 100
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"rate": 0.85}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = Api1Provider::new(&mock_server.uri(), None).unwrap();
        let result = provider.query(&request()).await;

        assert_eq!(result, RateResult::success("Api1", dec!(0.85)));
    }

    #[tokio::test]
    async fn test_amount_is_sent_exactly() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api1/rate"))
            .and(body_string_contains(r#""value":12345678901234567.89"#))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"rate": 0.1000000000000000000000000001}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = Api1Provider::new(&mock_server.uri(), None).unwrap();
        let request = ConversionRequest::new("USD", "EUR", dec!(12345678901234567.89));
        let result = provider.query(&request).await;

        assert!(result.is_success(), "{:?}", result.error_message());
        assert_eq!(result.rate(), dec!(0.1000000000000000000000000001));
    }

    #[tokio::test]
    async fn test_error_status() {
        let mock_server = create_mock_server(500, "").await;
        let provider = Api1Provider::new(&mock_server.uri(), None).unwrap();

        let result = provider.query(&request()).await;

        assert!(!result.is_success());
        assert_eq!(result.provider_name(), "Api1");
        assert_eq!(result.error_message(), Some("Non-success status code"));
    }

    #[tokio::test]
    async fn test_non_positive_rate_is_invalid() {
        for body in [
            r#"{"rate": 0}"#,
            r#"{"rate": -0.5}"#,
            r#"{}"#,
            r#"{"rate": null}"#,
            "null",
        ] {
            let mock_server = create_mock_server(200, body).await;
            let provider = Api1Provider::new(&mock_server.uri(), None).unwrap();

            let result = provider.query(&request()).await;

            assert!(!result.is_success(), "body {body} should be rejected");
            assert_eq!(result.error_message(), Some("Invalid or missing rate"));
            assert_eq!(result.rate(), Decimal::ZERO);
        }
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server(200, "<html>not json</html>").await;
        let provider = Api1Provider::new(&mock_server.uri(), None).unwrap();

        let result = provider.query(&request()).await;

        assert!(!result.is_success());
        assert!(result.error_message().is_some());
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let provider = Api1Provider::new("http://127.0.0.1:1", None).unwrap();

        let result = provider.query(&request()).await;

        assert!(!result.is_success());
        assert_eq!(result.provider_name(), "Api1");
    }
}
