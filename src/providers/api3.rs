use anyhow::{Result, anyhow};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::util::{NON_SUCCESS_STATUS, build_client};
use crate::core::{ConversionRequest, RateProvider, RateResult};

const NAME: &str = "ThirdApiProvider";

/// Lowest `statusCode` the provider uses for a usable payload.
const MIN_STATUS_CODE: i64 = 100;

#[derive(Serialize, Debug)]
struct Api3Request<'a> {
    exchange: Api3Exchange<'a>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Api3Exchange<'a> {
    source_currency: &'a str,
    target_currency: &'a str,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    quantity: Decimal,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Api3Response {
    status_code: Option<i64>,
    message: Option<String>,
    data: Option<Api3Data>,
}

#[derive(Deserialize, Debug)]
struct Api3Data {
    total: Option<Decimal>,
}

impl Api3Response {
    /// The total, when the payload passes the provider's validity rule.
    fn valid_total(&self) -> Option<Decimal> {
        let total = self.data.as_ref()?.total?;
        let status_code = self.status_code?;
        (total > Decimal::ZERO && status_code >= MIN_STATUS_CODE).then_some(total)
    }
}

/// Nested JSON provider. Needs a positive total and a sane status code.
pub struct Api3Provider {
    base_url: String,
    client: reqwest::Client,
}

impl Api3Provider {
    pub fn new(base_url: &str, timeout: Option<std::time::Duration>) -> Result<Self> {
        Ok(Api3Provider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(timeout)?,
        })
    }

    async fn fetch_rate(&self, request: &ConversionRequest) -> Result<Decimal> {
        let url = format!("{}/ThirdApiProvider/rate", self.base_url);
        let body = Api3Request {
            exchange: Api3Exchange {
                source_currency: &request.source_currency,
                target_currency: &request.target_currency,
                quantity: request.amount,
            },
        };
        debug!("Requesting rate from {}", url);

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            debug!(status = %response.status(), "ThirdApiProvider returned error status");
            return Err(anyhow!(NON_SUCCESS_STATUS));
        }

        let data: Option<Api3Response> = response.json().await?;
        if let Some(data) = &data {
            debug!(
                status_code = ?data.status_code,
                message = data.message.as_deref().unwrap_or_default(),
                "Received ThirdApiProvider payload"
            );
        }

        data.as_ref()
            .and_then(Api3Response::valid_total)
            .ok_or_else(|| anyhow!("Invalid data or missing total"))
    }
}

#[async_trait]
impl RateProvider for Api3Provider {
    fn name(&self) -> &str {
        NAME
    }

    #[instrument(name = "Api3Query", skip_all)]
    async fn query(&self, request: &ConversionRequest) -> RateResult {
        match self.fetch_rate(request).await {
            Ok(rate) => RateResult::success(NAME, rate),
            Err(e) => RateResult::failure(NAME, e.to_string()),
        }
    }
}
