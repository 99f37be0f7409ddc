use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, instrument};

use super::util::{NON_SUCCESS_STATUS, build_client};
use crate::core::{ConversionRequest, RateProvider, RateResult};

const NAME: &str = "Api2";

#[derive(Serialize, Debug)]
#[serde(rename = "XML")]
struct Api2Request<'a> {
    #[serde(rename = "From")]
    from: &'a str,
    #[serde(rename = "To")]
    to: &'a str,
    #[serde(rename = "Amount")]
    amount: Decimal,
}

#[derive(Deserialize, Debug)]
struct Api2Response {
    #[serde(rename = "Result")]
    result: Option<String>,
}

/// XML provider. Any parseable `<Result>` is accepted, zero and negative included.
pub struct Api2Provider {
    base_url: String,
    client: reqwest::Client,
}

impl Api2Provider {
    pub fn new(base_url: &str, timeout: Option<std::time::Duration>) -> Result<Self> {
        Ok(Api2Provider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(timeout)?,
        })
    }

    fn parse_result(xml: &str) -> Result<Decimal> {
        let data: Api2Response = quick_xml::de::from_str(xml)?;
        data.result
            .as_deref()
            .and_then(|value| Decimal::from_str(value.trim()).ok())
            .ok_or_else(|| anyhow!("Invalid XML or missing result"))
    }

    async fn fetch_rate(&self, request: &ConversionRequest) -> Result<Decimal> {
        let url = format!("{}/api2/rate", self.base_url);
        let body = quick_xml::se::to_string(&Api2Request {
            from: &request.source_currency,
            to: &request.target_currency,
            amount: request.amount,
        })
        .context("Failed to encode XML request")?;
        debug!("Requesting rate from {}", url);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(body)
            .send()
            .await?;
        if !response.status().is_success() {
            debug!(status = %response.status(), "Api2 returned error status");
            return Err(anyhow!(NON_SUCCESS_STATUS));
        }

        let text = response.text().await?;
        Self::parse_result(&text)
    }
}

#[async_trait]
impl RateProvider for Api2Provider {
    fn name(&self) -> &str {
        NAME
    }

    #[instrument(name = "Api2Query", skip_all)]
    async fn query(&self, request: &ConversionRequest) -> RateResult {
        match self.fetch_rate(request).await {
            Ok(rate) => RateResult::success(NAME, rate),
            Err(e) => RateResult::failure(NAME, e.to_string()),
        }
    }
}
