//! HTTP binding of [`PredictionApi`] against `POST {base}/predict`.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use shared::{domain::SurveyState, error::SubmissionError, protocol::ReportResponse};
use tracing::{debug, info, warn};
use url::Url;

use crate::{config::SettingsError, PredictionApi};

pub const PREDICT_PATH: &str = "/predict";
const PROBABILITY_SUM_TOLERANCE: f64 = 0.01;

/// Joins the base origin and the prediction path.
pub fn predict_url(api_base_url: &str) -> Result<Url, SettingsError> {
    let invalid = |reason: &str| SettingsError::InvalidBaseUrl {
        value: api_base_url.to_string(),
        reason: reason.to_string(),
    };

    let base = api_base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(invalid("value is empty"));
    }

    let url = Url::parse(&format!("{base}{PREDICT_PATH}")).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not carry a query or fragment"));
    }
    Ok(url)
}

/// Decodes and validates a 2xx body.
pub fn decode_report(body: &[u8]) -> Result<ReportResponse, SubmissionError> {
    let report: ReportResponse =
        serde_json::from_slice(body).map_err(|err| SubmissionError::decode(err.to_string()))?;
    report
        .validate()
        .map_err(|err| SubmissionError::decode(err.to_string()))?;

    let sum = report.model_probabilities.sum();
    if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        warn!(sum, "model probabilities do not sum to 1.0; passing through unchanged");
    }
    Ok(report)
}

pub struct HttpPredictionApi {
    http: Client,
    predict_url: Url,
}

impl HttpPredictionApi {
    pub fn new(api_base_url: &str) -> Result<Self, SettingsError> {
        Ok(Self {
            http: Client::new(),
            predict_url: predict_url(api_base_url)?,
        })
    }

    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }
}

#[async_trait]
impl PredictionApi for HttpPredictionApi {
    async fn predict(&self, snapshot: &SurveyState) -> Result<ReportResponse, SubmissionError> {
        let started = Instant::now();
        debug!(url = %self.predict_url, "posting survey snapshot");

        let response = self
            .http
            .post(self.predict_url.clone())
            .json(snapshot)
            .send()
            .await
            .map_err(|err| SubmissionError::unknown(err.to_string()))?;

        let status = response.status();
        info!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "prediction response received"
        );

        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|err| SubmissionError::unknown(err.to_string()))?;
            warn!(status = status.as_u16(), "prediction request rejected");
            return Err(SubmissionError::request(status.as_u16(), body));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| SubmissionError::unknown(err.to_string()))?;
        decode_report(&body).inspect_err(|err| warn!("prediction response rejected: {err}"))
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
