//! Chart-to-Excel conversion service client
//!
//! Forwards chart conversion requests to the remote conversion service and
//! hands its answer back unchanged. There is no retry: an upstream failure is
//! surfaced to the caller with the upstream status and body.

use std::time::Duration;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;
use crate::config::ChartToExcelConfig;
use crate::utils::errors::{WizardError, ChartToExcelError, ChartToExcelResult, Result};

/// Conversion request as accepted by the proxy
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartToExcelRequest {
    pub image_url: String,
    pub chart_type: String,
    #[serde(default)]
    pub options: ConversionOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Conversion switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversionOptions {
    pub include_data_table: bool,
    pub apply_color_scheme: bool,
    pub add_trendlines: bool,
}

/// Successful conversion result
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartToExcelResponse {
    pub success: bool,
    pub excel_file_url: String,
    #[serde(default)]
    pub extracted_data: Value,
    /// Seconds spent by the conversion service
    pub processing_time: f64,
    pub request_id: String,
}

impl ChartToExcelRequest {
    /// Reject requests missing a required field
    ///
    /// The shape of `imageUrl` is left for the conversion service to judge.
    pub fn validate(&self) -> ChartToExcelResult<()> {
        if self.image_url.trim().is_empty() {
            return Err(ChartToExcelError::InvalidRequest("imageUrl is required".to_string()));
        }
        if self.chart_type.trim().is_empty() {
            return Err(ChartToExcelError::InvalidRequest("chartType is required".to_string()));
        }

        Ok(())
    }
}

/// Client for the remote conversion service
#[derive(Debug, Clone)]
pub struct ChartToExcelService {
    client: Client,
    config: ChartToExcelConfig,
}

impl ChartToExcelService {
    /// Create a new ChartToExcelService instance
    pub fn new(config: ChartToExcelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(WizardError::Http)?;

        Ok(Self { client, config })
    }

    /// Conversion endpoint URL
    pub fn endpoint(&self) -> String {
        format!("{}/convert", self.config.api_url.trim_end_matches('/'))
    }

    /// Convert a chart image into an Excel workbook
    pub async fn convert(&self, request: &ChartToExcelRequest) -> ChartToExcelResult<ChartToExcelResponse> {
        request.validate()?;

        let url = self.endpoint();
        debug!(url = %url, chart_type = %request.chart_type, "Making chart-to-Excel request");

        let mut builder = self.client.post(&url).json(request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ChartToExcelError::Timeout
            } else if e.is_connect() {
                ChartToExcelError::ServiceUnavailable
            } else {
                ChartToExcelError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<Value>(&error_text)
                .unwrap_or_else(|_| json!({ "error": error_text }));
            debug!(status = status.as_u16(), "Conversion service returned an error");
            return Err(ChartToExcelError::Upstream { status, body });
        }

        response
            .json::<ChartToExcelResponse>()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChartToExcelError::Timeout
                } else {
                    ChartToExcelError::InvalidResponse(e.to_string())
                }
            })
    }

    pub fn config(&self) -> &ChartToExcelConfig {
        &self.config
    }
}
