//! Mock chart-to-Excel conversion service for testing
//!
//! This module provides a mock HTTP server that simulates the remote
//! conversion service. It uses wiremock to create configurable mock responses.

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Mock conversion service
pub struct ConversionMockServer {
    pub server: MockServer,
}

/// Configuration for mock responses
#[derive(Debug, Clone)]
pub struct MockResponseConfig {
    pub status: u16,
    pub delay_ms: Option<u64>,
    pub custom_response: Option<Value>,
    pub expected_api_key: Option<String>,
}

impl Default for MockResponseConfig {
    fn default() -> Self {
        Self {
            status: 200,
            delay_ms: None,
            custom_response: None,
            expected_api_key: None,
        }
    }
}

impl ConversionMockServer {
    /// Start a new mock conversion service
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Base URL to put in `ChartToExcelConfig::api_url`
    pub fn api_url(&self) -> String {
        format!("{}/v1", self.server.uri())
    }

    /// Setup mock for the convert endpoint
    pub async fn mock_convert(&self, config: MockResponseConfig) {
        let response_body = config.custom_response.unwrap_or_else(|| {
            if config.status < 400 {
                successful_conversion()
            } else {
                json!({
                    "error": "Unsupported chart type",
                    "code": "UNSUPPORTED_CHART"
                })
            }
        });

        let mut response = ResponseTemplate::new(config.status).set_body_json(response_body);

        if let Some(delay) = config.delay_ms {
            response = response.set_delay(std::time::Duration::from_millis(delay));
        }

        let mut mock = Mock::given(method("POST")).and(path("/v1/convert"));
        if let Some(key) = config.expected_api_key {
            mock = mock.and(header("authorization", format!("Bearer {}", key).as_str()));
        }

        mock.respond_with(response)
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Setup mock answering with a plain-text error page
    pub async fn mock_convert_plain_error(&self, status: u16, text: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/convert"))
            .respond_with(ResponseTemplate::new(status).set_body_string(text))
            .mount(&self.server)
            .await;
    }
}

/// Body the conversion service returns on success
pub fn successful_conversion() -> Value {
    json!({
        "success": true,
        "excelFileUrl": "https://files.example.com/exports/chart-123.xlsx",
        "extractedData": {
            "series": [{ "name": "Revenue", "values": [120.5, 133.0, 150.25] }]
        },
        "processingTime": 2.4,
        "requestId": "conv-123"
    })
}

/// A valid proxy request body
pub fn conversion_request_body() -> Value {
    json!({
        "imageUrl": "https://cdn.example.com/charts/revenue.png",
        "chartType": "bar",
        "options": {
            "includeDataTable": true,
            "applyColorScheme": false,
            "addTrendlines": true
        },
        "metadata": { "reportId": "acme-2024" }
    })
}
