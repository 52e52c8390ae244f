//! Chart-to-Excel proxy handler
//!
//! Turns a raw HTTP request (method and JSON body) into a status code and a
//! JSON body, independent of the HTTP server hosting it.

use std::time::Instant;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tracing::{instrument, warn};
use crate::config::Settings;
use crate::services::chart_to_excel::{ChartToExcelRequest, ChartToExcelService};
use crate::utils::errors::{ChartToExcelError, WizardError, Result};
use crate::utils::helpers::generate_uuid;
use crate::utils::logging::{log_api_error, log_proxy_request};

/// Reply to send back to the browser
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyReply {
    pub status: StatusCode,
    pub body: Value,
}

impl ProxyReply {
    fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({ "error": "Internal server error", "message": message.into() }),
        }
    }
}

/// The `chart-to-excel` route
#[derive(Debug, Clone)]
pub struct ChartToExcelProxy {
    service: ChartToExcelService,
    enabled: bool,
}

impl ChartToExcelProxy {
    pub fn new(service: ChartToExcelService, enabled: bool) -> Self {
        Self { service, enabled }
    }

    /// Build the proxy from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let service = ChartToExcelService::new(settings.chart_to_excel.clone())?;
        Ok(Self::new(service, settings.features.chart_export))
    }

    /// Handle one request
    #[instrument(skip(self, body), fields(request_id = tracing::field::Empty))]
    pub async fn handle(&self, method: &Method, body: &[u8]) -> ProxyReply {
        if *method != Method::POST {
            return ProxyReply::error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
        }
        if !self.enabled {
            return ProxyReply::error(StatusCode::SERVICE_UNAVAILABLE, "Chart export is disabled");
        }

        let request: ChartToExcelRequest = match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Rejected malformed chart-to-Excel request");
                return ProxyReply {
                    status: StatusCode::BAD_REQUEST,
                    body: json!({ "error": "Invalid request body", "message": e.to_string() }),
                };
            }
        };

        let request_id = generate_uuid();
        tracing::Span::current().record("request_id", request_id.as_str());
        let started = Instant::now();

        let reply = match self.service.convert(&request).await {
            Ok(response) => match serde_json::to_value(&response) {
                Ok(body) => ProxyReply { status: StatusCode::OK, body },
                Err(e) => {
                    let error = WizardError::from(e);
                    log_api_error("chart-to-excel", &error, Some(request_id.as_str()));
                    ProxyReply::internal(error.to_string())
                }
            },
            Err(e) => {
                let reply = error_reply(&e);
                log_api_error("chart-to-excel", &WizardError::from(e), Some(request_id.as_str()));
                reply
            }
        };

        log_proxy_request(
            &request_id,
            &request.chart_type,
            reply.status.as_u16(),
            started.elapsed().as_millis() as u64,
        );
        reply
    }
}

/// Map a conversion failure onto the reply the browser sees
///
/// Upstream answers pass through verbatim. Anything else that went wrong is a
/// generic 500 carrying the failure in `message`.
pub fn error_reply(error: &ChartToExcelError) -> ProxyReply {
    match error {
        ChartToExcelError::Upstream { status, body } => ProxyReply {
            status: *status,
            body: body.clone(),
        },
        ChartToExcelError::InvalidRequest(message) => {
            ProxyReply::error(StatusCode::BAD_REQUEST, message.as_str())
        }
        other => ProxyReply::internal(other.to_string()),
    }
}
