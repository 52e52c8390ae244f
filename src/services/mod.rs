//! Services module
//!
//! This module contains the report generator and the client for the remote
//! chart-to-Excel conversion service.

pub mod chart_to_excel;
pub mod report;

// Re-export commonly used services
pub use chart_to_excel::{ChartToExcelService, ChartToExcelRequest, ChartToExcelResponse, ConversionOptions};
pub use report::{AnalysisReport, ChartSpec, MetricValue, generate_report};
