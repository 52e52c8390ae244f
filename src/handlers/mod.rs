//! Request handlers
//!
//! This module contains the handlers for the HTTP routes the wizard UI calls.

pub mod chart_to_excel;

pub use chart_to_excel::{ChartToExcelProxy, ProxyReply, error_reply};
