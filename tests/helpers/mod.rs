//! Test helpers module
//!
//! Mock servers, fixtures and shared setup for the integration tests.

pub mod conversion_mock;
pub mod test_data;

pub use conversion_mock::*;
pub use test_data::*;

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test environment
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
