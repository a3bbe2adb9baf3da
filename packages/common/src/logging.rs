//! Logging bootstrap
//!
//! Installs an `env_logger` backend for the `log` facade. The engine crates
//! emit through `tracing` with its `log` bridge enabled, so their events land
//! here as well. Verbosity is controlled with `RUST_LOG`:
//! - `RUST_LOG=debug` - everything, including per-edit decode/sign/verify traces
//! - `RUST_LOG=warn` - rejected edits and downgraded decode problems only
//! - `RUST_LOG=devbelt_jwt=debug` - module-specific levels

use log::info;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize logging once at application startup.
///
/// Subsequent calls are no-ops.
pub fn init() {
    INIT_LOGGER.call_once(|| {
        env_logger::Builder::from_default_env()
            .format_timestamp_micros()
            .init();

        info!("structured logging initialized");
    });
}

/// Initialize logging for test binaries.
///
/// Safe to call from every test; only the first call installs the logger and
/// output is captured by the test harness.
pub fn init_test() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

/// Log a cryptographic failure without leaking anything but the error type.
pub fn log_crypto_error(operation: &str, error: &dyn std::error::Error) {
    log::warn!(
        "cryptographic operation failed: {} (error_type: {})",
        operation,
        std::any::type_name_of_val(error)
    );
}
