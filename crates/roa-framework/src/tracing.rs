//! # Observability & Tracing
//!
//! Structured logging setup for applications built on the framework.
//!
//! The framework itself only emits `tracing` events (resolution steps at
//! `debug`, created records at `info`, suspicious save failures at `warn`);
//! installing a subscriber is the application's call.

/// Initializes the tracing/logging infrastructure for the application.
///
/// Sets up structured logging with environment-based filtering:
///
/// - `RUST_LOG=info` - created records, warnings, errors
/// - `RUST_LOG=debug` - plus binding rounds and link resolution steps
/// - `RUST_LOG=roa_framework=debug` - debug only for this crate
///
/// # Example
///
/// ```ignore
/// setup_tracing();
/// tracing::info!("Application started");
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
