//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable, e.g. `RUST_LOG=hatchfield=debug`
/// to see per-candidate placement decisions.
///
/// # Example
/// ```
/// hatchfield::core::logging::init();
/// log::info!("Placement started");
/// ```
pub fn init() {
    // Safe to call more than once
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .format_timestamp_millis()
    .try_init();
}
