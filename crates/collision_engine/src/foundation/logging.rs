//! Logging utilities

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`, defaulting to `info`
///
/// Safe to call more than once; later calls are ignored so tests and demos
/// can both initialize without coordinating.
pub fn init() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}
