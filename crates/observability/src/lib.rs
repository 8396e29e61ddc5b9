//! Process-wide logging setup.

pub mod subscriber;

pub use subscriber::LogFormat;

/// Initialize tracing with the format chosen by `STOREFRONT_LOG_FORMAT`
/// (`json` by default, `text` for human-readable output).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    subscriber::init(LogFormat::from_env());
}
