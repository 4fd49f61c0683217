//! Tracing initialization for embedders and test harnesses.

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize a global fmt subscriber.
///
/// The level comes from `RUST_LOG` when set, defaulting to `INFO`.
/// Calling this twice is harmless; the second call is ignored.
pub fn init_tracing() {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(Level::INFO);

    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .try_init();
}
