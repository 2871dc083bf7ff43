//! Log output setup.

use tracing_subscriber::EnvFilter;

/// Installs a formatted `tracing` subscriber filtered by `RUST_LOG`,
/// defaulting to `info`.
///
/// Returns `false` if a global subscriber was already installed. Calling
/// it more than once is harmless.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!("log subscriber installed");
    }
    installed
}
