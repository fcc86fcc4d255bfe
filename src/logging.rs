//! Logging initialization utilities.

use env_logger::Env;

/// Initialize logging with a default filter level.
///
/// `RUST_LOG` still wins over `default_level` when it is set.
pub fn init(default_level: &str) {
    let env = Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env)
        .format_target(false)
        .try_init();
}
