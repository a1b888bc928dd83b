//! Logging bootstrap
//!
//! Logs go to stderr through `env_logger`. The level defaults to `info`
//! and follows `RUST_LOG` when set (e.g. `RUST_LOG=gh_client=debug`).

use env_logger::{Builder, Env};

/// Initialize the global logger; call once, before anything logs
pub fn init() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
