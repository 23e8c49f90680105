//! Tracing subscriber setup
//!
//! The subscriber is installed before the config file is read, so warnings raised while
//! loading it reach the operator. `RUST_LOG` wins when set; otherwise the filter starts at
//! [`DEFAULT_LEVEL`] and switches to `logging.level` once the config is loaded.

use tracing::{debug, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter, Registry};

/// Filter used until the config file has been read
pub const DEFAULT_LEVEL: &str = "info";

/// Reloadable filter layer over the registry
pub type FilterLayer = reload::Layer<EnvFilter, Registry>;

/// Handle to the installed filter
pub struct LogFilter {
    handle: reload::Handle<EnvFilter, Registry>,
    /// Filter came from `RUST_LOG` and is never replaced
    from_env: bool,
}

impl LogFilter {
    /// Filter layer from `RUST_LOG`, or [`DEFAULT_LEVEL`] when unset or invalid
    pub fn from_default_env() -> (FilterLayer, LogFilter) {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Self::with_filter(filter, true),
            Err(_) => Self::with_filter(EnvFilter::new(DEFAULT_LEVEL), false),
        }
    }

    pub fn with_filter(filter: EnvFilter, from_env: bool) -> (FilterLayer, LogFilter) {
        let (layer, handle) = reload::Layer::new(filter);
        (layer, LogFilter { handle, from_env })
    }

    /// Switch to the configured level unless `RUST_LOG` chose the filter
    ///
    /// An invalid level is reported and the current filter kept.
    pub fn apply_config_level(&self, level: &str) {
        if self.from_env {
            debug!(level, "RUST_LOG is set, ignoring logging.level");
            return;
        }

        match EnvFilter::try_new(level) {
            Ok(filter) => {
                if let Err(e) = self.handle.reload(filter) {
                    warn!(error = %e, "Failed to apply logging.level");
                }
            }
            Err(e) => warn!(
                level,
                error = %e,
                "Invalid logging.level, keeping '{}'",
                DEFAULT_LEVEL
            ),
        }
    }
}

/// Install the global fmt subscriber; call once, first thing in `main`
pub fn init() -> LogFilter {
    let (filter, log_filter) = LogFilter::from_default_env();

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    log_filter
}
