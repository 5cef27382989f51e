//! Logging setup for the treeprobe binary and embedding services.
//!
//! Compact timestamped output with per-module levels. `RUST_LOG` overrides
//! the configured levels at runtime.
//!
//! # Configuration
//!
//! ```toml
//! [logging]
//! default = "warn"
//!
//! [logging.modules]
//! "treeprobe::existence" = "debug"   # batch/lookup counts per warm-up
//! "treeprobe::gitserver" = "trace"   # every ls-tree request
//! ```
//!
//! # Environment Variable
//!
//! ```bash
//! RUST_LOG=treeprobe=debug treeprobe check --repository-id 1 --commit HEAD paths.txt
//! ```

use std::sync::Once;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// Compact time format: HH:MM:SS.mmm
struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Filter directives from config: `default,module=level,...`.
pub fn filter_directives(config: &LoggingConfig) -> String {
    let mut modules: Vec<_> = config.modules.iter().collect();
    modules.sort();

    let mut directives = config.default.clone();
    for (module, level) in modules {
        directives.push_str(&format!(",{module}={level}"));
    }
    directives
}

/// Initialize logging with configuration.
///
/// Only the first call takes effect. Output goes to stderr so stdout stays
/// clean for command results.
pub fn init_with_config(config: &LoggingConfig) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(filter_directives(config))
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_timer(CompactTime)
            .with_level(true)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).init();
    });
}

/// Log an event with a component prefix.
///
/// # Examples
/// ```ignore
/// log_event!("check", "warmed", "{} rounds", stats.rounds);
/// ```
#[macro_export]
macro_rules! log_event {
    ($component:expr, $event:expr) => {
        tracing::info!("[{}] {}", $component, $event)
    };
    ($component:expr, $event:expr, $($arg:tt)*) => {
        tracing::info!("[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}

/// Debug-only event logging with a component prefix.
///
/// # Examples
/// ```ignore
/// debug_event!("checker", "round", "{} directories", batch.len());
/// ```
#[macro_export]
macro_rules! debug_event {
    ($component:expr, $event:expr) => {
        tracing::debug!("[{}] {}", $component, $event)
    };
    ($component:expr, $event:expr, $($arg:tt)*) => {
        tracing::debug!("[{}] {}: {}", $component, $event, format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_filter_directives_default_only() {
        let config = LoggingConfig::default();
        assert_eq!(filter_directives(&config), "warn");
    }

    #[test]
    fn test_filter_directives_with_modules() {
        let config = LoggingConfig {
            default: "info".to_string(),
            modules: HashMap::from([
                ("treeprobe::gitserver".to_string(), "trace".to_string()),
                ("treeprobe::existence".to_string(), "debug".to_string()),
            ]),
        };
        assert_eq!(
            filter_directives(&config),
            "info,treeprobe::existence=debug,treeprobe::gitserver=trace"
        );
    }
}
