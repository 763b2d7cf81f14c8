use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "glint_engine=debug,wgpu=warn"). When unset, `RUST_LOG` is consulted, then
/// `info` applies.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Later calls are ignored. Call early in `main`, before the GPU is touched,
/// so adapter selection shows up in the log.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match filter_source(config.env_filter, std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
                // wgpu-core is chatty at info during device creation.
                builder.filter_module("wgpu_core", log::LevelFilter::Warn);
                builder.filter_module("wgpu_hal", log::LevelFilter::Warn);
                builder.filter_module("naga", log::LevelFilter::Warn);
            }
        }

        builder.write_style(config.write_style);

        // A logger installed by the host (e.g. a test harness) wins.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}

/// Explicit filter first, then the environment.
fn filter_source(explicit: Option<String>, env: Option<String>) -> Option<String> {
    explicit.or(env).filter(|f| !f.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_environment() {
        let got = filter_source(Some("glint_engine=debug".into()), Some("warn".into()));
        assert_eq!(got.as_deref(), Some("glint_engine=debug"));
    }

    #[test]
    fn environment_is_used_when_nothing_explicit() {
        assert_eq!(filter_source(None, Some("warn".into())).as_deref(), Some("warn"));
    }

    #[test]
    fn blank_filter_falls_back_to_default() {
        assert_eq!(filter_source(None, Some("  ".into())), None);
        assert_eq!(filter_source(None, None), None);
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig {
            env_filter: Some("trace".into()),
            ..LoggingConfig::default()
        });
    }
}
