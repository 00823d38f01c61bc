//! Utilities: logging setup (dynamic level from -v / -q, RUST_LOG override).
//!
//! Key items:
//!   init_logging / derive_level

/// Logging helpers.
pub mod logging {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::EnvFilter;

    /// Map `-v` count and `--quiet` to a level.
    ///
    /// quiet => ERROR, none => INFO, -v => DEBUG, -vv and up => TRACE
    pub fn derive_level(verbose: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::ERROR;
        }
        match verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Build the filter: `RUST_LOG` wins when set, otherwise `level`.
    pub fn build_filter(level: LevelFilter, rust_log: Option<&str>) -> EnvFilter {
        match rust_log.filter(|s| !s.trim().is_empty()) {
            Some(directives) => EnvFilter::try_new(directives)
                .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into())),
            None => EnvFilter::default().add_directive(level.into()),
        }
    }

    /// Install the global subscriber. Logs go to stderr so stdout stays clean
    /// for table and JSON output.
    pub fn init_logging(level: LevelFilter) {
        let rust_log = std::env::var("RUST_LOG").ok();
        let filter = build_filter(level, rust_log.as_deref());
        // A second init (tests) is harmless; keep the first subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init();
    }
}

pub use logging::{derive_level, init_logging};

#[cfg(test)]
mod tests {
    use super::logging::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn level_mapping() {
        assert_eq!(derive_level(0, false), LevelFilter::INFO);
        assert_eq!(derive_level(1, false), LevelFilter::DEBUG);
        assert_eq!(derive_level(5, false), LevelFilter::TRACE);
        assert_eq!(derive_level(3, true), LevelFilter::ERROR);
    }

    #[test]
    fn rust_log_overrides_level() {
        let f = build_filter(LevelFilter::INFO, Some("warn"));
        assert_eq!(f.max_level_hint(), Some(LevelFilter::WARN));

        let f = build_filter(LevelFilter::DEBUG, Some("   "));
        assert_eq!(f.max_level_hint(), Some(LevelFilter::DEBUG));

        let f = build_filter(LevelFilter::ERROR, None);
        assert_eq!(f.max_level_hint(), Some(LevelFilter::ERROR));
    }
}
