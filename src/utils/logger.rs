use crate::config::toml_config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const DEFAULT_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable lines, for interactive use.
    #[default]
    Compact,
    /// JSON lines, for running behind a log collector.
    Json,
}

impl LogFormat {
    /// `"json"` selects JSON output; anything else, or nothing, is compact.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some(l) if l.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Lower-cased level if it is one `tracing` knows, `None` otherwise.
pub fn parse_level(level: &str) -> Option<&'static str> {
    let level = level.trim();
    LEVELS
        .into_iter()
        .find(|known| known.eq_ignore_ascii_case(level))
}

/// Resolved logger setup: `[logging]` from the config file plus the `--verbose` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: &'static str,
    pub format: LogFormat,
    pub verbose: bool,
}

impl LogSettings {
    pub fn from_config(logging: Option<&LoggingConfig>, verbose: bool) -> Self {
        let level = logging
            .and_then(|l| l.level.as_deref())
            .and_then(parse_level)
            .unwrap_or(DEFAULT_LEVEL);
        let format = LogFormat::from_label(logging.and_then(|l| l.format.as_deref()));

        Self {
            level,
            format,
            verbose,
        }
    }

    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    ///
    /// Verbose mode raises this crate to debug (unless the config asks for
    /// trace) and lets dependencies log at info.
    pub fn filter_directive(&self) -> String {
        if self.verbose {
            let level = if self.level == "trace" { "trace" } else { "debug" };
            format!("tasador={},info", level)
        } else {
            format!("tasador={}", self.level)
        }
    }
}

/// Installs the global subscriber, writing to stderr so stdout stays
/// reserved for valuation output.
pub fn init_logger(settings: &LogSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.filter_directive()));

    let compact = (settings.format == LogFormat::Compact).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .compact()
    });
    let json = (settings.format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_writer(std::io::stderr)
            .json()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(json)
        .init();
}

/// Compact logger at the default level, for tools that take no config.
pub fn init_cli_logger(verbose: bool) {
    init_logger(&LogSettings::from_config(None, verbose));
}
