use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// Module path prefix shared by the CLI and the `datastreams-*` crates.
const WORKSPACE_TARGET: &str = "datastreams";

/// Ceiling for events from dependencies.
const DEPENDENCY_LEVEL: LevelFilter = LevelFilter::WARN;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// `--log-level` applies to the decoder, signer and CLI; dependencies stay
/// at `warn` or quieter.
fn targets(level: LogLevel) -> Targets {
    let level = level.as_filter();
    Targets::new()
        .with_default(level.min(DEPENDENCY_LEVEL))
        .with_target(WORKSPACE_TARGET, level)
}

/// Install the stderr subscriber; stdout stays reserved for command output.
///
/// At `debug` and `trace` the emitting crate is printed, so codec, report and
/// signer events can be told apart.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(level.as_filter() >= LevelFilter::DEBUG);
    let filter = targets(level);

    let _ = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(layer.json().with_filter(filter))
            .try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn workspace_crates_follow_requested_level() {
        let filter = targets(LogLevel::Trace);
        for target in [
            "datastreams::cmd::prepare",
            "datastreams_abi::codec",
            "datastreams_report::envelope",
            "datastreams_auth::signer",
        ] {
            assert!(filter.would_enable(target, &Level::TRACE), "{target}");
        }
    }

    #[test]
    fn dependencies_are_capped_at_warn() {
        let filter = targets(LogLevel::Debug);
        assert!(filter.would_enable("clap::parser", &Level::WARN));
        assert!(!filter.would_enable("clap::parser", &Level::INFO));
    }

    #[test]
    fn quiet_levels_apply_everywhere() {
        let filter = targets(LogLevel::Error);
        assert!(!filter.would_enable("datastreams_report::report", &Level::WARN));
        assert!(!filter.would_enable("clap::parser", &Level::WARN));
        assert!(filter.would_enable("datastreams_report::report", &Level::ERROR));
    }
}
