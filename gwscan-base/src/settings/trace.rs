use eyre::Result;
use gwscan_core::config::*;
use serde::Deserialize;
use tracing::Subscriber;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    prelude::*,
    registry::LookupSpan,
    Layer,
};

/// Logging level. A "higher level" means more will be logged.
#[derive(Default, Debug, Clone, Copy, Deserialize, PartialOrd, Ord, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Level {
    /// Off
    Off = 0,
    /// Error
    Error = 1,
    /// Warn
    Warn = 2,
    /// Debug
    Debug = 4,
    /// Trace
    Trace = 5,
    /// Info
    #[serde(other)]
    #[default]
    Info = 3,
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> LevelFilter {
        match level {
            Level::Off => LevelFilter::OFF,
            Level::Error => LevelFilter::ERROR,
            Level::Warn => LevelFilter::WARN,
            Level::Debug => LevelFilter::DEBUG,
            Level::Trace => LevelFilter::TRACE,
            Level::Info => LevelFilter::INFO,
        }
    }
}

/// Output format of the log layer. Logs go to stderr, leaving stdout to
/// command output.
#[derive(Default, Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Style {
    /// Multi-line, human oriented
    Pretty,
    /// One JSON object per event
    Json,
    /// Single line, abbreviated
    Compact,
    /// Single line with all span fields
    #[default]
    #[serde(other)]
    Full,
}

impl Style {
    fn layer<S>(self) -> Box<dyn Layer<S> + Send + Sync + 'static>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        match self {
            Style::Pretty => layer.pretty().boxed(),
            Style::Json => layer.json().boxed(),
            Style::Compact => layer.compact().boxed(),
            Style::Full => layer.boxed(),
        }
    }
}

/// Configuration for the tracing subscribers used by gwscan binaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TracingConfig {
    /// log format
    pub fmt: Style,
    /// most verbose level shown
    pub level: Level,
}

impl TracingConfig {
    /// Filter applied before the fmt layer. Chatty dependencies are held to
    /// info unless tracing everything.
    pub fn targets(&self) -> Targets {
        let mut targets = Targets::new().with_default(self.level);
        if self.level < Level::Trace {
            targets = targets.with_target("config", Level::Info);
            targets = targets.with_target("ethers_core", Level::Info);
        }
        targets
    }

    /// Attempt to instantiate and register a tracing subscriber setup from
    /// settings.
    pub fn start_tracing(&self) -> Result<()> {
        let err_layer = tracing_error::ErrorLayer::default();

        let subscriber = tracing_subscriber::Registry::default()
            .with(self.targets())
            .with(self.fmt.layer())
            .with(err_layer);

        subscriber.try_init()?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawLogConf {
    format: Option<String>,
    level: Option<String>,
}

impl FromRawConf<'_, RawLogConf> for TracingConfig {
    fn from_config(raw: RawLogConf, cwp: &ConfigPath) -> ConfigResult<Self> {
        let mut err = ConfigParsingError::default();

        let fmt = raw
            .format
            .and_then(|fmt| {
                serde_json::from_value(serde_json::Value::String(fmt))
                    .take_err(&mut err, || cwp + "format")
            })
            .unwrap_or_default();

        let level = raw
            .level
            .and_then(|lvl| {
                serde_json::from_value(serde_json::Value::String(lvl))
                    .take_err(&mut err, || cwp + "level")
            })
            .unwrap_or_default();

        err.into_result()?;
        Ok(Self { fmt, level })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_values_fall_back() {
        let raw = RawLogConf {
            format: Some("json".into()),
            level: Some("verbose".into()),
        };
        let config: TracingConfig = raw.parse_config(&ConfigPath::default()).unwrap();
        assert_eq!(config.fmt, Style::Json);
        assert_eq!(config.level, Level::Info);
    }

    #[test]
    fn levels_are_ordered() {
        assert!(Level::Debug < Level::Trace);
        assert!(Level::Info < Level::Debug);
        assert_eq!(LevelFilter::from(Level::Warn), LevelFilter::WARN);
    }

    #[test]
    fn levels_deserialize_by_name() {
        let level = |name: &str| serde_json::from_value::<Level>(name.into()).unwrap();
        assert_eq!(level("debug"), Level::Debug);
        assert_eq!(level("trace"), Level::Trace);
        assert_eq!(level("off"), Level::Off);
        assert_eq!(level("loud"), Level::Info);
    }
}
