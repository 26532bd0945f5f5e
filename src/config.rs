//! Configuration for graphs and machines.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use uuid::Uuid;

/// How long a driver may take to settle after a transition action.
pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_millis(12_000);

/// Verbosity a model run asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    #[default]
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Configuration carried by a [`Graph`](crate::graph::Graph) instance.
///
/// The `id` tags every log span the instance emits and is handed to
/// states as their [`ModelRef`](crate::core::ModelRef). `flags` are free-form
/// values model authors can consult from their policies. `class_name` and
/// `log_level` only describe the run; the library never installs a
/// subscriber itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    id: String,
    #[serde(default)]
    class_name: Option<String>,
    #[serde(default)]
    log_level: LogLevel,
    #[serde(default)]
    flags: Map<String, Value>,
    #[serde(default = "default_settle_timeout")]
    settle_timeout: Duration,
}

fn default_settle_timeout() -> Duration {
    DEFAULT_SETTLE_TIMEOUT
}

impl Config {
    /// Configuration with a fresh random id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            class_name: None,
            log_level: LogLevel::default(),
            flags: Map::new(),
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_flag(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.flags.insert(key.into(), value.into());
        self
    }

    pub fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn flags(&self) -> &Map<String, Value> {
        &self.flags
    }

    pub fn flag(&self, key: &str) -> Option<&Value> {
        self.flags.get(key)
    }

    pub fn settle_timeout(&self) -> Duration {
        self.settle_timeout
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Multi-line summary; flag keys are padded to a common width.
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Id: {}", self.id)?;
        writeln!(f, "Class Name: {}", self.class_name().unwrap_or_default())?;
        writeln!(f, "Log Level: {}", self.log_level)?;
        write!(f, "Flags:")?;

        let width = self.flags.keys().map(String::len).max().unwrap_or(0) + 1;
        for (key, value) in &self.flags {
            match value {
                Value::String(text) => write!(f, "\n{key:<width$} => {text}")?,
                other => write!(f, "\n{key:<width$} => {other}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_config_has_unique_uuid_id() {
        let first = Config::new();
        let second = Config::new();

        assert_ne!(first.id(), second.id());
        assert!(Uuid::parse_str(first.id()).is_ok());
    }

    #[test]
    fn default_settle_timeout_is_twelve_seconds() {
        assert_eq!(Config::default().settle_timeout(), Duration::from_secs(12));
    }

    #[test]
    fn builder_methods_set_fields() {
        let config = Config::new()
            .with_id("checkout-run")
            .with_flag("region", "eu")
            .with_settle_timeout(Duration::from_millis(250));

        assert_eq!(config.id(), "checkout-run");
        assert_eq!(config.flag("region"), Some(&json!("eu")));
        assert_eq!(config.flags().len(), 1);
        assert_eq!(config.settle_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let config: Config = serde_json::from_value(json!({ "id": "abc" })).unwrap();

        assert_eq!(config.id(), "abc");
        assert_eq!(config.class_name(), None);
        assert_eq!(config.log_level(), LogLevel::Error);
        assert!(config.flags().is_empty());
        assert_eq!(config.settle_timeout(), DEFAULT_SETTLE_TIMEOUT);
    }

    #[test]
    fn display_summarises_configuration() {
        let config = Config::new()
            .with_id("123456")
            .with_class_name("FooBar")
            .with_flag("a", 1)
            .with_flag("b", 2);

        assert_eq!(
            config.to_string(),
            "Id: 123456\nClass Name: FooBar\nLog Level: ERROR\nFlags:\na  => 1\nb  => 2"
        );
    }

    #[test]
    fn display_pads_keys_and_prints_text_unquoted() {
        let config = Config::new()
            .with_id("run")
            .with_log_level(LogLevel::Debug)
            .with_flag("region", "eu")
            .with_flag("retries", 3);

        assert_eq!(
            config.to_string(),
            "Id: run\nClass Name: \nLog Level: DEBUG\nFlags:\nregion   => eu\nretries  => 3"
        );
    }

    #[test]
    fn log_level_serializes_uppercase_and_maps_to_filter() {
        assert_eq!(serde_json::to_value(LogLevel::Warn).unwrap(), json!("WARN"));
        assert_eq!(LevelFilter::from(LogLevel::Info), LevelFilter::INFO);
    }
}
