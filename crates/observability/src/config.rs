//! Logging configuration, read from `OSMFLOW_LOG` and `OSMFLOW_LOG_FORMAT`.

use core::str::FromStr;

use thiserror::Error;

/// Filter directive variable. Falls back to `RUST_LOG`, then `info`.
pub const LOG_ENV: &str = "OSMFLOW_LOG";

/// Output format variable: `json` (default) or `pretty`.
pub const LOG_FORMAT_ENV: &str = "OSMFLOW_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown log format: {0} (expected `json` or `pretty`)")]
pub struct UnknownLogFormat(pub String);

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = UnknownLogFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(UnknownLogFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info,osmflow_handler=debug`.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// An unparseable format falls back to the default rather than failing
    /// startup; logging is not worth refusing to run over.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(filter) = lookup(LOG_ENV).or_else(|| lookup("RUST_LOG")) {
            if !filter.trim().is_empty() {
                config.filter = filter;
            }
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV) {
            config.format = format.parse().unwrap_or_default();
        }

        config
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_info_json() {
        let config = LogConfig::from_lookup(lookup(&[]));
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn own_variable_wins_over_rust_log() {
        let config = LogConfig::from_lookup(lookup(&[
            ("RUST_LOG", "warn"),
            (LOG_ENV, "osmflow_handler=debug"),
        ]));
        assert_eq!(config.filter, "osmflow_handler=debug");

        let config = LogConfig::from_lookup(lookup(&[("RUST_LOG", "warn")]));
        assert_eq!(config.filter, "warn");
    }

    #[test]
    fn blank_filter_is_ignored() {
        let config = LogConfig::from_lookup(lookup(&[(LOG_ENV, "  ")]));
        assert_eq!(config.filter, "info");
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("PRETTY".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert_eq!(" json ".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!(
            "xml".parse::<LogFormat>(),
            Err(UnknownLogFormat("xml".to_string()))
        );

        let config = LogConfig::from_lookup(lookup(&[(LOG_FORMAT_ENV, "xml")]));
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn builders_override_fields() {
        let config = LogConfig::default()
            .with_filter("trace")
            .with_format(LogFormat::Pretty);
        assert_eq!(config.filter, "trace");
        assert_eq!(config.format, LogFormat::Pretty);
    }
}
