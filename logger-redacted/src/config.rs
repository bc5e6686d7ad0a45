// Logger configuration
use serde::Deserialize;
use std::str::FromStr;

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact, human readable lines
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" | "compact" => Ok(LogFormat::Pretty),
            "json" | "structured" => Ok(LogFormat::Json),
            other => Err(format!("Unknown log format: {other}. Valid options: pretty, json")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub log_level: String,
    pub format: LogFormat,
}

impl LoggerConfig {
    /// Pick the output format for a deployment environment name.
    ///
    /// Anything other than `development` logs JSON.
    pub fn for_environment(environment: &str) -> Self {
        let format = if environment.eq_ignore_ascii_case("development") {
            LogFormat::Pretty
        } else {
            LogFormat::Json
        };
        Self { format, ..Self::default() }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_environment_selects_format() {
        assert_eq!(LoggerConfig::for_environment("development").format, LogFormat::Pretty);
        assert_eq!(LoggerConfig::for_environment("production").format, LogFormat::Json);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: LoggerConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_level, "info");
    }
}
