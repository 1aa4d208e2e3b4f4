use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.feefo.com/api/20";
pub const DEFAULT_MERCHANT_ID: &str = "notonthehighstreet-com";
pub const DEFAULT_MAX_PAGES: u64 = 1;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// How loaded rows interact with rows already in a destination table.
/// Set once per run and applied uniformly to every table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Upsert by primary key.
    #[default]
    Merge,
    /// Truncate the table, then insert this run's rows.
    Replace,
    /// Insert without dedup; every run strictly adds rows.
    Append,
}

impl WriteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteMode::Merge => "merge",
            WriteMode::Replace => "replace",
            WriteMode::Append => "append",
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WriteMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merge" => Ok(WriteMode::Merge),
            "replace" => Ok(WriteMode::Replace),
            "append" => Ok(WriteMode::Append),
            other => Err(ConfigError::InvalidMode {
                mode: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Feefo API root, e.g. `https://api.feefo.com/api/20`.
    pub base_url: String,
    pub merchant_id: String,
    /// Caller-supplied page cap; the server-declared total also bounds the walk.
    pub max_pages: u64,
    pub mode: WriteMode,
    /// Fetch product ratings for reviewed SKUs.
    pub include_ratings: bool,
    /// Filter product ratings to the last N days; unset means all time.
    pub period_days: Option<u32>,
    /// Start date filter, passed through to the API verbatim.
    pub since: Option<String>,
    /// End date filter, passed through to the API verbatim.
    pub until: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            merchant_id: DEFAULT_MERCHANT_ID.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            mode: WriteMode::Merge,
            include_ratings: true,
            period_days: None,
            since: None,
            until: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl PipelineConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let config: PipelineConfig =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Invalid {
                message: "base_url cannot be empty".to_string(),
            });
        }
        if self.merchant_id.is_empty() {
            return Err(ConfigError::Invalid {
                message: "merchant_id cannot be empty".to_string(),
            });
        }
        if self.max_pages == 0 {
            return Err(ConfigError::Invalid {
                message: "max_pages must be at least 1".to_string(),
            });
        }
        if self.period_days == Some(0) {
            return Err(ConfigError::Invalid {
                message: "period_days must be a positive number of days".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn write_mode_parses_known_values() {
        assert_eq!("merge".parse::<WriteMode>().unwrap(), WriteMode::Merge);
        assert_eq!("replace".parse::<WriteMode>().unwrap(), WriteMode::Replace);
        assert_eq!("append".parse::<WriteMode>().unwrap(), WriteMode::Append);
    }

    #[test]
    fn write_mode_rejects_unknown_value() {
        let err = "upsert".parse::<WriteMode>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMode { mode } if mode == "upsert"));
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.merchant_id, "notonthehighstreet-com");
        assert_eq!(config.max_pages, 1);
        assert_eq!(config.mode, WriteMode::Merge);
        assert!(config.include_ratings);
        assert_eq!(config.period_days, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_max_pages() {
        let config = PipelineConfig {
            max_pages: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_period_days() {
        let config = PipelineConfig {
            period_days: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_partial_yaml_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "merchant_id: some-merchant\nmax_pages: 3\nmode: append").unwrap();

        let config = PipelineConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.merchant_id, "some-merchant");
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.mode, WriteMode::Append);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.include_ratings);
    }

    #[test]
    fn from_file_reports_missing_path() {
        let err = PipelineConfig::from_file("/does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::LoadFailed { .. }));
    }
}
