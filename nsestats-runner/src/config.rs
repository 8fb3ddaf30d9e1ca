//! Report configuration.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! reproduces the stock report: `TICKERS.csv` in, `REPORTS/` out.

use nsestats_core::data::{FetchRequest, MarketSuffix};
use nsestats_core::stats::DEFAULT_INTRADAY_WINDOW;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything the pipeline needs to produce one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// CSV with `SYMBOL` and `NAME OF COMPANY` columns.
    pub tickers_path: PathBuf,

    /// Directory the report lands in; created if missing.
    pub output_dir: PathBuf,

    /// File name stem before the `_YYYY-MM-DD-HHMM` timestamp.
    pub file_prefix: String,

    pub market_suffix: MarketSuffix,

    /// Request feeding the 52-week low/high.
    pub daily: FetchRequest,

    /// Request feeding the last-day average close.
    pub intraday: FetchRequest,

    /// Number of trailing intraday rows averaged.
    pub intraday_window: usize,

    /// Per-request HTTP timeout.
    pub timeout_secs: u64,

    /// Issue the daily and intraday fetches concurrently.
    pub concurrent_fetch: bool,

    /// Also write a `.csv` copy next to the spreadsheet.
    pub csv_copy: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            tickers_path: PathBuf::from("TICKERS.csv"),
            output_dir: PathBuf::from("REPORTS"),
            file_prefix: "NSE_TICKER_STATS".to_string(),
            market_suffix: MarketSuffix::nse(),
            daily: FetchRequest::DAILY_52W,
            intraday: FetchRequest::INTRADAY_1D,
            intraday_window: DEFAULT_INTRADAY_WINDOW,
            timeout_secs: 30,
            concurrent_fetch: false,
            csv_copy: false,
        }
    }
}

impl ReportConfig {
    /// Load and validate a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.intraday_window == 0 {
            return Err(ConfigError::Invalid(
                "intraday_window must be at least 1".into(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        if self.file_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("file_prefix must not be empty".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nsestats_core::data::{Interval, Period};
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ReportConfig::from_toml("").unwrap();
        assert_eq!(config, ReportConfig::default());
        assert_eq!(config.tickers_path, PathBuf::from("TICKERS.csv"));
        assert_eq!(config.output_dir, PathBuf::from("REPORTS"));
        assert_eq!(config.market_suffix.as_str(), ".NS");
        assert_eq!(config.intraday_window, 30);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn overrides_are_applied() {
        let config = ReportConfig::from_toml(
            r#"
            tickers_path = "data/nifty50.csv"
            output_dir = "out"
            market_suffix = ".BO"
            intraday_window = 15
            concurrent_fetch = true

            [intraday]
            period = "5d"
            interval = "5m"
            "#,
        )
        .unwrap();

        assert_eq!(config.tickers_path, PathBuf::from("data/nifty50.csv"));
        assert_eq!(config.market_suffix.as_str(), ".BO");
        assert_eq!(config.intraday.period, Period::FiveDays);
        assert_eq!(config.intraday.interval, Interval::FiveMinutes);
        assert_eq!(config.daily, FetchRequest::DAILY_52W);
        assert_eq!(config.intraday_window, 15);
        assert!(config.concurrent_fetch);
        assert!(!config.csv_copy);
    }

    #[test]
    fn unknown_interval_is_a_parse_error() {
        let err = ReportConfig::from_toml(
            r#"
            [daily]
            period = "1y"
            interval = "7m"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = ReportConfig::from_toml("ticker_path = \"x.csv\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_window_is_invalid() {
        let err = ReportConfig::from_toml("intraday_window = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn zero_timeout_is_invalid() {
        let err = ReportConfig::from_toml("timeout_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn blank_prefix_is_invalid() {
        let err = ReportConfig::from_toml("file_prefix = \"  \"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "csv_copy = true").unwrap();

        let config = ReportConfig::from_file(file.path()).unwrap();
        assert!(config.csv_copy);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReportConfig::from_file(&dir.path().join("nsestats.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = ReportConfig {
            csv_copy: true,
            intraday_window: 10,
            ..ReportConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(ReportConfig::from_toml(&text).unwrap(), config);
    }
}
