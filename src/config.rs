//! Client configuration.
//!
//! [`SwcConfig`] is built once, either through [`SwcConfig::builder`] or from
//! `SWC_*` environment variables, and never changes afterwards.

use crate::{bulk::BulkFileFormat, Error, Result};
use std::time::Duration;
use url::Url;

/// Where the pre-generated bulk files are published.
pub const DEFAULT_BULK_FILE_BASE_URL: &str =
    "https://raw.githubusercontent.com/christinesalim/api_portfolio_project/main/bulk/";

/// Default total time budget for retries.
pub const DEFAULT_BACKOFF_MAX_TIME: Duration = Duration::from_secs(30);

/// API base URL. Required by [`SwcConfig::from_env`].
pub const ENV_BASE_URL: &str = "SWC_API_BASE_URL";
/// `true`/`false`: retry failed calls with exponential backoff.
pub const ENV_BACKOFF: &str = "SWC_BACKOFF";
/// Retry time budget in seconds.
pub const ENV_BACKOFF_MAX_TIME: &str = "SWC_BACKOFF_MAX_TIME";
/// `csv` or `parquet`.
pub const ENV_BULK_FILE_FORMAT: &str = "SWC_BULK_FILE_FORMAT";
/// Bulk file host, overriding [`DEFAULT_BULK_FILE_BASE_URL`].
pub const ENV_BULK_FILE_BASE_URL: &str = "SWC_BULK_FILE_BASE_URL";
/// Per-request timeout in seconds.
pub const ENV_TIMEOUT: &str = "SWC_TIMEOUT";

/// Settings consumed by [`SwcClient`](crate::SwcClient).
///
/// # Examples
///
/// ```
/// use swc_sdk::{BulkFileFormat, SwcConfig};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), swc_sdk::Error> {
/// let config = SwcConfig::builder()
///     .base_url("http://localhost:8000")?
///     .backoff(true)
///     .backoff_max_time(Duration::from_secs(10))
///     .bulk_file_format(BulkFileFormat::Parquet)
///     .build()?;
///
/// assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SwcConfig {
    /// Root of the SWC API.
    pub base_url: Url,

    /// Whether failed API calls are retried with exponential backoff.
    pub backoff: bool,

    /// Total time budget for one call including all retries.
    pub backoff_max_time: Duration,

    /// Format of downloaded bulk files.
    pub bulk_file_format: BulkFileFormat,

    /// Directory URL the bulk files live under. Always ends with `/`.
    pub bulk_base_url: Url,

    /// Per-request timeout. `None` leaves reqwest's default in place.
    pub timeout: Option<Duration>,
}

impl SwcConfig {
    /// Creates a new builder with default settings.
    pub fn builder() -> SwcConfigBuilder {
        SwcConfigBuilder::new()
    }

    /// Loads the configuration from `SWC_*` environment variables.
    ///
    /// `SWC_API_BASE_URL` is required; everything else has a default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for a missing base URL or malformed
    /// values, and [`Error::InvalidUrl`] for unparsable URLs.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration from an arbitrary key lookup.
    ///
    /// This is what [`from_env`](Self::from_env) uses; it exists so other
    /// sources (a parsed `.env` file, a map in tests) can feed the same rules.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_BASE_URL)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| Error::Configuration(format!("{ENV_BASE_URL} is not set")))?;

        let mut builder = SwcConfigBuilder::new().base_url(base_url.trim())?;

        if let Some(value) = lookup(ENV_BACKOFF) {
            builder = builder.backoff(parse_bool(ENV_BACKOFF, &value)?);
        }
        if let Some(value) = lookup(ENV_BACKOFF_MAX_TIME) {
            builder = builder.backoff_max_time(parse_seconds(ENV_BACKOFF_MAX_TIME, &value)?);
        }
        if let Some(value) = lookup(ENV_BULK_FILE_FORMAT) {
            builder = builder.bulk_file_format(BulkFileFormat::from_config_value(&value));
        }
        if let Some(value) = lookup(ENV_BULK_FILE_BASE_URL) {
            builder = builder.bulk_base_url(value.trim())?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT) {
            builder = builder.timeout(parse_seconds(ENV_TIMEOUT, &value)?);
        }

        builder.build()
    }
}

/// Builder for [`SwcConfig`].
#[derive(Debug, Clone)]
pub struct SwcConfigBuilder {
    base_url: Option<Url>,
    backoff: bool,
    backoff_max_time: Duration,
    bulk_file_format: BulkFileFormat,
    bulk_base_url: Option<Url>,
    timeout: Option<Duration>,
}

impl SwcConfigBuilder {
    /// Creates a builder with backoff enabled, a 30 second budget and CSV bulk files.
    pub fn new() -> Self {
        Self {
            base_url: None,
            backoff: true,
            backoff_max_time: DEFAULT_BACKOFF_MAX_TIME,
            bulk_file_format: BulkFileFormat::Csv,
            bulk_base_url: None,
            timeout: None,
        }
    }

    /// Sets the API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Enables or disables retrying with exponential backoff.
    pub fn backoff(mut self, enabled: bool) -> Self {
        self.backoff = enabled;
        self
    }

    /// Sets the total time budget for retries.
    pub fn backoff_max_time(mut self, max_time: Duration) -> Self {
        self.backoff_max_time = max_time;
        self
    }

    /// Selects the format of downloaded bulk files.
    pub fn bulk_file_format(mut self, format: BulkFileFormat) -> Self {
        self.bulk_file_format = format;
        self
    }

    /// Overrides the bulk file host.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn bulk_base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.bulk_base_url = Some(directory_url(Url::parse(url.as_ref())?));
        Ok(self)
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL was provided or the URL cannot carry
    /// a path (e.g. `mailto:`).
    pub fn build(self) -> Result<SwcConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Configuration("Base URL is required".to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "Base URL {base_url} cannot be used as a base"
            )));
        }

        let bulk_base_url = match self.bulk_base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BULK_FILE_BASE_URL)?,
        };

        Ok(SwcConfig {
            base_url,
            backoff: self.backoff,
            backoff_max_time: self.backoff_max_time,
            bulk_file_format: self.bulk_file_format,
            bulk_base_url,
            timeout: self.timeout,
        })
    }
}

impl Default for SwcConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Url::join replaces the last path segment unless the path ends in '/'.
fn directory_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Configuration(format!(
            "{key} must be a boolean, got {other:?}"
        ))),
    }
}

fn parse_seconds(key: &str, value: &str) -> Result<Duration> {
    let seconds: f64 = value.trim().parse().map_err(|_| {
        Error::Configuration(format!("{key} must be a number of seconds, got {value:?}"))
    })?;
    Duration::try_from_secs_f64(seconds).map_err(|_| {
        Error::Configuration(format!("{key} must be a non-negative duration, got {value:?}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn builder_defaults() {
        let config = SwcConfig::builder()
            .base_url("http://localhost:8000")
            .unwrap()
            .build()
            .unwrap();

        assert!(config.backoff);
        assert_eq!(config.backoff_max_time, Duration::from_secs(30));
        assert_eq!(config.bulk_file_format, BulkFileFormat::Csv);
        assert_eq!(config.bulk_base_url.as_str(), DEFAULT_BULK_FILE_BASE_URL);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn builder_requires_base_url() {
        let result = SwcConfig::builder().build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn builder_rejects_invalid_url() {
        let result = SwcConfig::builder().base_url("not a url");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn bulk_base_url_gets_trailing_slash() {
        let config = SwcConfig::builder()
            .base_url("http://localhost:8000")
            .unwrap()
            .bulk_base_url("http://files.example.com/bulk")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.bulk_base_url.as_str(), "http://files.example.com/bulk/");
    }

    #[test]
    fn from_lookup_reads_all_settings() {
        let config = SwcConfig::from_lookup(lookup_from(&[
            (ENV_BASE_URL, "http://0.0.0.0:8000"),
            (ENV_BACKOFF, "False"),
            (ENV_BACKOFF_MAX_TIME, "12"),
            (ENV_BULK_FILE_FORMAT, "PARQUET"),
            (ENV_BULK_FILE_BASE_URL, "http://files.example.com/bulk/"),
            (ENV_TIMEOUT, "2.5"),
        ]))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "http://0.0.0.0:8000/");
        assert!(!config.backoff);
        assert_eq!(config.backoff_max_time, Duration::from_secs(12));
        assert_eq!(config.bulk_file_format, BulkFileFormat::Parquet);
        assert_eq!(config.bulk_base_url.as_str(), "http://files.example.com/bulk/");
        assert_eq!(config.timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn from_lookup_requires_base_url() {
        let result = SwcConfig::from_lookup(lookup_from(&[(ENV_BACKOFF, "true")]));
        assert!(matches!(result, Err(Error::Configuration(msg)) if msg.contains(ENV_BASE_URL)));

        let result = SwcConfig::from_lookup(lookup_from(&[(ENV_BASE_URL, "  ")]));
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn from_lookup_rejects_bad_values() {
        let result = SwcConfig::from_lookup(lookup_from(&[
            (ENV_BASE_URL, "http://localhost:8000"),
            (ENV_BACKOFF, "maybe"),
        ]));
        assert!(matches!(result, Err(Error::Configuration(msg)) if msg.contains(ENV_BACKOFF)));

        let result = SwcConfig::from_lookup(lookup_from(&[
            (ENV_BASE_URL, "http://localhost:8000"),
            (ENV_BACKOFF_MAX_TIME, "-3"),
        ]));
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn unknown_bulk_format_falls_back_to_csv() {
        let config = SwcConfig::from_lookup(lookup_from(&[
            (ENV_BASE_URL, "http://localhost:8000"),
            (ENV_BULK_FILE_FORMAT, "xlsx"),
        ]))
        .unwrap();

        assert_eq!(config.bulk_file_format, BulkFileFormat::Csv);
    }
}
