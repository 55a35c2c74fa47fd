//! Error types for SWC API calls.
//!
//! Failures are split by where they happen: the transport (`Request`), the
//! server's status line (`Status`), the shape of a successful body (`Schema`),
//! and the bulk file host (`BulkFile`). Raw bodies are kept wherever one was
//! received so that a failure can be diagnosed from the error alone.

use http::StatusCode;

/// The main error type for the SWC client.
///
/// # Examples
///
/// ```no_run
/// use swc_sdk::{Error, SwcClient, SwcConfig};
///
/// # async fn example() -> Result<(), Error> {
/// let config = SwcConfig::builder().base_url("http://localhost:8000")?.build()?;
/// let client = SwcClient::new(config)?;
///
/// match client.get_league_by_id(5002).await {
///     Ok(league) => println!("{}", league.league_name),
///     Err(Error::Status { status, body, .. }) => eprintln!("HTTP {status}: {body}"),
///     Err(Error::Schema { record, message, .. }) => eprintln!("bad {record}: {message}"),
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never produced a response: DNS lookup, connection,
    /// timeout, or reading the body failed.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status code.
    #[error("HTTP status error {status} for {url}: {body}")]
    Status {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        body: String,
        /// The URL that was requested, including the query string
        url: String,
    },

    /// A successful response did not match the expected record shape.
    ///
    /// This is never retried: asking again will not fix the payload.
    #[error("Response does not match {record} schema: {message}")]
    Schema {
        /// Name of the record type being built
        record: &'static str,
        /// What was wrong with the payload
        message: String,
        /// The raw response body
        raw: String,
    },

    /// The bulk file host answered with something other than 200.
    #[error("Bulk file {file} unavailable (status {status})")]
    BulkFile {
        /// The file name that was requested
        file: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if the call layer may retry after this error.
    ///
    /// Transport failures and error statuses are retryable. Schema,
    /// configuration and bulk file errors are not.
    ///
    /// # Examples
    ///
    /// ```
    /// use swc_sdk::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::Status {
    ///     status: StatusCode::SERVICE_UNAVAILABLE,
    ///     body: "down for maintenance".to_string(),
    ///     url: "http://localhost:8000/v0/counts/".to_string(),
    /// };
    /// assert!(err.is_retryable());
    ///
    /// let err = Error::Schema {
    ///     record: "League",
    ///     message: "missing field `league_id`".to_string(),
    ///     raw: "{}".to_string(),
    /// };
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Request(_) => true,
            Error::Status { .. } => true,
            Error::Schema { .. } => false,
            Error::BulkFile { .. } => false,
            Error::Configuration(_) => false,
            Error::InvalidUrl(_) => false,
        }
    }

    /// Returns `true` if the underlying transport timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Request(e) if e.is_timeout())
    }

    /// Returns the HTTP status code if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::BulkFile { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error carries one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Status { body, .. } => Some(body),
            Error::Schema { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// A specialized `Result` type for SWC client calls.
pub type Result<T> = std::result::Result<T, Error>;
