//! The raw response handed back by the call layer.
//!
//! [`ApiResponse`] keeps the body as text together with the HTTP details of
//! the successful attempt. Endpoint methods turn it into typed records; the
//! health check returns it untouched.

use crate::schemas::{self, Record};
use crate::{Error, Result};
use http::{HeaderMap, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// A successful (2xx) response from the SWC API.
///
/// # Examples
///
/// ```no_run
/// use swc_sdk::{SwcClient, SwcConfig};
///
/// # async fn example() -> Result<(), swc_sdk::Error> {
/// let config = SwcConfig::builder().base_url("http://localhost:8000")?.build()?;
/// let client = SwcClient::new(config)?;
///
/// let response = client.get_health_check().await?;
/// println!("Status: {}", response.status);
/// println!("Body: {}", response.body);
/// println!("Took {:?} over {} attempt(s)", response.latency, response.attempts);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The raw response body.
    pub body: String,

    /// The URL that was requested, including the query string.
    pub url: String,

    /// Time from the first attempt until this response arrived, retries included.
    pub latency: Duration,

    /// Number of attempts made; `1` unless the call was retried.
    pub attempts: usize,
}

impl ApiResponse {
    /// Parses the body as untyped JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if the body is not valid JSON.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).map_err(|e| Error::Schema {
            record: "JSON",
            message: e.to_string(),
            raw: self.body.clone(),
        })
    }

    /// Validates the body as a single JSON object of record type `T`.
    pub fn record<T: Record>(&self) -> Result<T> {
        schemas::parse_record(&self.body)
    }

    /// Validates the body as a JSON array of `T`, preserving server order.
    pub fn records<T: Record>(&self) -> Result<Vec<T>> {
        schemas::parse_records(&self.body)
    }

    /// Returns `true` if the request required retries.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::Counts;
    use http::HeaderValue;

    fn response(body: &str, attempts: usize) -> ApiResponse {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        ApiResponse {
            status: StatusCode::OK,
            headers,
            body: body.to_string(),
            url: "http://localhost:8000/v0/counts/".to_string(),
            latency: Duration::from_millis(12),
            attempts,
        }
    }

    #[test]
    fn typed_record_from_body() {
        let response = response(
            r#"{"league_count": 5, "team_count": 20, "player_count": 1018}"#,
            1,
        );

        let counts: Counts = response.record().unwrap();
        assert_eq!(counts.player_count, 1018);
        assert!(!response.was_retried());
        assert_eq!(response.header("content-type"), Some("application/json"));
    }

    #[test]
    fn json_of_health_check_body() {
        let response = response(r#"{"message": "API health check successful"}"#, 3);

        let value = response.json().unwrap();
        assert_eq!(value["message"], "API health check successful");
        assert!(response.was_retried());
    }

    #[test]
    fn invalid_json_is_schema_error() {
        let response = response("<html>oops</html>", 1);
        assert!(matches!(response.json(), Err(Error::Schema { record: "JSON", .. })));
    }
}
