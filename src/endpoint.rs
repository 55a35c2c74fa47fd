//! The fixed set of API endpoints and the per-request data sent to them.

use std::fmt;

/// Health check path.
pub const HEALTH_CHECK_ENDPOINT: &str = "/";
/// League collection; single leagues live under it.
pub const LIST_LEAGUES_ENDPOINT: &str = "/v0/leagues/";
/// Player collection; single players live under it.
pub const LIST_PLAYERS_ENDPOINT: &str = "/v0/players/";
/// Weekly performance collection.
pub const LIST_PERFORMANCES_ENDPOINT: &str = "/v0/performances/";
/// Team collection.
pub const LIST_TEAMS_ENDPOINT: &str = "/v0/teams/";
/// Aggregate counts.
pub const GET_COUNTS_ENDPOINT: &str = "/v0/counts/";

/// An SWC API endpoint.
///
/// # Examples
///
/// ```
/// use swc_sdk::Endpoint;
///
/// assert_eq!(Endpoint::Leagues.path(), "/v0/leagues/");
/// assert_eq!(Endpoint::League(5002).path(), "/v0/leagues/5002");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /`
    HealthCheck,
    /// `GET /v0/leagues/`
    Leagues,
    /// `GET /v0/leagues/{league_id}`
    League(i64),
    /// `GET /v0/teams/`
    Teams,
    /// `GET /v0/players/{player_id}`
    Player(i64),
    /// `GET /v0/performances/`
    Performances,
    /// `GET /v0/counts/`
    Counts,
}

impl Endpoint {
    /// The URL path of this endpoint, relative to the API base URL.
    pub fn path(&self) -> String {
        match self {
            Endpoint::HealthCheck => HEALTH_CHECK_ENDPOINT.to_string(),
            Endpoint::Leagues => LIST_LEAGUES_ENDPOINT.to_string(),
            Endpoint::League(id) => format!("{LIST_LEAGUES_ENDPOINT}{id}"),
            Endpoint::Teams => LIST_TEAMS_ENDPOINT.to_string(),
            Endpoint::Player(id) => format!("{LIST_PLAYERS_ENDPOINT}{id}"),
            Endpoint::Performances => LIST_PERFORMANCES_ENDPOINT.to_string(),
            Endpoint::Counts => GET_COUNTS_ENDPOINT.to_string(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Everything needed to issue one GET through the call layer.
///
/// Query parameters keep their insertion order. A parameter may be present
/// with no value; such entries are dropped by [`sanitized_query`](Self::sanitized_query)
/// and never reach the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMetadata {
    /// The endpoint being called.
    pub endpoint: Endpoint,

    /// Query parameters, `None` meaning "not set".
    pub query_params: Vec<(String, Option<String>)>,
}

impl RequestMetadata {
    /// Creates a request to `endpoint` with no query parameters.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            query_params: Vec::new(),
        }
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_params.push((key.into(), Some(value.to_string())));
        self
    }

    /// Adds a query parameter that may be unset.
    pub fn with_optional_query_param<V: ToString>(
        mut self,
        key: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        self.query_params.push((key.into(), value.map(|v| v.to_string())));
        self
    }

    /// The query parameters that carry a value, in insertion order.
    pub fn sanitized_query(&self) -> Vec<(&str, &str)> {
        self.query_params
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (key.as_str(), v)))
            .collect()
    }
}

impl From<Endpoint> for RequestMetadata {
    fn from(endpoint: Endpoint) -> Self {
        Self::new(endpoint)
    }
}
