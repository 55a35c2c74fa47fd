//! Filters and pagination for the list endpoints.
//!
//! Each query converts into a [`RequestMetadata`]. Unset filters are carried
//! as absent parameters and dropped before the request is sent. The client
//! never pages on its own: `skip` and `limit` go out exactly as given.

use crate::endpoint::{Endpoint, RequestMetadata};
use chrono::NaiveDate;

/// Records skipped when no `skip` is given.
pub const DEFAULT_SKIP: u32 = 0;
/// Page size when no `limit` is given.
pub const DEFAULT_LIMIT: u32 = 100;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parameters for [`SwcClient::list_leagues`](crate::SwcClient::list_leagues).
///
/// # Examples
///
/// ```
/// use swc_sdk::LeagueQuery;
///
/// let query = LeagueQuery::default().limit(10).league_name("Pigskin Prodigal Fantasy League");
/// assert_eq!(query.skip, 0);
/// assert_eq!(query.limit, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueQuery {
    pub skip: u32,
    pub limit: u32,
    pub minimum_last_changed_date: Option<NaiveDate>,
    pub league_name: Option<String>,
}

impl Default for LeagueQuery {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
            minimum_last_changed_date: None,
            league_name: None,
        }
    }
}

impl LeagueQuery {
    /// Number of records to skip before the first one returned.
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    /// Maximum number of records to return; passed to the server unchanged.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Only leagues changed on or after `date`.
    pub fn minimum_last_changed_date(mut self, date: NaiveDate) -> Self {
        self.minimum_last_changed_date = Some(date);
        self
    }

    /// Only leagues with exactly this name.
    pub fn league_name(mut self, name: impl Into<String>) -> Self {
        self.league_name = Some(name.into());
        self
    }

    pub(crate) fn to_request(&self) -> RequestMetadata {
        RequestMetadata::new(Endpoint::Leagues)
            .with_query_param("skip", self.skip)
            .with_query_param("limit", self.limit)
            .with_optional_query_param(
                "minimum_last_changed_date",
                self.minimum_last_changed_date.map(format_date),
            )
            .with_optional_query_param("league_name", self.league_name.as_deref())
    }
}

/// Parameters for [`SwcClient::list_teams`](crate::SwcClient::list_teams).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamQuery {
    pub skip: u32,
    pub limit: u32,
    pub minimum_last_changed_date: Option<NaiveDate>,
    pub team_name: Option<String>,
    pub league_id: Option<i64>,
}

impl Default for TeamQuery {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
            minimum_last_changed_date: None,
            team_name: None,
            league_id: None,
        }
    }
}

impl TeamQuery {
    /// Number of records to skip before the first one returned.
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    /// Maximum number of records to return; passed to the server unchanged.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Only records changed on or after `date`.
    pub fn minimum_last_changed_date(mut self, date: NaiveDate) -> Self {
        self.minimum_last_changed_date = Some(date);
        self
    }

    /// Only teams with exactly this name.
    pub fn team_name(mut self, name: impl Into<String>) -> Self {
        self.team_name = Some(name.into());
        self
    }

    /// Only teams belonging to this league.
    pub fn league_id(mut self, league_id: i64) -> Self {
        self.league_id = Some(league_id);
        self
    }

    pub(crate) fn to_request(&self) -> RequestMetadata {
        RequestMetadata::new(Endpoint::Teams)
            .with_query_param("skip", self.skip)
            .with_query_param("limit", self.limit)
            .with_optional_query_param(
                "minimum_last_changed_date",
                self.minimum_last_changed_date.map(format_date),
            )
            .with_optional_query_param("team_name", self.team_name.as_deref())
            .with_optional_query_param("league_id", self.league_id)
    }
}

/// Parameters for [`SwcClient::list_performances`](crate::SwcClient::list_performances).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerformanceQuery {
    pub skip: u32,
    pub limit: u32,
    pub minimum_last_changed_date: Option<NaiveDate>,
}

impl Default for PerformanceQuery {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
            minimum_last_changed_date: None,
        }
    }
}

impl PerformanceQuery {
    /// Number of records to skip before the first one returned.
    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }

    /// Maximum number of records to return; passed to the server unchanged.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Only records changed on or after `date`.
    pub fn minimum_last_changed_date(mut self, date: NaiveDate) -> Self {
        self.minimum_last_changed_date = Some(date);
        self
    }

    pub(crate) fn to_request(&self) -> RequestMetadata {
        RequestMetadata::new(Endpoint::Performances)
            .with_query_param("skip", self.skip)
            .with_query_param("limit", self.limit)
            .with_optional_query_param(
                "minimum_last_changed_date",
                self.minimum_last_changed_date.map(format_date),
            )
    }
}
