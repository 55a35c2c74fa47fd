//! Typed records returned by the SWC API.
//!
//! Every record is built through [`Record::from_value`], which fails with
//! [`Error::Schema`] when a required field is missing or has the wrong type.
//! Nothing is coerced: a `"12"` where an integer is expected is an error.
//! Unknown extra fields are ignored so newer servers stay compatible.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record type that can be validated out of a JSON value.
pub trait Record: DeserializeOwned {
    /// Name used in schema error messages.
    const NAME: &'static str;

    /// Validates `value` and builds the record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if the value does not match the record shape.
    fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| Error::Schema {
            record: Self::NAME,
            message: e.to_string(),
            raw: value.to_string(),
        })
    }
}

/// One player's fantasy score for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub performance_id: i64,
    pub player_id: i64,
    pub week_number: String,
    pub fantasy_points: f64,
    pub last_changed_date: NaiveDate,
}

/// Player fields without nested performances, as embedded in a [`Team`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBase {
    pub player_id: i64,
    /// NFL GSIS identifier. The key is required but may be `null`.
    #[serde(deserialize_with = "Option::deserialize")]
    pub gsis_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub last_changed_date: NaiveDate,
}

/// A player with their recorded performances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: i64,
    #[serde(deserialize_with = "Option::deserialize")]
    pub gsis_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub last_changed_date: NaiveDate,
    #[serde(default)]
    pub performances: Vec<Performance>,
}

impl Player {
    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Team fields without roster or scores, as embedded in a [`League`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamBase {
    pub league_id: i64,
    pub team_id: i64,
    pub team_name: String,
    pub last_changed_date: NaiveDate,
}

/// A team's total for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamWeek {
    pub week_number: String,
    pub fantasy_points: f64,
    pub last_changed_date: NaiveDate,
}

/// A fantasy team with its roster and weekly scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub league_id: i64,
    pub team_id: i64,
    pub team_name: String,
    pub last_changed_date: NaiveDate,
    #[serde(default)]
    pub players: Vec<PlayerBase>,
    #[serde(default)]
    pub weekly_scores: Vec<TeamWeek>,
}

/// A fantasy league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub league_id: i64,
    pub league_name: String,
    pub scoring_type: String,
    pub league_size: i64,
    pub last_changed_date: NaiveDate,
    #[serde(default)]
    pub teams: Vec<TeamBase>,
}

/// Point-in-time totals reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub league_count: u64,
    pub team_count: u64,
    pub player_count: u64,
    /// Reported by API v0.2 and later.
    #[serde(default)]
    pub week_count: Option<u64>,
}

impl Record for Performance {
    const NAME: &'static str = "Performance";
}

impl Record for PlayerBase {
    const NAME: &'static str = "PlayerBase";
}

impl Record for Player {
    const NAME: &'static str = "Player";
}

impl Record for TeamBase {
    const NAME: &'static str = "TeamBase";
}

impl Record for TeamWeek {
    const NAME: &'static str = "TeamWeek";
}

impl Record for Team {
    const NAME: &'static str = "Team";
}

impl Record for League {
    const NAME: &'static str = "League";
}

impl Record for Counts {
    const NAME: &'static str = "Counts";
}

/// Parses `body` as a single JSON object and validates it as `T`.
pub(crate) fn parse_record<T: Record>(body: &str) -> Result<T> {
    let value = parse_json::<T>(body)?;
    if !value.is_object() {
        return Err(Error::Schema {
            record: T::NAME,
            message: format!("expected a JSON object, got {}", kind_of(&value)),
            raw: body.to_string(),
        });
    }
    T::from_value(&value).map_err(|e| with_raw(e, body))
}

/// Parses `body` as a JSON array and validates every element as `T`.
///
/// Order is preserved. The first invalid element fails the whole list.
pub(crate) fn parse_records<T: Record>(body: &str) -> Result<Vec<T>> {
    let value = parse_json::<T>(body)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(Error::Schema {
                record: T::NAME,
                message: format!("expected a JSON array, got {}", kind_of(&other)),
                raw: body.to_string(),
            })
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::from_value(item).map_err(|e| match e {
                Error::Schema { record, message, .. } => Error::Schema {
                    record,
                    message: format!("element {index}: {message}"),
                    raw: body.to_string(),
                },
                other => other,
            })
        })
        .collect()
}

fn parse_json<T: Record>(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| Error::Schema {
        record: T::NAME,
        message: format!("invalid JSON: {e}"),
        raw: body.to_string(),
    })
}

fn with_raw(error: Error, body: &str) -> Error {
    match error {
        Error::Schema { record, message, .. } => Error::Schema {
            record,
            message,
            raw: body.to_string(),
        },
        other => other,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn league_with_nested_teams() {
        let body = json!({
            "league_id": 5002,
            "league_name": "Pigskin Prodigal Fantasy League",
            "scoring_type": "PPR",
            "league_size": 12,
            "last_changed_date": "2024-04-18",
            "teams": [
                {
                    "league_id": 5002,
                    "team_id": 1,
                    "team_name": "Kendall Space Pioneers",
                    "last_changed_date": "2024-04-18"
                }
            ]
        })
        .to_string();

        let league: League = parse_record(&body).unwrap();
        assert_eq!(league.league_id, 5002);
        assert_eq!(league.last_changed_date, date(2024, 4, 18));
        assert_eq!(league.teams.len(), 1);
        assert_eq!(league.teams[0].team_name, "Kendall Space Pioneers");
    }

    #[test]
    fn optional_collections_default_to_empty() {
        let body = json!({
            "player_id": 1001,
            "gsis_id": "00-0023459",
            "first_name": "Aaron",
            "last_name": "Rodgers",
            "position": "QB",
            "last_changed_date": "2024-04-01"
        })
        .to_string();

        let player: Player = parse_record(&body).unwrap();
        assert!(player.performances.is_empty());
        assert_eq!(player.full_name(), "Aaron Rodgers");
        assert_eq!(player.gsis_id.as_deref(), Some("00-0023459"));
    }

    #[test]
    fn null_gsis_id_is_accepted() {
        let value = json!({
            "player_id": 1002,
            "gsis_id": null,
            "first_name": "Sam",
            "last_name": "Doe",
            "position": "WR",
            "last_changed_date": "2024-04-01"
        });

        let player = PlayerBase::from_value(&value).unwrap();
        assert_eq!(player.gsis_id, None);
    }

    #[test]
    fn missing_gsis_id_key_is_schema_error() {
        let value = json!({
            "player_id": 1003,
            "first_name": "Sam",
            "last_name": "Doe",
            "position": "WR",
            "last_changed_date": "2024-04-01"
        });

        match Player::from_value(&value) {
            Err(Error::Schema { record, message, .. }) => {
                assert_eq!(record, "Player");
                assert!(message.contains("gsis_id"), "message: {message}");
            }
            other => panic!("Expected Schema error, got {:?}", other),
        }
        assert!(PlayerBase::from_value(&value).is_err());
    }

    #[test]
    fn missing_field_is_schema_error() {
        let body = json!({"league_id": 5002, "league_name": "No Scoring"}).to_string();

        match parse_record::<League>(&body) {
            Err(Error::Schema { record, message, raw }) => {
                assert_eq!(record, "League");
                assert!(message.contains("scoring_type"), "message: {message}");
                assert_eq!(raw, body);
            }
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn wrong_type_is_not_coerced() {
        let value = json!({
            "league_count": "5",
            "team_count": 20,
            "player_count": 1018
        });

        assert!(matches!(Counts::from_value(&value), Err(Error::Schema { .. })));
    }

    #[test]
    fn negative_count_is_rejected() {
        let value = json!({"league_count": -1, "team_count": 20, "player_count": 1018});
        assert!(Counts::from_value(&value).is_err());
    }

    #[test]
    fn counts_week_count_is_optional() {
        let value = json!({"league_count": 5, "team_count": 20, "player_count": 1018});
        let counts = Counts::from_value(&value).unwrap();
        assert_eq!(counts.week_count, None);

        let value = json!({
            "league_count": 5,
            "team_count": 20,
            "player_count": 1018,
            "week_count": 17
        });
        assert_eq!(Counts::from_value(&value).unwrap().week_count, Some(17));
    }

    #[test]
    fn bad_date_is_schema_error() {
        let value = json!({
            "week_number": "202301",
            "fantasy_points": 20.4,
            "last_changed_date": "18/04/2024"
        });

        assert!(matches!(
            TeamWeek::from_value(&value),
            Err(Error::Schema { record: "TeamWeek", .. })
        ));
    }

    #[test]
    fn list_preserves_order() {
        let body = json!([
            {
                "performance_id": 3,
                "player_id": 1001,
                "week_number": "202303",
                "fantasy_points": 12,
                "last_changed_date": "2024-03-01"
            },
            {
                "performance_id": 1,
                "player_id": 1001,
                "week_number": "202301",
                "fantasy_points": 20.5,
                "last_changed_date": "2024-03-01"
            }
        ])
        .to_string();

        let performances: Vec<Performance> = parse_records(&body).unwrap();
        let ids: Vec<i64> = performances.iter().map(|p| p.performance_id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(performances[0].fantasy_points, 12.0);
    }

    #[test]
    fn list_reports_failing_element() {
        let body = json!([
            {"league_id": 1, "team_id": 1, "team_name": "A", "last_changed_date": "2024-01-01"},
            {"league_id": 1, "team_name": "B", "last_changed_date": "2024-01-01"}
        ])
        .to_string();

        match parse_records::<Team>(&body) {
            Err(Error::Schema { message, .. }) => {
                assert!(message.starts_with("element 1:"), "message: {message}");
            }
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn list_requires_array_and_record_requires_object() {
        let err = parse_records::<League>("{\"detail\": \"nope\"}").unwrap_err();
        assert!(matches!(err, Error::Schema { ref message, .. } if message.contains("array")));

        let err = parse_record::<Counts>("[]").unwrap_err();
        assert!(matches!(err, Error::Schema { ref message, .. } if message.contains("object")));

        let err = parse_record::<Counts>("not json").unwrap_err();
        assert!(
            matches!(err, Error::Schema { ref message, .. } if message.starts_with("invalid JSON"))
        );
    }
}
