//! # swc-sdk - client for the SportsWorldCentral fantasy football API
//!
//! Typed access to the SWC API: leagues, teams, players, weekly
//! performances and aggregate counts, plus downloads of the published bulk
//! data files (CSV or Parquet).
//!
//! Every API call goes through a single call layer that drops unset query
//! parameters, optionally retries with jittered exponential backoff inside a
//! time budget, and hands back the raw response for validation into typed
//! records.
//!
//! ## Quick Start
//!
//! ```no_run
//! use swc_sdk::{LeagueQuery, SwcClient, SwcConfig, TeamQuery};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), swc_sdk::Error> {
//!     let config = SwcConfig::builder()
//!         .base_url("http://localhost:8000")?
//!         .backoff(true)
//!         .backoff_max_time(Duration::from_secs(30))
//!         .build()?;
//!     let client = SwcClient::new(config)?;
//!
//!     let leagues = client.list_leagues(&LeagueQuery::default()).await?;
//!     for league in &leagues {
//!         let teams = client
//!             .list_teams(&TeamQuery::default().league_id(league.league_id))
//!             .await?;
//!         println!("{}: {} teams", league.league_name, teams.len());
//!     }
//!
//!     let counts = client.get_counts().await?;
//!     println!("{} players", counts.player_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration from the environment
//!
//! [`SwcConfig::from_env`] reads `SWC_API_BASE_URL` (required),
//! `SWC_BACKOFF`, `SWC_BACKOFF_MAX_TIME`, `SWC_BULK_FILE_FORMAT`,
//! `SWC_BULK_FILE_BASE_URL` and `SWC_TIMEOUT`.
//!
//! ## Error Handling
//!
//! ```no_run
//! use swc_sdk::{Error, SwcClient};
//!
//! # async fn example(client: SwcClient) {
//! match client.get_player_by_id(1001).await {
//!     Ok(player) => println!("{} plays {}", player.full_name(), player.position),
//!     Err(Error::Request(e)) => eprintln!("could not reach the API: {e}"),
//!     Err(Error::Status { status, body, .. }) => eprintln!("HTTP {status}: {body}"),
//!     Err(Error::Schema { record, message, raw }) => {
//!         eprintln!("unexpected {record} payload: {message}\n{raw}")
//!     }
//!     Err(e) => eprintln!("{e}"),
//! }
//! # }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events under a per-client `swc_client` span.
//! Install any subscriber to see them, e.g.
//! `tracing_subscriber::fmt().with_env_filter("swc_sdk=debug").init()`.

pub mod bulk;
mod client;
pub mod config;
pub mod endpoint;
mod error;
pub mod query;
mod response;
pub mod retry;
pub mod schemas;

pub use bulk::{BulkFile, BulkFileFormat};
pub use client::{SwcClient, SwcClientBuilder};
pub use config::{SwcConfig, SwcConfigBuilder};
pub use endpoint::{Endpoint, RequestMetadata};
pub use error::{Error, Result};
pub use query::{LeagueQuery, PerformanceQuery, TeamQuery};
pub use response::ApiResponse;
pub use retry::{RetryPolicy, RetryPredicate, RetryStrategy};
pub use schemas::{
    Counts, League, Performance, Player, PlayerBase, Record, Team, TeamBase, TeamWeek,
};
