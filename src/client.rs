//! SWC API client with retry logic and typed responses.
//!
//! [`SwcClient`] owns the configuration, the HTTP transport and the retry
//! policy. Every endpoint method goes through [`SwcClient::call_api`].

use crate::{
    bulk::{self, BulkFile},
    config::SwcConfig,
    endpoint::{Endpoint, RequestMetadata},
    query::{LeagueQuery, PerformanceQuery, TeamQuery},
    retry::RetryPolicy,
    schemas::{Counts, League, Performance, Player, Team},
    ApiResponse, Error, Result,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use url::Url;

/// Client for the SportsWorldCentral fantasy football API.
///
/// Cloning is cheap; clones share the same immutable configuration.
///
/// # Examples
///
/// ```no_run
/// use swc_sdk::{LeagueQuery, SwcClient, SwcConfig};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), swc_sdk::Error> {
/// let config = SwcConfig::builder()
///     .base_url("http://localhost:8000")?
///     .backoff(true)
///     .backoff_max_time(Duration::from_secs(10))
///     .build()?;
/// let client = SwcClient::new(config)?;
///
/// let health = client.get_health_check().await?;
/// println!("API says: {}", health.body);
///
/// for league in client.list_leagues(&LeagueQuery::default()).await? {
///     println!("{} ({})", league.league_name, league.scoring_type);
/// }
///
/// let counts = client.get_counts().await?;
/// println!("{} players in {} leagues", counts.player_count, counts.league_count);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SwcClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http_client: reqwest::Client,
    pub(crate) config: SwcConfig,
    pub(crate) retry_policy: RetryPolicy,
    pub(crate) bulk_file_names: HashMap<BulkFile, String>,
    pub(crate) span: tracing::Span,
}

impl SwcClient {
    /// Creates a client with the retry policy implied by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be initialised.
    pub fn new(config: SwcConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Creates a builder for customising the client beyond its configuration.
    pub fn builder(config: SwcConfig) -> SwcClientBuilder {
        SwcClientBuilder::new(config)
    }

    /// Creates a client from `SWC_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(SwcConfig::from_env()?)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &SwcConfig {
        &self.inner.config
    }

    /// The retry policy applied to every API call.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.inner.retry_policy
    }

    /// Sends one GET to `request.endpoint`, retrying according to the client's policy.
    ///
    /// Query parameters without a value are dropped before sending. A non-2xx
    /// status becomes [`Error::Status`], a transport failure
    /// [`Error::Request`]. When retries are exhausted the last error is
    /// returned as is.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use swc_sdk::{Endpoint, RequestMetadata, SwcClient, SwcConfig};
    ///
    /// # async fn example() -> Result<(), swc_sdk::Error> {
    /// # let config = SwcConfig::builder().base_url("http://localhost:8000")?.build()?;
    /// # let client = SwcClient::new(config)?;
    /// let request = RequestMetadata::new(Endpoint::Teams)
    ///     .with_query_param("limit", 5)
    ///     .with_optional_query_param("league_id", Some(5002));
    ///
    /// let response = client.call_api(&request).await?;
    /// println!("{}", response.body);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call_api(&self, request: &RequestMetadata) -> Result<ApiResponse> {
        self.call_with_retry(request)
            .instrument(self.inner.span.clone())
            .await
    }

    async fn call_with_retry(&self, request: &RequestMetadata) -> Result<ApiResponse> {
        let url = self.endpoint_url(request);
        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match self.execute_request(&url, attempt).await {
                Ok(mut response) => {
                    response.latency = start_time.elapsed();
                    response.attempts = attempt;
                    tracing::info!(
                        status = response.status.as_u16(),
                        latency_ms = response.latency.as_millis(),
                        attempts = attempt,
                        "Received HTTP response"
                    );
                    return Ok(response);
                }
                Err(e) => e,
            };

            tracing::warn!(
                error = %error,
                attempt = attempt,
                endpoint = %request.endpoint,
                "Request failed"
            );

            match self
                .inner
                .retry_policy
                .next_delay(&error, attempt, start_time.elapsed())
            {
                Some(delay) => {
                    tracing::info!(
                        delay_ms = delay.as_millis(),
                        attempt = attempt,
                        "Retrying request after delay"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    if attempt > 1 {
                        tracing::error!(
                            attempts = attempt,
                            elapsed_ms = start_time.elapsed().as_millis(),
                            endpoint = %request.endpoint,
                            "Giving up after retries"
                        );
                    }
                    return Err(error);
                }
            }
        }
    }

    /// Executes a single attempt.
    async fn execute_request(&self, url: &Url, attempt: usize) -> Result<ApiResponse> {
        tracing::debug!(url = %url, attempt = attempt, "Executing HTTP request");

        let mut request = self.inner.http_client.get(url.clone());
        if let Some(timeout) = self.inner.config.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status.is_client_error() {
                tracing::error!(status = status.as_u16(), response = %body, "Client error (4xx)");
            } else {
                tracing::warn!(status = status.as_u16(), response = %body, "HTTP status error");
            }

            return Err(Error::Status {
                status,
                body,
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        tracing::trace!(body = %body, "Response body");

        Ok(ApiResponse {
            status,
            headers,
            body,
            url: url.to_string(),
            latency: Default::default(),
            attempts: attempt,
        })
    }

    /// Base URL + endpoint path + sanitized query string.
    fn endpoint_url(&self, request: &RequestMetadata) -> Url {
        let mut url = self.inner.config.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}{}", request.endpoint.path()));
        url.set_query(None);

        let query = request.sanitized_query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        tracing::debug!(
            base_url = %self.inner.config.base_url,
            endpoint = %request.endpoint,
            params = ?request.query_params,
            "Built request URL"
        );
        url
    }

    /// Checks whether the API is up.
    ///
    /// The raw response is returned for the caller to inspect; a healthy API
    /// answers `{"message": "API health check successful"}`.
    pub async fn get_health_check(&self) -> Result<ApiResponse> {
        tracing::debug!("Entered health check");
        self.call_api(&RequestMetadata::new(Endpoint::HealthCheck)).await
    }

    /// Lists leagues matching `query`, in server order.
    pub async fn list_leagues(&self, query: &LeagueQuery) -> Result<Vec<League>> {
        tracing::debug!(query = ?query, "Entered list leagues");
        self.call_api(&query.to_request()).await?.records()
    }

    /// Fetches one league.
    pub async fn get_league_by_id(&self, league_id: i64) -> Result<League> {
        tracing::debug!(league_id, "Entered get league by ID");
        let league: League = self
            .call_api(&RequestMetadata::new(Endpoint::League(league_id)))
            .await?
            .record()?;
        tracing::debug!(league = ?league, "League response");
        Ok(league)
    }

    /// Fetches the current league, team and player totals.
    pub async fn get_counts(&self) -> Result<Counts> {
        tracing::debug!("Entered get counts");
        self.call_api(&RequestMetadata::new(Endpoint::Counts))
            .await?
            .record()
    }

    /// Lists teams matching `query`, in server order.
    pub async fn list_teams(&self, query: &TeamQuery) -> Result<Vec<Team>> {
        tracing::debug!(query = ?query, "Entered list teams");
        self.call_api(&query.to_request()).await?.records()
    }

    /// Fetches one player with their performances.
    pub async fn get_player_by_id(&self, player_id: i64) -> Result<Player> {
        tracing::debug!(player_id, "Entered get player by ID");
        let player: Player = self
            .call_api(&RequestMetadata::new(Endpoint::Player(player_id)))
            .await?
            .record()?;
        tracing::debug!(player_id = player.player_id, "Player response");
        Ok(player)
    }

    /// Lists weekly performances matching `query`, in server order.
    pub async fn list_performances(&self, query: &PerformanceQuery) -> Result<Vec<Performance>> {
        tracing::debug!(query = ?query, "Entered list performances");
        self.call_api(&query.to_request()).await?.records()
    }
}

/// Builder for [`SwcClient`].
///
/// # Examples
///
/// ```no_run
/// use swc_sdk::{RetryPolicy, RetryStrategy, SwcClient, SwcConfig};
/// use swc_sdk::retry::RetryOnServerError;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), swc_sdk::Error> {
/// let config = SwcConfig::builder().base_url("http://localhost:8000")?.build()?;
///
/// let client = SwcClient::builder(config)
///     .retry_policy(
///         RetryPolicy::new(RetryStrategy::ExponentialBackoff {
///             initial_delay: Duration::from_millis(200),
///             max_delay: Duration::from_secs(5),
///             max_elapsed: Duration::from_secs(20),
///             jitter: true,
///         })
///         .with_predicate(RetryOnServerError),
///     )
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SwcClientBuilder {
    config: SwcConfig,
    retry_policy: Option<RetryPolicy>,
    span: Option<tracing::Span>,
}

impl SwcClientBuilder {
    /// Creates a builder; the retry policy defaults to the one implied by `config`.
    pub fn new(config: SwcConfig) -> Self {
        Self {
            config,
            retry_policy: None,
            span: None,
        }
    }

    /// Overrides the retry policy derived from the configuration.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Sets the span every call of this client is logged under.
    ///
    /// Defaults to an `info`-level `swc_client` span carrying the base URL.
    pub fn span(mut self, span: tracing::Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Builds the configured `SwcClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be initialised.
    pub fn build(self) -> Result<SwcClient> {
        // No idle connections are kept: each call opens its own.
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {e}")))?;

        let retry_policy = self
            .retry_policy
            .unwrap_or_else(|| RetryPolicy::from_config(&self.config));

        let span = self.span.unwrap_or_else(|| {
            tracing::info_span!("swc_client", base_url = %self.config.base_url)
        });

        let bulk_file_names = bulk::bulk_file_names(self.config.bulk_file_format);

        span.in_scope(|| {
            tracing::debug!(
                config = ?self.config,
                retry_policy = ?retry_policy,
                bulk_file_names = ?bulk_file_names,
                "Created SWC client"
            );
        });

        Ok(SwcClient {
            inner: Arc::new(ClientInner {
                http_client,
                config: self.config,
                retry_policy,
                bulk_file_names,
                span,
            }),
        })
    }
}
