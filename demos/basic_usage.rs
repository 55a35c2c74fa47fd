//! Walks through the main API calls against a running SWC API.
//!
//! This example shows how to:
//! - Load the client configuration from `SWC_*` environment variables
//! - Check API health and read aggregate counts
//! - List leagues and the teams in each of them
//! - Download a bulk file
//!
//! Run with: `SWC_API_BASE_URL=http://localhost:8000 cargo run --example basic_usage`

use swc_sdk::{BulkFile, Error, LeagueQuery, PerformanceQuery, SwcClient, TeamQuery};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("swc_sdk=debug,basic_usage=info")
        .init();

    let client = SwcClient::from_env()?;

    println!("=== Health Check ===");
    let health = client.get_health_check().await?;
    println!("Status: {}", health.status);
    println!("Body: {}", health.body);
    println!("Latency: {:?}", health.latency);
    println!();

    println!("=== Counts ===");
    let counts = client.get_counts().await?;
    println!("Leagues: {}", counts.league_count);
    println!("Teams: {}", counts.team_count);
    println!("Players: {}", counts.player_count);
    println!();

    println!("=== Leagues and Teams ===");
    for league in client.list_leagues(&LeagueQuery::default()).await? {
        let teams = client
            .list_teams(&TeamQuery::default().league_id(league.league_id))
            .await?;
        println!(
            "{} [{}] ({} scoring): {} teams",
            league.league_name,
            league.league_id,
            league.scoring_type,
            teams.len()
        );
    }
    println!();

    println!("=== Player ===");
    match client.get_player_by_id(1001).await {
        Ok(player) => println!(
            "{} ({}) with {} performances",
            player.full_name(),
            player.position,
            player.performances.len()
        ),
        Err(Error::Status { status, .. }) => println!("Player 1001 not available: {status}"),
        Err(e) => return Err(e),
    }
    println!();

    println!("=== Performances ===");
    let performances = client
        .list_performances(&PerformanceQuery::default().limit(10))
        .await?;
    for performance in &performances {
        println!(
            "player {} week {}: {:.1} pts",
            performance.player_id, performance.week_number, performance.fantasy_points
        );
    }
    println!();

    println!("=== Bulk File ===");
    println!("Downloading {}", client.bulk_file_url(BulkFile::Players)?);
    match client.get_bulk_player_file().await {
        Ok(bytes) => println!("Downloaded {} bytes", bytes.len()),
        Err(e) => println!("Bulk download failed: {e}"),
    }

    Ok(())
}
