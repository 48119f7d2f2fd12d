use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;

use crate::services::{
    load_profile, Aggregator, ApiClient, DriverDataService, DriverSession, DEFAULT_API_URL,
};
use crate::tui;

/// Formula 1 driver statistics in your terminal
#[derive(Parser)]
#[command(name = "paddock")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Driver to open in the TUI
    driver_id: Option<u32>,

    /// Backend base URL (overrides PADDOCK_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a driver's aggregated profile
    Profile {
        driver_id: u32,

        /// Restrict races and results to one season (by year)
        #[arg(long)]
        season: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print pit stops and lap times for one of the driver's races
    Race {
        driver_id: u32,
        race_id: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List known seasons
    Seasons {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let api_url = resolve_api_url(self.api_url.clone());

        match self.command {
            None => {
                let driver_id = self
                    .driver_id
                    .context("driver id required (usage: paddock <DRIVER_ID>)")?;
                tui::run(api_url, driver_id)
            }
            Some(Commands::Profile {
                driver_id,
                season,
                json,
            }) => print_profile(&api_url, driver_id, season, json),
            Some(Commands::Race {
                driver_id,
                race_id,
                json,
            }) => print_race(&api_url, driver_id, race_id, json),
            Some(Commands::Seasons { json }) => print_seasons(&api_url, json),
        }
    }
}

/// Flag wins over the PADDOCK_API_URL environment variable, which wins over
/// the built-in default
fn resolve_api_url(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("PADDOCK_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

fn print_profile(
    api_url: &str,
    driver_id: u32,
    season: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let client = ApiClient::new(api_url)?;
    let profile = runtime()?.block_on(load_profile(&client, driver_id))?;

    let mut session = DriverSession::new(driver_id, profile);
    if let Some(year) = season {
        let season_id = session
            .profile()
            .seasons
            .iter()
            .find(|s| s.year == year)
            .map(|s| s.season_id)
            .with_context(|| format!("driver has no races in season {}", year))?;
        session.set_season_filter(Some(season_id));
    }

    if json {
        let profile = session.profile();
        let value = json!({
            "driver": profile.driver,
            "totalPoints": session.total_points(),
            "races": session.races(),
            "results": session.results(),
            "qualifying": session.qualifying(),
            "standings": session.standings(),
            "sprintResults": session.sprint_results(),
            "seasons": profile.seasons,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let profile = session.profile();
    let driver = session.driver();

    let mut id_parts = Vec::new();
    if let Some(code) = &driver.code {
        id_parts.push(code.clone());
    }
    if let Some(number) = driver.number {
        id_parts.push(format!("#{}", number));
    }
    if let Some(nationality) = &driver.nationality {
        id_parts.push(nationality.clone());
    }
    if id_parts.is_empty() {
        println!("{}", driver.full_name());
    } else {
        println!("{} ({})", driver.full_name(), id_parts.join(", "));
    }
    if let Some(dob) = driver.dob {
        println!("Born {}", dob);
    }
    println!();
    println!(
        "Career points: {:.1}   Races: {}   Seasons: {}",
        session.total_points(),
        profile.races.len(),
        profile.season_ids.len()
    );

    let by_season = Aggregator::points_by_season(&profile.results, &profile.season_ids);
    if !by_season.is_empty() {
        println!();
        println!("Points by season");
        for (season_id, points) in by_season {
            let year = profile
                .season_year(season_id)
                .map(|y| y.to_string())
                .unwrap_or_else(|| season_id.to_string());
            println!("  {}  {:>7.1}", year, points);
        }
    }

    let results = session.results();
    println!();
    println!("Results ({})", results.len());
    for result in results {
        let race = profile.race_name(result.race_id).unwrap_or("—");
        let year = profile
            .season_year(result.season_id)
            .map(|y| y.to_string())
            .unwrap_or_else(|| "—".to_string());
        let position = result
            .position
            .map(|p| format!("P{}", p))
            .unwrap_or_else(|| "—".to_string());
        println!("  {:<35} {}  {:<4} {:>6.1}", race, year, position, result.points);
    }

    Ok(())
}

fn print_race(api_url: &str, driver_id: u32, race_id: u32, json: bool) -> anyhow::Result<()> {
    let client = ApiClient::new(api_url)?;
    let detail = runtime()?.block_on(client.race_detail(driver_id, race_id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    if let Some(error) = &detail.error {
        println!("Backend reported: {}", error);
        return Ok(());
    }

    if let Some(result) = &detail.result {
        let position = result
            .position
            .map(|p| format!("P{}", p))
            .unwrap_or_else(|| "—".to_string());
        println!("Result: {}  {:.1} points", position, result.points);
    }

    println!();
    println!("Pit stops");
    match detail.pit_stops.as_deref() {
        Some(stops) if !stops.is_empty() => {
            for stop in stops {
                let duration = stop
                    .duration
                    .as_deref()
                    .or(stop.time.as_deref())
                    .unwrap_or("—");
                println!("  lap {:>2}  {}", stop.lap, duration);
            }
        }
        _ => println!("  No pit stop data available."),
    }

    println!();
    println!("Lap times");
    match detail.lap_times.as_deref() {
        Some(laps) if !laps.is_empty() => {
            for lap in laps {
                println!("  lap {:>2}  {}", lap.lap, lap.time.as_deref().unwrap_or("—"));
            }
        }
        _ => println!("  No lap time data available."),
    }

    Ok(())
}

fn print_seasons(api_url: &str, json: bool) -> anyhow::Result<()> {
    let client = ApiClient::new(api_url)?;
    let seasons = runtime()?.block_on(client.seasons())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&seasons)?);
        return Ok(());
    }

    for season in seasons {
        println!("{}  (id {})", season.year, season.season_id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["paddock"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.driver_id.is_none());
    }

    #[test]
    fn test_cli_parse_driver_id() {
        let cli = Cli::try_parse_from(["paddock", "44"]).unwrap();
        assert_eq!(cli.driver_id, Some(44));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_api_url_flag() {
        let cli = Cli::try_parse_from(["paddock", "44", "--api-url", "http://host:9000"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://host:9000"));
    }

    #[test]
    fn test_cli_parse_profile() {
        let cli = Cli::try_parse_from(["paddock", "profile", "44", "--season", "2020"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Profile {
                driver_id: 44,
                season: Some(2020),
                json: false
            })
        ));
    }

    #[test]
    fn test_cli_parse_race_json() {
        let cli = Cli::try_parse_from(["paddock", "race", "44", "100", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Race {
                driver_id: 44,
                race_id: 100,
                json: true
            })
        ));
    }

    #[test]
    fn test_cli_parse_seasons() {
        let cli = Cli::try_parse_from(["paddock", "seasons"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Seasons { json: false })));
    }

    #[test]
    fn test_resolve_api_url_flag_wins() {
        assert_eq!(
            resolve_api_url(Some("http://host:9000".to_string())),
            "http://host:9000"
        );
    }

    #[test]
    fn test_cli_rejects_non_numeric_driver_id() {
        assert!(Cli::try_parse_from(["paddock", "hamilton"]).is_err());
    }
}
