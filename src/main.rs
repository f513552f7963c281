//! Main entry point for the gridiron-ratings CLI
//!
//! Batch front end over the rating engine: loads teams, games, and
//! optionally AP poll data from JSON files into the in-memory store,
//! then runs a season replay, ranking snapshot, prediction pass, or
//! accuracy report.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gridiron_ratings::config::AppConfig;
use gridiron_ratings::engine::RatingEngine;
use gridiron_ratings::prediction::engine::PredictionScope;
use gridiron_ratings::storage::{EngineStore, GameStore, MemoryStore, PollStore, TeamStore};
use gridiron_ratings::types::{ApPollEntry, Game, PredictionView, Season, Team, Week};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Gridiron Ratings - College Football ELO Rating Engine
#[derive(Parser)]
#[command(
    name = "gridiron-ratings",
    version,
    about = "ELO-style rating engine for college football",
    long_about = "Maintains ELO ratings across a college football season: preseason \
                 initialization from recruiting, transfer, and returning-production data, \
                 per-game updates with margin-of-victory and conference-tier adjustments, \
                 weekly ranking snapshots, and pregame predictions with accuracy tracking."
)]
struct Args {
    /// Teams JSON file
    #[arg(long, value_name = "FILE", help = "Path to teams JSON file")]
    teams: PathBuf,

    /// Games JSON file
    #[arg(long, value_name = "FILE", help = "Path to games JSON file")]
    games: PathBuf,

    /// AP poll JSON file
    #[arg(
        long,
        value_name = "FILE",
        help = "Optional AP poll JSON file for the accuracy baseline"
    )]
    poll: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reset a season and reprocess every completed game chronologically
    Replay {
        season: Season,
    },
    /// Process completed games, then snapshot and print the weekly rankings
    Rankings {
        season: Season,
        week: Week,
    },
    /// Process completed games, then predict the remaining ones
    Predict {
        season: Season,
        /// Predict a specific week instead of the next open one
        #[arg(long, conflicts_with = "team")]
        week: Option<Week>,
        /// Predict a single team's open games
        #[arg(long)]
        team: Option<String>,
    },
    /// Simulate the season week by week and report prediction accuracy
    Accuracy {
        season: Season,
        /// Restrict the report to one team's games
        #[arg(long)]
        team: Option<String>,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

fn load_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn load_store(args: &Args) -> Result<Arc<MemoryStore>> {
    let store = Arc::new(MemoryStore::new());

    let teams: Vec<Team> = load_json(&args.teams)?;
    let team_count = teams.len();
    for team in teams {
        store.upsert_team(team)?;
    }

    let games: Vec<Game> = load_json(&args.games)?;
    let game_count = games.len();
    for game in games {
        store.upsert_game(game)?;
    }

    if let Some(poll_path) = &args.poll {
        let entries: Vec<ApPollEntry> = load_json(poll_path)?;
        for entry in entries {
            store.upsert_ap_rank(entry)?;
        }
    }

    info!(teams = team_count, games = game_count, "data loaded");
    Ok(store)
}

fn initialize_teams(engine: &RatingEngine, store: &MemoryStore) -> Result<()> {
    for team in store.all_teams()? {
        engine.initialize_preseason_rating(&team.id)?;
    }
    Ok(())
}

/// Process every completed, non-excluded game in chronological order.
///
/// Games with equal scores are treated as unplayed fixtures and left
/// untouched; overtime rules out real ties.
fn process_completed(engine: &RatingEngine, season: Season) -> Result<usize> {
    let mut processed = 0;
    for game in engine.store().games_for_season(season)? {
        if game.excluded_from_rankings || game.home_score == game.away_score {
            continue;
        }
        engine.process_game(&game.id)?;
        processed += 1;
    }
    Ok(processed)
}

/// Run the season as it would have played out live: predict each week's
/// games, process them, then settle the predictions.
fn simulate_season(engine: &RatingEngine, season: Season) -> Result<()> {
    let mut weeks: Vec<Week> = engine
        .store()
        .games_for_season(season)?
        .iter()
        .map(|g| g.week)
        .collect();
    weeks.sort_unstable();
    weeks.dedup();

    for week in weeks {
        engine.generate_predictions(season, &PredictionScope::Week(week))?;
        for game in engine.store().games_for_season(season)? {
            if game.week != week
                || game.excluded_from_rankings
                || game.home_score == game.away_score
            {
                continue;
            }
            engine.process_game(&game.id)?;
            engine.evaluate_prediction(&game.id)?;
        }
    }
    Ok(())
}

fn print_top_teams(store: &dyn EngineStore, n: usize) -> Result<()> {
    let mut teams = store.all_teams()?;
    teams.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal));

    println!("\nTop {} Teams by Rating:", n.min(teams.len()));
    println!(
        "{:>4} {:>7} {:<25} {:>4} {:>3} {:>3}",
        "Rank", "Rating", "Team", "Conf", "W", "L"
    );
    println!("{}", "-".repeat(52));
    for (i, team) in teams.iter().take(n).enumerate() {
        println!(
            "{:>4} {:>7.1} {:<25} {:>4} {:>3} {:>3}",
            i + 1,
            team.rating,
            team.name,
            team.tier.to_string(),
            team.wins,
            team.losses
        );
    }
    Ok(())
}

fn print_rankings(store: &dyn EngineStore, season: Season, week: Week) -> Result<()> {
    let snapshots = store.snapshots_for_week(season, week)?;

    println!("\nWeek {} Rankings ({}):", week, season);
    println!(
        "{:>4} {:>7} {:<25} {:>3} {:>3} {:>7} {:>4}",
        "Rank", "Rating", "Team", "W", "L", "SOS", "SOS#"
    );
    println!("{}", "-".repeat(60));
    for row in snapshots {
        println!(
            "{:>4} {:>7.1} {:<25} {:>3} {:>3} {:>7.1} {:>4}",
            row.rank, row.rating, row.team_id, row.wins, row.losses, row.sos, row.sos_rank
        );
    }
    Ok(())
}

fn print_predictions(views: &[PredictionView]) {
    println!("\nPredictions:");
    println!(
        "{:>4} {:<25} {:<25} {:>7} {:>6} {:>10}",
        "Week", "Home", "Away", "Score", "Home%", "Confidence"
    );
    println!("{}", "-".repeat(82));
    for view in views {
        println!(
            "{:>4} {:<25} {:<25} {:>3}-{:>3} {:>5}% {:>10}",
            view.week,
            view.home_team,
            view.away_team,
            view.prediction.predicted_home_score,
            view.prediction.predicted_away_score,
            view.prediction.home_win_probability,
            format!("{:?}", view.prediction.confidence)
        );
    }
}


fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(level) = &args.log_level {
        config.service.log_level = level.clone();
    }
    init_logging(&config.service.log_level)?;

    info!(version = gridiron_ratings::VERSION, "gridiron-ratings starting");

    let store = load_store(&args)?;
    let engine = RatingEngine::new(store.clone(), config.rating)?;
    initialize_teams(&engine, &store)?;

    match args.command {
        Command::Replay { season } => {
            let summary = engine.replay_season(season)?;
            println!(
                "Replayed season {}: {} reset, {} processed, {} skipped",
                season, summary.games_reset, summary.games_processed, summary.games_skipped
            );
            print_top_teams(store.as_ref(), 25)?;
        }
        Command::Rankings { season, week } => {
            process_completed(&engine, season)?;
            let rows = engine.save_weekly_rankings(season, week)?;
            info!(rows, "rankings saved");
            print_rankings(store.as_ref(), season, week)?;
        }
        Command::Predict { season, week, team } => {
            process_completed(&engine, season)?;
            let scope = match (week, team) {
                (Some(w), _) => PredictionScope::Week(w),
                (None, Some(t)) => PredictionScope::Team(t),
                (None, None) => PredictionScope::NextWeek,
            };
            let views = engine.generate_predictions(season, &scope)?;
            if views.is_empty() {
                println!("No open games to predict.");
            } else {
                print_predictions(&views);
            }
        }
        Command::Accuracy { season, team } => {
            simulate_season(&engine, season)?;
            let report = match team {
                Some(t) => engine.team_accuracy(&t, Some(season))?,
                None => engine.overall_accuracy(Some(season))?,
            };

            println!("\nPrediction Accuracy ({}):", season);
            println!("  Evaluated:      {}", report.evaluated);
            println!("  Correct:        {}", report.correct);
            println!("  Accuracy:       {:.1}%", report.accuracy_pct);
            println!("  Favorite wins:  {}", report.favorite_wins);
            println!("  Underdog wins:  {}", report.underdog_wins);
            if let Some(ap) = report.ap_baseline {
                println!("  AP comparison ({} comparable games):", ap.comparable);
                println!("    Model: {:.1}%", ap.model_accuracy_pct);
                println!("    AP:    {:.1}%", ap.ap_accuracy_pct);
            }
        }
    }

    Ok(())
}
