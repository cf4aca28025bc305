mod analytics;
mod config;
mod data;
mod monitoring;
mod tracking;

use std::time::Duration;

use anyhow::Result;
use chrono::Utc;

use analytics::scanner::{ClassifiedMarket, MarketScanner};
use analytics::types::EdgeState;
use config::{Config, EnvConfig};
use data::cache::SimulationCache;
use data::simulation_api::SimulationApiClient;
use monitoring::logger::CsvLogger;
use tracking::persistence::{closing_moneyline_odds, SignalDatabase};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("🎯 BeatVegas edge engine starting...");

    // Load configuration
    let config = Config::load("config.toml")?;
    let env_config = EnvConfig::load()?;

    // Either switch can force dry run
    let dry_run = config.system.dry_run || env_config.dry_run;
    tracing::info!("Dry run mode: {}", dry_run);
    tracing::info!("Backend: {}", env_config.api_base_url);
    tracing::info!("Polling interval: {}s", config.scanner.polling_interval_secs);

    // Initialize signal history
    tracing::info!("Opening signal database: {}", config.system.database_path);
    let db = SignalDatabase::new(&config.system.database_path)?;
    tracing::info!("Signals recorded today: {}", db.count_signals_today()?);
    tracing::info!("Average CLV to date: {:+.2} pts", db.average_clv()?);

    let csv_logger = if config.monitoring.csv_logging {
        let logger = CsvLogger::new(config.monitoring.csv_log_path.clone())?;
        logger.log_event("engine_started")?;
        Some(logger)
    } else {
        None
    };

    let client = SimulationApiClient::new(env_config.api_base_url, env_config.api_token);
    let cache = SimulationCache::new(Duration::from_secs(config.scanner.cache_ttl_secs));
    let scanner = MarketScanner::new(config.edge.clone(), config.parlay.clone());

    tracing::info!("✅ Engine initialized, scanning for edges...");

    let mut interval =
        tokio::time::interval(Duration::from_secs(config.scanner.polling_interval_secs));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = run_scan_cycle(
                    &scanner,
                    &client,
                    &cache,
                    &db,
                    csv_logger.as_ref(),
                    dry_run,
                )
                .await
                {
                    tracing::error!("Scan cycle failed: {:#}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down...");
                break;
            }
        }
    }

    if let Some(logger) = &csv_logger {
        logger.log_event("engine_stopped")?;
    }

    Ok(())
}

/// A recorded signal settles once its game goes off the board: the last
/// odds scanned at or after start time stand as the closing line.
fn settle_closing_lines(
    db: &SignalDatabase,
    games: &[data::types::GameSummary],
    all_markets: &[ClassifiedMarket],
) -> Result<()> {
    let now = Utc::now();
    let mut settled = 0;

    for signal in db.get_unsettled_signals()? {
        let Some(game) = games.iter().find(|g| g.game_id == signal.game_id) else {
            continue;
        };
        if game.start_time > now {
            continue; // market still open
        }

        let Some(market) = all_markets
            .iter()
            .find(|m| m.game_id == signal.game_id && m.kind.to_string() == signal.market)
        else {
            continue;
        };

        // Spread/total settle on the closing line; moneyline settles on the
        // closing price of the side that was recorded, which may no longer
        // be the side the model favors
        let closing_odds = if signal.recorded_line.is_some() {
            market.american_odds
        } else {
            closing_moneyline_odds(&signal, game)
        };

        db.record_closing_line(signal.id, closing_odds, market.market_line)?;
        settled += 1;
    }

    if settled > 0 {
        tracing::info!(
            "Settled {} signals, average CLV now {:+.2} pts",
            settled,
            db.average_clv()?
        );
    }

    Ok(())
}

async fn run_scan_cycle(
    scanner: &MarketScanner,
    client: &SimulationApiClient,
    cache: &SimulationCache,
    db: &SignalDatabase,
    csv_logger: Option<&CsvLogger>,
    dry_run: bool,
) -> Result<()> {
    let games = client.fetch_upcoming_games().await?;
    tracing::info!("Scanning {} upcoming games", games.len());

    let mut all_markets = Vec::new();

    for game in &games {
        let sim = match cache.get(&game.game_id) {
            Some(sim) => sim,
            None => match client.fetch_simulation(&game.game_id).await {
                Ok(sim) => {
                    cache.insert(game.game_id.clone(), sim.clone());
                    sim
                }
                Err(e) => {
                    tracing::warn!("Skipping game {}: {:#}", game.game_id, e);
                    continue;
                }
            },
        };

        all_markets.extend(scanner.scan_game(game, &sim));
    }

    for market in &all_markets {
        if market.classification.state == EdgeState::Neutral {
            continue;
        }

        if let Some(logger) = csv_logger {
            logger.log_signal(market)?;
        }

        // Only EDGE-tier signals enter CLV tracking
        if market.classification.state == EdgeState::Edge && !dry_run {
            db.insert_signal(market)?;
        }
    }

    settle_closing_lines(db, &games, &all_markets)?;

    if let Some(parlay) = scanner.build_candidate_parlay(&all_markets) {
        tracing::info!(
            "Candidate parlay ({} legs): hit prob {:.3}, decimal odds {:.2}, EV {:+.1}%, payout ${:.2}, volatility {}, correlation {}",
            parlay.legs.len(),
            parlay.calculation.combined_probability,
            parlay.calculation.decimal_odds,
            parlay.calculation.ev_percent,
            parlay.calculation.potential_payout,
            parlay.calculation.volatility,
            parlay.correlation,
        );
        for leg in &parlay.legs {
            tracing::info!(
                "  leg: {} (p={:.3}, odds {:+})",
                leg.label,
                leg.true_probability,
                leg.american_odds
            );
        }
        if let Some(warning) = parlay.correlation.warning() {
            tracing::warn!("{}", warning);
        }
    }

    Ok(())
}
