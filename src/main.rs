use anyhow::Result;
use audit_the_odds::{
    analyzer::{AnalysisFilters, GameAnalyzer, SortOrder},
    ev::format_ev,
    kelly::build_kelly_bets,
    odds::decimal_to_american,
    odds_client::OddsApiClient,
    probability::MomentumMode,
    round_robin::{build_round_robin_table, effective_average_odds, RoundRobinError},
    slip::BetSlip,
};
use chrono::{Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{error, info, warn, Level};

fn env_f64(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting Audit the Odds analyzer");

    // Load environment variables
    dotenv::dotenv().ok();

    let api_key = match std::env::var("ODDS_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            error!("❌ ODDS_API_KEY not set - The Odds API calls will fail!");
            return Err(anyhow::anyhow!("Missing ODDS_API_KEY"));
        }
    };

    let bankroll = env_f64("BANKROLL", 1000.0);
    let wager_per_bet = env_f64("WAGER_PER_BET", 10.0);
    let momentum_lag_hours = env_f64("MOMENTUM_LAG_HOURS", 6.0) as i64;
    let scan_interval_secs = env_f64("SCAN_INTERVAL_SECS", 300.0) as u64;
    let min_american_odds = std::env::var("MIN_AMERICAN_ODDS")
        .ok()
        .and_then(|v| v.parse::<f64>().ok());

    let client = OddsApiClient::new(api_key);

    let filters = AnalysisFilters {
        positive_ev_only: true,
        min_american_odds,
        home_teams_only: false,
        sort: SortOrder::HighestEv,
    };
    let analyzer = GameAnalyzer::new(filters, MomentumMode::Extrapolate);

    info!(
        "Bankroll: ${:.2}, wager/bet: ${:.2}, momentum lag: {}h, scan interval: {}s",
        bankroll, wager_per_bet, momentum_lag_hours, scan_interval_secs
    );

    let mut scan_interval = tokio::time::interval(Duration::from_secs(scan_interval_secs));

    loop {
        scan_interval.tick().await;

        // Find in-season sports
        let sports = match client.fetch_in_season_sports().await {
            Ok(sports) if !sports.is_empty() => sports,
            Ok(_) => {
                warn!("No desired sports are in season right now");
                continue;
            }
            Err(e) => {
                error!("Failed to fetch sports list: {:#}", e);
                continue;
            }
        };
        info!("Scanning {} in-season sports", sports.len());

        // Today's games plus the historical snapshot for momentum
        let now = Utc::now();
        let end_of_day = now
            .date_naive()
            .and_hms_opt(23, 59, 59)
            .map(|dt| dt.and_utc())
            .unwrap_or(now);
        let snapshot_at = now - ChronoDuration::hours(momentum_lag_hours);

        let (games, historical) = tokio::join!(
            client.fetch_all_odds(&sports, now, end_of_day),
            client.fetch_all_historical(&sports, snapshot_at)
        );

        if games.is_empty() {
            warn!("No upcoming games found for active sports today");
            continue;
        }
        info!("Analyzing {} games", games.len());

        let analyses = analyzer.analyze_games(&games, &historical, &HashMap::new());

        for analysis in &analyses {
            let momentum_note = match analysis.momentum.shift() {
                Some(shift) => format!("momentum {:+.1}%", shift * 100.0),
                None => "momentum unavailable".to_string(),
            };
            for candidate in analysis.candidates.iter().filter(|c| c.ev > 0.0) {
                info!(
                    "💰 {} | {} ({}) EV {} [{}]",
                    analysis.matchup,
                    candidate.label,
                    decimal_to_american(candidate.odds),
                    format_ev(candidate.ev),
                    momentum_note
                );
            }
        }

        // Kelly-sized stake on the single best bet of each game
        let kelly_bets = build_kelly_bets(&analyses, bankroll);
        for bet in &kelly_bets {
            info!(
                "📊 Kelly: {} | {} ({}) stake ${:.2} ({:.1}% of bankroll)",
                bet.matchup,
                bet.label,
                decimal_to_american(bet.odds),
                bet.stake,
                bet.fraction * 100.0
            );
        }

        // Momentum parlay and its round-robin break-even table
        let legs = analyzer.build_momentum_parlay(&games, &historical);
        let mut parlay = BetSlip::new();
        for leg in legs {
            parlay.toggle(leg);
        }

        let avg_odds = effective_average_odds(parlay.average_odds(), None);
        match build_round_robin_table(parlay.len() as u32, wager_per_bet, avg_odds) {
            Ok(table) => {
                info!(
                    "Momentum parlay: {} legs, avg odds {}",
                    table.num_legs,
                    decimal_to_american(table.avg_odds)
                );
                for row in &table.rows {
                    match row.wins_needed {
                        Some(wins) => info!(
                            "  {}-team ({} bets): cost ${:.2}, {} of {} wins to profit, +${:.2} ({:.0}% ROI)",
                            row.combo_size,
                            row.num_combos,
                            row.cost,
                            wins,
                            table.num_legs,
                            row.profit_at_break_even.unwrap_or(0.0),
                            row.roi_at_break_even.unwrap_or(0.0)
                        ),
                        None => info!(
                            "  {}-team ({} bets): cost ${:.2}, break-even unattainable",
                            row.combo_size, row.num_combos, row.cost
                        ),
                    }
                }
                if let Some(best) = table.best_by_roi {
                    info!("  Best combo size by ROI: {}-team", best);
                }
            }
            Err(RoundRobinError::NotEnoughLegs(n)) => {
                info!(
                    "Momentum parlay has {} leg(s); need at least 2 for round robins",
                    n
                );
            }
        }
    }
}
