use crate::ev::expected_value;
use crate::game::{historical_moneyline, Game};
use crate::odds::american_to_decimal;
use crate::probability::{
    fade_probability, momentum_adjusted_probability, no_vig_probability,
    spread_momentum_probability, MomentumMode, MomentumResult,
};
use crate::slip::SlipEntry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A prospective wager on one side of one market, recomputed whenever the
/// probability input or the odds change. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetCandidate {
    pub label: String,
    pub odds: f64,
    pub win_prob: f64,
    pub ev: f64,
}

/// Everything the engine derives for one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameAnalysis {
    pub game_id: String,
    pub matchup: String,
    /// Probability estimate for the away side after momentum adjustment
    /// (or the user override when one is set).
    pub away_prob: f64,
    pub momentum: MomentumResult,
    pub candidates: Vec<BetCandidate>,
}

impl GameAnalysis {
    pub fn best_candidate(&self) -> Option<&BetCandidate> {
        self.candidates
            .iter()
            .max_by(|a, b| a.ev.partial_cmp(&b.ev).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn max_positive_ev(&self) -> f64 {
        self.candidates
            .iter()
            .map(|c| c.ev)
            .filter(|ev| *ev > 0.0)
            .fold(0.0, f64::max)
    }

    pub fn has_positive_ev(&self) -> bool {
        self.candidates.iter().any(|c| c.ev > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    InputOrder,
    HighestEv,
}

/// Per-sport parlay strategy: bet with the momentum, against it, or skip
/// the sport entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyAction {
    Take,
    Fade,
    Ignore,
}

/// Value filters, expressed as plain values rather than UI widgets.
#[derive(Debug, Clone)]
pub struct AnalysisFilters {
    pub positive_ev_only: bool,
    /// Minimum acceptable odds, in American format; converted internally.
    pub min_american_odds: Option<f64>,
    pub home_teams_only: bool,
    pub sort: SortOrder,
}

impl Default for AnalysisFilters {
    fn default() -> Self {
        Self {
            positive_ev_only: false,
            min_american_odds: None,
            home_teams_only: false,
            sort: SortOrder::InputOrder,
        }
    }
}

pub struct GameAnalyzer {
    filters: AnalysisFilters,
    momentum_mode: MomentumMode,
    /// Strategy per display sport ("Football", "Baseball", ...).
    strategies: HashMap<String, StrategyAction>,
}

impl GameAnalyzer {
    pub fn new(filters: AnalysisFilters, momentum_mode: MomentumMode) -> Self {
        Self {
            filters,
            momentum_mode,
            strategies: HashMap::new(),
        }
    }

    pub fn with_strategy(mut self, sport: &str, action: StrategyAction) -> Self {
        self.strategies.insert(sport.to_string(), action);
        self
    }

    pub fn strategy_for(&self, sport: &str) -> StrategyAction {
        self.strategies
            .get(sport)
            .copied()
            .unwrap_or(StrategyAction::Take)
    }

    fn momentum_for(&self, game: &Game, historical: Option<&Value>) -> MomentumResult {
        match historical {
            Some(snapshot) => {
                let (hist_away, hist_home) =
                    historical_moneyline(snapshot, &game.away_team, &game.home_team);
                momentum_adjusted_probability(
                    game.moneyline_away,
                    game.moneyline_home,
                    hist_away,
                    hist_home,
                    self.momentum_mode,
                )
            }
            // No historical source wired in: fall back to the spread
            // heuristic over the plain no-vig probability.
            None => {
                let base = no_vig_probability(
                    game.moneyline_away.unwrap_or(0.0),
                    game.moneyline_home.unwrap_or(0.0),
                );
                spread_momentum_probability(base, game.spread_away, game.spread_home)
            }
        }
    }

    /// Analyze one game: momentum-adjusted away probability (or the user's
    /// override), then an EV candidate per present two-sided market.
    pub fn analyze_game(
        &self,
        game: &Game,
        historical: Option<&Value>,
        prob_override: Option<f64>,
    ) -> GameAnalysis {
        let momentum = self.momentum_for(game, historical);
        let away_prob = prob_override.unwrap_or_else(|| momentum.prob());
        let home_prob = 1.0 - away_prob;

        fn candidate(label: String, prob: f64, odds: f64) -> BetCandidate {
            BetCandidate {
                label,
                odds,
                win_prob: prob,
                ev: expected_value(prob, odds),
            }
        }

        let mut candidates = Vec::new();

        if let (Some(away_odds), Some(home_odds)) = (game.moneyline_away, game.moneyline_home) {
            candidates.push(candidate(game.away_team.clone(), away_prob, away_odds));
            candidates.push(candidate(game.home_team.clone(), home_prob, home_odds));
        }

        if let (Some(away_odds), Some(home_odds)) = (game.spread_away_odds, game.spread_home_odds)
        {
            let away_point = game.spread_away.unwrap_or(0.0);
            let home_point = game.spread_home.unwrap_or(0.0);
            candidates.push(candidate(
                format!("{} {:+}", game.away_team, away_point),
                away_prob,
                away_odds,
            ));
            candidates.push(candidate(
                format!("{} {:+}", game.home_team, home_point),
                home_prob,
                home_odds,
            ));
        }

        if let (Some(over_odds), Some(under_odds)) = (game.total_over_odds, game.total_under_odds)
        {
            candidates.push(candidate(
                format!("Over {}", game.total_over.unwrap_or(0.0)),
                away_prob,
                over_odds,
            ));
            candidates.push(candidate(
                format!("Under {}", game.total_under.unwrap_or(0.0)),
                home_prob,
                under_odds,
            ));
        }

        GameAnalysis {
            game_id: game.id.clone(),
            matchup: game.matchup(),
            away_prob,
            momentum,
            candidates,
        }
    }

    /// Analyze a batch of games and apply the value filters and sort order.
    /// `historical` maps game id to that game's snapshot object;
    /// `overrides` maps game id to a user-set away-side probability.
    pub fn analyze_games(
        &self,
        games: &[Game],
        historical: &HashMap<String, Value>,
        overrides: &HashMap<String, f64>,
    ) -> Vec<GameAnalysis> {
        let min_decimal_odds = self
            .filters
            .min_american_odds
            .map(american_to_decimal)
            .filter(|d| !d.is_nan());

        let mut analyses = Vec::new();
        for game in games {
            let mut analysis = self.analyze_game(
                game,
                historical.get(&game.id),
                overrides.get(&game.id).copied(),
            );

            if self.filters.home_teams_only {
                let home = game.home_team.clone();
                analysis.candidates.retain(|c| c.label.contains(&home));
            }

            if let Some(min_odds) = min_decimal_odds {
                if !analysis.candidates.iter().any(|c| c.odds >= min_odds) {
                    continue;
                }
            }
            if self.filters.positive_ev_only && !analysis.has_positive_ev() {
                continue;
            }

            analyses.push(analysis);
        }

        if self.filters.sort == SortOrder::HighestEv {
            analyses.sort_by(|a, b| {
                b.max_positive_ev()
                    .partial_cmp(&a.max_positive_ev())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        analyses
    }

    /// Build a parlay from the per-sport strategies: for every game with
    /// usable momentum, back the moneyline side the adjusted probability
    /// favors (Fade inverts the probability first) and keep the leg only
    /// when it carries positive EV.
    pub fn generate_strategy_parlay(
        &self,
        games: &[Game],
        historical: &HashMap<String, Value>,
    ) -> Vec<SlipEntry> {
        let mut legs = Vec::new();

        for game in games {
            let action = self.strategy_for(game.sport());
            if action == StrategyAction::Ignore {
                continue;
            }

            let momentum = self.momentum_for(game, historical.get(&game.id));
            if !momentum.has_data() {
                continue;
            }

            let away_prob = match action {
                StrategyAction::Fade => fade_probability(momentum.prob()),
                _ => momentum.prob(),
            };

            let (label, prob, odds) = if away_prob > 0.5 {
                match game.moneyline_away {
                    Some(odds) => (game.away_team.clone(), away_prob, odds),
                    None => continue,
                }
            } else {
                match game.moneyline_home {
                    Some(odds) => (game.home_team.clone(), 1.0 - away_prob, odds),
                    None => continue,
                }
            };

            if expected_value(prob, odds) > 0.0 {
                legs.push(SlipEntry {
                    game_id: game.id.clone(),
                    matchup: game.matchup(),
                    label,
                    odds,
                });
            }
        }

        legs
    }

    /// Collect the moneyline side the line moved toward, across every game
    /// with a usable momentum reading.
    pub fn build_momentum_parlay(
        &self,
        games: &[Game],
        historical: &HashMap<String, Value>,
    ) -> Vec<SlipEntry> {
        let mut legs = Vec::new();

        for game in games {
            let momentum = self.momentum_for(game, historical.get(&game.id));
            let shift = match momentum.shift() {
                Some(shift) if shift.abs() > 0.001 => shift,
                _ => continue,
            };

            let (label, odds) = if shift > 0.0 {
                match game.moneyline_away {
                    Some(odds) => (game.away_team.clone(), odds),
                    None => continue,
                }
            } else {
                match game.moneyline_home {
                    Some(odds) => (game.home_team.clone(), odds),
                    None => continue,
                }
            };

            legs.push(SlipEntry {
                game_id: game.id.clone(),
                matchup: game.matchup(),
                label,
                odds,
            });
        }

        legs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn game(id: &str) -> Game {
        Game {
            id: id.to_string(),
            sport_key: "americanfootball_nfl".to_string(),
            league: "NFL".to_string(),
            away_team: "Buffalo Bills".to_string(),
            home_team: "Miami Dolphins".to_string(),
            commence_time: None,
            moneyline_away: Some(1.72),
            moneyline_home: Some(2.15),
            spread_away: Some(-3.5),
            spread_away_odds: Some(1.91),
            spread_home: Some(3.5),
            spread_home_odds: Some(1.91),
            total_over: Some(48.5),
            total_over_odds: Some(1.87),
            total_under: Some(48.5),
            total_under_odds: Some(1.95),
        }
    }

    fn snapshot(away_price: f64, home_price: f64) -> Value {
        json!({
            "bookmakers": [{
                "markets": [
                    {"key": "h2h", "outcomes": [
                        {"name": "Buffalo Bills", "price": away_price},
                        {"name": "Miami Dolphins", "price": home_price}
                    ]}
                ]
            }]
        })
    }

    fn analyzer() -> GameAnalyzer {
        GameAnalyzer::new(AnalysisFilters::default(), MomentumMode::Extrapolate)
    }

    #[test]
    fn test_candidates_cover_all_markets() {
        let analysis = analyzer().analyze_game(&game("g1"), None, None);
        assert_eq!(analysis.candidates.len(), 6);
        let labels: Vec<&str> = analysis.candidates.iter().map(|c| c.label.as_str()).collect();
        assert!(labels.contains(&"Buffalo Bills"));
        assert!(labels.contains(&"Buffalo Bills -3.5"));
        assert!(labels.contains(&"Miami Dolphins +3.5"));
        assert!(labels.contains(&"Over 48.5"));
    }

    #[test]
    fn test_override_replaces_momentum_estimate() {
        let analysis = analyzer().analyze_game(&game("g1"), None, Some(0.70));
        assert!((analysis.away_prob - 0.70).abs() < 1e-9);
        let away_ml = &analysis.candidates[0];
        assert!((away_ml.win_prob - 0.70).abs() < 1e-9);
        let home_ml = &analysis.candidates[1];
        assert!((home_ml.win_prob - 0.30).abs() < 1e-9);
    }

    #[test]
    fn test_historical_snapshot_drives_momentum() {
        // Away opened longer (2.00) than it trades now (1.72): momentum
        // toward the away side, so the adjusted prob exceeds the current.
        let hist = snapshot(2.00, 1.85);
        let analysis = analyzer().analyze_game(&game("g1"), Some(&hist), None);
        assert!(analysis.momentum.has_data());
        assert!(analysis.momentum.shift().unwrap() > 0.0);
        let current = no_vig_probability(1.72, 2.15);
        assert!(analysis.away_prob > current);
    }

    #[test]
    fn test_missing_history_reports_no_data() {
        let hist = json!({"bookmakers": []});
        let analysis = analyzer().analyze_game(&game("g1"), Some(&hist), None);
        assert!(!analysis.momentum.has_data());
        let current = no_vig_probability(1.72, 2.15);
        assert!((analysis.away_prob - current).abs() < 1e-9);
    }

    #[test]
    fn test_spread_fallback_without_history() {
        let analysis = analyzer().analyze_game(&game("g1"), None, None);
        // spread gap (3.5 - (-3.5)) / 2 * 0.005 = 0.0175 over the no-vig base
        let base = no_vig_probability(1.72, 2.15);
        assert!(analysis.momentum.has_data());
        assert!((analysis.away_prob - (base + 0.0175)).abs() < 1e-9);
    }

    #[test]
    fn test_positive_ev_filter() {
        let filters = AnalysisFilters {
            positive_ev_only: true,
            ..Default::default()
        };
        let analyzer = GameAnalyzer::new(filters, MomentumMode::Extrapolate);
        // Moneyline-only game at prices where 55% clears neither side.
        let mut ml_only = game("g1");
        ml_only.moneyline_away = Some(1.60);
        ml_only.moneyline_home = Some(2.10);
        ml_only.spread_away_odds = None;
        ml_only.spread_home_odds = None;
        ml_only.total_over_odds = None;
        ml_only.total_under_odds = None;
        let mut overrides = HashMap::new();
        overrides.insert("g1".to_string(), 0.55);
        let analyses = analyzer.analyze_games(&[ml_only], &HashMap::new(), &overrides);
        assert!(analyses.is_empty());
    }

    #[test]
    fn test_min_odds_filter() {
        let filters = AnalysisFilters {
            min_american_odds: Some(300.0), // decimal 4.0, nothing qualifies
            ..Default::default()
        };
        let analyzer = GameAnalyzer::new(filters, MomentumMode::Extrapolate);
        let analyses = analyzer.analyze_games(&[game("g1")], &HashMap::new(), &HashMap::new());
        assert!(analyses.is_empty());
    }

    #[test]
    fn test_home_teams_only_restricts_candidates() {
        let filters = AnalysisFilters {
            home_teams_only: true,
            ..Default::default()
        };
        let analyzer = GameAnalyzer::new(filters, MomentumMode::Extrapolate);
        let analyses = analyzer.analyze_games(&[game("g1")], &HashMap::new(), &HashMap::new());
        assert_eq!(analyses.len(), 1);
        assert!(analyses[0]
            .candidates
            .iter()
            .all(|c| c.label.contains("Miami Dolphins")));
    }

    #[test]
    fn test_sort_by_highest_ev() {
        let filters = AnalysisFilters {
            sort: SortOrder::HighestEv,
            ..Default::default()
        };
        let analyzer = GameAnalyzer::new(filters, MomentumMode::Extrapolate);

        let mut overrides = HashMap::new();
        overrides.insert("g1".to_string(), 0.50);
        overrides.insert("g2".to_string(), 0.75);

        let analyses =
            analyzer.analyze_games(&[game("g1"), game("g2")], &HashMap::new(), &overrides);
        assert_eq!(analyses[0].game_id, "g2");
    }

    #[test]
    fn test_strategy_parlay_take_and_fade() {
        // Momentum strongly toward away: Take backs away, Fade flips to home.
        let mut historical = HashMap::new();
        historical.insert("g1".to_string(), snapshot(2.20, 1.70));

        let take = analyzer().with_strategy("Football", StrategyAction::Take);
        let legs = take.generate_strategy_parlay(&[game("g1")], &historical);
        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].label, "Buffalo Bills");

        let fade = analyzer().with_strategy("Football", StrategyAction::Fade);
        let legs = fade.generate_strategy_parlay(&[game("g1")], &historical);
        // The faded side only survives when its EV is positive at the
        // quoted home price.
        for leg in &legs {
            assert_eq!(leg.label, "Miami Dolphins");
        }

        let ignore = analyzer().with_strategy("Football", StrategyAction::Ignore);
        assert!(ignore
            .generate_strategy_parlay(&[game("g1")], &historical)
            .is_empty());
    }

    #[test]
    fn test_momentum_parlay_follows_shift() {
        let mut historical = HashMap::new();
        historical.insert("g1".to_string(), snapshot(2.20, 1.70));
        let legs = analyzer().build_momentum_parlay(&[game("g1")], &historical);
        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].label, "Buffalo Bills");
        assert_eq!(legs[0].odds, 1.72);
    }
}
