// Core modules
pub mod odds;
pub mod probability;
pub mod ev;
pub mod kelly;
pub mod round_robin;
pub mod game;
pub mod slip;
pub mod analyzer;
pub mod odds_client;

// Re-exports
pub use odds::{american_to_decimal, decimal_to_american};
pub use probability::{
    momentum_adjusted_probability, no_vig_probability, spread_momentum_probability,
    MomentumMode, MomentumResult,
};
pub use ev::{expected_value, format_ev, is_positive_ev};
pub use kelly::{build_kelly_bets, kelly_fraction, kelly_stake, KellyBet};
pub use round_robin::{
    build_round_robin_table, combinations, effective_average_odds, ComboRow, RoundRobinError,
    RoundRobinTable,
};
pub use game::Game;
pub use slip::{BetSlip, SlipEntry, ToggleOutcome};
pub use analyzer::{
    AnalysisFilters, BetCandidate, GameAnalysis, GameAnalyzer, SortOrder, StrategyAction,
};
pub use odds_client::{OddsApiClient, Sport};
