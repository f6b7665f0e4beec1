use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One game's lines, flattened from The Odds API response. Every market
/// field is optional because bookmakers routinely quote only a subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub sport_key: String,
    pub league: String,
    pub away_team: String,
    pub home_team: String,
    pub commence_time: Option<DateTime<Utc>>,
    pub moneyline_away: Option<f64>,
    pub moneyline_home: Option<f64>,
    pub spread_away: Option<f64>,
    pub spread_away_odds: Option<f64>,
    pub spread_home: Option<f64>,
    pub spread_home_odds: Option<f64>,
    pub total_over: Option<f64>,
    pub total_over_odds: Option<f64>,
    pub total_under: Option<f64>,
    pub total_under_odds: Option<f64>,
}

fn league_from_key(sport_key: &str) -> &'static str {
    if sport_key.contains("nfl") {
        "NFL"
    } else if sport_key.contains("cfl") {
        "CFL"
    } else if sport_key.contains("ncaaf") {
        "NCAAF"
    } else if sport_key.contains("ncaab") {
        "NCAAB"
    } else if sport_key.contains("mlb") {
        "MLB"
    } else if sport_key.contains("wnba") {
        "WNBA"
    } else if sport_key.contains("nba") {
        "NBA"
    } else if sport_key.contains("soccer") {
        "SOCCER"
    } else if sport_key.contains("nhl") {
        "NHL"
    } else {
        "Unknown"
    }
}

fn find_market<'a>(bookmaker: &'a Value, key: &str) -> Option<&'a Value> {
    bookmaker["markets"]
        .as_array()?
        .iter()
        .find(|m| m["key"].as_str() == Some(key))
}

fn find_outcome<'a>(market: Option<&'a Value>, name: &str) -> Option<&'a Value> {
    market?["outcomes"]
        .as_array()?
        .iter()
        .find(|o| o["name"].as_str() == Some(name))
}

fn outcome_price(outcome: Option<&Value>) -> Option<f64> {
    outcome?["price"].as_f64()
}

fn outcome_point(outcome: Option<&Value>) -> Option<f64> {
    outcome?["point"].as_f64()
}

impl Game {
    /// Flatten an API game object using its first bookmaker. Games with no
    /// bookmaker attached carry no usable lines and are dropped.
    pub fn from_api(api_game: &Value) -> Option<Game> {
        let bookmaker = api_game["bookmakers"].as_array()?.first()?;

        let away_team = api_game["away_team"].as_str()?.to_string();
        let home_team = api_game["home_team"].as_str()?.to_string();
        let sport_key = api_game["sport_key"].as_str().unwrap_or_default().to_string();

        let moneyline = find_market(bookmaker, "h2h");
        let spreads = find_market(bookmaker, "spreads");
        let totals = find_market(bookmaker, "totals");

        let ml_away = find_outcome(moneyline, &away_team);
        let ml_home = find_outcome(moneyline, &home_team);
        let spread_away = find_outcome(spreads, &away_team);
        let spread_home = find_outcome(spreads, &home_team);
        let over = find_outcome(totals, "Over");
        let under = find_outcome(totals, "Under");

        let commence_time = api_game["commence_time"]
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Some(Game {
            id: api_game["id"].as_str().unwrap_or_default().to_string(),
            league: league_from_key(&sport_key).to_string(),
            sport_key,
            away_team,
            home_team,
            commence_time,
            moneyline_away: outcome_price(ml_away),
            moneyline_home: outcome_price(ml_home),
            spread_away: outcome_point(spread_away),
            spread_away_odds: outcome_price(spread_away),
            spread_home: outcome_point(spread_home),
            spread_home_odds: outcome_price(spread_home),
            total_over: outcome_point(over),
            total_over_odds: outcome_price(over),
            total_under: outcome_point(under),
            total_under_odds: outcome_price(under),
        })
    }

    /// Display sport, used for grouping strategy controls per sport.
    pub fn sport(&self) -> &'static str {
        match self.league.as_str() {
            "NFL" | "CFL" | "NCAAF" => "Football",
            "MLB" => "Baseball",
            "NBA" | "WNBA" | "NCAAB" => "Basketball",
            "SOCCER" => "Soccer",
            "NHL" => "Hockey",
            _ => "Unknown",
        }
    }

    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }
}

/// Pull the moneyline prices for the same two named sides out of a
/// historical snapshot of this game. Missing bookmaker, market, or either
/// outcome leaves that side as None - the momentum adjuster reports
/// no-data in that case rather than fabricating a shift.
pub fn historical_moneyline(
    api_game: &Value,
    away_team: &str,
    home_team: &str,
) -> (Option<f64>, Option<f64>) {
    let bookmaker = match api_game["bookmakers"].as_array().and_then(|b| b.first()) {
        Some(b) => b,
        None => return (None, None),
    };
    let moneyline = find_market(bookmaker, "h2h");
    (
        outcome_price(find_outcome(moneyline, away_team)),
        outcome_price(find_outcome(moneyline, home_team)),
    )
}
