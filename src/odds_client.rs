use crate::game::Game;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Leagues the analyzer cares about, matched against The Odds API titles.
pub const DESIRED_SPORT_TITLES: &[&str] = &[
    "NFL",
    "MLB",
    "NBA",
    "NHL",
    "WNBA",
    "CFL",
    "NCAAF",
    "NCAAB",
    "Premier League",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sport {
    pub key: String,
    pub title: String,
}

// The Odds API client
#[derive(Clone)]
pub struct OddsApiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OddsApiClient {
    pub fn new(api_key: String) -> Self {
        // Create HTTP client with connection pooling and timeouts
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .unwrap_or_else(|_| Client::new()); // Fallback to default if builder fails

        Self {
            http_client,
            api_key,
            base_url: "https://api.the-odds-api.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn fmt_time(time: DateTime<Utc>) -> String {
        time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// Fetch the in-season sports list, filtered to the leagues we analyze.
    pub async fn fetch_in_season_sports(&self) -> Result<Vec<Sport>> {
        let response = self
            .http_client
            .get(format!("{}/v4/sports/", self.base_url))
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await
            .context("Failed to fetch sports list")?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Odds API error: {} - {}",
                response.status(),
                response.text().await.unwrap_or_default()
            ));
        }

        let data: Value = response
            .json()
            .await
            .context("Failed to parse sports list")?;

        let mut sports = Vec::new();
        if let Some(entries) = data.as_array() {
            for entry in entries {
                let title = entry["title"].as_str().unwrap_or_default();
                if DESIRED_SPORT_TITLES.contains(&title) {
                    sports.push(Sport {
                        key: entry["key"].as_str().unwrap_or_default().to_string(),
                        title: title.to_string(),
                    });
                }
            }
        }

        Ok(sports)
    }

    /// Fetch current odds for one sport within a commence-time window.
    pub async fn fetch_odds(
        &self,
        sport_key: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Game>> {
        let from_param = Self::fmt_time(from);
        let to_param = Self::fmt_time(to);
        let response = self
            .http_client
            .get(format!("{}/v4/sports/{}/odds", self.base_url, sport_key))
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", "us"),
                ("markets", "h2h,spreads,totals"),
                ("oddsFormat", "decimal"),
                ("commenceTimeFrom", from_param.as_str()),
                ("commenceTimeTo", to_param.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to fetch odds for {}", sport_key))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Odds API error for {}: {} - {}",
                sport_key,
                response.status(),
                response.text().await.unwrap_or_default()
            ));
        }

        let data: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse odds for {}", sport_key))?;

        let games = data
            .as_array()
            .map(|entries| entries.iter().filter_map(Game::from_api).collect())
            .unwrap_or_default();

        Ok(games)
    }

    /// Fetch a historical odds snapshot for one sport at a point in time,
    /// keyed by game id. Used as the opening line for momentum.
    pub async fn fetch_historical_odds(
        &self,
        sport_key: &str,
        at: DateTime<Utc>,
    ) -> Result<HashMap<String, Value>> {
        let response = self
            .http_client
            .get(format!(
                "{}/v4/historical/sports/{}/odds",
                self.base_url, sport_key
            ))
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", "us"),
                ("markets", "h2h"),
                ("oddsFormat", "decimal"),
                ("date", Self::fmt_time(at).as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to fetch historical odds for {}", sport_key))?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Odds API history error for {}: {} - {}",
                sport_key,
                response.status(),
                response.text().await.unwrap_or_default()
            ));
        }

        let data: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse historical odds for {}", sport_key))?;

        let mut snapshots = HashMap::new();
        if let Some(entries) = data["data"].as_array() {
            for entry in entries {
                if let Some(id) = entry["id"].as_str() {
                    snapshots.insert(id.to_string(), entry.clone());
                }
            }
        }

        Ok(snapshots)
    }

    /// Fetch current odds for every sport concurrently. One sport failing
    /// must not block the others: failures are logged and skipped.
    pub async fn fetch_all_odds(
        &self,
        sports: &[Sport],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<Game> {
        let fetches = sports.iter().map(|sport| self.fetch_odds(&sport.key, from, to));
        let results = join_all(fetches).await;

        let mut games = Vec::new();
        for (sport, result) in sports.iter().zip(results) {
            match result {
                Ok(mut sport_games) => games.append(&mut sport_games),
                Err(e) => warn!("Skipping {}: {:#}", sport.title, e),
            }
        }
        games
    }

    /// Fetch historical snapshots for every sport concurrently, merged into
    /// one game-id map. Failures degrade to missing momentum, not errors.
    pub async fn fetch_all_historical(
        &self,
        sports: &[Sport],
        at: DateTime<Utc>,
    ) -> HashMap<String, Value> {
        let fetches = sports
            .iter()
            .map(|sport| self.fetch_historical_odds(&sport.key, at));
        let results = join_all(fetches).await;

        let mut snapshots = HashMap::new();
        for (sport, result) in sports.iter().zip(results) {
            match result {
                Ok(sport_snapshots) => snapshots.extend(sport_snapshots),
                Err(e) => warn!("No historical odds for {}: {:#}", sport.title, e),
            }
        }
        snapshots
    }
}
