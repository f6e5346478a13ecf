use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::stats::types::{PlayerSummary, RosterEntry, ScheduledGame, TeamSummary};

/// Upstream statistics provider, seam for the lookup layer.
///
/// The production implementation talks to the MLB Stats API; tests inject a
/// scripted double.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Free-text player search. Returns matches in provider order.
    async fn search_players(&self, query: &str) -> Result<Vec<PlayerSummary>>;

    /// Full person record with season stat groups hydrated in.
    async fn player_detail(&self, player_id: i64, season: i32) -> Result<Value>;

    /// Games for a team between two dates, oldest first.
    async fn schedule(
        &self,
        team_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduledGame>>;

    /// Raw boxscore document for one game.
    async fn boxscore(&self, game_pk: i64) -> Result<Value>;

    /// All active teams.
    async fn teams(&self) -> Result<Vec<TeamSummary>>;

    /// Active roster for a team.
    async fn roster(&self, team_id: i64) -> Result<Vec<RosterEntry>>;
}

/// MLB Stats API client (statsapi.mlb.com).
#[derive(Clone)]
pub struct MlbClient {
    http: reqwest::Client,
    base_url: String,
}

impl MlbClient {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .expect("HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("MLB API request {url}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("MLB API {status}: {}", &body[..body.len().min(300)]);
        }

        resp.json().await.context("Parse MLB API response")
    }
}

#[async_trait]
impl StatsProvider for MlbClient {
    async fn search_players(&self, query: &str) -> Result<Vec<PlayerSummary>> {
        let url = format!(
            "{}?names={}",
            self.api_url("people/search"),
            urlencode(query)
        );
        let data = self.get_json(&url).await?;

        let people = data
            .get("people")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        debug!("Player search '{}': {} matches", query, people.len());

        Ok(people.iter().map(summarize_person).collect())
    }

    async fn player_detail(&self, player_id: i64, season: i32) -> Result<Value> {
        let url = format!(
            "{}?hydrate=stats(group=[hitting,pitching,fielding],type=season,season={}),currentTeam",
            self.api_url(&format!("people/{player_id}")),
            season
        );
        let data = self.get_json(&url).await?;

        data.get("people")
            .and_then(Value::as_array)
            .and_then(|people| people.first())
            .cloned()
            .context("MLB API returned no person record")
    }

    async fn schedule(
        &self,
        team_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ScheduledGame>> {
        let url = format!(
            "{}?sportId=1&teamId={}&startDate={}&endDate={}",
            self.api_url("schedule"),
            team_id,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        );
        let data = self.get_json(&url).await?;

        let mut games = Vec::new();
        for date in data.get("dates").and_then(Value::as_array).into_iter().flatten() {
            for game in date.get("games").and_then(Value::as_array).into_iter().flatten() {
                let Some(game_pk) = game.get("gamePk").and_then(Value::as_i64) else {
                    continue;
                };
                games.push(ScheduledGame {
                    game_pk,
                    game_date: game
                        .get("officialDate")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    away_team_id: game
                        .pointer("/teams/away/team/id")
                        .and_then(Value::as_i64),
                    home_team_id: game
                        .pointer("/teams/home/team/id")
                        .and_then(Value::as_i64),
                });
            }
        }
        Ok(games)
    }

    async fn boxscore(&self, game_pk: i64) -> Result<Value> {
        self.get_json(&self.api_url(&format!("game/{game_pk}/boxscore")))
            .await
    }

    async fn teams(&self) -> Result<Vec<TeamSummary>> {
        let url = format!("{}?sportId=1", self.api_url("teams"));
        let data = self.get_json(&url).await?;

        let teams = data
            .get("teams")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(teams
            .iter()
            .filter_map(|t| {
                Some(TeamSummary {
                    id: t.get("id").and_then(Value::as_i64)?,
                    name: t
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                })
            })
            .collect())
    }

    async fn roster(&self, team_id: i64) -> Result<Vec<RosterEntry>> {
        let data = self
            .get_json(&self.api_url(&format!("teams/{team_id}/roster")))
            .await?;

        let slots = data
            .get("roster")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(slots
            .iter()
            .map(|slot| RosterEntry {
                id: slot.pointer("/person/id").and_then(Value::as_i64).unwrap_or(0),
                full_name: slot
                    .pointer("/person/fullName")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                position: slot
                    .pointer("/position/abbreviation")
                    .and_then(Value::as_str)
                    .unwrap_or("N/A")
                    .to_string(),
                jersey_number: slot
                    .get("jerseyNumber")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                status: slot
                    .pointer("/status/description")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect())
    }
}

/// Reduce a raw person record to the search-result shape.
pub fn summarize_person(person: &Value) -> PlayerSummary {
    PlayerSummary {
        id: person.get("id").and_then(Value::as_i64).unwrap_or(0),
        full_name: person
            .get("fullName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        position: person
            .pointer("/primaryPosition/abbreviation")
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_string(),
        team: person
            .pointer("/currentTeam/name")
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_string(),
        active: person.get("active").and_then(Value::as_bool).unwrap_or(false),
    }
}

/// Minimal percent-encoding for query values (space and reserved chars only;
/// player names are plain ASCII in practice).
fn urlencode(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            ' ' => "%20".to_string(),
            '&' => "%26".to_string(),
            '+' => "%2B".to_string(),
            '#' => "%23".to_string(),
            _ => c.to_string(),
        })
        .collect()
}
