use anyhow::Result;
use chrono::{Datelike, Duration, Utc};
use serde_json::Value;
use tracing::{error, warn};

use crate::stats::cache::PlayerCache;
use crate::stats::format;
use crate::stats::mlb::StatsProvider;
use crate::stats::types::{
    FormattedPlayerData, PlayerInfo, PlayerSummary, RecentPerformance, RosterEntry, TeamSummary,
};

/// Trailing window the recent-performance extractor looks at.
const RECENT_WINDOW_DAYS: i64 = 21;
/// Games attempted inside that window.
const RECENT_GAMES_ATTEMPTED: usize = 10;

/// Player lookup, stat fetch, and formatting behind a TTL cache.
///
/// Every failure inside `get_player_data` is absorbed into `None`; callers
/// only ever distinguish "found" from "not found".
pub struct StatsService<P: StatsProvider> {
    provider: P,
    cache: Box<dyn PlayerCache>,
}

impl<P: StatsProvider> StatsService<P> {
    pub fn new(provider: P, cache: Box<dyn PlayerCache>) -> Self {
        Self { provider, cache }
    }

    /// Fetch formatted data for a player by free-text name. Fresh cache hits
    /// skip all upstream calls.
    pub async fn get_player_data(
        &self,
        name: &str,
        season: Option<i32>,
    ) -> Option<FormattedPlayerData> {
        let cache_key = format!("player_{}", name.trim().to_lowercase());
        if let Some(hit) = self.cache.get(&cache_key, Utc::now()) {
            return Some(hit);
        }

        let season = season.unwrap_or_else(current_season);
        match self.fetch_and_format(name, season).await {
            Ok(Some(data)) => {
                self.cache.put(&cache_key, data.clone(), Utc::now());
                Some(data)
            }
            Ok(None) => {
                warn!("Player not found: {name}");
                None
            }
            Err(e) => {
                error!("Error fetching {name} data: {e}");
                None
            }
        }
    }

    /// Free-text player search, capped at `limit` results. Errors degrade to
    /// an empty list.
    pub async fn search_players(&self, query: &str, limit: usize) -> Vec<PlayerSummary> {
        match self.provider.search_players(query).await {
            Ok(mut players) => {
                players.truncate(limit);
                players
            }
            Err(e) => {
                error!("Error searching players with query '{query}': {e}");
                Vec::new()
            }
        }
    }

    /// Roster for a team matched by name (case-insensitive, substring match
    /// over the provider team list).
    pub async fn team_roster(&self, team_name: &str) -> Option<(TeamSummary, Vec<RosterEntry>)> {
        let needle = team_name.trim().to_lowercase();
        let teams = match self.provider.teams().await {
            Ok(teams) => teams,
            Err(e) => {
                error!("Error fetching teams: {e}");
                return None;
            }
        };

        let team = teams
            .into_iter()
            .find(|t| t.name.to_lowercase().contains(&needle))?;

        match self.provider.roster(team.id).await {
            Ok(roster) => Some((team, roster)),
            Err(e) => {
                error!("Error fetching roster for {}: {e}", team.name);
                None
            }
        }
    }

    /// Sentinel upstream call used by the health endpoint.
    pub async fn ping(&self) -> Result<()> {
        self.provider.search_players("trout").await.map(|_| ())
    }

    async fn fetch_and_format(
        &self,
        name: &str,
        season: i32,
    ) -> Result<Option<FormattedPlayerData>> {
        let Some(player_id) = self.resolve_player_id(name).await? else {
            return Ok(None);
        };

        let person = self.provider.player_detail(player_id, season).await?;

        let hitting = season_group(&person, "hitting");
        let pitching = season_group(&person, "pitching");
        let pitcher = format::is_pitcher(&pitching);

        let team = person
            .pointer("/currentTeam/name")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        let team_id = person.pointer("/currentTeam/id").and_then(Value::as_i64);

        let recent = match team_id {
            Some(team_id) => self.recent_performance(player_id, team_id).await,
            None => None,
        };

        let age = match person.get("currentAge").and_then(Value::as_i64) {
            Some(age) => age.to_string(),
            None => format::calculate_age(
                person.get("birthDate").and_then(Value::as_str).unwrap_or(""),
            ),
        };

        Ok(Some(FormattedPlayerData {
            recent_games: format::format_recent_games(recent.as_ref(), pitcher),
            season_stats: format::format_season_stats(&hitting, &pitching, pitcher, season),
            context: format::generate_context(&team, &hitting),
            advanced: format::format_advanced_metrics(&hitting, &pitching, pitcher),
            player_info: PlayerInfo {
                position: person
                    .pointer("/primaryPosition/abbreviation")
                    .and_then(Value::as_str)
                    .unwrap_or("N/A")
                    .to_string(),
                team: if team.is_empty() { "N/A".to_string() } else { team },
                age,
            },
            last_updated: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }))
    }

    /// Resolve a free-text name to a provider player ID. Direct lookup first,
    /// then each name variation until one matches.
    async fn resolve_player_id(&self, name: &str) -> Result<Option<i64>> {
        let players = self.provider.search_players(name).await?;
        if let Some(first) = players.first() {
            return Ok(Some(first.id));
        }

        for variation in name_variations(name) {
            let players = self.provider.search_players(&variation).await?;
            if let Some(first) = players.first() {
                return Ok(Some(first.id));
            }
        }
        Ok(None)
    }

    /// Aggregate the player's batting lines over the team's last games.
    ///
    /// A game whose boxscore fetch fails is skipped; partial aggregates are
    /// acceptable. Returns None when no batting line was found at all.
    async fn recent_performance(
        &self,
        player_id: i64,
        team_id: i64,
    ) -> Option<RecentPerformance> {
        let end = Utc::now().date_naive();
        let start = end - Duration::days(RECENT_WINDOW_DAYS);

        let schedule = match self.provider.schedule(team_id, start, end).await {
            Ok(schedule) => schedule,
            Err(e) => {
                error!("Error extracting recent performance: {e}");
                return None;
            }
        };

        let window_start = schedule.len().saturating_sub(RECENT_GAMES_ATTEMPTED);
        let mut perf = RecentPerformance {
            attempted: RECENT_GAMES_ATTEMPTED as u32,
            ..Default::default()
        };

        for game in &schedule[window_start..] {
            let boxscore = match self.provider.boxscore(game.game_pk).await {
                Ok(boxscore) => boxscore,
                Err(e) => {
                    warn!(
                        "Error getting boxscore for game {} ({}): {e}",
                        game.game_pk, game.game_date
                    );
                    continue;
                }
            };

            let side = if game.away_team_id == Some(team_id) {
                "away"
            } else if game.home_team_id == Some(team_id) {
                "home"
            } else {
                continue;
            };
            let batting = boxscore
                .pointer(&format!("/teams/{side}/players/ID{player_id}/stats/batting"));

            // Players on the roster who did not bat carry an empty stats map.
            let Some(batting) = batting.filter(|b| {
                b.as_object().map(|m| !m.is_empty()).unwrap_or(false)
            }) else {
                continue;
            };

            perf.games += 1;
            perf.ab += format::stat_u64(batting, "atBats") as u32;
            perf.hits += format::stat_u64(batting, "hits") as u32;
            perf.hr += format::stat_u64(batting, "homeRuns") as u32;
            perf.rbi += format::stat_u64(batting, "rbi") as u32;
        }

        if perf.games == 0 {
            return None;
        }

        perf.avg = if perf.ab > 0 {
            ((perf.hits as f64 / perf.ab as f64) * 1000.0).round() / 1000.0
        } else {
            0.0
        };
        Some(perf)
    }
}

/// Lookup variations for a name that failed direct resolution:
/// the "jr" suffix stripped, first+last only for 3+ token names, and the
/// two tokens swapped for exactly-2-token names.
pub fn name_variations(name: &str) -> Vec<String> {
    let normalized = name.trim().to_lowercase();
    let parts: Vec<&str> = normalized.split_whitespace().collect();
    let mut variations: Vec<String> = Vec::new();

    if let Some((last, rest)) = parts.split_last() {
        if (*last == "jr" || *last == "jr.") && !rest.is_empty() {
            variations.push(rest.join(" "));
        }
    }

    if parts.len() >= 3 {
        variations.push(format!("{} {}", parts[0], parts[parts.len() - 1]));
    }

    if parts.len() == 2 {
        variations.push(format!("{} {}", parts[1], parts[0]));
    }

    variations.retain(|v| *v != normalized);
    variations.dedup();
    variations
}

/// Pull one stat group ("hitting"/"pitching"/"fielding") out of a hydrated
/// person record. Missing groups come back as an empty object.
fn season_group(person: &Value, group: &str) -> Value {
    person
        .get("stats")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find(|entry| {
            entry.pointer("/group/displayName").and_then(Value::as_str) == Some(group)
        })
        .and_then(|entry| entry.pointer("/splits/0/stat"))
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()))
}

fn current_season() -> i32 {
    Utc::now().year()
}
