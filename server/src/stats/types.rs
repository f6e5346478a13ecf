use serde::{Deserialize, Serialize};

/// Position/team/age block embedded in formatted player data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub position: String,
    pub team: String,
    pub age: String,
}

impl Default for PlayerInfo {
    fn default() -> Self {
        Self {
            position: "N/A".to_string(),
            team: "N/A".to_string(),
            age: "N/A".to_string(),
        }
    }
}

/// Presentation-ready player data. Built once on a cache miss and never
/// mutated afterwards; responses receive clones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormattedPlayerData {
    pub recent_games: String,
    pub season_stats: String,
    pub context: String,
    pub advanced: String,
    pub player_info: PlayerInfo,
    pub last_updated: String,
}

/// One row of a player search result, as exposed on the /search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: i64,
    pub full_name: String,
    pub position: String,
    pub team: String,
    pub active: bool,
}

/// Aggregate of the player's batting lines over the recent-game window.
///
/// `attempted` is the number of games the extractor tried to cover (the
/// last-10 window), independent of how many boxscores actually contained
/// the player.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecentPerformance {
    pub games: u32,
    pub attempted: u32,
    pub ab: u32,
    pub hits: u32,
    pub hr: u32,
    pub rbi: u32,
    pub avg: f64,
}

/// A single game from a team schedule, reduced to what the recent-performance
/// extractor needs.
#[derive(Debug, Clone)]
pub struct ScheduledGame {
    pub game_pk: i64,
    pub game_date: String,
    pub away_team_id: Option<i64>,
    pub home_team_id: Option<i64>,
}

/// A team as returned by the provider team listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSummary {
    pub id: i64,
    pub name: String,
}

/// One roster slot, as exposed on the /team roster endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: i64,
    pub full_name: String,
    pub position: String,
    pub jersey_number: String,
    pub status: String,
}
