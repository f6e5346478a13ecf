//! Direct answers to natural-language stat questions.
//!
//! Players are identified via heuristic extraction, their formatted data is
//! fetched through the normal lookup path, and HR/average/RBI questions are
//! answered by capturing the figure straight out of the formatted season
//! line. Anything else gets the full stat line.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::analyzer::extract::extract_player_names;
use crate::stats::mlb::StatsProvider;
use crate::stats::service::StatsService;

#[derive(Debug, Serialize)]
pub struct QuestionAnswer {
    pub answer: String,
    pub players: Vec<String>,
}

fn hr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+) HR").expect("valid HR regex"))
}

fn avg_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\.\d+) avg").expect("valid avg regex"))
}

fn rbi_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+) RBI").expect("valid RBI regex"))
}

pub async fn answer_question<P: StatsProvider>(
    question: &str,
    stats: &StatsService<P>,
) -> QuestionAnswer {
    let found = extract_player_names(question, stats).await;
    if found.is_empty() {
        return QuestionAnswer {
            answer: "I couldn't identify any player names in your question. Please mention a \
                     specific player name (e.g., 'aaron judge', 'Mike Trout', 'shohei ohtani')."
                .to_string(),
            players: Vec::new(),
        };
    }

    let mut player_data = Vec::new();
    for name in &found {
        if let Some(data) = stats.get_player_data(name, None).await {
            player_data.push((name.clone(), data));
        }
    }

    if player_data.is_empty() {
        return QuestionAnswer {
            answer: format!(
                "I couldn't find current data for: {}. They might not be active players or the \
                 name might need adjustment.",
                found.join(", ")
            ),
            players: found,
        };
    }

    let players: Vec<String> = player_data.iter().map(|(name, _)| name.clone()).collect();

    if player_data.len() > 1 {
        let mut answer = "Here are the stats for the players mentioned:\n\n".to_string();
        for (name, data) in &player_data {
            answer.push_str(&format!("{}: {}\n", name, data.season_stats));
        }
        return QuestionAnswer { answer, players };
    }

    let (name, data) = &player_data[0];
    let season = &data.season_stats;
    let question_lower = question.to_lowercase();

    let answer = if contains_any(&question_lower, &["hr", "home run", "homer"]) {
        match hr_re().captures(season).map(|c| c[1].to_string()) {
            Some(hr) => format!("{name} has {hr} home runs this season. Full stats: {season}"),
            None => default_answer(name, data),
        }
    } else if contains_any(&question_lower, &["avg", "average", "batting"]) {
        match avg_re().captures(season).map(|c| c[1].to_string()) {
            Some(avg) => format!("{name} is batting {avg} this season. Full stats: {season}"),
            None => default_answer(name, data),
        }
    } else if contains_any(&question_lower, &["rbi", "runs batted in", "runs batted"]) {
        match rbi_re().captures(season).map(|c| c[1].to_string()) {
            Some(rbi) => format!("{name} has {rbi} RBIs this season. Full stats: {season}"),
            None => default_answer(name, data),
        }
    } else {
        default_answer(name, data)
    };

    QuestionAnswer { answer, players }
}

fn default_answer(name: &str, data: &crate::stats::types::FormattedPlayerData) -> String {
    format!(
        "Here are {name}'s current stats: {}. Recent performance: {}",
        data.season_stats, data.recent_games
    )
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::cache::TtlCache;
    use crate::stats::types::{
        PlayerSummary, RosterEntry, ScheduledGame, TeamSummary,
    };
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};
    use serde_json::{json, Value};

    /// Provider that knows exactly one player.
    struct JudgeOnly;

    #[async_trait]
    impl StatsProvider for JudgeOnly {
        async fn search_players(&self, query: &str) -> Result<Vec<PlayerSummary>> {
            if query.eq_ignore_ascii_case("aaron judge") {
                Ok(vec![PlayerSummary {
                    id: 592450,
                    full_name: "Aaron Judge".to_string(),
                    position: "RF".to_string(),
                    team: "New York Yankees".to_string(),
                    active: true,
                }])
            } else {
                Ok(Vec::new())
            }
        }

        async fn player_detail(&self, _player_id: i64, _season: i32) -> Result<Value> {
            Ok(json!({
                "id": 592450,
                "fullName": "Aaron Judge",
                "currentAge": 33,
                "primaryPosition": { "abbreviation": "RF" },
                "currentTeam": { "id": 147, "name": "New York Yankees" },
                "stats": [{
                    "group": { "displayName": "hitting" },
                    "splits": [{ "stat": {
                        "avg": ".310", "homeRuns": 38, "rbi": 89, "gamesPlayed": 105
                    }}]
                }]
            }))
        }

        async fn schedule(
            &self,
            _team_id: i64,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<ScheduledGame>> {
            Ok(Vec::new())
        }

        async fn boxscore(&self, _game_pk: i64) -> Result<Value> {
            Err(anyhow!("no boxscores"))
        }

        async fn teams(&self) -> Result<Vec<TeamSummary>> {
            Ok(Vec::new())
        }

        async fn roster(&self, _team_id: i64) -> Result<Vec<RosterEntry>> {
            Ok(Vec::new())
        }
    }

    fn service() -> StatsService<JudgeOnly> {
        StatsService::new(JudgeOnly, Box::new(TtlCache::new(Duration::minutes(30))))
    }

    #[tokio::test]
    async fn test_home_run_question_extracts_count() {
        let stats = service();
        let qa = answer_question("How many home runs does Aaron Judge have?", &stats).await;
        assert_eq!(qa.players, vec!["Aaron Judge".to_string()]);
        assert!(qa.answer.contains("has 38 home runs this season"));
        assert!(qa.answer.contains(".310 avg"));
    }

    #[tokio::test]
    async fn test_average_question_extracts_avg() {
        let stats = service();
        let qa = answer_question("what is aaron judge batting right now", &stats).await;
        assert!(qa.answer.contains("is batting .310 this season"));
    }

    #[tokio::test]
    async fn test_no_player_named() {
        let stats = service();
        let qa = answer_question("who leads the league?", &stats).await;
        assert!(qa.players.is_empty());
        assert!(qa.answer.contains("couldn't identify any player names"));
    }
}
