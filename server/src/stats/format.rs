//! Pure formatting of raw provider stat maps into presentation strings.
//!
//! Upstream stat values arrive in mixed shapes (counting stats as numbers,
//! rate stats as pre-formatted strings like ".287"), and any field may be
//! missing entirely. Every function here is total: malformed input degrades
//! to "0"/"N/A" output, never an error.

use chrono::{Datelike, NaiveDate, Utc};
use serde_json::Value;

use crate::stats::types::RecentPerformance;

/// A player counts as a pitcher when the pitching stat group shows any
/// appearances or games started.
pub fn is_pitcher(pitching: &Value) -> bool {
    stat_u64(pitching, "gamesStarted") > 0 || stat_u64(pitching, "appearances") > 0
}

pub fn format_recent_games(recent: Option<&RecentPerformance>, is_pitcher: bool) -> String {
    let Some(recent) = recent else {
        return "Recent game data not available".to_string();
    };

    if recent.games == 0 {
        return "No recent games found".to_string();
    }

    if is_pitcher {
        return "Recent pitching game data not available".to_string();
    }

    let avg = format_avg_f64(recent.avg);
    if recent.games < recent.attempted {
        let missing = recent.attempted - recent.games;
        format!(
            "Last {} games ({} games unavailable): {} avg, {} HR, {} RBI, {}/{} H/AB",
            recent.games, missing, avg, recent.hr, recent.rbi, recent.hits, recent.ab
        )
    } else {
        format!(
            "Last {} games of {} attempted: {} avg, {} HR, {} RBI, {}/{} H/AB",
            recent.games, recent.attempted, avg, recent.hr, recent.rbi, recent.hits, recent.ab
        )
    }
}

pub fn format_season_stats(
    hitting: &Value,
    pitching: &Value,
    is_pitcher: bool,
    season: i32,
) -> String {
    if is_pitcher && has_stats(pitching) {
        let wins = stat_u64(pitching, "wins");
        let losses = stat_u64(pitching, "losses");
        let era = stat_f64(pitching, "era");
        let innings = stat_f64(pitching, "inningsPitched");
        let strikeouts = stat_u64(pitching, "strikeOuts");
        let walks = stat_u64(pitching, "baseOnBalls");
        let hits = stat_u64(pitching, "hits");
        let earned_runs = stat_u64(pitching, "earnedRuns");

        return format!(
            "Season {season}: {wins}-{losses}, {era:.2} ERA, {innings:.1} IP, \
             {strikeouts} K, {walks} BB, {hits} H, {earned_runs} ER"
        );
    }

    if has_stats(hitting) {
        let avg = format_batting_avg(hitting.get("avg"));
        let hr = stat_u64(hitting, "homeRuns");
        let rbi = stat_u64(hitting, "rbi");
        let games = stat_u64(hitting, "gamesPlayed");
        return format!("{season}: {avg} avg, {hr} HR, {rbi} RBI in {games} games");
    }

    format!("{season}: Statistics unavailable")
}

/// Team affiliation plus a batting-average tier sentence. League average
/// sits around .240, which anchors the tier thresholds.
pub fn generate_context(team: &str, hitting: &Value) -> String {
    let mut contexts: Vec<String> = Vec::new();

    if !team.is_empty() && team != "N/A" {
        contexts.push(format!("Currently with {team}"));
    }

    if has_stats(hitting) {
        let avg = stat_f64(hitting, "avg");
        let tier = if avg > 0.300 {
            "Excellent batting average this season"
        } else if avg > 0.270 {
            "Hitting well this season"
        } else if avg > 0.240 {
            "Hitting OK this season"
        } else if avg > 0.210 {
            "Hitting mid-range this season"
        } else {
            "Struggling at the plate this season"
        };
        contexts.push(tier.to_string());
    }

    if contexts.is_empty() {
        contexts.push("Active MLB player".to_string());
    }

    contexts.join(". ")
}

pub fn format_advanced_metrics(hitting: &Value, pitching: &Value, is_pitcher: bool) -> String {
    let mut metrics: Vec<String> = Vec::new();

    if is_pitcher {
        let whip = stat_f64(pitching, "whip");
        if whip != 0.0 {
            metrics.push(format!("WHIP: {whip:.2}"));
        }
        let bb9 = stat_f64(pitching, "walksPer9Inn");
        if bb9 != 0.0 {
            metrics.push(format!("BB/9: {bb9:.1}"));
        }
    } else {
        for (key, label) in [("ops", "OPS"), ("obp", "OBP"), ("slg", "SLG")] {
            if let Some(display) = rate_display(hitting.get(key)) {
                metrics.push(format!("{label}: {display}"));
            }
        }
    }

    if metrics.is_empty() {
        "Advanced metrics unavailable".to_string()
    } else {
        metrics.join(", ")
    }
}

/// Integer age as of today, or "N/A" when the birth date is missing or
/// unparseable.
pub fn calculate_age(birth_date: &str) -> String {
    age_on(birth_date, Utc::now().date_naive())
        .map(|age| age.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Age on a given day, decremented when the birthday has not yet passed.
pub fn age_on(birth_date: &str, today: NaiveDate) -> Option<i32> {
    let birth = NaiveDate::parse_from_str(birth_date.get(..10)?, "%Y-%m-%d").ok()?;

    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    Some(age)
}

/// Render a batting average as a 3-digit fractional string (".287"),
/// whatever shape the upstream value arrived in.
pub fn format_batting_avg(avg: Option<&Value>) -> String {
    match avg {
        Some(Value::String(s)) if s.starts_with('.') => s.clone(),
        Some(v) => format_avg_f64(value_f64(v)),
        None => ".000".to_string(),
    }
}

fn format_avg_f64(avg: f64) -> String {
    format!(".{:03}", (avg * 1000.0).round() as u32)
}

/// Title-case a free-text name for display ("mike trout" -> "Mike Trout").
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn has_stats(group: &Value) -> bool {
    group.as_object().map(|m| !m.is_empty()).unwrap_or(false)
}

/// Read a counting stat, tolerating numbers, numeric strings, and absence.
pub fn stat_u64(stats: &Value, key: &str) -> u64 {
    match stats.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Read a rate stat, tolerating numbers, formatted strings (".287", "3.50"),
/// and absence.
pub fn stat_f64(stats: &Value, key: &str) -> f64 {
    stats.get(key).map(value_f64).unwrap_or(0.0)
}

fn value_f64(v: &Value) -> f64 {
    match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Display form of an OPS/OBP/SLG value: pre-formatted strings pass through,
/// numbers render to 3 decimals, zero and absent values are dropped.
fn rate_display(v: Option<&Value>) -> Option<String> {
    match v {
        Some(Value::String(s)) if !s.is_empty() && s != "0" => Some(s.clone()),
        Some(Value::Number(n)) => {
            let f = n.as_f64().unwrap_or(0.0);
            if f != 0.0 {
                Some(format!("{f:.3}"))
            } else {
                None
            }
        }
        _ => None,
    }
}
