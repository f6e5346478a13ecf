//! Prompt templates for player analysis and comparison.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::stats::types::FormattedPlayerData;

/// Single-player analysis prompt: all four formatted fields plus player info,
/// five labeled sections, 300-word budget.
pub fn analysis_prompt(player_name: &str, player_data: &Value, now: DateTime<Utc>) -> String {
    let field = |key: &str, default: &str| -> String {
        player_data
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };
    let info = |key: &str| -> String {
        player_data
            .pointer(&format!("/player_info/{key}"))
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_string()
    };

    format!(
        "You are a professional baseball analyst with expertise in modern analytics and player evaluation. Analyze this player's current performance:\n\
        \n\
        Player: {player}\n\
        Date: {date}\n\
        \n\
        PERFORMANCE DATA:\n\
        Recent Games: {recent}\n\
        Season Stats: {season}\n\
        Context: {context}\n\
        Advanced Metrics: {advanced}\n\
        \n\
        PLAYER INFO:\n\
        Position: {position}\n\
        Team: {team}\n\
        Age: {age}\n\
        \n\
        ANALYSIS REQUIREMENTS:\n\
        Provide a comprehensive analysis covering:\n\
        \n\
        1. **Current Form Assessment**: Evaluate recent performance trends and hot/cold streaks\n\
        2. **Season Performance**: How they're performing relative to expectations and career norms\n\
        3. **Strengths & Concerns**: Key positive trends and areas of worry\n\
        4. **Fantasy/Betting Insights**: Actionable insights for fantasy players and sports bettors\n\
        5. **Key Takeaway**: One-sentence bottom line assessment\n\
        \n\
        IMPORTANT GUIDELINES:\n\
        - Use specific statistical context when available\n\
        - Compare to league averages where relevant (league avg batting ~.248, ERA ~4.00)\n\
        - Consider position and age context\n\
        - Be engaging but analytically rigorous\n\
        - Keep total response under 300 words\n\
        - Focus on actionable insights\n\
        \n\
        Provide your analysis now:",
        player = crate::stats::format::title_case(player_name),
        date = now.format("%B %Y"),
        recent = field("recent_games", "No recent data available"),
        season = field("season_stats", "Season stats unavailable"),
        context = field("context", "No additional context"),
        advanced = field("advanced", "Advanced metrics unavailable"),
        position = info("position"),
        team = info("team"),
        age = info("age"),
    )
}

/// Head-to-head comparison prompt around a pre-rendered comparison block,
/// 250-word budget.
pub fn comparison_prompt(comparison_data: &str) -> String {
    format!(
        "You are a professional baseball analyst. Provide a detailed comparison analysis:\n\
        \n\
        {comparison_data}\n\
        \n\
        COMPARISON ANALYSIS REQUIREMENTS:\n\
        1. **Head-to-Head Stats**: Direct statistical comparison\n\
        2. **Strengths of Each Player**: What each player does better\n\
        3. **Current Form**: Who's performing better recently\n\
        4. **Context Considerations**: Age, team, position factors\n\
        5. **Bottom Line**: Which player you'd prefer and why\n\
        \n\
        Keep analysis under 250 words and focus on practical insights for fantasy and betting decisions."
    )
}

/// Render two players' formatted data into the comparison block the
/// comparison prompt wraps.
pub fn comparison_block(
    first_name: &str,
    first: &FormattedPlayerData,
    second_name: &str,
    second: &FormattedPlayerData,
    stat_focus: Option<&str>,
) -> String {
    let mut block = format!(
        "PLAYER COMPARISON: {a} vs {b}\n\
        \n\
        {a}:\n{a_data}\n\
        \n\
        {b}:\n{b_data}",
        a = crate::stats::format::title_case(first_name),
        b = crate::stats::format::title_case(second_name),
        a_data = player_block(first),
        b_data = player_block(second),
    );

    if let Some(focus) = stat_focus {
        if !focus.trim().is_empty() {
            block.push_str(&format!("\n\nSTAT FOCUS: {}", focus.trim()));
        }
    }
    block
}

fn player_block(data: &FormattedPlayerData) -> String {
    format!(
        "- Season: {}\n\
         - Recent: {}\n\
         - Context: {}\n\
         - Advanced: {}\n\
         - Position: {} | Team: {} | Age: {}",
        data.season_stats,
        data.recent_games,
        data.context,
        data.advanced,
        data.player_info.position,
        data.player_info.team,
        data.player_info.age,
    )
}
