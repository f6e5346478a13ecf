//! Heuristic player-name extraction from free-text questions.
//!
//! Best-effort by design: candidates are generated from capitalization
//! patterns and sliding word windows, then confirmed against the player
//! search API. False negatives are expected and acceptable.

use regex::Regex;
use std::sync::OnceLock;

use crate::stats::format::title_case;
use crate::stats::mlb::StatsProvider;
use crate::stats::service::StatsService;

/// Phrases that match the name shape but never name a player.
const STOP_PHRASES: &[&str] = &[
    "home runs",
    "batting average",
    "runs batted",
    "how many",
    "what is",
    "who has",
];

/// Leading words that mark a candidate as question scaffolding, not a name.
const COMMAND_WORDS: &[&str] = &[
    "what", "who", "how", "is", "are", "was", "does", "did", "show", "tell", "compare", "give",
    "many",
];

/// At most this many confirmed players are returned.
const MAX_PLAYERS: usize = 2;

fn capitalized_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Z][a-z]+ [A-Z][a-z]+(?:\s+[A-Z][a-z]+)*").expect("valid name regex")
    })
}

/// Generate candidate names: explicit capitalized sequences first, then 2-
/// and 3-word title-cased windows over punctuation-stripped tokens (for
/// all-lowercase questions).
pub fn candidate_names(question: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    for m in capitalized_name_re().find_iter(question) {
        push_unique(&mut candidates, m.as_str().trim().to_string());
    }

    let words: Vec<String> = question
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| !w.is_empty())
        .collect();

    for i in 0..words.len() {
        if i + 1 < words.len() {
            push_unique(
                &mut candidates,
                title_case(&format!("{} {}", words[i], words[i + 1])),
            );
        }
        if i + 2 < words.len() {
            push_unique(
                &mut candidates,
                title_case(&format!("{} {} {}", words[i], words[i + 1], words[i + 2])),
            );
        }
    }

    candidates
}

/// Reject candidates from the stop-phrase list or starting with a command
/// word.
pub fn is_plausible_name(candidate: &str) -> bool {
    let lower = candidate.to_lowercase();
    if STOP_PHRASES.contains(&lower.as_str()) {
        return false;
    }

    let first = lower.split_whitespace().next().unwrap_or("");
    !COMMAND_WORDS.contains(&first)
}

/// Extract up to two player names from `question`, confirmed against the
/// player search API.
pub async fn extract_player_names<P: StatsProvider>(
    question: &str,
    stats: &StatsService<P>,
) -> Vec<String> {
    let mut confirmed: Vec<String> = Vec::new();

    for candidate in candidate_names(question) {
        if !is_plausible_name(&candidate) {
            continue;
        }

        if !stats.search_players(&candidate, 5).await.is_empty() {
            push_unique(&mut confirmed, candidate);
            if confirmed.len() >= MAX_PLAYERS {
                break;
            }
        }
    }

    confirmed
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalized_names_found_first() {
        let candidates = candidate_names("How many home runs does Aaron Judge have?");
        assert_eq!(candidates[0], "Aaron Judge");
    }

    #[test]
    fn test_three_word_capitalized_name() {
        let candidates = candidate_names("Is Vladimir Guerrero Jr having a good season?");
        assert!(candidates.contains(&"Vladimir Guerrero Jr".to_string()));
    }

    #[test]
    fn test_lowercase_questions_produce_windows() {
        let candidates = candidate_names("how is mike trout doing?");
        assert!(candidates.contains(&"Mike Trout".to_string()));
        assert!(candidates.contains(&"Is Mike Trout".to_string()));
    }

    #[test]
    fn test_punctuation_stripped_from_tokens() {
        let candidates = candidate_names("stats for shohei ohtani, please");
        assert!(candidates.contains(&"Shohei Ohtani".to_string()));
    }

    #[test]
    fn test_stop_phrases_rejected() {
        assert!(!is_plausible_name("Home Runs"));
        assert!(!is_plausible_name("Batting Average"));
        assert!(!is_plausible_name("How Many"));
    }

    #[test]
    fn test_command_word_prefix_rejected() {
        assert!(!is_plausible_name("Is Mike Trout"));
        assert!(!is_plausible_name("Compare Judge Trout"));
        assert!(is_plausible_name("Mike Trout"));
        assert!(is_plausible_name("Ken Griffey Jr"));
    }
}
