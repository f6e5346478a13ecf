pub mod extract;
pub mod openai;
pub mod prompt;
pub mod qa;

pub use openai::{CompletionClient, CompletionError, OpenAiClient};

use anyhow::Context;
use chrono::Utc;
use serde_json::Value;
use tracing::{error, warn};

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 300;
const MAX_RETRIES: u32 = 2;
/// Responses at or below this length count as failed attempts.
const MIN_ANALYSIS_CHARS: usize = 50;

const AUTH_ERROR_TEXT: &str =
    "Analysis service authentication error - please check API configuration";
const BUSY_TEXT: &str = "Analysis service temporarily busy - please try again in a moment";
const SERVICE_ERROR_TEXT: &str = "Analysis service error - please try again later";
const EXHAUSTED_TEXT: &str = "Unable to generate analysis after multiple attempts";

/// Narrative analysis over formatted player data.
///
/// Every path out of [`Analyzer::analyze`] is a user-readable string; no
/// failure propagates to the HTTP layer.
pub struct Analyzer<C: CompletionClient> {
    client: C,
    max_retries: u32,
}

impl<C: CompletionClient> Analyzer<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            max_retries: MAX_RETRIES,
        }
    }

    /// Generate an analysis for `player_data` (a formatted player record, or
    /// a `{"comparison_data": ...}` record for comparison mode).
    pub async fn analyze(&self, player_name: &str, player_data: &Value) -> String {
        match self.run(player_name, player_data).await {
            Ok(analysis) => analysis,
            Err(e) => {
                error!("Error analyzing player {player_name}: {e}");
                error_analysis(player_name, &e.to_string())
            }
        }
    }

    async fn run(&self, player_name: &str, player_data: &Value) -> anyhow::Result<String> {
        if !validate_player_data(player_data) {
            return Ok(fallback_analysis(player_name));
        }

        let prompt = match player_data.get("comparison_data") {
            Some(comparison) => {
                let comparison = comparison
                    .as_str()
                    .context("comparison_data must be a string")?;
                prompt::comparison_prompt(comparison)
            }
            None => prompt::analysis_prompt(player_name, player_data, Utc::now()),
        };

        let analysis = self.completion_with_retries(&prompt).await;

        if analysis.trim().len() < MIN_ANALYSIS_CHARS {
            return Ok(fallback_analysis(player_name));
        }
        Ok(analysis)
    }

    /// Bounded-retry completion call. Auth failures abort immediately; rate
    /// limits and other errors retry until attempts are exhausted; responses
    /// too short to be useful count as failed attempts.
    async fn completion_with_retries(&self, prompt: &str) -> String {
        for attempt in 0..=self.max_retries {
            match self.client.complete(prompt, TEMPERATURE, MAX_TOKENS).await {
                Ok(content) => {
                    if content.len() > MIN_ANALYSIS_CHARS {
                        return content;
                    }
                    warn!("Short completion response (attempt {})", attempt + 1);
                }
                Err(CompletionError::Auth(e)) => {
                    error!("Completion authentication failed: {e}");
                    return AUTH_ERROR_TEXT.to_string();
                }
                Err(CompletionError::RateLimited(e)) => {
                    warn!("Rate limit hit (attempt {}): {e}", attempt + 1);
                    if attempt == self.max_retries {
                        return BUSY_TEXT.to_string();
                    }
                }
                Err(e) => {
                    error!("Unexpected completion error (attempt {}): {e}", attempt + 1);
                    if attempt == self.max_retries {
                        return SERVICE_ERROR_TEXT.to_string();
                    }
                }
            }
        }
        EXHAUSTED_TEXT.to_string()
    }
}

/// A record is analyzable when it carries at least one of the four formatted
/// fields, or a comparison block.
pub fn validate_player_data(player_data: &Value) -> bool {
    let Some(map) = player_data.as_object() else {
        return false;
    };

    if map.contains_key("comparison_data") {
        return true;
    }

    ["recent_games", "season_stats", "context", "advanced"]
        .iter()
        .any(|field| map.contains_key(*field))
}

pub fn fallback_analysis(player_name: &str) -> String {
    format!(
        "Unable to provide detailed analysis for {player_name} due to insufficient data. \
         Please try again later."
    )
}

pub fn error_analysis(player_name: &str, error: &str) -> String {
    format!(
        "Error analyzing {player_name}: {error}. \
         Please try again or contact support if the issue persists."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedCompletion {
        responses: Mutex<VecDeque<Result<String, CompletionError>>>,
        calls: AtomicUsize,
        last_prompt: Mutex<String>,
    }

    impl ScriptedCompletion {
        fn new(responses: Vec<Result<String, CompletionError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(String::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedCompletion {
        async fn complete(
            &self,
            prompt: &str,
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = prompt.to_string();
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(CompletionError::Api("script exhausted".to_string())))
        }
    }

    fn long_analysis() -> String {
        "Trout is locked in at the plate right now, squaring up fastballs and \
         drawing walks at an elite clip. Strong buy for fantasy rosters."
            .to_string()
    }

    fn player_record() -> Value {
        json!({
            "recent_games": "Last 10 games of 10 attempted: .300 avg, 2 HR, 8 RBI, 12/40 H/AB",
            "season_stats": "2025: .287 avg, 25 HR, 70 RBI in 110 games",
            "context": "Currently with Los Angeles Angels. Hitting well this season",
            "advanced": "OPS: .934",
            "player_info": { "position": "CF", "team": "Los Angeles Angels", "age": "33" }
        })
    }

    fn rate_limited() -> Result<String, CompletionError> {
        Err(CompletionError::RateLimited("429".to_string()))
    }

    #[tokio::test]
    async fn test_retry_recovers_after_two_rate_limits() {
        let client = ScriptedCompletion::new(vec![
            rate_limited(),
            rate_limited(),
            Ok(long_analysis()),
        ]);
        let analyzer = Analyzer::new(client);

        let result = analyzer.analyze("Mike Trout", &player_record()).await;
        assert_eq!(result, long_analysis());
        assert_eq!(analyzer.client.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_three_rate_limits_return_busy_text() {
        let client =
            ScriptedCompletion::new(vec![rate_limited(), rate_limited(), rate_limited()]);
        let analyzer = Analyzer::new(client);

        let result = analyzer.analyze("Mike Trout", &player_record()).await;
        assert_eq!(result, BUSY_TEXT);
        assert_eq!(analyzer.client.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_auth_failure_aborts_without_retry() {
        let client = ScriptedCompletion::new(vec![
            Err(CompletionError::Auth("401".to_string())),
            Ok(long_analysis()),
        ]);
        let analyzer = Analyzer::new(client);

        let result = analyzer.analyze("Mike Trout", &player_record()).await;
        assert_eq!(result, AUTH_ERROR_TEXT);
        assert_eq!(analyzer.client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_record_skips_completion_entirely() {
        let client = ScriptedCompletion::new(vec![Ok(long_analysis())]);
        let analyzer = Analyzer::new(client);

        let result = analyzer
            .analyze("Mike Trout", &json!({ "unrelated": true }))
            .await;
        assert_eq!(result, fallback_analysis("Mike Trout"));
        assert_eq!(analyzer.client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_persistent_short_responses_fall_back() {
        let client = ScriptedCompletion::new(vec![
            Ok("too short".to_string()),
            Ok(String::new()),
            Ok("nope".to_string()),
        ]);
        let analyzer = Analyzer::new(client);

        // The exhausted-attempts text survives the length post-check
        let result = analyzer.analyze("Mike Trout", &player_record()).await;
        assert_eq!(result, EXHAUSTED_TEXT);
        assert_eq!(analyzer.client.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_generic_errors_degrade_to_fallback() {
        let client = ScriptedCompletion::new(vec![
            Err(CompletionError::Transport("connection reset".to_string())),
            Err(CompletionError::Api("500".to_string())),
            Err(CompletionError::Api("502".to_string())),
        ]);
        let analyzer = Analyzer::new(client);

        // The generic error text is under the minimum length, so the
        // post-check substitutes the fallback analysis.
        let result = analyzer.analyze("Mike Trout", &player_record()).await;
        assert_eq!(result, fallback_analysis("Mike Trout"));
    }

    #[tokio::test]
    async fn test_comparison_mode_uses_comparison_prompt() {
        let client = ScriptedCompletion::new(vec![Ok(long_analysis())]);
        let analyzer = Analyzer::new(client);

        let record = json!({ "comparison_data": "PLAYER COMPARISON: A vs B" });
        let result = analyzer.analyze("A vs B", &record).await;
        assert_eq!(result, long_analysis());

        let prompt = analyzer.client.last_prompt.lock().unwrap().clone();
        assert!(prompt.contains("COMPARISON ANALYSIS REQUIREMENTS"));
        assert!(prompt.contains("PLAYER COMPARISON: A vs B"));
    }

    #[tokio::test]
    async fn test_non_string_comparison_data_becomes_error_analysis() {
        let client = ScriptedCompletion::new(vec![]);
        let analyzer = Analyzer::new(client);

        let record = json!({ "comparison_data": 42 });
        let result = analyzer.analyze("Mike Trout", &record).await;
        assert!(result.starts_with("Error analyzing Mike Trout:"));
    }

    #[test]
    fn test_validate_player_data() {
        assert!(validate_player_data(&player_record()));
        assert!(validate_player_data(&json!({ "season_stats": "x" })));
        assert!(validate_player_data(&json!({ "comparison_data": "x" })));
        assert!(!validate_player_data(&json!({})));
        assert!(!validate_player_data(&json!("not an object")));
        assert!(!validate_player_data(&json!(null)));
    }

    #[test]
    fn test_fixed_strings_survive_length_post_check() {
        for text in [AUTH_ERROR_TEXT, BUSY_TEXT, EXHAUSTED_TEXT] {
            assert!(text.len() >= MIN_ANALYSIS_CHARS, "{text}");
        }
    }
}
