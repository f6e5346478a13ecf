use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::stats::types::FormattedPlayerData;

/// Cache abstraction for formatted player data.
///
/// The service owns one of these for its lifetime; swapping the
/// implementation (or injecting a pre-seeded one) keeps cache behavior
/// deterministic in tests. All methods take an explicit `now` so freshness
/// never depends on the wall clock of the caller.
pub trait PlayerCache: Send + Sync {
    fn get(&self, key: &str, now: DateTime<Utc>) -> Option<FormattedPlayerData>;
    fn put(&self, key: &str, data: FormattedPlayerData, now: DateTime<Utc>);
    fn is_fresh(&self, key: &str, now: DateTime<Utc>) -> bool;
}

struct CacheEntry {
    data: FormattedPlayerData,
    fetched_at: DateTime<Utc>,
}

/// In-memory TTL cache. An entry is fresh iff `now - fetched_at < ttl`;
/// stale entries are treated as absent and lazily overwritten by the next
/// fetch, never evicted proactively.
pub struct TtlCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }
}

impl PlayerCache for TtlCache {
    fn get(&self, key: &str, now: DateTime<Utc>) -> Option<FormattedPlayerData> {
        let entry = self.entries.get(key)?;
        if now - entry.fetched_at < self.ttl {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    fn put(&self, key: &str, data: FormattedPlayerData, now: DateTime<Utc>) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                data,
                fetched_at: now,
            },
        );
    }

    fn is_fresh(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.entries
            .get(key)
            .map(|entry| now - entry.fetched_at < self.ttl)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::types::PlayerInfo;

    fn sample_data() -> FormattedPlayerData {
        FormattedPlayerData {
            recent_games: "Last 10 games of 10 attempted: .300 avg, 2 HR, 8 RBI, 12/40 H/AB"
                .to_string(),
            season_stats: "2025: .287 avg, 25 HR, 70 RBI in 110 games".to_string(),
            context: "Currently with Los Angeles Angels. Hitting well this season".to_string(),
            advanced: "OPS: .934, OBP: .390, SLG: .544".to_string(),
            player_info: PlayerInfo::default(),
            last_updated: "2025-08-01 12:00:00".to_string(),
        }
    }

    #[test]
    fn test_fresh_hit() {
        let cache = TtlCache::new(Duration::minutes(30));
        let t0 = Utc::now();

        cache.put("player_mike trout", sample_data(), t0);

        let t1 = t0 + Duration::minutes(29);
        assert!(cache.is_fresh("player_mike trout", t1));
        assert!(cache.get("player_mike trout", t1).is_some());
    }

    #[test]
    fn test_stale_entry_treated_as_absent() {
        let cache = TtlCache::new(Duration::minutes(30));
        let t0 = Utc::now();

        cache.put("player_mike trout", sample_data(), t0);

        let t1 = t0 + Duration::minutes(31);
        assert!(!cache.is_fresh("player_mike trout", t1));
        assert!(cache.get("player_mike trout", t1).is_none());
    }

    #[test]
    fn test_missing_key() {
        let cache = TtlCache::new(Duration::minutes(30));
        assert!(cache.get("player_nobody", Utc::now()).is_none());
        assert!(!cache.is_fresh("player_nobody", Utc::now()));
    }

    #[test]
    fn test_put_replaces_whole_entry() {
        let cache = TtlCache::new(Duration::minutes(30));
        let t0 = Utc::now();

        cache.put("player_x", sample_data(), t0);

        let mut newer = sample_data();
        newer.season_stats = "2025: .310 avg, 30 HR, 80 RBI in 120 games".to_string();
        let t1 = t0 + Duration::minutes(45);
        cache.put("player_x", newer, t1);

        let got = cache.get("player_x", t1 + Duration::minutes(1)).unwrap();
        assert!(got.season_stats.contains(".310"));
    }
}
