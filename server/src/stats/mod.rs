pub mod cache;
pub mod format;
pub mod mlb;
pub mod service;
pub mod types;

pub use cache::TtlCache;
pub use mlb::MlbClient;
pub use service::StatsService;
