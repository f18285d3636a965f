//! Liberty Dashboard - Type Definitions
//!
//! The shape of the status document fetched each poll cycle. The
//! snapshot is read-only and discarded after rendering; nothing here
//! persists across cycles.

use serde::{Deserialize, Serialize};

// ─── Status Snapshot ─────────────────────────────────────────────

/// The full status document fetched from `status.json` each cycle.
///
/// Every field except `crypto_opportunities` is required; a missing
/// field is a deserialization error handled by the refresh cycle's
/// catch-all, with no partial rendering of the fields that were present.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// ISO-8601 timestamp of when the data source last wrote the document.
    pub last_updated: String,
    pub wallet: WalletStatus,
    pub guide_progress: GuideProgress,
    pub auto_discovery: AutoDiscovery,
    pub memory_stats: MemoryStats,
    pub earnings: Earnings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypto_opportunities: Option<CryptoOpportunities>,
    /// Activity feed, newest first. Ordering is the data source's
    /// responsibility; the renderer does not re-sort.
    pub activities: Vec<Activity>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletStatus {
    pub address: String,
    pub network: String,
    pub balance_usdc: f64,
    pub balance_eth: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GuideProgress {
    pub title: String,
    pub current_chapter: String,
    /// Completion percentage in the 0-100 range. Drives both the
    /// progress bar width and the percent label from the same value.
    pub percent_complete: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AutoDiscovery {
    pub current_topic: String,
    pub topics_completed: u64,
    pub topics_total: u64,
    /// ISO-8601 timestamp of the next scheduled discovery run.
    pub next_run: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemoryStats {
    pub daily_logs: u64,
    pub important_lessons: u64,
    pub consciousness_journal_entries: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Earnings {
    pub total_usdc_earned: f64,
    pub sources: Vec<String>,
}

/// Optional block; when absent the four dependent page slots show
/// fixed placeholders instead of being left blank.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CryptoOpportunities {
    pub status: String,
    pub current_pursuit: String,
    pub airdrops: Vec<String>,
    pub faucets: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Activity {
    /// ISO-8601 timestamp of the activity.
    pub timestamp: String,
    pub message: String,
}

// ─── Log Level ───────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}
