use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::engine::attempt::Attempt;

const SCHEMA_VERSION: u32 = 1;

/// Persisted profile: lifetime answered/correct counters plus practice
/// streak tracking. The counters duplicate what the attempt history can
/// derive and must stay consistent with it; they exist so the readiness
/// report can be produced without replaying every attempt.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileData {
    pub schema_version: u32,
    pub total_answered: u64,
    pub total_correct: u64,
    pub quizzes_taken: u32,
    pub streak_days: u32,
    pub best_streak: u32,
    pub last_practice_date: Option<String>,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            total_answered: 0,
            total_correct: 0,
            quizzes_taken: 0,
            streak_days: 0,
            best_streak: 0,
            last_practice_date: None,
        }
    }
}

impl ProfileData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttemptHistoryData {
    pub schema_version: u32,
    pub attempts: Vec<Attempt>,
}

impl Default for AttemptHistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            attempts: Vec::new(),
        }
    }
}

pub const EXPORT_VERSION: u32 = 1;

/// Export contract: the attempt history is the source of truth; everything
/// the engine derives (per-question stats, readiness) is rebuilt from it and
/// never exported.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub permitdrill_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub config: Config,
    pub profile: ProfileData,
    pub attempts: AttemptHistoryData,
}
