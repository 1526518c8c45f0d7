use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded answer submission for a question. Append-only: attempts are
/// never updated, only added, or deleted in bulk by reset flows.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attempt {
    pub question_id: String,
    pub category: String,
    pub correct: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub time_taken_secs: f64,
}

/// Read-only query surface over recorded attempts. The engine components
/// (aggregation, selection, readiness) take this at construction and never
/// write through it.
pub trait AttemptStore {
    fn all_attempts(&self) -> &[Attempt];

    fn attempts_for_question(&self, question_id: &str) -> Vec<&Attempt> {
        self.all_attempts()
            .iter()
            .filter(|a| a.question_id == question_id)
            .collect()
    }

    fn attempts_for_category(&self, category: &str) -> Vec<&Attempt> {
        self.all_attempts()
            .iter()
            .filter(|a| a.category == category)
            .collect()
    }
}

/// In-memory attempt history. Loaded from the JSON store at startup and
/// persisted back after each quiz.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AttemptHistory {
    attempts: Vec<Attempt>,
}

impl AttemptHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_attempts(attempts: Vec<Attempt>) -> Self {
        Self { attempts }
    }

    pub fn record(&mut self, attempt: Attempt) {
        self.attempts.push(attempt);
    }

    /// Bulk delete, used by reset flows.
    pub fn reset(&mut self) {
        self.attempts.clear();
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }
}

impl AttemptStore for AttemptHistory {
    fn all_attempts(&self) -> &[Attempt] {
        &self.attempts
    }
}
