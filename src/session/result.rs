use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::attempt::Attempt;
use crate::session::quiz::QuizState;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub category: String,
    pub correct: bool,
    pub time_secs: f64,
}

/// Finished (or abandoned) quiz summary. A partial quiz still produces a
/// result over the questions actually answered.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizResult {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub accuracy: f64,
    pub elapsed_secs: f64,
    pub timestamp: DateTime<Utc>,
    pub outcomes: Vec<QuestionOutcome>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub partial: bool,
}

impl QuizResult {
    pub fn from_quiz(quiz: &QuizState, category: Option<&str>) -> Self {
        let outcomes: Vec<QuestionOutcome> = quiz
            .answers
            .iter()
            .map(|a| QuestionOutcome {
                question_id: a.question_id.clone(),
                category: a.category.clone(),
                correct: a.correct,
                time_secs: a.time_secs,
            })
            .collect();

        let total = outcomes.len();
        let correct = outcomes.iter().filter(|o| o.correct).count();
        let accuracy = if total > 0 {
            (correct as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        } else {
            100.0
        };

        Self {
            total,
            correct,
            incorrect: total - correct,
            accuracy,
            elapsed_secs: quiz.elapsed_secs(),
            timestamp: Utc::now(),
            outcomes,
            category: category.map(str::to_string),
            partial: !quiz.is_complete(),
        }
    }

    /// Convert each outcome into an attempt record, stamped with the quiz
    /// timestamp.
    pub fn to_attempts(&self) -> Vec<Attempt> {
        self.outcomes
            .iter()
            .map(|o| Attempt {
                question_id: o.question_id.clone(),
                category: o.category.clone(),
                correct: o.correct,
                timestamp: self.timestamp,
                time_taken_secs: o.time_secs,
            })
            .collect()
    }
}
