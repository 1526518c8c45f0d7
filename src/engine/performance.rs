use std::collections::{BTreeMap, BTreeSet};

use crate::engine::attempt::AttemptStore;

pub const WEAK_ACCURACY_THRESHOLD: f64 = 0.7;
const WEAK_MIN_QUESTIONS: usize = 5;

/// Derived per-question statistics. Recomputed on demand from the attempt
/// history; never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionPerformance {
    pub question_id: String,
    pub category: String,
    pub times_seen: usize,
    pub times_correct: usize,
    pub times_incorrect: usize,
    pub accuracy: f64,
    pub average_time_secs: f64,
    pub weight: u32,
}

impl QuestionPerformance {
    #[allow(dead_code)]
    pub fn tier(&self) -> MasteryTier {
        MasteryTier::classify(self.times_correct, self.times_incorrect)
    }
}

/// Mastery tiers driving selection weight. Incorrect count dominates: two or
/// more misses mark a question as struggling no matter how many correct
/// answers have accumulated since.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MasteryTier {
    Unseen,
    StrugglingTwicePlus,
    MissedOnce,
    CorrectOnce,
    CorrectTwice,
    Mastered,
}

impl MasteryTier {
    pub fn classify(times_correct: usize, times_incorrect: usize) -> Self {
        if times_correct == 0 && times_incorrect == 0 {
            return MasteryTier::Unseen;
        }
        if times_incorrect >= 2 {
            return MasteryTier::StrugglingTwicePlus;
        }
        if times_incorrect == 1 && times_correct == 0 {
            return MasteryTier::MissedOnce;
        }
        match times_correct {
            1 => MasteryTier::CorrectOnce,
            2 => MasteryTier::CorrectTwice,
            _ => MasteryTier::Mastered,
        }
    }

    pub fn weight(self) -> u32 {
        match self {
            MasteryTier::Unseen | MasteryTier::StrugglingTwicePlus => 10,
            MasteryTier::MissedOnce => 8,
            MasteryTier::CorrectOnce => 5,
            MasteryTier::CorrectTwice => 3,
            MasteryTier::Mastered => 1,
        }
    }
}

/// Derived per-category statistics.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryPerformance {
    pub category: String,
    pub questions_answered: usize,
    pub total_attempts: usize,
    pub correct_attempts: usize,
    pub accuracy: f64,
    pub is_weak: bool,
}

/// Pure read-only aggregation over an attempt store. Holds no state of its
/// own; every query scans the history snapshot it was constructed over.
pub struct PerformanceAggregator<'a> {
    store: &'a dyn AttemptStore,
}

impl<'a> PerformanceAggregator<'a> {
    pub fn new(store: &'a dyn AttemptStore) -> Self {
        Self { store }
    }

    /// Statistics for one question. Absence of attempts is a valid zero
    /// state, not a failure. The category is carried through as a label.
    pub fn performance_for(&self, question_id: &str, category: &str) -> QuestionPerformance {
        let attempts = self.store.attempts_for_question(question_id);
        let times_seen = attempts.len();
        let times_correct = attempts.iter().filter(|a| a.correct).count();
        let times_incorrect = times_seen - times_correct;

        let accuracy = if times_seen == 0 {
            0.0
        } else {
            times_correct as f64 / times_seen as f64
        };
        let average_time_secs = if times_seen == 0 {
            0.0
        } else {
            attempts.iter().map(|a| a.time_taken_secs).sum::<f64>() / times_seen as f64
        };

        QuestionPerformance {
            question_id: question_id.to_string(),
            category: category.to_string(),
            times_seen,
            times_correct,
            times_incorrect,
            accuracy,
            average_time_secs,
            weight: MasteryTier::classify(times_correct, times_incorrect).weight(),
        }
    }

    #[allow(dead_code)]
    pub fn category_performance_for(&self, category: &str) -> CategoryPerformance {
        let attempts = self.store.attempts_for_category(category);
        let questions_answered = attempts
            .iter()
            .map(|a| a.question_id.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        let total_attempts = attempts.len();
        let correct_attempts = attempts.iter().filter(|a| a.correct).count();
        build_category(category, questions_answered, total_attempts, correct_attempts)
    }

    /// One pass over the history, grouped by category, name-ordered.
    pub fn all_category_performance(&self) -> BTreeMap<String, CategoryPerformance> {
        let mut grouped: BTreeMap<&str, (BTreeSet<&str>, usize, usize)> = BTreeMap::new();
        for attempt in self.store.all_attempts() {
            let entry = grouped.entry(attempt.category.as_str()).or_default();
            entry.0.insert(attempt.question_id.as_str());
            entry.1 += 1;
            if attempt.correct {
                entry.2 += 1;
            }
        }

        grouped
            .into_iter()
            .map(|(category, (questions, total, correct))| {
                (
                    category.to_string(),
                    build_category(category, questions.len(), total, correct),
                )
            })
            .collect()
    }

    /// Weak categories, worst accuracy first. The sort is stable, so ties
    /// keep the name order of the underlying mapping.
    pub fn weak_categories(&self) -> Vec<CategoryPerformance> {
        let mut weak: Vec<CategoryPerformance> = self
            .all_category_performance()
            .into_values()
            .filter(|c| c.is_weak)
            .collect();
        weak.sort_by(|a, b| {
            a.accuracy
                .partial_cmp(&b.accuracy)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        weak
    }

    /// Total answered / correct counts across the whole history.
    pub fn totals(&self) -> (usize, usize) {
        let attempts = self.store.all_attempts();
        let correct = attempts.iter().filter(|a| a.correct).count();
        (attempts.len(), correct)
    }

    /// Distinct question ids attempted at least once.
    pub fn questions_seen(&self) -> usize {
        self.store
            .all_attempts()
            .iter()
            .map(|a| a.question_id.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

fn build_category(
    category: &str,
    questions_answered: usize,
    total_attempts: usize,
    correct_attempts: usize,
) -> CategoryPerformance {
    let accuracy = if total_attempts == 0 {
        0.0
    } else {
        correct_attempts as f64 / total_attempts as f64
    };
    CategoryPerformance {
        category: category.to_string(),
        questions_answered,
        total_attempts,
        correct_attempts,
        accuracy,
        is_weak: questions_answered >= WEAK_MIN_QUESTIONS && accuracy < WEAK_ACCURACY_THRESHOLD,
    }
}
