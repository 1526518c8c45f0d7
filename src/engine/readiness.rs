use crate::engine::performance::{PerformanceAggregator, WEAK_ACCURACY_THRESHOLD};

const ACCURACY_WEIGHT: f64 = 0.40;
const COVERAGE_WEIGHT: f64 = 0.30;
const WEAK_AREA_WEIGHT: f64 = 0.30;

// Weak-signal penalty: linear falloff below the weak threshold. At the
// threshold the signal is 1.0; a category at 50% accuracy lands near 0.29.
const WEAK_PENALTY_SLOPE: f64 = 2.5;

const ACCURACY_GOAL: f64 = 0.90;
const READY_PERCENTAGE: u8 = 85;
const NOT_READY_PERCENTAGE: u8 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadinessStatus {
    NotReady,
    AlmostReady,
    Ready,
}

impl ReadinessStatus {
    pub fn from_percentage(percentage: u8) -> Self {
        if percentage >= READY_PERCENTAGE {
            ReadinessStatus::Ready
        } else if percentage > NOT_READY_PERCENTAGE {
            ReadinessStatus::AlmostReady
        } else {
            ReadinessStatus::NotReady
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReadinessStatus::NotReady => "not ready",
            ReadinessStatus::AlmostReady => "almost ready",
            ReadinessStatus::Ready => "ready",
        }
    }
}

/// Composite readiness assessment. Recomputed on every call; deterministic
/// for a given attempt history.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadinessScore {
    pub percentage: u8,
    pub overall_accuracy: f64,
    pub questions_seen: usize,
    pub total_questions: usize,
    pub weakest_category: Option<String>,
    pub weakest_accuracy: f64,
    pub status: ReadinessStatus,
    pub recommendations: Vec<String>,
}

/// Externally persisted answered/correct counters, accepted as an alternative
/// accuracy source. Malformed values (negative, correct > answered) are
/// clamped, never rejected.
#[allow(dead_code)]
#[derive(Clone, Copy, Debug, Default)]
pub struct TotalCounters {
    pub answered: i64,
    pub correct: i64,
}

impl TotalCounters {
    pub fn sanitized(self) -> (u64, u64) {
        let answered = self.answered.max(0) as u64;
        let correct = (self.correct.max(0) as u64).min(answered);
        (answered, correct)
    }
}

pub struct ReadinessEngine<'a> {
    aggregator: &'a PerformanceAggregator<'a>,
    total_questions: usize,
}

impl<'a> ReadinessEngine<'a> {
    pub fn new(aggregator: &'a PerformanceAggregator<'a>, total_questions: usize) -> Self {
        Self {
            aggregator,
            total_questions,
        }
    }

    /// Score from the attempt history alone.
    pub fn calculate_readiness(&self) -> ReadinessScore {
        let (answered, correct) = self.aggregator.totals();
        self.score_from(answered as u64, correct as u64)
    }

    /// Score using external counters for overall accuracy; coverage and
    /// weak-area signals still come from the attempt history.
    #[allow(dead_code)]
    pub fn calculate_with_counters(&self, counters: TotalCounters) -> ReadinessScore {
        let (answered, correct) = counters.sanitized();
        self.score_from(answered, correct)
    }

    fn score_from(&self, answered: u64, correct: u64) -> ReadinessScore {
        let overall_accuracy = if answered == 0 {
            0.0
        } else {
            correct as f64 / answered as f64
        };

        let questions_seen = self.aggregator.questions_seen();
        // A zero-size bank is a collaborator precondition violation; treat
        // coverage as full rather than dividing by zero.
        let coverage = if self.total_questions == 0 {
            1.0
        } else {
            (questions_seen as f64 / self.total_questions as f64).min(1.0)
        };

        let weak = self.aggregator.weak_categories();
        let (weakest_category, weakest_accuracy) = match weak.first() {
            Some(cat) => (Some(cat.category.clone()), cat.accuracy),
            None => (None, 1.0),
        };

        // The weak-area factor is the weak-signal discounted by how much of
        // the bank has actually been sampled: a clean bill of health over a
        // sliver of the material is weak evidence.
        let weak_signal = match weak.first() {
            Some(cat) => {
                let deficit = (WEAK_ACCURACY_THRESHOLD - cat.accuracy) / WEAK_ACCURACY_THRESHOLD;
                (1.0 - deficit * WEAK_PENALTY_SLOPE).clamp(0.0, 1.0)
            }
            None => 1.0,
        };
        let weak_area = weak_signal * coverage.sqrt();

        let composite = ACCURACY_WEIGHT * overall_accuracy
            + COVERAGE_WEIGHT * coverage
            + WEAK_AREA_WEIGHT * weak_area;
        let percentage = (composite * 100.0).round().clamp(0.0, 100.0) as u8;
        let status = ReadinessStatus::from_percentage(percentage);

        let recommendations = self.recommendations(
            overall_accuracy,
            questions_seen,
            weakest_category.as_deref(),
            weakest_accuracy,
            status,
        );

        ReadinessScore {
            percentage,
            overall_accuracy,
            questions_seen,
            total_questions: self.total_questions,
            weakest_category,
            weakest_accuracy,
            status,
            recommendations,
        }
    }

    fn recommendations(
        &self,
        overall_accuracy: f64,
        questions_seen: usize,
        weakest_category: Option<&str>,
        weakest_accuracy: f64,
        status: ReadinessStatus,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if overall_accuracy < ACCURACY_GOAL {
            recommendations.push(format!(
                "Review missed questions to raise your accuracy above {:.0}%.",
                ACCURACY_GOAL * 100.0
            ));
        }
        if questions_seen < self.total_questions {
            recommendations.push(format!(
                "Practice more questions: you have seen {questions_seen} of {} so far.",
                self.total_questions
            ));
        }
        if let Some(category) = weakest_category {
            recommendations.push(format!(
                "Focus on {category}: accuracy there is {:.0}%.",
                weakest_accuracy * 100.0
            ));
        }
        if status == ReadinessStatus::Ready && overall_accuracy >= ACCURACY_GOAL {
            recommendations.push("You are ready for the permit test. Good luck!".to_string());
        }
        if recommendations.is_empty() {
            recommendations.push("Keep practicing to hold your score steady.".to_string());
        }

        recommendations
    }
}
