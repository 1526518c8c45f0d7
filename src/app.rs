use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::bank::question::{AnswerChoice, Question, QuestionBank};
use crate::config::Config;
use crate::engine::attempt::AttemptHistory;
use crate::engine::performance::{CategoryPerformance, PerformanceAggregator, QuestionPerformance};
use crate::engine::readiness::{ReadinessEngine, ReadinessScore};
use crate::engine::selector::AdaptiveSelector;
use crate::session::quiz::QuizState;
use crate::session::result::QuizResult;
use crate::store::json_store::JsonStore;
use crate::store::schema::{AttemptHistoryData, ExportData, ProfileData};

pub struct App {
    pub config: Config,
    pub bank: QuestionBank,
    pub history: AttemptHistory,
    pub profile: ProfileData,
    pub store: Option<JsonStore>,
    pub quiz: Option<QuizState>,
    pub last_result: Option<QuizResult>,
    quiz_category: Option<String>,
    rng: SmallRng,
}

impl App {
    pub fn new() -> Result<Self> {
        Self::with_parts(Config::load().unwrap_or_default(), JsonStore::new().ok())
    }

    pub fn with_parts(mut config: Config, store: Option<JsonStore>) -> Result<Self> {
        let bank = QuestionBank::load().context("failed to load question bank")?;
        config.normalize(&bank.categories());

        let (profile, history) = match &store {
            Some(s) => {
                // load_profile returns None if the file exists but cannot be
                // parsed (schema mismatch)
                let profile = match s.load_profile() {
                    Some(p) if !p.needs_reset() => p,
                    _ => ProfileData::default(),
                };
                let history = AttemptHistory::from_attempts(s.load_attempts().attempts);
                (profile, history)
            }
            None => (ProfileData::default(), AttemptHistory::new()),
        };

        Ok(Self {
            config,
            bank,
            history,
            profile,
            store,
            quiz: None,
            last_result: None,
            quiz_category: None,
            rng: SmallRng::from_entropy(),
        })
    }

    /// Draw an adaptive selection and begin a quiz. Returns the number of
    /// questions drawn; zero means there was nothing to quiz on (e.g. an
    /// unknown category).
    pub fn start_quiz(&mut self, category: Option<&str>, count: Option<usize>) -> usize {
        let count = count.unwrap_or(self.config.quiz_length);
        let category: Option<String> = category
            .map(str::to_string)
            .or_else(|| self.config.category_filter().map(str::to_string));

        let questions = {
            let aggregator = PerformanceAggregator::new(&self.history);
            let selector = AdaptiveSelector::new(&aggregator);
            selector.select_questions(&mut self.rng, self.bank.all(), count, category.as_deref())
        };

        let drawn = questions.len();
        if drawn == 0 {
            self.quiz = None;
            self.quiz_category = None;
            return 0;
        }

        let mut quiz = QuizState::new(questions);
        quiz.start();
        self.quiz = Some(quiz);
        self.quiz_category = category;
        drawn
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.as_ref().and_then(|q| q.current_question())
    }

    /// Grade an answer against the running quiz. Finishes the quiz (recording
    /// attempts and saving) once the last question is answered.
    pub fn submit_answer(&mut self, choice: AnswerChoice) -> Option<bool> {
        let correct = self.quiz.as_mut()?.answer(choice)?;
        if self.quiz.as_ref().is_some_and(|q| q.is_complete()) {
            self.finish_quiz();
        }
        Some(correct)
    }

    /// End the quiz early, keeping whatever was answered.
    pub fn abandon_quiz(&mut self) {
        self.finish_quiz();
    }

    fn finish_quiz(&mut self) {
        let Some(quiz) = self.quiz.take() else {
            return;
        };
        let category = self.quiz_category.take();
        if quiz.answers.is_empty() {
            return;
        }

        let result = QuizResult::from_quiz(&quiz, category.as_deref());
        for attempt in result.to_attempts() {
            self.history.record(attempt);
        }

        self.profile.total_answered += result.total as u64;
        self.profile.total_correct += result.correct as u64;
        self.profile.quizzes_taken += 1;
        self.update_streak();

        self.last_result = Some(result);
        self.save_data();
    }

    fn update_streak(&mut self) {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        if self.profile.last_practice_date.as_deref() != Some(&today) {
            if let Some(ref last) = self.profile.last_practice_date {
                let yesterday = (Utc::now() - chrono::Duration::days(1))
                    .format("%Y-%m-%d")
                    .to_string();
                if last == &yesterday {
                    self.profile.streak_days += 1;
                } else {
                    self.profile.streak_days = 1;
                }
            } else {
                self.profile.streak_days = 1;
            }
            self.profile.best_streak = self.profile.best_streak.max(self.profile.streak_days);
            self.profile.last_practice_date = Some(today);
        }
    }

    fn save_data(&self) {
        if let Some(ref store) = self.store {
            let _ = store.save_profile(&self.profile);
            let _ = store.save_attempts(&AttemptHistoryData {
                attempts: self.history.attempts().to_vec(),
                ..Default::default()
            });
        }
    }

    pub fn readiness(&self) -> ReadinessScore {
        let aggregator = PerformanceAggregator::new(&self.history);
        ReadinessEngine::new(&aggregator, self.bank.len()).calculate_readiness()
    }

    /// Per-category statistics, name-ordered.
    pub fn category_overview(&self) -> Vec<CategoryPerformance> {
        let aggregator = PerformanceAggregator::new(&self.history);
        aggregator.all_category_performance().into_values().collect()
    }

    /// The questions missed at least once, worst accuracy first.
    pub fn most_missed(&self, limit: usize) -> Vec<QuestionPerformance> {
        let aggregator = PerformanceAggregator::new(&self.history);
        let mut missed: Vec<QuestionPerformance> = self
            .bank
            .all()
            .iter()
            .map(|q| aggregator.performance_for(&q.id, &q.category))
            .filter(|p| p.times_incorrect > 0)
            .collect();
        missed.sort_by(|a, b| {
            a.accuracy
                .partial_cmp(&b.accuracy)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        missed.truncate(limit);
        missed
    }

    /// Delete all recorded attempts and reset counters and streaks.
    pub fn reset_progress(&mut self) -> Result<()> {
        self.history.reset();
        self.profile = ProfileData::default();
        self.quiz = None;
        self.last_result = None;
        if let Some(ref store) = self.store {
            store.delete_attempts()?;
            store.save_profile(&self.profile)?;
        }
        Ok(())
    }

    pub fn export(&self, path: &Path) -> Result<()> {
        let store = self
            .store
            .as_ref()
            .context("no data store available for export")?;
        let data = store.export_all(&self.config);
        let json = serde_json::to_string_pretty(&data)?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn import(&mut self, path: &Path) -> Result<()> {
        let store = self
            .store
            .as_ref()
            .context("no data store available for import")?;
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let data: ExportData = serde_json::from_str(&content)?;
        store.import_all(&data)?;

        self.profile = store.load_profile().unwrap_or_default();
        self.history = AttemptHistory::from_attempts(store.load_attempts().attempts);
        Ok(())
    }
}
