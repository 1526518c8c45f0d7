use std::time::Instant;

use crate::bank::question::{AnswerChoice, Question};

/// One graded answer within a running quiz.
#[derive(Clone, Debug)]
pub struct QuizAnswer {
    pub question_id: String,
    pub category: String,
    pub correct: bool,
    pub time_secs: f64,
}

/// A quiz in progress: an ordered set of questions and the answers given so
/// far. Timing is wall-clock per question, measured from the previous answer.
pub struct QuizState {
    pub questions: Vec<Question>,
    pub current: usize,
    pub answers: Vec<QuizAnswer>,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
    last_mark: Option<Instant>,
}

impl QuizState {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current: 0,
            answers: Vec::new(),
            started_at: None,
            finished_at: None,
            last_mark: None,
        }
    }

    pub fn start(&mut self) {
        let now = Instant::now();
        self.started_at = Some(now);
        self.last_mark = Some(now);
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Grade the given choice against the current question and advance.
    /// Returns None when the quiz is already complete.
    pub fn answer(&mut self, choice: AnswerChoice) -> Option<bool> {
        let question = self.questions.get(self.current)?;
        let now = Instant::now();
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        let time_secs = self
            .last_mark
            .map(|mark| now.duration_since(mark).as_secs_f64())
            .unwrap_or(0.0);
        self.last_mark = Some(now);

        let correct = question.is_correct(choice);
        self.answers.push(QuizAnswer {
            question_id: question.id.clone(),
            category: question.category.clone(),
            correct,
            time_secs,
        });
        self.current += 1;

        if self.is_complete() {
            self.finished_at = Some(now);
        }
        Some(correct)
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.questions.len()
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.correct).count()
    }

    #[allow(dead_code)]
    pub fn incorrect_count(&self) -> usize {
        self.answers.len() - self.correct_count()
    }

    /// Accuracy over answered questions so far, as a 0-100 percentage.
    #[allow(dead_code)]
    pub fn accuracy(&self) -> f64 {
        if self.answers.is_empty() {
            return 100.0;
        }
        (self.correct_count() as f64 / self.answers.len() as f64 * 100.0).clamp(0.0, 100.0)
    }

    pub fn elapsed_secs(&self) -> f64 {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.duration_since(start).as_secs_f64(),
            (Some(start), None) => start.elapsed().as_secs_f64(),
            _ => 0.0,
        }
    }

    #[allow(dead_code)]
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.current as f64 / self.questions.len() as f64
    }
}
