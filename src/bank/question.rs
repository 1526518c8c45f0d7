use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const QUESTIONS_JSON: &str = include_str!("../../assets/questions.json");

const CHOICES_PER_QUESTION: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerChoice {
    A,
    B,
    C,
    D,
}

impl AnswerChoice {
    pub const ALL: [AnswerChoice; 4] = [
        AnswerChoice::A,
        AnswerChoice::B,
        AnswerChoice::C,
        AnswerChoice::D,
    ];

    pub fn index(self) -> usize {
        match self {
            AnswerChoice::A => 0,
            AnswerChoice::B => 1,
            AnswerChoice::C => 2,
            AnswerChoice::D => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnswerChoice::A => "A",
            AnswerChoice::B => "B",
            AnswerChoice::C => "C",
            AnswerChoice::D => "D",
        }
    }

    /// Parse user input like "a", "B " or "c". Returns None for anything else.
    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim().to_ascii_uppercase().as_str() {
            "A" => Some(AnswerChoice::A),
            "B" => Some(AnswerChoice::B),
            "C" => Some(AnswerChoice::C),
            "D" => Some(AnswerChoice::D),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub choices: Vec<String>,
    pub answer: AnswerChoice,
    pub category: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Question {
    pub fn choice_text(&self, choice: AnswerChoice) -> &str {
        &self.choices[choice.index()]
    }

    pub fn is_correct(&self, choice: AnswerChoice) -> bool {
        choice == self.answer
    }
}

#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question {id} has {count} choices, expected {CHOICES_PER_QUESTION}")]
    ChoiceCount { id: String, count: usize },
    #[error("duplicate question id: {0}")]
    DuplicateId(String),
    #[error("question bank is empty")]
    Empty,
}

/// The static question bank, loaded once at startup and immutable for the
/// process lifetime.
#[derive(Debug)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Load the bank embedded at compile time.
    pub fn load() -> Result<Self, BankError> {
        Self::from_json(QUESTIONS_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        let mut seen = BTreeSet::new();
        for question in &questions {
            if question.choices.len() != CHOICES_PER_QUESTION {
                return Err(BankError::ChoiceCount {
                    id: question.id.clone(),
                    count: question.choices.len(),
                });
            }
            if !seen.insert(question.id.as_str()) {
                return Err(BankError::DuplicateId(question.id.clone()));
            }
        }

        Ok(Self { questions })
    }

    pub fn all(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[allow(dead_code)]
    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Sorted, deduplicated category names.
    pub fn categories(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .questions
            .iter()
            .map(|q| q.category.as_str())
            .collect();
        set.into_iter().collect()
    }

    #[allow(dead_code)]
    pub fn in_category(&self, category: &str) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.category == category)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_bank_loads() {
        let bank = QuestionBank::load().unwrap();
        assert!(!bank.is_empty());
        for question in bank.all() {
            assert_eq!(question.choices.len(), CHOICES_PER_QUESTION);
            assert!(!question.text.is_empty());
        }
    }

    #[test]
    fn categories_are_sorted_and_unique() {
        let bank = QuestionBank::load().unwrap();
        let categories = bank.categories();
        let mut sorted = categories.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(categories, sorted);
        assert!(categories.len() > 1);
    }

    #[test]
    fn in_category_matches_only_that_category() {
        let bank = QuestionBank::load().unwrap();
        let category = bank.categories()[0];
        let matching = bank.in_category(category);
        assert!(!matching.is_empty());
        assert!(matching.iter().all(|q| q.category == category));
    }

    #[test]
    fn unknown_category_is_empty() {
        let bank = QuestionBank::load().unwrap();
        assert!(bank.in_category("Submarine Operation").is_empty());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let json = r#"[
            {"id": "x-1", "text": "q", "choices": ["a","b","c","d"], "answer": "A", "category": "c"},
            {"id": "x-1", "text": "q", "choices": ["a","b","c","d"], "answer": "B", "category": "c"}
        ]"#;
        let err = QuestionBank::from_json(json).unwrap_err();
        assert!(matches!(err, BankError::DuplicateId(id) if id == "x-1"));
    }

    #[test]
    fn wrong_choice_count_rejected() {
        let json = r#"[
            {"id": "x-1", "text": "q", "choices": ["a","b","c"], "answer": "A", "category": "c"}
        ]"#;
        let err = QuestionBank::from_json(json).unwrap_err();
        assert!(matches!(err, BankError::ChoiceCount { count: 3, .. }));
    }

    #[test]
    fn empty_bank_rejected() {
        assert!(matches!(
            QuestionBank::from_json("[]").unwrap_err(),
            BankError::Empty
        ));
    }

    #[test]
    fn answer_choice_parses_user_input() {
        assert_eq!(AnswerChoice::from_input("a"), Some(AnswerChoice::A));
        assert_eq!(AnswerChoice::from_input(" D "), Some(AnswerChoice::D));
        assert_eq!(AnswerChoice::from_input("e"), None);
        assert_eq!(AnswerChoice::from_input(""), None);
        assert_eq!(AnswerChoice::from_input("ab"), None);
    }
}
