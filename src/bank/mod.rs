pub mod question;

pub use question::{AnswerChoice, Question, QuestionBank};
