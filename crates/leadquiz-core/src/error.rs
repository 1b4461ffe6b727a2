use crate::domain::phone::PhoneRejection;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("full name is required")]
    EmptyName,
    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneRejection),
    #[error("invalid preferred language: {0}")]
    InvalidLanguage(String),
    #[error("unknown question: {0}")]
    UnknownQuestion(u32),
    #[error("unknown option {choice:?} for question {question_id}")]
    UnknownOption { question_id: u32, choice: String },
    #[error("question {0} answered more than once")]
    DuplicateAnswer(u32),
    #[error("invalid answer selection {0:?}: expected <question>=<option>")]
    InvalidSelection(String),
    #[error("all questions have already been answered")]
    QuizComplete,
    #[error("not all questions have been answered")]
    QuizIncomplete,
    #[error("a lead needs at least one answer")]
    NoAnswers,
    #[error("ability score out of range: {0}")]
    ScoreOutOfRange(i64),
}
