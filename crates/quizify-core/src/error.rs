//! Grading error types.
//!
//! A session that does not fit its quiz is rejected rather than scored, so a
//! stale answer sheet cannot silently produce a wrong score.

use thiserror::Error;

/// Errors that can occur when grading a session against a quiz.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    /// The session was recorded for another quiz.
    #[error("session answers quiz '{session_quiz}', not '{quiz}'")]
    QuizMismatch { quiz: String, session_quiz: String },

    /// A selection names a question the quiz does not have.
    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    /// A selection names an option that is not part of its question.
    #[error("question '{question_id}' has no option '{option_id}'")]
    UnknownOption {
        question_id: String,
        option_id: String,
    },
}

impl ScoreError {
    /// Returns the question id involved, if any.
    pub fn question_id(&self) -> Option<&str> {
        match self {
            ScoreError::QuizMismatch { .. } => None,
            ScoreError::UnknownQuestion(id) => Some(id),
            ScoreError::UnknownOption { question_id, .. } => Some(question_id),
        }
    }
}
