//! Session grading.
//!
//! A question scores one point when the set of ticked options equals the set
//! of correct options. There is no partial credit.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::model::{Question, Quiz, QuizSession};

/// Outcome of a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    /// Whether the selection matched the correct options exactly.
    pub correct: bool,
    /// Option ids the user ticked, in option order.
    pub selected: Vec<String>,
    /// Option ids flagged correct, in option order.
    pub expected: Vec<String>,
}

/// Score of a whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionScore {
    /// Number of correctly answered questions.
    pub score: u32,
    /// Number of questions in the quiz.
    pub total: u32,
    /// Per-question outcomes, in quiz order.
    pub questions: Vec<QuestionOutcome>,
}

impl SessionScore {
    /// Score as a fraction in `0.0..=1.0`. An empty quiz scores 0.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.score as f64 / self.total as f64
        }
    }

    /// Whether any question was answered incorrectly.
    pub fn has_incorrect(&self) -> bool {
        self.score < self.total
    }

    pub fn outcome(&self, question_id: &str) -> Option<&QuestionOutcome> {
        self.questions.iter().find(|o| o.question_id == question_id)
    }
}

/// Grade `session` against `quiz`.
pub fn grade(quiz: &Quiz, session: &QuizSession) -> Result<SessionScore, ScoreError> {
    if session.quiz_id != quiz.id {
        return Err(ScoreError::QuizMismatch {
            quiz: quiz.id.clone(),
            session_quiz: session.quiz_id.clone(),
        });
    }

    let selected = session.selected_by_question();
    for (question_id, option_ids) in &selected {
        let question = quiz
            .question(question_id)
            .ok_or_else(|| ScoreError::UnknownQuestion(question_id.to_string()))?;
        if let Some(unknown) = option_ids.iter().find(|id| question.option(id).is_none()) {
            return Err(ScoreError::UnknownOption {
                question_id: question_id.to_string(),
                option_id: unknown.to_string(),
            });
        }
    }

    let empty = BTreeSet::new();
    let questions: Vec<QuestionOutcome> = quiz
        .questions
        .iter()
        .map(|q| grade_question(q, selected.get(q.id.as_str()).unwrap_or(&empty)))
        .collect();
    let score = questions.iter().filter(|o| o.correct).count() as u32;

    tracing::debug!(
        quiz = %quiz.id,
        session = %session.id,
        score,
        total = questions.len(),
        "graded session"
    );

    Ok(SessionScore {
        score,
        total: questions.len() as u32,
        questions,
    })
}

fn grade_question(question: &Question, selected: &BTreeSet<&str>) -> QuestionOutcome {
    let correct = question
        .options
        .iter()
        .all(|o| selected.contains(o.id.as_str()) == o.is_correct);

    QuestionOutcome {
        question_id: question.id.clone(),
        correct,
        selected: question
            .options
            .iter()
            .filter(|o| selected.contains(o.id.as_str()))
            .map(|o| o.id.clone())
            .collect(),
        expected: question
            .options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id.clone())
            .collect(),
    }
}

/// Build a follow-up quiz from the questions answered incorrectly.
///
/// Returns `None` when every question was answered correctly.
pub fn retry_quiz(quiz: &Quiz, score: &SessionScore) -> Option<Quiz> {
    let questions: Vec<Question> = quiz
        .questions
        .iter()
        .filter(|q| !score.outcome(&q.id).is_some_and(|o| o.correct))
        .cloned()
        .collect();

    if questions.is_empty() {
        return None;
    }

    Some(Quiz {
        id: format!("{}-retry", quiz.id),
        title: format!("{} — Retry", quiz.title),
        questions,
    })
}
