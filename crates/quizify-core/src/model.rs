//! Core data model types for quizify.
//!
//! Quizzes, questions and options as authored, plus the sessions recording
//! which options a user ticked.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One answer choice of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    /// Identifier, unique within its question.
    pub id: String,
    /// Option label. May contain math.
    pub option: String,
    /// Whether ticking this option is part of the right answer.
    #[serde(default)]
    pub is_correct: bool,
}

/// A multiple-choice question. Any number of options may be correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within its quiz.
    pub id: String,
    /// Question text. May contain math.
    pub question: String,
    /// Options in display order.
    #[serde(default)]
    pub options: Vec<QuizOption>,
}

impl Question {
    /// Ids of the options flagged correct.
    pub fn correct_option_ids(&self) -> BTreeSet<&str> {
        self.options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id.as_str())
            .collect()
    }

    pub fn option(&self, id: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

/// A titled list of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    /// Unique identifier for this quiz.
    pub id: String,
    /// Title. May contain math.
    pub title: String,
    /// Questions in display order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// An option ticked during a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedOption {
    pub question_id: String,
    pub option_id: String,
}

/// One attempt at a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    /// Unique session identifier.
    pub id: Uuid,
    /// The quiz this session answers.
    pub quiz_id: String,
    /// When the session was submitted.
    pub created_at: DateTime<Utc>,
    /// Every ticked option. Questions with nothing ticked are absent.
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

impl QuizSession {
    /// Start a new session for `quiz_id` with nothing selected.
    pub fn new(quiz_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            quiz_id: quiz_id.into(),
            created_at: Utc::now(),
            selected_options: Vec::new(),
        }
    }

    /// Tick `option_id` of `question_id`. Ticking twice has no effect.
    pub fn select(&mut self, question_id: impl Into<String>, option_id: impl Into<String>) {
        let selected = SelectedOption {
            question_id: question_id.into(),
            option_id: option_id.into(),
        };
        if !self.selected_options.contains(&selected) {
            self.selected_options.push(selected);
        }
    }

    /// Group selected option ids by question id.
    pub fn selected_by_question(&self) -> BTreeMap<&str, BTreeSet<&str>> {
        let mut map: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for s in &self.selected_options {
            map.entry(s.question_id.as_str())
                .or_default()
                .insert(s.option_id.as_str());
        }
        map
    }
}
