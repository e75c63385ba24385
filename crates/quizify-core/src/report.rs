//! Session report types with JSON persistence and progress tracking.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Quiz, QuizSession};
use crate::scoring::{self, SessionScore};

/// A graded session, ready to persist or render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the quiz.
    pub quiz: QuizSummary,
    /// The graded session.
    pub session_id: Uuid,
    /// When the session was submitted.
    pub submitted_at: DateTime<Utc>,
    /// Score and per-question outcomes.
    pub score: SessionScore,
}

/// Summary of a quiz (without the full question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    pub question_count: usize,
}

impl SessionReport {
    /// Grade `session` against `quiz` and wrap the result in a report.
    pub fn grade(quiz: &Quiz, session: &QuizSession) -> Result<Self> {
        let score = scoring::grade(quiz, session)
            .with_context(|| format!("failed to grade session {}", session.id))?;

        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            quiz: QuizSummary {
                id: quiz.id.clone(),
                title: quiz.title.clone(),
                question_count: quiz.questions.len(),
            },
            session_id: session.id,
            submitted_at: session.created_at,
            score,
        })
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this report against an earlier attempt.
    ///
    /// Questions are matched by id, so a retry quiz compares against the
    /// questions it was built from.
    pub fn compare(&self, baseline: &SessionReport) -> ProgressReport {
        let mut improvements = Vec::new();
        let mut regressions = Vec::new();
        let mut unchanged = 0usize;
        let mut new_questions = 0usize;

        for current in &self.score.questions {
            match baseline.score.outcome(&current.question_id) {
                Some(before) if before.correct == current.correct => unchanged += 1,
                Some(_) if current.correct => improvements.push(current.question_id.clone()),
                Some(_) => regressions.push(current.question_id.clone()),
                None => new_questions += 1,
            }
        }

        let removed_questions = baseline
            .score
            .questions
            .iter()
            .filter(|q| self.score.outcome(&q.question_id).is_none())
            .count();

        ProgressReport {
            baseline_score: baseline.score.percentage(),
            current_score: self.score.percentage(),
            improvements,
            regressions,
            unchanged,
            new_questions,
            removed_questions,
        }
    }
}

/// Result of comparing two session reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Baseline score as a fraction.
    pub baseline_score: f64,
    /// Current score as a fraction.
    pub current_score: f64,
    /// Questions wrong before and right now.
    pub improvements: Vec<String>,
    /// Questions right before and wrong now.
    pub regressions: Vec<String>,
    /// Questions with the same outcome.
    pub unchanged: usize,
    /// Questions in current but not baseline.
    pub new_questions: usize,
    /// Questions in baseline but not current.
    pub removed_questions: usize,
}

impl ProgressReport {
    /// Format the progress report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Score:** {:.1}% -> {:.1}% ({:+.1}%)\n\n",
            self.baseline_score * 100.0,
            self.current_score * 100.0,
            (self.current_score - self.baseline_score) * 100.0
        ));
        md.push_str(&format!(
            "**Summary:** {} improvements, {} regressions, {} unchanged\n\n",
            self.improvements.len(),
            self.regressions.len(),
            self.unchanged
        ));

        if !self.improvements.is_empty() {
            md.push_str("### Now correct\n\n");
            for id in &self.improvements {
                md.push_str(&format!("- {id}\n"));
            }
            md.push('\n');
        }

        if !self.regressions.is_empty() {
            md.push_str("### Now incorrect\n\n");
            for id in &self.regressions {
                md.push_str(&format!("- {id}\n"));
            }
        }

        md
    }

    /// Returns true if any question went from right to wrong.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}
