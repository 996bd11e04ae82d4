// src/models/play.rs

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::quiz::{PublicQuiz, QuizId};

/// Per-player progress through a random-play run.
///
/// Persisted as JSON by the session store. `resolved` holds every quiz answered
/// correctly so far; `pending` is the question currently on screen and is never
/// a member of `resolved`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomPlaySession {
    #[serde(default)]
    pub resolved: BTreeSet<QuizId>,
    #[serde(default)]
    pub pending: Option<QuizId>,
}

impl RandomPlaySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of quizzes answered correctly in this run.
    pub fn score(&self) -> usize {
        self.resolved.len()
    }
}

/// Why a random-play run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Every quiz in the store has been answered.
    Exhausted,
    WrongAnswer,
}

/// Result of a random-play request, handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlayOutcome {
    NextQuestion { quiz: PublicQuiz, score: usize },
    Correct { score: usize },
    Terminated { final_score: usize, reason: TerminationReason },
}
