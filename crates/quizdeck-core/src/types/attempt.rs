// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Deserialize;
use serde::Serialize;

use crate::scoring::Score;
use crate::types::quiz_id::QuizId;
use crate::types::timestamp::Timestamp;

/// The record of one submitted run through a quiz. There are no setters:
/// once built, an attempt never changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    quiz_id: QuizId,
    player_name: String,
    /// Out of ten, one decimal place.
    score: f64,
    correct: usize,
    total: usize,
    submitted_at: Timestamp,
}

impl QuizAttempt {
    pub fn new(quiz_id: QuizId, player_name: &str, score: &Score, submitted_at: Timestamp) -> Self {
        Self {
            quiz_id,
            player_name: player_name.trim().to_string(),
            score: score.score_out_of_ten,
            correct: score.correct,
            total: score.total,
            submitted_at,
        }
    }

    pub fn restore(
        quiz_id: QuizId,
        player_name: String,
        score: f64,
        correct: usize,
        total: usize,
        submitted_at: Timestamp,
    ) -> Self {
        Self {
            quiz_id,
            player_name,
            score,
            correct,
            total,
            submitted_at,
        }
    }

    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn submitted_at(&self) -> Timestamp {
        self.submitted_at
    }
}
