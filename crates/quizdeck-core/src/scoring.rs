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

use std::collections::BTreeSet;

use serde::Serialize;

use crate::session::AnswerSheet;
use crate::types::question::Question;

/// The outcome of scoring an answer sheet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    /// Out of ten, rounded to one decimal place.
    pub score_out_of_ten: f64,
    /// Rounded to the nearest integer.
    pub percentage: u32,
}

/// A question counts only if the selection is exactly the set of correct
/// options. Missing a correct option or adding a wrong one both fail it.
pub fn is_answered_correctly(question: &Question, selected: &BTreeSet<char>) -> bool {
    question.correct_key() == *selected
}

pub fn score(questions: &[Question], answers: &AnswerSheet) -> Score {
    let empty = BTreeSet::new();
    let correct = questions
        .iter()
        .filter(|q| is_answered_correctly(q, answers.selected(q.id).unwrap_or(&empty)))
        .count();
    let total = questions.len();
    if total == 0 {
        return Score {
            correct: 0,
            total: 0,
            score_out_of_ten: 0.0,
            percentage: 0,
        };
    }
    let percentage = (100.0 * correct as f64 / total as f64).round() as u32;
    Score {
        correct,
        total,
        score_out_of_ten: percentage as f64 / 10.0,
        percentage,
    }
}
