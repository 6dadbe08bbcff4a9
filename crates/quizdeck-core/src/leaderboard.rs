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

use crate::types::attempt::QuizAttempt;
use crate::types::quiz_id::QuizId;

/// How many entries a leaderboard shows by default.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// Rank the attempts at one quiz, best score first. Ties keep the order the
/// attempts were given in, so earlier submissions rank higher.
pub fn rank_attempts(attempts: Vec<QuizAttempt>, quiz_id: QuizId, limit: usize) -> Vec<QuizAttempt> {
    let mut ranked: Vec<QuizAttempt> = attempts
        .into_iter()
        .filter(|a| a.quiz_id() == quiz_id)
        .collect();
    ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));
    ranked.truncate(limit);
    ranked
}
