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

//! Searching and sorting the list of stored quizzes.

use crate::types::quiz::Quiz;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QuizOrder {
    /// Most recently created first.
    #[default]
    Newest,
    Oldest,
    /// Title, A to Z.
    TitleAscending,
    /// Title, Z to A.
    TitleDescending,
}

/// Keep the quizzes whose title or description contains `query` (ignoring
/// case), then sort them. An empty query keeps everything.
pub fn filter_quizzes(quizzes: Vec<Quiz>, query: &str, order: QuizOrder) -> Vec<Quiz> {
    let query = query.trim().to_lowercase();
    let mut result: Vec<Quiz> = quizzes
        .into_iter()
        .filter(|q| {
            q.title().to_lowercase().contains(&query)
                || q.description().to_lowercase().contains(&query)
        })
        .collect();
    match order {
        QuizOrder::Newest => result.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
        QuizOrder::Oldest => result.sort_by_key(|q| q.created_at()),
        QuizOrder::TitleAscending => result.sort_by_key(|q| q.title().to_lowercase()),
        QuizOrder::TitleDescending => {
            result.sort_by(|a, b| b.title().to_lowercase().cmp(&a.title().to_lowercase()))
        }
    }
    result
}
