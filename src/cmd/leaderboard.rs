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

use quizdeck_core::error::Fallible;
use quizdeck_core::types::attempt::QuizAttempt;

use crate::store::Store;
use crate::utils::format_score;

pub fn print_leaderboard(directory: Option<String>, id: String, limit: Option<usize>) -> Fallible<()> {
    let store = Store::open(directory)?;
    let quiz = store.db.find_quiz(&id)?;
    let limit = limit.unwrap_or(store.config.leaderboard_limit);
    let ranked = store.db.leaderboard(quiz.id(), limit)?;
    println!("{}", quiz.title());
    if ranked.is_empty() {
        println!("No attempts yet.");
    } else {
        print!("{}", render_leaderboard(&ranked));
    }
    Ok(())
}

fn render_leaderboard(ranked: &[QuizAttempt]) -> String {
    let mut out = String::new();
    for (rank, attempt) in (1..).zip(ranked) {
        out.push_str(&format!(
            "{rank:>3}. {}  {}/10  ({}/{})  {}\n",
            attempt.player_name(),
            format_score(attempt.score()),
            attempt.correct(),
            attempt.total(),
            attempt.submitted_at().date_string(),
        ));
    }
    out
}
