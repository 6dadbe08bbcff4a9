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

use std::fmt::Display;
use std::fmt::Formatter;

use clap::ValueEnum;
use quizdeck_core::catalog::QuizOrder;
use quizdeck_core::catalog::filter_quizzes;
use quizdeck_core::error::Fallible;
use quizdeck_core::types::quiz::Quiz;

use crate::store::Store;

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug)]
pub enum SortOrder {
    /// Most recently created first.
    Newest,
    /// Oldest first.
    Oldest,
    /// By title, A to Z.
    #[value(name = "az")]
    Az,
    /// By title, Z to A.
    #[value(name = "za")]
    Za,
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Newest => write!(f, "newest"),
            SortOrder::Oldest => write!(f, "oldest"),
            SortOrder::Az => write!(f, "az"),
            SortOrder::Za => write!(f, "za"),
        }
    }
}

impl From<SortOrder> for QuizOrder {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Newest => QuizOrder::Newest,
            SortOrder::Oldest => QuizOrder::Oldest,
            SortOrder::Az => QuizOrder::TitleAscending,
            SortOrder::Za => QuizOrder::TitleDescending,
        }
    }
}

pub fn list_quizzes(directory: Option<String>, search: Option<String>, sort: SortOrder) -> Fallible<()> {
    let store = Store::open(directory)?;
    let quizzes = filter_quizzes(
        store.db.quizzes()?,
        search.as_deref().unwrap_or_default(),
        sort.into(),
    );
    if quizzes.is_empty() {
        println!("No quizzes found.");
        return Ok(());
    }
    print!("{}", render_list(&quizzes));
    Ok(())
}

fn render_list(quizzes: &[Quiz]) -> String {
    let mut out = String::new();
    for quiz in quizzes {
        let mut tags = vec![format!("{} questions", quiz.questions().len())];
        if quiz.is_locked() {
            tags.push("locked".to_string());
        }
        if quiz.shuffle_questions() {
            tags.push("shuffled".to_string());
        }
        out.push_str(&format!(
            "{}  {}  [{}]  {}\n",
            quiz.id().short(),
            quiz.title(),
            tags.join(", "),
            quiz.created_at().date_string(),
        ));
        out.push_str(&format!("    {}\n", quiz.description()));
    }
    out
}
