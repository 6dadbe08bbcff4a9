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

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::error::Fallible;
use crate::error::fail;
use crate::rng::TinyRng;
use crate::rng::shuffle;
use crate::scoring::Score;
use crate::scoring::score;
use crate::types::attempt::QuizAttempt;
use crate::types::question::Question;
use crate::types::question::QuestionId;
use crate::types::quiz::Quiz;
use crate::types::quiz_id::QuizId;
use crate::types::timestamp::Timestamp;

/// The options a player has selected, per question.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnswerSheet {
    selections: BTreeMap<QuestionId, BTreeSet<char>>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self, question: QuestionId) -> Option<&BTreeSet<char>> {
        self.selections.get(&question)
    }

    pub fn is_selected(&self, question: QuestionId, option: char) -> bool {
        self.selected(question)
            .is_some_and(|set| set.contains(&option))
    }

    /// Select the option if it isn't selected, deselect it otherwise. The
    /// question's set is replaced, not edited in place.
    pub fn toggle(&mut self, question: QuestionId, option: char) {
        let mut next: BTreeSet<char> = self.selected(question).cloned().unwrap_or_default();
        if !next.remove(&option) {
            next.insert(option);
        }
        self.selections.insert(question, next);
    }

    /// The number of questions with at least one selected option.
    pub fn answered_count(&self) -> usize {
        self.selections.values().filter(|set| !set.is_empty()).count()
    }
}

#[derive(Clone)]
struct Submission {
    score: Score,
    attempt: QuizAttempt,
}

/// One run of a player through a quiz. Selections can change until the
/// session is submitted; after that the answer sheet is frozen.
#[derive(Clone)]
pub struct Session {
    quiz_id: QuizId,
    player_name: String,
    questions: Vec<Question>,
    answers: AnswerSheet,
    submission: Option<Submission>,
}

impl Session {
    /// Start a session. If the quiz asks for it, the questions are shuffled;
    /// the quiz itself keeps its order.
    pub fn start(quiz: &Quiz, player_name: &str, rng: &mut TinyRng) -> Fallible<Self> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return fail("player name is required.");
        }
        let questions = quiz.questions().to_vec();
        let questions = if quiz.shuffle_questions() {
            shuffle(questions, rng)
        } else {
            questions
        };
        Ok(Self {
            quiz_id: quiz.id(),
            player_name: player_name.to_string(),
            questions,
            answers: AnswerSheet::new(),
            submission: None,
        })
    }

    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// The questions in the order they are presented in this session.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    pub fn is_submitted(&self) -> bool {
        self.submission.is_some()
    }

    pub fn score(&self) -> Option<&Score> {
        self.submission.as_ref().map(|s| &s.score)
    }

    pub fn attempt(&self) -> Option<&QuizAttempt> {
        self.submission.as_ref().map(|s| &s.attempt)
    }

    /// Toggle an option. Returns false, changing nothing, if the session is
    /// already submitted or the question has no such option.
    pub fn toggle(&mut self, question: QuestionId, option: char) -> bool {
        if self.is_submitted() {
            return false;
        }
        let known = self
            .questions
            .iter()
            .any(|q| q.id == question && q.has_option(option));
        if !known {
            return false;
        }
        self.answers.toggle(question, option);
        true
    }

    /// Score the answer sheet and freeze the session.
    pub fn submit(&mut self, submitted_at: Timestamp) -> Fallible<QuizAttempt> {
        if self.is_submitted() {
            return fail("attempt already submitted.");
        }
        let score = score(&self.questions, &self.answers);
        let attempt = QuizAttempt::new(self.quiz_id, &self.player_name, &score, submitted_at);
        self.submission = Some(Submission {
            score,
            attempt: attempt.clone(),
        });
        Ok(attempt)
    }
}
