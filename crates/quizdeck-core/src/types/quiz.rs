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

use crate::error::Fallible;
use crate::error::fail;
use crate::types::question::Question;
use crate::types::quiz_id::QuizId;
use crate::types::quiz_id::QuizIdHasher;
use crate::types::timestamp::Timestamp;

/// Used when the author leaves the description blank.
pub const DEFAULT_DESCRIPTION: &str = "No description.";

/// What an author submits to create a quiz.
#[derive(Clone, Debug, Default)]
pub struct QuizDraft {
    pub title: String,
    pub description: String,
    pub password: Option<String>,
    pub shuffle_questions: bool,
    pub questions: Vec<Question>,
}

/// A named, ordered collection of questions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    id: QuizId,
    title: String,
    description: String,
    created_at: Timestamp,
    password: Option<String>,
    shuffle_questions: bool,
    questions: Vec<Question>,
}

impl Quiz {
    /// Validate a draft and turn it into a quiz.
    pub fn new(draft: QuizDraft, created_at: Timestamp) -> Fallible<Self> {
        Self::with_nonce(draft, created_at, 0)
    }

    /// Like [`Quiz::new`], with `nonce` mixed into the id. Identical drafts
    /// created in the same millisecond get distinct ids as long as their
    /// nonces differ.
    pub fn with_nonce(draft: QuizDraft, created_at: Timestamp, nonce: u32) -> Fallible<Self> {
        let QuizDraft {
            title,
            description,
            password,
            shuffle_questions,
            questions,
        } = draft;
        if questions.is_empty() {
            return fail("no parseable questions found.");
        }
        let title = title.trim().to_string();
        if title.is_empty() {
            return fail("quiz title is required.");
        }
        let description = match description.trim() {
            "" => DEFAULT_DESCRIPTION.to_string(),
            d => d.to_string(),
        };
        let password = password
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        let id = {
            let mut hasher = QuizIdHasher::new();
            hasher.field(&title);
            hasher.field(&description);
            hasher.field(&created_at.to_string());
            for question in &questions {
                hasher.field(&question.text);
            }
            hasher.field(&nonce.to_string());
            hasher.finalize()
        };
        Ok(Self {
            id,
            title,
            description,
            created_at,
            password,
            shuffle_questions,
            questions,
        })
    }

    /// Rebuild a quiz that was already validated, e.g. when reading it back
    /// from storage.
    pub fn restore(
        id: QuizId,
        title: String,
        description: String,
        created_at: Timestamp,
        password: Option<String>,
        shuffle_questions: bool,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            created_at,
            password,
            shuffle_questions,
            questions,
        }
    }

    pub fn id(&self) -> QuizId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn is_locked(&self) -> bool {
        self.password.is_some()
    }

    pub fn shuffle_questions(&self) -> bool {
        self.shuffle_questions
    }

    /// The canonical question order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Check a password attempt. Quizzes without a password are always open.
    pub fn unlock(&self, attempt: &str) -> bool {
        match &self.password {
            None => true,
            Some(password) => password == attempt,
        }
    }
}
