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

//! quizdeck-core: Core library for the quizdeck quiz tool.
//!
//! This library provides I/O-free types and algorithms for:
//! - Parsing plain-text quizzes into questions and options
//! - Scoring answer sheets with exact-set matching
//! - Running a quiz session, including question shuffling
//! - Ranking attempts for a leaderboard

pub mod catalog;
pub mod error;
pub mod leaderboard;
pub mod parser;
pub mod rng;
pub mod sample;
pub mod scoring;
pub mod session;
pub mod types;

// Re-exports for convenience
pub use error::{ErrorReport, Fallible, fail};
pub use parser::{Parser, ParserConfig, parse_quiz_content};
pub use scoring::{Score, score};
pub use session::{AnswerSheet, Session};
pub use types::attempt::QuizAttempt;
pub use types::question::{AnswerOption, Question, QuestionId};
pub use types::quiz::{Quiz, QuizDraft};
pub use types::quiz_id::QuizId;
pub use types::timestamp::Timestamp;
