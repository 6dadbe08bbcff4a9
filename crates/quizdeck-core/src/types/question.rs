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

use serde::Deserialize;
use serde::Serialize;

/// Position of a question in its parse result, starting at 1.
pub type QuestionId = u32;

/// One selectable answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// The letter label, `A` to `Z`.
    pub id: char,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// The ids of the options marked as correct.
    pub fn correct_key(&self) -> BTreeSet<char> {
        self.options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id)
            .collect()
    }

    pub fn has_option(&self, id: char) -> bool {
        self.options.iter().any(|o| o.id == id)
    }

    /// Whether more than one option is correct.
    pub fn is_multi_answer(&self) -> bool {
        self.options.iter().filter(|o| o.is_correct).count() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: char, is_correct: bool) -> AnswerOption {
        AnswerOption {
            id,
            text: format!("option {id}"),
            is_correct,
        }
    }

    #[test]
    fn test_correct_key() {
        let q = Question {
            id: 1,
            text: "pick".to_string(),
            options: vec![option('A', true), option('B', false), option('C', true)],
        };
        assert_eq!(q.correct_key(), BTreeSet::from(['A', 'C']));
        assert!(q.is_multi_answer());
        assert!(q.has_option('B'));
        assert!(!q.has_option('D'));
    }

    #[test]
    fn test_serialize_option_id_as_string() {
        let json = serde_json::to_string(&option('B', true)).unwrap();
        assert_eq!(json, r#"{"id":"B","text":"option B","is_correct":true}"#);
    }
}
