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

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// Identifies a stored quiz. Derived from the quiz content and its creation
/// time, so two quizzes with the same text created at different moments get
/// different ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuizId {
    #[serde(skip)]
    inner: blake3::Hash,
}

impl QuizId {
    pub fn to_hex(self) -> String {
        self.inner.to_hex().to_string()
    }

    pub fn from_hex(s: &str) -> Fallible<Self> {
        let inner = blake3::Hash::from_hex(s)
            .map_err(|_| ErrorReport::new(format!("invalid quiz id: '{s}'")))?;
        Ok(Self { inner })
    }

    /// The first twelve hex digits. Enough to look a quiz up by prefix.
    pub fn short(self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(12);
        hex
    }
}

impl Display for QuizId {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for QuizId {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        QuizId::from_hex(&value)
    }
}

impl From<QuizId> for String {
    fn from(id: QuizId) -> String {
        id.to_hex()
    }
}

/// Incrementally hashes the fields that identify a quiz.
pub struct QuizIdHasher {
    inner: blake3::Hasher,
}

impl QuizIdHasher {
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    /// Feed one field. Fields are length-prefixed so that ("ab", "c") and
    /// ("a", "bc") hash differently.
    pub fn field(&mut self, data: &str) {
        self.inner.update(&(data.len() as u64).to_le_bytes());
        self.inner.update(data.as_bytes());
    }

    pub fn finalize(self) -> QuizId {
        QuizId {
            inner: self.inner.finalize(),
        }
    }
}

impl Default for QuizIdHasher {
    fn default() -> Self {
        Self::new()
    }
}
