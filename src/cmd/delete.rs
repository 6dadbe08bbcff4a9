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

use crate::store::Store;

/// Remove a quiz from the store. Attempts already made at it are kept.
pub fn delete_quiz(directory: Option<String>, id: String) -> Fallible<()> {
    let store = Store::open(directory)?;
    let quiz = store.db.find_quiz(&id)?;
    store.db.delete_quiz(quiz.id())?;
    println!("Deleted {} ({}).", quiz.id().short(), quiz.title());
    Ok(())
}
