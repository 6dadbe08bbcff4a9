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

use std::fs::read_to_string;
use std::path::Path;

use quizdeck_core::error::Fallible;
use quizdeck_core::error::fail;
use quizdeck_core::parser::Parser;
use quizdeck_core::parser::QuizDocument;
use quizdeck_core::rng::TinyRng;
use quizdeck_core::types::quiz::Quiz;
use quizdeck_core::types::quiz::QuizDraft;
use quizdeck_core::types::timestamp::Timestamp;
use walkdir::WalkDir;

use crate::store::Store;

/// Values given on the command line. Anything set here wins over the file's
/// frontmatter.
#[derive(Default)]
pub struct CreateOptions {
    pub title: Option<String>,
    pub description: Option<String>,
    pub password: Option<String>,
    pub shuffle: bool,
}

pub fn create_quiz(directory: Option<String>, file: String, options: CreateOptions) -> Fallible<()> {
    let store = Store::open(directory)?;
    let mut rng = TinyRng::from_clock();
    let quiz = read_quiz(&store.config.parser(), Path::new(&file), options, &mut rng)?;
    store.db.insert_quiz(&quiz)?;
    log::info!("Stored {} in {}", quiz.title(), store.directory.display());
    println!("{}", quiz.id());
    Ok(())
}

/// Create a quiz for every `.txt` and `.md` file under `source`. Files that
/// don't hold a valid quiz, or can't be stored, are skipped with a warning.
pub fn import_quizzes(directory: Option<String>, source: String) -> Fallible<()> {
    let store = Store::open(directory)?;
    let source = Path::new(&source);
    if !source.is_dir() {
        return fail("directory does not exist.");
    }
    let parser = store.config.parser();
    let mut rng = TinyRng::from_clock();
    let mut imported = 0;
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_quiz_file(path) {
            continue;
        }
        let stored = read_quiz(&parser, path, CreateOptions::default(), &mut rng)
            .and_then(|quiz| store.db.insert_quiz(&quiz).map(|()| quiz));
        match stored {
            Ok(quiz) => {
                println!("{}  {}", quiz.id().short(), quiz.title());
                imported += 1;
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e.message());
            }
        }
    }
    println!("Imported {imported} quizzes.");
    Ok(())
}

fn is_quiz_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("txt") | Some("md")
    )
}

fn read_quiz(
    parser: &Parser,
    path: &Path,
    options: CreateOptions,
    rng: &mut TinyRng,
) -> Fallible<Quiz> {
    let text = read_to_string(path)?;
    let document = parser.parse_document(&text)?;
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let draft = build_draft(document, options, stem);
    log::debug!("Read {} questions from {}", draft.questions.len(), path.display());
    Quiz::with_nonce(draft, Timestamp::now(), rng.next_u32())
}

fn build_draft(document: QuizDocument, options: CreateOptions, fallback_title: &str) -> QuizDraft {
    let QuizDocument {
        metadata,
        questions,
    } = document;
    QuizDraft {
        title: options
            .title
            .or(metadata.title)
            .unwrap_or_else(|| fallback_title.to_string()),
        description: options
            .description
            .or(metadata.description)
            .unwrap_or_default(),
        password: options.password.or(metadata.password),
        shuffle_questions: options.shuffle || metadata.shuffle.unwrap_or(false),
        questions,
    }
}
