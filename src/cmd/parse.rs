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
use std::fs::read_to_string;

use clap::ValueEnum;
use quizdeck_core::error::Fallible;
use quizdeck_core::types::question::Question;

use crate::config::Config;
use crate::store::resolve_directory;

#[derive(ValueEnum, Clone, Copy, PartialEq, Debug)]
pub enum ParseFormat {
    /// Human-readable listing.
    Text,
    /// The parsed questions as JSON.
    Json,
}

impl Display for ParseFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseFormat::Text => write!(f, "text"),
            ParseFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse a quiz file with the store's grammar and print what was found.
pub fn parse_file(directory: Option<String>, file: String, format: ParseFormat) -> Fallible<()> {
    let directory = resolve_directory(directory)?;
    let config = Config::load(&directory)?;
    let text = read_to_string(&file)?;
    let document = config.parser().parse_document(&text)?;
    log::debug!("Parsed {} questions from {file}", document.questions.len());
    println!("{}", render_questions(&document.questions, format)?);
    Ok(())
}

pub fn render_questions(questions: &[Question], format: ParseFormat) -> Fallible<String> {
    match format {
        ParseFormat::Json => Ok(serde_json::to_string_pretty(questions)?),
        ParseFormat::Text => {
            let mut out = String::new();
            for question in questions {
                out.push_str(&format!("{}. {}\n", question.id, question.text));
                for option in &question.options {
                    let flag = if option.is_correct { '*' } else { ' ' };
                    out.push_str(&format!("  {flag} {}. {}\n", option.id, option.text));
                }
            }
            out.push_str(&format!("{} questions", questions.len()));
            Ok(out)
        }
    }
}
