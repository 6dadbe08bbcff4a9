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
use quizdeck_core::leaderboard::DEFAULT_LEADERBOARD_LIMIT;
use quizdeck_core::parser::Parser;
use quizdeck_core::parser::ParserConfig;
use serde::Deserialize;

/// Name of the optional settings file in a store directory.
pub const CONFIG_FILE: &str = "quizdeck.toml";

/// Per-store settings.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub question_keyword: String,
    pub correct_marker: char,
    pub leaderboard_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        let parser = ParserConfig::default();
        Self {
            question_keyword: parser.question_keyword,
            correct_marker: parser.correct_marker,
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
        }
    }
}

impl Config {
    /// Read `quizdeck.toml` from the directory. A missing file means the
    /// defaults.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        log::debug!("Reading configuration from {}", path.display());
        let text = read_to_string(&path)?;
        let config: Config = toml::from_str(&text)?;
        Ok(config)
    }

    pub fn parser(&self) -> Parser {
        Parser::new(ParserConfig {
            question_keyword: self.question_keyword.clone(),
            correct_marker: self.correct_marker,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() -> Fallible<()> {
        let dir = tempdir()?;
        let config = Config::load(dir.path())?;
        assert_eq!(config, Config::default());
        assert_eq!(config.question_keyword, "Câu");
        assert_eq!(config.correct_marker, '*');
        assert_eq!(config.leaderboard_limit, 10);
        Ok(())
    }

    #[test]
    fn test_partial_file() -> Fallible<()> {
        let dir = tempdir()?;
        write(
            dir.path().join(CONFIG_FILE),
            "question_keyword = \"Question\"\nleaderboard_limit = 3\n",
        )?;
        let config = Config::load(dir.path())?;
        assert_eq!(config.question_keyword, "Question");
        assert_eq!(config.correct_marker, '*');
        assert_eq!(config.leaderboard_limit, 3);

        let questions = config.parser().parse("Question 1: q\n*A. a");
        assert_eq!(questions[0].text, "q");
        assert!(questions[0].options[0].is_correct);
        Ok(())
    }

    #[test]
    fn test_unknown_key_is_an_error() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join(CONFIG_FILE), "keyword = \"Q\"\n")?;
        assert!(Config::load(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_marker_must_be_one_character() -> Fallible<()> {
        let dir = tempdir()?;
        write(dir.path().join(CONFIG_FILE), "correct_marker = \"**\"\n")?;
        assert!(Config::load(dir.path()).is_err());
        Ok(())
    }
}
