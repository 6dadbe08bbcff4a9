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

//! Turns loosely formatted quiz text into questions.
//!
//! The grammar is deliberately forgiving. A question starts at the beginning
//! of a line with a label like `Câu 3:` and runs until the next such label.
//! Inside a question, options are introduced by a letter marker like `A.`,
//! `B)` or `C:`; a leading `*` marks the option as correct:
//!
//! ```text
//! Câu 1: 2+2=?
//! A. 3
//! *B. 4
//! C. 5
//! ```
//!
//! Parsing never fails. Text that doesn't fit the grammar ends up as
//! question text, or is dropped if it's an empty option.

use serde::Deserialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::question::AnswerOption;
use crate::types::question::Question;
use crate::types::question::QuestionId;

pub const DEFAULT_QUESTION_KEYWORD: &str = "Câu";

pub const DEFAULT_CORRECT_MARKER: char = '*';

const FRONTMATTER_DELIMITER: &str = "---";

/// The locale-specific parts of the grammar.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// The word that opens a question label, matched case-insensitively.
    pub question_keyword: String,
    /// The character that flags an option as correct.
    pub correct_marker: char,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            question_keyword: DEFAULT_QUESTION_KEYWORD.to_string(),
            correct_marker: DEFAULT_CORRECT_MARKER,
        }
    }
}

/// Metadata that can be specified at the top of a quiz file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct QuizMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub password: Option<String>,
    pub shuffle: Option<bool>,
}

/// A quiz file: optional frontmatter plus the parsed questions.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizDocument {
    pub metadata: QuizMetadata,
    pub questions: Vec<Question>,
}

/// Parse quiz text using the default grammar.
pub fn parse_quiz_content(text: &str) -> Vec<Question> {
    Parser::default().parse(text)
}

/// Extract TOML frontmatter from a quiz file.
/// Returns (frontmatter_metadata, content_without_frontmatter)
pub fn extract_frontmatter(text: &str) -> Fallible<(Option<QuizMetadata>, &str)> {
    let mut lines = text.split_inclusive('\n');
    let mut offset = match lines.next() {
        Some(line) if trim(line) == FRONTMATTER_DELIMITER => line.len(),
        _ => return Ok((None, text)),
    };
    let start = offset;
    for line in lines {
        if trim(line) == FRONTMATTER_DELIMITER {
            let metadata: QuizMetadata = toml::from_str(&text[start..offset])
                .map_err(|e| ErrorReport::new(format!("Failed to parse TOML frontmatter: {e}")))?;
            return Ok((Some(metadata), &text[offset + line.len()..]));
        }
        offset += line.len();
    }
    fail("Frontmatter opening '---' found but no closing '---'")
}

/// An option marker found in a question block.
#[derive(Debug, PartialEq)]
struct OptionMarker {
    /// Byte offset of the match, including the whitespace before the label.
    start: usize,
    /// Byte offset just past the whitespace after the delimiter.
    end: usize,
    correct: bool,
    letter: char,
}

#[derive(Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Parser { config }
    }

    /// Parse all the questions in the given text.
    pub fn parse(&self, text: &str) -> Vec<Question> {
        if trim(text).is_empty() {
            return Vec::new();
        }
        let text = normalize_newlines(text);
        self.split_blocks(&text)
            .into_iter()
            .map(trim)
            .filter(|block| !block.is_empty())
            .zip(1..)
            .map(|(block, id)| self.parse_block(id, block))
            .collect()
    }

    /// Split off frontmatter, then parse the rest.
    pub fn parse_document(&self, text: &str) -> Fallible<QuizDocument> {
        let (metadata, content) = extract_frontmatter(text)?;
        Ok(QuizDocument {
            metadata: metadata.unwrap_or_default(),
            questions: self.parse(content),
        })
    }

    /// Cut the text at every line that starts with a question label. The
    /// label stays at the start of the block it opens. Anything before the
    /// first label is a block of its own.
    fn split_blocks<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut blocks = Vec::new();
        let mut start = 0;
        for (idx, _) in text.match_indices('\n') {
            let line_start = idx + 1;
            if self.question_label_len(&text[line_start..]).is_some() {
                blocks.push(&text[start..line_start]);
                start = line_start;
            }
        }
        blocks.push(&text[start..]);
        blocks
    }

    fn parse_block(&self, id: QuestionId, block: &str) -> Question {
        let markers = self.scan_option_markers(block);
        let candidate = match markers.first() {
            Some(first) => &block[..first.start],
            None => block,
        };
        let mut options = Vec::new();
        for (idx, marker) in markers.iter().enumerate() {
            let end = markers.get(idx + 1).map_or(block.len(), |next| next.start);
            let content = trim(&block[marker.end..end]);
            if content.is_empty() {
                continue;
            }
            options.push(AnswerOption {
                id: marker.letter,
                text: content.to_string(),
                is_correct: marker.correct,
            });
        }
        Question {
            id,
            text: self.strip_question_label(trim(candidate)).to_string(),
            options,
        }
    }

    /// Remove a leading `Câu 12:` label and the whitespace after it.
    fn strip_question_label<'a>(&self, text: &'a str) -> &'a str {
        match self.question_label_len(text) {
            Some(len) => trim(&text[len..]),
            None => trim(text),
        }
    }

    /// If `text` starts with `keyword ws+ digits+ [:.]`, the byte length of
    /// that label.
    fn question_label_len(&self, text: &str) -> Option<usize> {
        let rest = strip_prefix_ignore_case(text, &self.config.question_keyword)?;
        let after_space = rest.trim_start_matches(is_space);
        if after_space.len() == rest.len() {
            return None;
        }
        let digits = after_space.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let after_digits = &after_space[digits..];
        if after_digits.starts_with([':', '.']) {
            Some(text.len() - after_digits.len() + 1)
        } else {
            None
        }
    }

    /// Find option markers left to right. Matches never overlap: scanning
    /// resumes right after the whitespace that closes the previous marker,
    /// so in `A. B. x` only `A.` is a marker.
    fn scan_option_markers(&self, block: &str) -> Vec<OptionMarker> {
        let mut markers = Vec::new();
        let mut pos = 0;
        while pos < block.len() {
            match self.option_marker_at(block, pos) {
                Some(marker) => {
                    pos = marker.end;
                    markers.push(marker);
                }
                None => {
                    pos += block[pos..].chars().next().map_or(1, char::len_utf8);
                }
            }
        }
        markers
    }

    /// A marker either starts the block or follows a whitespace character.
    fn option_marker_at(&self, text: &str, pos: usize) -> Option<OptionMarker> {
        let rest = &text[pos..];
        if pos == 0 {
            if let Some((len, correct, letter)) = self.option_label(rest) {
                return Some(OptionMarker {
                    start: 0,
                    end: len,
                    correct,
                    letter,
                });
            }
        }
        let space = rest.chars().next().filter(|c| is_space(*c))?;
        let label_start = pos + space.len_utf8();
        let (len, correct, letter) = self.option_label(&text[label_start..])?;
        Some(OptionMarker {
            start: pos,
            end: label_start + len,
            correct,
            letter,
        })
    }

    /// Match `flag? letter delimiter whitespace` at the start of `text`.
    /// Returns the byte length, whether the flag was present, and the letter.
    fn option_label(&self, text: &str) -> Option<(usize, bool, char)> {
        if let Some(rest) = text.strip_prefix(self.config.correct_marker) {
            if let Some((len, letter)) = letter_label(rest) {
                return Some((text.len() - rest.len() + len, true, letter));
            }
        }
        letter_label(text).map(|(len, letter)| (len, false, letter))
    }
}

/// Match `[A-Z][.:)]` followed by one whitespace character.
fn letter_label(text: &str) -> Option<(usize, char)> {
    let mut chars = text.chars();
    let letter = chars.next().filter(char::is_ascii_uppercase)?;
    chars.next().filter(|c| matches!(c, '.' | ':' | ')'))?;
    let space = chars.next().filter(|c| is_space(*c))?;
    Some((2 + space.len_utf8(), letter))
}

/// The whitespace class of quiz text. Unicode `White_Space` minus U+0085,
/// plus the byte order mark, so a file saved with a BOM parses like one
/// without.
fn is_space(c: char) -> bool {
    c == '\u{FEFF}' || (c != '\u{0085}' && c.is_whitespace())
}

fn trim(text: &str) -> &str {
    text.trim_matches(is_space)
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = text.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = chars.next()?;
        if actual != expected && !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(&text[chars.offset()..])
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn option(id: char, text: &str, is_correct: bool) -> AnswerOption {
        AnswerOption {
            id,
            text: text.to_string(),
            is_correct,
        }
    }

    fn assert_dense_ids(questions: &[Question]) {
        for (idx, question) in questions.iter().enumerate() {
            assert_eq!(question.id as usize, idx + 1);
        }
    }

    #[test]
    fn test_empty_string() {
        assert!(parse_quiz_content("").is_empty());
    }

    #[test]
    fn test_whitespace_string() {
        assert!(parse_quiz_content("   \n\t").is_empty());
        assert!(parse_quiz_content("\r\n\r\n").is_empty());
    }

    #[test]
    fn test_single_question() {
        let input = "Câu 1: 2+2=?\nA. 3\n*B. 4\nC. 5";
        let questions = parse_quiz_content(input);
        assert_eq!(
            questions,
            vec![Question {
                id: 1,
                text: "2+2=?".to_string(),
                options: vec![
                    option('A', "3", false),
                    option('B', "4", true),
                    option('C', "5", false),
                ],
            }]
        );
    }

    #[test]
    fn test_multiple_correct_options() {
        let input = "Câu 1: Which are even?\n*A. 2\nB. 3\n*C. 4";
        let questions = parse_quiz_content(input);
        let correct: Vec<char> = questions[0]
            .options
            .iter()
            .filter(|o| o.is_correct)
            .map(|o| o.id)
            .collect();
        assert_eq!(correct, vec!['A', 'C']);
    }

    #[test]
    fn test_ids_are_structural() {
        let input = "Câu 5: first\nA. x\n\nCâu 2: second\nA. y\n\nCâu 9. third";
        let questions = parse_quiz_content(input);
        assert_eq!(questions.len(), 3);
        assert_dense_ids(&questions);
        assert_eq!(questions[0].text, "first");
        assert_eq!(questions[1].text, "second");
        assert_eq!(questions[2].text, "third");
    }

    #[test]
    fn test_question_without_options() {
        let questions = parse_quiz_content("Câu 1: Explain ownership.");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Explain ownership.");
        assert!(questions[0].options.is_empty());
    }

    #[test]
    fn test_text_without_labels_is_one_question() {
        let questions = parse_quiz_content("What is 1+1?\nA. 2\nB. 3");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "What is 1+1?");
        assert_eq!(questions[0].options.len(), 2);
    }

    #[test]
    fn test_preamble_becomes_a_question() {
        let questions = parse_quiz_content("Read carefully.\nCâu 1: q\nA. a");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "Read carefully.");
        assert!(questions[0].options.is_empty());
        assert_eq!(questions[1].text, "q");
        assert_dense_ids(&questions);
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        let questions = parse_quiz_content("câu 1: a\nA. x\nCÂU 2: b\nB. y");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "a");
        assert_eq!(questions[1].text, "b");
    }

    #[test]
    fn test_label_must_start_a_line() {
        let questions = parse_quiz_content("Câu 1: see Câu 2: for context\nA. ok");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "see Câu 2: for context");
    }

    #[test]
    fn test_label_requires_number_and_delimiter() {
        let questions = parse_quiz_content("Câu 1: a\nA. x\nCâu hỏi: not a label\nB. y");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].options[0].text, "x\nCâu hỏi: not a label");
    }

    #[test]
    fn test_crlf_line_endings() {
        let questions = parse_quiz_content("Câu 1: a\r\nA. x\r\n*B. y\r\nCâu 2: b\r\nA. z");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].options[0].text, "x");
        assert_eq!(questions[0].options[1], option('B', "y", true));
    }

    #[test]
    fn test_inline_options_and_delimiters() {
        let questions = parse_quiz_content("Câu 1: Pick one A) red *B: green C. blue");
        assert_eq!(questions[0].text, "Pick one");
        assert_eq!(
            questions[0].options,
            vec![
                option('A', "red", false),
                option('B', "green", true),
                option('C', "blue", false),
            ]
        );
    }

    #[test]
    fn test_option_content_spans_lines() {
        let questions = parse_quiz_content("Câu 1: q\nA. first line\nsecond line\nB. other");
        assert_eq!(questions[0].options[0].text, "first line\nsecond line");
    }

    #[test]
    fn test_empty_option_is_dropped() {
        let questions = parse_quiz_content("Câu 1: q\nA. \nB. b\nC.\tc");
        assert_eq!(
            questions[0].options,
            vec![option('B', "b", false), option('C', "c", false)]
        );
    }

    #[test]
    fn test_adjacent_markers_do_not_overlap() {
        // The space after `A.` is consumed by the first marker, so `B.` has
        // no whitespace of its own in front of it.
        let questions = parse_quiz_content("Câu 1: q\nA. B. x\nC. y");
        assert_eq!(
            questions[0].options,
            vec![option('A', "B. x", false), option('C', "y", false)]
        );
    }

    #[test]
    fn test_lowercase_letters_are_not_markers() {
        let questions = parse_quiz_content("Câu 1: q\na. x\nB. y");
        assert_eq!(questions[0].text, "q\na. x");
        assert_eq!(questions[0].options, vec![option('B', "y", false)]);
    }

    #[test]
    fn test_marker_needs_trailing_whitespace() {
        let questions = parse_quiz_content("Câu 1: Version A.1 or B.2?\nA. one");
        assert_eq!(questions[0].text, "Version A.1 or B.2?");
        assert_eq!(questions[0].options.len(), 1);
    }

    #[test]
    fn test_option_ids_keep_source_letters() {
        let questions = parse_quiz_content("Câu 1: q\nA. x\nC. y\nB. z");
        let ids: Vec<char> = questions[0].options.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!['A', 'C', 'B']);
    }

    #[test]
    fn test_block_starting_with_option() {
        let questions = parse_quiz_content("*A. only option");
        assert_eq!(questions[0].text, "");
        assert_eq!(questions[0].options, vec![option('A', "only option", true)]);
    }

    #[test]
    fn test_label_only_block() {
        let questions = parse_quiz_content("Câu 1:\nCâu 2: b");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "");
        assert_eq!(questions[1].text, "b");
    }

    #[test]
    fn test_ids_are_dense_for_odd_inputs() {
        let inputs = [
            "Câu 1:",
            "\n\nCâu 1: a\n\n\n\nCâu 1: b\n",
            "A. B. C. D.",
            "Câu 1. *A) *B) ",
            "garbage * A. \u{00a0}B. x",
            "Câu\n1: a\nCâu 2: b",
            "Câu 1: \u{1F600}\n*Z: \u{1F600}",
        ];
        for input in inputs {
            assert_dense_ids(&parse_quiz_content(input));
        }
    }

    #[test]
    fn test_label_whitespace_may_span_lines() {
        let questions = parse_quiz_content("intro\nCâu\n1: a");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].text, "a");
    }

    #[test]
    fn test_custom_grammar() {
        let parser = Parser::new(ParserConfig {
            question_keyword: "Question".to_string(),
            correct_marker: '+',
        });
        let questions = parser.parse("question 1: a?\nA. no\n+B. yes\nQuestion 2: b?\n*A. star");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "a?");
        assert_eq!(questions[0].options[1], option('B', "yes", true));
        // `*` is just text under this grammar.
        assert_eq!(questions[1].text, "b?\n*A. star");
        assert!(questions[1].options.is_empty());
    }

    #[test]
    fn test_extract_frontmatter() -> Fallible<()> {
        let input = "---\ntitle = \"Web basics\"\nshuffle = true\n---\nCâu 1: q\nA. a";
        let (metadata, content) = extract_frontmatter(input)?;
        let metadata = metadata.unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Web basics"));
        assert_eq!(metadata.shuffle, Some(true));
        assert_eq!(metadata.password, None);
        assert_eq!(content, "Câu 1: q\nA. a");
        Ok(())
    }

    #[test]
    fn test_no_frontmatter() -> Fallible<()> {
        let input = "Câu 1: q\n---\nA. a";
        let (metadata, content) = extract_frontmatter(input)?;
        assert!(metadata.is_none());
        assert_eq!(content, input);
        Ok(())
    }

    #[test]
    fn test_unclosed_frontmatter() {
        let result = extract_frontmatter("---\ntitle = \"x\"\nCâu 1: q");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_frontmatter() {
        let result = extract_frontmatter("---\ntitle = \n---\nCâu 1: q");
        assert!(result.is_err());
    }

    #[test]
    fn test_byte_order_mark() {
        let questions = parse_quiz_content("\u{FEFF}Câu 1: 2+2=?\nA. 3\n*B. 4");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "2+2=?");
        assert_eq!(questions[0].correct_key(), BTreeSet::from(['B']));
        assert!(parse_quiz_content("\u{FEFF}").is_empty());
        assert!(parse_quiz_content("\u{FEFF} \n\u{FEFF}").is_empty());
    }

    #[test]
    fn test_frontmatter_after_byte_order_mark() -> Fallible<()> {
        let input = "\u{FEFF}---\ntitle = \"t\"\n---\nCâu 1: q\n*A. a";
        let document = Parser::default().parse_document(input)?;
        assert_eq!(document.metadata.title.as_deref(), Some("t"));
        assert_eq!(document.questions[0].text, "q");
        Ok(())
    }

    #[test]
    fn test_next_line_is_not_a_space() {
        // U+0085 does not separate an option marker from its text.
        let questions = parse_quiz_content("Câu 1: q\nA.\u{0085}x");
        assert!(questions[0].options.is_empty());
    }

    #[test]
    fn test_parse_document() -> Fallible<()> {
        let input = "---\ndescription = \"d\"\n---\r\nCâu 1: q\r\n*A. a";
        let document = Parser::default().parse_document(input)?;
        assert_eq!(document.metadata.description.as_deref(), Some("d"));
        assert_eq!(document.questions.len(), 1);
        assert!(document.questions[0].options[0].is_correct);
        Ok(())
    }
}
