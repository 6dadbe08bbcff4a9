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

use std::path::Path;

use quizdeck_core::error::ErrorReport;
use quizdeck_core::error::Fallible;
use quizdeck_core::error::fail;
use quizdeck_core::leaderboard::rank_attempts;
use quizdeck_core::sample::sample_quiz;
use quizdeck_core::types::attempt::QuizAttempt;
use quizdeck_core::types::question::Question;
use quizdeck_core::types::quiz::Quiz;
use quizdeck_core::types::quiz_id::QuizId;
use quizdeck_core::types::timestamp::Timestamp;
use rusqlite::Connection;
use rusqlite::Row;
use rusqlite::params;

const SCHEMA: &str = "
create table if not exists quizzes (
    quiz_id text primary key,
    title text not null,
    description text not null,
    created_at text not null,
    password text,
    shuffle_questions integer not null,
    questions text not null
);

create table if not exists attempts (
    attempt_id integer primary key autoincrement,
    quiz_id text not null,
    player_name text not null,
    score real not null,
    correct integer not null,
    total integer not null,
    submitted_at text not null
);

create index if not exists attempts_by_quiz on attempts (quiz_id);
";

const QUIZ_COLUMNS: &str =
    "quiz_id, title, description, created_at, password, shuffle_questions, questions";

/// Local storage for quizzes and attempts.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`. A newly created database
    /// starts with the sample quiz in it.
    pub fn new(path: &Path) -> Fallible<Self> {
        let fresh = !path.exists();
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        let db = Self { conn };
        if fresh {
            let sample = sample_quiz(Timestamp::now())?;
            db.insert_quiz(&sample)?;
            log::info!("Created {} with the sample quiz", path.display());
        }
        Ok(db)
    }

    pub fn insert_quiz(&self, quiz: &Quiz) -> Fallible<()> {
        let questions = serde_json::to_string(quiz.questions())?;
        self.conn.execute(
            "insert into quizzes (quiz_id, title, description, created_at, password, shuffle_questions, questions)
             values (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                quiz.id().to_hex(),
                quiz.title(),
                quiz.description(),
                quiz.created_at().to_string(),
                quiz.password(),
                quiz.shuffle_questions(),
                questions,
            ],
        )?;
        log::debug!("Inserted quiz {}", quiz.id());
        Ok(())
    }

    /// All quizzes, in the order they were stored.
    pub fn quizzes(&self) -> Fallible<Vec<Quiz>> {
        let sql = format!("select {QUIZ_COLUMNS} from quizzes order by rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], QuizRow::read)?;
        let mut quizzes = Vec::new();
        for row in rows {
            quizzes.push(row?.into_quiz()?);
        }
        Ok(quizzes)
    }

    /// Find a quiz by its id or an unambiguous prefix of it.
    pub fn find_quiz(&self, prefix: &str) -> Fallible<Quiz> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return fail(format!("invalid quiz id: '{prefix}'."));
        }
        let sql = format!("select {QUIZ_COLUMNS} from quizzes where quiz_id like ?1 || '%'");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([&prefix], QuizRow::read)?;
        let mut matches = Vec::new();
        for row in rows {
            matches.push(row?);
        }
        match matches.len() {
            0 => fail(format!("no quiz with id '{prefix}'.")),
            1 => matches.remove(0).into_quiz(),
            _ => fail(format!("quiz id '{prefix}' is ambiguous.")),
        }
    }

    /// Remove a quiz. Its attempts stay in the database.
    pub fn delete_quiz(&self, id: QuizId) -> Fallible<()> {
        let deleted = self
            .conn
            .execute("delete from quizzes where quiz_id = ?1", [id.to_hex()])?;
        if deleted == 0 {
            return fail(format!("no quiz with id '{id}'."));
        }
        log::debug!("Deleted quiz {id}");
        Ok(())
    }

    pub fn insert_attempt(&self, attempt: &QuizAttempt) -> Fallible<()> {
        let correct = count_to_sql(attempt.correct())?;
        let total = count_to_sql(attempt.total())?;
        self.conn.execute(
            "insert into attempts (quiz_id, player_name, score, correct, total, submitted_at)
             values (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                attempt.quiz_id().to_hex(),
                attempt.player_name(),
                attempt.score(),
                correct,
                total,
                attempt.submitted_at().to_string(),
            ],
        )?;
        Ok(())
    }

    /// The attempts at a quiz, in submission order.
    pub fn attempts(&self, quiz_id: QuizId) -> Fallible<Vec<QuizAttempt>> {
        let mut stmt = self.conn.prepare(
            "select quiz_id, player_name, score, correct, total, submitted_at
             from attempts where quiz_id = ?1 order by attempt_id",
        )?;
        let rows = stmt.query_map([quiz_id.to_hex()], AttemptRow::read)?;
        let mut attempts = Vec::new();
        for row in rows {
            attempts.push(row?.into_attempt()?);
        }
        Ok(attempts)
    }

    /// The best attempts at a quiz.
    pub fn leaderboard(&self, quiz_id: QuizId, limit: usize) -> Fallible<Vec<QuizAttempt>> {
        Ok(rank_attempts(self.attempts(quiz_id)?, quiz_id, limit))
    }
}

/// A quiz row before its text columns are validated.
struct QuizRow {
    quiz_id: String,
    title: String,
    description: String,
    created_at: String,
    password: Option<String>,
    shuffle_questions: bool,
    questions: String,
}

impl QuizRow {
    fn read(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            quiz_id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            created_at: row.get(3)?,
            password: row.get(4)?,
            shuffle_questions: row.get(5)?,
            questions: row.get(6)?,
        })
    }

    fn into_quiz(self) -> Fallible<Quiz> {
        let questions: Vec<Question> = serde_json::from_str(&self.questions)?;
        Ok(Quiz::restore(
            QuizId::from_hex(&self.quiz_id)?,
            self.title,
            self.description,
            Timestamp::try_from(self.created_at)?,
            self.password,
            self.shuffle_questions,
            questions,
        ))
    }
}

struct AttemptRow {
    quiz_id: String,
    player_name: String,
    score: f64,
    correct: i64,
    total: i64,
    submitted_at: String,
}

impl AttemptRow {
    fn read(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            quiz_id: row.get(0)?,
            player_name: row.get(1)?,
            score: row.get(2)?,
            correct: row.get(3)?,
            total: row.get(4)?,
            submitted_at: row.get(5)?,
        })
    }

    fn into_attempt(self) -> Fallible<QuizAttempt> {
        Ok(QuizAttempt::restore(
            QuizId::from_hex(&self.quiz_id)?,
            self.player_name,
            self.score,
            count_from_sql(self.correct)?,
            count_from_sql(self.total)?,
            Timestamp::try_from(self.submitted_at)?,
        ))
    }
}

fn count_to_sql(count: usize) -> Fallible<i64> {
    i64::try_from(count).map_err(|_| ErrorReport::new(format!("count out of range: {count}.")))
}

fn count_from_sql(count: i64) -> Fallible<usize> {
    usize::try_from(count).map_err(|_| ErrorReport::new(format!("invalid stored count: {count}.")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use quizdeck_core::parser::parse_quiz_content;
    use quizdeck_core::sample::SAMPLE_TITLE;
    use quizdeck_core::scoring::Score;
    use quizdeck_core::types::quiz::QuizDraft;
    use tempfile::tempdir;

    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::try_from(s.to_string()).unwrap()
    }

    fn make_quiz(title: &str, created_at: &str) -> Quiz {
        let draft = QuizDraft {
            title: title.to_string(),
            description: "desc".to_string(),
            password: Some("pw".to_string()),
            shuffle_questions: true,
            questions: parse_quiz_content("Câu 1: 2+2=?\nA. 3\n*B. 4"),
        };
        Quiz::new(draft, ts(created_at)).unwrap()
    }

    fn make_attempt(quiz: &Quiz, player: &str, correct: usize) -> QuizAttempt {
        let percentage = (correct * 100) as u32;
        let score = Score {
            correct,
            total: 1,
            score_out_of_ten: percentage as f64 / 10.0,
            percentage,
        };
        QuizAttempt::new(quiz.id(), player, &score, ts("2024-02-01T10:00:00.000"))
    }

    #[test]
    fn test_new_database_has_sample_quiz() -> Fallible<()> {
        let dir = tempdir()?;
        let db = Database::new(&dir.path().join("quizdeck.db"))?;
        let quizzes = db.quizzes()?;
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].title(), SAMPLE_TITLE);
        Ok(())
    }

    #[test]
    fn test_existing_database_is_not_reseeded() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("quizdeck.db");
        {
            let db = Database::new(&path)?;
            let sample = db.quizzes()?.remove(0);
            db.delete_quiz(sample.id())?;
        }
        let db = Database::new(&path)?;
        assert!(db.quizzes()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_quiz_roundtrip() -> Fallible<()> {
        let dir = tempdir()?;
        let db = Database::new(&dir.path().join("quizdeck.db"))?;
        let quiz = make_quiz("Arithmetic", "2024-01-01T12:00:00.000");
        db.insert_quiz(&quiz)?;
        let found = db.find_quiz(&quiz.id().to_hex())?;
        assert_eq!(found, quiz);
        let found = db.find_quiz(&quiz.id().short().to_uppercase())?;
        assert_eq!(found, quiz);
        assert_eq!(db.quizzes()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_find_errors() -> Fallible<()> {
        let dir = tempdir()?;
        let db = Database::new(&dir.path().join("quizdeck.db"))?;
        let quizzes: Vec<Quiz> = (0..17)
            .map(|i| make_quiz("q", &format!("2024-01-01T12:00:{i:02}.000")))
            .collect();
        for quiz in &quizzes {
            db.insert_quiz(quiz)?;
        }
        // Seventeen ids over sixteen hex digits: two must share a first digit.
        let mut by_first: HashMap<String, usize> = HashMap::new();
        for quiz in &quizzes {
            *by_first.entry(quiz.id().to_hex()[..1].to_string()).or_default() += 1;
        }
        let shared = by_first
            .into_iter()
            .find(|(_, count)| *count > 1)
            .map(|(digit, _)| digit)
            .unwrap();
        let err = db.find_quiz(&shared).err().unwrap();
        assert_eq!(err.to_string(), format!("error: quiz id '{shared}' is ambiguous."));

        assert!(db.find_quiz("").is_err());
        assert!(db.find_quiz("%").is_err());
        let missing = "0".repeat(64);
        let err = db.find_quiz(&missing).err().unwrap();
        assert_eq!(err.to_string(), format!("error: no quiz with id '{missing}'."));
        Ok(())
    }

    #[test]
    fn test_negative_stored_count_is_an_error() -> Fallible<()> {
        let dir = tempdir()?;
        let db = Database::new(&dir.path().join("quizdeck.db"))?;
        let quiz = db.quizzes()?.remove(0);
        db.insert_attempt(&make_attempt(&quiz, "ann", 1))?;
        db.conn.execute("update attempts set correct = -1", [])?;
        let err = db.attempts(quiz.id()).err().unwrap();
        assert_eq!(err.to_string(), "error: invalid stored count: -1.");
        Ok(())
    }

    #[test]
    fn test_delete_missing_quiz() -> Fallible<()> {
        let dir = tempdir()?;
        let db = Database::new(&dir.path().join("quizdeck.db"))?;
        let quiz = make_quiz("never stored", "2024-01-01T12:00:00.000");
        assert!(db.delete_quiz(quiz.id()).is_err());
        Ok(())
    }

    #[test]
    fn test_attempts_and_leaderboard() -> Fallible<()> {
        let dir = tempdir()?;
        let db = Database::new(&dir.path().join("quizdeck.db"))?;
        let quiz = make_quiz("Arithmetic", "2024-01-01T12:00:00.000");
        let other = make_quiz("Other", "2024-01-01T12:00:01.000");
        db.insert_quiz(&quiz)?;
        db.insert_quiz(&other)?;
        db.insert_attempt(&make_attempt(&quiz, "ann", 0))?;
        db.insert_attempt(&make_attempt(&other, "bob", 1))?;
        db.insert_attempt(&make_attempt(&quiz, "cat", 1))?;

        let attempts = db.attempts(quiz.id())?;
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0], make_attempt(&quiz, "ann", 0));

        let ranked = db.leaderboard(quiz.id(), 10)?;
        let names: Vec<&str> = ranked.iter().map(|a| a.player_name()).collect();
        assert_eq!(names, vec!["cat", "ann"]);
        assert_eq!(ranked[0].score(), 10.0);
        assert_eq!(db.leaderboard(quiz.id(), 1)?.len(), 1);

        // Deleting a quiz keeps its attempts.
        db.delete_quiz(quiz.id())?;
        assert_eq!(db.attempts(quiz.id())?.len(), 2);
        Ok(())
    }
}
