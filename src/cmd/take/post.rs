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

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::Redirect;
use quizdeck_core::error::ErrorReport;
use quizdeck_core::error::Fallible;
use quizdeck_core::error::fail;
use quizdeck_core::session::Session;
use quizdeck_core::types::question::QuestionId;
use quizdeck_core::types::timestamp::Timestamp;
use serde::Deserialize;

use crate::cmd::take::state::ServerState;

#[derive(Deserialize)]
pub struct FormData {
    action: Option<String>,
    toggle: Option<String>,
}

#[derive(Debug, PartialEq)]
enum Action {
    Toggle(QuestionId, char),
    Submit,
    Retry,
    Shutdown,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Result<Redirect, (StatusCode, Html<String>)> {
    let action = parse_action(form).map_err(|e| (StatusCode::BAD_REQUEST, Html(e.to_string())))?;
    match handle_action(&state, action) {
        Ok(()) => Ok(Redirect::to("/")),
        Err(e) => {
            log::error!("Failed to handle action: {e}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, Html(e.to_string())))
        }
    }
}

fn parse_action(form: FormData) -> Fallible<Action> {
    if let Some(toggle) = form.toggle {
        return parse_toggle(&toggle);
    }
    match form.action.as_deref() {
        Some("Submit") => Ok(Action::Submit),
        Some("Retry") => Ok(Action::Retry),
        Some("Shutdown") => Ok(Action::Shutdown),
        Some(other) => fail(format!("unknown action: '{other}'.")),
        None => fail("missing action."),
    }
}

/// Toggle values look like `3:B`: question id, then option letter.
fn parse_toggle(value: &str) -> Fallible<Action> {
    let invalid = || fail(format!("invalid toggle: '{value}'."));
    let Some((question, option)) = value.split_once(':') else {
        return invalid();
    };
    let Ok(question) = question.parse::<QuestionId>() else {
        return invalid();
    };
    let mut chars = option.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Ok(Action::Toggle(question, letter)),
        _ => invalid(),
    }
}

fn handle_action(state: &ServerState, action: Action) -> Fallible<()> {
    match action {
        Action::Toggle(question, option) => {
            let mut mutable = state.lock()?;
            if !mutable.session.toggle(question, option) {
                log::debug!("Ignoring toggle of {question}:{option}");
            }
        }
        Action::Submit => {
            let mut mutable = state.lock()?;
            if mutable.session.is_submitted() {
                log::debug!("Ignoring repeated submit");
                return Ok(());
            }
            // The session only freezes once the attempt is stored.
            let mut session = mutable.session.clone();
            let attempt = session.submit(Timestamp::now())?;
            mutable.db.insert_attempt(&attempt)?;
            mutable.session = session;
            mutable.attempts_submitted += 1;
            log::info!(
                "{} scored {}/{} on {}",
                attempt.player_name(),
                attempt.correct(),
                attempt.total(),
                state.quiz.id().short()
            );
        }
        Action::Retry => {
            let mut mutable = state.lock()?;
            if !mutable.session.is_submitted() {
                log::debug!("Ignoring retry before submit");
                return Ok(());
            }
            let player_name = mutable.session.player_name().to_string();
            let session = Session::start(&state.quiz, &player_name, &mut mutable.rng)?;
            mutable.session = session;
        }
        Action::Shutdown => {
            let tx = state
                .shutdown_tx
                .lock()
                .map_err(|_| ErrorReport::new("shutdown channel is poisoned."))?
                .take();
            if let Some(tx) = tx {
                let _ = tx.send(());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::Mutex;

    use quizdeck_core::rng::TinyRng;
    use rusqlite::Connection;
    use tokio::sync::oneshot::channel;

    use super::*;
    use crate::cmd::take::state::MutableState;
    use crate::db::Database;
    use crate::helper::create_tmp_store;
    use crate::store::DATABASE_FILE;

    fn form(action: Option<&str>, toggle: Option<&str>) -> FormData {
        FormData {
            action: action.map(str::to_string),
            toggle: toggle.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_action() -> Fallible<()> {
        assert_eq!(parse_action(form(Some("Submit"), None))?, Action::Submit);
        assert_eq!(parse_action(form(Some("Retry"), None))?, Action::Retry);
        assert_eq!(parse_action(form(Some("Shutdown"), None))?, Action::Shutdown);
        assert_eq!(parse_action(form(None, Some("3:B")))?, Action::Toggle(3, 'B'));
        assert!(parse_action(form(Some("Reveal"), None)).is_err());
        assert!(parse_action(form(None, None)).is_err());
        Ok(())
    }

    #[test]
    fn test_parse_invalid_toggle() {
        for value in ["", "3", "x:B", "3:", "3:BC", ":B"] {
            assert!(parse_toggle(value).is_err(), "{value}");
        }
    }

    #[test]
    fn test_failed_store_keeps_session_open() -> Fallible<()> {
        let path = PathBuf::from(create_tmp_store()?).join(DATABASE_FILE);
        let db = Database::new(&path)?;
        let quiz = db.quizzes()?.remove(0);
        let mut rng = TinyRng::from_seed(1);
        let session = Session::start(&quiz, "ann", &mut rng)?;
        let (shutdown_tx, _shutdown_rx) = channel();
        let state = ServerState {
            quiz: Arc::new(quiz),
            leaderboard_limit: 10,
            mutable: Arc::new(Mutex::new(MutableState {
                db,
                session,
                rng,
                attempts_submitted: 0,
            })),
            shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
        };

        let other = Connection::open(&path)?;
        other.execute_batch("alter table attempts rename to attempts_moved")?;
        assert!(handle_action(&state, Action::Submit).is_err());
        {
            let mutable = state.lock()?;
            assert!(!mutable.session.is_submitted());
            assert_eq!(mutable.attempts_submitted, 0);
        }

        other.execute_batch("alter table attempts_moved rename to attempts")?;
        handle_action(&state, Action::Submit)?;
        let mutable = state.lock()?;
        assert!(mutable.session.is_submitted());
        assert_eq!(mutable.attempts_submitted, 1);
        assert_eq!(mutable.db.attempts(state.quiz.id())?.len(), 1);
        Ok(())
    }
}
