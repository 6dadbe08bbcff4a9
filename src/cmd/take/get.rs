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

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use maud::Markup;
use maud::html;
use quizdeck_core::error::Fallible;
use quizdeck_core::scoring::Score;
use quizdeck_core::scoring::is_answered_correctly;
use quizdeck_core::session::AnswerSheet;
use quizdeck_core::session::Session;
use quizdeck_core::types::attempt::QuizAttempt;
use quizdeck_core::types::question::Question;
use quizdeck_core::types::quiz::Quiz;

use crate::cmd::take::state::ServerState;
use crate::cmd::take::template::page_template;
use crate::utils::format_score;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    match render_page(&state) {
        Ok(page) => (StatusCode::OK, Html(page.into_string())),
        Err(e) => {
            log::error!("Failed to render page: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(e.to_string()))
        }
    }
}

fn render_page(state: &ServerState) -> Fallible<Markup> {
    let mutable = state.lock()?;
    let body = match mutable.session.score() {
        Some(score) => {
            let ranked = mutable
                .db
                .leaderboard(state.quiz.id(), state.leaderboard_limit)?;
            render_results(&state.quiz, &mutable.session, score, &ranked)
        }
        None => render_session(&state.quiz, &mutable.session),
    };
    Ok(page_template(state.quiz.title(), body))
}

fn render_session(quiz: &Quiz, session: &Session) -> Markup {
    let answers = session.answers();
    html! {
        div.session {
            header {
                h1 { (quiz.title()) }
                p.description { (quiz.description()) }
                p.meta {
                    "Player: " (session.player_name())
                    " · Answered " (answers.answered_count()) " of " (session.questions().len())
                }
            }
            form action="/" method="post" {
                @for (number, question) in (1..).zip(session.questions()) {
                    div.question {
                        h2 { span.number { (number) "." } " " (question.text) }
                        div.options {
                            @for option in &question.options {
                                @let selected = answers.is_selected(question.id, option.id);
                                button.option.selected[selected]
                                    type="submit"
                                    name="toggle"
                                    value=(format!("{}:{}", question.id, option.id)) {
                                    span.letter { (option.id) "." } " " (option.text)
                                }
                            }
                        }
                    }
                }
                div.controls {
                    input id="submit" type="submit" name="action" value="Submit";
                    input id="shutdown" type="submit" name="action" value="Shutdown";
                }
            }
        }
    }
}

fn render_results(quiz: &Quiz, session: &Session, score: &Score, ranked: &[QuizAttempt]) -> Markup {
    html! {
        div.results {
            header {
                h1 { (quiz.title()) }
                p.meta { "Player: " (session.player_name()) }
            }
            div.score {
                p.total { (format_score(score.score_out_of_ten)) "/10" }
                p { (score.correct) "/" (score.total) " correct" }
                p { (score.percentage) "%" }
            }
            h2 { "Review" }
            @for (number, question) in (1..).zip(session.questions()) {
                (render_review(number, question, session.answers()))
            }
            h2 { "Leaderboard" }
            (render_leaderboard(ranked))
            form action="/" method="post" {
                div.controls {
                    input id="retry" type="submit" name="action" value="Retry";
                    input id="shutdown" type="submit" name="action" value="Shutdown";
                }
            }
        }
    }
}

fn render_review(number: usize, question: &Question, answers: &AnswerSheet) -> Markup {
    let empty = BTreeSet::new();
    let selected = answers.selected(question.id).unwrap_or(&empty);
    let correct = is_answered_correctly(question, selected);
    html! {
        div.review.right[correct].wrong[!correct] {
            h3 { span.number { (number) "." } " " (question.text) }
            ul {
                @for option in &question.options {
                    @let chosen = selected.contains(&option.id);
                    li.key[option.is_correct].chosen[chosen] {
                        span.letter { (option.id) "." } " " (option.text)
                        @if chosen {
                            " (your answer)"
                        }
                    }
                }
            }
        }
    }
}

fn render_leaderboard(ranked: &[QuizAttempt]) -> Markup {
    html! {
        @if ranked.is_empty() {
            p { "No attempts yet." }
        } @else {
            table.leaderboard {
                thead {
                    tr { th { "#" } th { "Player" } th { "Score" } th { "Correct" } th { "Date" } }
                }
                tbody {
                    @for (rank, attempt) in (1..).zip(ranked) {
                        tr {
                            td { (rank) }
                            td { (attempt.player_name()) }
                            td { (format_score(attempt.score())) "/10" }
                            td { (attempt.correct()) "/" (attempt.total()) }
                            td { (attempt.submitted_at().date_string()) }
                        }
                    }
                }
            }
        }
    }
}
