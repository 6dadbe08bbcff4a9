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

use std::sync::Arc;
use std::sync::Mutex;

use axum::Router;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use axum::routing::post;
use quizdeck_core::error::Fallible;
use quizdeck_core::error::fail;
use quizdeck_core::rng::TinyRng;
use quizdeck_core::session::Session;
use tokio::net::TcpListener;
use tokio::select;
use tokio::signal;
use tokio::sync::oneshot::Receiver;
use tokio::sync::oneshot::channel;

use crate::cmd::take::get::get_handler;
use crate::cmd::take::post::post_handler;
use crate::cmd::take::state::MutableState;
use crate::cmd::take::state::ServerState;
use crate::store::Store;
use crate::utils::CACHE_CONTROL_IMMUTABLE;

pub struct TakeConfig {
    pub directory: Option<String>,
    /// Id, or id prefix, of the quiz to take.
    pub quiz: String,
    pub player_name: String,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
}

pub async fn start_server(config: TakeConfig) -> Fallible<()> {
    let Store { db, config: store_config, .. } = Store::open(config.directory)?;
    let quiz = db.find_quiz(&config.quiz)?;
    if !quiz.unlock(config.password.as_deref().unwrap_or_default()) {
        return fail("incorrect password.");
    }

    let mut rng = TinyRng::from_clock();
    let session = Session::start(&quiz, &config.player_name, &mut rng)?;
    log::debug!(
        "Starting session for {} on {} ({} questions)",
        session.player_name(),
        quiz.id().short(),
        session.questions().len()
    );

    let (shutdown_tx, shutdown_rx) = channel();

    let state = ServerState {
        quiz: Arc::new(quiz),
        leaderboard_limit: store_config.leaderboard_limit,
        mutable: Arc::new(Mutex::new(MutableState {
            db,
            session,
            rng,
            attempts_submitted: 0,
        })),
        shutdown_tx: Arc::new(Mutex::new(Some(shutdown_tx))),
    };
    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/style.css", get(style_handler));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state.clone());
    let bind = format!("{}:{}", config.host, config.port);

    // Serve until Ctrl+C or the shutdown button.
    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_rx))
        .await?;

    if state.lock()?.attempts_submitted > 0 {
        Ok(())
    } else {
        fail("Session interrupted before submission")
    }
}

async fn style_handler() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, CACHE_CONTROL_IMMUTABLE),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}

async fn shutdown_signal(shutdown_rx: Receiver<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    let shutdown = async {
        shutdown_rx.await.ok();
    };

    select! {
        _ = ctrl_c => {
            log::debug!("Received Ctrl+C, shutting down gracefully");
        },
        _ = shutdown => {
            log::debug!("Received shutdown signal, shutting down gracefully");
        },
    }
}
