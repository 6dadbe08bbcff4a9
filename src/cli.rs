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

use std::process::exit;

use clap::Parser;
use quizdeck_core::error::Fallible;
use tokio::spawn;

use crate::cmd::create::CreateOptions;
use crate::cmd::create::create_quiz;
use crate::cmd::create::import_quizzes;
use crate::cmd::delete::delete_quiz;
use crate::cmd::leaderboard::print_leaderboard;
use crate::cmd::list::SortOrder;
use crate::cmd::list::list_quizzes;
use crate::cmd::parse::ParseFormat;
use crate::cmd::parse::parse_file;
use crate::cmd::take::server::TakeConfig;
use crate::cmd::take::server::start_server;
use crate::utils::wait_for_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Parse a quiz file and print the questions found in it.
    Parse {
        /// Path to the quiz file.
        file: String,
        /// Path to the store directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
        /// Which output format to use.
        #[arg(long, default_value_t = ParseFormat::Text)]
        format: ParseFormat,
    },
    /// Create a quiz from a file and add it to the store.
    Create {
        /// Path to the quiz file.
        file: String,
        /// Path to the store directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
        /// The quiz title. Overrides the file's frontmatter; by default the file name is used.
        #[arg(long)]
        title: Option<String>,
        /// A short description of the quiz.
        #[arg(long)]
        description: Option<String>,
        /// Require this password to take the quiz.
        #[arg(long)]
        password: Option<String>,
        /// Shuffle the questions every time the quiz is taken.
        #[arg(long)]
        shuffle: bool,
    },
    /// Create a quiz for every .txt and .md file in a directory tree.
    Import {
        /// Path to the directory to import from.
        source: String,
        /// Path to the store directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// List the quizzes in the store.
    List {
        /// Path to the store directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
        /// Only show quizzes whose title or description contains this text.
        #[arg(long)]
        search: Option<String>,
        /// How to sort the quizzes.
        #[arg(long, default_value_t = SortOrder::Newest)]
        sort: SortOrder,
    },
    /// Delete a quiz. Its attempts are kept.
    Delete {
        /// The quiz id, or a prefix of it.
        id: String,
        /// Path to the store directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
    },
    /// Print the best attempts at a quiz.
    Leaderboard {
        /// The quiz id, or a prefix of it.
        id: String,
        /// Path to the store directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
        /// How many attempts to show. By default, the store's configured limit.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Take a quiz through a web interface.
    Take {
        /// The quiz id, or a prefix of it.
        id: String,
        /// Your name, as shown on the leaderboard.
        #[arg(long)]
        name: String,
        /// The quiz password, if it has one.
        #[arg(long)]
        password: Option<String>,
        /// Path to the store directory. By default, the current working directory is used.
        #[arg(long)]
        directory: Option<String>,
        /// The host address to bind to. Default is 127.0.0.1.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// The port to use for the web server. Default is 8000.
        #[arg(long, default_value_t = 8000)]
        port: u16,
        /// Whether to open the browser automatically. Default is true.
        #[arg(long)]
        open_browser: Option<bool>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Parse {
            file,
            directory,
            format,
        } => parse_file(directory, file, format),
        Command::Create {
            file,
            directory,
            title,
            description,
            password,
            shuffle,
        } => {
            let options = CreateOptions {
                title,
                description,
                password,
                shuffle,
            };
            create_quiz(directory, file, options)
        }
        Command::Import { source, directory } => import_quizzes(directory, source),
        Command::List {
            directory,
            search,
            sort,
        } => list_quizzes(directory, search, sort),
        Command::Delete { id, directory } => delete_quiz(directory, id),
        Command::Leaderboard {
            id,
            directory,
            limit,
        } => print_leaderboard(directory, id, limit),
        Command::Take {
            id,
            name,
            password,
            directory,
            host,
            port,
            open_browser,
        } => {
            if open_browser.unwrap_or(true) {
                // Start a separate task to open the browser once the server is up.
                let browser_host = host.clone();
                spawn(async move {
                    match wait_for_server(&browser_host, port).await {
                        Ok(_) => {
                            let _ = open::that(format!("http://{browser_host}:{port}/"));
                        }
                        Err(e) => {
                            eprintln!("Failed to connect to server: {e}");
                            exit(-1)
                        }
                    }
                });
            }
            let config = TakeConfig {
                directory,
                quiz: id,
                player_name: name,
                password,
                host,
                port,
            };
            start_server(config).await
        }
    }
}
