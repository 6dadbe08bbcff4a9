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

use std::env::current_dir;
use std::path::PathBuf;

use quizdeck_core::error::Fallible;
use quizdeck_core::error::fail;

use crate::config::Config;
use crate::db::Database;

pub const DATABASE_FILE: &str = "quizdeck.db";

/// Resolve the `--directory` argument, defaulting to the current directory.
pub fn resolve_directory(directory: Option<String>) -> Fallible<PathBuf> {
    let directory = match directory {
        Some(dir) => PathBuf::from(dir),
        None => current_dir()?,
    };
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    Ok(directory.canonicalize()?)
}

/// A directory holding the quiz database and its settings.
pub struct Store {
    pub directory: PathBuf,
    pub db: Database,
    pub config: Config,
}

impl Store {
    pub fn open(directory: Option<String>) -> Fallible<Self> {
        let directory = resolve_directory(directory)?;
        let config = Config::load(&directory)?;
        let db = Database::new(&directory.join(DATABASE_FILE))?;
        log::debug!("Opened store at {}", directory.display());
        Ok(Self {
            directory,
            db,
            config,
        })
    }
}
