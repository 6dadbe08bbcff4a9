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

use std::fs::write;
use std::path::PathBuf;

use quizdeck_core::error::Fallible;
use tempfile::tempdir;

/// Create a scratch store directory and return its path. The directory
/// outlives the test.
pub fn create_tmp_store() -> Fallible<String> {
    let dir: PathBuf = tempdir()?.keep();
    Ok(dir.canonicalize()?.display().to_string())
}

/// Create a scratch store directory with a quiz file in it. Returns the
/// directory and the path of the file.
pub fn create_tmp_store_with_file(name: &str, contents: &str) -> Fallible<(String, String)> {
    let directory = create_tmp_store()?;
    let path = PathBuf::from(&directory).join(name);
    write(&path, contents)?;
    Ok((directory, path.display().to_string()))
}
