// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Expansion of source patterns into catalog paths.
//!
//! Patterns use the `glob` syntax: `*`, `?` and `[...]` match within
//! one path component and `**` matches any number of directories. A
//! pattern starting with `!` removes the files matched so far which it
//! matches.

use glob::{MatchOptions, Pattern};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Marker matching any number of directories.
pub const RECURSIVE_WILDCARD: &str = "**";

const EXCLUDE_PREFIX: char = '!';

/// Wildcards never match a `/`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("the pattern {0:?} has more than one `**`")]
    MultipleRecursiveWildcards(String),
    #[error("the pattern is empty")]
    Empty,
    #[error("the pattern {pattern:?} cannot be compiled: {message}")]
    Invalid { pattern: String, message: String },
}

impl PatternError {
    fn invalid(pattern: &str, err: glob::PatternError) -> Self {
        PatternError::Invalid {
            pattern: pattern.to_string(),
            message: err.to_string(),
        }
    }
}

fn has_wildcard(pattern: &str) -> bool {
    Pattern::escape(pattern) != pattern
}

fn compile(pattern: &str) -> Result<Pattern, PatternError> {
    Pattern::new(pattern).map_err(|err| PatternError::invalid(pattern, err))
}

/// Expand a single positive pattern.
///
/// A pattern without wildcards is returned as-is, whether the file
/// exists or not.
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, PatternError> {
    if pattern.is_empty() {
        return Err(PatternError::Empty);
    }
    if !has_wildcard(pattern) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let paths = glob::glob_with(pattern, MATCH_OPTIONS)
        .map_err(|err| PatternError::invalid(pattern, err))?;
    let files = paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                debug!("Skipping unreadable path: {err}");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    Ok(files)
}

/// Expand `patterns` in order into a list of unique paths.
///
/// Invalid patterns and patterns matching nothing are reported and
/// skipped.
pub fn expand_patterns(patterns: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        if let Some(excluded) = pattern.strip_prefix(EXCLUDE_PREFIX) {
            match compile(excluded) {
                Ok(exclusion) => {
                    files.retain(|file| !exclusion.matches_path_with(file, MATCH_OPTIONS));
                }
                Err(err) => warn!("Skipping exclusion: {err}"),
            }
            continue;
        }

        match expand_pattern(pattern) {
            Ok(matched) if matched.is_empty() => {
                warn!("Source pattern {pattern:?} did not match any file");
            }
            Ok(matched) => {
                debug!("Source pattern {pattern:?} matched {} file(s)", matched.len());
                for file in matched {
                    if !files.contains(&file) {
                        files.push(file);
                    }
                }
            }
            Err(err) => warn!("Skipping source pattern: {err}"),
        }
    }
    files
}
