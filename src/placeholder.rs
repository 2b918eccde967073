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

//! Rewriting of placeholder delimiters into `{{ }}` interpolation.
//!
//! Catalogs mix two placeholder conventions: bracket-delimited
//! variables such as `{name}` and `%`-style positional variables such
//! as `%0`. Both are rewritten into the double-brace form expected by
//! the client-side runtime.

use crate::plural::PLURAL_FRAGMENT_OPEN;
use regex::Regex;
use serde::Deserialize;
use std::ops::Range;
use std::sync::OnceLock;

const OPEN_INTERPOLATION: &str = "{{";
const CLOSE_INTERPOLATION: &str = "}}";

/// Where a string being rewritten comes from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Context {
    /// A plain message. Every delimiter is rewritten.
    Singular,
    /// A compiled ICU plural message. Only the first placeholder
    /// outside the plural syntax is rewritten.
    Plural,
}

/// The delimiters surrounding a variable in the source catalogs.
///
/// Configured as an array of one or two strings. A structure without a
/// closing mark disables the bracket rewriting and leaves only the
/// positional fallback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct PlaceholderStructure {
    open: String,
    close: Option<String>,
}

/// Invalid placeholder delimiters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaceholderStructureError {
    #[error("the opening placeholder mark must not be empty")]
    EmptyOpeningMark,
    #[error("expected one or two placeholder marks, got {0}")]
    WrongArity(usize),
}

impl PlaceholderStructure {
    pub fn new(
        open: impl Into<String>,
        close: Option<String>,
    ) -> Result<Self, PlaceholderStructureError> {
        let open = open.into();
        if open.is_empty() {
            return Err(PlaceholderStructureError::EmptyOpeningMark);
        }
        let close = close.filter(|close| !close.is_empty());
        Ok(Self { open, close })
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> Option<&str> {
        self.close.as_deref()
    }
}

impl Default for PlaceholderStructure {
    fn default() -> Self {
        Self {
            open: String::from("{"),
            close: Some(String::from("}")),
        }
    }
}

impl TryFrom<Vec<String>> for PlaceholderStructure {
    type Error = PlaceholderStructureError;

    fn try_from(marks: Vec<String>) -> Result<Self, Self::Error> {
        let mut marks = marks.into_iter();
        match (marks.next(), marks.next(), marks.len()) {
            (Some(open), close, 0) => Self::new(open, close),
            (None, _, _) => Err(PlaceholderStructureError::WrongArity(0)),
            (Some(_), _, rest) => Err(PlaceholderStructureError::WrongArity(rest + 2)),
        }
    }
}

/// Rewrite the placeholders in `text` into `{{ }}` interpolation.
///
/// The bracket pass only runs when `structure` has a closing mark and
/// `alt_enabled` is set. The positional pass always runs afterwards and
/// wraps every `%x` (a digit or lowercase letter) which is not already
/// wrapped.
///
/// # Examples
///
/// ```
/// use po2json::placeholder::{rewrite_placeholders, Context, PlaceholderStructure};
///
/// let structure = PlaceholderStructure::default();
/// assert_eq!(
///     rewrite_placeholders("Hello {name}", &structure, true, Context::Singular),
///     "Hello {{name}}"
/// );
/// assert_eq!(
///     rewrite_placeholders("Hello %0", &structure, true, Context::Singular),
///     "Hello {{%0}}"
/// );
/// ```
pub fn rewrite_placeholders(
    text: &str,
    structure: &PlaceholderStructure,
    alt_enabled: bool,
    context: Context,
) -> String {
    if text.is_empty() {
        return String::new();
    }

    let rewritten = match structure.close() {
        Some(close) if alt_enabled => match context {
            Context::Singular => text
                .replace(structure.open(), OPEN_INTERPOLATION)
                .replace(close, CLOSE_INTERPOLATION),
            Context::Plural => rewrite_first_placeholder(text, structure.open(), close),
        },
        _ => text.to_string(),
    };

    wrap_positional_placeholders(&rewritten)
}

/// Rewrite the first `open ... close` pair found outside the compiled
/// plural fragments.
fn rewrite_first_placeholder(text: &str, open: &str, close: &str) -> String {
    let fragments = plural_fragments(text);
    let outside = |idx: usize| !fragments.iter().any(|fragment| fragment.contains(&idx));

    let Some(start) = text
        .match_indices(open)
        .map(|(idx, _)| idx)
        .find(|&idx| outside(idx))
    else {
        return text.to_string();
    };
    let after = start + open.len();
    let end = text[after..]
        .match_indices(close)
        .map(|(idx, _)| after + idx)
        .find(|&idx| outside(idx));

    let mut result = String::with_capacity(text.len() + 2);
    result.push_str(&text[..start]);
    result.push_str(OPEN_INTERPOLATION);
    match end {
        Some(end) => {
            result.push_str(&text[after..end]);
            result.push_str(CLOSE_INTERPOLATION);
            result.push_str(&text[end + close.len()..]);
        }
        None => result.push_str(&text[after..]),
    }
    result
}

/// Byte ranges of the `{PLURALIZE, ...}` fragments in `text`.
///
/// An unbalanced fragment extends to the end of the text.
fn plural_fragments(text: &str) -> Vec<Range<usize>> {
    let mut fragments = Vec::new();
    let mut from = 0;
    while let Some(offset) = text[from..].find(PLURAL_FRAGMENT_OPEN) {
        let start = from + offset;
        let mut depth = 0usize;
        let mut end = text.len();
        for (idx, ch) in text[start..].char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = start + idx + 1;
                        break;
                    }
                }
                _ => {}
            }
        }
        fragments.push(start..end);
        from = end;
    }
    fragments
}

/// Wrap `%0`-style placeholders in `{{ }}`.
fn wrap_positional_placeholders(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"%[0-9a-z]").unwrap());

    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for m in re.find_iter(text) {
        let wrapped = text[..m.start()].ends_with(OPEN_INTERPOLATION)
            && text[m.end()..].starts_with(CLOSE_INTERPOLATION);
        result.push_str(&text[last..m.start()]);
        if wrapped {
            result.push_str(m.as_str());
        } else {
            result.push_str(OPEN_INTERPOLATION);
            result.push_str(m.as_str());
            result.push_str(CLOSE_INTERPOLATION);
        }
        last = m.end();
    }
    result.push_str(&text[last..]);
    result
}
