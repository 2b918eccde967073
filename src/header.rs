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

//! Completion of PO catalog headers.
//!
//! `polib` requires the catalog to start with a header entry that
//! defines a fixed set of fields. Catalogs written by other tools often
//! omit some of them, or have no header at all. The missing fields are
//! filled in with neutral defaults before parsing.

use std::borrow::Cow;
use std::collections::HashSet;

/// Header fields `polib` needs, with the value used when absent.
const REQUIRED_FIELDS: [(&str, &str); 9] = [
    ("Project-Id-Version", ""),
    ("POT-Creation-Date", ""),
    ("PO-Revision-Date", ""),
    ("Language-Team", ""),
    ("MIME-Version", "1.0"),
    ("Content-Type", "text/plain; charset=UTF-8"),
    ("Content-Transfer-Encoding", "8bit"),
    ("Language", ""),
    ("Plural-Forms", "nplurals=2; plural=(n != 1);"),
];

/// Escaped newline separating header fields.
const FIELD_SEPARATOR: &str = "\\n";

/// The header entry at the start of a catalog.
#[derive(Debug, PartialEq, Eq)]
struct HeaderEntry {
    /// Escaped `msgstr` content.
    msgstr: String,
    /// Index of the last line of the `msgstr`.
    last_line: usize,
}

/// Content of a `"..."` line.
fn quoted(line: &str) -> Option<&str> {
    line.strip_prefix('"')?.strip_suffix('"')
}

/// Find the header entry: a first entry with an empty `msgid`.
fn find_header(lines: &[&str]) -> Option<HeaderEntry> {
    let start = lines
        .iter()
        .position(|line| !line.is_empty() && !line.starts_with('#'))?;
    if lines[start] != r#"msgid """# {
        return None;
    }

    let msgstr_line = start + 1;
    let mut msgstr = quoted(lines.get(msgstr_line)?.strip_prefix("msgstr ")?)?.to_string();
    let mut last_line = msgstr_line;
    for line in &lines[msgstr_line + 1..] {
        match quoted(line) {
            Some(content) => {
                msgstr.push_str(content);
                last_line += 1;
            }
            None => break,
        }
    }
    Some(HeaderEntry { msgstr, last_line })
}

fn push_fields<'a>(text: &mut String, fields: impl IntoIterator<Item = &'a (&'a str, &'a str)>) {
    for (key, value) in fields {
        text.push_str(&format!("\"{key}: {value}{FIELD_SEPARATOR}\"\n"));
    }
}

fn push_lines(text: &mut String, lines: &[&str]) {
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
}

/// Return `text` with a header defining every field `polib` needs.
///
/// A catalog whose header is already complete is returned unchanged.
pub(crate) fn complete_header(text: &str) -> Cow<'_, str> {
    let lines = text.lines().collect::<Vec<_>>();

    let Some(header) = find_header(&lines) else {
        let mut completed = String::from("msgid \"\"\nmsgstr \"\"\n");
        push_fields(&mut completed, &REQUIRED_FIELDS);
        completed.push('\n');
        completed.push_str(text);
        return Cow::Owned(completed);
    };

    let present = header
        .msgstr
        .split(FIELD_SEPARATOR)
        .filter_map(|field| field.split_once(':'))
        .map(|(key, _)| key)
        .collect::<HashSet<_>>();
    let missing = REQUIRED_FIELDS
        .iter()
        .filter(|(key, _)| !present.contains(key))
        .collect::<Vec<_>>();
    if missing.is_empty() {
        return Cow::Borrowed(text);
    }

    let mut completed = String::with_capacity(text.len() + 64 * missing.len());
    push_lines(&mut completed, &lines[..=header.last_line]);
    if !header.msgstr.is_empty() && !header.msgstr.ends_with(FIELD_SEPARATOR) {
        completed.push_str(&format!("\"{FIELD_SEPARATOR}\"\n"));
    }
    push_fields(&mut completed, missing);
    push_lines(&mut completed, &lines[header.last_line + 1..]);
    Cow::Owned(completed)
}
