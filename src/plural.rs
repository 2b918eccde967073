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

//! Compilation of singular/plural message pairs into ICU plural messages.

use crate::config::Options;
use crate::placeholder::{rewrite_placeholders, Context};
use tracing::info;

/// Start of every compiled plural fragment.
pub(crate) const PLURAL_FRAGMENT_OPEN: &str = "{PLURALIZE";

/// Word marking that the next differing word follows a count.
const NUMBER_PLACEHOLDER: &str = "%d";

/// Build an ICU plural message from word-aligned singular and plural
/// translations.
///
/// Words which are the same in both forms are kept as-is. Each pair
/// of differing words becomes a `{PLURALIZE, plural, ...}` fragment.
/// A word containing `%d` is dropped and turns the next fragment into
/// one starting with the `#` count.
///
/// Words beyond the end of the shorter form are omitted.
///
/// # Examples
///
/// ```
/// use po2json::plural::assemble_plural;
///
/// assert_eq!(
///     assemble_plural("You have %d item", "You have %d items", 1),
///     "You have {PLURALIZE, plural, offset:1 =2{# item} other{# items}}"
/// );
/// ```
pub fn assemble_plural(singular: &str, plural: &str, offset: u32) -> String {
    if singular.is_empty() {
        return String::new();
    }

    let singular_words = singular.split_whitespace().collect::<Vec<_>>();
    let plural_words = plural.split_whitespace().collect::<Vec<_>>();
    if singular_words.len() != plural_words.len() {
        info!(
            singular,
            plural,
            "Singular and plural forms have a different number of words, \
             omitting the extra words"
        );
    }

    let mut fragments = Vec::with_capacity(singular_words.len());
    let mut after_number = false;
    for (singular_word, plural_word) in singular_words.iter().zip(&plural_words) {
        let words = [singular_word, plural_word];
        if words.iter().any(|word| word.contains(NUMBER_PLACEHOLDER)) {
            after_number = true;
            continue;
        }

        if singular_word == plural_word {
            fragments.push(singular_word.to_string());
            continue;
        }

        let prefix = if std::mem::take(&mut after_number) {
            "# "
        } else {
            ""
        };
        fragments.push(format!(
            "{PLURAL_FRAGMENT_OPEN}, plural, offset:{offset} \
             =2{{{prefix}{singular_word}}} other{{{prefix}{plural_word}}}}}"
        ));
    }

    fragments.join(" ")
}

/// Compile a plural entry and rewrite its placeholders.
pub fn compile_plural(singular: &str, plural: &str, options: &Options) -> String {
    let assembled = assemble_plural(singular, plural, options.offset);
    rewrite_placeholders(
        &assembled,
        &options.placeholder_structure,
        options.enable_alt_placeholders,
        Context::Plural,
    )
}
