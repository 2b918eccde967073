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

//! Conversion of a parsed catalog into a flat id to string mapping.

use crate::config::Options;
use crate::header::complete_header;
use crate::placeholder::{rewrite_placeholders, Context};
use crate::plural::compile_plural;
use anyhow::{anyhow, Context as _};
use polib::catalog::Catalog;
use polib::message::MessageView;
use polib::po_file;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Converted messages, keyed by message id.
pub type Mapping = BTreeMap<String, String>;

/// The translation carried by one catalog message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Singular(String),
    Plural { singular: String, plural: String },
}

impl Entry {
    /// Classify a catalog message.
    ///
    /// Plural messages need at least two translated forms to be
    /// compiled as plurals. With a single form they are treated as
    /// singular messages, without any form as empty ones.
    pub fn from_message<M: MessageView + ?Sized>(message: &M) -> Entry {
        if !message.is_plural() {
            return Entry::Singular(message.msgstr().unwrap_or_default().to_string());
        }

        match message.msgstr_plural().map(Vec::as_slice).unwrap_or_default() {
            [singular, plural, ..] => Entry::Plural {
                singular: singular.clone(),
                plural: plural.clone(),
            },
            [only] => Entry::Singular(only.clone()),
            [] => Entry::Singular(String::new()),
        }
    }

    /// Render the entry as an output string.
    pub fn render(&self, options: &Options) -> String {
        match self {
            Entry::Singular(text) => rewrite_placeholders(
                text,
                &options.placeholder_structure,
                options.enable_alt_placeholders,
                Context::Singular,
            ),
            Entry::Plural { singular, plural } => compile_plural(singular, plural, options),
        }
    }
}

/// Parse the PO file at `path`.
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let text = fs::read_to_string(path).with_context(|| format!("Could not read {path:?}"))?;
    let catalog = match complete_header(&text) {
        Cow::Borrowed(_) => po_file::parse(path),
        Cow::Owned(completed) => {
            tracing::debug!("Completing header of {}", path.display());
            let mut file = tempfile::NamedTempFile::new()
                .context("Could not create temporary catalog file")?;
            file.write_all(completed.as_bytes())
                .and_then(|()| file.flush())
                .context("Could not write temporary catalog file")?;
            po_file::parse(file.path())
        }
    };
    catalog
        .map_err(|err| anyhow!("{err}"))
        .with_context(|| format!("Could not parse {path:?} as PO file"))
}

/// Convert every message of `catalog` into `mapping`.
///
/// Existing keys are overwritten, so the last message with a given id
/// wins. This is also how several catalogs are merged into one file.
pub fn transform_into(catalog: &Catalog, options: &Options, mapping: &mut Mapping) {
    for message in catalog.messages() {
        let key = if options.upper_case_id {
            message.msgid().to_uppercase()
        } else {
            message.msgid().to_string()
        };
        let value = Entry::from_message(message).render(options);
        mapping.insert(key, value);
    }
}

/// Convert `catalog` into a fresh mapping.
pub fn transform_catalog(catalog: &Catalog, options: &Options) -> Mapping {
    let mut mapping = Mapping::new();
    transform_into(catalog, options, &mut mapping);
    mapping
}
