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

//! Conversion options and the `po2json.toml` configuration file.
//!
//! Options use the camel-case names of the Grunt task they mirror:
//!
//! ```toml
//! [options]
//! pretty = true
//! placeholderStructure = ["{", "}"]
//!
//! [[targets]]
//! name = "app"
//! src = ["locales/**/*.po", "!locales/**/draft.po"]
//! dest = "dist/**"
//!
//! [targets.options]
//! upperCaseId = true
//! ```

use crate::placeholder::PlaceholderStructure;
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default name of the configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "po2json.toml";

/// Options controlling how catalogs are converted and written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    /// Indent the JSON output with three spaces.
    pub pretty: bool,
    /// Reserved. Fuzzy messages are converted like any other message.
    pub fuzzy: bool,
    /// Remove the destination directory before writing.
    pub clean_prev_strings: bool,
    /// Uppercase message ids before using them as keys.
    pub upper_case_id: bool,
    /// Serialize the mappings to JSON files. When unset, the mappings
    /// are only handed back to the caller.
    pub stringify: bool,
    /// ICU plural offset.
    pub offset: u32,
    /// Rewrite bracket-delimited placeholders.
    pub enable_alt_placeholders: bool,
    pub placeholder_structure: PlaceholderStructure,
    /// Mirror the source directory tree below the destination.
    pub maintain_folder_structure: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            pretty: false,
            fuzzy: false,
            clean_prev_strings: false,
            upper_case_id: false,
            stringify: true,
            offset: 1,
            enable_alt_placeholders: true,
            placeholder_structure: PlaceholderStructure::default(),
            maintain_folder_structure: false,
        }
    }
}

/// Per-target options. Fields which are set replace the global ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct OptionsOverride {
    pub pretty: Option<bool>,
    pub fuzzy: Option<bool>,
    pub clean_prev_strings: Option<bool>,
    pub upper_case_id: Option<bool>,
    pub stringify: Option<bool>,
    pub offset: Option<u32>,
    pub enable_alt_placeholders: Option<bool>,
    pub placeholder_structure: Option<PlaceholderStructure>,
    pub maintain_folder_structure: Option<bool>,
}

impl Options {
    /// Return a copy of these options with `overrides` applied.
    pub fn with_overrides(&self, overrides: &OptionsOverride) -> Options {
        let OptionsOverride {
            pretty,
            fuzzy,
            clean_prev_strings,
            upper_case_id,
            stringify,
            offset,
            enable_alt_placeholders,
            placeholder_structure,
            maintain_folder_structure,
        } = overrides;
        Options {
            pretty: pretty.unwrap_or(self.pretty),
            fuzzy: fuzzy.unwrap_or(self.fuzzy),
            clean_prev_strings: clean_prev_strings.unwrap_or(self.clean_prev_strings),
            upper_case_id: upper_case_id.unwrap_or(self.upper_case_id),
            stringify: stringify.unwrap_or(self.stringify),
            offset: offset.unwrap_or(self.offset),
            enable_alt_placeholders: enable_alt_placeholders
                .unwrap_or(self.enable_alt_placeholders),
            placeholder_structure: placeholder_structure
                .clone()
                .unwrap_or_else(|| self.placeholder_structure.clone()),
            maintain_folder_structure: maintain_folder_structure
                .unwrap_or(self.maintain_folder_structure),
        }
    }
}

/// A set of source catalogs and where to write them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Target {
    #[serde(default)]
    pub name: Option<String>,
    /// Source patterns. Patterns starting with `!` exclude files.
    pub src: Vec<String>,
    /// A JSON file, a directory, or a directory pattern with `**`.
    pub dest: String,
    #[serde(default)]
    pub options: OptionsOverride,
}

impl Target {
    pub fn new(src: Vec<String>, dest: impl Into<String>) -> Self {
        Self {
            name: None,
            src,
            dest: dest.into(),
            options: OptionsOverride::default(),
        }
    }

    /// Name used in log messages.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.dest)
    }
}

/// Contents of a `po2json.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub options: Options,
    pub targets: Vec<Target>,
}

impl Config {
    /// Read and parse the configuration file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        Config::parse(&text).with_context(|| format!("Could not parse {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(text)
    }

    /// Effective options for `target`.
    pub fn target_options(&self, target: &Target) -> Options {
        self.options.with_overrides(&target.options)
    }
}
