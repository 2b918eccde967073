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

//! Mapping of source catalogs to output JSON files.
//!
//! With `maintainFolderStructure`, the directories matched by the `**`
//! of a source pattern are recreated below the `**` of the destination
//! pattern:
//!
//! ```
//! use po2json::paths::PathResolver;
//! use std::path::{Path, PathBuf};
//!
//! let resolver = PathResolver::new(&["locales/**/*.po".into()], "dist/**", true).unwrap();
//! assert_eq!(
//!     resolver.resolve(Path::new("locales/en/app.po")),
//!     PathBuf::from("dist/en/app.json")
//! );
//! ```

use crate::pattern::{PatternError, RECURSIVE_WILDCARD};
use std::path::{Path, PathBuf};
use tracing::warn;

const OUTPUT_EXTENSION: &str = "json";

/// A pattern split around its `**` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPattern {
    prefix: String,
    suffix: Option<String>,
}

impl SplitPattern {
    pub fn parse(pattern: &str) -> Result<SplitPattern, PatternError> {
        match pattern.split_once(RECURSIVE_WILDCARD) {
            None => Ok(SplitPattern {
                prefix: pattern.to_string(),
                suffix: None,
            }),
            Some((_, suffix)) if suffix.contains(RECURSIVE_WILDCARD) => Err(
                PatternError::MultipleRecursiveWildcards(pattern.to_string()),
            ),
            Some((prefix, suffix)) => Ok(SplitPattern {
                prefix: prefix.to_string(),
                suffix: Some(suffix.to_string()),
            }),
        }
    }

    /// The part before `**`, or the whole pattern.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The part after `**`, if there is a `**`.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn is_recursive(&self) -> bool {
        self.suffix.is_some()
    }
}

/// Computes the output file of each source catalog of a target.
#[derive(Debug, Clone)]
pub struct PathResolver {
    sources: Vec<SplitPattern>,
    dest: SplitPattern,
    maintain_folder_structure: bool,
}

impl PathResolver {
    /// Build a resolver for the source patterns `src` and the
    /// destination pattern `dest`.
    ///
    /// Invalid source patterns are reported and ignored. An invalid
    /// destination is an error since no output can be placed.
    pub fn new(
        src: &[String],
        dest: &str,
        maintain_folder_structure: bool,
    ) -> Result<PathResolver, PatternError> {
        let dest = SplitPattern::parse(dest)?;
        let sources = if maintain_folder_structure {
            src.iter()
                .filter(|pattern| !pattern.starts_with('!'))
                .filter_map(|pattern| match SplitPattern::parse(pattern) {
                    Ok(split) => Some(split),
                    Err(err) => {
                        warn!("Ignoring source pattern for the folder structure: {err}");
                        None
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        Ok(PathResolver {
            sources,
            dest,
            maintain_folder_structure,
        })
    }

    /// Directory receiving files when no structure is kept.
    pub fn dest_root(&self) -> &Path {
        Path::new(self.dest.prefix())
    }

    /// Output path for the catalog at `source`.
    ///
    /// The first source pattern whose prefix matches decides the
    /// layout. Files matched by no pattern land directly in the
    /// destination root.
    pub fn resolve(&self, source: &Path) -> PathBuf {
        let file_name = output_file_name(source);
        let flat = self.dest_root().join(&file_name);
        if !self.maintain_folder_structure {
            return flat;
        }

        let source_str = source.to_string_lossy();
        for spec in &self.sources {
            if let Some(rest) = source_str.strip_prefix(spec.prefix()) {
                let mut path = PathBuf::from(self.dest.prefix());
                if let Some(parent) = Path::new(rest.trim_start_matches('/')).parent() {
                    path.push(parent);
                }
                path.push(&file_name);
                return path;
            }
            if !spec.is_recursive() && source.parent() == Path::new(spec.prefix()).parent() {
                return flat;
            }
        }

        flat
    }
}

/// `locales/en/app.po` becomes `app.json`.
fn output_file_name(source: &Path) -> String {
    let stem = source.file_stem().unwrap_or_default();
    format!("{}.{OUTPUT_EXTENSION}", stem.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn patterns(patterns: &[&str]) -> Vec<String> {
        patterns.iter().map(|p| p.to_string()).collect()
    }

    fn resolve(src: &[&str], dest: &str, maintain: bool, source: &str) -> PathBuf {
        PathResolver::new(&patterns(src), dest, maintain)
            .unwrap()
            .resolve(Path::new(source))
    }

    #[test]
    fn test_split_pattern() {
        assert_eq!(
            SplitPattern::parse("locales/**/*.po").unwrap(),
            SplitPattern {
                prefix: String::from("locales/"),
                suffix: Some(String::from("/*.po")),
            }
        );
        let plain = SplitPattern::parse("locales/*.po").unwrap();
        assert_eq!(plain.prefix(), "locales/*.po");
        assert_eq!(plain.suffix(), None);
        assert!(!plain.is_recursive());
    }

    #[test]
    fn test_split_pattern_multiple_wildcards() {
        assert_eq!(
            SplitPattern::parse("a/**/b/**/*.po"),
            Err(PatternError::MultipleRecursiveWildcards(String::from(
                "a/**/b/**/*.po"
            )))
        );
    }

    #[test]
    fn test_maintain_folder_structure() {
        assert_eq!(
            resolve(&["locales/**/*.po"], "dist/**", true, "locales/en/app.po"),
            PathBuf::from("dist/en/app.json")
        );
        assert_eq!(
            resolve(
                &["locales/**/*.po"],
                "dist/**",
                true,
                "locales/pt/BR/admin.po"
            ),
            PathBuf::from("dist/pt/BR/admin.json")
        );
        assert_eq!(
            resolve(&["locales/**/*.po"], "dist/**", true, "locales/root.po"),
            PathBuf::from("dist/root.json")
        );
    }

    #[test]
    fn test_flat_layout() {
        assert_eq!(
            resolve(&["locales/**/*.po"], "dist/", false, "locales/en/app.po"),
            PathBuf::from("dist/app.json")
        );
        assert_eq!(
            resolve(&["locales/**/*.po"], "dist/**", false, "locales/en/app.po"),
            PathBuf::from("dist/app.json")
        );
    }

    #[test]
    fn test_dotted_file_name() {
        assert_eq!(
            resolve(&["po/*.po"], "out", false, "po/app.v2.po"),
            PathBuf::from("out/app.v2.json")
        );
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            resolve(
                &["locales/en/**/*.po", "locales/**/*.po"],
                "dist/**",
                true,
                "locales/en/web/app.po"
            ),
            PathBuf::from("dist/web/app.json")
        );
        assert_eq!(
            resolve(
                &["locales/**/*.po", "locales/en/**/*.po"],
                "dist/**",
                true,
                "locales/en/web/app.po"
            ),
            PathBuf::from("dist/en/web/app.json")
        );
    }

    #[test]
    fn test_invalid_source_pattern_is_skipped() {
        assert_eq!(
            resolve(
                &["locales/**/x/**/*.po", "locales/**/*.po"],
                "dist/**",
                true,
                "locales/en/app.po"
            ),
            PathBuf::from("dist/en/app.json")
        );
    }

    #[test]
    fn test_invalid_dest_pattern() {
        assert!(PathResolver::new(&patterns(&["locales/**/*.po"]), "dist/**/x/**", true).is_err());
    }

    #[test]
    fn test_same_directory_without_wildcard() {
        assert_eq!(
            resolve(&["locales/*.po"], "dist/**", true, "locales/en.po"),
            PathBuf::from("dist/en.json")
        );
    }

    #[test]
    fn test_unmatched_file_falls_back_to_flat() {
        assert_eq!(
            resolve(&["locales/**/*.po"], "dist/**", true, "other/en/app.po"),
            PathBuf::from("dist/app.json")
        );
    }

    #[test]
    fn test_negated_patterns_are_not_layouts() {
        assert_eq!(
            resolve(
                &["!locales/**/draft.po", "i18n/**/*.po"],
                "dist/**",
                true,
                "i18n/fr/app.po"
            ),
            PathBuf::from("dist/fr/app.json")
        );
    }
}
