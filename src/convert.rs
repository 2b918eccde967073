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

//! Conversion of whole targets: expanding the sources, converting each
//! catalog and writing the JSON files.

use crate::catalog::{load_catalog, transform_catalog, transform_into, Mapping};
use crate::config::{Config, Options, Target};
use crate::paths::{PathResolver, SplitPattern};
use crate::pattern::expand_patterns;
use anyhow::{bail, Context};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

const PRETTY_INDENT: &[u8] = b"   ";

/// A converted mapping and the file it belongs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub path: PathBuf,
    pub mapping: Mapping,
}

/// Whether all catalogs of a target go into the single file `dest`.
pub fn is_single_file(dest: &str) -> bool {
    Path::new(dest).extension().is_some()
}

/// Serialize `mapping` as JSON, indented with three spaces if `pretty`.
pub fn to_json(mapping: &Mapping, pretty: bool) -> serde_json::Result<Vec<u8>> {
    if !pretty {
        return serde_json::to_vec(mapping);
    }

    let mut json = Vec::new();
    let formatter = PrettyFormatter::with_indent(PRETTY_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut json, formatter);
    mapping.serialize(&mut serializer)?;
    Ok(json)
}

/// Write `output` as a JSON file, creating parent directories.
pub fn write_output(output: &Output, pretty: bool) -> anyhow::Result<()> {
    if let Some(parent) = output.path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let json = to_json(&output.mapping, pretty)?;
    fs::write(&output.path, json)
        .with_context(|| format!("Failed to write file: {}", output.path.display()))?;
    info!("JSON file created: {}", output.path.display());
    Ok(())
}

/// Remove a previously generated destination directory.
///
/// A destination which does not exist or is not a directory is left
/// alone, as is the current directory.
fn clean_destination(dir: &Path) -> anyhow::Result<()> {
    if dir.components().all(|c| c == Component::CurDir) {
        warn!("Not cleaning the current directory");
        return Ok(());
    }
    if !dir.is_dir() {
        return Ok(());
    }
    debug!("Removing {}", dir.display());
    fs::remove_dir_all(dir).with_context(|| format!("Failed to remove {}", dir.display()))
}

/// Keep the files which exist, reporting the others.
fn existing_files(files: Vec<PathBuf>) -> Vec<PathBuf> {
    files
        .into_iter()
        .filter(|file| {
            let exists = file.exists();
            if !exists {
                warn!("PO file {:?} not found", file);
            }
            exists
        })
        .collect()
}

/// Convert all catalogs of `target`.
///
/// The returned outputs have already been written unless
/// `options.stringify` is unset. Configuration problems and missing
/// sources are reported and skipped; only unreadable catalogs and
/// failed writes are errors.
pub fn convert_target(target: &Target, options: &Options) -> anyhow::Result<Vec<Output>> {
    let files = existing_files(expand_patterns(&target.src));
    if files.is_empty() {
        warn!(
            "Destination {:?} not written because no source catalogs were found",
            target.dest
        );
        return Ok(Vec::new());
    }

    let dest = match SplitPattern::parse(&target.dest) {
        Ok(dest) => dest,
        Err(err) => {
            warn!("Skipping target {}: {err}", target.label());
            return Ok(Vec::new());
        }
    };

    if options.clean_prev_strings {
        clean_destination(Path::new(dest.prefix()))?;
    }
    debug!(fuzzy = options.fuzzy, "Converting {} catalog(s)", files.len());

    let emit = |output: Output| -> anyhow::Result<Output> {
        if options.stringify {
            write_output(&output, options.pretty)?;
        } else {
            info!("Keeping mapping for {} in memory", output.path.display());
        }
        Ok(output)
    };

    if is_single_file(&target.dest) {
        let mut mapping = Mapping::new();
        for file in &files {
            debug!("Reading {}", file.display());
            transform_into(&load_catalog(file)?, options, &mut mapping);
        }
        let output = Output {
            path: PathBuf::from(&target.dest),
            mapping,
        };
        return Ok(vec![emit(output)?]);
    }

    let resolver =
        match PathResolver::new(&target.src, &target.dest, options.maintain_folder_structure) {
            Ok(resolver) => resolver,
            Err(err) => {
                warn!("Skipping target {}: {err}", target.label());
                return Ok(Vec::new());
            }
        };

    files
        .iter()
        .map(|file| {
            debug!("Reading {}", file.display());
            let catalog = load_catalog(file)?;
            emit(Output {
                path: resolver.resolve(file),
                mapping: transform_catalog(&catalog, options),
            })
        })
        .collect()
}

/// Convert the targets of `config` named in `names`, or all targets if
/// `names` is empty.
pub fn run_config(config: &Config, names: &[String]) -> anyhow::Result<Vec<Output>> {
    if let Some(unknown) = names
        .iter()
        .find(|name| !config.targets.iter().any(|t| t.name.as_ref() == Some(*name)))
    {
        bail!("No target named {unknown:?} in the configuration");
    }

    let mut outputs = Vec::new();
    for target in &config.targets {
        if !names.is_empty() && !names.iter().any(|name| target.name.as_ref() == Some(name)) {
            continue;
        }
        info!("Running target {}", target.label());
        let options = config.target_options(target);
        outputs.extend(convert_target(target, &options)?);
    }
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_po(path: &Path, messages: &[(&str, &str)]) -> anyhow::Result<()> {
        let mut po = String::from(
            "msgid \"\"\n\
             msgstr \"\"\n\
             \"Content-Type: text/plain; charset=UTF-8\\n\"\n",
        );
        for (msgid, msgstr) in messages {
            po.push_str(&format!("\nmsgid \"{msgid}\"\nmsgstr \"{msgstr}\"\n"));
        }
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(path, po)?;
        Ok(())
    }

    fn read_json(path: &Path) -> anyhow::Result<Mapping> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    fn mapping(entries: &[(&str, &str)]) -> Mapping {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn target(src: &[String], dest: &Path) -> Target {
        Target::new(src.to_vec(), dest.to_string_lossy())
    }

    #[test]
    fn test_is_single_file() {
        assert!(is_single_file("dist/translations.json"));
        assert!(!is_single_file("dist/"));
        assert!(!is_single_file("dist"));
        assert!(!is_single_file("dist/**"));
    }

    #[test]
    fn test_to_json() -> anyhow::Result<()> {
        let mapping = mapping(&[("a", "A"), ("b", "{{%0}}")]);
        assert_eq!(
            String::from_utf8(to_json(&mapping, false)?)?,
            r#"{"a":"A","b":"{{%0}}"}"#
        );
        assert_eq!(
            String::from_utf8(to_json(&mapping, true)?)?,
            "{\n   \"a\": \"A\",\n   \"b\": \"{{%0}}\"\n}"
        );
        assert_eq!(String::from_utf8(to_json(&Mapping::new(), true)?)?, "{}");
        Ok(())
    }

    #[test]
    fn test_single_file_merges_catalogs() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let root = tmp_dir.path();
        write_po(&root.join("po/a.po"), &[("hello", "Hallo"), ("shared", "from a")])?;
        write_po(&root.join("po/b.po"), &[("bye", "Tschüss"), ("shared", "from b")])?;

        let dest = root.join("dist/translations.json");
        let outputs = convert_target(
            &target(&[format!("{}/po/*.po", root.display())], &dest),
            &Options::default(),
        )?;

        let expected = mapping(&[("hello", "Hallo"), ("bye", "Tschüss"), ("shared", "from b")]);
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].path, dest);
        assert_eq!(outputs[0].mapping, expected);
        assert_eq!(read_json(&dest)?, expected);
        Ok(())
    }

    #[test]
    fn test_catalog_without_header() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let root = tmp_dir.path();
        let src = root.join("po/de.po");
        fs::create_dir_all(src.parent().unwrap())?;
        fs::write(&src, "msgid \"hello\"\nmsgstr \"Hallo {name}\"\n")?;

        let dest = root.join("dist/de.json");
        let sources = [src.to_string_lossy().into_owned()];
        convert_target(&target(&sources, &dest), &Options::default())?;
        assert_eq!(read_json(&dest)?, mapping(&[("hello", "Hallo {{name}}")]));
        Ok(())
    }

    #[test]
    fn test_one_file_per_catalog() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let root = tmp_dir.path();
        write_po(&root.join("po/en/app.po"), &[("hello", "Hello")])?;
        write_po(&root.join("po/de/admin.po"), &[("hello", "Hallo")])?;

        let dest = root.join("dist");
        convert_target(
            &target(&[format!("{}/po/**/*.po", root.display())], &dest),
            &Options::default(),
        )?;

        assert_eq!(read_json(&dest.join("app.json"))?, mapping(&[("hello", "Hello")]));
        assert_eq!(read_json(&dest.join("admin.json"))?, mapping(&[("hello", "Hallo")]));
        Ok(())
    }

    #[test]
    fn test_maintain_folder_structure() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let root = tmp_dir.path();
        write_po(&root.join("locales/en/app.po"), &[("hello", "Hello")])?;
        write_po(&root.join("locales/de/app.po"), &[("hello", "Hallo")])?;

        let options = Options {
            maintain_folder_structure: true,
            pretty: true,
            ..Options::default()
        };
        let outputs = convert_target(
            &Target::new(
                vec![format!("{}/locales/**/*.po", root.display())],
                format!("{}/dist/**", root.display()),
            ),
            &options,
        )?;

        assert_eq!(
            outputs.iter().map(|o| o.path.clone()).collect::<Vec<_>>(),
            vec![
                root.join("dist/de/app.json"),
                root.join("dist/en/app.json")
            ]
        );
        assert_eq!(
            fs::read_to_string(root.join("dist/de/app.json"))?,
            "{\n   \"hello\": \"Hallo\"\n}"
        );
        Ok(())
    }

    #[test]
    fn test_missing_file_is_skipped() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let root = tmp_dir.path();
        write_po(&root.join("po/de.po"), &[("hello", "Hallo")])?;

        let dest = root.join("dist");
        let outputs = convert_target(
            &target(
                &[
                    format!("{}/po/missing.po", root.display()),
                    format!("{}/po/de.po", root.display()),
                ],
                &dest,
            ),
            &Options::default(),
        )?;

        assert_eq!(outputs.len(), 1);
        assert!(dest.join("de.json").exists());
        assert!(!dest.join("missing.json").exists());
        Ok(())
    }

    #[test]
    fn test_no_sources() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let dest = tmp_dir.path().join("dist");
        let outputs = convert_target(
            &target(&[format!("{}/po/*.po", tmp_dir.path().display())], &dest),
            &Options::default(),
        )?;
        assert!(outputs.is_empty());
        assert!(!dest.exists());
        Ok(())
    }

    #[test]
    fn test_invalid_destination_is_skipped() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let root = tmp_dir.path();
        write_po(&root.join("po/de.po"), &[("hello", "Hallo")])?;

        let outputs = convert_target(
            &Target::new(
                vec![format!("{}/po/*.po", root.display())],
                format!("{}/dist/**/x/**", root.display()),
            ),
            &Options::default(),
        )?;
        assert!(outputs.is_empty());
        assert!(!root.join("dist").exists());
        Ok(())
    }

    #[test]
    fn test_clean_prev_strings() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let root = tmp_dir.path();
        write_po(&root.join("po/de.po"), &[("hello", "Hallo")])?;
        let dest = root.join("dist");
        fs::create_dir_all(dest.join("old"))?;
        fs::write(dest.join("old/stale.json"), "{}")?;

        let options = Options {
            clean_prev_strings: true,
            ..Options::default()
        };
        convert_target(&target(&[format!("{}/po/*.po", root.display())], &dest), &options)?;

        assert!(!dest.join("old").exists());
        assert!(dest.join("de.json").exists());
        Ok(())
    }

    #[test]
    fn test_clean_missing_destination() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        clean_destination(&tmp_dir.path().join("nothing"))?;
        clean_destination(Path::new("."))?;
        assert!(Path::new(".").exists());
        Ok(())
    }

    #[test]
    fn test_without_stringify() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let root = tmp_dir.path();
        write_po(&root.join("po/de.po"), &[("hello", "Hallo {name}")])?;

        let dest = root.join("dist");
        let options = Options {
            stringify: false,
            ..Options::default()
        };
        let outputs =
            convert_target(&target(&[format!("{}/po/*.po", root.display())], &dest), &options)?;

        assert_eq!(
            outputs,
            vec![Output {
                path: dest.join("de.json"),
                mapping: mapping(&[("hello", "Hallo {{name}}")]),
            }]
        );
        assert!(!dest.exists());
        Ok(())
    }

    #[test]
    fn test_run_config() -> anyhow::Result<()> {
        let tmp_dir = tempfile::tempdir()?;
        let root = tmp_dir.path();
        write_po(&root.join("po/de.po"), &[("hello", "Hallo")])?;

        let config = Config::parse(&format!(
            r#"
            [[targets]]
            name = "upper"
            src = ["{root}/po/*.po"]
            dest = "{root}/upper.json"
            [targets.options]
            upperCaseId = true

            [[targets]]
            name = "plain"
            src = ["{root}/po/*.po"]
            dest = "{root}/plain.json"
            "#,
            root = root.display()
        ))?;

        let outputs = run_config(&config, &[String::from("upper")])?;
        assert_eq!(outputs.len(), 1);
        assert_eq!(read_json(&root.join("upper.json"))?, mapping(&[("HELLO", "Hallo")]));
        assert!(!root.join("plain.json").exists());

        assert_eq!(run_config(&config, &[])?.len(), 2);
        assert_eq!(read_json(&root.join("plain.json"))?, mapping(&[("hello", "Hallo")]));

        assert!(run_config(&config, &[String::from("unknown")]).is_err());
        Ok(())
    }
}
