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

//! `po2json` converts Gettext PO catalogs into JSON dictionaries.
//!
//! Targets are normally described in a `po2json.toml` file and run
//! with `po2json run`. A single target can also be given on the
//! command line with `po2json convert`.

use clap::{Parser, Subcommand};
use po2json::config::DEFAULT_CONFIG_FILE;
use po2json::placeholder::PlaceholderStructure;
use po2json::{convert_target, run_config, Config, Options, Target};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Clone, Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Log debug messages unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run the targets of a configuration file.
    Run {
        /// The configuration file.
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
        /// Names of the targets to run. All targets run if none are given.
        targets: Vec<String>,
    },
    /// Convert catalogs given on the command line.
    Convert {
        /// A JSON file to merge all catalogs into, or a directory.
        #[arg(short, long)]
        dest: String,
        /// Source patterns. Prefix a pattern with `!` to exclude files.
        #[arg(required = true)]
        src: Vec<String>,
        /// Indent the JSON output.
        #[arg(long)]
        pretty: bool,
        /// Uppercase the message ids.
        #[arg(long)]
        upper_case_id: bool,
        /// Offset of the ICU plural messages.
        #[arg(long, default_value_t = 1)]
        offset: u32,
        /// Placeholder delimiters used in the catalogs.
        #[arg(long, num_args = 1..=2, value_names = ["OPEN", "CLOSE"])]
        placeholder: Option<Vec<String>>,
        /// Only rewrite `%0`-style placeholders.
        #[arg(long)]
        no_alt_placeholders: bool,
        /// Mirror the directories matched by `**` below the destination.
        #[arg(long)]
        maintain_folder_structure: bool,
        /// Remove the destination directory first.
        #[arg(long)]
        clean: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Run { config, targets } => {
            let config = Config::load(&config)?;
            run_config(&config, &targets)?;
        }
        Command::Convert {
            dest,
            src,
            pretty,
            upper_case_id,
            offset,
            placeholder,
            no_alt_placeholders,
            maintain_folder_structure,
            clean,
        } => {
            let placeholder_structure = match placeholder {
                Some(marks) => PlaceholderStructure::try_from(marks)?,
                None => PlaceholderStructure::default(),
            };
            let options = Options {
                pretty,
                upper_case_id,
                offset,
                placeholder_structure,
                enable_alt_placeholders: !no_alt_placeholders,
                maintain_folder_structure,
                clean_prev_strings: clean,
                ..Options::default()
            };
            convert_target(&Target::new(src, dest), &options)?;
        }
    }

    Ok(())
}
