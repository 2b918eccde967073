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

//! Convert Gettext PO catalogs into JSON dictionaries.
//!
//! The JSON files map message ids to strings using `{{placeholder}}`
//! interpolation and ICU `plural` messages, as expected by client-side
//! translation runtimes such as angular-translate.
//!
//! The conversion happens in a few steps:
//!
//! * [`pattern`] expands the source patterns of a target,
//! * [`catalog`] turns each parsed catalog into a [`Mapping`], using
//!   [`placeholder`] and [`plural`] to rewrite the messages,
//! * [`paths`] decides where each JSON file goes,
//! * [`convert`] drives all of this for a [`Target`].
//!
//! # Examples
//!
//! ```
//! use po2json::{transform_catalog, Options};
//! use polib::catalog::Catalog;
//! use polib::message::Message;
//! use polib::metadata::CatalogMetadata;
//!
//! let mut catalog = Catalog::new(CatalogMetadata::new());
//! catalog.append_or_update(
//!     Message::build_singular()
//!         .with_msgid(String::from("greeting"))
//!         .with_msgstr(String::from("Hallo {name}"))
//!         .done(),
//! );
//!
//! let mapping = transform_catalog(&catalog, &Options::default());
//! assert_eq!(mapping["greeting"], "Hallo {{name}}");
//! ```

pub mod catalog;
pub mod config;
pub mod convert;
mod header;
pub mod paths;
pub mod pattern;
pub mod placeholder;
pub mod plural;

pub use catalog::{load_catalog, transform_catalog, transform_into, Entry, Mapping};
pub use config::{Config, Options, OptionsOverride, Target};
pub use convert::{convert_target, run_config, write_output, Output};
