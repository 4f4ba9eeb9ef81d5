//! Configuration loader.
//!
//! `defaults/packer.default.toml` is embedded into the binary. A user file and
//! command-line flags are layered on top through [`Loader`] before the result
//! is deserialized into [`PackerConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/packer.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct PackerConfig {
    pub folders: FolderConfig,
    pub entries: EntryConfig,
    pub languages: LanguageConfig,
    pub icons: IconConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FolderConfig {
    /// Blocks without `FOLDER` inherit the previous entry's folder.
    pub sticky: bool,
    pub delimiter: String,
    /// Sort every folder even when the document has no `SORT` line.
    pub sort: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntryConfig {
    pub duplicates: DuplicatePolicy,
}

/// What to do with two bookmarks of the same name in one folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Keep both and report a warning.
    Warn,
    /// Append " (2)", " (3)", … to later duplicates.
    Rename,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageConfig {
    /// Language assumed for blocks without `LANG`.
    pub default: String,
    /// Command (program + args) compiling CoffeeScript on stdin to JavaScript on stdout.
    pub coffeescript: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IconConfig {
    /// Directory icon file names are resolved against; empty = input's directory.
    pub dir: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Netscape bookmark file, importable by every major browser.
    Html,
    Json,
}

/// Builds a [`PackerConfig`] from the embedded `packer.default.toml`, an
/// optional user file on top, and command-line flags on top of that.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Self {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Keys in `path` replace the defaults. The file has to exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        let user = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        Self {
            builder: self.builder.add_source(user),
        }
    }

    /// Pin `key` (dotted, e.g. `folders.sticky`) regardless of any file.
    pub fn set_override<I>(self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        let builder = self.builder.set_override(key, value)?;
        Ok(Self { builder })
    }

    pub fn build(self) -> Result<PackerConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<PackerConfig, ConfigError> {
    Loader::new().build()
}
