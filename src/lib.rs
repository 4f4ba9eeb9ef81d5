pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use anyhow::Context;
use std::path::Path;
use tracing::{info, warn};

use crate::config::{DuplicatePolicy, Loader, OutputFormat, PackerConfig};
use crate::error::DocumentError;
use crate::model::Packed;
use crate::parser::ParseOptions;
use crate::processor::coffee::{CommandTranslator, Translator, Unavailable};
use crate::processor::icons::IconResolver;

pub fn run(args: &cli::Cli) -> anyhow::Result<()> {
    // 1. ── Configure ──────────────────────────────────────────────────
    let config = load_config(args).with_context(|| "Loading configuration")?;

    // 2. ── Parse & process ────────────────────────────────────────────
    let src = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Reading {}", args.input.display()))?;
    let base_dir = args.input.parent().unwrap_or_else(|| Path::new("."));
    let packed = pack(&src, &config, base_dir)
        .with_context(|| format!("Parsing {}", args.input.display()))?;

    for warning in &packed.warnings {
        warn!("{warning}");
    }

    if args.check {
        info!("check only, nothing written");
        return Ok(());
    }

    // 3. ── Write output ───────────────────────────────────────────────
    writer::emit(&packed, config.output.format, args.output.as_deref()).with_context(|| {
        match &args.output {
            Some(path) => format!("Writing {}", path.display()),
            None => "Writing to stdout".to_string(),
        }
    })?;

    Ok(())
}

/// Parse, normalize and assemble `src` in one go.
///
/// Icon file names are resolved against `config.icons.dir`, or `base_dir`
/// when that is empty.
pub fn pack(src: &str, config: &PackerConfig, base_dir: &Path) -> Result<Packed, DocumentError> {
    let translator = CommandTranslator::new(&config.languages.coffeescript);
    let translator: &dyn Translator = match &translator {
        Some(t) => t,
        None => &Unavailable,
    };
    pack_with(src, config, base_dir, translator)
}

/// [`pack`] with a caller-supplied translator for non-JavaScript bodies.
pub fn pack_with(
    src: &str,
    config: &PackerConfig,
    base_dir: &Path,
    translator: &dyn Translator,
) -> Result<Packed, DocumentError> {
    let doc = parser::load(src, &parse_options(config))?;

    let icon_dir = if config.icons.dir.is_empty() {
        base_dir.to_path_buf()
    } else {
        base_dir.join(&config.icons.dir)
    };
    let mut icons = IconResolver::new(icon_dir, config.icons.placeholder.clone());

    let options = processor::Options {
        title: config.output.title.clone(),
        force_sort: config.folders.sort,
        duplicates: config.entries.duplicates,
        translator,
    };
    Ok(processor::run(doc, &mut icons, &options))
}

pub fn parse_options(config: &PackerConfig) -> ParseOptions {
    ParseOptions {
        sticky_folders: config.folders.sticky,
        delimiter: config.folders.delimiter.clone(),
        default_language: config.languages.default.clone(),
    }
}

fn load_config(args: &cli::Cli) -> anyhow::Result<PackerConfig> {
    let mut loader = Loader::new();
    if let Some(path) = &args.config {
        loader = loader.with_file(path);
    }
    if args.sort {
        loader = loader.set_override("folders.sort", true)?;
    }
    if args.sticky_folders {
        loader = loader.set_override("folders.sticky", true)?;
    }
    if let Some(policy) = args.duplicates {
        let value = match policy {
            DuplicatePolicy::Warn => "warn",
            DuplicatePolicy::Rename => "rename",
        };
        loader = loader.set_override("entries.duplicates", value)?;
    }
    if let Some(format) = args.format {
        let value = match format {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        };
        loader = loader.set_override("output.format", value)?;
    }
    Ok(loader.build()?)
}
