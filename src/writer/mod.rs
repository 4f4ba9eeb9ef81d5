//! Output stage: serialize a finished `Packed` tree.
pub mod html;
pub mod json;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::config::OutputFormat;
use crate::model::Packed;

pub fn render(packed: &Packed, format: OutputFormat) -> io::Result<String> {
    match format {
        OutputFormat::Html => Ok(html::render(packed)),
        OutputFormat::Json => json::render(packed).map_err(io::Error::other),
    }
}

/// Write the rendered document to `path`, or to stdout when `path` is `None`.
///
/// The whole document is rendered before anything is written.
pub fn emit(packed: &Packed, format: OutputFormat, path: Option<&Path>) -> io::Result<()> {
    let doc = render(packed, format)?;
    match path {
        Some(path) => fs::write(path, doc),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(doc.as_bytes())?;
            stdout.flush()
        }
    }
}
