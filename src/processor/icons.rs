//! Turns `ICON` references into `data:` URIs the bookmark file can embed.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::IconError;

pub struct IconResolver {
    dir: PathBuf,
    placeholder: String,
    cache: HashMap<String, String>,
}

impl IconResolver {
    pub fn new(dir: impl Into<PathBuf>, placeholder: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            placeholder: placeholder.into(),
            cache: HashMap::new(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Resolve `reference` relative to the icon directory.
    ///
    /// `None` yields the placeholder. `data:` URIs pass through untouched;
    /// anything else is read from disk and base64-encoded. Results are
    /// cached per reference.
    pub fn resolve(&mut self, reference: Option<&str>) -> Result<String, IconError> {
        let Some(reference) = reference else {
            return Ok(self.placeholder.clone());
        };
        if reference.starts_with("data:") {
            return Ok(reference.to_string());
        }
        if let Some(hit) = self.cache.get(reference) {
            return Ok(hit.clone());
        }

        let path = self.dir.join(reference);
        let mime = mime_for(&path)?;
        let bytes = fs::read(&path).map_err(|source| IconError::Io {
            path: path.clone(),
            source,
        })?;
        let uri = format!("data:{mime};base64,{}", STANDARD.encode(bytes));
        self.cache.insert(reference.to_string(), uri.clone());
        Ok(uri)
    }
}

fn mime_for(path: &Path) -> Result<&'static str, IconError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "ico" => Ok("image/x-icon"),
        "png" => Ok("image/png"),
        "gif" => Ok("image/gif"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "svg" => Ok("image/svg+xml"),
        "webp" => Ok("image/webp"),
        _ => Err(IconError::UnsupportedType(ext)),
    }
}
