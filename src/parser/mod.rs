//! Document loader: splits the source text into `BEGIN … END` blocks and
//! hands each one to the directive parser.
//
//  Layout (informal):
//
//      document ::= preamble block*
//      preamble ::= ( "NAME" owner | "SORT" | commentary )*
//      block    ::= "BEGIN" title NEWLINE line* "END" [timestamp]
//
//  Anything between blocks is commentary and thrown away.

pub mod directives;

use std::iter::Enumerate;
use std::str::Lines;
use tracing::{debug, info};

use crate::error::DocumentError;
use crate::model::{DEFAULT_DELIMITER, Document, RawBlock, Warning, WarningKind};

/// Knobs that change how blocks are turned into entry definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub sticky_folders: bool,
    pub delimiter: String,
    pub default_language: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            sticky_folders: false,
            delimiter: DEFAULT_DELIMITER.to_string(),
            default_language: "javascript".to_string(),
        }
    }
}

/// Lazily yields the raw blocks of a document.
///
/// Document-level settings (`NAME`, `SORT`) are only honoured before the
/// first block and are available on the splitter once iteration has started.
pub struct BlockSplitter<'a> {
    lines: Enumerate<Lines<'a>>,
    seen_block: bool,
    failed: bool,
    pub owner: Option<String>,
    pub sort: bool,
    pub warnings: Vec<Warning>,
}

impl<'a> BlockSplitter<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            lines: src.lines().enumerate(),
            seen_block: false,
            failed: false,
            owner: None,
            sort: false,
            warnings: Vec::new(),
        }
    }

    fn preamble_line(&mut self, trimmed: &str) {
        match marker(trimmed) {
            Some(("NAME", owner)) if !owner.is_empty() => {
                self.owner = Some(owner.to_string());
            }
            Some(("SORT", "")) => self.sort = true,
            _ => {}
        }
    }

    fn read_block(&mut self, title: &str, line: usize) -> Result<RawBlock, DocumentError> {
        if title.is_empty() {
            return Err(DocumentError::MissingTitle { line });
        }

        let mut lines = Vec::new();
        for (idx, text) in self.lines.by_ref() {
            match marker(text.trim()) {
                Some(("END", rest)) => {
                    let updated = (!rest.is_empty()).then(|| rest.to_string());
                    return Ok(RawBlock {
                        title: title.to_string(),
                        line,
                        lines,
                        updated,
                    });
                }
                Some(("BEGIN", _)) => {
                    return Err(DocumentError::NestedBlock {
                        line: idx + 1,
                        open_line: line,
                        open_title: title.to_string(),
                    });
                }
                _ => lines.push(text.to_string()),
            }
        }

        Err(DocumentError::UnterminatedBlock {
            title: title.to_string(),
            line,
        })
    }
}

impl Iterator for BlockSplitter<'_> {
    type Item = Result<RawBlock, DocumentError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while let Some((idx, text)) = self.lines.next() {
            let trimmed = text.trim();
            match marker(trimmed) {
                Some(("BEGIN", title)) => {
                    self.seen_block = true;
                    let res = self.read_block(title, idx + 1);
                    self.failed = res.is_err();
                    return Some(res);
                }
                Some(("END", _)) => {
                    self.warnings.push(Warning::new(idx + 1, WarningKind::StrayEnd));
                }
                _ if !self.seen_block => self.preamble_line(trimmed),
                _ => {}
            }
        }
        None
    }
}

/// Splits a trimmed line into its leading word and the trimmed remainder.
fn marker(trimmed: &str) -> Option<(&str, &str)> {
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => Some((word, rest.trim())),
        None => Some((trimmed, "")),
    }
}

/// Parse the whole document into entry definitions.
///
/// Structural problems abort immediately; everything else is collected as a
/// warning on the returned `Document`.
pub fn load(src: &str, options: &ParseOptions) -> Result<Document, DocumentError> {
    debug!("document loaded, size: {} bytes", src.len());

    let mut splitter = BlockSplitter::new(src);
    let mut warnings = Vec::new();
    let mut entries = Vec::new();
    let mut previous_folder: Vec<String> = Vec::new();

    for block in splitter.by_ref() {
        let block = block?;
        let def = directives::parse_block(&block, &previous_folder, options, &mut warnings);
        previous_folder = def.folder_path.clone();
        entries.push(def);
    }

    warnings.extend(splitter.warnings);
    warnings.sort_by_key(|w| w.line);
    info!("parsed {} bookmarklet definitions", entries.len());

    Ok(Document {
        owner: splitter.owner,
        sort: splitter.sort,
        entries,
        warnings,
    })
}
