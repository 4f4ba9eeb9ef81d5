use serde::Serialize;
use std::fmt;

use crate::processor::normalize::Language;

/// Delimiter between `FOLDER` path segments unless configured otherwise.
pub const DEFAULT_DELIMITER: &str = "/";

/// One `BEGIN … END` span exactly as it appears in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub title: String,
    /// 1-based line of the `BEGIN` marker.
    pub line: usize,
    /// Every line between `BEGIN` and `END`, directives included.
    pub lines: Vec<String>,
    /// Free text trailing the `END` marker.
    pub updated: Option<String>,
}

/// A block after directive parsing, before its script is normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDef {
    pub name: String,
    pub line: usize,
    pub folder_path: Vec<String>,
    pub icon: Option<String>,
    pub language: String,
    pub body: String,
    /// 1-based line of the first body line (the BEGIN line if the body is empty).
    pub body_line: usize,
    pub updated: Option<String>,
}

/// Immediately-after-parse representation of the whole document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub owner: Option<String>,
    pub sort: bool,
    pub entries: Vec<EntryDef>,
    pub warnings: Vec<Warning>,
}

/// A finished bookmarklet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub name: String,
    #[serde(skip)]
    pub folder_path: Vec<String>,
    /// Resolved icon (a `data:` URI).
    pub icon: String,
    #[serde(skip)]
    pub language: Language,
    #[serde(skip)]
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(skip)]
    pub line: usize,
    uri: String,
}

impl Entry {
    /// Builds an entry around an already-normalized URI.
    pub fn new(def: EntryDef, language: Language, icon: String, uri: String) -> Self {
        Self {
            name: def.name,
            folder_path: def.folder_path,
            icon,
            language,
            body: def.body,
            updated: def.updated,
            line: def.line,
            uri,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// One level of the bookmark folder hierarchy. The root has an empty name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FolderNode {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "folders")]
    pub children: Vec<FolderNode>,
    #[serde(rename = "bookmarks")]
    pub entries: Vec<Entry>,
}

impl FolderNode {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn child(&self, name: &str) -> Option<&FolderNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Follows `path` from this node; `None` if any segment is missing.
    pub fn descend<S: AsRef<str>>(&self, path: &[S]) -> Option<&FolderNode> {
        path.iter()
            .try_fold(self, |node, seg| node.child(seg.as_ref()))
    }

    /// Number of entries in this node and every descendant.
    pub fn len(&self) -> usize {
        self.entries.len() + self.children.iter().map(FolderNode::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fully processed output handed to `writer`.
#[derive(Debug, Clone)]
pub struct Packed {
    pub title: String,
    pub root: FolderNode,
    pub warnings: Vec<Warning>,
}

/// Something worth reporting that did not stop the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub line: usize,
    pub kind: WarningKind,
}

impl Warning {
    pub fn new(line: usize, kind: WarningKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    UnknownDirective { keyword: String },
    RepeatedDirective { keyword: String },
    EmptyDirective { keyword: String },
    StrayEnd,
    DuplicateName { name: String, folder: String },
    Renamed { from: String, to: String },
    UnresolvedIcon { reference: String, reason: String },
    SkippedEntry { title: String, reason: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            WarningKind::UnknownDirective { keyword } => {
                write!(f, "unrecognized directive `{keyword}`, treated as script")
            }
            WarningKind::RepeatedDirective { keyword } => {
                write!(f, "`{keyword}` given more than once, last value wins")
            }
            WarningKind::EmptyDirective { keyword } => {
                write!(f, "`{keyword}` has no value, ignored")
            }
            WarningKind::StrayEnd => write!(f, "END outside of any block"),
            WarningKind::DuplicateName { name, folder } => {
                write!(f, "duplicate bookmark `{name}` in folder `{folder}`")
            }
            WarningKind::Renamed { from, to } => {
                write!(f, "duplicate bookmark `{from}` renamed to `{to}`")
            }
            WarningKind::UnresolvedIcon { reference, reason } => {
                write!(f, "icon `{reference}` not resolved ({reason}), using placeholder")
            }
            WarningKind::SkippedEntry { title, reason } => {
                write!(f, "skipped `{title}`: {reason}")
            }
        }
    }
}
