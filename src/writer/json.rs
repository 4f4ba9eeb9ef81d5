//! JSON rendering of the packed tree.

use serde::Serialize;

use crate::model::{FolderNode, Packed};

#[derive(Serialize)]
struct Export<'a> {
    title: &'a str,
    root: &'a FolderNode,
}

pub fn render(packed: &Packed) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(&Export {
        title: &packed.title,
        root: &packed.root,
    })?;
    json.push('\n');
    Ok(json)
}
