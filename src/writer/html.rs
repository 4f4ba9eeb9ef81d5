//! Netscape bookmark file, the format every browser's "Import bookmarks"
//! dialog accepts.

use std::fmt::Write;

use crate::model::{Entry, FolderNode, Packed};

const INDENT: &str = "    ";

pub fn render(packed: &Packed) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE NETSCAPE-Bookmark-file-1>\n");
    out.push_str("<!-- This is an automatically generated file.\n");
    out.push_str("     It will be read and overwritten.\n");
    out.push_str("     DO NOT EDIT! -->\n");
    out.push_str("<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">\n");
    out.push_str("<TITLE>Bookmarks</TITLE>\n");
    let _ = writeln!(out, "<H1>{}</H1>", escape_html(&packed.title));
    out.push_str("<DL><p>\n");
    render_folder(&packed.root, &mut out, 1);
    out.push_str("</DL><p>\n");
    out
}

/// Child folders first, then this folder's own bookmarks.
fn render_folder(node: &FolderNode, out: &mut String, depth: usize) {
    let pad = INDENT.repeat(depth);

    for child in &node.children {
        let _ = writeln!(out, "{pad}<DT><H3>{}</H3>", escape_html(&child.name));
        let _ = writeln!(out, "{pad}<DL><p>");
        render_folder(child, out, depth + 1);
        let _ = writeln!(out, "{pad}</DL><p>");
    }

    for entry in &node.entries {
        render_entry(entry, out, &pad);
    }
}

fn render_entry(entry: &Entry, out: &mut String, pad: &str) {
    let _ = writeln!(
        out,
        "{pad}<DT><A HREF=\"{}\" ICON=\"{}\">{}</A>",
        escape_html(entry.uri()),
        escape_html(&entry.icon),
        escape_html(&entry.name)
    );
    if let Some(updated) = &entry.updated {
        let _ = writeln!(out, "{pad}<DD>Updated {}", escape_html(updated));
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryDef;
    use crate::processor::normalize::Language;

    fn entry(name: &str, uri: &str, updated: Option<&str>) -> Entry {
        let def = EntryDef {
            name: name.into(),
            line: 1,
            folder_path: Vec::new(),
            icon: None,
            language: "javascript".into(),
            body: String::new(),
            body_line: 1,
            updated: updated.map(str::to_string),
        };
        Entry::new(def, Language::JavaScript, "data:,i".into(), uri.into())
    }

    #[test]
    fn test_render_nested_folders() {
        let mut speed = FolderNode::named("Speed");
        speed.entries.push(entry("Faster", "javascript:f()", None));
        let mut youtube = FolderNode::named("YouTube & Co");
        youtube.children.push(speed);
        youtube
            .entries
            .push(entry("Plucker", "javascript:p()", Some("April 15th, 2024")));
        let mut root = FolderNode::default();
        root.children.push(youtube);
        root.entries.push(entry("<Center>", "javascript:c()", None));

        let packed = Packed {
            title: "Zachary's".into(),
            root,
            warnings: Vec::new(),
        };

        let expected = "\
<!DOCTYPE NETSCAPE-Bookmark-file-1>
<!-- This is an automatically generated file.
     It will be read and overwritten.
     DO NOT EDIT! -->
<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">
<TITLE>Bookmarks</TITLE>
<H1>Zachary&#39;s</H1>
<DL><p>
    <DT><H3>YouTube &amp; Co</H3>
    <DL><p>
        <DT><H3>Speed</H3>
        <DL><p>
            <DT><A HREF=\"javascript:f()\" ICON=\"data:,i\">Faster</A>
        </DL><p>
        <DT><A HREF=\"javascript:p()\" ICON=\"data:,i\">Plucker</A>
        <DD>Updated April 15th, 2024
    </DL><p>
    <DT><A HREF=\"javascript:c()\" ICON=\"data:,i\">&lt;Center&gt;</A>
</DL><p>
";
        assert_eq!(render(&packed), expected);
    }

    #[test]
    fn test_empty_tree_is_still_a_valid_container() {
        let packed = Packed {
            title: "Bookmarklets".into(),
            root: FolderNode::default(),
            warnings: Vec::new(),
        };
        let html = render(&packed);
        assert!(html.ends_with("<DL><p>\n</DL><p>\n"));
    }
}
