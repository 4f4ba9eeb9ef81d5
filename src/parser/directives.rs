//! Directive parser: pulls `FOLDER`, `ICON` and `LANG` lines off the top of a
//! block and returns what is left as the script body.

use crate::model::{EntryDef, RawBlock, Warning, WarningKind};

use super::ParseOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    Folder,
    Icon,
    Lang,
}

impl Directive {
    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "FOLDER" => Some(Directive::Folder),
            "ICON" => Some(Directive::Icon),
            "LANG" => Some(Directive::Lang),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Directive::Folder => "FOLDER",
            Directive::Icon => "ICON",
            Directive::Lang => "LANG",
        }
    }
}

/// Resolve one block into an entry definition.
///
/// `previous_folder` is the folder of the entry parsed just before this one;
/// it is only consulted when sticky folders are enabled.
pub fn parse_block(
    block: &RawBlock,
    previous_folder: &[String],
    options: &ParseOptions,
    warnings: &mut Vec<Warning>,
) -> EntryDef {
    let mut folder: Option<Vec<String>> = None;
    let mut icon: Option<String> = None;
    let mut language: Option<String> = None;
    let mut seen: Vec<Directive> = Vec::new();

    let mut body_start = block.lines.len();
    for (i, text) in block.lines.iter().enumerate() {
        let line_no = block.line + 1 + i;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (word, value) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (trimmed, ""),
        };

        let Some(directive) = Directive::from_keyword(word) else {
            if is_keyword(word) {
                warnings.push(Warning::new(
                    line_no,
                    WarningKind::UnknownDirective {
                        keyword: word.to_string(),
                    },
                ));
            }
            body_start = i;
            break;
        };

        if seen.contains(&directive) {
            warnings.push(Warning::new(
                line_no,
                WarningKind::RepeatedDirective {
                    keyword: directive.keyword().to_string(),
                },
            ));
        }
        seen.push(directive);

        match directive {
            Directive::Folder => folder = Some(split_path(value, &options.delimiter)),
            Directive::Icon | Directive::Lang if value.is_empty() => {
                warnings.push(Warning::new(
                    line_no,
                    WarningKind::EmptyDirective {
                        keyword: directive.keyword().to_string(),
                    },
                ));
            }
            Directive::Icon => icon = Some(value.to_string()),
            Directive::Lang => language = Some(value.to_string()),
        }
    }

    let folder_path = folder.unwrap_or_else(|| {
        if options.sticky_folders {
            previous_folder.to_vec()
        } else {
            Vec::new()
        }
    });

    let mut body_lines = &block.lines[body_start..];
    while let Some((last, rest)) = body_lines.split_last() {
        if !last.trim().is_empty() {
            break;
        }
        body_lines = rest;
    }

    EntryDef {
        name: block.title.clone(),
        line: block.line,
        folder_path,
        icon,
        language: language.unwrap_or_else(|| options.default_language.clone()),
        body: body_lines.join("\n"),
        body_line: if body_lines.is_empty() {
            block.line
        } else {
            block.line + 1 + body_start
        },
        updated: block.updated.clone(),
    }
}

/// Split a `FOLDER` value into trimmed, non-empty segments.
pub fn split_path(value: &str, delimiter: &str) -> Vec<String> {
    if delimiter.is_empty() {
        let value = value.trim();
        return if value.is_empty() {
            Vec::new()
        } else {
            vec![value.to_string()]
        };
    }
    value
        .split(delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// An all-caps word such as `FOLDER` or `TAGS`.
fn is_keyword(word: &str) -> bool {
    word.len() >= 2 && word.chars().all(|c| c.is_ascii_uppercase() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(title: &str, lines: &[&str]) -> RawBlock {
        RawBlock {
            title: title.into(),
            line: 10,
            lines: lines.iter().map(|l| l.to_string()).collect(),
            updated: None,
        }
    }

    fn parse(b: &RawBlock, options: &ParseOptions) -> (EntryDef, Vec<Warning>) {
        let mut warnings = Vec::new();
        let def = parse_block(b, &[], options, &mut warnings);
        (def, warnings)
    }

    #[test]
    fn test_defaults_without_directives() {
        let (def, warnings) = parse(
            &block("Favicon Grabber", &["location.href = \"x\";"]),
            &ParseOptions::default(),
        );
        assert!(warnings.is_empty());
        assert_eq!(def.name, "Favicon Grabber");
        assert!(def.folder_path.is_empty());
        assert_eq!(def.icon, None);
        assert_eq!(def.language, "javascript");
        assert_eq!(def.body, "location.href = \"x\";");
        assert_eq!(def.body_line, 11);
    }

    #[test]
    fn test_directives_in_any_order_with_blank_lines() {
        let b = block(
            "Greatest Common Divisor",
            &[
                "",
                "FOLDER Math / Number Theory",
                "LANG CoffeeScript",
                "",
                "ICON javascript.ico",
                "",
                "gcd = (a, b) ->",
                "\treturn a",
                "",
                "",
            ],
        );
        let (def, warnings) = parse(&b, &ParseOptions::default());
        assert!(warnings.is_empty());
        assert_eq!(def.folder_path, vec!["Math", "Number Theory"]);
        assert_eq!(def.language, "CoffeeScript");
        assert_eq!(def.icon.as_deref(), Some("javascript.ico"));
        assert_eq!(def.body, "gcd = (a, b) ->\n\treturn a");
        assert_eq!(def.body_line, 17);
    }

    #[test]
    fn test_first_body_line_ends_directives() {
        let b = block("X", &["alert(1);", "FOLDER Late"]);
        let (def, _) = parse(&b, &ParseOptions::default());
        assert!(def.folder_path.is_empty());
        assert_eq!(def.body, "alert(1);\nFOLDER Late");
    }

    #[test]
    fn test_unknown_keyword_warns_and_starts_body() {
        let b = block("X", &["ICON a.ico", "TAGS fun", "go();"]);
        let (def, warnings) = parse(&b, &ParseOptions::default());
        assert_eq!(def.body, "TAGS fun\ngo();");
        assert_eq!(def.icon.as_deref(), Some("a.ico"));
        assert_eq!(
            warnings,
            vec![Warning::new(
                12,
                WarningKind::UnknownDirective {
                    keyword: "TAGS".into()
                }
            )]
        );
    }

    #[test]
    fn test_repeated_directive_last_wins() {
        let b = block("X", &["FOLDER A", "FOLDER B", "go();"]);
        let (def, warnings) = parse(&b, &ParseOptions::default());
        assert_eq!(def.folder_path, vec!["B"]);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0].kind,
            WarningKind::RepeatedDirective { .. }
        ));
    }

    #[test]
    fn test_sticky_folder_is_threaded_explicitly() {
        let previous = vec!["YouTube Tools".to_string()];
        let sticky = ParseOptions {
            sticky_folders: true,
            ..ParseOptions::default()
        };
        let mut warnings = Vec::new();

        let def = parse_block(&block("A", &["go();"]), &previous, &sticky, &mut warnings);
        assert_eq!(def.folder_path, previous);

        // A bare FOLDER resets to the root.
        let def = parse_block(&block("B", &["FOLDER", "go();"]), &previous, &sticky, &mut warnings);
        assert!(def.folder_path.is_empty());

        let def = parse_block(
            &block("C", &["go();"]),
            &previous,
            &ParseOptions::default(),
            &mut warnings,
        );
        assert!(def.folder_path.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_empty_icon_is_ignored() {
        let (def, warnings) = parse(&block("X", &["ICON", "go();"]), &ParseOptions::default());
        assert_eq!(def.icon, None);
        assert!(matches!(warnings[0].kind, WarningKind::EmptyDirective { .. }));
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("YouTube Tools/Speed", "/"), vec!["YouTube Tools", "Speed"]);
        assert_eq!(split_path(" /a//b/ ", "/"), vec!["a", "b"]);
        assert!(split_path("", "/").is_empty());
        assert_eq!(split_path("a > b", ">"), vec!["a", "b"]);
    }
}
