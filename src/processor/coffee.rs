//! CoffeeScript support: comment stripping plus hand-off to an external
//! compiler that turns the source into JavaScript.

use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::error::NormalizeError;

/// Turns source in some other language into host-executable JavaScript.
pub trait Translator: Send + Sync {
    fn translate(&self, source: &str) -> Result<String, NormalizeError>;
}

/// Runs a compiler command, feeding the source on stdin and reading
/// JavaScript from stdout.
#[derive(Debug, Clone)]
pub struct CommandTranslator {
    program: String,
    args: Vec<String>,
}

impl CommandTranslator {
    /// `command[0]` is the program, the rest are its arguments.
    pub fn new(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn failure(&self, message: impl ToString) -> NormalizeError {
        NormalizeError::Translator {
            command: self.display(),
            message: message.to_string(),
        }
    }
}

impl Translator for CommandTranslator {
    fn translate(&self, source: &str) -> Result<String, NormalizeError> {
        debug!("running `{}`", self.display());
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(|e| self.failure(e))?;
        }

        let output = child.wait_with_output().map_err(|e| self.failure(e))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(format!("{}: {}", output.status, stderr.trim())));
        }
        String::from_utf8(output.stdout).map_err(|e| self.failure(e))
    }
}

/// Used when no CoffeeScript command is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl Translator for Unavailable {
    fn translate(&self, _source: &str) -> Result<String, NormalizeError> {
        Err(NormalizeError::Translator {
            command: String::new(),
            message: "no CoffeeScript compiler configured".into(),
        })
    }
}

/// Remove `#` line comments and `###` block comments, leaving strings,
/// interpolations and heregexes alone. Indentation is preserved.
pub fn strip_comments(src: &str) -> Result<String, NormalizeError> {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    let mut i = 0;

    let at = |i: usize, pat: &str| pat.chars().enumerate().all(|(k, p)| chars.get(i + k) == Some(&p));
    let line_of = |i: usize| chars[..i].iter().filter(|&&c| c == '\n').count() + 1;

    while i < chars.len() {
        let c = chars[i];
        if at(i, "###") && chars.get(i + 3) != Some(&'#') {
            let close = find(&chars, i + 3, "###").ok_or(NormalizeError::Unterminated {
                what: "block comment",
                line: line_of(i),
            })?;
            i = close + 3;
        } else if c == '#' {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
        } else if at(i, "'''") || at(i, "\"\"\"") || at(i, "///") {
            let delim: String = chars[i..i + 3].iter().collect();
            let close = find(&chars, i + 3, &delim).ok_or(NormalizeError::Unterminated {
                what: "heredoc",
                line: line_of(i),
            })?;
            out.extend(&chars[i..close + 3]);
            i = close + 3;
        } else if c == '\'' || c == '"' {
            let end = quoted_end(&chars, i).ok_or(NormalizeError::Unterminated {
                what: "string literal",
                line: line_of(i),
            })?;
            out.extend(&chars[i..end]);
            i = end;
        } else {
            out.push(c);
            i += 1;
        }
    }

    let lines: Vec<&str> = out.lines().map(str::trim_end).collect();
    Ok(lines.join("\n").trim_matches('\n').to_string())
}

fn find(chars: &[char], from: usize, pat: &str) -> Option<usize> {
    let pat: Vec<char> = pat.chars().collect();
    (from..chars.len()).find(|&i| chars[i..].starts_with(&pat))
}

/// Index just past the closing quote of the string starting at `start`.
fn quoted_end(chars: &[char], start: usize) -> Option<usize> {
    let quote = chars[start];
    let mut depth = 0usize;
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '#' if quote == '"' && chars.get(i + 1) == Some(&'{') => {
                depth += 1;
                i += 1;
            }
            '}' if depth > 0 => depth -= 1,
            c if c == quote && depth == 0 => return Some(i + 1),
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_line_and_block_comments() {
        let src = "### header\ncomment ###\ngcd = (a, b) -> # helper\n\t[a, b] = [b, a % b] until b is 0\n\treturn a\n";
        assert_eq!(
            strip_comments(src).unwrap(),
            "gcd = (a, b) ->\n\t[a, b] = [b, a % b] until b is 0\n\treturn a"
        );
    }

    #[test]
    fn test_keeps_hashes_inside_strings() {
        let src = "alert \"gcd(#{input}) = #{result}\" # done\nx = '#not a comment'";
        assert_eq!(
            strip_comments(src).unwrap(),
            "alert \"gcd(#{input}) = #{result}\"\nx = '#not a comment'"
        );
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let err = strip_comments("a = 1\nb = 'oops").unwrap_err();
        assert_eq!(
            err,
            NormalizeError::Unterminated {
                what: "string literal",
                line: 2
            }
        );
    }

    #[test]
    fn test_unavailable_translator_fails() {
        assert!(Unavailable.translate("x = 1").is_err());
    }

    #[test]
    fn test_command_translator_requires_a_program() {
        assert!(CommandTranslator::new(&[]).is_none());
        let t = CommandTranslator::new(&["coffee".into(), "-bcs".into()]).unwrap();
        assert_eq!(t.display(), "coffee -bcs");
    }
}
