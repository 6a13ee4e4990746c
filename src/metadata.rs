//! Restricted YAML front matter.
//!
//! Supported:
//! - `key: value` scalars, optionally quoted
//! - an empty value followed by `- item` lines, joined with `", "`
//! - inline arrays `[a, b, c]`, joined the same way
//! - block scalars: `|` (literal) and `>` (folded) with an optional chomping
//!   indicator (`-` strip, `+` keep, clip by default) and an optional
//!   indentation digit
//!
//! Everything else is skipped with a warning. [`to_front_matter`] writes the
//! same syntax back so that parsing its output yields the original map.

use std::borrow::Cow;

use log::{debug, warn};

use crate::model::Metadata;

const LIST_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Literal,
    Folded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chomping {
    Strip,
    Clip,
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockHeader {
    style: Style,
    chomping: Chomping,
    indent: Option<usize>,
}

impl BlockHeader {
    /// Parses `|`, `>-`, `|+`, `|2-` and friends
    fn parse(value: &str) -> Option<Self> {
        let mut chars = value.chars();
        let style = match chars.next()? {
            '|' => Style::Literal,
            '>' => Style::Folded,
            _ => return None,
        };

        let mut chomping = Chomping::Clip;
        let mut indent = None;
        for c in chars {
            match c {
                '-' if chomping == Chomping::Clip => chomping = Chomping::Strip,
                '+' if chomping == Chomping::Clip => chomping = Chomping::Keep,
                '1'..='9' if indent.is_none() => indent = c.to_digit(10).map(|d| d as usize),
                _ => return None,
            }
        }

        Some(Self {
            style,
            chomping,
            indent,
        })
    }
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Strips one pair of matching outer quotes. Double-quoted text has its
/// backslash escapes resolved.
fn unquote(value: &str) -> Cow<'_, str> {
    let value = value.trim();
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        let inner = &value[1..value.len() - 1];
        return if inner.contains('\\') {
            Cow::Owned(unescape(inner))
        } else {
            Cow::Borrowed(inner)
        };
    }
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return Cow::Borrowed(&value[1..value.len() - 1]);
    }
    Cow::Borrowed(value)
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

fn list_item(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed == "-" {
        return Some("");
    }
    trimmed.strip_prefix("- ").map(str::trim)
}

/// Parses the raw text between the `---` delimiters
pub fn parse_front_matter(raw: &str) -> Metadata {
    let lines: Vec<&str> = raw.lines().collect();
    let mut metadata = Metadata::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let key_indent = indentation(line);
        if key_indent > 0 {
            warn!("Skipping unexpected indented front matter line: {}", trimmed);
            continue;
        }
        let Some((key, value)) = trimmed.split_once(':') else {
            warn!("Skipping front matter line without a key: {}", trimmed);
            continue;
        };
        let key = unquote(key).to_string();
        let value = value.trim();

        let parsed = if value.is_empty() {
            let mut items = Vec::new();
            while let Some(next) = lines.get(i) {
                if is_blank(next) {
                    i += 1;
                    continue;
                }
                match list_item(next) {
                    Some(item) => {
                        items.push(unquote(item).to_string());
                        i += 1;
                    }
                    None => break,
                }
            }
            items.join(LIST_SEPARATOR)
        } else if let Some(inner) = value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
            inner
                .split(',')
                .map(unquote)
                .filter(|item| !item.is_empty())
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR)
        } else if let Some(header) = BlockHeader::parse(value) {
            let (text, consumed) = read_block_scalar(&lines[i..], key_indent, header);
            i += consumed;
            text
        } else {
            unquote(value).to_string()
        };

        metadata.insert(key, parsed);
    }

    debug!("Read {} front matter keys", metadata.len());
    metadata
}

/// Reads the indented lines of a block scalar. Returns the value and the
/// number of lines consumed.
fn read_block_scalar(lines: &[&str], parent_indent: usize, header: BlockHeader) -> (String, usize) {
    let content_indent = match header.indent {
        Some(indent) => parent_indent + indent,
        None => match lines.iter().find(|line| !is_blank(line)) {
            Some(first) if indentation(first) > parent_indent => indentation(first),
            _ => return (String::new(), 0),
        },
    };

    let mut consumed = 0;
    let mut content: Vec<&str> = Vec::new();
    for line in lines {
        if is_blank(line) {
            content.push("");
        } else if indentation(line) >= content_indent {
            content.push(&line[content_indent..]);
        } else {
            break;
        }
        consumed += 1;
    }

    // Trailing blank lines belong to chomping, not to the text
    let mut trailing_blank = 0;
    while content.last() == Some(&"") {
        content.pop();
        trailing_blank += 1;
    }

    if content.is_empty() {
        return (String::new(), consumed);
    }

    let mut text = match header.style {
        Style::Literal => content.join("\n"),
        Style::Folded => fold(&content),
    };
    match header.chomping {
        Chomping::Strip => {}
        Chomping::Clip => text.push('\n'),
        Chomping::Keep => text.push_str(&"\n".repeat(trailing_blank + 1)),
    }

    (text, consumed)
}

/// Folds lines into one, keeping breaks around blank and more-indented lines
fn fold(lines: &[&str]) -> String {
    let mut text = String::new();
    let mut previous: Option<&str> = None;

    for line in lines {
        if let Some(previous) = previous {
            if line.is_empty() {
                text.push('\n');
            } else if previous.is_empty() {
                // the blank line already produced the break
            } else if line.starts_with([' ', '\t']) || previous.starts_with([' ', '\t']) {
                text.push('\n');
            } else {
                text.push(' ');
            }
        }
        text.push_str(line);
        previous = Some(line);
    }
    text
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value != value.trim()
        || value.starts_with(['[', '|', '>', '"', '\'', '#', '-', '{', '&', '*', '!', '%', '@'])
        || value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
}

/// Whether a literal block scalar reads back as exactly `value`. Blank lines
/// inside a block are empty to the reader, and a block needs at least one
/// content line.
fn fits_block(value: &str) -> bool {
    let body = value.trim_end_matches('\n');
    !body.is_empty()
        && !value.contains('\r')
        && body.split('\n').all(|line| line.is_empty() || !is_blank(line))
}

/// Renders metadata as a front matter block, keys sorted
pub fn to_front_matter(metadata: &Metadata) -> String {
    let mut out = String::from("---\n");

    for (key, value) in metadata {
        if !value.contains('\n') || !fits_block(value) {
            if value.contains(['\n', '\r']) || needs_quotes(value) {
                out.push_str(&format!("{key}: \"{}\"\n", escape(value)));
            } else {
                out.push_str(&format!("{key}: {value}\n"));
            }
            continue;
        }

        let body = value.trim_end_matches('\n');
        let chomping = match value.len() - body.len() {
            0 => "-",
            1 => "",
            _ => "+",
        };
        // An explicit indentation digit when the text itself starts indented
        let indent = if body.starts_with([' ', '\t']) || body.starts_with('\n') {
            "2"
        } else {
            ""
        };
        out.push_str(&format!("{key}: |{indent}{chomping}\n"));

        for line in body.split('\n') {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
        for _ in 1..(value.len() - body.len()) {
            out.push('\n');
        }
    }

    out.push_str("---\n");
    out
}
