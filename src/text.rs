//! Doc comment text: first-sentence synopsis and plain-text rendering.
//!
//! Comment text is split into blocks: paragraphs (unindented lines),
//! preformatted code (indented lines) and headings (a lone line between two
//! paragraphs that looks like a title). The synopsis only ever looks at the
//! first paragraph, so it is always a leading part of the description.

use regex::Regex;
use std::sync::LazyLock;

/// Synopses starting with these (case-insensitive) are dropped.
const ILLEGAL_PREFIXES: &[&str] = &["copyright", "all rights", "author"];

/// Indentation put in front of every preformatted line in descriptions.
pub const PRE_INDENT: &str = "    ";

// An apostrophe is only allowed in headings as a possessive "'s".
static RE_BAD_APOSTROPHE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(?:[^s]|s\S|$)").unwrap());

#[derive(Debug, PartialEq, Eq)]
enum Block {
    Para(Vec<String>),
    Heading(String),
    Code(Vec<String>),
}

/// First sentence of the first paragraph, whitespace-collapsed.
pub fn synopsis(text: &str) -> String {
    let Some(Block::Para(lines)) = blocks(text).into_iter().next() else {
        return String::new();
    };
    let para = lines.join("\n");
    let sentence = collapse_whitespace(&para[..first_sentence_len(&para)]);
    let lower = sentence.to_lowercase();
    if ILLEGAL_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return String::new();
    }
    convert_quotes(&sentence)
}

/// Render comment text as plain text: each paragraph on a single line,
/// headings as-is, code blocks indented with `pre_indent`, blocks separated
/// by one blank line.
pub fn to_text(text: &str, indent: &str, pre_indent: &str) -> String {
    let mut out = String::new();
    for (i, block) in blocks(text).iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match block {
            Block::Para(lines) => {
                let words: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
                out.push_str(indent);
                out.push_str(&convert_quotes(&words.join(" ")));
                out.push('\n');
            }
            Block::Heading(line) => {
                out.push_str(indent);
                out.push_str(&convert_quotes(line));
                out.push('\n');
            }
            Block::Code(lines) => {
                for line in lines {
                    if !line.trim().is_empty() {
                        out.push_str(pre_indent);
                        out.push_str(line);
                    }
                    out.push('\n');
                }
            }
        }
    }
    out
}

fn blocks(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut out = Vec::new();
    let mut i = 0;
    let mut last_was_para = false;

    while i < lines.len() {
        if is_blank(lines[i]) {
            i += 1;
            continue;
        }

        if indent_len(lines[i]) > 0 {
            let start = i;
            while i < lines.len() && (is_blank(lines[i]) || indent_len(lines[i]) > 0) {
                i += 1;
            }
            let mut end = i;
            while end > start && is_blank(lines[end - 1]) {
                end -= 1;
            }
            out.push(Block::Code(unindent(&lines[start..end])));
            last_was_para = false;
            continue;
        }

        let start = i;
        while i < lines.len() && !is_blank(lines[i]) && indent_len(lines[i]) == 0 {
            i += 1;
        }

        // A heading is a single line between two paragraphs, with blank
        // lines on both sides.
        let followed_by_para = i + 1 < lines.len()
            && is_blank(lines[i])
            && !is_blank(lines[i + 1])
            && indent_len(lines[i + 1]) == 0;
        if i == start + 1 && last_was_para && followed_by_para && is_heading(lines[start]) {
            out.push(Block::Heading(lines[start].trim().to_string()));
            last_was_para = false;
            continue;
        }

        out.push(Block::Para(
            lines[start..i].iter().map(|l| l.to_string()).collect(),
        ));
        last_was_para = true;
    }
    out
}

fn is_heading(line: &str) -> bool {
    let line = line.trim();
    let Some(first) = line.chars().next() else {
        return false;
    };
    if !first.is_uppercase() {
        return false;
    }
    let Some(last) = line.chars().last() else {
        return false;
    };
    if !last.is_alphanumeric() {
        return false;
    }
    if line.contains(|c: char| ";:!?+*/=[]{}_^°&§~%#@<\">\\".contains(c)) {
        return false;
    }
    // a period must be followed by a non-space ("v1.2" is fine)
    let bytes = line.as_bytes();
    if bytes
        .iter()
        .enumerate()
        .any(|(i, &b)| b == b'.' && bytes.get(i + 1).map_or(true, |&n| n == b' '))
    {
        return false;
    }
    !RE_BAD_APOSTROPHE.is_match(line)
}

/// Byte length of the first sentence: up to a period followed by
/// whitespace, unless the period closes a lone capital ("Mr. A. Smith").
fn first_sentence_len(s: &str) -> usize {
    let (mut ppp, mut pp, mut p) = (' ', ' ', ' ');
    for (i, q) in s.char_indices() {
        let q = if q == '\n' || q == '\r' || q == '\t' { ' ' } else { q };
        if q == ' ' && p == '.' && (!pp.is_uppercase() || ppp.is_uppercase()) {
            return i;
        }
        if p == '。' || p == '．' {
            return i;
        }
        (ppp, pp, p) = (pp, p, q);
    }
    s.len()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn convert_quotes(s: &str) -> String {
    s.replace("``", "\u{201c}").replace("''", "\u{201d}")
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn indent_len(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ' || *b == b'\t').count()
}

/// Strip the whitespace prefix shared by all non-blank lines.
fn unindent(lines: &[&str]) -> Vec<String> {
    let mut prefix: Option<&str> = None;
    for line in lines.iter().filter(|l| !is_blank(l)) {
        let indent = &line[..indent_len(line)];
        prefix = Some(match prefix {
            None => indent,
            Some(p) => {
                let common = p
                    .bytes()
                    .zip(indent.bytes())
                    .take_while(|(a, b)| a == b)
                    .count();
                &p[..common]
            }
        });
    }
    let cut = prefix.map_or(0, str::len);
    lines
        .iter()
        .map(|l| if is_blank(l) { String::new() } else { l[cut..].to_string() })
        .collect()
}
