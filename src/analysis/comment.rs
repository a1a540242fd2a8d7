//! Comment groups: doc comment lookup, comment text and note markers.

use crate::model::Note;
use regex::Regex;
use std::sync::LazyLock;
use tree_sitter::Node;

// Tool directives such as `//go:generate` or `//line foo.go:10`.
static RE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:line |extern |export |[a-z0-9]+:[a-z0-9])").unwrap()
});

// A comment that opens a note: `// BUG(uid): body`.
static RE_NOTE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[/*][ \t]*[A-Z][A-Z]+\([^)]+\):?").unwrap());

static RE_NOTE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*([A-Z][A-Z]+)\(([^)]+)\):?").unwrap());

/// A run of comments on adjacent lines with nothing but whitespace between
/// them.
#[derive(Debug)]
pub struct Group {
    /// Byte ranges of the individual comments.
    pub comments: Vec<(usize, usize)>,
    /// Whether the first comment starts its line.
    pub own_line: bool,
}

impl Group {
    fn end(&self) -> usize {
        self.comments[self.comments.len() - 1].1
    }
}

/// All comment groups of one file, in source order.
#[derive(Debug, Default)]
pub struct CommentIndex {
    groups: Vec<Group>,
}

impl CommentIndex {
    pub fn build(root: Node, src: &str) -> Self {
        let mut ranges = Vec::new();
        collect_comments(root, &mut ranges);
        ranges.sort_unstable();

        let mut groups: Vec<Group> = Vec::new();
        for (start, end) in ranges {
            if let Some(last) = groups.last_mut() {
                let gap = &src[last.end()..start];
                // a trailing comment only groups with comments on its own line
                let max_newlines = if last.own_line { 1 } else { 0 };
                if gap.trim().is_empty() && gap.matches('\n').count() <= max_newlines {
                    last.comments.push((start, end));
                    continue;
                }
            }
            let line_start = src[..start].rfind('\n').map_or(0, |i| i + 1);
            groups.push(Group {
                comments: vec![(start, end)],
                own_line: src[line_start..start].trim().is_empty(),
            });
        }
        CommentIndex { groups }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Text of the doc comment directly above the byte offset `start`: a
    /// group that starts its own line and ends on the previous line.
    pub fn doc_for(&self, src: &str, start: usize) -> Option<String> {
        let group = self.doc_group(src, start)?;
        Some(group_text(src, &group.comments))
    }

    /// Byte offset where the doc comment above `start` begins.
    pub fn doc_start(&self, src: &str, start: usize) -> Option<usize> {
        self.doc_group(src, start).map(|g| g.comments[0].0)
    }

    fn doc_group(&self, src: &str, start: usize) -> Option<&Group> {
        let idx = self.groups.partition_point(|g| g.end() <= start);
        let group = &self.groups[idx.checked_sub(1)?];
        let gap = &src[group.end()..start];
        if !group.own_line || !gap.trim().is_empty() || gap.matches('\n').count() != 1 {
            return None;
        }
        Some(group)
    }
}

fn collect_comments(node: Node, out: &mut Vec<(usize, usize)>) {
    if node.kind() == "comment" {
        out.push((node.start_byte(), node.end_byte()));
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_comments(child, out);
    }
}

/// Text of a comment group with comment markers removed.
///
/// One space after `//` is dropped, directives are skipped, trailing
/// whitespace is removed, runs of blank lines collapse into one and leading
/// and trailing blank lines are dropped. Non-empty text ends in a newline.
pub fn group_text(src: &str, comments: &[(usize, usize)]) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for &(start, end) in comments {
        let raw = &src[start..end];
        let body = if let Some(rest) = raw.strip_prefix("//") {
            if RE_DIRECTIVE.is_match(rest) {
                continue;
            }
            rest.strip_prefix(' ').unwrap_or(rest)
        } else if let Some(rest) = raw.strip_prefix("/*") {
            rest.strip_suffix("*/").unwrap_or(rest)
        } else {
            raw
        };
        lines.extend(body.split('\n').map(|l| l.trim_end()));
    }

    let mut out = String::new();
    let mut pending_blank = false;
    for line in lines {
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if pending_blank {
            out.push('\n');
            pending_blank = false;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Notes in one comment group. Each note runs from its marker comment up to
/// the next marker comment or the end of the group.
pub fn group_notes(src: &str, group: &Group) -> Vec<(String, Note)> {
    let starts: Vec<usize> = group
        .comments
        .iter()
        .enumerate()
        .filter(|(_, &(s, e))| RE_NOTE_COMMENT.is_match(&src[s..e]))
        .map(|(i, _)| i)
        .collect();

    let mut notes = Vec::new();
    for (n, &first) in starts.iter().enumerate() {
        let last = starts.get(n + 1).copied().unwrap_or(group.comments.len());
        let text = group_text(src, &group.comments[first..last]);
        let Some(caps) = RE_NOTE_MARKER.captures(&text) else {
            continue;
        };
        let body = clean_keep_newlines(&text[caps[0].len()..]);
        if body.is_empty() {
            continue;
        }
        notes.push((
            caps[1].to_string(),
            Note {
                uid: caps[2].to_string(),
                body,
            },
        ));
    }
    notes
}

/// Collapse runs of spaces and tabs, keep newlines, drop leading spaces and
/// a trailing space.
fn clean_keep_newlines(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev = ' ';
    for c in s.chars() {
        let c = if c == '\t' || c == '\r' { ' ' } else { c };
        if c != ' ' || prev != ' ' {
            out.push(c);
            prev = c;
        }
    }
    if prev == ' ' && out.ends_with(' ') {
        out.pop();
    }
    out
}
