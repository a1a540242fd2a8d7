//! Prints declaration nodes back to source text.
//!
//! Text comes straight from the file set, so the original formatting is
//! kept, apart from the edits recorded on a declaration (unexported specs
//! and fields cut out). Nodes that sat inside a parenthesized group are
//! re-indented so their continuation lines line up with the first line.

use crate::analysis::fileset::{FileSet, Span};
use crate::model::{Decl, Edit, ExampleCode};

/// Everything that can be printed.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// A declaration, without its leading doc comment.
    Decl(&'a Decl),
    /// An example body, including the comments inside it.
    Example(&'a ExampleCode),
}

pub fn render(fset: &FileSet, node: Node<'_>) -> String {
    match node {
        Node::Decl(decl) => {
            let text = edited(fset, decl.span, &decl.edits)
                .map(|text| outdent(fset, decl.span, &text))
                .unwrap_or_default();
            match decl.keyword {
                Some(keyword) => format!("{} {}", keyword, text),
                None => text,
            }
        }
        Node::Example(code) => fset
            .text(code.body)
            .map(|text| outdent(fset, code.body, text))
            .unwrap_or_default(),
    }
}

/// Text of `span` with `edits` applied. Edits outside the span or
/// overlapping an earlier edit are ignored.
fn edited(fset: &FileSet, span: Span, edits: &[Edit]) -> Option<String> {
    let mut out = String::new();
    let mut cur = span.start;
    for edit in edits {
        if edit.span.start < cur || edit.span.end > span.end {
            continue;
        }
        out.push_str(fset.text(Span { start: cur, end: edit.span.start })?);
        out.push_str(&edit.text);
        cur = edit.span.end;
    }
    out.push_str(fset.text(Span { start: cur, end: span.end })?);
    Some(out)
}

fn outdent(fset: &FileSet, span: Span, text: &str) -> String {
    let indent = fset.line_indent(span.start).unwrap_or("");
    if indent.is_empty() {
        return text.trim_end().to_string();
    }
    text.trim_end()
        .split('\n')
        .enumerate()
        .map(|(i, line)| if i == 0 { line } else { line.strip_prefix(indent).unwrap_or(line) })
        .collect::<Vec<_>>()
        .join("\n")
}
