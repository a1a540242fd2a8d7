//! A parsed Go source file and the syntax helpers the reader needs.

use super::comment::CommentIndex;
use super::fileset::{FileSet, Pos, Span};
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

pub fn new_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .context("failed to load Go grammar")?;
    Ok(parser)
}

pub struct SourceFile {
    /// File name as registered in the file set.
    pub name: String,
    pub base: usize,
    pub src: String,
    pub tree: Tree,
    pub comments: CommentIndex,
}

impl SourceFile {
    /// Parse `src` and register it in `fset` under `name`.
    pub fn parse(parser: &mut Parser, fset: &mut FileSet, name: &str, src: String) -> Result<Self> {
        let tree = parser
            .parse(&src, None)
            .ok_or_else(|| anyhow!("parser produced no tree for {}", name))?;
        let comments = CommentIndex::build(tree.root_node(), &src);
        let base = fset.add_file(name, src.clone());
        Ok(SourceFile {
            name: name.to_string(),
            base,
            src,
            tree,
            comments,
        })
    }

    /// Parse a file without keeping positions (used for quick package scans).
    pub fn read(parser: &mut Parser, path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path.to_string_lossy();
        Self::parse(parser, &mut FileSet::default(), &name, src)
    }

    pub fn is_test(&self) -> bool {
        self.name.ends_with("_test.go")
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self, node: Node) -> &str {
        &self.src[node.byte_range()]
    }

    pub fn pos(&self, byte: usize) -> Pos {
        Pos(self.base + byte)
    }

    pub fn span(&self, start: usize, end: usize) -> Span {
        Span {
            start: self.pos(start),
            end: self.pos(end),
        }
    }

    pub fn package_clause(&self) -> Option<Node<'_>> {
        let root = self.root();
        let mut cursor = root.walk();
        let clause = root
            .named_children(&mut cursor)
            .find(|n| n.kind() == "package_clause");
        clause
    }

    pub fn package_name(&self) -> Option<String> {
        let clause = self.package_clause()?;
        let mut cursor = clause.walk();
        let name = clause
            .named_children(&mut cursor)
            .find(|n| n.kind() == "package_identifier" || n.kind() == "identifier")
            .map(|n| self.text(n).to_string());
        name
    }

    /// Doc comment attached to the package clause.
    pub fn package_doc(&self) -> Option<String> {
        let clause = self.package_clause()?;
        self.doc_for(clause)
    }

    pub fn doc_for(&self, node: Node) -> Option<String> {
        self.comments.doc_for(&self.src, node.start_byte())
    }

    /// Top-level declarations of the given kind.
    pub fn decls(&self, kind: &str) -> Vec<Node<'_>> {
        let root = self.root();
        let mut cursor = root.walk();
        let decls = root
            .named_children(&mut cursor)
            .filter(|n| n.kind() == kind)
            .collect();
        decls
    }

    /// Identifier texts of every `name` field of `node`.
    pub fn names(&self, node: Node) -> Vec<String> {
        let mut cursor = node.walk();
        let names = node
            .children_by_field_name("name", &mut cursor)
            .filter(|n| n.is_named())
            .map(|n| self.text(n).to_string())
            .collect();
        names
    }

    /// Base type name of a type expression (`T`, `*T`, `T[int]`, `(T)`);
    /// `None` for imported (`pkg.T`) and composite types.
    pub fn base_type_name(&self, node: Node) -> Option<String> {
        match node.kind() {
            "type_identifier" | "identifier" => Some(self.text(node).to_string()),
            "pointer_type" | "parenthesized_type" => {
                let inner = node.named_child(0)?;
                self.base_type_name(inner)
            }
            "generic_type" => self.base_type_name(node.child_by_field_name("type")?),
            _ => None,
        }
    }
}

/// Specs of a grouped or single declaration, looking through list wrappers
/// such as `var_spec_list`.
pub fn specs<'t>(decl: Node<'t>, kinds: &[&str]) -> Vec<Node<'t>> {
    let mut out = Vec::new();
    let mut cursor = decl.walk();
    for child in decl.named_children(&mut cursor) {
        if kinds.contains(&child.kind()) {
            out.push(child);
        } else if child.kind().ends_with("_spec_list") {
            out.extend(specs(child, kinds));
        }
    }
    out
}

/// Whether the declaration uses the parenthesized `kw ( ... )` form.
pub fn is_grouped(decl: Node) -> bool {
    let mut cursor = decl.walk();
    let grouped = decl.children(&mut cursor).any(|c| {
        c.kind() == "(" || c.kind().ends_with("_spec_list")
    });
    grouped
}

pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
