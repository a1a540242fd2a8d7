//! Doc model for one package, as produced by the analysis layer.
//!
//! This is the input of the mapper. Declarations only carry positions into
//! the page's [`FileSet`]; their source text is produced by the printer.

use crate::analysis::fileset::{FileSet, Pos, Span};
use std::collections::BTreeMap;

/// Everything known about a single package directory.
#[derive(Debug, Default)]
pub struct PageInfo {
    /// Directory that was scanned.
    pub dirname: String,
    pub is_main: bool,
    /// Package documentation; `None` when the directory holds no package.
    pub pdoc: Option<PackageDoc>,
    pub examples: Vec<Example>,
    /// Notes grouped by marker (e.g. "BUG").
    pub notes: BTreeMap<String, Vec<Note>>,
    /// Subdirectories; `None` when the directory could not be listed.
    pub dirs: Option<Vec<DirEntry>>,
    pub fset: FileSet,
}

#[derive(Debug, Default)]
pub struct PackageDoc {
    pub name: String,
    pub import_path: String,
    pub doc: String,
    pub consts: Vec<Value>,
    pub vars: Vec<Value>,
    pub funcs: Vec<Func>,
    pub types: Vec<Type>,
}

/// A declaration node: where it starts and which source range it covers.
#[derive(Debug, Clone, Default)]
pub struct Decl {
    pub pos: Pos,
    pub span: Span,
    /// Keyword to print in front of the span when the span itself lacks
    /// one (a type split out of a grouped `type ( ... )` declaration).
    pub keyword: Option<&'static str>,
    /// Replacements applied to the span's text before printing, sorted by
    /// position. Used to drop unexported specs and fields.
    pub edits: Vec<Edit>,
}

/// Replace `span` with `text`; an empty span inserts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edit {
    pub span: Span,
    pub text: String,
}

/// A constant or variable declaration group.
#[derive(Debug, Clone, Default)]
pub struct Value {
    pub doc: String,
    /// Exported names, in declaration order.
    pub names: Vec<String>,
    pub decl: Decl,
}

#[derive(Debug, Clone, Default)]
pub struct Func {
    pub doc: String,
    pub name: String,
    /// Receiver base type for methods.
    pub recv: Option<String>,
    pub decl: Decl,
}

#[derive(Debug, Clone, Default)]
pub struct Type {
    pub doc: String,
    pub name: String,
    pub decl: Decl,
    pub consts: Vec<Value>,
    pub vars: Vec<Value>,
    /// Constructors: functions returning this type.
    pub funcs: Vec<Func>,
    pub methods: Vec<Func>,
}

#[derive(Debug, Clone, Default)]
pub struct Example {
    /// Suffix after "Example" in the function name ("" for the package example).
    pub name: String,
    pub code: ExampleCode,
}

/// Body block of an example function. Comments inside the block are part
/// of the span and are printed with it.
#[derive(Debug, Clone, Default)]
pub struct ExampleCode {
    pub body: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub uid: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    /// Path relative to the package directory, `/`-separated.
    pub path: String,
    pub synopsis: String,
    pub has_pkg: bool,
}
