//! Output documents, serialized as YAML.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Serialize)]
pub struct PackageDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "ismain")]
    pub is_main: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "importPath", skip_serializing_if = "Option::is_none")]
    pub import_path: Option<String>,
    pub dir: String,
    pub consts: Vec<ValueDocument>,
    pub types: Vec<TypeEntry>,
    pub vars: Vec<ValueDocument>,
    pub funcs: Vec<FunctionDocument>,
    pub notes: BTreeMap<String, Vec<NoteDocument>>,
    pub examples: Vec<ExampleDocument>,
    pub dirs: Vec<DirDocument>,
}

/// A package's types: UIDs in the split layout, full documents in the
/// nested one.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TypeEntry {
    Uid(String),
    Inline(TypeDocument),
}

#[derive(Debug, Serialize)]
pub struct TypeDocument {
    pub uid: String,
    pub name: String,
    pub summary: String,
    pub description: String,
    pub code: String,
    pub consts: Vec<ValueDocument>,
    pub vars: Vec<ValueDocument>,
    pub funcs: Vec<FunctionDocument>,
    pub methods: Vec<FunctionDocument>,
    pub source: SourcePosition,
}

#[derive(Debug, Serialize)]
pub struct FunctionDocument {
    pub uid: String,
    pub name: String,
    pub summary: String,
    pub description: String,
    pub code: String,
    pub source: SourcePosition,
}

/// One constant or variable declaration group.
#[derive(Debug, Serialize)]
pub struct ValueDocument {
    pub names: Vec<String>,
    pub summary: String,
    pub description: String,
    pub code: String,
    pub source: SourcePosition,
}

#[derive(Debug, Serialize)]
pub struct ExampleDocument {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct NoteDocument {
    pub uid: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct DirDocument {
    pub name: String,
    pub path: String,
    pub summary: String,
    #[serde(rename = "haspkg")]
    pub has_pkg: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SourcePosition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub file: String,
    pub line: usize,
}
