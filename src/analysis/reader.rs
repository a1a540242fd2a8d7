//! Declaration reader: turns parsed package files into a [`PackageDoc`].
//!
//! Only exported declarations are kept. Constants, variables and functions
//! are attached to a type when they clearly belong to it:
//!
//! - a value group whose typed specs (with iota carry-over) all name the same
//!   local type, covering at least 75% of the specs;
//! - a function whose results mention exactly one local type (a constructor);
//! - a method on the type's receiver.
//!
//! Printed declarations leave out unexported specs of value groups and
//! unexported struct fields or interface methods; the latter are replaced
//! by a `// contains filtered or unexported ...` comment.

use super::source::{is_exported, is_grouped, specs, SourceFile};
use crate::model::*;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;
use tree_sitter::Node;

const VALUE_TYPE_THRESHOLD: f64 = 0.75;

/// Read all declarations of `files` (non-test files of one package).
pub fn read_package(name: &str, import_path: &str, files: &[SourceFile]) -> PackageDoc {
    let mut reader = Reader::default();

    for file in files {
        if let Some(doc) = file.package_doc() {
            if reader.doc.is_empty() {
                reader.doc = doc;
            } else {
                reader.doc.push('\n');
                reader.doc.push_str(&doc);
            }
        }
        for decl in file.decls("type_declaration") {
            reader.read_types(file, decl);
        }
    }

    for file in files {
        let root = file.root();
        let mut cursor = root.walk();
        for decl in root.named_children(&mut cursor) {
            match decl.kind() {
                "const_declaration" => reader.read_values(file, decl, true),
                "var_declaration" => reader.read_values(file, decl, false),
                "function_declaration" => reader.read_func(file, decl),
                "method_declaration" => reader.read_method(file, decl),
                _ => {}
            }
        }
    }

    reader.finish(name, import_path)
}

#[derive(Default)]
struct Reader {
    doc: String,
    consts: Vec<Value>,
    vars: Vec<Value>,
    funcs: Vec<Func>,
    types: BTreeMap<String, Type>,
}

impl Reader {
    fn read_types(&mut self, file: &SourceFile, decl: Node) {
        let decl_doc = file.doc_for(decl).unwrap_or_default();
        let type_specs = specs(decl, &["type_spec", "type_alias"]);

        if type_specs.len() == 1 && !is_grouped(decl) {
            let spec = type_specs[0];
            let name = field_text(file, spec, "name");
            self.add_type(
                name,
                decl_doc,
                Decl {
                    pos: file.pos(decl.start_byte()),
                    span: file.span(decl.start_byte(), decl.end_byte()),
                    keyword: None,
                    edits: hidden_members(file, spec),
                },
            );
            return;
        }

        // Each spec of a grouped declaration becomes its own declaration,
        // falling back to the group's doc when it has none.
        for spec in type_specs {
            let name = field_text(file, spec, "name");
            let doc = file.doc_for(spec).unwrap_or_else(|| decl_doc.clone());
            self.add_type(
                name,
                doc,
                Decl {
                    pos: file.pos(spec.start_byte()),
                    span: file.span(spec.start_byte(), spec.end_byte()),
                    keyword: Some("type"),
                    edits: hidden_members(file, spec),
                },
            );
        }
    }

    fn add_type(&mut self, name: String, doc: String, decl: Decl) {
        if !is_exported(&name) {
            return;
        }
        self.types.insert(
            name.clone(),
            Type {
                doc,
                name,
                decl,
                ..Default::default()
            },
        );
    }

    fn read_values(&mut self, file: &SourceFile, decl: Node, is_const: bool) {
        let kind = if is_const { "const_spec" } else { "var_spec" };
        let value_specs = specs(decl, &[kind]);

        let names: Vec<String> = value_specs
            .iter()
            .flat_map(|s| file.names(*s))
            .filter(|n| is_exported(n))
            .collect();
        if names.is_empty() {
            return;
        }

        let edits = if is_grouped(decl) {
            hidden_specs(file, &value_specs)
        } else {
            Vec::new()
        };
        let value = Value {
            doc: file.doc_for(decl).unwrap_or_default(),
            names,
            decl: Decl {
                pos: file.pos(decl.start_byte()),
                span: file.span(decl.start_byte(), decl.end_byte()),
                keyword: None,
                edits,
            },
        };

        let owner = self
            .dominant_type(file, &value_specs, is_const)
            .and_then(|name| self.types.get_mut(&name));
        match (owner, is_const) {
            (Some(ty), true) => ty.consts.push(value),
            (Some(ty), false) => ty.vars.push(value),
            (None, true) => self.consts.push(value),
            (None, false) => self.vars.push(value),
        }
    }

    /// Local exported type shared by the group's typed specs, if it covers
    /// enough of the group.
    fn dominant_type(&self, file: &SourceFile, value_specs: &[Node], is_const: bool) -> Option<String> {
        let mut dominant: Option<String> = None;
        let mut freq = 0;
        let mut prev: Option<String> = None;

        for spec in value_specs {
            let name = match spec.child_by_field_name("type") {
                Some(ty) => file.base_type_name(ty),
                // an untyped constant without values repeats the previous spec
                None if is_const && spec.child_by_field_name("value").is_none() => prev.clone(),
                None => None,
            };
            if let Some(ref n) = name {
                if dominant.as_ref().is_some_and(|d| d != n) {
                    return None;
                }
                dominant = Some(n.clone());
                freq += 1;
            }
            prev = name;
        }

        let dominant = dominant?;
        let needed = (value_specs.len() as f64 * VALUE_TYPE_THRESHOLD) as usize;
        (freq >= needed && self.types.contains_key(&dominant)).then_some(dominant)
    }

    fn read_func(&mut self, file: &SourceFile, decl: Node) {
        let name = field_text(file, decl, "name");
        if !is_exported(&name) {
            return;
        }
        let func = Func {
            doc: file.doc_for(decl).unwrap_or_default(),
            name,
            recv: None,
            decl: signature(file, decl),
        };

        match self.constructed_type(file, decl) {
            Some(ty) => {
                debug!(func = %func.name, ty = %ty, "constructor");
                if let Some(ty) = self.types.get_mut(&ty) {
                    ty.funcs.push(func);
                }
            }
            None => self.funcs.push(func),
        }
    }

    /// The single local type a function's results mention, if any.
    fn constructed_type(&self, file: &SourceFile, decl: Node) -> Option<String> {
        let result = decl.child_by_field_name("result")?;
        let type_params = type_param_names(file, decl);

        let result_types: Vec<Node> = if result.kind() == "parameter_list" {
            let mut cursor = result.walk();
            let types = result
                .named_children(&mut cursor)
                .filter_map(|p| p.child_by_field_name("type"))
                .collect();
            types
        } else {
            vec![result]
        };

        let mut found: Option<String> = None;
        let mut count = 0;
        for mut ty in result_types {
            if matches!(ty.kind(), "slice_type" | "array_type") {
                match ty.child_by_field_name("element") {
                    Some(elem) => ty = elem,
                    None => continue,
                }
            }
            let Some(name) = file.base_type_name(ty) else {
                continue;
            };
            if type_params.contains(&name) || !self.types.contains_key(&name) {
                continue;
            }
            found = Some(name);
            count += 1;
        }
        if count == 1 {
            found
        } else {
            None
        }
    }

    fn read_method(&mut self, file: &SourceFile, decl: Node) {
        let name = field_text(file, decl, "name");
        if !is_exported(&name) {
            return;
        }
        let Some(recv) = receiver_type(file, decl) else {
            return;
        };
        let Some(ty) = self.types.get_mut(&recv) else {
            debug!(method = %name, recv = %recv, "method on undocumented type");
            return;
        };
        ty.methods.push(Func {
            doc: file.doc_for(decl).unwrap_or_default(),
            name,
            recv: Some(recv),
            decl: signature(file, decl),
        });
    }

    fn finish(self, name: &str, import_path: &str) -> PackageDoc {
        let mut funcs = self.funcs;
        funcs.sort_by(|a, b| a.name.cmp(&b.name));

        let types = self
            .types
            .into_values()
            .map(|mut ty| {
                ty.funcs.sort_by(|a, b| a.name.cmp(&b.name));
                ty.methods.sort_by(|a, b| a.name.cmp(&b.name));
                ty
            })
            .collect();

        PackageDoc {
            name: name.to_string(),
            import_path: import_path.to_string(),
            doc: self.doc,
            consts: self.consts,
            vars: self.vars,
            funcs,
            types,
        }
    }
}

fn field_text(file: &SourceFile, node: Node, field: &str) -> String {
    node.child_by_field_name(field)
        .map(|n| file.text(n).to_string())
        .unwrap_or_default()
}

/// Function or method declaration without its body.
fn signature(file: &SourceFile, decl: Node) -> Decl {
    let end = decl
        .child_by_field_name("body")
        .map_or(decl.end_byte(), |body| body.start_byte());
    let end = decl.start_byte() + file.src[decl.start_byte()..end].trim_end().len();
    Decl {
        pos: file.pos(decl.start_byte()),
        span: file.span(decl.start_byte(), end),
        keyword: None,
        edits: Vec::new(),
    }
}

/// Identifiers that stay visible when embedded, although lowercase.
const PREDECLARED: &[&str] = &[
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error", "float32",
    "float64", "int", "int8", "int16", "int32", "int64", "rune", "string", "uint", "uint8",
    "uint16", "uint32", "uint64", "uintptr",
];

/// Cuts for the specs of a grouped value declaration that declare no
/// exported name, together with their doc comments.
fn hidden_specs(file: &SourceFile, value_specs: &[Node]) -> Vec<Edit> {
    value_specs
        .iter()
        .filter(|spec| !file.names(**spec).iter().any(|n| is_exported(n)))
        .map(|spec| cut(file, member_start(file, *spec), spec.end_byte()))
        .collect()
}

/// Cuts for the unexported fields of a struct type, or the unexported
/// methods of an interface type, plus a marker comment before the closing
/// brace when anything was cut.
fn hidden_members(file: &SourceFile, spec: Node) -> Vec<Edit> {
    let Some(ty) = spec.child_by_field_name("type") else {
        return Vec::new();
    };
    let (list, what) = match ty.kind() {
        "struct_type" => {
            let mut cursor = ty.walk();
            let list = ty
                .named_children(&mut cursor)
                .find(|n| n.kind() == "field_declaration_list");
            match list {
                Some(list) => (list, "fields"),
                None => return Vec::new(),
            }
        }
        "interface_type" => (ty, "methods"),
        _ => return Vec::new(),
    };

    let mut cursor = list.walk();
    let mut edits: Vec<Edit> = list
        .named_children(&mut cursor)
        .filter(|member| !member_exported(file, *member))
        .map(|member| cut(file, member_start(file, member), member.end_byte()))
        .collect();
    if !edits.is_empty() {
        edits.push(marker(file, list.end_byte() - 1, what));
    }
    edits
}

fn member_exported(file: &SourceFile, member: Node) -> bool {
    match member.kind() {
        "field_declaration" => {
            let names = file.names(member);
            if names.is_empty() {
                member
                    .child_by_field_name("type")
                    .map_or(true, |ty| embedded_exported(file.text(ty)))
            } else {
                names.iter().any(|n| is_exported(n))
            }
        }
        "method_elem" | "method_spec" => member
            .child_by_field_name("name")
            .map_or(true, |name| is_exported(file.text(name))),
        "type_elem" | "interface_type_name" => embedded_exported(file.text(member)),
        _ => true,
    }
}

/// Whether an embedded type (`T`, `*pkg.T`, `T[int]`) is visible outside
/// the package. Constraint unions are always kept.
fn embedded_exported(text: &str) -> bool {
    if text.contains(['|', '~']) {
        return true;
    }
    let text = text.trim_start_matches('*');
    let name = text.split('[').next().unwrap_or(text);
    let name = name.rsplit('.').next().unwrap_or(name).trim();
    is_exported(name) || PREDECLARED.contains(&name)
}

/// Start of a member including its doc comment.
fn member_start(file: &SourceFile, node: Node) -> usize {
    file.comments
        .doc_start(&file.src, node.start_byte())
        .unwrap_or(node.start_byte())
}

/// Remove `start..end`, widened to whole lines when nothing else but a
/// trailing comment shares them.
fn cut(file: &SourceFile, start: usize, end: usize) -> Edit {
    let src = &file.src;
    let line_start = src[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = src[end..].find('\n').map_or(src.len(), |i| end + i + 1);
    let after = src[end..line_end].trim();
    let whole_lines =
        src[line_start..start].trim().is_empty() && (after.is_empty() || after.starts_with("//"));
    let (start, end) = if whole_lines { (line_start, line_end) } else { (start, end) };
    Edit {
        span: file.span(start, end),
        text: String::new(),
    }
}

/// Insert the "contains filtered" marker in front of the closing brace at
/// `close`: on its own line when the brace starts a line, inline otherwise.
fn marker(file: &SourceFile, close: usize, what: &str) -> Edit {
    let src = &file.src;
    let line_start = src[..close].rfind('\n').map_or(0, |i| i + 1);
    let indent = &src[line_start..close];
    let (at, text) = if indent.trim().is_empty() {
        (
            line_start,
            format!("{}\t// contains filtered or unexported {}\n", indent, what),
        )
    } else {
        (close, format!("/* contains filtered or unexported {} */ ", what))
    };
    Edit {
        span: file.span(at, at),
        text,
    }
}

fn receiver_type(file: &SourceFile, decl: Node) -> Option<String> {
    let recv = decl.child_by_field_name("receiver")?;
    let mut cursor = recv.walk();
    let param = recv
        .named_children(&mut cursor)
        .find(|n| n.kind() == "parameter_declaration")?;
    file.base_type_name(param.child_by_field_name("type")?)
}

fn type_param_names(file: &SourceFile, decl: Node) -> HashSet<String> {
    let Some(params) = decl.child_by_field_name("type_parameters") else {
        return HashSet::new();
    };
    let mut cursor = params.walk();
    let names = params
        .named_children(&mut cursor)
        .flat_map(|p| file.names(p))
        .collect();
    names
}
