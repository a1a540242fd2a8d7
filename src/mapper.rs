//! Document mapper: converts a [`PageInfo`] into output documents.
//!
//! UIDs are dotted paths: the package UID is the package name, optionally
//! behind a namespace prefix; types and functions append their name to the
//! package UID, methods append theirs to the type UID. Value groups carry
//! no UID.

use crate::analysis::fileset::{FileSet, Pos};
use crate::model::*;
use crate::printer::{self, Node};
use crate::schema::*;
use crate::text;

/// How types are laid out in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Layout {
    /// Types embedded in the package document.
    Nested,
    /// Types referenced by UID, each written as its own document.
    #[default]
    Split,
}

/// Run-wide mapping settings, fixed before generation starts.
#[derive(Debug, Clone, Default)]
pub struct MapperOptions {
    pub uid_prefix: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub layout: Layout,
}

/// Mapper output. `types` is only filled in the split layout.
#[derive(Debug)]
pub struct Mapped {
    pub package: PackageDocument,
    pub types: Vec<TypeDocument>,
}

pub struct Mapper {
    options: MapperOptions,
}

impl Mapper {
    pub fn new(options: MapperOptions) -> Self {
        Mapper { options }
    }

    pub fn map(&self, info: &PageInfo) -> Mapped {
        let mut package = PackageDocument {
            is_main: info.is_main,
            dir: info.dirname.clone(),
            notes: map_notes(info),
            dirs: map_dirs(info),
            ..Default::default()
        };
        let mut types = Vec::new();

        // Without a package only the directory-level fields are known.
        let Some(pdoc) = &info.pdoc else {
            return Mapped { package, types };
        };

        let fset = &info.fset;
        let uid = self.package_uid(&pdoc.name);
        package.summary = Some(text::synopsis(&pdoc.doc));
        package.description = Some(description(&pdoc.doc));
        package.import_path = Some(pdoc.import_path.clone());
        package.examples = info
            .examples
            .iter()
            .map(|eg| ExampleDocument {
                name: eg.name.clone(),
                code: printer::render(fset, Node::Example(&eg.code)),
            })
            .collect();
        package.consts = self.values(fset, &pdoc.consts);
        package.vars = self.values(fset, &pdoc.vars);
        package.funcs = self.funcs(fset, &uid, &pdoc.funcs);

        let docs = pdoc.types.iter().map(|t| self.type_doc(fset, &uid, t));
        match self.options.layout {
            Layout::Nested => package.types = docs.map(TypeEntry::Inline).collect(),
            Layout::Split => {
                types = docs.collect();
                package.types = types.iter().map(|t| TypeEntry::Uid(t.uid.clone())).collect();
            }
        }

        package.uid = Some(uid);
        package.name = Some(pdoc.name.clone());
        Mapped { package, types }
    }

    fn package_uid(&self, name: &str) -> String {
        match &self.options.uid_prefix {
            Some(prefix) => format!("{}.{}", prefix, name),
            None => name.to_string(),
        }
    }

    fn type_doc(&self, fset: &FileSet, package_uid: &str, ty: &Type) -> TypeDocument {
        let uid = format!("{}.{}", package_uid, ty.name);
        TypeDocument {
            name: ty.name.clone(),
            summary: text::synopsis(&ty.doc),
            description: description(&ty.doc),
            code: printer::render(fset, Node::Decl(&ty.decl)),
            consts: self.values(fset, &ty.consts),
            vars: self.values(fset, &ty.vars),
            funcs: self.funcs(fset, package_uid, &ty.funcs),
            methods: self.funcs(fset, package_uid, &ty.methods),
            source: self.source(fset, ty.decl.pos),
            uid,
        }
    }

    fn funcs(&self, fset: &FileSet, package_uid: &str, funcs: &[Func]) -> Vec<FunctionDocument> {
        funcs
            .iter()
            .map(|f| FunctionDocument {
                uid: match &f.recv {
                    Some(recv) => format!("{}.{}.{}", package_uid, recv, f.name),
                    None => format!("{}.{}", package_uid, f.name),
                },
                name: f.name.clone(),
                summary: text::synopsis(&f.doc),
                description: description(&f.doc),
                code: printer::render(fset, Node::Decl(&f.decl)),
                source: self.source(fset, f.decl.pos),
            })
            .collect()
    }

    fn values(&self, fset: &FileSet, values: &[Value]) -> Vec<ValueDocument> {
        values
            .iter()
            .map(|v| ValueDocument {
                names: v.names.clone(),
                summary: text::synopsis(&v.doc),
                description: description(&v.doc),
                code: printer::render(fset, Node::Decl(&v.decl)),
                source: self.source(fset, v.decl.pos),
            })
            .collect()
    }

    fn source(&self, fset: &FileSet, pos: Pos) -> SourcePosition {
        let (file, line) = fset
            .position(pos)
            .map(|p| (p.filename, p.line))
            .unwrap_or_default();
        SourcePosition {
            repo: self.options.repo.clone(),
            branch: self.options.branch.clone(),
            file,
            line,
        }
    }
}

fn description(doc: &str) -> String {
    text::to_text(doc, "", text::PRE_INDENT)
}

fn map_notes(info: &PageInfo) -> std::collections::BTreeMap<String, Vec<NoteDocument>> {
    info.notes
        .iter()
        .map(|(marker, notes)| {
            let notes = notes
                .iter()
                .map(|n| NoteDocument {
                    uid: n.uid.clone(),
                    description: n.body.clone(),
                })
                .collect();
            (marker.clone(), notes)
        })
        .collect()
}

fn map_dirs(info: &PageInfo) -> Vec<DirDocument> {
    info.dirs
        .iter()
        .flatten()
        .map(|d| DirDocument {
            name: d.name.clone(),
            path: d.path.clone(),
            summary: d.synopsis.clone(),
            has_pkg: d.has_pkg,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fileset::Span;

    /// Synthetic page over a single file; declarations point at substrings.
    struct Fixture {
        src: &'static str,
        info: PageInfo,
        base: usize,
    }

    impl Fixture {
        fn new(src: &'static str) -> Self {
            let mut info = PageInfo {
                dirname: "/target".to_string(),
                dirs: Some(vec![]),
                ..Default::default()
            };
            let base = info.fset.add_file("shapes.go", src.to_string());
            Fixture { src, info, base }
        }

        fn decl(&self, text: &str) -> Decl {
            let start = self.src.find(text).unwrap();
            Decl {
                pos: Pos(self.base + start),
                span: Span {
                    start: Pos(self.base + start),
                    end: Pos(self.base + start + text.len()),
                },
                keyword: None,
                edits: vec![],
            }
        }

        fn func(&self, name: &str, doc: &str, text: &str) -> Func {
            Func {
                doc: doc.to_string(),
                name: name.to_string(),
                recv: None,
                decl: self.decl(text),
            }
        }

        fn method(&self, name: &str, doc: &str, text: &str) -> Func {
            Func {
                recv: Some("Square".to_string()),
                ..self.func(name, doc, text)
            }
        }
    }

    const SRC: &str = "package shapes\n\nconst (\n\tA = 1\n\tB = 2\n)\n\ntype Square struct{}\n\nfunc NewSquare() *Square\n\nfunc (s *Square) Area() int\n\nfunc (s *Square) Grow(n int)\n\nfunc Draw()\n\nfunc Erase()\n";

    fn shapes() -> PageInfo {
        let fx = Fixture::new(SRC);
        let square = Type {
            doc: "Square is a shape.\nIt has four sides.\n".to_string(),
            name: "Square".to_string(),
            decl: fx.decl("type Square struct{}"),
            funcs: vec![fx.func("NewSquare", "", "func NewSquare() *Square")],
            methods: vec![
                fx.method("Area", "Area is the area.\n", "func (s *Square) Area() int"),
                fx.method("Grow", "", "func (s *Square) Grow(n int)"),
            ],
            ..Default::default()
        };
        let pdoc = PackageDoc {
            name: "shapes".to_string(),
            import_path: "example.com/shapes".to_string(),
            doc: "Package shapes draws. It is small.\n".to_string(),
            consts: vec![Value {
                doc: "Limits.\n".to_string(),
                names: vec!["A".to_string(), "B".to_string()],
                decl: fx.decl("const (\n\tA = 1\n\tB = 2\n)"),
            }],
            funcs: vec![
                fx.func("Draw", "Draw draws.\n", "func Draw()"),
                fx.func("Erase", "", "func Erase()"),
            ],
            types: vec![square],
            ..Default::default()
        };
        let mut info = fx.info;
        info.pdoc = Some(pdoc);
        info
    }

    fn options(prefix: Option<&str>, layout: Layout) -> MapperOptions {
        MapperOptions {
            uid_prefix: prefix.map(str::to_string),
            repo: Some("github.com/acme/shapes".to_string()),
            branch: Some("main".to_string()),
            layout,
        }
    }

    #[test]
    fn function_uids_follow_package_uid() {
        let mapped = Mapper::new(options(Some("acme"), Layout::Split)).map(&shapes());
        let pkg = &mapped.package;
        assert_eq!(pkg.uid.as_deref(), Some("acme.shapes"));
        assert_eq!(pkg.funcs.len(), 2);
        for f in &pkg.funcs {
            assert_eq!(f.uid, format!("acme.shapes.{}", f.name));
        }
    }

    #[test]
    fn method_uids_follow_type_uid() {
        let mapped = Mapper::new(options(None, Layout::Split)).map(&shapes());
        let square = &mapped.types[0];
        assert_eq!(square.uid, "shapes.Square");
        assert_eq!(square.methods.len(), 2);
        for m in &square.methods {
            assert_eq!(m.uid, format!("shapes.Square.{}", m.name));
        }
        // constructors are package-level functions
        assert_eq!(square.funcs[0].uid, "shapes.NewSquare");
    }

    #[test]
    fn split_layout_references_types() {
        let mapped = Mapper::new(options(None, Layout::Split)).map(&shapes());
        assert_eq!(mapped.types.len(), 1);
        assert!(matches!(&mapped.package.types[0], TypeEntry::Uid(uid) if uid == "shapes.Square"));
    }

    #[test]
    fn nested_layout_embeds_types() {
        let mapped = Mapper::new(options(None, Layout::Nested)).map(&shapes());
        assert!(mapped.types.is_empty());
        match &mapped.package.types[0] {
            TypeEntry::Inline(ty) => assert_eq!(ty.methods.len(), 2),
            other => panic!("expected inline type, got {:?}", other),
        }
    }

    #[test]
    fn const_group_maps_to_one_value() {
        let mapped = Mapper::new(options(None, Layout::Split)).map(&shapes());
        let consts = &mapped.package.consts;
        assert_eq!(consts.len(), 1);
        assert_eq!(consts[0].names, vec!["A", "B"]);
        assert_eq!(consts[0].code, "const (\n\tA = 1\n\tB = 2\n)");
        assert_eq!(consts[0].summary, "Limits.");
        assert_eq!(consts[0].source.file, "shapes.go");
        assert_eq!(consts[0].source.line, 3);
    }

    #[test]
    fn source_positions_carry_configuration() {
        let mapped = Mapper::new(options(None, Layout::Split)).map(&shapes());
        let area = &mapped.types[0].methods[0];
        assert_eq!(area.source.repo.as_deref(), Some("github.com/acme/shapes"));
        assert_eq!(area.source.branch.as_deref(), Some("main"));
        assert_eq!(area.source.line, 12);
        assert_eq!(area.code, "func (s *Square) Area() int");
    }

    #[test]
    fn summary_and_description() {
        let mapped = Mapper::new(options(None, Layout::Split)).map(&shapes());
        let pkg = &mapped.package;
        assert_eq!(pkg.summary.as_deref(), Some("Package shapes draws."));
        assert_eq!(pkg.description.as_deref(), Some("Package shapes draws. It is small.\n"));
        let square = &mapped.types[0];
        assert_eq!(square.summary, "Square is a shape.");
        assert_eq!(square.description, "Square is a shape. It has four sides.\n");
    }

    #[test]
    fn missing_package_yields_minimal_document() {
        let mut info = PageInfo {
            dirname: "/src/empty".to_string(),
            dirs: Some(vec![DirEntry {
                name: "sub".to_string(),
                path: "sub".to_string(),
                synopsis: "Package sub helps.".to_string(),
                has_pkg: true,
            }]),
            ..Default::default()
        };
        info.notes.insert(
            "BUG".to_string(),
            vec![Note {
                uid: "ann".to_string(),
                body: "Broken.\n".to_string(),
            }],
        );
        let mapped = Mapper::new(options(Some("acme"), Layout::Split)).map(&info);
        let pkg = &mapped.package;
        assert!(pkg.uid.is_none());
        assert!(pkg.summary.is_none());
        assert!(pkg.consts.is_empty() && pkg.vars.is_empty());
        assert!(pkg.funcs.is_empty() && pkg.types.is_empty());
        assert_eq!(pkg.dir, "/src/empty");
        assert_eq!(pkg.dirs.len(), 1);
        assert_eq!(pkg.dirs[0].name, "sub");
        assert_eq!(pkg.notes["BUG"][0].description, "Broken.\n");
        assert!(mapped.types.is_empty());
    }
}
