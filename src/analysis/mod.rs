//! Builds the doc model for a located package.
//!
//! [`DocSource`] is the seam between the mapper and source analysis; the
//! production implementation, [`GoAnalyzer`], parses Go files with
//! tree-sitter and reads their declarations.

pub mod comment;
pub mod dirs;
pub mod examples;
pub mod fileset;
pub mod reader;
pub mod source;

use crate::locate::Location;
use crate::model::{Note, PageInfo};
use anyhow::{Context, Result};
use fileset::FileSet;
use regex::Regex;
use source::SourceFile;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Produces the doc model for a located package.
pub trait DocSource {
    fn page_info(&self, location: &Location) -> Result<PageInfo>;
}

/// Go source analysis backed by tree-sitter.
pub struct GoAnalyzer {
    /// Note markers to keep (e.g. `BUG`).
    notes: Regex,
}

impl GoAnalyzer {
    pub fn new(notes: &str) -> Result<Self> {
        let notes = Regex::new(&format!("^(?:{})$", notes))
            .with_context(|| format!("invalid notes pattern: {}", notes))?;
        Ok(GoAnalyzer { notes })
    }
}

impl DocSource for GoAnalyzer {
    fn page_info(&self, location: &Location) -> Result<PageInfo> {
        let dir = &location.dir;
        let mut info = PageInfo {
            dirname: dir.to_string_lossy().to_string(),
            ..Default::default()
        };
        if !dir.is_dir() {
            warn!("no package directory at {}", dir.display());
            return Ok(info);
        }

        let mut parser = source::new_parser()?;
        let mut fset = FileSet::default();
        let mut files = Vec::new();
        for path in go_files(dir) {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let src = match fs::read_to_string(&path) {
                Ok(s) => s,
                Err(err) => {
                    warn!("skipping {}: {}", path.display(), err);
                    continue;
                }
            };
            match SourceFile::parse(&mut parser, &mut fset, &name, src) {
                Ok(file) => files.push(file),
                Err(err) => warn!("skipping {}: {:#}", path.display(), err),
            }
        }

        info.examples = examples::read_examples(&files);

        // The package is whatever the first non-test file declares.
        let package = files
            .iter()
            .filter(|f| !f.is_test())
            .find_map(|f| f.package_name());
        if let Some(package) = package {
            let (members, foreign): (Vec<SourceFile>, Vec<SourceFile>) = files
                .into_iter()
                .filter(|f| !f.is_test())
                .partition(|f| f.package_name().as_deref() == Some(package.as_str()));
            for file in &foreign {
                warn!(
                    "skipping {}: package {} differs from {}",
                    file.name,
                    file.package_name().unwrap_or_default(),
                    package
                );
            }

            info.notes = self.read_notes(&members);
            info.is_main = package == "main";
            let pdoc = reader::read_package(&package, &location.logical, &members);
            debug!(
                package = %pdoc.name,
                consts = pdoc.consts.len(),
                vars = pdoc.vars.len(),
                funcs = pdoc.funcs.len(),
                types = pdoc.types.len(),
                "read package"
            );
            info.pdoc = Some(pdoc);
        }

        info.dirs = Some(dirs::list_dirs(&mut parser, dir));
        info.fset = fset;
        Ok(info)
    }
}

impl GoAnalyzer {
    fn read_notes(&self, files: &[SourceFile]) -> BTreeMap<String, Vec<Note>> {
        let mut notes: BTreeMap<String, Vec<Note>> = BTreeMap::new();
        for file in files {
            for group in file.comments.groups() {
                for (marker, note) in comment::group_notes(&file.src, group) {
                    if self.notes.is_match(&marker) {
                        notes.entry(marker).or_default().push(note);
                    }
                }
            }
        }
        notes
    }
}

/// `.go` files directly inside `dir`, sorted by name. Names starting with
/// `.` or `_` are ignored.
pub fn go_files(dir: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/*.go", glob::Pattern::escape(&dir.to_string_lossy()));
    let Ok(paths) = glob::glob(&pattern) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = paths
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy())
                .is_some_and(|n| !n.starts_with('.') && !n.starts_with('_'))
        })
        .collect();
    files.sort();
    files
}
