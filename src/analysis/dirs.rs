//! Subdirectory listing with a one-line synopsis for each package found.

use super::source::SourceFile;
use super::go_files;
use crate::model::DirEntry;
use crate::text;
use std::path::Path;
use tracing::warn;
use tree_sitter::Parser;
use walkdir::{DirEntry as WalkEntry, WalkDir};

/// Directories below `root` (excluding `root` itself) that hold or lead to
/// a package, sorted by path.
pub fn list_dirs(parser: &mut Parser, root: &Path) -> Vec<DirEntry> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e));

    let mut dirs = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("skipping directory entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let path = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let files: Vec<_> = go_files(entry.path())
            .into_iter()
            .filter(|p| !p.to_string_lossy().ends_with("_test.go"))
            .collect();
        dirs.push(DirEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            path,
            synopsis: text::synopsis(&package_doc(parser, &files)),
            has_pkg: !files.is_empty(),
        });
    }

    // Keep directories that hold a package or lead to one.
    let packages: Vec<String> = dirs
        .iter()
        .filter(|d| d.has_pkg)
        .map(|d| format!("{}/", d.path))
        .collect();
    dirs.retain(|d| {
        let prefix = format!("{}/", d.path);
        d.has_pkg || packages.iter().any(|p| p.starts_with(&prefix))
    });
    dirs
}

fn is_ignored(entry: &WalkEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.depth() > 0
        && entry.file_type().is_dir()
        && (name.starts_with('.') || name.starts_with('_') || name == "testdata")
}

/// Package doc of the first package declared among `files`.
fn package_doc(parser: &mut Parser, files: &[std::path::PathBuf]) -> String {
    let mut package: Option<String> = None;
    let mut doc = String::new();
    for path in files {
        let file = match SourceFile::read(parser, path) {
            Ok(f) => f,
            Err(err) => {
                warn!("skipping {}: {:#}", path.display(), err);
                continue;
            }
        };
        let name = file.package_name();
        if package.is_none() {
            package = name.clone();
        }
        if name != package {
            continue;
        }
        if let Some(text) = file.package_doc() {
            if !doc.is_empty() {
                doc.push('\n');
            }
            doc.push_str(&text);
        }
    }
    doc
}
