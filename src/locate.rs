//! Source locator: turns the user's package argument into a directory to
//! scan plus the logical path used to label the output.
//!
//! Resolution order:
//!
//! 1. absolute filesystem path, used as-is;
//! 2. local path (`.`, `..`, `./x`, `../x`), joined onto the working directory;
//! 3. import path found under `$GOROOT/src` or a `$GOPATH/src` entry;
//! 4. fallback: the import path joined onto the configured source roots, then
//!    onto `$GOROOT/src` even if that directory does not exist.

use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Where to look for packages that are not given as filesystem paths.
#[derive(Debug, Clone, Default)]
pub struct LocatorConfig {
    pub goroot: PathBuf,
    pub gopath: Vec<PathBuf>,
    /// Extra source trees searched by the fallback rule.
    pub source_roots: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Directory holding the package sources.
    pub dir: PathBuf,
    /// Import path, or the cleaned directory path for filesystem arguments.
    pub logical: String,
}

pub fn locate(path: &str, cwd: &Path, config: &LocatorConfig) -> Location {
    if Path::new(path).is_absolute() {
        let dir = clean(Path::new(path));
        return filesystem(dir);
    }

    if is_local_import(path) {
        return filesystem(clean(&cwd.join(path)));
    }

    let import_path = path.trim_end_matches('/');
    let goroot_src = config.goroot.join("src");
    let import_roots = std::iter::once(goroot_src.clone())
        .chain(config.gopath.iter().map(|p| p.join("src")));
    for root in import_roots {
        let dir = root.join(import_path);
        if dir.is_dir() {
            debug!(import_path, dir = %dir.display(), "resolved import path");
            return Location {
                dir,
                logical: import_path.to_string(),
            };
        }
    }

    let dir = config
        .source_roots
        .iter()
        .map(|root| root.join(import_path))
        .find(|dir| dir.is_dir())
        .unwrap_or_else(|| goroot_src.join(import_path));
    debug!(import_path, dir = %dir.display(), "fallback location");
    Location {
        dir,
        logical: import_path.to_string(),
    }
}

fn filesystem(dir: PathBuf) -> Location {
    let logical = dir.to_string_lossy().to_string();
    Location { dir, logical }
}

fn is_local_import(path: &str) -> bool {
    path == "." || path == ".." || path.starts_with("./") || path.starts_with("../")
}

/// Lexically resolve `.` and `..` components.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}
