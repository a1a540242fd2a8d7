//! Document writer: serializes mapped documents as YAML files.
//!
//! The package document lands at `OUTPUT[/SUBDIR]/<stem>.yml`. In the split
//! layout every type gets its own `OUTPUT[/SUBDIR]/<stem>/<Type>.yml`.

use crate::mapper::{Layout, Mapped};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// First line of every emitted file.
pub const HEADER: &str = "#YamlMIME: GoLangPkg\n";

pub const EXTENSION: &str = "yml";

#[derive(Debug, Clone)]
pub struct WriterOptions {
    pub out_dir: PathBuf,
    /// Prefix subdirectory under `out_dir`.
    pub subdir: Option<PathBuf>,
    pub layout: Layout,
}

impl WriterOptions {
    fn root(&self) -> PathBuf {
        match &self.subdir {
            Some(subdir) => self.out_dir.join(subdir),
            None => self.out_dir.clone(),
        }
    }
}

/// Files written and files skipped after a write failure.
#[derive(Debug, Default)]
pub struct Report {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

pub fn write(mapped: &Mapped, stem: &str, options: &WriterOptions) -> Result<Report> {
    let mut report = Report::default();
    let root = options.root();
    fs::create_dir_all(&root)
        .with_context(|| format!("failed to create output directory: {}", root.display()))?;

    let path = root.join(format!("{}.{}", stem, EXTENSION));
    let body = serialize(&mapped.package).context("failed to serialize package document")?;
    fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {}", path.display());
    report.written.push(path);

    if options.layout == Layout::Nested || mapped.types.is_empty() {
        return Ok(report);
    }

    let type_dir = root.join(stem);
    for ty in &mapped.types {
        let path = type_dir.join(format!("{}.{}", ty.name, EXTENSION));
        let body = serialize(ty).with_context(|| format!("failed to serialize type {}", ty.uid))?;
        match write_file(&path, &body) {
            Ok(()) => {
                info!("wrote {}", path.display());
                report.written.push(path);
            }
            Err(err) => {
                warn!("skipping {}: {:#}", path.display(), err);
                report.skipped.push(path);
            }
        }
    }
    Ok(report)
}

fn serialize<T: Serialize>(doc: &T) -> Result<String> {
    let yaml = serde_yaml::to_string(doc)?;
    Ok(format!("{}{}", HEADER, yaml))
}

fn write_file(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}
