//! goyaml: generate YAML API documents from a Go package.
//!
//! One run documents one package:
//!
//! ```text
//! goyaml github.com/acme/shapes out/ acme github.com/acme/shapes main
//! ```
//!
//! writes `out/shapes.yml` plus one `out/shapes/<Type>.yml` per exported type.

mod analysis;
mod locate;
mod mapper;
mod model;
mod printer;
mod schema;
mod text;
mod writer;

use analysis::{DocSource, GoAnalyzer};
use anyhow::{Context, Result};
use clap::Parser;
use locate::{Location, LocatorConfig};
use mapper::{Layout, Mapper, MapperOptions};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use writer::WriterOptions;

#[derive(Parser)]
#[command(
    name = "goyaml",
    about = "Generate YAML API documentation from a Go package"
)]
struct Cli {
    /// Package to document: import path, absolute path, or ./relative path
    package: String,

    /// Output directory
    output: PathBuf,

    /// Namespace prefix for generated UIDs
    prefix: Option<String>,

    /// Repository recorded in source positions
    repo: Option<String>,

    /// Branch recorded in source positions
    branch: Option<String>,

    /// Output layout: one nested file, or a package file plus one file per type
    #[arg(long, value_enum, default_value_t = Layout::Split)]
    layout: Layout,

    /// Subdirectory under OUTPUT to write into
    #[arg(long)]
    subdir: Option<PathBuf>,

    /// Extra source tree for import paths not found under GOROOT or GOPATH.
    /// Can be specified multiple times.
    #[arg(long = "source-root")]
    source_roots: Vec<PathBuf>,

    /// Go installation root
    #[arg(long, env = "GOROOT", default_value = "/usr/local/go")]
    goroot: PathBuf,

    /// Go workspace list, separated like PATH
    #[arg(long, env = "GOPATH")]
    gopath: Option<String>,

    /// Note markers to keep (regular expression)
    #[arg(long, default_value = "BUG")]
    notes: String,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn locator_config(&self) -> LocatorConfig {
        let gopath = self
            .gopath
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| std::env::split_paths(p).collect())
            .unwrap_or_default();
        LocatorConfig {
            goroot: self.goroot.clone(),
            gopath,
            source_roots: self.source_roots.clone(),
        }
    }

    fn mapper_options(&self) -> MapperOptions {
        MapperOptions {
            uid_prefix: non_empty(&self.prefix),
            repo: non_empty(&self.repo),
            branch: non_empty(&self.branch),
            layout: self.layout,
        }
    }

    fn writer_options(&self) -> WriterOptions {
        WriterOptions {
            out_dir: self.output.clone(),
            subdir: self.subdir.clone(),
            layout: self.layout,
        }
    }
}

/// Empty strings count as unset.
fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(&cli)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to read working directory")?;
    let location = locate::locate(&cli.package, &cwd, &cli.locator_config());
    info!(dir = %location.dir.display(), logical = %location.logical, "located package");

    let analyzer = GoAnalyzer::new(&cli.notes)?;
    let page = analyzer
        .page_info(&location)
        .with_context(|| format!("failed to analyze {}", location.logical))?;

    let mapped = Mapper::new(cli.mapper_options()).map(&page);
    let stem = output_stem(page.pdoc.as_ref().map(|p| p.name.as_str()), &location);
    let report = writer::write(&mapped, &stem, &cli.writer_options())?;
    info!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        "done"
    );
    Ok(())
}

/// Output file name: the package name, else the last path segment.
fn output_stem(package: Option<&str>, location: &Location) -> String {
    if let Some(name) = package {
        return name.to_string();
    }
    location
        .logical
        .rsplit(['/', '\\'])
        .find(|s| !s.is_empty())
        .unwrap_or("package")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(logical: &str) -> Location {
        Location {
            dir: PathBuf::from(logical),
            logical: logical.to_string(),
        }
    }

    #[test]
    fn stem_prefers_package_name() {
        assert_eq!(output_stem(Some("shapes"), &location("example.com/x")), "shapes");
    }

    #[test]
    fn stem_from_logical_path() {
        assert_eq!(output_stem(None, &location("/src/empty/")), "empty");
        assert_eq!(output_stem(None, &location("/")), "package");
    }

    #[test]
    fn empty_strings_are_unset() {
        let cli = Cli::parse_from(["goyaml", "fmt", "out", "", "github.com/golang/go", ""]);
        let options = cli.mapper_options();
        assert_eq!(options.uid_prefix, None);
        assert_eq!(options.repo.as_deref(), Some("github.com/golang/go"));
        assert_eq!(options.branch, None);
        assert_eq!(options.layout, Layout::Split);
    }

    #[test]
    fn layout_flag() {
        let cli = Cli::parse_from(["goyaml", "fmt", "out", "--layout", "nested"]);
        assert_eq!(cli.writer_options().layout, Layout::Nested);
    }

    #[test]
    fn missing_output_is_rejected() {
        assert!(Cli::try_parse_from(["goyaml", "fmt"]).is_err());
    }
}
