//! Discovery of the Go source files that make up a package.

use enumgen_core::error::{EnumgenError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Finds `.go` files among files and package directories.
#[derive(Debug, Clone, Default)]
pub struct PackageScanner {
    include_tests: bool,
}

impl PackageScanner {
    pub fn new(include_tests: bool) -> Self {
        Self { include_tests }
    }

    /// Resolve `paths` to a sorted list of Go source files.
    ///
    /// Directories are scanned non-recursively; files are taken as given.
    /// No paths means the current directory.
    pub fn scan(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let default = [PathBuf::from(".")];
        let paths = if paths.is_empty() { &default[..] } else { paths };

        let mut files = Vec::new();
        for path in paths {
            if path.is_dir() {
                self.scan_dir(path, &mut files);
            } else {
                // surface a missing path as an IO error
                std::fs::metadata(path)?;
                files.push(path.clone());
            }
        }

        files.sort();
        files.dedup();

        if files.is_empty() {
            return Err(EnumgenError::NoSourceFiles {
                searched: paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        debug!("Found {} Go file(s)", files.len());
        Ok(files)
    }

    fn scan_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            if self.is_go_source(path) {
                trace!("Including {:?}", path);
                files.push(path.to_path_buf());
            }
        }
    }

    fn is_go_source(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name.ends_with(".go") && (self.include_tests || !name.ends_with("_test.go"))
    }
}

/// Directory generated files go to by default: the directory of the first
/// source file.
pub fn package_dir(files: &[PathBuf]) -> PathBuf {
    files
        .first()
        .and_then(|f| f.parent())
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
