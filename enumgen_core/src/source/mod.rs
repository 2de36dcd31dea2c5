//! Go source parser for enumgen.
//!
//! This module reads Go source files and extracts the declarations enum
//! generation cares about: the package clause, named type declarations and
//! constant declarations. Function bodies, imports and variables are skipped.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use enumgen_core::source::parse_go_file;
//!
//! let file = parse_go_file(Path::new("day.go")).unwrap();
//! println!("package {} declares {} const blocks", file.package, file.consts.len());
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{ConstDecl, ConstSpec, SourceFile, TypeDecl};
pub use lexer::LexError;
pub use parser::ParseError;

use crate::error::{EnumgenError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Error type for Go parsing operations.
#[derive(Debug)]
pub enum GoSourceError {
    /// IO error reading the file.
    Io(std::io::Error),
    /// Lexer error.
    Lex(LexError),
    /// Parser error.
    Parse(ParseError),
}

impl std::fmt::Display for GoSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoSourceError::Io(e) => write!(f, "IO error: {}", e),
            GoSourceError::Lex(e) => write!(f, "Lexer error: {}", e),
            GoSourceError::Parse(e) => write!(f, "Parser error: {}", e),
        }
    }
}

impl std::error::Error for GoSourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GoSourceError::Io(e) => Some(e),
            GoSourceError::Lex(e) => Some(e),
            GoSourceError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for GoSourceError {
    fn from(e: std::io::Error) -> Self {
        GoSourceError::Io(e)
    }
}

impl From<LexError> for GoSourceError {
    fn from(e: LexError) -> Self {
        GoSourceError::Lex(e)
    }
}

impl From<ParseError> for GoSourceError {
    fn from(e: ParseError) -> Self {
        GoSourceError::Parse(e)
    }
}

/// Parse Go source code.
pub fn parse_go_source(source: &str) -> std::result::Result<SourceFile, GoSourceError> {
    parser::parse(source)
}

/// Parse a single Go source file.
pub fn parse_go_file(path: &Path) -> std::result::Result<SourceFile, GoSourceError> {
    let source = std::fs::read_to_string(path)?;
    parse_go_source(&source)
}

/// Parse the files of one Go package, in the given order.
///
/// Every file must declare the same package.
pub fn parse_go_files(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let mut files: Vec<SourceFile> = Vec::with_capacity(paths.len());

    for path in paths {
        let file = parse_go_file(path).map_err(|e| EnumgenError::source_file(path, e))?;
        debug!(
            path = %path.display(),
            package = %file.package,
            types = file.types.len(),
            const_blocks = file.consts.len(),
            "Parsed Go file"
        );

        if let Some(first) = files.first() {
            if first.package != file.package {
                return Err(EnumgenError::PackageMismatch {
                    first: first.package.clone(),
                    second: file.package,
                });
            }
        }
        files.push(file);
    }

    Ok(files)
}
