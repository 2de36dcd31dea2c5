//! Declaration-level Go syntax tree.
//!
//! Only what enum generation needs is kept: the package clause, named type
//! declarations and constant declarations. Everything else in a file is
//! skipped by the parser.

use crate::enumerate::expr::Expr;

/// A parsed Go source file.
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    pub package: String,
    pub types: Vec<TypeDecl>,
    pub consts: Vec<ConstDecl>,
}

impl SourceFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn type_decl(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }
}

/// `type Name Underlying` or `type Name = Other`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    /// The underlying type when it is a plain (possibly qualified) type name.
    /// `None` for composite types such as structs, slices or funcs.
    pub underlying: Option<String>,
    pub alias: bool,
    pub line: usize,
}

/// A `const` declaration: either a parenthesized group or a single spec.
///
/// Each declaration is its own `iota` scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub specs: Vec<ConstSpec>,
    pub line: usize,
}

/// One line of a const declaration: `A, B Type = x, y`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstSpec {
    pub names: Vec<String>,
    pub type_name: Option<String>,
    pub values: Vec<Expr>,
    pub line: usize,
}
