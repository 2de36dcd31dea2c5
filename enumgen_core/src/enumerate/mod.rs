//! Constant enumeration: collect, resolve, emit.
//!
//! The three stages run strictly in sequence over a fixed snapshot of parsed
//! declarations:
//!
//! 1. [`collect`] gathers the const blocks relevant to a type,
//! 2. [`resolve`] computes every constant's value and drops duplicates,
//! 3. [`emit`] renders the `Enum()` accessor.
//!
//! # Example
//!
//! ```
//! use enumgen_core::enumerate::{collect, emit, resolve};
//! use enumgen_core::source::parse_go_source;
//!
//! let file = parse_go_source(
//!     "package p\ntype Level uint8\nconst (\n\tLow Level = iota + 1\n\tHigh\n)\n",
//! )
//! .unwrap();
//! let collected = collect(&[file], "Level").unwrap();
//! let result = resolve(&collected).unwrap();
//! assert_eq!(result.values().collect::<Vec<_>>(), vec![1, 2]);
//! assert!(emit(&result, "Level").unwrap().contains("\t\tHigh,\n"));
//! ```

pub mod collector;
pub mod emitter;
pub mod expr;
pub mod resolver;

pub use collector::collect;
pub use emitter::{FileHeader, emit, render_file};
pub use expr::{BinaryOp, ConstValue, Expr, UnaryOp};
pub use resolver::resolve;

use crate::error::Result;
use crate::source::SourceFile;
use serde::Serialize;
use std::collections::HashMap;

/// Identifier Go reserves for discarded values.
pub const BLANK_IDENTIFIER: &str = "_";

/// One named constant as declared.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantEntry {
    pub identifier: String,
    /// Declared or inferred type; `None` for untyped constants.
    pub type_name: Option<String>,
    pub initializer: Option<Expr>,
    /// Whether the constant belongs to the type being enumerated.
    pub member: bool,
    /// Declaration order across every block of the collection.
    pub position_index: usize,
    pub line: usize,
}

impl ConstantEntry {
    pub fn has_explicit_initializer(&self) -> bool {
        self.initializer.is_some()
    }

    pub fn is_blank(&self) -> bool {
        self.identifier == BLANK_IDENTIFIER
    }
}

/// A `const` declaration; the scope of one auto-increment counter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstantDeclarationBlock {
    pub entries: Vec<ConstantEntry>,
    pub line: usize,
}

/// Signedness and width of an integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "signedness", rename_all = "lowercase")]
pub enum IntegerKind {
    Signed { bits: u32 },
    Unsigned { bits: u32 },
}

impl Default for IntegerKind {
    fn default() -> Self {
        IntegerKind::Signed { bits: 64 }
    }
}

impl IntegerKind {
    /// The kind of a predeclared Go integer type.
    pub fn from_builtin(name: &str) -> Option<Self> {
        let kind = match name {
            "int" | "int64" => IntegerKind::Signed { bits: 64 },
            "int32" | "rune" => IntegerKind::Signed { bits: 32 },
            "int16" => IntegerKind::Signed { bits: 16 },
            "int8" => IntegerKind::Signed { bits: 8 },
            "uint" | "uint64" | "uintptr" => IntegerKind::Unsigned { bits: 64 },
            "uint32" => IntegerKind::Unsigned { bits: 32 },
            "uint16" => IntegerKind::Unsigned { bits: 16 },
            "uint8" | "byte" => IntegerKind::Unsigned { bits: 8 },
            _ => return None,
        };
        Some(kind)
    }

    pub fn min(self) -> ConstValue {
        match self {
            IntegerKind::Signed { bits } => -(1 << (bits - 1)),
            IntegerKind::Unsigned { .. } => 0,
        }
    }

    pub fn max(self) -> ConstValue {
        match self {
            IntegerKind::Signed { bits } => (1 << (bits - 1)) - 1,
            IntegerKind::Unsigned { bits } => (1 << bits) - 1,
        }
    }

    pub fn contains(self, value: ConstValue) -> bool {
        (self.min()..=self.max()).contains(&value)
    }
}

/// Output of the collector for one type.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedType {
    pub type_name: String,
    pub kind: IntegerKind,
    pub blocks: Vec<ConstantDeclarationBlock>,
    /// Integer kinds of the package's own named types and aliases.
    pub type_kinds: HashMap<String, IntegerKind>,
}

impl CollectedType {
    /// The integer kind a type name stands for, local or predeclared.
    pub fn kind_of(&self, type_name: &str) -> Option<IntegerKind> {
        self.type_kinds
            .get(type_name)
            .copied()
            .or_else(|| IntegerKind::from_builtin(type_name))
    }

    pub fn member_count(&self) -> usize {
        self.members().count()
    }

    pub fn members(&self) -> impl Iterator<Item = &ConstantEntry> {
        self.blocks
            .iter()
            .flat_map(|b| b.entries.iter())
            .filter(|e| e.member)
    }

    pub fn is_empty(&self) -> bool {
        self.member_count() == 0
    }
}

/// A constant with its computed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConstant {
    pub identifier: String,
    pub value: ConstValue,
    pub position_index: usize,
}

/// A member dropped because an earlier member already has its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuppressedConstant {
    pub constant: ResolvedConstant,
    pub duplicate_of: String,
}

/// Distinct values of a type, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EnumerationResult {
    pub constants: Vec<ResolvedConstant>,
    pub suppressed: Vec<SuppressedConstant>,
}

impl EnumerationResult {
    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.constants.iter().map(|c| c.identifier.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = ConstValue> + '_ {
        self.constants.iter().map(|c| c.value)
    }
}

/// Collect and resolve `type_name` in one step.
pub fn enumerate(files: &[SourceFile], type_name: &str) -> Result<EnumerationResult> {
    let collected = collect(files, type_name)?;
    resolve(&collected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_kind_ranges() {
        let u8_kind = IntegerKind::from_builtin("byte").unwrap();
        assert_eq!(u8_kind, IntegerKind::Unsigned { bits: 8 });
        assert_eq!((u8_kind.min(), u8_kind.max()), (0, 255));
        assert!(!u8_kind.contains(-1));
        assert!(!u8_kind.contains(256));

        let i8_kind = IntegerKind::from_builtin("int8").unwrap();
        assert_eq!((i8_kind.min(), i8_kind.max()), (-128, 127));

        let u64_kind = IntegerKind::from_builtin("uint").unwrap();
        assert_eq!(u64_kind.max(), u64::MAX as ConstValue);

        let i64_kind = IntegerKind::from_builtin("int").unwrap();
        assert_eq!(i64_kind.min(), i64::MIN as ConstValue);

        assert_eq!(IntegerKind::from_builtin("string"), None);
        assert_eq!(IntegerKind::from_builtin("float64"), None);
    }

    #[test]
    fn test_enumerate_pipeline() {
        let file = crate::source::parse_go_source(
            "package p\ntype Color int\nconst (\n\tRed Color = iota\n\tGreen\n\tBlue\n\tCrimson = Red\n)\n",
        )
        .unwrap();

        let result = enumerate(&[file], "Color").unwrap();
        assert_eq!(
            result.identifiers().collect::<Vec<_>>(),
            vec!["Red", "Green", "Blue"]
        );
        assert_eq!(result.suppressed.len(), 1);
        assert_eq!(result.suppressed[0].duplicate_of, "Red");
    }
}
