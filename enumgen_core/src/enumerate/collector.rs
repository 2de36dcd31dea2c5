//! Declaration collector.
//!
//! Turns parsed const declarations into [`ConstantDeclarationBlock`]s, assigns
//! every entry its Go type and marks the entries that belong to the requested
//! type. Blocks without members are kept too: members may reference them.

use super::{
    BinaryOp, CollectedType, ConstantDeclarationBlock, ConstantEntry, Expr, IntegerKind, UnaryOp,
};
use crate::error::{EnumgenError, Result};
use crate::source::{ConstDecl, SourceFile, TypeDecl};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Predeclared types that can never back an enumeration.
const NON_INTEGER_TYPES: &[&str] = &[
    "string",
    "bool",
    "float32",
    "float64",
    "complex64",
    "complex128",
];

/// Collect the const blocks relevant to `type_name`.
pub fn collect(files: &[SourceFile], type_name: &str) -> Result<CollectedType> {
    let types = TypeTable::new(files);
    let kind = types.integer_kind(type_name)?;
    let target = types.canonical(type_name);

    let mut drafts: Vec<DraftBlock> = files
        .iter()
        .flat_map(|file| file.consts.iter())
        .map(DraftBlock::new)
        .collect();

    infer_types(&mut drafts);

    let mut blocks = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let DraftBlock {
            mut block,
            multi_name,
            ..
        } = draft;

        for entry in &mut block.entries {
            entry.member = entry
                .type_name
                .as_deref()
                .is_some_and(|t| types.canonical(t) == target);
        }

        if multi_name {
            if let Some(member) = block.entries.iter().find(|e| e.member) {
                return Err(EnumgenError::unsupported(
                    type_name,
                    format!(
                        "const block at line {} declares several names in one spec (including {})",
                        block.line, member.identifier
                    ),
                ));
            }
            debug!(line = block.line, "Skipping const block with multi-name specs");
            continue;
        }

        blocks.push(block);
    }

    let mut position_index = 0;
    for block in &mut blocks {
        for entry in &mut block.entries {
            entry.position_index = position_index;
            position_index += 1;
        }
        debug!(
            type_name,
            line = block.line,
            entries = block.entries.len(),
            members = block.entries.iter().filter(|e| e.member).count(),
            "Collected const block"
        );
    }

    let mut type_kinds = types.local_kinds();
    for name in types.decls.keys() {
        if types.canonical(name) == target {
            type_kinds.insert(name.to_string(), kind);
        }
    }
    type_kinds.insert(type_name.to_string(), kind);

    let collected = CollectedType {
        type_name: type_name.to_string(),
        kind,
        blocks,
        type_kinds,
    };
    if collected.is_empty() {
        warn!(type_name, "No constants declared for type");
    }

    Ok(collected)
}

/// Type declarations of the package, by name. The first declaration wins.
struct TypeTable<'a> {
    decls: HashMap<&'a str, &'a TypeDecl>,
}

impl<'a> TypeTable<'a> {
    fn new(files: &'a [SourceFile]) -> Self {
        let mut decls = HashMap::new();
        for decl in files.iter().flat_map(|f| f.types.iter()) {
            decls.entry(decl.name.as_str()).or_insert(decl);
        }
        Self { decls }
    }

    /// Resolve alias declarations (`type A = B`) to the aliased name.
    fn canonical(&self, name: &str) -> String {
        let mut current = name;
        let mut seen = HashSet::new();
        while let Some(decl) = self.decls.get(current) {
            match (&decl.underlying, decl.alias) {
                (Some(underlying), true) if seen.insert(current) => current = underlying.as_str(),
                _ => break,
            }
        }
        current.to_string()
    }

    /// Kinds of the declared types whose chain ends in a predeclared
    /// integer type. Other declarations are left out.
    fn local_kinds(&self) -> HashMap<String, IntegerKind> {
        self.decls
            .keys()
            .filter_map(|name| Some((name.to_string(), self.builtin_kind(name)?)))
            .collect()
    }

    fn builtin_kind(&self, type_name: &str) -> Option<IntegerKind> {
        let mut current = type_name;
        let mut seen = HashSet::new();
        loop {
            if let Some(kind) = IntegerKind::from_builtin(current) {
                return Some(kind);
            }
            if !seen.insert(current) {
                return None;
            }
            current = self.decls.get(current)?.underlying.as_deref()?;
        }
    }

    /// Follow the underlying-type chain down to a predeclared integer type.
    fn integer_kind(&self, type_name: &str) -> Result<IntegerKind> {
        let mut current = type_name;
        let mut seen = HashSet::new();

        loop {
            if let Some(kind) = IntegerKind::from_builtin(current) {
                return Ok(kind);
            }
            if NON_INTEGER_TYPES.contains(&current) {
                return Err(EnumgenError::unsupported(
                    type_name,
                    format!("underlying type {} is not an integer type", current),
                ));
            }
            if !seen.insert(current) {
                return Err(EnumgenError::unsupported(
                    type_name,
                    format!("type declaration cycle through {}", current),
                ));
            }

            match self.decls.get(current) {
                Some(decl) => match &decl.underlying {
                    Some(underlying) => current = underlying.as_str(),
                    None => {
                        return Err(EnumgenError::unsupported(
                            type_name,
                            format!("{} is not declared as a named integer type", current),
                        ));
                    }
                },
                None => {
                    warn!(
                        type_name,
                        underlying = current,
                        "Type is not declared in the package, assuming int64"
                    );
                    return Ok(IntegerKind::default());
                }
            }
        }
    }
}

/// A block under construction, with what type inference needs to know.
struct DraftBlock {
    block: ConstantDeclarationBlock,
    /// Entries with neither type nor initializer repeat the previous type.
    inherits: Vec<bool>,
    multi_name: bool,
}

impl DraftBlock {
    fn new(decl: &ConstDecl) -> Self {
        let mut entries = Vec::new();
        let mut inherits = Vec::new();
        let mut multi_name = false;

        for spec in &decl.specs {
            multi_name |= spec.names.len() > 1;
            let paired = spec.values.len() == spec.names.len();

            for (i, name) in spec.names.iter().enumerate() {
                let initializer = if paired {
                    spec.values.get(i).cloned()
                } else {
                    None
                };
                inherits.push(spec.type_name.is_none() && spec.values.is_empty());
                entries.push(ConstantEntry {
                    identifier: name.clone(),
                    type_name: spec.type_name.clone(),
                    initializer,
                    member: false,
                    position_index: 0,
                    line: spec.line,
                });
            }
        }

        Self {
            block: ConstantDeclarationBlock {
                entries,
                line: decl.line,
            },
            inherits,
            multi_name,
        }
    }
}

/// Assign types to untyped entries until nothing changes.
///
/// Every pass only turns `None` into `Some`, so the loop terminates.
fn infer_types(drafts: &mut [DraftBlock]) {
    loop {
        let known: HashMap<String, String> = drafts
            .iter()
            .flat_map(|d| d.block.entries.iter())
            .filter(|e| !e.is_blank())
            .filter_map(|e| e.type_name.clone().map(|t| (e.identifier.clone(), t)))
            .collect();

        let mut changed = false;
        for draft in drafts.iter_mut() {
            let mut previous: Option<String> = None;
            for (entry, inherits) in draft.block.entries.iter_mut().zip(&draft.inherits) {
                if entry.type_name.is_none() {
                    let inferred = if *inherits {
                        previous.clone()
                    } else {
                        entry
                            .initializer
                            .as_ref()
                            .and_then(|expr| infer_type(expr, &known))
                    };
                    if inferred.is_some() {
                        entry.type_name = inferred;
                        changed = true;
                    }
                }
                previous = entry.type_name.clone();
            }
        }

        if !changed {
            break;
        }
    }
}

/// Type an untyped constant expression picks up from its operands.
fn infer_type(expr: &Expr, known: &HashMap<String, String>) -> Option<String> {
    match expr {
        Expr::Call { callee, args } if callee != "len" && args.len() == 1 => Some(callee.clone()),
        Expr::Ident(name) => known.get(name).cloned(),
        Expr::Unary {
            op: UnaryOp::LogicalNot,
            ..
        } => None,
        Expr::Unary { operand, .. } => infer_type(operand, known),
        Expr::Binary { op, .. } if !op.is_arithmetic() => None,
        // the shift count never decides the result type
        Expr::Binary {
            op: BinaryOp::Shl | BinaryOp::Shr,
            lhs,
            ..
        } => infer_type(lhs, known),
        Expr::Binary { lhs, rhs, .. } => {
            infer_type(lhs, known).or_else(|| infer_type(rhs, known))
        }
        Expr::Int(_) | Expr::Float(_) | Expr::Str(_) | Expr::Iota | Expr::Call { .. } => None,
    }
}
