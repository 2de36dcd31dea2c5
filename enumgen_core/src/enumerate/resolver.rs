//! Value resolver.
//!
//! Walks the collected blocks in declaration order, computes each member's
//! value and drops members whose value was already seen. Values are evaluated
//! on demand and memoized, so non-member siblings are only evaluated when a
//! member references them, and a sibling that cannot be evaluated only fails
//! the type if a member depends on it.

use super::{
    BinaryOp, CollectedType, ConstValue, Expr, EnumerationResult, IntegerKind, ResolvedConstant,
    SuppressedConstant, UnaryOp,
};
use crate::error::{EnumgenError, Result};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Why an initializer could not be evaluated to an integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("floating-point literal {0} is not an integer")]
    Float(String),

    #[error("string literal used as an integer")]
    String,

    #[error("operator {0} does not yield an integer")]
    NonInteger(&'static str),

    #[error("division by zero")]
    DivisionByZero,

    #[error("negative shift count {0}")]
    NegativeShift(ConstValue),

    #[error("integer overflow")]
    Overflow,

    #[error("undefined constant {0}")]
    Undefined(String),

    #[error("reference cycle through {0}")]
    Cycle(String),

    #[error("call to {callee} with {count} arguments")]
    Arity { callee: String, count: usize },

    #[error("len needs a single string literal argument")]
    Len,

    #[error("in {name}: {cause}")]
    InReference { name: String, cause: Box<EvalError> },
}

type EvalResult<T> = std::result::Result<T, EvalError>;

/// Resolve every member of `collected` to its value, dropping duplicates.
pub fn resolve(collected: &CollectedType) -> Result<EnumerationResult> {
    let type_name = collected.type_name.as_str();
    let mut evaluator = Evaluator::new(collected);
    let mut result = EnumerationResult::default();
    // value -> index of its survivor in `result.constants`
    let mut seen: HashMap<ConstValue, usize> = HashMap::new();

    for (block_index, block) in collected.blocks.iter().enumerate() {
        for (entry_index, entry) in block.entries.iter().enumerate() {
            if !entry.member {
                continue;
            }

            let slot = Slot {
                block: block_index,
                entry: entry_index,
            };
            let value = evaluator
                .value_of(slot)
                .map_err(|e| {
                    EnumgenError::malformed(type_name, &entry.identifier, entry.line, e.to_string())
                })?
                .value;

            check_range(collected, &entry.identifier, value)?;
            trace!(
                type_name,
                identifier = %entry.identifier,
                value = %value,
                counter = entry_index,
                "Resolved constant"
            );

            if entry.is_blank() {
                continue;
            }

            let constant = ResolvedConstant {
                identifier: entry.identifier.clone(),
                value,
                position_index: entry.position_index,
            };
            match seen.get(&value) {
                Some(&survivor) => {
                    let duplicate_of = result.constants[survivor].identifier.clone();
                    debug!(
                        type_name,
                        identifier = %constant.identifier,
                        duplicate_of = %duplicate_of,
                        value = %value,
                        "Suppressing duplicate value"
                    );
                    result.suppressed.push(SuppressedConstant {
                        constant,
                        duplicate_of,
                    });
                }
                None => {
                    seen.insert(value, result.constants.len());
                    result.constants.push(constant);
                }
            }
        }
    }

    debug!(
        type_name,
        survivors = result.constants.len(),
        suppressed = result.suppressed.len(),
        "Resolved type"
    );
    Ok(result)
}

fn check_range(collected: &CollectedType, identifier: &str, value: ConstValue) -> Result<()> {
    let kind = collected.kind;
    if kind.contains(value) {
        return Ok(());
    }

    let message = match kind {
        IntegerKind::Unsigned { .. } if value < 0 => format!(
            "negative value {} for unsigned type {}",
            value, collected.type_name
        ),
        IntegerKind::Unsigned { bits } => {
            format!("value {} overflows uint{}", value, bits)
        }
        IntegerKind::Signed { bits } => format!("value {} overflows int{}", value, bits),
    };
    Err(EnumgenError::invariant(
        &collected.type_name,
        identifier,
        message,
    ))
}

/// Position of an entry: block index and index within the block. The latter
/// is also the entry's counter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Slot {
    block: usize,
    entry: usize,
}

/// An intermediate value and the integer type it carries, if any.
#[derive(Debug, Clone, Copy)]
struct Typed {
    value: ConstValue,
    kind: Option<IntegerKind>,
}

impl Typed {
    fn untyped(value: ConstValue) -> Self {
        Self { value, kind: None }
    }
}

struct Evaluator<'a> {
    collected: &'a CollectedType,
    index: HashMap<&'a str, Slot>,
    /// Per entry, the initializer it evaluates: its own, or the last one
    /// stated earlier in its block.
    sources: Vec<Vec<Option<&'a Expr>>>,
    memo: HashMap<Slot, Typed>,
    in_progress: HashSet<Slot>,
}

impl<'a> Evaluator<'a> {
    fn new(collected: &'a CollectedType) -> Self {
        let mut index = HashMap::new();
        let mut sources = Vec::with_capacity(collected.blocks.len());

        for (block_index, block) in collected.blocks.iter().enumerate() {
            let mut current: Option<&Expr> = None;
            let mut block_sources = Vec::with_capacity(block.entries.len());

            for (entry_index, entry) in block.entries.iter().enumerate() {
                if let Some(expr) = &entry.initializer {
                    current = Some(expr);
                }
                block_sources.push(current);

                if !entry.is_blank() {
                    index.entry(entry.identifier.as_str()).or_insert(Slot {
                        block: block_index,
                        entry: entry_index,
                    });
                }
            }
            sources.push(block_sources);
        }

        Self {
            collected,
            index,
            sources,
            memo: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    fn value_of(&mut self, slot: Slot) -> EvalResult<Typed> {
        if let Some(typed) = self.memo.get(&slot) {
            return Ok(*typed);
        }

        let entry = &self.collected.blocks[slot.block].entries[slot.entry];
        if !self.in_progress.insert(slot) {
            return Err(EvalError::Cycle(entry.identifier.clone()));
        }

        let kind = if entry.member {
            Some(self.collected.kind)
        } else {
            entry
                .type_name
                .as_deref()
                .and_then(|t| self.collected.kind_of(t))
        };
        let counter = slot.entry as ConstValue;
        let evaluated = match self.sources[slot.block][slot.entry] {
            Some(expr) => self.eval(expr, counter),
            None => Ok(Typed::untyped(counter)),
        };
        self.in_progress.remove(&slot);

        let evaluated = evaluated?;
        let typed = Typed {
            value: evaluated.value,
            kind: kind.or(evaluated.kind),
        };
        self.memo.insert(slot, typed);
        Ok(typed)
    }

    fn eval(&mut self, expr: &Expr, counter: ConstValue) -> EvalResult<Typed> {
        match expr {
            Expr::Int(value) => Ok(Typed::untyped(*value)),
            Expr::Float(text) => Err(EvalError::Float(text.clone())),
            Expr::Str(_) => Err(EvalError::String),
            Expr::Iota => Ok(Typed::untyped(counter)),
            Expr::Ident(name) => self.reference(name),
            Expr::Unary {
                op: UnaryOp::LogicalNot,
                ..
            } => Err(EvalError::NonInteger(UnaryOp::LogicalNot.symbol())),
            Expr::Unary { op, operand } => {
                let operand = self.eval(operand, counter)?;
                let value = match (op, operand.kind) {
                    (UnaryOp::Plus, _) => operand.value,
                    (UnaryOp::Neg, _) => operand.value.checked_neg().ok_or(EvalError::Overflow)?,
                    // ^x flips the type's bits for unsigned values, -x-1 otherwise
                    (_, Some(kind @ IntegerKind::Unsigned { .. })) => operand.value ^ kind.max(),
                    _ => !operand.value,
                };
                Ok(Typed {
                    value,
                    kind: operand.kind,
                })
            }
            Expr::Binary { op, lhs, rhs } => {
                if !op.is_arithmetic() {
                    return Err(EvalError::NonInteger(op.symbol()));
                }
                let lhs = self.eval(lhs, counter)?;
                let rhs = self.eval(rhs, counter)?;
                let kind = match op {
                    BinaryOp::Shl | BinaryOp::Shr => lhs.kind,
                    _ => lhs.kind.or(rhs.kind),
                };
                Ok(Typed {
                    value: apply_binary(*op, lhs.value, rhs.value)?,
                    kind,
                })
            }
            Expr::Call { callee, args } => self.call(callee, args, counter),
        }
    }

    fn reference(&mut self, name: &str) -> EvalResult<Typed> {
        let slot = *self
            .index
            .get(name)
            .ok_or_else(|| EvalError::Undefined(name.to_string()))?;

        match self.value_of(slot) {
            Err(EvalError::Cycle(through)) => Err(EvalError::Cycle(through)),
            Err(cause) => Err(EvalError::InReference {
                name: name.to_string(),
                cause: Box::new(cause),
            }),
            ok => ok,
        }
    }

    fn call(&mut self, callee: &str, args: &[Expr], counter: ConstValue) -> EvalResult<Typed> {
        if callee == "len" {
            return match args {
                [Expr::Str(text)] => Ok(Typed::untyped(text.len() as ConstValue)),
                _ => Err(EvalError::Len),
            };
        }

        let [arg] = args else {
            return Err(EvalError::Arity {
                callee: callee.to_string(),
                count: args.len(),
            });
        };

        // a conversion keeps the value and takes the target's type
        let value = self.eval(arg, counter)?.value;
        Ok(Typed {
            value,
            kind: self.collected.kind_of(callee),
        })
    }
}

fn apply_binary(op: BinaryOp, lhs: ConstValue, rhs: ConstValue) -> EvalResult<ConstValue> {
    let value = match op {
        BinaryOp::Add => lhs.checked_add(rhs).ok_or(EvalError::Overflow)?,
        BinaryOp::Sub => lhs.checked_sub(rhs).ok_or(EvalError::Overflow)?,
        BinaryOp::Mul => lhs.checked_mul(rhs).ok_or(EvalError::Overflow)?,
        BinaryOp::Div | BinaryOp::Rem if rhs == 0 => return Err(EvalError::DivisionByZero),
        BinaryOp::Div => lhs.checked_div(rhs).ok_or(EvalError::Overflow)?,
        BinaryOp::Rem => lhs.checked_rem(rhs).ok_or(EvalError::Overflow)?,
        BinaryOp::Shl => shift_left(lhs, shift_count(rhs)?)?,
        BinaryOp::Shr => {
            let count = shift_count(rhs)?;
            if count >= ConstValue::BITS {
                if lhs < 0 { -1 } else { 0 }
            } else {
                lhs >> count
            }
        }
        BinaryOp::BitAnd => lhs & rhs,
        BinaryOp::BitOr => lhs | rhs,
        BinaryOp::BitXor => lhs ^ rhs,
        BinaryOp::AndNot => lhs & !rhs,
        _ => return Err(EvalError::NonInteger(op.symbol())),
    };
    Ok(value)
}

fn shift_count(count: ConstValue) -> EvalResult<u32> {
    if count < 0 {
        return Err(EvalError::NegativeShift(count));
    }
    u32::try_from(count).map_err(|_| EvalError::Overflow)
}

fn shift_left(value: ConstValue, count: u32) -> EvalResult<ConstValue> {
    if value == 0 {
        return Ok(0);
    }
    if count >= ConstValue::BITS - 1 {
        return Err(EvalError::Overflow);
    }
    let shifted = value << count;
    if shifted >> count != value {
        return Err(EvalError::Overflow);
    }
    Ok(shifted)
}
