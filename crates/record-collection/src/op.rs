//! Comparison operators for `where` clauses.
//!
//! The [`Op`] enum names every operator a clause can use. Operators are
//! usually written as strings at call sites (`"=="`, `">="`, `"!=="`) and
//! converted with [`Op::parse`] or `From<&str>`; an unrecognized string
//! falls back to loose equality.

use std::cmp::Ordering;

use serde_json::Value;

use crate::compare::{loose_cmp, strict_eq};

/// Comparison operator for a query clause.
///
/// - **Loose**: `Eq`, `Ne`, `Lt`, `Gt`, `Lte`, `Gte` coerce across types
///   (see [`loose_cmp`](crate::loose_cmp))
/// - **Strict**: `Identical`, `NotIdentical` require the same type and value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Op {
    /// `==` (also `=`). Loose equality.
    #[default]
    Eq,
    /// `!=` (also `<>`). Loose inequality.
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `>=`
    Gte,
    /// `===`. Strict equality.
    Identical,
    /// `!==`. Strict inequality.
    NotIdentical,
}

impl Op {
    /// Parses an operator symbol.
    ///
    /// Unknown symbols parse as [`Op::Eq`].
    pub fn parse(symbol: &str) -> Op {
        match symbol.trim() {
            "!=" | "<>" => Op::Ne,
            "<" => Op::Lt,
            ">" => Op::Gt,
            "<=" => Op::Lte,
            ">=" => Op::Gte,
            "===" => Op::Identical,
            "!==" => Op::NotIdentical,
            _ => Op::Eq,
        }
    }

    /// Returns `true` for the operators that never coerce types.
    pub fn is_strict(self) -> bool {
        matches!(self, Op::Identical | Op::NotIdentical)
    }

    /// Evaluates a loose operator given an ordering result.
    ///
    /// Strict operators have no ordering form and always return `false`.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering == Ordering::Equal,
            Op::Ne => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            Op::Identical | Op::NotIdentical => false,
        }
    }

    /// Applies this operator to a field value and a clause value.
    ///
    /// Uncomparable operands satisfy only the inequality operators.
    pub fn eval(self, field: &Value, value: &Value) -> bool {
        match self {
            Op::Identical => strict_eq(field, value),
            Op::NotIdentical => !strict_eq(field, value),
            loose => match loose_cmp(field, value) {
                Some(ordering) => loose.eval_ordering(ordering),
                None => loose == Op::Ne,
            },
        }
    }

    /// Returns the symbol for this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::Lte => "<=",
            Op::Gte => ">=",
            Op::Identical => "===",
            Op::NotIdentical => "!==",
        }
    }
}

impl From<&str> for Op {
    fn from(symbol: &str) -> Self {
        Op::parse(symbol)
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
