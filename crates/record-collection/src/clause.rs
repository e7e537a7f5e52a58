//! Clause types for record predicates.
//!
//! A [`Clause`] is a single filter predicate: a field name and the test to
//! run against that field's value. Every `where*`/`like` operation on a
//! collection builds a clause and filters with it; [`Query`](crate::Query)
//! groups clauses into AND / OR / NOT sets.

use serde_json::Value;

use crate::compare::loose_eq;
use crate::error::Result;
use crate::like::LikePattern;
use crate::op::Op;
use crate::value::{field, is_truthy, Record};

/// A single filter predicate.
///
/// A record that lacks the field is tested as if the field were `null`,
/// except for `Like`, which never matches a missing field.
///
/// # Example
///
/// ```
/// use record_collection::{Clause, Op};
/// use serde_json::json;
///
/// let clause = Clause::new("age", Op::Gte, 18);
/// let adult = json!({"age": "21"}).as_object().cloned().unwrap();
/// assert!(clause.matches(&adult));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// The field name to test.
    pub field: String,
    /// The test applied to the field value.
    pub test: ClauseTest,
}

/// The test a [`Clause`] applies to a field value.
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseTest {
    /// Compare with an operator.
    Compare { op: Op, value: Value },
    /// Field value is loosely equal to one of the set.
    In(Vec<Value>),
    /// Field value is loosely equal to none of the set.
    NotIn(Vec<Value>),
    /// Field value matches a `LIKE` pattern.
    Like(LikePattern),
    /// Field value is truthy.
    Truthy,
}

impl Clause {
    /// Creates a comparison clause.
    pub fn new(field: impl Into<String>, op: impl Into<Op>, value: impl Into<Value>) -> Self {
        Clause {
            field: field.into(),
            test: ClauseTest::Compare {
                op: op.into(),
                value: value.into(),
            },
        }
    }

    /// Creates a loose-equality clause.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Clause::new(field, Op::Eq, value)
    }

    /// Creates a truthiness clause.
    pub fn truthy(field: impl Into<String>) -> Self {
        Clause {
            field: field.into(),
            test: ClauseTest::Truthy,
        }
    }

    /// Creates a set-membership clause.
    pub fn is_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Clause {
            field: field.into(),
            test: ClauseTest::In(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Creates a set-exclusion clause.
    pub fn not_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Clause {
            field: field.into(),
            test: ClauseTest::NotIn(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Creates a `LIKE` clause.
    ///
    /// Returns an error if the pattern cannot be compiled.
    pub fn like(field: impl Into<String>, pattern: &str) -> Result<Self> {
        Ok(Clause {
            field: field.into(),
            test: ClauseTest::Like(LikePattern::compile(pattern)?),
        })
    }

    /// Evaluates this clause against a record.
    pub fn matches(&self, record: &Record) -> bool {
        match &self.test {
            ClauseTest::Like(pattern) => record
                .get(&self.field)
                .is_some_and(|value| pattern.matches_value(value)),
            test => test.matches_value(field(record, &self.field)),
        }
    }
}

impl ClauseTest {
    /// Evaluates the test against a field value.
    pub fn matches_value(&self, field_value: &Value) -> bool {
        match self {
            ClauseTest::Compare { op, value } => op.eval(field_value, value),
            ClauseTest::In(set) => set.iter().any(|v| loose_eq(field_value, v)),
            ClauseTest::NotIn(set) => !set.iter().any(|v| loose_eq(field_value, v)),
            ClauseTest::Like(pattern) => pattern.matches_value(field_value),
            ClauseTest::Truthy => is_truthy(field_value),
        }
    }
}
