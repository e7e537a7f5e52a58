//! Record Collection - chainable query-builder over JSON-like records.
//!
//! A [`RecordCollection`] owns an ordered list of [`Record`]s (string-keyed
//! maps of dynamically typed [`Value`]s) and offers the operations of a small
//! in-memory query builder:
//!
//! - Filtering: `filter`, `where_*`, `where_in`, `where_not_in`, `like`, `delete`
//! - Projection: `select`, `pluck`
//! - Mutation: `add`, `merge`, `update`, `map`
//! - Ordering: `order_by`, `order_by_many`, `reverse`
//! - Aggregation: `count`, `contains`, `unique`, `group_by`, `fold`, `reduce`
//! - Conversion: `to_array`, `to_object`, `to_typed`, `to_json`, iteration
//!
//! Chaining methods take `&mut self`, replace the owned records, and return
//! `&mut Self`.
//!
//! # Quick Start
//!
//! ```rust
//! use record_collection::{Dir, RecordCollection};
//! use serde_json::json;
//!
//! let mut people = RecordCollection::from_value(json!([
//!     {"id": 1, "name": "Al", "age": "34"},
//!     {"id": 2, "name": "Bo", "age": 17},
//!     {"id": 3, "name": "al", "age": 52},
//! ]))
//! .unwrap();
//!
//! people
//!     .where_op("age", ">=", 18)
//!     .like("name", "a%")
//!     .unwrap()
//!     .order_by("id", Dir::Desc);
//!
//! assert_eq!(people.pluck("id"), vec![json!(3), json!(1)]);
//! ```
//!
//! # Comparison Semantics
//!
//! `where_eq`, `where_op` with loose operators, `where_in`, `update`, and
//! `delete` compare loosely: `"5" == 5`, `true == "yes"`, a missing key is
//! `null`. The strict operators `===` and `!==`, `contains`, and `unique`
//! compare structurally with no coercion. See [`loose_cmp`] for the full
//! table.
//!
//! | Operator | Meaning |
//! |----------|---------|
//! | `==`, `=` | loose equality (also any unknown symbol) |
//! | `!=`, `<>` | loose inequality |
//! | `<`, `>`, `<=`, `>=` | loose ordering |
//! | `===`, `!==` | strict equality / inequality |
//!
//! Sorting uses [`compare_values`], a total order with no coercion:
//! `null < bool < number < string < array < object`.

mod clause;
mod collection;
mod compare;
mod error;
mod like;
mod op;
mod ordering;
mod query;
mod value;

// Re-export public API
pub use clause::{Clause, ClauseTest};
pub use collection::{RecordCollection, SelectKeys};
pub use compare::{loose_cmp, loose_eq, strict_eq};
pub use error::{CollectionError, Result};
pub use like::{LikePattern, WILDCARD};
pub use op::Op;
pub use ordering::{compare_by_orderings, compare_values, Dir, OrderBy};
pub use query::Query;
pub use serde_json::Value;
pub use value::{field, group_key, is_truthy, number_text, parse_numeric, Record};
