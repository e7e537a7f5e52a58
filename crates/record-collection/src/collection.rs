//! The chainable record collection.
//!
//! [`RecordCollection`] owns an ordered `Vec<Record>`. Chaining methods take
//! `&mut self`, replace the owned records, and return `&mut Self`; query
//! methods borrow and return a derived value.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::clause::Clause;
use crate::compare::{loose_eq, strict_eq};
use crate::error::{CollectionError, Result};
use crate::op::Op;
use crate::ordering::{compare_by_orderings, Dir, OrderBy};
use crate::query::Query;
use crate::value::{field, group_key, into_record, type_name, Record};

/// An ordered, chainable collection of records.
///
/// # Example
///
/// ```
/// use record_collection::{Dir, RecordCollection};
/// use serde_json::json;
///
/// let mut people = RecordCollection::from_value(json!([
///     {"id": 1, "name": "Al"},
///     {"id": 2, "name": "Bo"},
///     {"id": 3, "name": "Al"},
/// ]))
/// .unwrap();
///
/// people.where_eq("name", "Al").order_by("id", Dir::Desc);
/// assert_eq!(people.pluck("id"), vec![json!(3), json!(1)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordCollection {
    items: Vec<Record>,
}

impl RecordCollection {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates a collection from any iterable of records.
    ///
    /// The iterable is drained into an owned snapshot.
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        RecordCollection {
            items: items.into_iter().collect(),
        }
    }

    /// Creates a collection from a dynamic JSON value.
    ///
    /// The value must be an array of objects; `null` is an empty collection.
    /// Anything else fails with [`CollectionError::InvalidInput`].
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(RecordCollection::default()),
            Value::Array(values) => Ok(RecordCollection {
                items: records_from(values)?,
            }),
            other => {
                let actual = type_name(&other);
                debug!(actual, "rejected collection input");
                Err(CollectionError::InvalidInput {
                    expected: "array of objects",
                    actual,
                })
            }
        }
    }

    /// Parses JSON text into a collection.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        RecordCollection::from_value(value)
    }

    /// Creates a collection from anything that serializes to an array of
    /// objects, such as a slice of structs or maps.
    ///
    /// ```
    /// use record_collection::RecordCollection;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Task { title: &'static str, done: bool }
    ///
    /// let tasks = [Task { title: "a", done: true }, Task { title: "b", done: false }];
    /// let mut collection = RecordCollection::from_serialize(&tasks).unwrap();
    /// assert_eq!(collection.where_truthy("done").count(), 1);
    /// ```
    pub fn from_serialize<T>(items: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        RecordCollection::from_value(serde_json::to_value(items)?)
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns all records in order.
    pub fn all(&self) -> &[Record] {
        &self.items
    }

    /// Alias of [`all`](Self::all).
    pub fn get(&self) -> &[Record] {
        &self.items
    }

    /// Number of records.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Alias of [`count`](Self::count).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The first record, if any.
    pub fn first(&self) -> Option<&Record> {
        self.items.first()
    }

    /// The last record, if any.
    pub fn last(&self) -> Option<&Record> {
        self.items.last()
    }

    /// Iterates over the records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.items.iter()
    }

    // ========================================================================
    // Appending
    // ========================================================================

    /// Appends one record.
    pub fn add(&mut self, record: Record) -> &mut Self {
        self.items.push(record);
        self
    }

    /// Appends a dynamic value, which must be an object.
    pub fn try_add(&mut self, value: Value) -> Result<&mut Self> {
        let record = into_record(value).map_err(|actual| {
            debug!(actual, "rejected record");
            CollectionError::InvalidInput {
                expected: "object",
                actual,
            }
        })?;
        Ok(self.add(record))
    }

    /// Appends every record from `other`, keeping both orders.
    pub fn merge<I>(&mut self, other: I) -> &mut Self
    where
        I: IntoIterator<Item = Record>,
    {
        self.items.extend(other);
        self
    }

    /// Appends the records of a dynamic value, normalized like
    /// [`from_value`](Self::from_value).
    ///
    /// Nothing is appended if any element is invalid.
    pub fn try_merge(&mut self, value: Value) -> Result<&mut Self> {
        let other = RecordCollection::from_value(value)?;
        Ok(self.merge(other))
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    /// Keeps the records for which `predicate(record, index)` returns `true`.
    pub fn filter<F>(&mut self, predicate: F) -> &mut Self
    where
        F: FnMut(&Record, usize) -> bool,
    {
        self.retain_logged("filter", predicate)
    }

    /// Keeps the records that match a clause.
    pub fn where_clause(&mut self, clause: &Clause) -> &mut Self {
        self.retain_logged("where", |record, _| clause.matches(record))
    }

    /// Keeps the records whose `key` is truthy.
    pub fn where_truthy(&mut self, key: &str) -> &mut Self {
        self.where_clause(&Clause::truthy(key))
    }

    /// Keeps the records whose `key` loosely equals `value`.
    pub fn where_eq(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.where_op(key, Op::Eq, value)
    }

    /// Keeps the records where `record[key] <op> value` holds.
    ///
    /// `op` is an [`Op`] or a symbol such as `">="` or `"!=="`; unknown
    /// symbols mean loose equality.
    pub fn where_op(
        &mut self,
        key: &str,
        op: impl Into<Op>,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.where_clause(&Clause::new(key, op, value))
    }

    /// Keeps the records whose `key` loosely equals one of `values`.
    pub fn where_in<I, V>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_clause(&Clause::is_in(key, values))
    }

    /// Drops the records whose `key` loosely equals one of `values`.
    pub fn where_not_in<I, V>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_clause(&Clause::not_in(key, values))
    }

    /// Keeps the records whose `key` matches a SQL `LIKE` pattern.
    ///
    /// `%` matches any run of characters; matching is case-insensitive and
    /// anchored. Records without the key never match. The collection is
    /// untouched if the pattern fails to compile.
    pub fn like(&mut self, key: &str, pattern: &str) -> Result<&mut Self> {
        let clause = Clause::like(key, pattern)?;
        Ok(self.where_clause(&clause))
    }

    /// Removes the records whose `key` loosely equals `value`.
    pub fn delete(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        self.retain_logged("delete", |record, _| !loose_eq(field(record, key), &value))
    }

    /// Applies a compound query: its clauses, then orderings, offset, and
    /// limit.
    pub fn apply(&mut self, query: &Query) -> &mut Self {
        let before = self.items.len();
        let items = std::mem::take(&mut self.items);
        self.items = query.run(items);
        trace!(op = "apply", before, after = self.items.len(), "applied query");
        self
    }

    /// Keeps at most the first `n` records.
    pub fn take(&mut self, n: usize) -> &mut Self {
        self.items.truncate(n);
        self
    }

    /// Drops the first `n` records.
    pub fn skip(&mut self, n: usize) -> &mut Self {
        let n = n.min(self.items.len());
        self.items.drain(..n);
        self
    }

    // ========================================================================
    // Transformation
    // ========================================================================

    /// Replaces every record with `transform(record)`.
    pub fn map<F>(&mut self, transform: F) -> &mut Self
    where
        F: FnMut(Record) -> Record,
    {
        let items = std::mem::take(&mut self.items);
        self.items = items.into_iter().map(transform).collect();
        self
    }

    /// Projects every record down to the given keys.
    ///
    /// `keys` is a single key (`"name"`) or a list (`["id", "name"]`). Keys a
    /// record lacks are left out of its projection.
    pub fn select(&mut self, keys: impl SelectKeys) -> &mut Self {
        let keys = keys.into_keys();
        for record in &mut self.items {
            let mut projected = Record::new();
            for key in &keys {
                if let Some(value) = record.remove(key) {
                    projected.insert(key.clone(), value);
                }
            }
            *record = projected;
        }
        self
    }

    /// Shallow-merges `patch` into every record whose `key` loosely equals
    /// `value`. Patch keys overwrite existing ones.
    pub fn update(&mut self, patch: Record, key: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        let mut updated = 0usize;
        for record in &mut self.items {
            if loose_eq(field(record, key), &value) {
                for (k, v) in &patch {
                    record.insert(k.clone(), v.clone());
                }
                updated += 1;
            }
        }
        trace!(op = "update", updated, "patched records");
        self
    }

    /// Stably sorts by one field.
    ///
    /// `dir` is a [`Dir`] or `"asc"`/`"desc"`; other strings sort ascending.
    /// Missing fields sort as `null`, which comes first ascending.
    pub fn order_by(&mut self, column: &str, dir: impl Into<Dir>) -> &mut Self {
        let ordering = OrderBy::new(column, dir);
        self.items.sort_by(|a, b| ordering.compare(a, b));
        self
    }

    /// Stably sorts by several fields; later fields break ties.
    pub fn order_by_many(&mut self, orderings: &[OrderBy]) -> &mut Self {
        self.items
            .sort_by(|a, b| compare_by_orderings(a, b, orderings));
        self
    }

    /// Reverses the record order.
    pub fn reverse(&mut self) -> &mut Self {
        self.items.reverse();
        self
    }

    /// Removes records structurally equal to an earlier record.
    pub fn unique(&mut self) -> &mut Self {
        let before = self.items.len();
        let items = std::mem::take(&mut self.items);
        let mut kept: Vec<Record> = Vec::with_capacity(before);
        for record in items {
            if !kept.contains(&record) {
                kept.push(record);
            }
        }
        self.items = kept;
        trace!(op = "unique", before, after = self.items.len(), "deduplicated records");
        self
    }

    /// Removes records whose `key` strictly equals an earlier record's.
    ///
    /// A missing key counts as `null`, so only the first keyless record
    /// survives.
    pub fn unique_by(&mut self, key: &str) -> &mut Self {
        let mut seen: Vec<Value> = Vec::new();
        self.retain_logged("unique_by", |record, _| {
            let value = field(record, key);
            if seen.iter().any(|s| strict_eq(s, value)) {
                false
            } else {
                seen.push(value.clone());
                true
            }
        })
    }

    /// Calls `f(record, index)` for every record, in order.
    pub fn each<F>(&mut self, mut f: F) -> &mut Self
    where
        F: FnMut(&Record, usize),
    {
        for (index, record) in self.items.iter().enumerate() {
            f(record, index);
        }
        self
    }

    // ========================================================================
    // Aggregation
    // ========================================================================

    /// Returns `true` if some record is structurally equal to `record`.
    pub fn contains(&self, record: &Record) -> bool {
        self.items.iter().any(|r| r == record)
    }

    /// Returns `true` if some record has `key` strictly equal to `value`.
    pub fn contains_value(&self, key: &str, value: &Value) -> bool {
        self.items
            .iter()
            .any(|r| r.get(key).is_some_and(|v| strict_eq(v, value)))
    }

    /// Groups records by the stringified value of `key`.
    ///
    /// Groups appear in first-seen order and keep the records' relative
    /// order. Missing keys group under `""`.
    pub fn group_by(&self, key: &str) -> IndexMap<String, RecordCollection> {
        let mut groups: IndexMap<String, RecordCollection> = IndexMap::new();
        for record in &self.items {
            groups
                .entry(group_key(field(record, key)))
                .or_default()
                .items
                .push(record.clone());
        }
        groups
    }

    /// The value of `key` for every record; `null` where it is missing.
    pub fn pluck(&self, key: &str) -> Vec<Value> {
        self.items
            .iter()
            .map(|record| field(record, key).clone())
            .collect()
    }

    /// Left fold over the records.
    pub fn fold<T, F>(&self, initial: T, combine: F) -> T
    where
        F: FnMut(T, &Record) -> T,
    {
        self.items.iter().fold(initial, combine)
    }

    /// Left fold seeded with the first record.
    ///
    /// Returns `None` on an empty collection.
    pub fn reduce<F>(&self, mut combine: F) -> Option<Record>
    where
        F: FnMut(Record, &Record) -> Record,
    {
        let (first, rest) = self.items.split_first()?;
        Some(rest.iter().fold(first.clone(), |acc, r| combine(acc, r)))
    }

    /// Splits into consecutive collections of `size` records; the last may
    /// be shorter.
    pub fn chunk(&self, size: usize) -> Result<Vec<RecordCollection>> {
        if size == 0 {
            debug!(size, "rejected chunk size");
            return Err(CollectionError::InvalidChunkSize(size));
        }
        let chunks: Vec<RecordCollection> = self
            .items
            .chunks(size)
            .map(|chunk| RecordCollection::new(chunk.to_vec()))
            .collect();
        trace!(op = "chunk", size, chunks = chunks.len(), "chunked records");
        Ok(chunks)
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Clones the records into a plain vector.
    pub fn to_array(&self) -> Vec<Record> {
        self.items.clone()
    }

    /// The records as a JSON array of objects.
    pub fn to_object(&self) -> Value {
        Value::Array(self.items.iter().cloned().map(Value::Object).collect())
    }

    /// Deserializes every record into `T`.
    pub fn to_typed<T>(&self) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_value(self.to_object())?)
    }

    /// Pretty-printed JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.items)?)
    }

    /// Consumes the collection, returning its records.
    pub fn into_vec(self) -> Vec<Record> {
        self.items
    }

    fn retain_logged<F>(&mut self, op: &'static str, mut keep: F) -> &mut Self
    where
        F: FnMut(&Record, usize) -> bool,
    {
        let before = self.items.len();
        let mut index = 0;
        self.items.retain(|record| {
            let kept = keep(record, index);
            index += 1;
            kept
        });
        trace!(op, before, after = self.items.len(), "filtered records");
        self
    }
}

/// Key arguments accepted by [`RecordCollection::select`].
pub trait SelectKeys {
    /// The keys, in projection order.
    fn into_keys(self) -> Vec<String>;
}

impl SelectKeys for &str {
    fn into_keys(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl SelectKeys for String {
    fn into_keys(self) -> Vec<String> {
        vec![self]
    }
}

impl SelectKeys for &String {
    fn into_keys(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<K: AsRef<str>, const N: usize> SelectKeys for [K; N] {
    fn into_keys(self) -> Vec<String> {
        self.iter().map(|k| k.as_ref().to_string()).collect()
    }
}

impl<K: AsRef<str>> SelectKeys for &[K] {
    fn into_keys(self) -> Vec<String> {
        self.iter().map(|k| k.as_ref().to_string()).collect()
    }
}

impl<K: AsRef<str>> SelectKeys for Vec<K> {
    fn into_keys(self) -> Vec<String> {
        self.iter().map(|k| k.as_ref().to_string()).collect()
    }
}

fn records_from(values: Vec<Value>) -> Result<Vec<Record>> {
    values
        .into_iter()
        .map(|value| {
            into_record(value).map_err(|actual| {
                debug!(actual, "rejected collection element");
                CollectionError::InvalidInput {
                    expected: "object",
                    actual,
                }
            })
        })
        .collect()
}

impl From<Vec<Record>> for RecordCollection {
    fn from(items: Vec<Record>) -> Self {
        RecordCollection { items }
    }
}

impl TryFrom<Value> for RecordCollection {
    type Error = CollectionError;

    fn try_from(value: Value) -> Result<Self> {
        RecordCollection::from_value(value)
    }
}

impl FromIterator<Record> for RecordCollection {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        RecordCollection::new(iter)
    }
}

impl Extend<Record> for RecordCollection {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl IntoIterator for RecordCollection {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn people() -> RecordCollection {
        RecordCollection::from_value(json!([
            {"id": 1, "name": "Al"},
            {"id": 2, "name": "Bo"},
            {"id": 3, "name": "Al"},
        ]))
        .unwrap()
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn from_value_rejects_non_arrays() {
        let err = RecordCollection::from_value(json!({"id": 1})).unwrap_err();
        assert!(matches!(
            err,
            CollectionError::InvalidInput {
                actual: "object",
                ..
            }
        ));
        assert!(RecordCollection::from_value(json!("text")).is_err());
        assert!(RecordCollection::from_value(json!(null)).unwrap().is_empty());
    }

    #[test]
    fn from_value_rejects_non_object_elements() {
        let err = RecordCollection::from_value(json!([{"id": 1}, 2])).unwrap_err();
        assert!(matches!(
            err,
            CollectionError::InvalidInput {
                expected: "object",
                actual: "number"
            }
        ));
    }

    #[test]
    fn construction_snapshots_the_source() {
        let mut source = vec![record(json!({"id": 1}))];
        let collection = RecordCollection::new(source.clone());
        source.push(record(json!({"id": 2})));
        assert_eq!(collection.count(), 1);
    }

    #[test]
    fn filter_receives_index() {
        let mut c = people();
        c.filter(|_, index| index % 2 == 0);
        assert_eq!(c.pluck("id"), vec![json!(1), json!(3)]);
    }

    #[test]
    fn like_with_metacharacters_filters_literally() {
        let mut c = RecordCollection::new([
            record(json!({"v": "1.5"})),
            record(json!({"v": "105"})),
        ]);
        c.like("v", "1.%").unwrap();
        assert_eq!(c.pluck("v"), vec![json!("1.5")]);
    }

    #[test]
    fn try_add_and_try_merge_validate_first() {
        let mut c = people();
        assert!(c.try_add(json!([1])).is_err());
        assert!(c.try_merge(json!([{"id": 4}, "bad"])).is_err());
        assert_eq!(c.count(), 3);

        c.try_add(json!({"id": 4})).unwrap();
        c.try_merge(json!([{"id": 5}])).unwrap();
        assert_eq!(c.pluck("id"), vec![json!(1), json!(2), json!(3), json!(4), json!(5)]);
    }

    #[test]
    fn select_keeps_requested_key_order() {
        let mut c = RecordCollection::new([record(json!({"a": 1, "b": 2, "c": 3}))]);
        c.select(["c", "a", "missing"]);
        let keys: Vec<&String> = c.first().unwrap().keys().collect();
        assert_eq!(keys, vec!["c", "a"]);
    }

    #[test]
    fn select_accepts_a_single_key() {
        let mut c = people();
        c.select("name");
        assert_eq!(c.first(), Some(&record(json!({"name": "Al"}))));

        let key = String::from("id");
        let mut c = people();
        c.select(&key);
        assert_eq!(c.last(), Some(&record(json!({"id": 3}))));

        let keys: &[&str] = &["id"];
        let mut c = people();
        c.select(keys);
        assert_eq!(c.count(), 3);
    }

    #[test]
    fn into_vec_returns_records_in_order() {
        let mut c = people();
        c.reverse();
        let ids: Vec<Value> = c.into_vec().into_iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, vec![json!(3), json!(2), json!(1)]);
    }

    #[test]
    fn update_counts_loose_matches() {
        let mut c = people();
        c.update(record(json!({"name": "Cy", "vip": true})), "id", "2");
        assert_eq!(c.all()[1], record(json!({"id": 2, "name": "Cy", "vip": true})));
        assert_eq!(c.all()[0], record(json!({"id": 1, "name": "Al"})));
    }

    #[test]
    fn skip_and_take() {
        let mut c = people();
        c.skip(1).take(1);
        assert_eq!(c.pluck("id"), vec![json!(2)]);

        let mut c = people();
        c.skip(10);
        assert!(c.is_empty());
    }

    #[test]
    fn reduce_without_initial() {
        let sum = people().reduce(|mut acc, r| {
            let total = acc["id"].as_i64().unwrap() + r["id"].as_i64().unwrap();
            acc.insert("id".into(), json!(total));
            acc
        });
        assert_eq!(sum.unwrap()["id"], json!(6));
        assert!(RecordCollection::default().reduce(|acc, _| acc).is_none());
    }
}
