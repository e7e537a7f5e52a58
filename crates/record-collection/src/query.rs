//! Reusable compound queries.
//!
//! A [`Query`] bundles clauses, orderings, and pagination so the same
//! selection can be run against many record slices or applied to a
//! [`RecordCollection`](crate::RecordCollection) in one step.

use serde_json::Value;

use crate::clause::Clause;
use crate::error::Result;
use crate::op::Op;
use crate::ordering::{compare_by_orderings, Dir, OrderBy};
use crate::value::Record;

/// A query for filtering and ordering records.
///
/// Queries consist of three clause groups:
/// - **AND**: All clauses must match
/// - **OR**: At least one clause must match (or none if empty)
/// - **NOT**: No clause may match
///
/// The overall match logic is:
/// ```text
/// match = (all AND clauses match)
///       ∧ (at least one OR clause matches, OR no OR clauses exist)
///       ∧ (no NOT clause matches)
/// ```
///
/// # Example
///
/// ```
/// use record_collection::{Query, RecordCollection};
/// use serde_json::json;
///
/// let mut people = RecordCollection::from_value(json!([
///     {"name": "Al", "age": 30, "team": "red"},
///     {"name": "Bo", "age": 17, "team": "blue"},
///     {"name": "Cy", "age": 41, "team": "green"},
/// ]))
/// .unwrap();
///
/// let query = Query::new()
///     .and_gte("age", 18)
///     .or_eq("team", "red")
///     .or_eq("team", "green")
///     .order_desc("age")
///     .limit(1);
///
/// people.apply(&query);
/// assert_eq!(people.pluck("name"), vec![json!("Cy")]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    and_clauses: Vec<Clause>,
    or_clauses: Vec<Clause>,
    not_clauses: Vec<Clause>,
    orderings: Vec<OrderBy>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl Query {
    /// Creates a new empty query.
    ///
    /// An empty query matches all records.
    pub fn new() -> Self {
        Query::default()
    }

    // ========================================================================
    // Generic clause builders
    // ========================================================================

    /// Adds an AND comparison clause.
    pub fn and(self, field: &str, op: impl Into<Op>, value: impl Into<Value>) -> Self {
        self.and_clause(Clause::new(field, op, value))
    }

    /// Adds an OR comparison clause.
    pub fn or(self, field: &str, op: impl Into<Op>, value: impl Into<Value>) -> Self {
        self.or_clause(Clause::new(field, op, value))
    }

    /// Adds a NOT comparison clause.
    pub fn not(self, field: &str, op: impl Into<Op>, value: impl Into<Value>) -> Self {
        self.not_clause(Clause::new(field, op, value))
    }

    /// Adds a prebuilt clause to the AND group.
    pub fn and_clause(mut self, clause: Clause) -> Self {
        self.and_clauses.push(clause);
        self
    }

    /// Adds a prebuilt clause to the OR group.
    pub fn or_clause(mut self, clause: Clause) -> Self {
        self.or_clauses.push(clause);
        self
    }

    /// Adds a prebuilt clause to the NOT group.
    pub fn not_clause(mut self, clause: Clause) -> Self {
        self.not_clauses.push(clause);
        self
    }

    // ========================================================================
    // AND shorthand methods
    // ========================================================================

    /// Adds an AND loose-equality clause.
    pub fn and_eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.and(field, Op::Eq, value)
    }

    /// Adds an AND not-equal clause.
    pub fn and_ne(self, field: &str, value: impl Into<Value>) -> Self {
        self.and(field, Op::Ne, value)
    }

    /// Adds an AND greater-than clause.
    pub fn and_gt(self, field: &str, value: impl Into<Value>) -> Self {
        self.and(field, Op::Gt, value)
    }

    /// Adds an AND greater-than-or-equal clause.
    pub fn and_gte(self, field: &str, value: impl Into<Value>) -> Self {
        self.and(field, Op::Gte, value)
    }

    /// Adds an AND less-than clause.
    pub fn and_lt(self, field: &str, value: impl Into<Value>) -> Self {
        self.and(field, Op::Lt, value)
    }

    /// Adds an AND less-than-or-equal clause.
    pub fn and_lte(self, field: &str, value: impl Into<Value>) -> Self {
        self.and(field, Op::Lte, value)
    }

    /// Adds an AND set-membership clause.
    pub fn and_in<I, V>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.and_clause(Clause::is_in(field, values))
    }

    /// Adds an AND `LIKE` clause.
    ///
    /// Returns an error if the pattern is invalid.
    pub fn and_like(self, field: &str, pattern: &str) -> Result<Self> {
        Ok(self.and_clause(Clause::like(field, pattern)?))
    }

    // ========================================================================
    // OR shorthand methods
    // ========================================================================

    /// Adds an OR loose-equality clause.
    pub fn or_eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.or(field, Op::Eq, value)
    }

    /// Adds an OR set-membership clause.
    pub fn or_in<I, V>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.or_clause(Clause::is_in(field, values))
    }

    /// Adds an OR `LIKE` clause.
    pub fn or_like(self, field: &str, pattern: &str) -> Result<Self> {
        Ok(self.or_clause(Clause::like(field, pattern)?))
    }

    // ========================================================================
    // NOT shorthand methods
    // ========================================================================

    /// Adds a NOT loose-equality clause.
    pub fn not_eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.not(field, Op::Eq, value)
    }

    /// Adds a NOT set-membership clause.
    pub fn not_in<I, V>(self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.not_clause(Clause::is_in(field, values))
    }

    /// Adds a NOT `LIKE` clause.
    pub fn not_like(self, field: &str, pattern: &str) -> Result<Self> {
        Ok(self.not_clause(Clause::like(field, pattern)?))
    }

    // ========================================================================
    // Ordering and pagination
    // ========================================================================

    /// Adds an ordering clause.
    pub fn order_by(mut self, field: &str, dir: impl Into<Dir>) -> Self {
        self.orderings.push(OrderBy::new(field, dir));
        self
    }

    /// Adds an ascending ordering clause.
    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(field, Dir::Asc)
    }

    /// Adds a descending ordering clause.
    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(field, Dir::Desc)
    }

    /// Sets the maximum number of results to return.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the number of results to skip.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the AND clauses.
    pub fn and_clauses(&self) -> &[Clause] {
        &self.and_clauses
    }

    /// Returns the OR clauses.
    pub fn or_clauses(&self) -> &[Clause] {
        &self.or_clauses
    }

    /// Returns the NOT clauses.
    pub fn not_clauses(&self) -> &[Clause] {
        &self.not_clauses
    }

    /// Returns the ordering clauses.
    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    /// Returns the limit, if set.
    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the offset, if set.
    pub fn get_offset(&self) -> Option<usize> {
        self.offset
    }

    /// Returns `true` if this query has no clauses (matches everything).
    pub fn is_empty(&self) -> bool {
        self.and_clauses.is_empty() && self.or_clauses.is_empty() && self.not_clauses.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single record matches this query's clauses.
    pub fn matches(&self, record: &Record) -> bool {
        self.and_clauses.iter().all(|clause| clause.matches(record))
            && (self.or_clauses.is_empty()
                || self.or_clauses.iter().any(|clause| clause.matches(record)))
            && !self.not_clauses.iter().any(|clause| clause.matches(record))
    }

    /// Filters a slice, returning references to matching records.
    ///
    /// Results are stably sorted by the query's orderings, then offset and
    /// limit are applied.
    pub fn filter<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        let mut results: Vec<&'a Record> = records.iter().filter(|r| self.matches(r)).collect();

        if !self.orderings.is_empty() {
            results.sort_by(|a, b| compare_by_orderings(a, b, &self.orderings));
        }

        self.paginate(results)
    }

    /// Runs the query over owned records, consuming them.
    pub(crate) fn run(&self, records: Vec<Record>) -> Vec<Record> {
        let mut results: Vec<Record> = records.into_iter().filter(|r| self.matches(r)).collect();

        if !self.orderings.is_empty() {
            results.sort_by(|a, b| compare_by_orderings(a, b, &self.orderings));
        }

        self.paginate(results)
    }

    fn paginate<T>(&self, results: Vec<T>) -> Vec<T> {
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(usize::MAX);
        results.into_iter().skip(offset).take(limit).collect()
    }

    /// Counts the matching records.
    pub fn count(&self, records: &[Record]) -> usize {
        records.iter().filter(|r| self.matches(r)).count()
    }

    /// Returns `true` if any record matches.
    pub fn any(&self, records: &[Record]) -> bool {
        records.iter().any(|r| self.matches(r))
    }

    /// Finds the first matching record, in slice order.
    pub fn find<'a>(&self, records: &'a [Record]) -> Option<&'a Record> {
        records.iter().find(|r| self.matches(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tasks() -> Vec<Record> {
        let tasks = json!([
            {"name": "Task A", "priority": 1, "status": "open", "archived": false},
            {"name": "Task B", "priority": 2, "status": "active", "archived": false},
            {"name": "Urgent Task", "priority": 5, "status": "active", "archived": false},
            {"name": "Critical Task", "priority": 5, "status": "done", "archived": true},
            {"name": "Done Task", "priority": 3, "status": "done", "archived": true},
        ]);
        tasks
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t.as_object().cloned().unwrap())
            .collect()
    }

    fn names(results: &[&Record]) -> Vec<String> {
        results
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn empty_query_matches_all() {
        let tasks = sample_tasks();
        let query = Query::new();

        assert!(query.is_empty());
        assert_eq!(query.filter(&tasks).len(), 5);
    }

    #[test]
    fn and_multiple_clauses() {
        let tasks = sample_tasks();
        let query = Query::new().and_eq("priority", 5).and_eq("archived", false);

        let results = query.filter(&tasks);
        assert_eq!(names(&results), vec!["Urgent Task"]);
    }

    #[test]
    fn or_clauses() {
        let tasks = sample_tasks();
        let query = Query::new()
            .or_like("name", "urgent%")
            .unwrap()
            .or_like("name", "critical%")
            .unwrap();

        assert_eq!(query.count(&tasks), 2);
    }

    #[test]
    fn not_clauses() {
        let tasks = sample_tasks();
        let query = Query::new().not_eq("archived", true);

        let results = query.filter(&tasks);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|t| t["archived"] == json!(false)));
    }

    #[test]
    fn combined_groups() {
        let tasks = sample_tasks();
        let query = Query::new()
            .and_gte("priority", 2)
            .or_in("status", ["active", "done"])
            .not_like("name", "%critical%")
            .unwrap();

        assert_eq!(
            names(&query.filter(&tasks)),
            vec!["Task B", "Urgent Task", "Done Task"]
        );
    }

    #[test]
    fn ordering_with_ties_is_stable() {
        let tasks = sample_tasks();
        let query = Query::new().order_desc("priority");

        assert_eq!(
            names(&query.filter(&tasks)),
            vec!["Urgent Task", "Critical Task", "Done Task", "Task B", "Task A"]
        );
    }

    #[test]
    fn multi_field_ordering() {
        let tasks = sample_tasks();
        let query = Query::new().order_desc("priority").order_asc("name");

        assert_eq!(
            names(&query.filter(&tasks))[..2],
            ["Critical Task".to_string(), "Urgent Task".to_string()]
        );
    }

    #[test]
    fn offset_and_limit() {
        let tasks = sample_tasks();
        let query = Query::new().order_asc("priority").offset(1).limit(2);

        assert_eq!(names(&query.filter(&tasks)), vec!["Task B", "Done Task"]);
        assert_eq!(query.get_offset(), Some(1));
        assert_eq!(query.get_limit(), Some(2));

        assert!(Query::new().offset(10).filter(&tasks).is_empty());
        assert!(Query::new().limit(0).filter(&tasks).is_empty());
    }

    #[test]
    fn any_and_find() {
        let tasks = sample_tasks();
        let query = Query::new().and_gt("priority", 4);

        assert!(query.any(&tasks));
        assert_eq!(query.find(&tasks).unwrap()["name"], json!("Urgent Task"));
        assert!(!Query::new().and_gt("priority", 10).any(&tasks));
        assert!(Query::new().and_gt("priority", 10).find(&tasks).is_none());
    }

    #[test]
    fn and_range_membership_and_like() {
        let tasks = sample_tasks();

        let below = Query::new().and_lt("priority", 3).and_lte("priority", "2");
        assert_eq!(names(&below.filter(&tasks)), vec!["Task A", "Task B"]);

        let open_or_done = Query::new().and_in("status", ["open", "done"]);
        assert_eq!(open_or_done.count(&tasks), 3);

        let tasks_only = Query::new().and_like("name", "task%").unwrap();
        assert_eq!(names(&tasks_only.filter(&tasks)), vec!["Task A", "Task B"]);
    }

    #[test]
    fn string_operators_parse() {
        let tasks = sample_tasks();
        let query = Query::new().and("priority", ">=", "3").and("status", "!==", "done");

        assert_eq!(names(&query.filter(&tasks)), vec!["Urgent Task"]);
        assert_eq!(query.and_clauses().len(), 2);
    }
}
