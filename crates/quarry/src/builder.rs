//! Fluent accumulation of a query specification and the terminal
//! operations that compile and execute it.
//!
//! All non-terminal methods consume and return the builder, so statements
//! read as one chain. Nothing is validated while the chain runs; malformed
//! shapes surface when a terminal (or `to_*_sql`) call compiles the spec.

use tracing::debug;

use crate::client::{Connection, Executed, Row};
use crate::condition::{Condition, Connector, Operand};
use crate::error::{QueryError, QueryResult};
use crate::expr::{FieldExpr, JoinOn, JoinSpec, JoinType, OrderSpec, SortDir, TableExpr};
use crate::grammar::Dialect;
use crate::spec::QuerySpec;

/// Builds one SQL statement through fluent calls.
///
/// # Example
///
/// ```
/// use quarry::{Dialect, QueryBuilder};
///
/// let sql = QueryBuilder::new(Dialect::Mysql)
///     .select_fields(["id", "name"])
///     .from("users")
///     .where_("age", ">", 18)
///     .order_by("name")
///     .limit(10)
///     .to_select_sql()
///     .unwrap();
/// assert_eq!(
///     sql,
///     "SELECT `id`,`name` FROM `users` WHERE `age` > 18 ORDER BY `name` LIMIT 10"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    dialect: Dialect,
    spec: QuerySpec,
    allow_full_update: bool,
}

impl QueryBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            spec: QuerySpec::new(),
            allow_full_update: false,
        }
    }

    /// A fresh builder sharing this one's dialect, for subqueries and
    /// groups.
    pub fn child(&self) -> Self {
        Self::new(self.dialect)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The accumulated specification.
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    pub fn into_spec(self) -> QuerySpec {
        self.spec
    }

    // ==================== fields ====================

    /// Mark the statement DISTINCT. Idempotent.
    pub fn distinct(mut self) -> Self {
        self.spec.distinct = true;
        self
    }

    /// Replace the field list. An empty iterator restores the wildcard
    /// default.
    pub fn select_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldExpr>,
    {
        let fields: Vec<FieldExpr> = fields.into_iter().map(Into::into).collect();
        self.spec.fields = if fields.is_empty() {
            QuerySpec::new().fields
        } else {
            fields
        };
        self
    }

    /// Append one field. Displaces the wildcard default rather than
    /// joining it.
    pub fn add_field(mut self, field: impl Into<FieldExpr>) -> Self {
        self.push_field(field.into());
        self
    }

    /// Append a subquery field built by `f` against a fresh child builder.
    pub fn select_subquery(mut self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        let spec = f(self.child()).into_spec();
        self.push_field(FieldExpr::subquery(spec));
        self
    }

    /// Append an aliased subquery field.
    pub fn select_subquery_as(
        mut self,
        f: impl FnOnce(QueryBuilder) -> QueryBuilder,
        alias: &str,
    ) -> Self {
        let spec = f(self.child()).into_spec();
        self.push_field(FieldExpr::aliased(FieldExpr::subquery(spec), alias));
        self
    }

    fn push_field(&mut self, field: FieldExpr) {
        if self.spec.is_wildcard() {
            self.spec.fields.clear();
        }
        self.spec.fields.push(field);
    }

    // ==================== tables ====================

    /// Append a table to the FROM list.
    pub fn from(mut self, table: impl Into<TableExpr>) -> Self {
        self.spec.tables.push(table.into());
        self
    }

    /// Append an aliased derived table built by `f`.
    pub fn from_subquery_as(
        mut self,
        f: impl FnOnce(QueryBuilder) -> QueryBuilder,
        alias: &str,
    ) -> Self {
        let spec = f(self.child()).into_spec();
        self.spec
            .tables
            .push(TableExpr::aliased(TableExpr::subquery(spec), alias));
        self
    }

    // ==================== joins ====================

    /// INNER JOIN. A single column constrains with `USING`, a
    /// `(left, op, right)` triple with `ON`.
    pub fn join(self, table: impl Into<TableExpr>, on: impl Into<JoinOn>) -> Self {
        self.join_as(table, on, JoinType::Inner)
    }

    /// JOIN with an explicit flavor.
    pub fn join_as(
        mut self,
        table: impl Into<TableExpr>,
        on: impl Into<JoinOn>,
        kind: JoinType,
    ) -> Self {
        self.spec.joins.push(JoinSpec {
            table: table.into(),
            kind,
            on: on.into(),
        });
        self
    }

    pub fn left_join(self, table: impl Into<TableExpr>, on: impl Into<JoinOn>) -> Self {
        self.join_as(table, on, JoinType::Left)
    }

    pub fn right_join(self, table: impl Into<TableExpr>, on: impl Into<JoinOn>) -> Self {
        self.join_as(table, on, JoinType::Right)
    }

    /// NATURAL INNER JOIN: no join columns at all.
    pub fn natural_join(self, table: impl Into<TableExpr>) -> Self {
        self.natural_join_as(table, JoinType::Inner)
    }

    pub fn natural_join_as(mut self, table: impl Into<TableExpr>, kind: JoinType) -> Self {
        self.spec.joins.push(JoinSpec {
            table: table.into(),
            kind,
            on: JoinOn::Natural,
        });
        self
    }

    // ==================== where ====================

    /// Append an AND-connected condition.
    pub fn where_(
        mut self,
        field: impl Into<String>,
        op: impl Into<String>,
        data: impl Into<Operand>,
    ) -> Self {
        self.spec
            .wheres
            .push(Condition::expr(Connector::And, field, op, data));
        self
    }

    /// Append an OR-connected condition.
    pub fn or_where(
        mut self,
        field: impl Into<String>,
        op: impl Into<String>,
        data: impl Into<Operand>,
    ) -> Self {
        self.spec
            .wheres
            .push(Condition::expr(Connector::Or, field, op, data));
        self
    }

    /// `field IS NULL`.
    pub fn where_null(self, field: impl Into<String>) -> Self {
        self.where_(field, "IS", Operand::null())
    }

    /// Append a parenthesized group: `f` populates a child builder whose
    /// WHERE list becomes the group body.
    pub fn where_group(mut self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        let nodes = f(self.child()).spec.wheres;
        self.spec.wheres.push(Condition::group(Connector::And, nodes));
        self
    }

    pub fn or_where_group(mut self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        let nodes = f(self.child()).spec.wheres;
        self.spec.wheres.push(Condition::group(Connector::Or, nodes));
        self
    }

    /// Compare `field` against a subquery built by `f`, e.g. with `IN`.
    pub fn where_query(
        mut self,
        field: impl Into<String>,
        op: impl Into<String>,
        f: impl FnOnce(QueryBuilder) -> QueryBuilder,
    ) -> Self {
        let spec = f(self.child()).into_spec();
        self.spec.wheres.push(Condition::expr(
            Connector::And,
            field,
            op,
            Operand::query(spec),
        ));
        self
    }

    // ==================== grouping ====================

    /// Append GROUP BY fields.
    pub fn group_by<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldExpr>,
    {
        self.spec.groups.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Append an AND-connected HAVING condition.
    pub fn having(
        mut self,
        field: impl Into<String>,
        op: impl Into<String>,
        data: impl Into<Operand>,
    ) -> Self {
        self.spec
            .havings
            .push(Condition::expr(Connector::And, field, op, data));
        self
    }

    pub fn or_having(
        mut self,
        field: impl Into<String>,
        op: impl Into<String>,
        data: impl Into<Operand>,
    ) -> Self {
        self.spec
            .havings
            .push(Condition::expr(Connector::Or, field, op, data));
        self
    }

    pub fn having_group(mut self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        let nodes = f(self.child()).spec.havings;
        self.spec.havings.push(Condition::group(Connector::And, nodes));
        self
    }

    pub fn having_query(
        mut self,
        field: impl Into<String>,
        op: impl Into<String>,
        f: impl FnOnce(QueryBuilder) -> QueryBuilder,
    ) -> Self {
        let spec = f(self.child()).into_spec();
        self.spec.havings.push(Condition::expr(
            Connector::And,
            field,
            op,
            Operand::query(spec),
        ));
        self
    }

    // ==================== ordering and paging ====================

    /// Ascending ORDER BY entry.
    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.spec.orders.push(OrderSpec {
            field: field.into(),
            dir: SortDir::Asc,
        });
        self
    }

    /// Descending ORDER BY entry.
    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.spec.orders.push(OrderSpec {
            field: field.into(),
            dir: SortDir::Desc,
        });
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.spec.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.spec.offset = Some(n);
        self
    }

    // ==================== unions ====================

    /// Append `UNION <other>`.
    pub fn union(mut self, other: impl Into<QuerySpec>) -> Self {
        self.spec.push_union(other.into(), false);
        self
    }

    /// Append `UNION ALL <other>`.
    pub fn union_all(mut self, other: impl Into<QuerySpec>) -> Self {
        self.spec.push_union(other.into(), true);
        self
    }

    /// Append `UNION` with the entry built by `f` against a child builder.
    pub fn union_with(mut self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        let spec = f(self.child()).into_spec();
        self.spec.push_union(spec, false);
        self
    }

    pub fn union_all_with(mut self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        let spec = f(self.child()).into_spec();
        self.spec.push_union(spec, true);
        self
    }

    // ==================== compilation ====================

    /// Permit a later [`update`](Self::update) with no WHERE clause.
    pub fn allow_full_update(mut self) -> Self {
        self.allow_full_update = true;
        self
    }

    /// Compile the accumulated spec as a SELECT.
    pub fn to_select_sql(&self) -> QueryResult<String> {
        self.dialect.grammar().compile_select(&self.spec)
    }

    /// Compile an INSERT from an ordered column/value mapping.
    pub fn to_insert_sql<I, C, V>(&self, values: I) -> QueryResult<String>
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<Operand>,
    {
        self.dialect
            .grammar()
            .compile_insert(&self.spec, &collect_values(values))
    }

    /// Compile an UPDATE.
    ///
    /// Refused with [`QueryError::InvalidArgument`] when no WHERE clause
    /// was accumulated, unless [`allow_full_update`](Self::allow_full_update)
    /// was called.
    pub fn to_update_sql<I, C, V>(&self, values: I) -> QueryResult<String>
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<Operand>,
    {
        if self.spec.wheres.is_empty() && !self.allow_full_update {
            return Err(QueryError::invalid_argument(
                "UPDATE without WHERE affects every row; call allow_full_update to permit it",
            ));
        }
        self.dialect
            .grammar()
            .compile_update(&self.spec, &collect_values(values))
    }

    /// Compile a DELETE. Field lists never participate.
    pub fn to_delete_sql(&self) -> QueryResult<String> {
        self.dialect.grammar().compile_delete(&self.spec)
    }

    /// Compile a TRUNCATE, independent of accumulated state.
    pub fn to_truncate_sql(&self, table: &str) -> QueryResult<String> {
        self.dialect.grammar().compile_truncate(table)
    }

    // ==================== terminal operations ====================

    /// Compile and execute a SELECT, returning the result rows.
    pub fn get(&self, conn: &impl Connection) -> QueryResult<Vec<Row>> {
        let sql = self.to_select_sql()?;
        debug!(%sql, "executing select");
        match conn.execute(&sql)? {
            Executed::Rows(rows) => Ok(rows),
            Executed::Affected(_) => Ok(Vec::new()),
        }
    }

    /// Compile and execute an INSERT, returning the affected-row count.
    pub fn insert<I, C, V>(&self, conn: &impl Connection, values: I) -> QueryResult<u64>
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<Operand>,
    {
        let sql = self.to_insert_sql(values)?;
        debug!(%sql, "executing insert");
        Self::affected(conn.execute(&sql)?)
    }

    /// Compile and execute an UPDATE.
    pub fn update<I, C, V>(&self, conn: &impl Connection, values: I) -> QueryResult<u64>
    where
        I: IntoIterator<Item = (C, V)>,
        C: Into<String>,
        V: Into<Operand>,
    {
        let sql = self.to_update_sql(values)?;
        debug!(%sql, "executing update");
        Self::affected(conn.execute(&sql)?)
    }

    /// Compile and execute a DELETE.
    pub fn delete(&self, conn: &impl Connection) -> QueryResult<u64> {
        let sql = self.to_delete_sql()?;
        debug!(%sql, "executing delete");
        Self::affected(conn.execute(&sql)?)
    }

    /// Compile and execute a TRUNCATE.
    pub fn truncate(&self, conn: &impl Connection, table: &str) -> QueryResult<u64> {
        let sql = self.to_truncate_sql(table)?;
        debug!(%sql, "executing truncate");
        Self::affected(conn.execute(&sql)?)
    }

    /// The identifier generated by the most recent INSERT on `conn`.
    pub fn last_insert_id(&self, conn: &impl Connection) -> QueryResult<i64> {
        conn.insert_id()
    }

    fn affected(result: Executed) -> QueryResult<u64> {
        match result {
            Executed::Affected(n) => Ok(n),
            Executed::Rows(rows) => Ok(rows.len() as u64),
        }
    }
}

impl From<QueryBuilder> for QuerySpec {
    fn from(builder: QueryBuilder) -> Self {
        builder.into_spec()
    }
}

fn collect_values<I, C, V>(values: I) -> Vec<(String, Operand)>
where
    I: IntoIterator<Item = (C, V)>,
    C: Into<String>,
    V: Into<Operand>,
{
    values
        .into_iter()
        .map(|(col, val)| (col.into(), val.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::RecordingConnection;

    #[test]
    fn test_select_fields_replaces_wildcard() {
        let builder = QueryBuilder::new(Dialect::Generic).select_fields(["id"]);
        assert_eq!(builder.to_select_sql().unwrap(), "SELECT id");
    }

    #[test]
    fn test_select_fields_empty_restores_wildcard() {
        let builder = QueryBuilder::new(Dialect::Generic)
            .select_fields(["id", "name"])
            .select_fields(Vec::<&str>::new());
        assert!(builder.spec().is_wildcard());
    }

    #[test]
    fn test_add_field_displaces_wildcard() {
        let builder = QueryBuilder::new(Dialect::Generic).add_field("id").from("users");
        assert_eq!(builder.to_select_sql().unwrap(), "SELECT id FROM users");
    }

    #[test]
    fn test_child_shares_dialect() {
        let builder = QueryBuilder::new(Dialect::Mysql);
        assert_eq!(builder.child().dialect(), Dialect::Mysql);
    }

    #[test]
    fn test_get_delegates_compiled_text() {
        let conn = RecordingConnection::new(Executed::Rows(Vec::new()));
        let rows = QueryBuilder::new(Dialect::Mysql)
            .from("users")
            .where_("id", "=", 7)
            .get(&conn)
            .unwrap();
        assert!(rows.is_empty());
        assert_eq!(
            conn.statements(),
            vec!["SELECT * FROM `users` WHERE `id` = 7".to_string()]
        );
    }

    #[test]
    fn test_insert_delegates_and_counts() {
        let conn = RecordingConnection::affected(1);
        let n = QueryBuilder::new(Dialect::Mysql)
            .from("users")
            .insert(&conn, [("login", "kit"), ("password", "s3cret")])
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(
            conn.statements(),
            vec!["INSERT INTO `users` (`login`,`password`) VALUES ('kit','s3cret')".to_string()]
        );
    }

    #[test]
    fn test_update_without_where_is_refused() {
        let builder = QueryBuilder::new(Dialect::Mysql).from("users");
        let err = builder.to_update_sql([("age", 30)]).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_update_without_where_allowed_explicitly() {
        let sql = QueryBuilder::new(Dialect::Mysql)
            .from("users")
            .allow_full_update()
            .to_update_sql([("age", 30)])
            .unwrap();
        assert_eq!(sql, "UPDATE `users` SET `age` = 30");
    }

    #[test]
    fn test_update_with_where() {
        let conn = RecordingConnection::affected(2);
        let n = QueryBuilder::new(Dialect::Mysql)
            .from("users")
            .where_("age", "<", 18)
            .update(&conn, [("status", "minor")])
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(
            conn.statements(),
            vec!["UPDATE `users` SET `status` = 'minor' WHERE `age` < 18".to_string()]
        );
    }

    #[test]
    fn test_delete_ignores_field_list() {
        let sql = QueryBuilder::new(Dialect::Mysql)
            .select_fields(["id", "name"])
            .from("users")
            .where_("id", "=", 3)
            .to_delete_sql()
            .unwrap();
        assert_eq!(sql, "DELETE FROM `users` WHERE `id` = 3");
    }

    #[test]
    fn test_truncate_is_independent_of_state() {
        let sql = QueryBuilder::new(Dialect::Mysql)
            .from("users")
            .where_("id", "=", 1)
            .to_truncate_sql("sessions")
            .unwrap();
        assert_eq!(sql, "TRUNCATE TABLE `sessions`");
    }

    #[test]
    fn test_last_insert_id_passthrough() {
        let conn = RecordingConnection::affected(1);
        let builder = QueryBuilder::new(Dialect::Mysql).from("users");
        builder.insert(&conn, [("login", "kit")]).unwrap();
        assert_eq!(builder.last_insert_id(&conn).unwrap(), 1);
    }
}
