//! Compilation of query specifications into SQL text.
//!
//! The base compiler lives in [`Grammar`]'s default methods: clause
//! ordering, predicate and join rendering, and the aggregate-call path are
//! shared by every dialect. A dialect overrides only the quoting hooks it
//! changes. Compilation is pure: the same specification and dialect always
//! produce identical text, and the spec is never mutated.

mod call;
mod mysql;

pub use mysql::MysqlGrammar;

use crate::condition::{CondNode, Condition, Operand};
use crate::error::{QueryError, QueryResult};
use crate::expr::{FieldExpr, JoinOn, JoinSpec, SortDir, TableExpr};
use crate::spec::QuerySpec;
use crate::value::Value;

static GENERIC: GenericGrammar = GenericGrammar;
static MYSQL: MysqlGrammar = MysqlGrammar;

/// Dialect selector resolved to a concrete grammar at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Base grammar: generic, non-escaped identifier quoting.
    #[default]
    Generic,
    /// MySQL: backtick-quoted identifiers with dotted-name splitting.
    Mysql,
}

impl Dialect {
    /// Resolve a dialect by name, case-insensitively.
    ///
    /// Unknown names fall back to the base grammar rather than failing;
    /// callers that want strictness can match on the enum directly.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("mysql") {
            Self::Mysql
        } else {
            Self::Generic
        }
    }

    /// The grammar implementation for this dialect.
    pub fn grammar(self) -> &'static dyn Grammar {
        match self {
            Self::Generic => &GENERIC,
            Self::Mysql => &MYSQL,
        }
    }
}

/// The base grammar. Quotes nothing: identifiers pass through verbatim
/// and only literals are escaped.
#[derive(Debug, Default)]
pub struct GenericGrammar;

impl Grammar for GenericGrammar {}

/// Compiles a [`QuerySpec`] into SQL text.
///
/// Default methods implement the dialect-independent compiler. Dialects
/// normally override just [`quote_field`](Grammar::quote_field) and
/// [`quote_table`](Grammar::quote_table).
pub trait Grammar: Sync {
    // ==================== quoting hooks ====================

    /// Render a scalar literal as SQL text.
    fn quote_value(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
        }
    }

    /// Quote a single field identifier. The wildcard is never quoted.
    fn quote_field(&self, name: &str) -> String {
        name.to_string()
    }

    /// Quote a table identifier.
    fn quote_table(&self, name: &str) -> String {
        name.to_string()
    }

    // ==================== statements ====================

    /// Compile a full SELECT statement.
    ///
    /// Clause order is fixed: DISTINCT, fields, FROM, JOIN, WHERE,
    /// GROUP BY, HAVING, ORDER BY, LIMIT, OFFSET, UNION. Absent clauses
    /// are omitted and the compiled clauses are joined with single spaces.
    fn compile_select(&self, spec: &QuerySpec) -> QueryResult<String> {
        let mut parts: Vec<String> = Vec::new();

        if spec.distinct {
            parts.push("DISTINCT".to_string());
        }

        let fields = spec
            .fields
            .iter()
            .map(|f| self.compile_field(f))
            .collect::<QueryResult<Vec<_>>>()?;
        parts.push(fields.join(","));

        if !spec.tables.is_empty() {
            let tables = spec
                .tables
                .iter()
                .map(|t| self.compile_table(t))
                .collect::<QueryResult<Vec<_>>>()?;
            parts.push(format!("FROM {}", tables.join(",")));
        }

        for join in &spec.joins {
            parts.push(self.compile_join(join)?);
        }

        if let Some(wheres) = self.compile_condition_list(&spec.wheres)? {
            parts.push(format!("WHERE {wheres}"));
        }

        if !spec.groups.is_empty() {
            let groups = spec
                .groups
                .iter()
                .map(|f| self.compile_field(f))
                .collect::<QueryResult<Vec<_>>>()?;
            parts.push(format!("GROUP BY {}", groups.join(",")));
        }

        if let Some(havings) = self.compile_condition_list(&spec.havings)? {
            parts.push(format!("HAVING {havings}"));
        }

        if !spec.orders.is_empty() {
            let orders = spec
                .orders
                .iter()
                .map(|o| {
                    let field = self.compile_field_name(&o.field)?;
                    Ok(match o.dir {
                        SortDir::Asc => field,
                        SortDir::Desc => format!("{field} DESC"),
                    })
                })
                .collect::<QueryResult<Vec<_>>>()?;
            parts.push(format!("ORDER BY {}", orders.join(",")));
        }

        if let Some(limit) = spec.limit {
            parts.push(format!("LIMIT {limit}"));
        }
        if let Some(offset) = spec.offset {
            parts.push(format!("OFFSET {offset}"));
        }

        for union in &spec.unions {
            let inner = self.compile_select(&union.spec)?;
            if union.all {
                parts.push(format!("UNION ALL {inner}"));
            } else {
                parts.push(format!("UNION {inner}"));
            }
        }

        Ok(format!("SELECT {}", parts.join(" ")))
    }

    /// Compile an INSERT statement from an ordered column/value mapping.
    ///
    /// A [`Operand::Query`] value compiles its slot to a parenthesized
    /// SELECT; list and range payloads have no INSERT rendering.
    fn compile_insert(
        &self,
        spec: &QuerySpec,
        values: &[(String, Operand)],
    ) -> QueryResult<String> {
        let table = spec
            .tables
            .first()
            .ok_or_else(|| QueryError::invalid_argument("INSERT requires a target table"))?;
        if values.is_empty() {
            return Err(QueryError::invalid_argument(
                "INSERT requires at least one column",
            ));
        }

        let cols = values
            .iter()
            .map(|(col, _)| self.quote_field(col))
            .collect::<Vec<_>>()
            .join(",");
        let vals = values
            .iter()
            .map(|(col, data)| self.compile_assignable(col, data))
            .collect::<QueryResult<Vec<_>>>()?
            .join(",");

        Ok(format!(
            "INSERT INTO {} ({cols}) VALUES ({vals})",
            self.compile_table(table)?
        ))
    }

    /// Compile an UPDATE statement.
    ///
    /// A set key containing commas assigns the same value to each named
    /// column. WHERE, ORDER BY, and LIMIT from the spec are appended.
    fn compile_update(
        &self,
        spec: &QuerySpec,
        values: &[(String, Operand)],
    ) -> QueryResult<String> {
        let table = spec
            .tables
            .first()
            .ok_or_else(|| QueryError::invalid_argument("UPDATE requires a target table"))?;
        if values.is_empty() {
            return Err(QueryError::invalid_argument(
                "UPDATE requires at least one assignment",
            ));
        }

        let mut assignments = Vec::new();
        for (key, data) in values {
            for col in key.split(',') {
                let col = col.trim();
                if col.is_empty() {
                    return Err(QueryError::invalid_expression(format!(
                        "empty column name in set key '{key}'"
                    )));
                }
                assignments.push(format!(
                    "{} = {}",
                    self.quote_field(col),
                    self.compile_assignable(col, data)?
                ));
            }
        }

        let mut parts = vec![format!(
            "UPDATE {} SET {}",
            self.compile_table(table)?,
            assignments.join(",")
        )];
        self.push_tail(spec, &mut parts)?;
        Ok(parts.join(" "))
    }

    /// Compile a DELETE statement. Field lists never participate.
    fn compile_delete(&self, spec: &QuerySpec) -> QueryResult<String> {
        let table = spec
            .tables
            .first()
            .ok_or_else(|| QueryError::invalid_argument("DELETE requires a target table"))?;

        let mut parts = vec![format!("DELETE FROM {}", self.compile_table(table)?)];
        self.push_tail(spec, &mut parts)?;
        Ok(parts.join(" "))
    }

    /// Compile a TRUNCATE statement, independent of any accumulated state.
    fn compile_truncate(&self, table: &str) -> QueryResult<String> {
        if table.trim().is_empty() {
            return Err(QueryError::invalid_argument(
                "TRUNCATE requires a target table",
            ));
        }
        Ok(format!("TRUNCATE TABLE {}", self.quote_table(table)))
    }

    // ==================== fragments ====================

    /// Compile one field-list entry.
    fn compile_field(&self, field: &FieldExpr) -> QueryResult<String> {
        match field {
            FieldExpr::Column(name) => self.compile_field_name(name),
            FieldExpr::Call { name, args } => self.compile_field_name(&format!("{name}({args})")),
            FieldExpr::Aliased(inner, alias) => Ok(format!(
                "{} AS {}",
                self.compile_field(inner)?,
                self.quote_value(&Value::Text(alias.clone()))
            )),
            FieldExpr::Subquery(spec) => Ok(format!("({})", self.compile_select(spec)?)),
        }
    }

    /// Compile a field given as text: call-shaped strings go through the
    /// call parser, everything else is quoted as an identifier.
    fn compile_field_name(&self, text: &str) -> QueryResult<String> {
        match call::parse(text)? {
            Some(call) => Ok(call.render(self)),
            None => Ok(self.quote_field(text)),
        }
    }

    /// Compile one table reference.
    fn compile_table(&self, table: &TableExpr) -> QueryResult<String> {
        match table {
            TableExpr::Name(name) => Ok(self.quote_table(name)),
            TableExpr::Aliased(inner, alias) => Ok(format!(
                "{} AS {}",
                self.compile_table(inner)?,
                self.quote_value(&Value::Text(alias.clone()))
            )),
            TableExpr::Subquery(spec) => Ok(format!("({})", self.compile_select(spec)?)),
        }
    }

    /// Compile one JOIN clause.
    fn compile_join(&self, join: &JoinSpec) -> QueryResult<String> {
        let table = self.compile_table(&join.table)?;
        let kind = join.kind.as_str();
        Ok(match &join.on {
            JoinOn::Natural => format!("NATURAL {kind} JOIN {table}"),
            JoinOn::Using(col) => {
                format!("{kind} JOIN {table} USING({})", self.quote_field(col))
            }
            JoinOn::On { left, op, right } => format!(
                "{kind} JOIN {table} ON({} {op} {})",
                self.compile_field_name(left)?,
                self.compile_field_name(right)?
            ),
        })
    }

    /// Compile an ordered condition list into one clause body.
    ///
    /// Returns `Ok(None)` when nothing compiles to output (the list is
    /// empty, or every node is an empty group). The connector of the first
    /// emitted node is suppressed; empty groups vanish without one.
    fn compile_condition_list(&self, conditions: &[Condition]) -> QueryResult<Option<String>> {
        let mut out = String::new();
        for condition in conditions {
            let Some(fragment) = self.compile_condition(condition)? else {
                continue;
            };
            if out.is_empty() {
                out = fragment;
            } else {
                out.push(' ');
                out.push_str(condition.connector.as_str());
                out.push(' ');
                out.push_str(&fragment);
            }
        }
        Ok(if out.is_empty() { None } else { Some(out) })
    }

    /// Compile one condition node. Groups compile to a parenthesized
    /// sub-clause; an empty group compiles to nothing.
    fn compile_condition(&self, condition: &Condition) -> QueryResult<Option<String>> {
        match &condition.node {
            CondNode::Group(nodes) => Ok(self
                .compile_condition_list(nodes)?
                .map(|body| format!("({body})"))),
            CondNode::Expr { field, op, data } => Ok(Some(format!(
                "{} {op} {}",
                self.compile_field_name(field)?,
                self.compile_operand(op, data)?
            ))),
        }
    }

    /// Compile a comparison payload.
    fn compile_operand(&self, op: &str, data: &Operand) -> QueryResult<String> {
        match data {
            Operand::Value(value) => Ok(self.quote_value(value)),
            Operand::Range(lo, hi) => {
                Ok(format!("{} AND {}", self.quote_value(lo), self.quote_value(hi)))
            }
            Operand::List(values) if is_between(op) => match values.as_slice() {
                [lo, hi] => Ok(format!(
                    "{} AND {}",
                    self.quote_value(lo),
                    self.quote_value(hi)
                )),
                _ => Err(QueryError::invalid_expression(format!(
                    "{op} requires exactly two values, got {}",
                    values.len()
                ))),
            },
            Operand::List(values) => {
                let list = values
                    .iter()
                    .map(|v| self.quote_value(v))
                    .collect::<Vec<_>>()
                    .join(",");
                Ok(format!("({list})"))
            }
            Operand::Query(spec) => Ok(format!("({})", self.compile_select(spec)?)),
        }
    }

    /// Render an INSERT/UPDATE value slot: a scalar literal or a
    /// parenthesized subquery.
    fn compile_assignable(&self, col: &str, data: &Operand) -> QueryResult<String> {
        match data {
            Operand::Value(value) => Ok(self.quote_value(value)),
            Operand::Query(spec) => Ok(format!("({})", self.compile_select(spec)?)),
            Operand::List(_) | Operand::Range(_, _) => Err(QueryError::invalid_expression(
                format!("column '{col}' cannot be assigned a list value"),
            )),
        }
    }

    /// Append the WHERE / ORDER BY / LIMIT tail shared by UPDATE and
    /// DELETE.
    fn push_tail(&self, spec: &QuerySpec, parts: &mut Vec<String>) -> QueryResult<()> {
        if let Some(wheres) = self.compile_condition_list(&spec.wheres)? {
            parts.push(format!("WHERE {wheres}"));
        }
        if !spec.orders.is_empty() {
            let orders = spec
                .orders
                .iter()
                .map(|o| {
                    let field = self.compile_field_name(&o.field)?;
                    Ok(match o.dir {
                        SortDir::Asc => field,
                        SortDir::Desc => format!("{field} DESC"),
                    })
                })
                .collect::<QueryResult<Vec<_>>>()?;
            parts.push(format!("ORDER BY {}", orders.join(",")));
        }
        if let Some(limit) = spec.limit {
            parts.push(format!("LIMIT {limit}"));
        }
        Ok(())
    }
}

/// Whether an operator takes the `<lo> AND <hi>` payload shape.
fn is_between(op: &str) -> bool {
    op.to_ascii_uppercase().contains("BETWEEN")
}
