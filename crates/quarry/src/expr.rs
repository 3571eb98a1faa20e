//! Expression model: the field, table, join, order, and union shapes a
//! query specification is assembled from.
//!
//! Every variant here is plain data. Compilation to SQL text lives in the
//! [`Grammar`](crate::grammar::Grammar) trait; this module only describes
//! structure, including recursive subquery nesting.

use crate::spec::QuerySpec;

/// One entry in a SELECT field list (or GROUP BY list).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldExpr {
    /// A plain column name, possibly dotted (`table.column`).
    Column(String),
    /// An aggregate or function call, e.g. `SUM(price)`. The argument text
    /// is kept raw and parsed by the grammar at compile time.
    Call { name: String, args: String },
    /// A compiled expression with an alias: `<expr> AS <alias>`.
    Aliased(Box<FieldExpr>, String),
    /// A nested query compiled as a parenthesized SELECT.
    Subquery(Box<QuerySpec>),
}

impl FieldExpr {
    /// A plain column reference. Call syntax (`name(...)`) is detected and
    /// stored as [`FieldExpr::Call`].
    pub fn col(name: &str) -> Self {
        Self::from(name)
    }

    /// Alias an expression: `expr AS alias`.
    pub fn aliased(expr: impl Into<FieldExpr>, alias: &str) -> Self {
        FieldExpr::Aliased(Box::new(expr.into()), alias.to_string())
    }

    /// Embed a finished specification as a subquery field.
    pub fn subquery(spec: QuerySpec) -> Self {
        FieldExpr::Subquery(Box::new(spec))
    }
}

impl From<&str> for FieldExpr {
    fn from(s: &str) -> Self {
        // `name(args)` becomes a call; anything else is a column. Malformed
        // call-ish text stays a column and fails at compile time.
        if let Some(open) = s.find('(') {
            if s.ends_with(')') && open > 0 {
                let name = &s[..open];
                let args = &s[open + 1..s.len() - 1];
                return FieldExpr::Call {
                    name: name.to_string(),
                    args: args.to_string(),
                };
            }
        }
        FieldExpr::Column(s.to_string())
    }
}

impl From<String> for FieldExpr {
    fn from(s: String) -> Self {
        FieldExpr::from(s.as_str())
    }
}

impl From<(&str, &str)> for FieldExpr {
    fn from((expr, alias): (&str, &str)) -> Self {
        FieldExpr::aliased(expr, alias)
    }
}

/// A table reference in FROM, JOIN, INSERT, UPDATE, or DELETE position.
#[derive(Debug, Clone, PartialEq)]
pub enum TableExpr {
    /// A plain table name.
    Name(String),
    /// An aliased table: `<table> AS <alias>`.
    Aliased(Box<TableExpr>, String),
    /// A nested query compiled as a parenthesized SELECT.
    Subquery(Box<QuerySpec>),
}

impl TableExpr {
    /// Alias a table expression.
    pub fn aliased(table: impl Into<TableExpr>, alias: &str) -> Self {
        TableExpr::Aliased(Box::new(table.into()), alias.to_string())
    }

    /// Embed a finished specification as a derived table.
    pub fn subquery(spec: QuerySpec) -> Self {
        TableExpr::Subquery(Box::new(spec))
    }
}

impl From<&str> for TableExpr {
    fn from(s: &str) -> Self {
        TableExpr::Name(s.to_string())
    }
}

impl From<String> for TableExpr {
    fn from(s: String) -> Self {
        TableExpr::Name(s)
    }
}

impl From<(&str, &str)> for TableExpr {
    fn from((table, alias): (&str, &str)) -> Self {
        TableExpr::aliased(table, alias)
    }
}

/// Join flavor keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
        }
    }
}

/// How a join is constrained.
///
/// A single column name means `USING(col)`; a `(left, op, right)` triple
/// means `ON(left op right)`; no columns at all is a natural join.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOn {
    Natural,
    Using(String),
    On {
        left: String,
        op: String,
        right: String,
    },
}

impl From<&str> for JoinOn {
    fn from(col: &str) -> Self {
        JoinOn::Using(col.to_string())
    }
}

impl From<(&str, &str, &str)> for JoinOn {
    fn from((left, op, right): (&str, &str, &str)) -> Self {
        JoinOn::On {
            left: left.to_string(),
            op: op.to_string(),
            right: right.to_string(),
        }
    }
}

/// One JOIN clause entry.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    pub table: TableExpr,
    pub kind: JoinType,
    pub on: JoinOn,
}

/// Sort direction for ORDER BY entries. Ascending is the default and
/// renders without a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSpec {
    pub field: String,
    pub dir: SortDir,
}

/// One UNION entry appended after the main SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionSpec {
    pub spec: QuerySpec,
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_column() {
        assert_eq!(FieldExpr::from("id"), FieldExpr::Column("id".to_string()));
        assert_eq!(
            FieldExpr::from("orders.id"),
            FieldExpr::Column("orders.id".to_string())
        );
    }

    #[test]
    fn test_field_from_call() {
        assert_eq!(
            FieldExpr::from("SUM(price)"),
            FieldExpr::Call {
                name: "SUM".to_string(),
                args: "price".to_string(),
            }
        );
        assert_eq!(
            FieldExpr::from("ROUND(AVG(price),2)"),
            FieldExpr::Call {
                name: "ROUND".to_string(),
                args: "AVG(price),2".to_string(),
            }
        );
    }

    #[test]
    fn test_field_malformed_call_stays_column() {
        // Unbalanced text is kept verbatim; the grammar rejects it later.
        assert_eq!(
            FieldExpr::from("SUM(price"),
            FieldExpr::Column("SUM(price".to_string())
        );
    }

    #[test]
    fn test_field_alias_pair() {
        assert_eq!(
            FieldExpr::from(("id", "user_id")),
            FieldExpr::Aliased(
                Box::new(FieldExpr::Column("id".to_string())),
                "user_id".to_string()
            )
        );
    }

    #[test]
    fn test_join_on_conversions() {
        assert_eq!(JoinOn::from("user_id"), JoinOn::Using("user_id".to_string()));
        assert_eq!(
            JoinOn::from(("users.id", "=", "profiles.user_id")),
            JoinOn::On {
                left: "users.id".to_string(),
                op: "=".to_string(),
                right: "profiles.user_id".to_string(),
            }
        );
    }
}
