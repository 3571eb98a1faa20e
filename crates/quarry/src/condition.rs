//! Predicate nodes for WHERE and HAVING clauses.
//!
//! A clause is an ordered list of [`Condition`]s chained by boolean
//! connectors. A node is either a plain `field op data` comparison or a
//! nested group that compiles to a parenthesized sub-clause, so arbitrary
//! AND/OR trees can be expressed.

use crate::spec::QuerySpec;
use crate::value::Value;

/// Boolean connector between adjacent conditions.
///
/// The connector of the first compiled node of a clause is suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// The right-hand payload of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A scalar literal (including NULL).
    Value(Value),
    /// A parenthesized comma list, e.g. for IN.
    List(Vec<Value>),
    /// A `<lo> AND <hi>` pair for BETWEEN-family operators.
    Range(Value, Value),
    /// A nested query compiled as a parenthesized SELECT.
    Query(Box<QuerySpec>),
}

impl Operand {
    /// NULL payload (`IS NULL` / `IS NOT NULL` comparisons).
    pub fn null() -> Self {
        Operand::Value(Value::Null)
    }

    /// Embed a finished specification as a scalar/IN/EXISTS subquery.
    pub fn query(spec: QuerySpec) -> Self {
        Operand::Query(Box::new(spec))
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<&str> for Operand {
    fn from(v: &str) -> Self {
        Operand::Value(v.into())
    }
}

impl From<String> for Operand {
    fn from(v: String) -> Self {
        Operand::Value(v.into())
    }
}

impl From<i64> for Operand {
    fn from(v: i64) -> Self {
        Operand::Value(v.into())
    }
}

impl From<i32> for Operand {
    fn from(v: i32) -> Self {
        Operand::Value(v.into())
    }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Operand::Value(v.into())
    }
}

impl From<bool> for Operand {
    fn from(v: bool) -> Self {
        Operand::Value(v.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Operand {
    fn from(v: Vec<T>) -> Self {
        Operand::List(v.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Operand {
    fn from((lo, hi): (A, B)) -> Self {
        Operand::Range(lo.into(), hi.into())
    }
}

/// The body of a condition node.
#[derive(Debug, Clone, PartialEq)]
pub enum CondNode {
    /// `field op data`. The field may be a dotted or call-shaped string;
    /// the grammar quotes it accordingly.
    Expr {
        field: String,
        op: String,
        data: Operand,
    },
    /// A nested group compiled as a single parenthesized operand of the
    /// outer clause. An empty group compiles to nothing.
    Group(Vec<Condition>),
}

/// One boolean-connected predicate node.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub connector: Connector,
    pub node: CondNode,
}

impl Condition {
    /// A plain comparison node.
    pub fn expr(
        connector: Connector,
        field: impl Into<String>,
        op: impl Into<String>,
        data: impl Into<Operand>,
    ) -> Self {
        Condition {
            connector,
            node: CondNode::Expr {
                field: field.into(),
                op: op.into(),
                data: data.into(),
            },
        }
    }

    /// A nested group node.
    pub fn group(connector: Connector, nodes: Vec<Condition>) -> Self {
        Condition {
            connector,
            node: CondNode::Group(nodes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_conversions() {
        assert_eq!(Operand::from(18i32), Operand::Value(Value::Int(18)));
        assert_eq!(
            Operand::from(vec![1i64, 2, 3]),
            Operand::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        assert_eq!(
            Operand::from((18i32, 65i32)),
            Operand::Range(Value::Int(18), Value::Int(65))
        );
        assert_eq!(Operand::null(), Operand::Value(Value::Null));
    }

    #[test]
    fn test_connector_text() {
        assert_eq!(Connector::And.as_str(), "AND");
        assert_eq!(Connector::Or.as_str(), "OR");
    }
}
