//! The tree-shaped description of one SQL statement under construction.

use crate::condition::Condition;
use crate::expr::{FieldExpr, JoinSpec, OrderSpec, TableExpr, UnionSpec};

/// Everything the builder has accumulated for one statement.
///
/// A specification is a finite tree: any field, table, condition operand,
/// or union entry may own a nested `QuerySpec`. The grammar reads a spec,
/// never mutates it, so compiling the same spec twice yields identical
/// text.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub distinct: bool,
    pub fields: Vec<FieldExpr>,
    pub tables: Vec<TableExpr>,
    pub joins: Vec<JoinSpec>,
    pub wheres: Vec<Condition>,
    pub groups: Vec<FieldExpr>,
    pub havings: Vec<Condition>,
    pub orders: Vec<OrderSpec>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub unions: Vec<UnionSpec>,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            distinct: false,
            // The field list is never empty: a fresh spec selects `*`.
            fields: vec![FieldExpr::Column("*".to_string())],
            tables: Vec::new(),
            joins: Vec::new(),
            wheres: Vec::new(),
            groups: Vec::new(),
            havings: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            unions: Vec::new(),
        }
    }
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the field list is still the wildcard default.
    pub fn is_wildcard(&self) -> bool {
        matches!(self.fields.as_slice(), [FieldExpr::Column(c)] if c == "*")
    }

    /// Append a union entry.
    pub fn push_union(&mut self, spec: QuerySpec, all: bool) {
        self.unions.push(UnionSpec { spec, all });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selects_wildcard() {
        let spec = QuerySpec::new();
        assert!(spec.is_wildcard());
        assert!(!spec.distinct);
        assert!(spec.tables.is_empty());
        assert_eq!(spec.limit, None);
    }
}
