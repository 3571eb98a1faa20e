//! # quarry
//!
//! A fluent, dialect-aware SQL query builder and grammar compiler.
//!
//! ## Features
//!
//! - **Fluent building**: chainable methods accumulate a query
//!   specification; nothing executes until a terminal call
//! - **Dialect grammars**: a base grammar defines clause ordering and
//!   generic quoting, dialects override identifier quoting (MySQL
//!   backticks included)
//! - **Deterministic output**: compiling the same specification twice
//!   yields byte-identical SQL
//! - **Deferred validation**: malformed aggregates, BETWEEN arity, and
//!   missing target tables error at compile time, not mid-chain
//! - **Safe defaults**: UPDATE requires WHERE unless explicitly allowed
//! - **Subqueries everywhere**: field lists, FROM, predicates, INSERT
//!   values, and UNION entries can nest a whole query
//!
//! ## Query builder
//!
//! ```
//! use quarry::{Dialect, query};
//!
//! let sql = query(Dialect::Mysql)
//!     .select_fields(["id", "name"])
//!     .from("users")
//!     .where_("age", ">", 18)
//!     .order_by("name")
//!     .limit(10)
//!     .to_select_sql()
//!     .unwrap();
//! assert_eq!(
//!     sql,
//!     "SELECT `id`,`name` FROM `users` WHERE `age` > 18 ORDER BY `name` LIMIT 10"
//! );
//! ```

pub mod builder;
pub mod client;
pub mod condition;
pub mod error;
pub mod expr;
pub mod grammar;
pub mod spec;
pub mod value;

pub use builder::QueryBuilder;
pub use client::{Connection, Executed, Row};
pub use condition::{CondNode, Condition, Connector, Operand};
pub use error::{QueryError, QueryResult};
pub use expr::{FieldExpr, JoinOn, JoinSpec, JoinType, OrderSpec, SortDir, TableExpr, UnionSpec};
pub use grammar::{Dialect, GenericGrammar, Grammar, MysqlGrammar};
pub use spec::QuerySpec;
pub use value::Value;

/// Start a builder for the given dialect.
pub fn query(dialect: Dialect) -> QueryBuilder {
    QueryBuilder::new(dialect)
}
