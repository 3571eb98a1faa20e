//! Execution collaborator boundary.
//!
//! The compiler produces SQL text and hands it across this trait; it owns
//! no wire protocol, pooling, or row mapping. Implementations wrap
//! whatever driver the application uses and report failures through
//! [`QueryError::Execution`](crate::error::QueryError), which the core
//! propagates unchanged.

use crate::error::QueryResult;
use crate::value::Value;

/// One result row: column name / value pairs in result order.
pub type Row = Vec<(String, Value)>;

/// What a statement execution produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Executed {
    /// A result set, for SELECT.
    Rows(Vec<Row>),
    /// An affected-row count, for INSERT/UPDATE/DELETE/TRUNCATE.
    Affected(u64),
}

/// A handle capable of executing finished SQL text.
pub trait Connection {
    /// Execute one statement and return its result.
    fn execute(&self, sql: &str) -> QueryResult<Executed>;

    /// The identifier generated by the most recent INSERT on this handle.
    fn insert_id(&self) -> QueryResult<i64>;

    /// The ordered column names of a table. Consumed by higher layers
    /// through the same handle, not by the compiler.
    fn column_list(&self, table: &str) -> QueryResult<Vec<String>>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::cell::RefCell;

    /// Records every statement it receives and replies with a canned
    /// result.
    pub(crate) struct RecordingConnection {
        pub log: RefCell<Vec<String>>,
        pub reply: Executed,
    }

    impl RecordingConnection {
        pub fn new(reply: Executed) -> Self {
            Self {
                log: RefCell::new(Vec::new()),
                reply,
            }
        }

        pub fn affected(n: u64) -> Self {
            Self::new(Executed::Affected(n))
        }

        pub fn statements(&self) -> Vec<String> {
            self.log.borrow().clone()
        }
    }

    impl Connection for RecordingConnection {
        fn execute(&self, sql: &str) -> QueryResult<Executed> {
            self.log.borrow_mut().push(sql.to_string());
            Ok(self.reply.clone())
        }

        fn insert_id(&self) -> QueryResult<i64> {
            Ok(1)
        }

        fn column_list(&self, _table: &str) -> QueryResult<Vec<String>> {
            Ok(vec!["id".to_string()])
        }
    }
}
