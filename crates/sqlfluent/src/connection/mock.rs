//! In-memory [`Connection`] for tests.

use super::{Connection, QueryOutput, Row};
use crate::error::{QbError, QbResult};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct State {
    expected: Vec<(String, Vec<Row>)>,
    next: usize,
    executed: Vec<String>,
}

/// A connection that records statements instead of running them.
///
/// With no expectations queued every statement resolves to an empty
/// [`QueryOutput`]. Once expectations are queued, each statement must match
/// the next expected SQL exactly; a mismatch is an execution error.
///
/// # Example
/// ```ignore
/// let conn = MockConnection::new();
/// conn.expect_query("select * from \"users\"").respond(vec![row]);
/// ```
#[derive(Debug, Default)]
pub struct MockConnection {
    state: Mutex<State>,
}

/// Handle returned by [`MockConnection::expect_query`].
#[derive(Debug)]
pub struct Expectation<'a> {
    conn: &'a MockConnection,
    index: usize,
}

impl Expectation<'_> {
    /// Rows returned when the expected statement runs.
    pub fn respond(self, rows: Vec<Row>) {
        if let Some(slot) = self.conn.state().expected.get_mut(self.index) {
            slot.1 = rows;
        }
    }
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue the next expected statement (resolved SQL text).
    pub fn expect_query(&self, sql: impl Into<String>) -> Expectation<'_> {
        let mut state = self.state();
        state.expected.push((sql.into(), Vec::new()));
        Expectation {
            conn: self,
            index: state.expected.len() - 1,
        }
    }

    /// Every statement executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.state().executed.clone()
    }

    /// Check if every queued expectation has been consumed.
    pub fn is_done(&self) -> bool {
        let state = self.state();
        state.next >= state.expected.len()
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn execute_query(&self, sql: &str) -> QbResult<QueryOutput> {
        let mut state = self.state();
        state.executed.push(sql.to_string());

        #[cfg(feature = "tracing")]
        tracing::trace!(target: "sqlfluent.sql", sql, "mock connection");

        if state.expected.is_empty() {
            return Ok(QueryOutput::default());
        }

        let index = state.next;
        let Some((expected, rows)) = state.expected.get(index).cloned() else {
            return Err(QbError::execution(format!("unexpected query: {sql}")));
        };
        if expected != sql {
            return Err(QbError::execution(format!(
                "unexpected query: expected `{expected}`, got `{sql}`"
            )));
        }
        state.next += 1;
        Ok(QueryOutput::from_rows(rows))
    }
}
