//! Execution boundary.
//!
//! A [`Connection`] runs SQL text and returns rows as JSON maps. The builder
//! hands it parameterized SQL plus positional bindings; the provided methods
//! resolve the bindings into the SQL text with [`resolve_bindings`] and call
//! [`Connection::execute_query`].

pub mod config;
pub mod mock;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use config::ConnectionOptions;
pub use mock::MockConnection;
#[cfg(feature = "postgres")]
pub use postgres::{PgConnection, connect};

use crate::error::{QbError, QbResult};
use crate::value::Value;
use async_trait::async_trait;
use serde::Serialize;

/// One result row, keyed by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Result column descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Output of one executed statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryOutput {
    pub rows: Vec<Row>,
    pub fields: Vec<Field>,
    /// Rows touched by a write, when the driver reports it.
    pub affected_rows: Option<u64>,
}

impl QueryOutput {
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let fields = rows
            .first()
            .map(|row| row.keys().map(Field::new).collect())
            .unwrap_or_default();
        Self {
            rows,
            fields,
            affected_rows: None,
        }
    }
}

/// Something that can execute SQL text.
///
/// Implementors provide [`Connection::execute_query`]; the remaining methods
/// resolve bindings and delegate to it.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Execute fully resolved SQL text.
    async fn execute_query(&self, sql: &str) -> QbResult<QueryOutput>;

    /// Truncate logged SQL to this many bytes. `None` disables truncation.
    fn max_sql_log_length(&self) -> Option<usize> {
        Some(DEFAULT_MAX_SQL_LOG_LENGTH)
    }

    async fn select(&self, sql: &str, bindings: &[Value]) -> QbResult<QueryOutput> {
        log_statement("select", sql, bindings, self.max_sql_log_length());
        let sql = resolve_bindings(sql, bindings)?;
        self.execute_query(&sql).await
    }

    async fn insert(&self, sql: &str, bindings: &[Value]) -> QbResult<QueryOutput> {
        log_statement("insert", sql, bindings, self.max_sql_log_length());
        let sql = resolve_bindings(sql, bindings)?;
        self.execute_query(&sql).await
    }

    /// Any other statement: update, delete, truncate.
    async fn statement(&self, sql: &str, bindings: &[Value]) -> QbResult<QueryOutput> {
        log_statement("statement", sql, bindings, self.max_sql_log_length());
        let sql = resolve_bindings(sql, bindings)?;
        self.execute_query(&sql).await
    }
}

/// Default SQL truncation for log events.
pub const DEFAULT_MAX_SQL_LOG_LENGTH: usize = 200;

#[cfg(feature = "tracing")]
fn log_statement(kind: &str, sql: &str, bindings: &[Value], max_len: Option<usize>) {
    let sql = match max_len {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    };
    tracing::debug!(
        target: "sqlfluent.sql",
        kind,
        bindings = bindings.len(),
        sql = %sql,
        "sqlfluent sql"
    );
}

#[cfg(not(feature = "tracing"))]
fn log_statement(_kind: &str, _sql: &str, _bindings: &[Value], _max_len: Option<usize>) {}

/// Cut `sql` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Replace each `?` placeholder with the literal of the matching binding.
///
/// Placeholders inside `'...'`, `"..."` and `` `...` `` are left alone.
/// Fails with [`QbError::BindingMismatch`] when the placeholder count and
/// the binding count differ.
///
/// Text is quoted per [`Value::to_literal`], which does not escape
/// backslashes. A MySQL server without `NO_BACKSLASH_ESCAPES` reads `\` as an
/// escape, so MySQL connections should bind parameters natively instead.
pub fn resolve_bindings(sql: &str, bindings: &[Value]) -> QbResult<String> {
    let mut out = String::with_capacity(sql.len() + bindings.len() * 8);
    let mut quote: Option<char> = None;
    let mut placeholders = 0;

    for c in sql.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                out.push(c);
            }
            None => match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    out.push(c);
                }
                '?' => {
                    if let Some(value) = bindings.get(placeholders) {
                        out.push_str(&value.to_literal());
                    }
                    placeholders += 1;
                }
                _ => out.push(c),
            },
        }
    }

    if placeholders != bindings.len() {
        return Err(QbError::BindingMismatch {
            placeholders,
            bindings: bindings.len(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_in_order() {
        let sql = resolve_bindings(
            r#"select * from "users" where "id" = ? and "name" = ?"#,
            &[Value::from(1), Value::from("o'neil")],
        )
        .unwrap();
        assert_eq!(sql, r#"select * from "users" where "id" = 1 and "name" = 'o''neil'"#);
    }

    #[test]
    fn skips_quoted_question_marks() {
        let sql = resolve_bindings(
            "select '?' as q, `a?b` from t where x = ?",
            &[Value::from(true)],
        )
        .unwrap();
        assert_eq!(sql, "select '?' as q, `a?b` from t where x = TRUE");
    }

    #[test]
    fn mismatch_is_an_error() {
        let err = resolve_bindings("x = ? and y = ?", &[Value::from(1)]).unwrap_err();
        assert!(matches!(
            err,
            QbError::BindingMismatch {
                placeholders: 2,
                bindings: 1
            }
        ));
        assert!(resolve_bindings("x = 1", &[Value::from(1)]).is_err());
    }

    #[test]
    fn backslashes_are_not_escaped() {
        let sql = resolve_bindings("x = ?", &[Value::from(r"a\'b")]).unwrap();
        assert_eq!(sql, r"x = 'a\''b'");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("héllo", 2), "h");
        assert_eq!(truncate_sql_bytes("abc", 10), "abc");
    }

    #[test]
    fn output_fields_follow_first_row() {
        let mut row = Row::new();
        row.insert("id".into(), serde_json::json!(1));
        let out = QueryOutput::from_rows(vec![row]);
        assert_eq!(out.fields, vec![Field::new("id")]);
    }
}
