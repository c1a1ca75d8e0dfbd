//! PostgreSQL connection over `tokio-postgres`.
//!
//! Statements arrive with their bindings already resolved into the SQL text,
//! so they run through the simple-query protocol. Values come back as text
//! and are returned as JSON strings (`NULL` as JSON null).

use super::{Connection, ConnectionOptions, Field, QueryOutput, Row};
use crate::builder::Builder;
use crate::error::{QbError, QbResult};
use crate::grammar::Dialect;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio_postgres::{Client, NoTls, SimpleQueryMessage};

/// A [`Connection`] backed by a `tokio_postgres::Client`.
pub struct PgConnection {
    client: Client,
    max_sql_log_length: Option<usize>,
}

impl std::fmt::Debug for PgConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgConnection")
            .field("max_sql_log_length", &self.max_sql_log_length)
            .finish_non_exhaustive()
    }
}

impl PgConnection {
    /// Wrap an already connected client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            max_sql_log_length: Some(super::DEFAULT_MAX_SQL_LOG_LENGTH),
        }
    }

    /// Connect with `NoTls` and drive the connection on a tokio task.
    pub async fn connect(options: &ConnectionOptions) -> QbResult<Self> {
        let url = options
            .url
            .as_deref()
            .ok_or_else(|| QbError::Connection("no database url configured".to_string()))?;

        let pg_config: tokio_postgres::Config = url
            .parse()
            .map_err(|e: tokio_postgres::Error| QbError::Connection(e.to_string()))?;

        let (client, connection) = pg_config.connect(NoTls).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                #[cfg(feature = "tracing")]
                tracing::error!(target: "sqlfluent.sql", error = %e, "postgres connection error");
                #[cfg(not(feature = "tracing"))]
                let _ = e;
            }
        });

        Ok(Self {
            client,
            max_sql_log_length: options.max_sql_log_length,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Connection for PgConnection {
    async fn execute_query(&self, sql: &str) -> QbResult<QueryOutput> {
        let messages = self.client.simple_query(sql).await?;

        let mut out = QueryOutput::default();
        for message in messages {
            match message {
                SimpleQueryMessage::Row(row) => {
                    if out.fields.is_empty() {
                        out.fields = row.columns().iter().map(|c| Field::new(c.name())).collect();
                    }
                    let mut map = Row::new();
                    for (i, column) in row.columns().iter().enumerate() {
                        let value = row
                            .get(i)
                            .map_or(JsonValue::Null, |s| JsonValue::String(s.to_string()));
                        map.insert(column.name().to_string(), value);
                    }
                    out.rows.push(map);
                }
                SimpleQueryMessage::CommandComplete(n) => out.affected_rows = Some(n),
                _ => {}
            }
        }
        Ok(out)
    }

    fn max_sql_log_length(&self) -> Option<usize> {
        self.max_sql_log_length
    }
}

/// Open a Postgres connection and return a [`Builder`] bound to it.
///
/// The adapter name is validated before any I/O. Only Postgres adapter names
/// are accepted since the connection speaks the Postgres protocol.
pub async fn connect(options: &ConnectionOptions) -> QbResult<Builder> {
    if options.dialect()? != Dialect::Ansi {
        return Err(QbError::UnsupportedAdapter(options.adapter.clone()));
    }
    let grammar = options.grammar()?;
    let connection = PgConnection::connect(options).await?;
    Ok(Builder::new(Arc::new(connection), grammar))
}
