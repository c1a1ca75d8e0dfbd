//! Execution helpers layered on the builder's [`Connection`](crate::connection::Connection).
//!
//! Every helper compiles through the grammar, then hands SQL and flattened
//! bindings to the connection. Read helpers work on a copy of the builder so
//! the caller's query state is left as it was.

use super::{BindingCategory, Builder, Record};
use crate::clause::{Aggregate, OrderClause};
use crate::connection::{QueryOutput, Row};
use crate::error::QbResult;
use crate::ident::Ident;
use crate::value::Value;
use serde_json::{Map, Value as JsonValue};

/// Column name the aggregate result is selected as.
pub const AGGREGATE_COLUMN: &str = "aggregate";

impl Builder {
    // ==================== Reads ====================

    /// Execute the select and return every row.
    pub async fn get(&self) -> QbResult<Vec<Row>> {
        let compiled = self.compile_select()?;
        let output = self
            .connection
            .select(&compiled.sql, &compiled.bindings)
            .await?;
        Ok(output.rows)
    }

    /// Execute the select with `columns` unless a select list was already set.
    pub async fn get_columns<C: Into<Ident>>(
        &self,
        columns: impl IntoIterator<Item = C>,
    ) -> QbResult<Vec<Row>> {
        if !self.columns.is_empty() {
            return self.get().await;
        }
        let mut query = self.clone();
        query.select(columns);
        query.get().await
    }

    /// First row of the result, if any.
    pub async fn first(&self) -> QbResult<Option<Row>> {
        let mut query = self.clone();
        query.take(1);
        Ok(query.get().await?.into_iter().next())
    }

    /// Row whose `id` equals `id`.
    pub async fn find(&self, id: impl Into<Value>) -> QbResult<Option<Row>> {
        let mut query = self.clone();
        query.where_eq("id", id);
        query.first().await
    }

    /// A single column of the first row.
    pub async fn value(&self, column: impl Into<Ident>) -> QbResult<Option<JsonValue>> {
        let column = column.into();
        let key = result_key(&column);
        let mut query = self.clone();
        query.select([column]);
        Ok(query
            .first()
            .await?
            .and_then(|mut row| key.and_then(|k| row.remove(&k))))
    }

    /// Alias of [`Builder::value`].
    pub async fn pluck(&self, column: impl Into<Ident>) -> QbResult<Option<JsonValue>> {
        self.value(column).await
    }

    /// One column of every row.
    ///
    /// A leading `table.` qualifier is stripped before reading the column
    /// out of each row.
    pub async fn lists(&self, column: impl Into<Ident>) -> QbResult<Vec<JsonValue>> {
        let column = column.into();
        let key = result_key(&column);
        let mut query = self.clone();
        query.select([column]);
        let rows = query.get().await?;
        Ok(rows
            .into_iter()
            .map(|mut row| {
                key.as_ref()
                    .and_then(|k| row.remove(k))
                    .unwrap_or(JsonValue::Null)
            })
            .collect())
    }

    /// One column of every row, keyed by another column.
    pub async fn lists_keyed(
        &self,
        column: impl Into<Ident>,
        key: impl Into<Ident>,
    ) -> QbResult<Map<String, JsonValue>> {
        let column = column.into();
        let key = key.into();
        let value_key = result_key(&column);
        let key_key = result_key(&key);

        let mut query = self.clone();
        query.select([column, key]);
        let rows = query.get().await?;

        let mut out = Map::new();
        for mut row in rows {
            let k = key_key
                .as_ref()
                .and_then(|k| row.get(k))
                .map(json_key)
                .unwrap_or_default();
            let v = value_key
                .as_ref()
                .and_then(|k| row.remove(k))
                .unwrap_or(JsonValue::Null);
            out.insert(k, v);
        }
        Ok(out)
    }

    // ==================== Aggregates ====================

    /// Run `select function(columns) as aggregate` and return the value.
    ///
    /// The select list, order, limit and offset of this query are dropped
    /// for the aggregate.
    pub async fn aggregate<C: Into<Ident>>(
        &self,
        function: &str,
        columns: impl IntoIterator<Item = C>,
    ) -> QbResult<Option<JsonValue>> {
        let mut query = self.clone();
        query.columns.clear();
        query.bindings.set(BindingCategory::Select, Vec::new());
        query.limit = None;
        query.offset = None;
        if query.unions.is_empty() {
            query.orders.clear();
            query.bindings.set(BindingCategory::Order, Vec::new());
        } else {
            // Union member bindings share the order category with raw orders.
            query
                .orders
                .retain(|order| matches!(order, OrderClause::Raw { .. }));
        }
        query.aggregate = Some(Aggregate {
            function: function.to_string(),
            columns: columns.into_iter().map(Into::into).collect(),
        });
        Ok(query
            .get()
            .await?
            .into_iter()
            .next()
            .and_then(|mut row| row.remove(AGGREGATE_COLUMN)))
    }

    /// Number of matching rows.
    pub async fn count(&self) -> QbResult<i64> {
        let value = self.aggregate("count", ["*"]).await?;
        Ok(value.as_ref().and_then(json_i64).unwrap_or(0))
    }

    pub async fn max(&self, column: impl Into<Ident>) -> QbResult<Option<JsonValue>> {
        let column: Ident = column.into();
        self.aggregate("max", [column]).await
    }

    pub async fn min(&self, column: impl Into<Ident>) -> QbResult<Option<JsonValue>> {
        let column: Ident = column.into();
        self.aggregate("min", [column]).await
    }

    pub async fn sum(&self, column: impl Into<Ident>) -> QbResult<Option<JsonValue>> {
        let column: Ident = column.into();
        self.aggregate("sum", [column]).await
    }

    pub async fn avg(&self, column: impl Into<Ident>) -> QbResult<Option<JsonValue>> {
        let column: Ident = column.into();
        self.aggregate("avg", [column]).await
    }

    /// Check if any row matches.
    pub async fn exists(&self) -> QbResult<bool> {
        Ok(self.count().await? > 0)
    }

    // ==================== Writes ====================

    /// Insert a batch of records.
    ///
    /// An empty batch succeeds without touching the connection.
    pub async fn insert(&self, records: &[Record]) -> QbResult<QueryOutput> {
        if records.is_empty() {
            return Ok(QueryOutput::default());
        }
        let compiled = self.compile_insert(records)?;
        self.connection
            .insert(&compiled.sql, &compiled.bindings)
            .await
    }

    pub async fn insert_one(&self, record: Record) -> QbResult<QueryOutput> {
        self.insert(std::slice::from_ref(&record)).await
    }

    /// Update the matched rows.
    pub async fn update(&self, values: &Record) -> QbResult<QueryOutput> {
        let compiled = self.compile_update(values)?;
        self.connection
            .statement(&compiled.sql, &compiled.bindings)
            .await
    }

    /// Delete the matched rows.
    pub async fn delete(&self) -> QbResult<QueryOutput> {
        let compiled = self.compile_delete()?;
        self.connection
            .statement(&compiled.sql, &compiled.bindings)
            .await
    }

    /// Remove every row of the table.
    pub async fn truncate(&self) -> QbResult<QueryOutput> {
        let compiled = self.compile_truncate()?;
        self.connection
            .statement(&compiled.sql, &compiled.bindings)
            .await
    }
}

/// Row key a selected column comes back under.
fn result_key(column: &Ident) -> Option<String> {
    let name = column.unqualified();
    let name = name.as_name()?;
    match crate::ident::split_alias(name) {
        Some((_, alias)) => Some(alias.to_string()),
        None => Some(name.to_string()),
    }
}

fn json_key(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_i64(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn result_key_strips_table_and_alias() {
        assert_eq!(result_key(&Ident::from("users.email")), Some("email".into()));
        assert_eq!(result_key(&Ident::from("email as mail")), Some("mail".into()));
        assert_eq!(result_key(&Ident::from(crate::raw("count(*)"))), None);
    }

    #[test]
    fn json_i64_reads_numbers_and_text() {
        assert_eq!(json_i64(&json!(3)), Some(3));
        assert_eq!(json_i64(&json!("42")), Some(42));
        assert_eq!(json_i64(&json!(null)), None);
    }

    #[test]
    fn json_key_uses_plain_strings() {
        assert_eq!(json_key(&json!("a")), "a");
        assert_eq!(json_key(&json!(7)), "7");
    }
}
