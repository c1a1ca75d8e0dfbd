//! MySQL grammar.
//!
//! Differences from [`AnsiGrammar`](super::AnsiGrammar):
//! - identifiers are quoted with backticks
//! - `for update` / `lock in share mode` row locks
//! - unions are parenthesized member by member
//! - update and delete accept `order by` and `limit`; delete accepts joins

use super::{Component, Grammar, ansi};
use crate::builder::{Builder, Record};
use crate::clause::{Lock, Union};
use crate::error::QbResult;

#[derive(Debug, Clone, Default)]
pub struct MySqlGrammar {
    table_prefix: String,
}

impl MySqlGrammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Append ` order by ...` and ` limit n` when the query has them.
    fn append_order_and_limit(&self, sql: &mut String, query: &Builder) {
        if !query.orders().is_empty() {
            sql.push(' ');
            sql.push_str(&self.compile_orders(query.orders()));
        }
        if let Some(limit) = query.get_limit() {
            sql.push(' ');
            sql.push_str(&self.compile_limit(limit));
        }
    }
}

impl Grammar for MySqlGrammar {
    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn set_table_prefix(&mut self, prefix: &str) {
        self.table_prefix = prefix.to_string();
    }

    fn box_clone(&self) -> Box<dyn Grammar> {
        Box::new(self.clone())
    }

    fn quote_char(&self) -> char {
        '`'
    }

    /// `(<select>) union (<select>) ...` when unions are present.
    fn compile_select(&self, query: &Builder) -> QbResult<String> {
        if query.unions().is_empty() {
            return ansi::compile_select(self, query);
        }

        let mut parts = Vec::with_capacity(Component::SELECT.len());
        for component in Component::SELECT {
            if component == Component::Unions {
                continue;
            }
            if let Some(sql) = self.compile_component(query, component)? {
                if !sql.is_empty() {
                    parts.push(sql);
                }
            }
        }
        let base = parts.join(" ");
        Ok(format!("({}) {}", base.trim(), self.compile_unions(query)?))
    }

    fn compile_union(&self, union: &Union) -> QbResult<String> {
        let joiner = if union.all { "union all" } else { "union" };
        Ok(format!("{joiner} ({})", self.compile_select(&union.query)?))
    }

    fn compile_lock(&self, lock: &Lock) -> String {
        match lock {
            Lock::Raw(sql) => sql.clone(),
            Lock::Exclusive => "for update".to_string(),
            Lock::Shared => "lock in share mode".to_string(),
        }
    }

    fn orders_writes(&self) -> bool {
        true
    }

    fn compile_update(&self, query: &Builder, values: &Record) -> QbResult<String> {
        let mut sql = ansi::compile_update(self, query, values)?;
        self.append_order_and_limit(&mut sql, query);
        Ok(sql.trim_end().to_string())
    }

    fn compile_delete(&self, query: &Builder) -> QbResult<String> {
        let table = self.wrap_table(ansi::require_table(query, "delete")?);
        let wheres = self.compile_wheres(query)?;

        let mut sql = if query.joins().is_empty() {
            format!("delete from {table} {wheres}")
        } else {
            let joins = self.compile_joins(query.joins());
            format!("delete {table} from {table} {joins} {wheres}")
        }
        .trim()
        .to_string();

        self.append_order_and_limit(&mut sql, query);
        Ok(sql)
    }
}
