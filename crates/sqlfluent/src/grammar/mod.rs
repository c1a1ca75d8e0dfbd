//! SQL grammars: compile a [`Builder`]'s state into SQL text.
//!
//! [`Grammar`] carries a default implementation for every compiler method.
//! Defaults delegate to the generic functions in [`ansi`] and [`wrap`], so a
//! dialect overrides only what differs and calls those functions directly
//! when it needs the default behavior.
//!
//! Grammars never touch bindings. Each compiler emits `?` wherever the
//! builder pushed a value, in the same left-to-right order.
//!
//! # Example
//! ```ignore
//! use sqlfluent::{Grammar, MySqlGrammar};
//!
//! let g = MySqlGrammar::new();
//! assert_eq!(g.wrap_value("some`table"), "`some``table`");
//! ```

pub mod ansi;
pub mod mysql;
pub mod wrap;

#[cfg(test)]
mod tests;

pub use ansi::AnsiGrammar;
pub use mysql::MySqlGrammar;

use crate::builder::{Builder, Record};
use crate::clause::{Aggregate, HavingClause, Lock, OrderClause, Union, WhereClause};
use crate::error::{QbError, QbResult};
use crate::ident::Ident;
use crate::join_clause::JoinClause;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// A select statement component, in compile order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Aggregate,
    Columns,
    From,
    Joins,
    Wheres,
    Groups,
    Havings,
    Orders,
    Limit,
    Offset,
    Unions,
    Lock,
}

impl Component {
    /// Every component, in the order fragments appear in a select.
    pub const SELECT: [Component; 12] = [
        Component::Aggregate,
        Component::Columns,
        Component::From,
        Component::Joins,
        Component::Wheres,
        Component::Groups,
        Component::Havings,
        Component::Orders,
        Component::Limit,
        Component::Offset,
        Component::Unions,
        Component::Lock,
    ];
}

/// Compiler from query state to SQL text for one dialect.
pub trait Grammar: Send + Sync + fmt::Debug {
    /// Prefix applied to every wrapped table reference.
    fn table_prefix(&self) -> &str;

    fn set_table_prefix(&mut self, prefix: &str);

    fn box_clone(&self) -> Box<dyn Grammar>;

    /// Identifier delimiter.
    fn quote_char(&self) -> char {
        '"'
    }

    // ==================== Wrapping ====================

    /// Quote a single identifier segment; `*` is left bare.
    fn wrap_value(&self, value: &str) -> String {
        wrap::quote(self.quote_char(), value)
    }

    /// Wrap a column reference (dotted and aliased forms included).
    fn wrap(&self, value: &Ident) -> String {
        wrap::wrap(self, value)
    }

    /// Wrap a table reference, applying the table prefix.
    fn wrap_table(&self, table: &Ident) -> String {
        wrap::wrap_table(self, table)
    }

    /// Wrap a list of columns and join them with `, `.
    fn columnize(&self, columns: &[Ident]) -> String {
        columns
            .iter()
            .map(|c| self.wrap(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `?` for bound values, the inlined SQL for raw expressions.
    fn parameter(&self, value: &Value) -> String {
        match value {
            Value::Raw(expr) => expr.value().to_string(),
            _ => "?".to_string(),
        }
    }

    fn parameterize(&self, values: &[Value]) -> String {
        values
            .iter()
            .map(|v| self.parameter(v))
            .collect::<Vec<_>>()
            .join(", ")
    }

    // ==================== Select ====================

    fn compile_select(&self, query: &Builder) -> QbResult<String> {
        ansi::compile_select(self, query)
    }

    /// Compile one component; `None` when the query has nothing for it.
    fn compile_component(&self, query: &Builder, component: Component) -> QbResult<Option<String>> {
        ansi::compile_component(self, query, component)
    }

    fn compile_aggregate(&self, query: &Builder, aggregate: &Aggregate) -> String {
        ansi::compile_aggregate(self, query, aggregate)
    }

    fn compile_columns(&self, query: &Builder, columns: &[Ident]) -> String {
        ansi::compile_columns(self, query, columns)
    }

    fn compile_from(&self, table: &Ident) -> String {
        format!("from {}", self.wrap_table(table))
    }

    fn compile_joins(&self, joins: &[JoinClause]) -> String {
        ansi::compile_joins(self, joins)
    }

    /// `where ...`, or an empty string when there are no where clauses.
    fn compile_wheres(&self, query: &Builder) -> QbResult<String> {
        ansi::compile_wheres(self, query)
    }

    /// Compile a single where clause, without its connector.
    fn compile_where(&self, clause: &WhereClause) -> QbResult<String> {
        ansi::compile_where(self, clause)
    }

    fn compile_groups(&self, groups: &[Ident]) -> String {
        format!("group by {}", self.columnize(groups))
    }

    fn compile_havings(&self, havings: &[HavingClause]) -> String {
        ansi::compile_havings(self, havings)
    }

    fn compile_orders(&self, orders: &[OrderClause]) -> String {
        ansi::compile_orders(self, orders)
    }

    fn compile_limit(&self, limit: u64) -> String {
        format!("limit {limit}")
    }

    fn compile_offset(&self, offset: u64) -> String {
        format!("offset {offset}")
    }

    fn compile_unions(&self, query: &Builder) -> QbResult<String> {
        ansi::compile_unions(self, query)
    }

    fn compile_union(&self, union: &Union) -> QbResult<String> {
        ansi::compile_union(self, union)
    }

    fn compile_lock(&self, lock: &Lock) -> String {
        match lock {
            Lock::Raw(sql) => sql.clone(),
            Lock::Exclusive | Lock::Shared => String::new(),
        }
    }

    // ==================== Writes ====================

    /// Whether update and delete compile `order by` and `limit`.
    fn orders_writes(&self) -> bool {
        false
    }

    fn compile_insert(&self, query: &Builder, records: &[Record]) -> QbResult<String> {
        ansi::compile_insert(self, query, records)
    }

    fn compile_update(&self, query: &Builder, values: &Record) -> QbResult<String> {
        ansi::compile_update(self, query, values)
    }

    fn compile_delete(&self, query: &Builder) -> QbResult<String> {
        ansi::compile_delete(self, query)
    }

    fn compile_truncate(&self, query: &Builder) -> QbResult<String> {
        let table = ansi::require_table(query, "truncate")?;
        Ok(format!("truncate table {}", self.wrap_table(table)))
    }
}

impl Clone for Box<dyn Grammar> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Known SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Ansi,
    MySql,
}

impl Dialect {
    /// A fresh grammar for this dialect.
    pub fn grammar(self) -> Box<dyn Grammar> {
        match self {
            Dialect::Ansi => Box::new(AnsiGrammar::new()),
            Dialect::MySql => Box::new(MySqlGrammar::new()),
        }
    }
}

impl FromStr for Dialect {
    type Err = QbError;

    fn from_str(s: &str) -> QbResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "postgres" | "postgresql" | "pgsql" | "ansi" => Ok(Dialect::Ansi),
            _ => Err(QbError::UnsupportedAdapter(s.to_string())),
        }
    }
}

/// Grammar for an adapter name such as `"mysql"` or `"postgres"`.
pub fn grammar_for(adapter: &str) -> QbResult<Box<dyn Grammar>> {
    Ok(adapter.parse::<Dialect>()?.grammar())
}
