//! Fluent query builder.
//!
//! [`Builder`] accumulates the structure of one statement: select list,
//! table, joins, where/having trees, ordering, pagination, unions and locks.
//! Values are never spliced into the SQL text: each one is appended to a
//! [`BindingCategory`] in the order its placeholder will appear, and
//! [`Builder::get_bindings`] flattens the categories in compile order.
//!
//! Compilation is delegated to the builder's [`Grammar`]; execution to its
//! [`Connection`].
//!
//! # Example
//! ```ignore
//! use sqlfluent::{AnsiGrammar, Builder, MockConnection};
//! use std::sync::Arc;
//!
//! let mut q = Builder::new(Arc::new(MockConnection::new()), Box::new(AnsiGrammar::new()));
//! q.select(["id", "email"])
//!     .from("users")
//!     .where_eq("status", "active")
//!     .where_nested(|q| {
//!         q.where_between("age", 18, 65).or_where_null("age");
//!     });
//!
//! assert_eq!(
//!     q.to_sql()?,
//!     r#"select "id", "email" from "users" where "status" = ? and ("age" between ? and ? or "age" is null)"#
//! );
//! assert_eq!(q.get_bindings().len(), 3);
//! ```

pub mod bindings;
mod dynamic;
mod execute;
mod select;
mod where_builder;

pub use bindings::{BindingCategory, Bindings};
pub use dynamic::split_dynamic_where;
pub use execute::AGGREGATE_COLUMN;
pub use select::DEFAULT_TIMESTAMP_COLUMN;
pub use where_builder::{OPERATORS, is_operator};

use crate::clause::{Aggregate, HavingClause, Lock, OrderClause, Union, WhereClause};
use crate::connection::Connection;
use crate::error::{QbError, QbResult};
use crate::grammar::{Grammar, grammar_for};
use crate::ident::Ident;
use crate::join_clause::JoinClause;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Compiled SQL text with its positional bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub bindings: Vec<Value>,
}

impl CompiledQuery {
    pub fn new(sql: String, bindings: Vec<Value>) -> Self {
        Self { sql, bindings }
    }
}

/// One row of column/value pairs for `insert` and `update`.
///
/// Field order is preserved; it decides both the column list and the binding
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing an existing field of the same name in place.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a field, replacing an existing field of the same name in place.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Fluent query builder bound to one connection and one grammar.
#[derive(Clone)]
pub struct Builder {
    pub(crate) grammar: Box<dyn Grammar>,
    pub(crate) connection: Arc<dyn Connection>,

    pub(crate) aggregate: Option<Aggregate>,
    pub(crate) columns: Vec<Ident>,
    pub(crate) distinct: bool,
    pub(crate) from: Option<Ident>,
    pub(crate) joins: Vec<JoinClause>,
    pub(crate) wheres: Vec<WhereClause>,
    pub(crate) groups: Vec<Ident>,
    pub(crate) havings: Vec<HavingClause>,
    pub(crate) orders: Vec<OrderClause>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) unions: Vec<Union>,
    pub(crate) union_orders: Vec<OrderClause>,
    pub(crate) union_limit: Option<u64>,
    pub(crate) union_offset: Option<u64>,
    pub(crate) lock: Option<Lock>,

    pub(crate) bindings: Bindings,
}

impl Builder {
    /// Create an empty builder.
    pub fn new(connection: Arc<dyn Connection>, grammar: Box<dyn Grammar>) -> Self {
        Self {
            grammar,
            connection,
            aggregate: None,
            columns: Vec::new(),
            distinct: false,
            from: None,
            joins: Vec::new(),
            wheres: Vec::new(),
            groups: Vec::new(),
            havings: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            unions: Vec::new(),
            union_orders: Vec::new(),
            union_limit: None,
            union_offset: None,
            lock: None,
            bindings: Bindings::new(),
        }
    }

    /// Create a builder whose grammar is picked by adapter name.
    ///
    /// Fails with [`QbError::UnsupportedAdapter`] for unknown names.
    pub fn for_adapter(connection: Arc<dyn Connection>, adapter: &str) -> QbResult<Self> {
        Ok(Self::new(connection, grammar_for(adapter)?))
    }

    /// A fresh, empty builder sharing this builder's connection and grammar.
    pub fn new_query(&self) -> Builder {
        Builder::new(Arc::clone(&self.connection), self.grammar.clone())
    }

    pub fn grammar(&self) -> &dyn Grammar {
        self.grammar.as_ref()
    }

    /// Mutable access to the grammar, e.g. to set a table prefix.
    pub fn grammar_mut(&mut self) -> &mut dyn Grammar {
        self.grammar.as_mut()
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    // ==================== State accessors ====================

    pub fn columns(&self) -> &[Ident] {
        &self.columns
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn table(&self) -> Option<&Ident> {
        self.from.as_ref()
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    pub fn wheres(&self) -> &[WhereClause] {
        &self.wheres
    }

    pub fn groups(&self) -> &[Ident] {
        &self.groups
    }

    pub fn havings(&self) -> &[HavingClause] {
        &self.havings
    }

    pub fn orders(&self) -> &[OrderClause] {
        &self.orders
    }

    pub fn union_orders(&self) -> &[OrderClause] {
        &self.union_orders
    }

    pub fn unions(&self) -> &[Union] {
        &self.unions
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn get_offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn get_union_limit(&self) -> Option<u64> {
        self.union_limit
    }

    pub fn get_union_offset(&self) -> Option<u64> {
        self.union_offset
    }

    pub fn get_lock(&self) -> Option<&Lock> {
        self.lock.as_ref()
    }

    pub fn get_aggregate(&self) -> Option<&Aggregate> {
        self.aggregate.as_ref()
    }

    // ==================== Bindings ====================

    /// Append a value to a binding category given by name.
    ///
    /// Fails with [`QbError::InvalidBindingCategory`] unless `category` is one
    /// of `select, join, where, having, order`.
    pub fn add_binding(&mut self, value: impl Into<Value>, category: &str) -> QbResult<&mut Self> {
        let category = category.parse::<BindingCategory>()?;
        self.bindings.push(category, value.into());
        Ok(self)
    }

    /// Append several values to a binding category given by name.
    pub fn add_bindings<V: Into<Value>>(
        &mut self,
        values: impl IntoIterator<Item = V>,
        category: &str,
    ) -> QbResult<&mut Self> {
        let category = category.parse::<BindingCategory>()?;
        self.push_bindings(category, values);
        Ok(self)
    }

    /// Replace a binding category given by name.
    pub fn set_bindings<V: Into<Value>>(
        &mut self,
        values: impl IntoIterator<Item = V>,
        category: &str,
    ) -> QbResult<&mut Self> {
        let category = category.parse::<BindingCategory>()?;
        self.bindings
            .set(category, values.into_iter().map(Into::into).collect());
        Ok(self)
    }

    /// Append a value to a binding category.
    pub fn push_binding(&mut self, category: BindingCategory, value: impl Into<Value>) -> &mut Self {
        self.bindings.push(category, value.into());
        self
    }

    /// Append several values to a binding category.
    pub fn push_bindings<V: Into<Value>>(
        &mut self,
        category: BindingCategory,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.bindings
            .extend(category, values.into_iter().map(Into::into));
        self
    }

    /// Append every category of `other` onto the same-named category here.
    pub fn merge_bindings(&mut self, other: &Builder) -> &mut Self {
        self.bindings.merge(&other.bindings);
        self
    }

    /// Bindings grouped by category.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// All bindings flattened in `select, join, where, having, order` order.
    ///
    /// This is the exact parameter order handed to the connection.
    pub fn get_bindings(&self) -> Vec<Value> {
        self.bindings.flatten()
    }

    // ==================== Compilation ====================

    /// Compile the select statement.
    pub fn to_sql(&self) -> QbResult<String> {
        self.grammar.compile_select(self)
    }

    /// Compile the select statement together with its bindings.
    pub fn compile_select(&self) -> QbResult<CompiledQuery> {
        Ok(CompiledQuery::new(self.to_sql()?, self.get_bindings()))
    }

    /// Compile a batch insert.
    ///
    /// Values are flattened record by record, field by field; raw expressions
    /// are inlined and skipped.
    pub fn compile_insert(&self, records: &[Record]) -> QbResult<CompiledQuery> {
        let sql = self.grammar.compile_insert(self, records)?;
        let bindings = records
            .iter()
            .flat_map(|r| r.values())
            .filter(|v| !v.is_raw())
            .cloned()
            .collect();
        Ok(CompiledQuery::new(sql, bindings))
    }

    /// Compile an update of the matched rows.
    pub fn compile_update(&self, values: &Record) -> QbResult<CompiledQuery> {
        if values.is_empty() {
            return Err(QbError::invalid_argument("update requires at least one column"));
        }
        let sql = self.grammar.compile_update(self, values)?;
        let mut bindings = self.bindings.get(BindingCategory::Join).to_vec();
        bindings.extend(values.values().filter(|v| !v.is_raw()).cloned());
        bindings.extend(self.bindings.flatten_only(&self.write_categories()[1..]));
        Ok(CompiledQuery::new(sql, bindings))
    }

    /// Compile a delete of the matched rows.
    pub fn compile_delete(&self) -> QbResult<CompiledQuery> {
        let sql = self.grammar.compile_delete(self)?;
        let bindings = self.bindings.flatten_only(&self.write_categories());
        Ok(CompiledQuery::new(sql, bindings))
    }

    /// Binding categories an update or delete consumes, in order.
    fn write_categories(&self) -> Vec<BindingCategory> {
        let mut categories = vec![BindingCategory::Join, BindingCategory::Where];
        if self.grammar.orders_writes() {
            categories.push(BindingCategory::Order);
        }
        categories
    }

    /// Compile a truncate of the table.
    pub fn compile_truncate(&self) -> QbResult<CompiledQuery> {
        Ok(CompiledQuery::new(
            self.grammar.compile_truncate(self)?,
            Vec::new(),
        ))
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("grammar", &self.grammar)
            .field("aggregate", &self.aggregate)
            .field("columns", &self.columns)
            .field("distinct", &self.distinct)
            .field("from", &self.from)
            .field("joins", &self.joins)
            .field("wheres", &self.wheres)
            .field("groups", &self.groups)
            .field("havings", &self.havings)
            .field("orders", &self.orders)
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .field("unions", &self.unions)
            .field("union_orders", &self.union_orders)
            .field("union_limit", &self.union_limit)
            .field("union_offset", &self.union_offset)
            .field("lock", &self.lock)
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}
