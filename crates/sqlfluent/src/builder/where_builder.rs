//! WHERE clause constructors.
//!
//! Every constructor appends one [`WhereClause`] and pushes its values onto
//! the `where` binding category in placeholder order. Sub-query forms build
//! a child [`Builder`] through a callback and merge the child's bindings
//! into this builder immediately.

use super::{BindingCategory, Builder};
use crate::clause::{Connector, DatePart, WhereClause};
use crate::error::{QbError, QbResult};
use crate::ident::Ident;
use crate::value::Value;

/// Comparison operators accepted by [`Builder::where_op`] (matched case-insensitively).
pub const OPERATORS: &[&str] = &[
    "=", "<", ">", "<=", ">=", "<>", "!=",
    "like", "like binary", "not like", "between", "ilike",
    "&", "|", "^", "<<", ">>",
    "rlike", "regexp", "not regexp",
    "~", "~*", "!~", "!~*", "similar to",
    "not similar to",
];

/// Check if `operator` is a recognized comparison operator.
pub fn is_operator(operator: &str) -> bool {
    let lower = operator.to_lowercase();
    OPERATORS.contains(&lower.as_str())
}

fn is_null_literal(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Text(s) => s == "null",
        _ => false,
    }
}

impl Builder {
    // ==================== Basic ====================

    /// Add `column = value`.
    ///
    /// A `null` value (either [`Value::Null`] or the string `"null"`) becomes
    /// `column is null`.
    pub fn where_eq(&mut self, column: impl Into<Ident>, value: impl Into<Value>) -> &mut Self {
        self.push_comparison(column.into(), "=".to_string(), value.into(), Connector::And)
    }

    /// Add `or column = value`.
    pub fn or_where_eq(&mut self, column: impl Into<Ident>, value: impl Into<Value>) -> &mut Self {
        self.push_comparison(column.into(), "=".to_string(), value.into(), Connector::Or)
    }

    /// Add `column op value`.
    ///
    /// See [`Builder::add_where`] for the operator rules.
    pub fn where_op(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> QbResult<&mut Self> {
        self.add_where(column, operator, value, Connector::And)
    }

    /// Add `or column op value`.
    pub fn or_where_op(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> QbResult<&mut Self> {
        self.add_where(column, operator, value, Connector::Or)
    }

    /// Add a comparison joined with `boolean`.
    ///
    /// - A recognized operator other than `=` paired with a `null` value fails
    ///   with [`QbError::IllegalOperatorAndValue`].
    /// - An unrecognized operator is taken as the value and the operator
    ///   becomes `=`; the passed value is discarded.
    /// - A `null` value becomes `column is null` (`is not null` for any
    ///   operator other than `=`).
    pub fn add_where(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
        boolean: Connector,
    ) -> QbResult<&mut Self> {
        let mut value = value.into();
        let mut operator = operator.to_string();

        if is_operator(&operator) && operator != "=" && is_null_literal(&value) {
            return Err(QbError::IllegalOperatorAndValue { operator });
        }

        if !is_operator(&operator) {
            value = Value::Text(operator);
            operator = "=".to_string();
        }

        Ok(self.push_comparison(column.into(), operator, value, boolean))
    }

    fn push_comparison(
        &mut self,
        column: Ident,
        operator: String,
        value: Value,
        boolean: Connector,
    ) -> &mut Self {
        if is_null_literal(&value) {
            let not = operator != "=";
            return self.push_null(column, not, boolean);
        }

        self.bindings.push(BindingCategory::Where, value.clone());
        self.wheres.push(WhereClause::Basic {
            column,
            operator,
            value,
            boolean,
        });
        self
    }

    /// Add one `column = value` per pair, grouped in parentheses.
    pub fn where_map<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<Ident>,
        V: Into<Value>,
    {
        self.add_where_map(pairs, Connector::And)
    }

    pub fn or_where_map<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<Ident>,
        V: Into<Value>,
    {
        self.add_where_map(pairs, Connector::Or)
    }

    fn add_where_map<K, V>(
        &mut self,
        pairs: impl IntoIterator<Item = (K, V)>,
        boolean: Connector,
    ) -> &mut Self
    where
        K: Into<Ident>,
        V: Into<Value>,
    {
        self.add_nested_where(
            |q| {
                for (column, value) in pairs {
                    q.where_eq(column, value);
                }
            },
            boolean,
        )
    }

    // ==================== Raw ====================

    /// Add a raw where fragment with its `?` bindings.
    pub fn where_raw<V: Into<Value>>(
        &mut self,
        sql: &str,
        bindings: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_where_raw(sql, bindings, Connector::And)
    }

    pub fn or_where_raw<V: Into<Value>>(
        &mut self,
        sql: &str,
        bindings: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_where_raw(sql, bindings, Connector::Or)
    }

    fn add_where_raw<V: Into<Value>>(
        &mut self,
        sql: &str,
        bindings: impl IntoIterator<Item = V>,
        boolean: Connector,
    ) -> &mut Self {
        self.wheres.push(WhereClause::Raw {
            sql: sql.to_string(),
            boolean,
        });
        self.push_bindings(BindingCategory::Where, bindings)
    }

    // ==================== Nested ====================

    /// Add a parenthesized group of conditions built by `callback`.
    ///
    /// The child builder targets the same table. A group left empty by the
    /// callback adds nothing.
    pub fn where_nested<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        self.add_nested_where(callback, Connector::And)
    }

    pub fn or_where_nested<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        self.add_nested_where(callback, Connector::Or)
    }

    fn add_nested_where<F>(&mut self, callback: F, boolean: Connector) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        let mut query = self.new_query();
        query.from = self.from.clone();
        callback(&mut query);
        self.add_nested_where_query(query, boolean)
    }

    /// Attach an already-built group of conditions.
    pub fn add_nested_where_query(&mut self, query: Builder, boolean: Connector) -> &mut Self {
        if query.wheres.is_empty() {
            return self;
        }
        self.merge_bindings(&query);
        self.wheres.push(WhereClause::Nested {
            query: Box::new(query),
            boolean,
        });
        self
    }

    // ==================== Sub-selects ====================

    /// Add `column op (select ...)`, the sub-select built by `callback`.
    pub fn where_sub<F>(&mut self, column: impl Into<Ident>, operator: &str, callback: F) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        self.add_where_sub(column.into(), operator, callback, Connector::And)
    }

    pub fn or_where_sub<F>(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        callback: F,
    ) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        self.add_where_sub(column.into(), operator, callback, Connector::Or)
    }

    fn add_where_sub<F>(
        &mut self,
        column: Ident,
        operator: &str,
        callback: F,
        boolean: Connector,
    ) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        let mut query = self.new_query();
        callback(&mut query);
        self.push_sub_query_bindings(&query);
        self.wheres.push(WhereClause::Sub {
            column,
            operator: operator.to_string(),
            query: Box::new(query),
            boolean,
        });
        self
    }

    /// Add `exists (select ...)`.
    pub fn where_exists<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        self.add_where_exists(callback, Connector::And, false)
    }

    pub fn or_where_exists<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        self.add_where_exists(callback, Connector::Or, false)
    }

    /// Add `not exists (select ...)`.
    pub fn where_not_exists<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        self.add_where_exists(callback, Connector::And, true)
    }

    pub fn or_where_not_exists<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        self.add_where_exists(callback, Connector::Or, true)
    }

    fn add_where_exists<F>(&mut self, callback: F, boolean: Connector, not: bool) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        let mut query = self.new_query();
        callback(&mut query);
        self.push_sub_query_bindings(&query);
        self.wheres.push(WhereClause::Exists {
            query: Box::new(query),
            not,
            boolean,
        });
        self
    }

    // ==================== Between ====================

    /// Add `column between ? and ?`.
    pub fn where_between(
        &mut self,
        column: impl Into<Ident>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        self.add_where_between(column.into(), low.into(), high.into(), Connector::And, false)
    }

    pub fn or_where_between(
        &mut self,
        column: impl Into<Ident>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        self.add_where_between(column.into(), low.into(), high.into(), Connector::Or, false)
    }

    /// Add `column not between ? and ?`.
    pub fn where_not_between(
        &mut self,
        column: impl Into<Ident>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        self.add_where_between(column.into(), low.into(), high.into(), Connector::And, true)
    }

    pub fn or_where_not_between(
        &mut self,
        column: impl Into<Ident>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> &mut Self {
        self.add_where_between(column.into(), low.into(), high.into(), Connector::Or, true)
    }

    fn add_where_between(
        &mut self,
        column: Ident,
        low: Value,
        high: Value,
        boolean: Connector,
        not: bool,
    ) -> &mut Self {
        self.bindings.push(BindingCategory::Where, low.clone());
        self.bindings.push(BindingCategory::Where, high.clone());
        self.wheres.push(WhereClause::Between {
            column,
            low,
            high,
            not,
            boolean,
        });
        self
    }

    // ==================== In ====================

    /// Add `column in (?, ...)`; an empty list compiles to `0 = 1`.
    pub fn where_in<V: Into<Value>>(
        &mut self,
        column: impl Into<Ident>,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_where_in(column.into(), values, Connector::And, false)
    }

    pub fn or_where_in<V: Into<Value>>(
        &mut self,
        column: impl Into<Ident>,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_where_in(column.into(), values, Connector::Or, false)
    }

    /// Add `column not in (?, ...)`; an empty list compiles to `1 = 1`.
    pub fn where_not_in<V: Into<Value>>(
        &mut self,
        column: impl Into<Ident>,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_where_in(column.into(), values, Connector::And, true)
    }

    pub fn or_where_not_in<V: Into<Value>>(
        &mut self,
        column: impl Into<Ident>,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_where_in(column.into(), values, Connector::Or, true)
    }

    fn add_where_in<V: Into<Value>>(
        &mut self,
        column: Ident,
        values: impl IntoIterator<Item = V>,
        boolean: Connector,
        not: bool,
    ) -> &mut Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.bindings
            .extend(BindingCategory::Where, values.iter().cloned());
        self.wheres.push(WhereClause::In {
            column,
            values,
            not,
            boolean,
        });
        self
    }

    /// Add `column in (select ...)`.
    pub fn where_in_sub<F>(&mut self, column: impl Into<Ident>, callback: F) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        self.add_where_in_sub(column.into(), callback, Connector::And, false)
    }

    pub fn or_where_in_sub<F>(&mut self, column: impl Into<Ident>, callback: F) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        self.add_where_in_sub(column.into(), callback, Connector::Or, false)
    }

    /// Add `column not in (select ...)`.
    pub fn where_not_in_sub<F>(&mut self, column: impl Into<Ident>, callback: F) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        self.add_where_in_sub(column.into(), callback, Connector::And, true)
    }

    pub fn or_where_not_in_sub<F>(&mut self, column: impl Into<Ident>, callback: F) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        self.add_where_in_sub(column.into(), callback, Connector::Or, true)
    }

    fn add_where_in_sub<F>(
        &mut self,
        column: Ident,
        callback: F,
        boolean: Connector,
        not: bool,
    ) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        let mut query = self.new_query();
        callback(&mut query);
        self.push_sub_query_bindings(&query);
        self.wheres.push(WhereClause::InSub {
            column,
            query: Box::new(query),
            not,
            boolean,
        });
        self
    }

    /// A sub-select compiles inside the where fragment, so all of its
    /// bindings go to the `where` category in its own flattened order.
    fn push_sub_query_bindings(&mut self, query: &Builder) {
        self.bindings
            .extend(BindingCategory::Where, query.get_bindings());
    }

    // ==================== Null ====================

    /// Add `column is null`.
    pub fn where_null(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.push_null(column.into(), false, Connector::And)
    }

    pub fn or_where_null(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.push_null(column.into(), false, Connector::Or)
    }

    /// Add `column is not null`.
    pub fn where_not_null(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.push_null(column.into(), true, Connector::And)
    }

    pub fn or_where_not_null(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.push_null(column.into(), true, Connector::Or)
    }

    fn push_null(&mut self, column: Ident, not: bool, boolean: Connector) -> &mut Self {
        self.wheres.push(WhereClause::Null {
            column,
            not,
            boolean,
        });
        self
    }

    // ==================== Date based ====================

    /// Add `date(column) op ?`.
    pub fn where_date(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_date_based_where(DatePart::Date, column, operator, value, Connector::And)
    }

    /// Add `day(column) op ?`.
    pub fn where_day(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_date_based_where(DatePart::Day, column, operator, value, Connector::And)
    }

    /// Add `month(column) op ?`.
    pub fn where_month(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_date_based_where(DatePart::Month, column, operator, value, Connector::And)
    }

    /// Add `year(column) op ?`.
    pub fn where_year(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_date_based_where(DatePart::Year, column, operator, value, Connector::And)
    }

    pub fn add_date_based_where(
        &mut self,
        part: DatePart,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
        boolean: Connector,
    ) -> &mut Self {
        let value = value.into();
        self.bindings.push(BindingCategory::Where, value.clone());
        self.wheres.push(WhereClause::DateBased {
            part,
            column: column.into(),
            operator: operator.to_string(),
            value,
            boolean,
        });
        self
    }
}
