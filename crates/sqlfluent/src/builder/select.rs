//! Select-side clauses: columns, table, joins, grouping, ordering,
//! pagination, unions and locks.

use super::{BindingCategory, Builder};
use crate::clause::{Connector, Direction, HavingClause, Lock, OrderClause, Union};
use crate::error::QbResult;
use crate::expression::Expression;
use crate::ident::Ident;
use crate::join_clause::{JoinClause, JoinType};
use crate::value::Value;

/// Column used by [`Builder::latest`] and [`Builder::oldest`].
pub const DEFAULT_TIMESTAMP_COLUMN: &str = "created_at";

impl Builder {
    // ==================== Columns ====================

    /// Replace the select list.
    pub fn select<C: Into<Ident>>(&mut self, columns: impl IntoIterator<Item = C>) -> &mut Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append to the select list.
    pub fn add_select<C: Into<Ident>>(&mut self, columns: impl IntoIterator<Item = C>) -> &mut Self {
        self.columns.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Append a raw select expression; its bindings go to the `select` category.
    pub fn select_raw<V: Into<Value>>(
        &mut self,
        expression: &str,
        bindings: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.columns.push(Ident::Raw(Expression::new(expression)));
        self.push_bindings(BindingCategory::Select, bindings)
    }

    /// Append `(<sub-select>) as alias`.
    ///
    /// The sub-select's flattened bindings are appended to the `select` category.
    pub fn select_sub(&mut self, query: &Builder, alias: &str) -> QbResult<&mut Self> {
        let sql = format!("({}) as {}", query.to_sql()?, self.grammar.wrap_value(alias));
        Ok(self.select_raw(&sql, query.get_bindings()))
    }

    /// Append a sub-select built by `callback`.
    pub fn select_sub_with<F>(&mut self, alias: &str, callback: F) -> QbResult<&mut Self>
    where
        F: FnOnce(&mut Builder),
    {
        let mut query = self.new_query();
        callback(&mut query);
        self.select_sub(&query, alias)
    }

    /// Append `(<sql>) as alias` for an already-written sub-select.
    pub fn select_sub_raw(&mut self, sql: &str, alias: &str) -> &mut Self {
        let sql = format!("({sql}) as {}", self.grammar.wrap_value(alias));
        self.select_raw::<Value>(&sql, [])
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// Set the target table.
    pub fn from(&mut self, table: impl Into<Ident>) -> &mut Self {
        self.from = Some(table.into());
        self
    }

    // ==================== Joins ====================

    /// Add `inner join table on first op second`.
    pub fn join(
        &mut self,
        table: impl Into<Ident>,
        first: impl Into<Ident>,
        operator: &str,
        second: impl Into<Ident>,
    ) -> &mut Self {
        let mut join = JoinClause::new(JoinType::Inner, table);
        join.on(first, operator, second);
        self.add_join(join)
    }

    pub fn left_join(
        &mut self,
        table: impl Into<Ident>,
        first: impl Into<Ident>,
        operator: &str,
        second: impl Into<Ident>,
    ) -> &mut Self {
        let mut join = JoinClause::new(JoinType::Left, table);
        join.on(first, operator, second);
        self.add_join(join)
    }

    pub fn right_join(
        &mut self,
        table: impl Into<Ident>,
        first: impl Into<Ident>,
        operator: &str,
        second: impl Into<Ident>,
    ) -> &mut Self {
        let mut join = JoinClause::new(JoinType::Right, table);
        join.on(first, operator, second);
        self.add_join(join)
    }

    /// Add `inner join table on first op ?`, binding `value`.
    pub fn join_where(
        &mut self,
        table: impl Into<Ident>,
        first: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        let mut join = JoinClause::new(JoinType::Inner, table);
        join.where_(first, operator, value);
        self.add_join(join)
    }

    pub fn left_join_where(
        &mut self,
        table: impl Into<Ident>,
        first: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        let mut join = JoinClause::new(JoinType::Left, table);
        join.where_(first, operator, value);
        self.add_join(join)
    }

    pub fn right_join_where(
        &mut self,
        table: impl Into<Ident>,
        first: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        let mut join = JoinClause::new(JoinType::Right, table);
        join.where_(first, operator, value);
        self.add_join(join)
    }

    /// Add an inner join whose `on` conditions are built by `callback`.
    pub fn join_with<F>(&mut self, table: impl Into<Ident>, callback: F) -> &mut Self
    where
        F: FnOnce(&mut JoinClause),
    {
        self.join_using(JoinType::Inner, table, callback)
    }

    pub fn left_join_with<F>(&mut self, table: impl Into<Ident>, callback: F) -> &mut Self
    where
        F: FnOnce(&mut JoinClause),
    {
        self.join_using(JoinType::Left, table, callback)
    }

    pub fn right_join_with<F>(&mut self, table: impl Into<Ident>, callback: F) -> &mut Self
    where
        F: FnOnce(&mut JoinClause),
    {
        self.join_using(JoinType::Right, table, callback)
    }

    fn join_using<F>(&mut self, join_type: JoinType, table: impl Into<Ident>, callback: F) -> &mut Self
    where
        F: FnOnce(&mut JoinClause),
    {
        let mut join = JoinClause::new(join_type, table);
        callback(&mut join);
        self.add_join(join)
    }

    /// Attach a join and move its pending values to the `join` category.
    pub fn add_join(&mut self, join: JoinClause) -> &mut Self {
        self.bindings
            .extend(BindingCategory::Join, join.bindings.iter().cloned());
        self.joins.push(join);
        self
    }

    // ==================== Group / having ====================

    pub fn group_by<C: Into<Ident>>(&mut self, columns: impl IntoIterator<Item = C>) -> &mut Self {
        self.groups.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add `having column op ?`.
    pub fn having(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_having(column.into(), operator, value.into(), Connector::And)
    }

    pub fn or_having(
        &mut self,
        column: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_having(column.into(), operator, value.into(), Connector::Or)
    }

    fn add_having(
        &mut self,
        column: Ident,
        operator: &str,
        value: Value,
        boolean: Connector,
    ) -> &mut Self {
        self.bindings.push(BindingCategory::Having, value.clone());
        self.havings.push(HavingClause::Basic {
            column,
            operator: operator.to_string(),
            value,
            boolean,
        });
        self
    }

    /// Add a raw having fragment with its bindings.
    pub fn having_raw<V: Into<Value>>(
        &mut self,
        sql: &str,
        bindings: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_having_raw(sql, bindings, Connector::And)
    }

    pub fn or_having_raw<V: Into<Value>>(
        &mut self,
        sql: &str,
        bindings: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_having_raw(sql, bindings, Connector::Or)
    }

    fn add_having_raw<V: Into<Value>>(
        &mut self,
        sql: &str,
        bindings: impl IntoIterator<Item = V>,
        boolean: Connector,
    ) -> &mut Self {
        self.havings.push(HavingClause::Raw {
            sql: sql.to_string(),
            boolean,
        });
        self.push_bindings(BindingCategory::Having, bindings)
    }

    // ==================== Ordering ====================

    /// Add an order by item; `"asc"` (any case) sorts ascending, anything
    /// else descending.
    ///
    /// Once a union has been added, orders apply to the union as a whole.
    pub fn order_by(&mut self, column: impl Into<Ident>, direction: &str) -> &mut Self {
        let order = OrderClause::Column {
            column: column.into(),
            direction: Direction::parse_lenient(direction),
        };
        self.push_order(order)
    }

    pub fn order_by_asc(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.order_by(column, "asc")
    }

    pub fn order_by_desc(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.order_by(column, "desc")
    }

    /// Newest first by `created_at`.
    pub fn latest(&mut self) -> &mut Self {
        self.order_by_desc(DEFAULT_TIMESTAMP_COLUMN)
    }

    pub fn latest_by(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.order_by_desc(column)
    }

    /// Oldest first by `created_at`.
    pub fn oldest(&mut self) -> &mut Self {
        self.order_by_asc(DEFAULT_TIMESTAMP_COLUMN)
    }

    pub fn oldest_by(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.order_by_asc(column)
    }

    /// Add a raw order by fragment; its bindings go to the `order` category.
    pub fn order_by_raw<V: Into<Value>>(
        &mut self,
        sql: &str,
        bindings: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.push_order(OrderClause::Raw {
            sql: sql.to_string(),
        });
        self.push_bindings(BindingCategory::Order, bindings)
    }

    fn push_order(&mut self, order: OrderClause) -> &mut Self {
        if self.unions.is_empty() {
            self.orders.push(order);
        } else {
            self.union_orders.push(order);
        }
        self
    }

    // ==================== Pagination ====================

    /// Set the offset; negative values clamp to zero.
    pub fn offset(&mut self, value: i64) -> &mut Self {
        let value = Some(value.max(0) as u64);
        if self.unions.is_empty() {
            self.offset = value;
        } else {
            self.union_offset = value;
        }
        self
    }

    pub fn skip(&mut self, value: i64) -> &mut Self {
        self.offset(value)
    }

    /// Set the limit; values below one are ignored.
    pub fn limit(&mut self, value: i64) -> &mut Self {
        if value > 0 {
            let value = Some(value as u64);
            if self.unions.is_empty() {
                self.limit = value;
            } else {
                self.union_limit = value;
            }
        }
        self
    }

    pub fn take(&mut self, value: i64) -> &mut Self {
        self.limit(value)
    }

    /// Offset and limit for a one-based page number.
    pub fn for_page(&mut self, page: i64, per_page: i64) -> &mut Self {
        self.skip(page.saturating_sub(1).saturating_mul(per_page))
            .take(per_page)
    }

    // ==================== Unions ====================

    /// Append `union <query>`.
    pub fn union(&mut self, query: Builder) -> &mut Self {
        self.add_union(query, false)
    }

    /// Append `union all <query>`.
    pub fn union_all(&mut self, query: Builder) -> &mut Self {
        self.add_union(query, true)
    }

    pub fn union_with<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        let mut query = self.new_query();
        callback(&mut query);
        self.add_union(query, false)
    }

    pub fn union_all_with<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnOnce(&mut Builder),
    {
        let mut query = self.new_query();
        callback(&mut query);
        self.add_union(query, true)
    }

    /// Member bindings land in `order`: the member compiles after this
    /// query's order clause and before any union-level order.
    fn add_union(&mut self, query: Builder, all: bool) -> &mut Self {
        self.bindings
            .extend(BindingCategory::Order, query.get_bindings());
        self.unions.push(Union {
            query: Box::new(query),
            all,
        });
        self
    }

    // ==================== Locks ====================

    /// Lock the selected rows: `true` exclusive, `false` shared, or raw SQL.
    pub fn lock(&mut self, lock: impl Into<Lock>) -> &mut Self {
        self.lock = Some(lock.into());
        self
    }

    pub fn lock_for_update(&mut self) -> &mut Self {
        self.lock(Lock::Exclusive)
    }

    pub fn shared_lock(&mut self) -> &mut Self {
        self.lock(Lock::Shared)
    }
}
