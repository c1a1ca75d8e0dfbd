//! JOIN clauses and their `on` conditions.

use crate::clause::Connector;
use crate::expression::Expression;
use crate::ident::Ident;
use crate::value::Value;

/// Join kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
}

impl JoinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "inner",
            JoinType::Left => "left",
            JoinType::Right => "right",
        }
    }
}

/// Right-hand side of an `on` condition.
#[derive(Debug, Clone, PartialEq)]
pub enum OnOperand {
    /// Another column (or raw SQL), wrapped like any identifier.
    Column(Ident),
    /// A single bound value: compiles to `?`.
    Bound,
    /// A value list: compiles to `(?, ?, ...)`, raw entries inlined.
    List(Vec<Value>),
}

/// One condition of a join's `on` list.
#[derive(Debug, Clone, PartialEq)]
pub struct OnCondition {
    pub first: Ident,
    pub operator: String,
    pub second: OnOperand,
    pub boolean: Connector,
}

/// A JOIN with its `on` conditions.
///
/// Values of parameter-bound conditions are collected in [`JoinClause::bindings`]
/// as the conditions are added; the builder moves them to its `join` binding
/// category when the join is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub table: Ident,
    pub clauses: Vec<OnCondition>,
    pub bindings: Vec<Value>,
}

impl JoinClause {
    pub fn new(join_type: JoinType, table: impl Into<Ident>) -> Self {
        Self {
            join_type,
            table: table.into(),
            clauses: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Add a column-to-column `on` condition.
    pub fn on(
        &mut self,
        first: impl Into<Ident>,
        operator: &str,
        second: impl Into<Ident>,
    ) -> &mut Self {
        self.add_column_condition(first.into(), operator, second.into(), Connector::And)
    }

    /// Add an `or on` condition.
    pub fn or_on(
        &mut self,
        first: impl Into<Ident>,
        operator: &str,
        second: impl Into<Ident>,
    ) -> &mut Self {
        self.add_column_condition(first.into(), operator, second.into(), Connector::Or)
    }

    /// Add a parameter-bound `on` condition: `first op ?`.
    pub fn where_(
        &mut self,
        first: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_bound_condition(first.into(), operator, value.into(), Connector::And)
    }

    /// Add a parameter-bound `or on` condition.
    pub fn or_where(
        &mut self,
        first: impl Into<Ident>,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.add_bound_condition(first.into(), operator, value.into(), Connector::Or)
    }

    /// Add an `on column is null` condition.
    pub fn where_null(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.add_null_condition(column.into(), "null", Connector::And)
    }

    pub fn or_where_null(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.add_null_condition(column.into(), "null", Connector::Or)
    }

    /// Add an `on column is not null` condition.
    pub fn where_not_null(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.add_null_condition(column.into(), "not null", Connector::And)
    }

    pub fn or_where_not_null(&mut self, column: impl Into<Ident>) -> &mut Self {
        self.add_null_condition(column.into(), "not null", Connector::Or)
    }

    /// Add an `on column in (?, ...)` condition.
    pub fn where_in<V: Into<Value>>(
        &mut self,
        column: impl Into<Ident>,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_list_condition(column.into(), "in", values, Connector::And)
    }

    pub fn or_where_in<V: Into<Value>>(
        &mut self,
        column: impl Into<Ident>,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_list_condition(column.into(), "in", values, Connector::Or)
    }

    /// Add an `on column not in (?, ...)` condition.
    pub fn where_not_in<V: Into<Value>>(
        &mut self,
        column: impl Into<Ident>,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_list_condition(column.into(), "not in", values, Connector::And)
    }

    pub fn or_where_not_in<V: Into<Value>>(
        &mut self,
        column: impl Into<Ident>,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.add_list_condition(column.into(), "not in", values, Connector::Or)
    }

    fn add_column_condition(
        &mut self,
        first: Ident,
        operator: &str,
        second: Ident,
        boolean: Connector,
    ) -> &mut Self {
        self.clauses.push(OnCondition {
            first,
            operator: operator.to_string(),
            second: OnOperand::Column(second),
            boolean,
        });
        self
    }

    fn add_bound_condition(
        &mut self,
        first: Ident,
        operator: &str,
        value: Value,
        boolean: Connector,
    ) -> &mut Self {
        // Raw values are inlined instead of bound.
        let second = match value {
            Value::Raw(expr) => OnOperand::Column(Ident::Raw(expr)),
            value => {
                self.bindings.push(value);
                OnOperand::Bound
            }
        };
        self.clauses.push(OnCondition {
            first,
            operator: operator.to_string(),
            second,
            boolean,
        });
        self
    }

    fn add_null_condition(&mut self, column: Ident, keyword: &str, boolean: Connector) -> &mut Self {
        self.add_column_condition(column, "is", Ident::Raw(Expression::new(keyword)), boolean)
    }

    fn add_list_condition<V: Into<Value>>(
        &mut self,
        column: Ident,
        operator: &str,
        values: impl IntoIterator<Item = V>,
        boolean: Connector,
    ) -> &mut Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.bindings
            .extend(values.iter().filter(|v| !v.is_raw()).cloned());
        self.clauses.push(OnCondition {
            first: column,
            operator: operator.to_string(),
            second: OnOperand::List(values),
            boolean,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_records_column_condition_without_bindings() {
        let mut join = JoinClause::new(JoinType::Inner, "contacts");
        join.on("users.id", "=", "contacts.user_id");
        assert_eq!(join.clauses.len(), 1);
        assert_eq!(
            join.clauses[0].second,
            OnOperand::Column(Ident::from("contacts.user_id"))
        );
        assert!(join.bindings.is_empty());
    }

    #[test]
    fn where_binds_at_construction() {
        let mut join = JoinClause::new(JoinType::Left, "contacts");
        join.on("users.id", "=", "contacts.user_id")
            .or_where("contacts.kind", "=", "email");
        assert_eq!(join.bindings, vec![Value::from("email")]);
        assert_eq!(join.clauses[1].second, OnOperand::Bound);
        assert_eq!(join.clauses[1].boolean, Connector::Or);
    }

    #[test]
    fn where_in_keeps_values_and_binds_them() {
        let mut join = JoinClause::new(JoinType::Inner, "contacts");
        join.where_in("contacts.kind", ["email", "phone"]);
        assert_eq!(
            join.clauses[0].second,
            OnOperand::List(vec![Value::from("email"), Value::from("phone")])
        );
        assert_eq!(join.clauses[0].operator, "in");
        assert_eq!(join.bindings.len(), 2);
    }

    #[test]
    fn where_in_does_not_bind_raw_values() {
        let mut join = JoinClause::new(JoinType::Inner, "contacts");
        join.where_in("contacts.id", [Value::from(1), crate::raw("2").into()]);
        assert_eq!(join.bindings, vec![Value::from(1)]);
    }

    #[test]
    fn where_null_is_not_bound() {
        let mut join = JoinClause::new(JoinType::Inner, "contacts");
        join.where_null("contacts.deleted_at");
        assert_eq!(join.clauses[0].operator, "is");
        assert!(join.bindings.is_empty());
    }
}
