//! ANSI grammar and the default compilers every grammar builds on.
//!
//! The free functions here are generic over the grammar so that overrides
//! in a dialect are honored when a default compiler recurses (for example a
//! sub-select compiled inside a where clause uses the dialect's quoting).

use super::{Component, Grammar};
use crate::builder::{Builder, Record};
use crate::clause::{Aggregate, HavingClause, OrderClause, Union, WhereClause};
use crate::error::{QbError, QbResult};
use crate::ident::Ident;
use crate::join_clause::{JoinClause, OnOperand};

/// Dialect-neutral grammar quoting identifiers with `"`.
#[derive(Debug, Clone, Default)]
pub struct AnsiGrammar {
    table_prefix: String,
}

impl AnsiGrammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table prefix.
    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }
}

impl Grammar for AnsiGrammar {
    fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn set_table_prefix(&mut self, prefix: &str) {
        self.table_prefix = prefix.to_string();
    }

    fn box_clone(&self) -> Box<dyn Grammar> {
        Box::new(self.clone())
    }
}

/// The target table, or [`QbError::MissingTable`].
pub fn require_table<'a>(query: &'a Builder, statement: &'static str) -> QbResult<&'a Ident> {
    query.table().ok_or(QbError::MissingTable(statement))
}

/// Drop the first leading `and ` / `or ` connector.
pub fn remove_leading_boolean(sql: &str) -> &str {
    sql.strip_prefix("and ")
        .or_else(|| sql.strip_prefix("or "))
        .unwrap_or(sql)
}

// ==================== Select ====================

/// Compile every non-empty component and join the fragments with spaces.
pub fn compile_select<G: Grammar + ?Sized>(g: &G, query: &Builder) -> QbResult<String> {
    let mut parts = Vec::with_capacity(Component::SELECT.len());
    for component in Component::SELECT {
        if let Some(sql) = g.compile_component(query, component)? {
            if !sql.is_empty() {
                parts.push(sql);
            }
        }
    }
    Ok(parts.join(" ").trim().to_string())
}

pub fn compile_component<G: Grammar + ?Sized>(
    g: &G,
    query: &Builder,
    component: Component,
) -> QbResult<Option<String>> {
    let sql = match component {
        Component::Aggregate => query
            .get_aggregate()
            .map(|aggregate| g.compile_aggregate(query, aggregate)),
        Component::Columns => {
            if query.get_aggregate().is_some() {
                None
            } else {
                Some(g.compile_columns(query, query.columns()))
            }
        }
        Component::From => Some(g.compile_from(require_table(query, "select")?)),
        Component::Joins => non_empty(query.joins()).map(|joins| g.compile_joins(joins)),
        Component::Wheres => {
            if query.wheres().is_empty() {
                None
            } else {
                Some(g.compile_wheres(query)?)
            }
        }
        Component::Groups => non_empty(query.groups()).map(|groups| g.compile_groups(groups)),
        Component::Havings => non_empty(query.havings()).map(|h| g.compile_havings(h)),
        Component::Orders => non_empty(query.orders()).map(|orders| g.compile_orders(orders)),
        Component::Limit => query.get_limit().map(|limit| g.compile_limit(limit)),
        Component::Offset => query.get_offset().map(|offset| g.compile_offset(offset)),
        Component::Unions => {
            if query.unions().is_empty() {
                None
            } else {
                Some(g.compile_unions(query)?)
            }
        }
        Component::Lock => query.get_lock().map(|lock| g.compile_lock(lock)),
    };
    Ok(sql)
}

fn non_empty<T>(items: &[T]) -> Option<&[T]> {
    if items.is_empty() { None } else { Some(items) }
}

pub fn compile_aggregate<G: Grammar + ?Sized>(
    g: &G,
    query: &Builder,
    aggregate: &Aggregate,
) -> String {
    let mut column = g.columnize(&aggregate.columns);
    if column.is_empty() {
        column = "*".to_string();
    }
    if query.is_distinct() && column != "*" {
        column = format!("distinct {column}");
    }
    format!("select {}({}) as aggregate", aggregate.function, column)
}

pub fn compile_columns<G: Grammar + ?Sized>(g: &G, query: &Builder, columns: &[Ident]) -> String {
    let select = if query.is_distinct() {
        "select distinct "
    } else {
        "select "
    };
    if columns.is_empty() {
        format!("{select}*")
    } else {
        format!("{select}{}", g.columnize(columns))
    }
}

pub fn compile_joins<G: Grammar + ?Sized>(g: &G, joins: &[JoinClause]) -> String {
    joins
        .iter()
        .map(|join| {
            let conditions = join
                .clauses
                .iter()
                .map(|c| {
                    let condition = match &c.second {
                        OnOperand::Column(second) => {
                            format!("{} {} {}", g.wrap(&c.first), c.operator, g.wrap(second))
                        }
                        OnOperand::Bound => format!("{} {} ?", g.wrap(&c.first), c.operator),
                        OnOperand::List(values) if values.is_empty() => {
                            empty_list_condition(&c.operator).to_string()
                        }
                        OnOperand::List(values) => format!(
                            "{} {} ({})",
                            g.wrap(&c.first),
                            c.operator,
                            g.parameterize(values)
                        ),
                    };
                    format!("{} {}", c.boolean, condition)
                })
                .collect::<Vec<_>>()
                .join(" ");

            format!(
                "{} join {} on {}",
                join.join_type.as_str(),
                g.wrap_table(&join.table),
                remove_leading_boolean(&conditions)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Constant condition for an `in` / `not in` against no values.
fn empty_list_condition(operator: &str) -> &'static str {
    if operator.trim().eq_ignore_ascii_case("not in") {
        "1 = 1"
    } else {
        "0 = 1"
    }
}

/// Where clauses joined by their connectors, the leading connector removed.
pub fn compile_where_conditions<G: Grammar + ?Sized>(g: &G, query: &Builder) -> QbResult<String> {
    let mut parts = Vec::with_capacity(query.wheres().len());
    for clause in query.wheres() {
        parts.push(format!("{} {}", clause.boolean(), g.compile_where(clause)?));
    }
    Ok(remove_leading_boolean(&parts.join(" ")).to_string())
}

pub fn compile_wheres<G: Grammar + ?Sized>(g: &G, query: &Builder) -> QbResult<String> {
    if query.wheres().is_empty() {
        return Ok(String::new());
    }
    Ok(format!("where {}", compile_where_conditions(g, query)?))
}

pub fn compile_where<G: Grammar + ?Sized>(g: &G, clause: &WhereClause) -> QbResult<String> {
    let sql = match clause {
        WhereClause::Basic {
            column,
            operator,
            value,
            ..
        } => format!("{} {} {}", g.wrap(column), operator, g.parameter(value)),
        WhereClause::Raw { sql, .. } => sql.clone(),
        WhereClause::Nested { query, .. } => {
            format!("({})", compile_where_conditions(g, query)?)
        }
        WhereClause::Sub {
            column,
            operator,
            query,
            ..
        } => format!("{} {} ({})", g.wrap(column), operator, g.compile_select(query)?),
        WhereClause::Between {
            column,
            low,
            high,
            not,
            ..
        } => format!(
            "{} {}between {} and {}",
            g.wrap(column),
            if *not { "not " } else { "" },
            g.parameter(low),
            g.parameter(high)
        ),
        WhereClause::In {
            column,
            values,
            not,
            ..
        } => {
            if values.is_empty() {
                let sql = if *not { "1 = 1" } else { "0 = 1" };
                sql.to_string()
            } else {
                format!(
                    "{} {}in ({})",
                    g.wrap(column),
                    if *not { "not " } else { "" },
                    g.parameterize(values)
                )
            }
        }
        WhereClause::InSub {
            column, query, not, ..
        } => format!(
            "{} {}in ({})",
            g.wrap(column),
            if *not { "not " } else { "" },
            g.compile_select(query)?
        ),
        WhereClause::Null { column, not, .. } => format!(
            "{} is {}null",
            g.wrap(column),
            if *not { "not " } else { "" }
        ),
        WhereClause::Exists { query, not, .. } => format!(
            "{}exists ({})",
            if *not { "not " } else { "" },
            g.compile_select(query)?
        ),
        WhereClause::DateBased {
            part,
            column,
            operator,
            value,
            ..
        } => format!(
            "{}({}) {} {}",
            part.as_str(),
            g.wrap(column),
            operator,
            g.parameter(value)
        ),
    };
    Ok(sql)
}

pub fn compile_havings<G: Grammar + ?Sized>(g: &G, havings: &[HavingClause]) -> String {
    let sql = havings
        .iter()
        .map(|having| match having {
            HavingClause::Basic {
                column,
                operator,
                value,
                boolean,
            } => format!(
                "{} {} {} {}",
                boolean,
                g.wrap(column),
                operator,
                g.parameter(value)
            ),
            HavingClause::Raw { sql, boolean } => format!("{boolean} {sql}"),
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("having {}", remove_leading_boolean(&sql))
}

pub fn compile_orders<G: Grammar + ?Sized>(g: &G, orders: &[OrderClause]) -> String {
    let items = orders
        .iter()
        .map(|order| match order {
            OrderClause::Column { column, direction } => {
                format!("{} {}", g.wrap(column), direction.as_str())
            }
            OrderClause::Raw { sql } => sql.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("order by {items}")
}

/// Union members, then the union-level order, limit and offset.
pub fn compile_unions<G: Grammar + ?Sized>(g: &G, query: &Builder) -> QbResult<String> {
    let mut parts = Vec::with_capacity(query.unions().len() + 3);
    for union in query.unions() {
        parts.push(g.compile_union(union)?);
    }
    if !query.union_orders().is_empty() {
        parts.push(g.compile_orders(query.union_orders()));
    }
    if let Some(limit) = query.get_union_limit() {
        parts.push(g.compile_limit(limit));
    }
    if let Some(offset) = query.get_union_offset() {
        parts.push(g.compile_offset(offset));
    }
    Ok(parts.join(" "))
}

pub fn compile_union<G: Grammar + ?Sized>(g: &G, union: &Union) -> QbResult<String> {
    let joiner = if union.all { "union all" } else { "union" };
    Ok(format!("{joiner} {}", g.compile_select(&union.query)?))
}

// ==================== Writes ====================

/// `insert into t (cols) values (...), (...)`.
///
/// Every record must list the same columns in the same order.
pub fn compile_insert<G: Grammar + ?Sized>(
    g: &G,
    query: &Builder,
    records: &[Record],
) -> QbResult<String> {
    let table = g.wrap_table(require_table(query, "insert")?);
    let Some(first) = records.first() else {
        return Err(QbError::invalid_argument("insert requires at least one record"));
    };
    if first.is_empty() {
        return Err(QbError::invalid_argument("insert record has no columns"));
    }

    let columns: Vec<Ident> = first.columns().map(Ident::from).collect();
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        if !record.columns().eq(first.columns()) {
            return Err(QbError::invalid_argument(
                "all inserted records must have the same columns",
            ));
        }
        let values: Vec<_> = record.values().cloned().collect();
        rows.push(format!("({})", g.parameterize(&values)));
    }

    Ok(format!(
        "insert into {} ({}) values {}",
        table,
        g.columnize(&columns),
        rows.join(", ")
    ))
}

/// `update t [joins] set c = ?, ... [where ...]`.
pub fn compile_update<G: Grammar + ?Sized>(
    g: &G,
    query: &Builder,
    values: &Record,
) -> QbResult<String> {
    let table = g.wrap_table(require_table(query, "update")?);

    let columns = values
        .iter()
        .map(|(column, value)| {
            format!("{} = {}", g.wrap(&Ident::from(column)), g.parameter(value))
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!("update {table}");
    if !query.joins().is_empty() {
        sql.push(' ');
        sql.push_str(&g.compile_joins(query.joins()));
    }
    sql.push_str(" set ");
    sql.push_str(&columns);

    let wheres = g.compile_wheres(query)?;
    if !wheres.is_empty() {
        sql.push(' ');
        sql.push_str(&wheres);
    }
    Ok(sql)
}

/// `delete from t [joins] [where ...]`.
pub fn compile_delete<G: Grammar + ?Sized>(g: &G, query: &Builder) -> QbResult<String> {
    let mut sql = format!("delete from {}", g.wrap_table(require_table(query, "delete")?));
    if !query.joins().is_empty() {
        sql.push(' ');
        sql.push_str(&g.compile_joins(query.joins()));
    }
    let wheres = g.compile_wheres(query)?;
    if !wheres.is_empty() {
        sql.push(' ');
        sql.push_str(&wheres);
    }
    Ok(sql)
}
