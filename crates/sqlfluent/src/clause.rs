//! Clause types accumulated by the [`Builder`].
//!
//! Every clause kind is a closed enum so each grammar compiles them with one
//! exhaustive `match`.

use crate::builder::Builder;
use crate::ident::Ident;
use crate::value::Value;
use std::fmt;

/// Boolean connector joining a clause to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "and",
            Connector::Or => "or",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date component extracted by a date-based where clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    Date,
    Day,
    Month,
    Year,
}

impl DatePart {
    /// SQL function name applied to the column.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatePart::Date => "date",
            DatePart::Day => "day",
            DatePart::Month => "month",
            DatePart::Year => "year",
        }
    }
}

/// A WHERE clause.
#[derive(Debug, Clone)]
pub enum WhereClause {
    /// `column op ?`
    Basic {
        column: Ident,
        operator: String,
        value: Value,
        boolean: Connector,
    },
    /// Raw SQL fragment.
    Raw { sql: String, boolean: Connector },
    /// Parenthesized group of where clauses.
    Nested {
        query: Box<Builder>,
        boolean: Connector,
    },
    /// `column op (select ...)`
    Sub {
        column: Ident,
        operator: String,
        query: Box<Builder>,
        boolean: Connector,
    },
    /// `column [not] between ? and ?`
    Between {
        column: Ident,
        low: Value,
        high: Value,
        not: bool,
        boolean: Connector,
    },
    /// `column [not] in (?, ...)`
    In {
        column: Ident,
        values: Vec<Value>,
        not: bool,
        boolean: Connector,
    },
    /// `column [not] in (select ...)`
    InSub {
        column: Ident,
        query: Box<Builder>,
        not: bool,
        boolean: Connector,
    },
    /// `column is [not] null`
    Null {
        column: Ident,
        not: bool,
        boolean: Connector,
    },
    /// `[not] exists (select ...)`
    Exists {
        query: Box<Builder>,
        not: bool,
        boolean: Connector,
    },
    /// `part(column) op ?`
    DateBased {
        part: DatePart,
        column: Ident,
        operator: String,
        value: Value,
        boolean: Connector,
    },
}

impl WhereClause {
    pub fn boolean(&self) -> Connector {
        match self {
            WhereClause::Basic { boolean, .. }
            | WhereClause::Raw { boolean, .. }
            | WhereClause::Nested { boolean, .. }
            | WhereClause::Sub { boolean, .. }
            | WhereClause::Between { boolean, .. }
            | WhereClause::In { boolean, .. }
            | WhereClause::InSub { boolean, .. }
            | WhereClause::Null { boolean, .. }
            | WhereClause::Exists { boolean, .. }
            | WhereClause::DateBased { boolean, .. } => *boolean,
        }
    }
}

/// A HAVING clause.
#[derive(Debug, Clone)]
pub enum HavingClause {
    Basic {
        column: Ident,
        operator: String,
        value: Value,
        boolean: Connector,
    },
    Raw {
        sql: String,
        boolean: Connector,
    },
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// `asc` (any case) sorts ascending; anything else sorts descending.
    pub fn parse_lenient(direction: &str) -> Self {
        if direction.eq_ignore_ascii_case("asc") {
            Direction::Asc
        } else {
            Direction::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// An ORDER BY item.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderClause {
    Column { column: Ident, direction: Direction },
    Raw { sql: String },
}

/// Row lock requested for a select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lock {
    /// Exclusive lock (`for update`).
    Exclusive,
    /// Shared lock.
    Shared,
    /// Raw lock SQL, passed through.
    Raw(String),
}

impl From<bool> for Lock {
    fn from(exclusive: bool) -> Self {
        if exclusive { Lock::Exclusive } else { Lock::Shared }
    }
}

impl From<&str> for Lock {
    fn from(sql: &str) -> Self {
        Lock::Raw(sql.to_string())
    }
}

/// Aggregate function replacing the select list.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub function: String,
    pub columns: Vec<Ident>,
}

/// A query appended with `union` / `union all`.
#[derive(Debug, Clone)]
pub struct Union {
    pub query: Box<Builder>,
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_lenient() {
        assert_eq!(Direction::parse_lenient("ASC"), Direction::Asc);
        assert_eq!(Direction::parse_lenient("asc"), Direction::Asc);
        assert_eq!(Direction::parse_lenient("descending"), Direction::Desc);
        assert_eq!(Direction::parse_lenient(""), Direction::Desc);
    }

    #[test]
    fn lock_from_bool() {
        assert_eq!(Lock::from(true), Lock::Exclusive);
        assert_eq!(Lock::from(false), Lock::Shared);
        assert_eq!(Lock::from("for share"), Lock::Raw("for share".into()));
    }
}
