//! # sqlfluent
//!
//! A fluent SQL query builder with swappable grammars.
//!
//! ## Features
//!
//! - **Parameterized by construction**: values never enter the SQL text; every
//!   value is bound to a `?` placeholder in compile order
//! - **Swappable grammars**: ANSI (`"` quoting) and MySQL (backtick quoting,
//!   lock syntax, update/delete with order and limit)
//! - **Sub-queries**: nested wheres, `in (select ...)`, `exists`, sub-selects
//!   and unions, all built with callbacks on a child builder
//! - **Raw escape hatch**: [`Expression`] fragments are inlined verbatim
//! - **Pluggable execution**: any [`Connection`]; a Postgres connection and
//!   an in-memory mock ship with the crate
//!
//! ## Example
//!
//! ```ignore
//! use sqlfluent::{Builder, MockConnection};
//! use std::sync::Arc;
//!
//! let mut q = Builder::for_adapter(Arc::new(MockConnection::new()), "postgres")?;
//! q.select(["*"]).from("users").where_op("id", "=", 1)?;
//!
//! assert_eq!(q.to_sql()?, r#"select * from "users" where "id" = ?"#);
//! assert_eq!(q.get_bindings(), vec![1.into()]);
//!
//! let rows = q.get().await?;
//! ```

pub mod builder;
pub mod clause;
pub mod connection;
pub mod error;
pub mod expression;
pub mod grammar;
pub mod ident;
pub mod join_clause;
pub mod value;

pub use builder::{BindingCategory, Bindings, Builder, CompiledQuery, Record};
pub use clause::{Connector, DatePart, Direction, Lock};
pub use connection::{Connection, ConnectionOptions, Field, MockConnection, QueryOutput, Row};
pub use error::{QbError, QbResult};
pub use expression::{Expression, raw};
pub use grammar::{AnsiGrammar, Dialect, Grammar, MySqlGrammar, grammar_for};
pub use ident::Ident;
pub use join_clause::{JoinClause, JoinType};
pub use value::Value;

#[cfg(feature = "postgres")]
pub use connection::{PgConnection, connect};
