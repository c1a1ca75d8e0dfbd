//! Identifier wrapping shared by every grammar.
//!
//! - `Raw` expressions pass through as their SQL text.
//! - `expr as alias` wraps both sides; for tables the alias is prefixed too.
//! - `a.b.c` wraps the first segment as a table, the rest as plain names.
//! - Embedded delimiters are doubled; `*` is never quoted.

use super::Grammar;
use crate::ident::{Ident, split_alias};

/// Quote one identifier segment with `quote`.
pub fn quote(quote: char, value: &str) -> String {
    if value == "*" {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        if c == quote {
            out.push(quote);
        }
        out.push(c);
    }
    out.push(quote);
    out
}

/// Wrap a column reference.
pub fn wrap<G: Grammar + ?Sized>(g: &G, value: &Ident) -> String {
    match value {
        Ident::Raw(expr) => expr.value().to_string(),
        Ident::Name(name) => wrap_name(g, name, false),
    }
}

/// Wrap a table reference, applying the grammar's table prefix.
pub fn wrap_table<G: Grammar + ?Sized>(g: &G, table: &Ident) -> String {
    match table {
        Ident::Raw(expr) => expr.value().to_string(),
        Ident::Name(name) => wrap_table_name(g, name),
    }
}

fn wrap_table_name<G: Grammar + ?Sized>(g: &G, table: &str) -> String {
    let prefixed = format!("{}{}", g.table_prefix(), table);
    wrap_name(g, &prefixed, true)
}

fn wrap_name<G: Grammar + ?Sized>(g: &G, name: &str, prefix_alias: bool) -> String {
    if let Some((expr, alias)) = split_alias(name) {
        let alias = if prefix_alias {
            format!("{}{}", g.table_prefix(), alias)
        } else {
            alias.to_string()
        };
        return format!("{} as {}", wrap_name(g, expr, false), g.wrap_value(&alias));
    }

    let mut segments = name.split('.');
    let Some(first) = segments.next() else {
        return g.wrap_value(name);
    };
    let rest: Vec<&str> = segments.collect();
    if rest.is_empty() {
        return g.wrap_value(first);
    }

    let mut out = wrap_table_name(g, first);
    for segment in rest {
        out.push('.');
        out.push_str(&g.wrap_value(segment));
    }
    out
}
