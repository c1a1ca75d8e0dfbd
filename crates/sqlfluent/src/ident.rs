//! Column and table references.
//!
//! This module provides [`Ident`], the reference type accepted wherever the
//! builder takes a column or a table. A reference is either a name that the
//! grammar quotes, or a raw [`Expression`] that is inlined as-is.
//!
//! Names may carry:
//! - Dotted segments: `table.column`, `schema.table`
//! - An alias: `users as u` (the ` as ` keyword is matched case-insensitively)
//!
//! # Example
//! ```ignore
//! use sqlfluent::{raw, Ident};
//!
//! let c = Ident::from("users.id");
//! let t = Ident::from("users as u");
//! let e = Ident::from(raw("count(*)"));
//! ```

use crate::expression::Expression;

/// A column or table reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ident {
    /// Identifier text, quoted by the grammar when compiled.
    Name(String),
    /// Raw SQL, inlined verbatim.
    Raw(Expression),
}

impl Ident {
    /// The identifier text, or `None` for a raw expression.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Ident::Name(name) => Some(name),
            Ident::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Ident::Raw(_))
    }

    /// Check if this is the `*` wildcard.
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Ident::Name(name) if name == "*")
    }

    /// Drop a leading `table.` qualifier from a name.
    ///
    /// `users.email` becomes `email`; raw expressions are left untouched.
    pub fn unqualified(&self) -> Ident {
        match self {
            Ident::Name(name) => match name.find('.') {
                Some(dot) => Ident::Name(name[dot + 1..].to_string()),
                None => self.clone(),
            },
            Ident::Raw(_) => self.clone(),
        }
    }
}

/// Split `expr as alias` into its two sides.
///
/// The keyword match is case-insensitive; surrounding whitespace is trimmed.
pub(crate) fn split_alias(value: &str) -> Option<(&str, &str)> {
    // ASCII lowercasing preserves byte offsets.
    let pos = value.to_ascii_lowercase().find(" as ")?;
    Some((value[..pos].trim(), value[pos + 4..].trim()))
}

impl From<&str> for Ident {
    fn from(value: &str) -> Self {
        Ident::Name(value.to_string())
    }
}

impl From<String> for Ident {
    fn from(value: String) -> Self {
        Ident::Name(value)
    }
}

impl From<&String> for Ident {
    fn from(value: &String) -> Self {
        Ident::Name(value.clone())
    }
}

impl From<Expression> for Ident {
    fn from(value: Expression) -> Self {
        Ident::Raw(value)
    }
}

impl From<&Ident> for Ident {
    fn from(value: &Ident) -> Self {
        value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::raw;

    #[test]
    fn split_alias_lowercase() {
        assert_eq!(split_alias("users as u"), Some(("users", "u")));
    }

    #[test]
    fn split_alias_uppercase_keyword() {
        assert_eq!(split_alias("translations AS t"), Some(("translations", "t")));
    }

    #[test]
    fn split_alias_dotted_alias() {
        assert_eq!(split_alias("x.y as foo.bar"), Some(("x.y", "foo.bar")));
    }

    #[test]
    fn split_alias_none() {
        assert_eq!(split_alias("basket"), None);
        assert_eq!(split_alias("alias"), None);
    }

    #[test]
    fn unqualified_strips_table() {
        assert_eq!(Ident::from("users.email").unqualified(), Ident::from("email"));
        assert_eq!(Ident::from("email").unqualified(), Ident::from("email"));
    }

    #[test]
    fn raw_is_not_a_name() {
        let ident = Ident::from(raw("count(*)"));
        assert!(ident.is_raw());
        assert_eq!(ident.as_name(), None);
        assert!(!ident.is_wildcard());
        assert!(Ident::from("*").is_wildcard());
    }
}
