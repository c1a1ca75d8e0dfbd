//! Raw SQL fragments.

use serde::Serialize;
use std::fmt;

/// A trusted SQL fragment that is inlined verbatim.
///
/// Expressions bypass identifier quoting and parameterization wherever they
/// appear: as a column, as a table, or in value position.
///
/// # Example
/// ```ignore
/// use sqlfluent::{raw, Expression};
///
/// query.select_raw("count(*) as total", vec![]);
/// query.where_op("updated_at", ">", raw("now() - interval '1 day'"))?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Expression {
    value: String,
}

impl Expression {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The raw SQL text.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Shorthand for [`Expression::new`].
pub fn raw(value: impl Into<String>) -> Expression {
    Expression::new(value)
}
