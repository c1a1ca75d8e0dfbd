//! Values carried alongside compiled SQL as positional bindings.

use crate::expression::Expression;
use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

/// Format used when a date-time binding is rendered as a SQL literal.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A value destined for a `?` placeholder.
///
/// [`Value::Raw`] is the exception: it is never bound and its SQL text is
/// inlined by the grammar instead of a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
    Json(serde_json::Value),
    Raw(Expression),
}

impl Value {
    /// Check if this value is a raw expression (inlined, never bound).
    pub fn is_raw(&self) -> bool {
        matches!(self, Value::Raw(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The raw expression, if this value is one.
    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Value::Raw(expr) => Some(expr),
            _ => None,
        }
    }

    /// Render the value as a SQL literal.
    ///
    /// Used when bindings are resolved into raw SQL text before execution.
    /// Strings are standard SQL literals: `'` is doubled and `\` is kept as is.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) if v.is_finite() => v.to_string(),
            Value::Float(v) => quote_literal(&v.to_string()),
            Value::Text(s) => quote_literal(s),
            Value::DateTime(dt) => quote_literal(&dt.format(DATE_FORMAT).to_string()),
            Value::Uuid(u) => quote_literal(&u.to_string()),
            Value::Json(json) => quote_literal(&json.to_string()),
            Value::Raw(expr) => expr.value().to_string(),
        }
    }
}

fn quote_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<Expression> for Value {
    fn from(v: Expression) -> Self {
        Value::Raw(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::raw;
    use chrono::NaiveDate;

    #[test]
    fn literal_text_escapes_quotes() {
        assert_eq!(Value::from("O'Brien").to_literal(), "'O''Brien'");
    }

    #[test]
    fn literal_scalars() {
        assert_eq!(Value::from(42).to_literal(), "42");
        assert_eq!(Value::from(1.5).to_literal(), "1.5");
        assert_eq!(Value::from(true).to_literal(), "TRUE");
        assert_eq!(Value::from(None::<i64>).to_literal(), "NULL");
    }

    #[test]
    fn literal_datetime_uses_date_format() {
        let dt = NaiveDate::from_ymd_opt(2014, 5, 1)
            .unwrap()
            .and_hms_opt(13, 4, 5)
            .unwrap();
        assert_eq!(Value::from(dt).to_literal(), "'2014-05-01 13:04:05'");
    }

    #[test]
    fn raw_is_inlined() {
        let v = Value::from(raw("now()"));
        assert!(v.is_raw());
        assert_eq!(v.to_literal(), "now()");
    }
}
