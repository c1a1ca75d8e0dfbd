//! Binding lists, kept per clause category.

use crate::error::{QbError, QbResult};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Clause category a binding belongs to.
///
/// Categories are flattened in declaration order, which is also the order in
/// which their placeholders appear in a compiled select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingCategory {
    Select,
    Join,
    Where,
    Having,
    Order,
}

impl BindingCategory {
    /// All categories, in flattening order.
    pub const ALL: [BindingCategory; 5] = [
        BindingCategory::Select,
        BindingCategory::Join,
        BindingCategory::Where,
        BindingCategory::Having,
        BindingCategory::Order,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BindingCategory::Select => "select",
            BindingCategory::Join => "join",
            BindingCategory::Where => "where",
            BindingCategory::Having => "having",
            BindingCategory::Order => "order",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for BindingCategory {
    type Err = QbError;

    fn from_str(s: &str) -> QbResult<Self> {
        BindingCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| QbError::InvalidBindingCategory(s.to_string()))
    }
}

impl fmt::Display for BindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bound values grouped by [`BindingCategory`].
///
/// Within a category, values keep insertion order. [`Value::Raw`] values are
/// never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    lists: [Vec<Value>; 5],
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values of one category.
    pub fn get(&self, category: BindingCategory) -> &[Value] {
        &self.lists[category.index()]
    }

    /// Append a value; raw expressions are skipped.
    pub fn push(&mut self, category: BindingCategory, value: Value) {
        if !value.is_raw() {
            self.lists[category.index()].push(value);
        }
    }

    /// Append several values, preserving their order.
    pub fn extend(&mut self, category: BindingCategory, values: impl IntoIterator<Item = Value>) {
        for value in values {
            self.push(category, value);
        }
    }

    /// Replace one category.
    pub fn set(&mut self, category: BindingCategory, values: Vec<Value>) {
        self.lists[category.index()] = values.into_iter().filter(|v| !v.is_raw()).collect();
    }

    /// Append every category of `other` onto the same-named category here.
    pub fn merge(&mut self, other: &Bindings) {
        for (mine, theirs) in self.lists.iter_mut().zip(other.lists.iter()) {
            mine.extend(theirs.iter().cloned());
        }
    }

    /// Total number of bound values.
    pub fn len(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }

    /// All values in `select, join, where, having, order` order.
    pub fn flatten(&self) -> Vec<Value> {
        let mut out = Vec::with_capacity(self.len());
        for list in &self.lists {
            out.extend(list.iter().cloned());
        }
        out
    }

    /// Flatten only the given categories, in flattening order.
    pub fn flatten_only(&self, categories: &[BindingCategory]) -> Vec<Value> {
        BindingCategory::ALL
            .into_iter()
            .filter(|c| categories.contains(c))
            .flat_map(|c| self.get(c).iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::raw;

    #[test]
    fn parse_known_categories() {
        for c in BindingCategory::ALL {
            assert_eq!(c.as_str().parse::<BindingCategory>().unwrap(), c);
        }
    }

    #[test]
    fn parse_unknown_category_fails() {
        let err = "foo".parse::<BindingCategory>().unwrap_err();
        assert!(matches!(err, QbError::InvalidBindingCategory(ref s) if s == "foo"));
    }

    #[test]
    fn flatten_uses_category_order() {
        let mut b = Bindings::new();
        b.push(BindingCategory::Order, Value::from(5));
        b.push(BindingCategory::Where, Value::from(3));
        b.push(BindingCategory::Select, Value::from(1));
        b.push(BindingCategory::Having, Value::from(4));
        b.push(BindingCategory::Join, Value::from(2));
        let flat: Vec<Value> = (1..=5).map(Value::from).collect();
        assert_eq!(b.flatten(), flat);
    }

    #[test]
    fn raw_values_are_not_stored() {
        let mut b = Bindings::new();
        b.push(BindingCategory::Where, Value::from(raw("now()")));
        assert!(b.is_empty());
    }

    #[test]
    fn merge_keeps_relative_order() {
        let mut parent = Bindings::new();
        parent.push(BindingCategory::Where, Value::from("a"));
        let mut child = Bindings::new();
        child.push(BindingCategory::Where, Value::from("b"));
        child.push(BindingCategory::Where, Value::from("c"));
        parent.merge(&child);
        assert_eq!(
            parent.get(BindingCategory::Where),
            &[Value::from("a"), Value::from("b"), Value::from("c")]
        );
    }
}
