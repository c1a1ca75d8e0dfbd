//! Dynamic where: `whereNameAndEmail` style method names.

use super::Builder;
use crate::clause::Connector;
use crate::error::{QbError, QbResult};
use crate::value::Value;

/// Split a dynamic finder name into `(connector, column)` pairs.
///
/// A leading `where` is removed, then the rest is cut at every `And` or `Or`
/// that is immediately followed by an upper-case letter. Each column inherits
/// the most recent connector (initially `and`). Column segments are returned
/// verbatim; empty segments are dropped.
///
/// ```
/// use sqlfluent::builder::split_dynamic_where;
/// use sqlfluent::Connector;
///
/// assert_eq!(
///     split_dynamic_where("whereNameAndEmailOrPhone"),
///     vec![
///         (Connector::And, "Name"),
///         (Connector::And, "Email"),
///         (Connector::Or, "Phone"),
///     ]
/// );
/// ```
pub fn split_dynamic_where(method: &str) -> Vec<(Connector, &str)> {
    let finder = method.strip_prefix("where").unwrap_or(method);
    let bytes = finder.as_bytes();

    let mut out = Vec::new();
    let mut connector = Connector::And;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let matched = [("And", Connector::And), ("Or", Connector::Or)]
            .into_iter()
            .find(|(keyword, _)| {
                bytes[i..].starts_with(keyword.as_bytes())
                    && bytes
                        .get(i + keyword.len())
                        .is_some_and(u8::is_ascii_uppercase)
            });

        match matched {
            Some((keyword, next)) => {
                if i > start {
                    out.push((connector, &finder[start..i]));
                }
                connector = next;
                i += keyword.len();
                start = i;
            }
            None => i += 1,
        }
    }

    if start < finder.len() {
        out.push((connector, &finder[start..]));
    }
    out
}

impl Builder {
    /// Add one equality where per column named in `method`, consuming
    /// `parameters` in order.
    ///
    /// Fails with [`QbError::InvalidArgument`], adding nothing, when there are
    /// fewer parameters than columns.
    pub fn dynamic_where(&mut self, method: &str, parameters: &[Value]) -> QbResult<&mut Self> {
        let segments = split_dynamic_where(method);
        if parameters.len() < segments.len() {
            return Err(QbError::invalid_argument(format!(
                "dynamic where `{method}` names {} columns but got {} parameters",
                segments.len(),
                parameters.len()
            )));
        }
        for ((connector, column), value) in segments.into_iter().zip(parameters.iter().cloned()) {
            match connector {
                Connector::And => self.where_eq(column, value),
                Connector::Or => self.or_where_eq(column, value),
            };
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_single_column() {
        assert_eq!(split_dynamic_where("whereEmail"), vec![(Connector::And, "Email")]);
    }

    #[test]
    fn keyword_needs_uppercase_successor() {
        // "Order" contains "Or" followed by a lower-case letter.
        assert_eq!(
            split_dynamic_where("whereOrderAndBrand"),
            vec![(Connector::And, "Order"), (Connector::And, "Brand")]
        );
        assert_eq!(
            split_dynamic_where("whereAndroid"),
            vec![(Connector::And, "Android")]
        );
    }

    #[test]
    fn connector_carries_forward() {
        assert_eq!(
            split_dynamic_where("whereAOrBC"),
            vec![(Connector::And, "A"), (Connector::Or, "BC")]
        );
    }

    #[test]
    fn empty_segments_are_dropped() {
        assert_eq!(
            split_dynamic_where("whereAndName"),
            vec![(Connector::And, "Name")]
        );
    }
}
