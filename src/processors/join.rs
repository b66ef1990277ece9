use crate::readers::AttributeRow;
use std::collections::HashMap;

/// Canonical form of an obstacle identifier.
///
/// Exports disagree on whether IDs are integers, zero-padded strings or
/// floats, so integer-like values compare numerically: `"0042"`, `"42"` and
/// `"42.0"` all become `"42"`. Anything else is only trimmed.
pub fn normalize_identifier(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Ok(n) = trimmed.parse::<u64>() {
        return n.to_string();
    }

    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() && f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64 {
            return (f as u64).to_string();
        }
    }

    trimmed.to_string()
}

/// Identifier → ordered field sets, in first-seen key order.
#[derive(Debug, Clone)]
pub struct IdentifierIndex<T> {
    positions: HashMap<String, usize>,
    entries: Vec<(String, Vec<T>)>,
}

impl<T> IdentifierIndex<T> {
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Add `value` under `id`, after any values already stored for it
    pub fn insert_or_append(&mut self, id: &str, value: T) {
        let key = normalize_identifier(id);
        match self.positions.get(&key) {
            Some(&pos) => self.entries[pos].1.push(value),
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, vec![value]));
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&[T]> {
        self.positions
            .get(&normalize_identifier(id))
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    pub fn first(&self, id: &str) -> Option<&T> {
        self.get(id).and_then(|values| values.first())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(&normalize_identifier(id))
    }

    /// Number of distinct identifiers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of stored field sets
    pub fn value_count(&self) -> usize {
        self.entries.iter().map(|(_, values)| values.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }
}

impl<T> Default for IdentifierIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierIndex<AttributeRow> {
    /// Index rows by the value of `key_column`; rows without it are dropped
    pub fn from_rows(rows: impl IntoIterator<Item = AttributeRow>, key_column: &str) -> Self {
        let mut index = Self::new();
        for row in rows {
            match row.get_trimmed(key_column).map(str::to_string) {
                Some(id) => index.insert_or_append(&id, row),
                None => tracing::debug!(line = row.line(), "Row has no '{}' value", key_column),
            }
        }
        index
    }
}

/// Left join `left` to `right` on `left_key` = `right_key`.
///
/// Every left row appears exactly once, in order, paired with the first
/// right row sharing its identifier, or `None`.
pub fn left_join<'r>(
    left: Vec<AttributeRow>,
    left_key: &str,
    right: &'r IdentifierIndex<AttributeRow>,
) -> Vec<(AttributeRow, Option<&'r AttributeRow>)> {
    left.into_iter()
        .map(|row| {
            let matched = row.get_trimmed(left_key).and_then(|id| right.first(id));
            (row, matched)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("0042"), "42");
        assert_eq!(normalize_identifier(" 42 "), "42");
        assert_eq!(normalize_identifier("42.0"), "42");
        assert_eq!(normalize_identifier("42.5"), "42.5");
        assert_eq!(normalize_identifier("OB-17"), "OB-17");
        assert_eq!(normalize_identifier("0"), "0");
    }

    #[test]
    fn test_insert_or_append_keeps_order() {
        let mut index = IdentifierIndex::new();
        index.insert_or_append("7", "first");
        index.insert_or_append("3", "other");
        index.insert_or_append("007", "second");

        assert_eq!(index.len(), 2);
        assert_eq!(index.value_count(), 3);
        assert_eq!(index.get("7"), Some(&["first", "second"][..]));
        assert_eq!(index.first("7.0"), Some(&"first"));

        let keys: Vec<&str> = index.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["7", "3"]);

        index.insert_or_append("3.0", "appended");
        assert_eq!(index.get("3").unwrap().len(), 2);
        assert!(!index.contains("8"));
    }

    #[test]
    fn test_left_join_preserves_left_rows() {
        let left = vec![
            AttributeRow::from_pairs(1, [("IDENT", "100"), ("Delta", "5")]),
            AttributeRow::from_pairs(2, [("IDENT", "200"), ("Delta", "7")]),
            AttributeRow::from_pairs(3, [("IDENT", "100"), ("Delta", "9")]),
            AttributeRow::from_pairs(4, [("IDENT", ""), ("Delta", "1")]),
        ];
        let right = IdentifierIndex::from_rows(
            vec![
                AttributeRow::from_pairs(1, [("Id", "100"), ("N", "6015300")]),
                AttributeRow::from_pairs(2, [("Id", "100"), ("N", "6099999")]),
                AttributeRow::from_pairs(3, [("Id", "300"), ("N", "6020000")]),
            ],
            "Id",
        );

        let joined = left_join(left, "IDENT", &right);

        assert_eq!(joined.len(), 4);
        assert_eq!(joined[0].1.and_then(|r| r.get("N")), Some("6015300"));
        assert!(joined[1].1.is_none());
        assert_eq!(joined[2].1.and_then(|r| r.get("N")), Some("6015300"));
        assert!(joined[3].1.is_none());
        assert_eq!(joined[2].0.get("Delta"), Some("9"));
    }

    #[test]
    fn test_left_join_with_empty_right() {
        let left = vec![AttributeRow::from_pairs(1, [("IDENT", "1")])];
        let right = IdentifierIndex::new();
        let joined = left_join(left, "IDENT", &right);
        assert_eq!(joined.len(), 1);
        assert!(joined[0].1.is_none());
    }
}
