use crate::readers::AttributeRow;
use serde::{Deserialize, Serialize};

/// A predicate over attribute rows.
///
/// Comparisons are on trimmed values. A missing column, or a non-numeric
/// value under [`Predicate::AtLeast`], never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Equals { column: String, value: String },
    OneOf { column: String, values: Vec<String> },
    AtLeast { column: String, threshold: f64 },
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn equals(column: &str, value: &str) -> Self {
        Predicate::Equals {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    pub fn one_of<S: AsRef<str>>(column: &str, values: &[S]) -> Self {
        Predicate::OneOf {
            column: column.to_string(),
            values: values.iter().map(|v| v.as_ref().to_string()).collect(),
        }
    }

    pub fn at_least(column: &str, threshold: f64) -> Self {
        Predicate::AtLeast {
            column: column.to_string(),
            threshold,
        }
    }

    pub fn matches(&self, row: &AttributeRow) -> bool {
        match self {
            Predicate::Equals { column, value } => {
                row.get(column).is_some_and(|v| v.trim() == value)
            }
            Predicate::OneOf { column, values } => row
                .get(column)
                .is_some_and(|v| values.iter().any(|candidate| v.trim() == candidate)),
            Predicate::AtLeast { column, threshold } => {
                row.get_f64(column).is_some_and(|v| v >= *threshold)
            }
            Predicate::All(predicates) => predicates.iter().all(|p| p.matches(row)),
            Predicate::Any(predicates) => predicates.iter().any(|p| p.matches(row)),
        }
    }
}

/// Keeps the rows that satisfy a predicate, counting what it drops
pub struct RowFilter {
    predicate: Predicate,
    rejected: usize,
}

impl RowFilter {
    pub fn new(predicate: Predicate) -> Self {
        Self {
            predicate,
            rejected: 0,
        }
    }

    pub fn accept(&mut self, row: &AttributeRow) -> bool {
        let keep = self.predicate.matches(row);
        if !keep {
            self.rejected += 1;
        }
        keep
    }

    pub fn filter(&mut self, rows: impl IntoIterator<Item = AttributeRow>) -> Vec<AttributeRow> {
        rows.into_iter().filter(|row| self.accept(row)).collect()
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn obstacle(id: &str, procedure: &str, ready: &str, agl: &str) -> AttributeRow {
        AttributeRow::from_pairs(
            0,
            [
                ("ID", id),
                ("PROCEDURE", procedure),
                ("READY", ready),
                ("AGL_M_M", agl),
            ],
        )
    }

    fn significance() -> Predicate {
        Predicate::All(vec![
            Predicate::one_of("PROCEDURE", &["remove", "dismantle", "Out of date"]),
            Predicate::equals("READY", "yes"),
            Predicate::at_least("AGL_M_M", 100.0),
        ])
    }

    #[test]
    fn test_equals_trims_values() {
        let row = obstacle("1", " Relocated ", "yes", "10");
        assert!(Predicate::equals("PROCEDURE", "Relocated").matches(&row));
        assert!(!Predicate::equals("PROCEDURE", "relocated").matches(&row));
        assert!(!Predicate::equals("OWNER", "Relocated").matches(&row));
    }

    #[test]
    fn test_compound_predicate() {
        let predicate = significance();

        assert!(predicate.matches(&obstacle("1", "remove", "yes", "100")));
        assert!(predicate.matches(&obstacle("2", "Out of date", "yes", "150.5")));
        assert!(!predicate.matches(&obstacle("3", "remove", "no", "150")));
        assert!(!predicate.matches(&obstacle("4", "dismantle", "yes", "99.9")));
        assert!(!predicate.matches(&obstacle("5", "Relocated", "yes", "200")));
        assert!(!predicate.matches(&obstacle("6", "remove", "yes", "")));
        assert!(!predicate.matches(&obstacle("7", "remove", "yes", "tall")));
    }

    #[test]
    fn test_any_predicate() {
        let predicate = Predicate::Any(vec![
            Predicate::equals("PROCEDURE", "Unclear"),
            Predicate::equals("PROCEDURE", "Relocated"),
        ]);
        assert!(predicate.matches(&obstacle("1", "Unclear", "", "")));
        assert!(!predicate.matches(&obstacle("1", "remove", "", "")));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let rows = vec![
            obstacle("1", "remove", "yes", "120"),
            obstacle("2", "remove", "no", "120"),
            obstacle("3", "dismantle", "yes", "300"),
            obstacle("4", "Unclear", "yes", "300"),
        ];

        let mut filter = RowFilter::new(significance());
        let once = filter.filter(rows);
        assert_eq!(filter.rejected(), 2);

        let mut again = RowFilter::new(significance());
        let twice = again.filter(once.clone());

        assert_eq!(once, twice);
        assert_eq!(again.rejected(), 0);
        assert_eq!(twice.len(), 2);
    }
}
