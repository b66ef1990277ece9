pub mod distance;
pub mod filter;
pub mod join;
pub mod statistics;

pub use distance::{DistanceCalculator, GeometryColumns, GeometryKind, RelocationDistances};
pub use filter::{Predicate, RowFilter};
pub use join::{left_join, normalize_identifier, IdentifierIndex};
pub use statistics::DistanceStatistics;
