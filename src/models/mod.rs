pub mod obstacle;
pub mod relocation;
pub mod surface;

pub use obstacle::{
    ObstacleColumns, ObstacleRecord, ProcedureStatus, SignificantObstacle, UnclearObstacle,
};
pub use relocation::RelocatedObstacle;
pub use surface::SurfaceObstacle;
