pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod logging;
pub mod progress;

pub use constants::*;
pub use coordinates::{normalize, PackedCoordinate, SecondsScale};
pub use filename::{generate_output_path, timestamped_filename};
pub use logging::init_logging;
pub use progress::ProgressReporter;
