pub mod source;
pub mod surface;

pub use source::JobsSource;
pub use surface::{ControlPanel, LoadingSurface, MapSurface};
