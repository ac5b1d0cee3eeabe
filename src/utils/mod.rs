pub mod format;
pub mod labels;
pub mod status;
pub mod style;
