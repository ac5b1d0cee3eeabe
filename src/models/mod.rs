pub mod cbsa;
pub mod feature;
pub mod filter;
pub mod geometry;
pub mod layer;
pub mod style;
