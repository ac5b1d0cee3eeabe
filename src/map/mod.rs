pub mod manager;
pub mod styler;
pub mod terminal;

pub use manager::GeoJsonLayerManager;
pub use styler::FeatureStyler;
