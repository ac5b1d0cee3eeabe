pub mod config;
pub mod controller;
pub mod geometry;
pub mod loading;
pub mod map;
pub mod models;
pub mod reader;
pub mod traits;
pub mod utils;

pub use config::{Config, Source};
pub use controller::{SelectionController, SelectionError};
