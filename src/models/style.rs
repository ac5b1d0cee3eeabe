use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Colour {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Colour {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Colour { red, green, blue }
    }
}

/// Renders as `#RRGGBB`, uppercase.
impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

/// Per-feature polygon style handed to the map surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualStyle {
    pub fill_colour: Colour,
    pub weight: f64,
    pub opacity: f64,
    pub colour: Colour,
    pub dash_array: String,
    pub fill_opacity: f64,
}
