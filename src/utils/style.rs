use crate::models::style::Colour;
use colorgrad::{Gradient, preset};
use thiserror::Error;

/// Low end of the default ramp.
pub const LOW_COLOUR: Colour = Colour::new(0xF2, 0xF5, 0xD0);
/// High end of the default ramp.
pub const HIGH_COLOUR: Colour = Colour::new(0xF9, 0x95, 0x7F);

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("Invalid colour '{0}': {1}")]
    InvalidColour(String, String),
    #[error("Unknown palette '{0}'")]
    UnknownPalette(String),
}

pub fn is_builtin_palette(name: &str) -> bool {
    matches!(
        name,
        "viridis"
            | "magma"
            | "plasma"
            | "inferno"
            | "turbo"
            | "cubehelix_default"
            | "rainbow"
            | "spectral"
            | "sinebow"
    )
}

pub fn get_builtin_gradient(name: &str) -> Option<Box<dyn Gradient>> {
    Some(match name {
        "viridis" => Box::new(preset::viridis()),
        "magma" => Box::new(preset::magma()),
        "plasma" => Box::new(preset::plasma()),
        "inferno" => Box::new(preset::inferno()),
        "turbo" => Box::new(preset::turbo()),
        "cubehelix_default" => Box::new(preset::cubehelix_default()),
        "rainbow" => Box::new(preset::rainbow()),
        "spectral" => Box::new(preset::spectral()),
        "sinebow" => Box::new(preset::sinebow()),
        _ => return None,
    })
}

/// Parse any CSS colour string (`#F2F5D0`, `rgb(...)`, `tomato`).
pub fn parse_colour(text: &str) -> Result<Colour, PaletteError> {
    let parsed = colorgrad::Color::from_html(text)
        .map_err(|e| PaletteError::InvalidColour(text.to_string(), e.to_string()))?;
    let [red, green, blue, _] = parsed.to_rgba8();
    Ok(Colour::new(red, green, blue))
}

enum Ramp {
    Linear { low: Colour, high: Colour },
    Preset(Box<dyn Gradient>),
}

/// Maps a metric and the layer maximum onto a fill colour.
pub struct ColourScale {
    ramp: Ramp,
}

impl Default for ColourScale {
    fn default() -> Self {
        ColourScale::linear(LOW_COLOUR, HIGH_COLOUR)
    }
}

impl ColourScale {
    pub fn linear(low: Colour, high: Colour) -> Self {
        ColourScale {
            ramp: Ramp::Linear { low, high },
        }
    }

    /// `default` is the two-stop ramp; anything else must name a built-in preset.
    pub fn from_palette(name: &str) -> Result<Self, PaletteError> {
        if name == "default" {
            return Ok(ColourScale::default());
        }
        get_builtin_gradient(name)
            .map(|grad| ColourScale {
                ramp: Ramp::Preset(grad),
            })
            .ok_or_else(|| PaletteError::UnknownPalette(name.to_string()))
    }

    /// Colour of the bottom of the ramp.
    pub fn min_colour(&self) -> Colour {
        self.at(0.0)
    }

    pub fn colour_for(&self, value: f64, max: Option<f64>) -> Colour {
        let max = match max {
            Some(m) if m > 0.0 => m,
            // also catches NaN
            _ => return self.min_colour(),
        };
        let t = (value / max).clamp(0.0, 1.0);
        if t.is_nan() {
            return self.min_colour();
        }
        self.at(t)
    }

    fn at(&self, t: f64) -> Colour {
        match &self.ramp {
            Ramp::Linear { low, high } => Colour::new(
                lerp(low.red, high.red, t),
                lerp(low.green, high.green, t),
                lerp(low.blue, high.blue, t),
            ),
            Ramp::Preset(grad) => {
                let [r, g, b, _] = grad.at(t as f32).to_rgba8();
                Colour::new(r, g, b)
            }
        }
    }

    /// `n` evenly spaced samples from bottom to top, for colour bars.
    pub fn samples(&self, n: usize) -> Vec<Colour> {
        match n {
            0 => Vec::new(),
            1 => vec![self.at(0.0)],
            _ => (0..n)
                .map(|i| self.at(i as f64 / (n - 1) as f64))
                .collect(),
        }
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    let (a, b) = (a as f64, b as f64);
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}
