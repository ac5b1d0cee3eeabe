use crate::loading::DEFAULT_LOADER_DELAY;
use crate::map::manager::DEFAULT_FIT_PADDING;
use crate::models::filter::ActiveFilterSelection;
use crate::reader::remote::DEFAULT_API_URL;
use crate::utils::style::{
    ColourScale, HIGH_COLOUR, LOW_COLOUR, PaletteError, is_builtin_palette, parse_colour,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Where block groups come from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Local(PathBuf),
    Remote { base_url: String },
}

/// Job counts per census block group for one metro area
#[derive(Parser, Debug, Clone)]
#[command(name = "jobmap", version, about)]
pub struct Config {
    /// Base URL of the jobs API
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Read an exported folder instead of calling the API
    #[arg(long)]
    pub data_folder: Option<PathBuf>,

    /// Milliseconds before the loading indicator appears
    #[arg(long, default_value_t = DEFAULT_LOADER_DELAY.as_millis() as u64)]
    pub loader_delay_ms: u64,

    /// Pixels kept free around the block groups when fitting the view
    #[arg(long, default_value_t = DEFAULT_FIT_PADDING)]
    pub fit_padding: u32,

    /// `default` or a built-in gradient (viridis, magma, turbo, ...)
    #[arg(long, default_value = "default")]
    pub palette: String,

    /// Low end of the default ramp
    #[arg(long)]
    pub low_colour: Option<String>,

    /// High end of the default ramp
    #[arg(long)]
    pub high_colour: Option<String>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// CBSA code to show, e.g. 35620
    #[arg(long)]
    pub cbsa: Option<String>,

    #[arg(long)]
    pub employment_code: Option<String>,

    #[arg(long)]
    pub age_group: Option<String>,

    #[arg(long)]
    pub earnings_bracket: Option<String>,

    #[arg(long)]
    pub education_level: Option<String>,

    /// Open the popup of one block group after loading
    #[arg(long, value_name = "GEOID")]
    pub inspect: Option<String>,

    /// Rows in the block group summary
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Print the CBSA list
    #[arg(long)]
    pub list: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            data_folder: None,
            loader_delay_ms: DEFAULT_LOADER_DELAY.as_millis() as u64,
            fit_padding: DEFAULT_FIT_PADDING,
            palette: "default".to_string(),
            low_colour: None,
            high_colour: None,
            width: 1280,
            height: 720,
            cbsa: None,
            employment_code: None,
            age_group: None,
            earnings_bracket: None,
            education_level: None,
            inspect: None,
            top: 10,
            list: false,
        }
    }
}

impl Config {
    pub fn source(&self) -> Source {
        match &self.data_folder {
            Some(folder) => Source::Local(folder.clone()),
            None => Source::Remote {
                base_url: self.api_url.clone(),
            },
        }
    }

    pub fn loader_delay(&self) -> Duration {
        Duration::from_millis(self.loader_delay_ms)
    }

    /// Presets ignore the end colours; `default` takes them as overrides.
    pub fn colour_scale(&self) -> Result<ColourScale, PaletteError> {
        if is_builtin_palette(&self.palette) {
            return ColourScale::from_palette(&self.palette);
        }
        if self.palette != "default" {
            return Err(PaletteError::UnknownPalette(self.palette.clone()));
        }
        let low = match &self.low_colour {
            Some(text) => parse_colour(text)?,
            None => LOW_COLOUR,
        };
        let high = match &self.high_colour {
            Some(text) => parse_colour(text)?,
            None => HIGH_COLOUR,
        };
        Ok(ColourScale::linear(low, high))
    }

    pub fn filters(&self) -> ActiveFilterSelection {
        ActiveFilterSelection {
            employment_code: self.employment_code.clone(),
            age_group: self.age_group.clone(),
            earnings_bracket: self.earnings_bracket.clone(),
            education_level: self.education_level.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_parsed_defaults() {
        let parsed = Config::parse_from(["jobmap"]);
        let default = Config::default();
        assert_eq!(parsed.api_url, default.api_url);
        assert_eq!(parsed.loader_delay(), DEFAULT_LOADER_DELAY);
        assert_eq!(parsed.fit_padding, 50);
        assert_eq!(parsed.top, default.top);
        assert_eq!(
            parsed.source(),
            Source::Remote {
                base_url: "http://localhost:8000/api".to_string()
            }
        );
        assert!(parsed.filters().is_empty());
    }

    #[test]
    fn test_data_folder_selects_local_source() {
        let config = Config::parse_from(["jobmap", "--data-folder", "export", "--cbsa", "35620"]);
        assert_eq!(config.source(), Source::Local(PathBuf::from("export")));
        assert_eq!(config.cbsa.as_deref(), Some("35620"));
    }

    #[test]
    fn test_filter_flags() {
        let config = Config::parse_from([
            "jobmap",
            "--employment-code",
            "CNS07",
            "--education-level",
            "CD04",
        ]);
        let filters = config.filters();
        assert_eq!(
            filters.query_pairs(),
            vec![("employment_code", "CNS07"), ("education_level", "CD04")]
        );
    }

    #[test]
    fn test_colour_scale_overrides() {
        let config = Config {
            low_colour: Some("#000000".to_string()),
            high_colour: Some("white".to_string()),
            ..Default::default()
        };
        let scale = config.colour_scale().unwrap();
        assert_eq!(scale.colour_for(0.0, Some(1.0)).to_string(), "#000000");
        assert_eq!(scale.colour_for(1.0, Some(1.0)).to_string(), "#FFFFFF");
    }

    #[test]
    fn test_colour_scale_rejects_bad_input() {
        let config = Config {
            palette: "sepia".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.colour_scale(),
            Err(PaletteError::UnknownPalette(_))
        ));

        let config = Config {
            low_colour: Some("not-a-colour".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.colour_scale(),
            Err(PaletteError::InvalidColour(..))
        ));
    }

    #[test]
    fn test_preset_palette() {
        let config = Config::parse_from(["jobmap", "--palette", "viridis"]);
        assert!(config.colour_scale().is_ok());
    }
}
