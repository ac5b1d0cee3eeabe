use crate::models::{
    feature::BlockGroupFeature,
    filter::FilterCatalog,
    layer::{PopupContent, PopupLine},
    style::{Colour, VisualStyle},
};
use crate::utils::{format::format_count, labels::labels_for, style::ColourScale};

const STROKE_COLOUR: Colour = Colour::new(0x66, 0x66, 0x66);

/// Age breakdown fields shown under the headline count.
fn age_brackets(feature: &BlockGroupFeature) -> [(&'static str, Option<f64>); 3] {
    let props = &feature.properties;
    [
        ("Age 29 or younger", props.ca01),
        ("Age 30-54", props.ca02),
        ("Age 55+", props.ca03),
    ]
}

#[derive(Default)]
pub struct FeatureStyler {
    scale: ColourScale,
}

impl FeatureStyler {
    pub fn new(scale: ColourScale) -> Self {
        FeatureStyler { scale }
    }

    pub fn scale(&self) -> &ColourScale {
        &self.scale
    }

    pub fn style_for(&self, feature: &BlockGroupFeature, max_value: Option<f64>) -> VisualStyle {
        VisualStyle {
            fill_colour: self.scale.colour_for(feature.effective_value(), max_value),
            weight: 1.0,
            opacity: 0.8,
            colour: STROKE_COLOUR,
            dash_array: "3".to_string(),
            fill_opacity: 0.65,
        }
    }

    pub fn popup_for(&self, feature: &BlockGroupFeature, catalog: &FilterCatalog) -> PopupContent {
        let value = format_count(feature.effective_value());
        let headline = match feature.properties.active_filter_codes() {
            Some(codes) => PopupLine {
                label: format!("Filtered ({})", labels_for(codes, catalog).join(", ")),
                value,
            },
            None => PopupLine {
                label: "Total Jobs".to_string(),
                value,
            },
        };

        let mut lines = vec![headline];
        for (label, field) in age_brackets(feature) {
            match field {
                Some(count) if count != 0.0 => lines.push(PopupLine {
                    label: label.to_string(),
                    value: format_count(count),
                }),
                _ => {}
            }
        }

        PopupContent {
            header: format!("Block Group {}", feature.geoid()),
            lines,
        }
    }
}
