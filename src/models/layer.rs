use crate::models::{geometry::GeometryExtent, style::VisualStyle};
use serde::Serialize;
use std::fmt;

/// Handle of a layer installed on a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LayerId(pub u64);

/// How a popup is opened and closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PopupTrigger {
    /// Open on pointer-enter, close on pointer-leave.
    Hover,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupContent {
    pub header: String,
    pub lines: Vec<PopupLine>,
}

impl PopupContent {
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div class=\"popup-content\">");
        html.push_str(&format!("<h3>{}</h3>", escape_html(&self.header)));
        for line in &self.lines {
            html.push_str(&format!(
                "<p><strong>{}:</strong> {}</p>",
                escape_html(&line.label),
                escape_html(&line.value)
            ));
        }
        html.push_str("</div>");
        html
    }
}

impl fmt::Display for PopupContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)?;
        for line in &self.lines {
            write!(f, "\n  {}: {}", line.label, line.value)?;
        }
        Ok(())
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedFeature {
    pub geoid: String,
    pub value: f64,
    pub geometry: Option<geojson::Geometry>,
    pub style: VisualStyle,
    pub popup: PopupContent,
    pub popup_trigger: PopupTrigger,
}

/// A fully styled layer. Built once per load and never patched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedLayer {
    pub features: Vec<RenderedFeature>,
    /// Maximum effective metric over exactly the rendered features.
    pub max_value: f64,
    pub extent: Option<GeometryExtent>,
}

impl RenderedLayer {
    pub fn feature(&self, geoid: &str) -> Option<&RenderedFeature> {
        self.features.iter().find(|f| f.geoid == geoid)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
