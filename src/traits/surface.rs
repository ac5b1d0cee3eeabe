use crate::models::{
    geometry::GeometryExtent,
    layer::{LayerId, PopupContent, RenderedLayer},
};

/// The rendering surface a layer manager draws on.
pub trait MapSurface {
    fn add_layer(&mut self, layer: &RenderedLayer) -> LayerId;
    fn remove_layer(&mut self, id: LayerId);
    /// `padding` is in screen pixels on every side.
    fn fit_bounds(&mut self, extent: &GeometryExtent, padding: u32);
    fn open_popup(&mut self, geoid: &str, content: &PopupContent);
    fn close_popup(&mut self, geoid: &str);
}

/// Whatever shows the "loading" overlay.
pub trait LoadingSurface: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Filter and stats panels next to the map.
pub trait ControlPanel {
    fn set_sections_visible(&mut self, visible: bool);
    fn set_total_jobs(&mut self, text: &str);
    /// Blank the total until the selected CBSA's summary arrives.
    fn clear_total_jobs(&mut self);
    fn reset_filter_inputs(&mut self);
}
