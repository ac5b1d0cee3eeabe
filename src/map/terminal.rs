use crate::geometry::viewport::Viewport;
use crate::models::{
    geometry::GeometryExtent,
    layer::{LayerId, PopupContent, RenderedLayer},
    style::Colour,
};
use crate::traits::{ControlPanel, MapSurface};
use crate::utils::status::print_layer_summary;
use std::collections::HashMap;

/// Map surface that draws into the terminal.
pub struct TerminalMap {
    width: u32,
    height: u32,
    legend: Vec<Colour>,
    top: usize,
    layers: HashMap<LayerId, usize>,
    next_id: u64,
    viewport: Viewport,
}

impl TerminalMap {
    pub fn new(width: u32, height: u32, legend: Vec<Colour>, top: usize) -> Self {
        TerminalMap {
            width,
            height,
            legend,
            top,
            layers: HashMap::new(),
            next_id: 0,
            viewport: Viewport::initial(),
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

impl MapSurface for TerminalMap {
    fn add_layer(&mut self, layer: &RenderedLayer) -> LayerId {
        self.next_id += 1;
        let id = LayerId(self.next_id);
        self.layers.insert(id, layer.len());
        print_layer_summary(layer, &self.legend, self.top);
        id
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.layers.remove(&id);
    }

    fn fit_bounds(&mut self, extent: &GeometryExtent, padding: u32) {
        self.viewport = Viewport::fit(extent, self.width, self.height, padding);
        println!(
            "📍 View: {:.4}, {:.4} @ z{} (extent [{:.4}, {:.4}, {:.4}, {:.4}])",
            self.viewport.center_lat,
            self.viewport.center_lon,
            self.viewport.zoom,
            extent.minx,
            extent.miny,
            extent.maxx,
            extent.maxy
        );
    }

    fn open_popup(&mut self, _geoid: &str, content: &PopupContent) {
        println!("\n💬 {}", content);
    }

    fn close_popup(&mut self, _geoid: &str) {}
}

/// Prints the stats panel instead of writing into the DOM.
#[derive(Debug, Default)]
pub struct TerminalPanel {
    pub sections_visible: bool,
    pub total_jobs: Option<String>,
}

impl ControlPanel for TerminalPanel {
    fn set_sections_visible(&mut self, visible: bool) {
        self.sections_visible = visible;
        if !visible {
            self.total_jobs = None;
        }
    }

    fn set_total_jobs(&mut self, text: &str) {
        println!("📊 Total jobs: {}", text);
        self.total_jobs = Some(text.to_string());
    }

    fn clear_total_jobs(&mut self) {
        self.total_jobs = None;
    }

    fn reset_filter_inputs(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_tracked_by_id() {
        let mut map = TerminalMap::new(800, 600, Vec::new(), 5);
        let layer = RenderedLayer {
            features: Vec::new(),
            max_value: 0.0,
            extent: None,
        };
        let a = map.add_layer(&layer);
        let b = map.add_layer(&layer);
        assert_ne!(a, b);
        map.remove_layer(a);
        assert_eq!(map.layer_count(), 1);
    }

    #[test]
    fn test_fit_updates_viewport() {
        let mut map = TerminalMap::new(1280, 720, Vec::new(), 5);
        assert_eq!(map.viewport().zoom, 4);
        map.fit_bounds(&GeometryExtent::from((-75.0, 40.0, -73.0, 41.6)), 50);
        assert!(map.viewport().zoom > 4);
    }
}
