use super::styler::FeatureStyler;
use crate::loading::LoadingIndicator;
use crate::models::{
    feature::{BlockGroupCollection, BlockGroupFeature},
    filter::FilterCatalog,
    geometry::GeometryExtent,
    layer::{LayerId, PopupTrigger, RenderedFeature, RenderedLayer},
};
use crate::traits::MapSurface;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_FIT_PADDING: u32 = 50;

/// Owns the one block-group layer on the map and replaces it wholesale.
pub struct GeoJsonLayerManager<M: MapSurface> {
    surface: M,
    styler: FeatureStyler,
    catalog: FilterCatalog,
    loading: Arc<LoadingIndicator>,
    padding: u32,
    current: Option<(LayerId, RenderedLayer)>,
    current_bounds: Option<GeometryExtent>,
    open_popup: Option<String>,
}

impl<M: MapSurface> GeoJsonLayerManager<M> {
    pub fn new(surface: M, styler: FeatureStyler, loading: Arc<LoadingIndicator>) -> Self {
        GeoJsonLayerManager {
            surface,
            styler,
            catalog: FilterCatalog::default(),
            loading,
            padding: DEFAULT_FIT_PADDING,
            current: None,
            current_bounds: None,
            open_popup: None,
        }
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Catalog used to label filtered popups.
    pub fn set_catalog(&mut self, catalog: FilterCatalog) {
        self.catalog = catalog;
    }

    pub fn current_layer(&self) -> Option<&RenderedLayer> {
        self.current.as_ref().map(|(_, layer)| layer)
    }

    pub fn current_bounds(&self) -> Option<&GeometryExtent> {
        self.current_bounds.as_ref()
    }

    pub fn surface(&self) -> &M {
        &self.surface
    }

    /// Replace whatever is on the map with `collection`.
    pub fn load(&mut self, collection: BlockGroupCollection) {
        self.clear();

        if collection.is_empty() {
            warn!("No features to display");
            return;
        }

        let total = collection.len();
        let features: Vec<BlockGroupFeature> = collection
            .features
            .into_iter()
            .filter(|f| f.effective_value() > 0.0)
            .collect();

        if features.is_empty() {
            warn!("No block groups with jobs to display ({} features, all zero)", total);
            return;
        }

        // Scale over exactly the features that will be drawn
        let max_value = features
            .iter()
            .map(BlockGroupFeature::effective_value)
            .fold(f64::NEG_INFINITY, f64::max);

        let rendered: Vec<RenderedFeature> = features
            .into_iter()
            .map(|f| RenderedFeature {
                geoid: f.geoid().to_string(),
                value: f.effective_value(),
                style: self.styler.style_for(&f, Some(max_value)),
                popup: self.styler.popup_for(&f, &self.catalog),
                popup_trigger: PopupTrigger::Hover,
                geometry: f.geometry,
            })
            .collect();

        let extent = GeometryExtent::covering(rendered.iter().filter_map(|f| f.geometry.as_ref()));
        let layer = RenderedLayer {
            features: rendered,
            max_value,
            extent,
        };

        let id = self.surface.add_layer(&layer);
        info!(
            "Rendered {} of {} block groups (max {})",
            layer.len(),
            total,
            max_value
        );

        match extent {
            Some(bounds) => {
                self.surface.fit_bounds(&bounds, self.padding);
                self.current_bounds = Some(bounds);
            }
            None => debug!("Layer has no geometry to fit"),
        }
        self.current = Some((id, layer));

        // Not tied to the fit animation finishing
        self.loading.hide();
    }

    /// Remove the current layer, if any.
    pub fn clear(&mut self) {
        if let Some(geoid) = self.open_popup.take() {
            self.surface.close_popup(&geoid);
        }
        if let Some((id, _)) = self.current.take() {
            self.surface.remove_layer(id);
        }
        self.current_bounds = None;
    }

    /// Refit the view to the last rendered bounds.
    pub fn fit_to_extent(&mut self) -> bool {
        match self.current_bounds {
            Some(bounds) => {
                self.surface.fit_bounds(&bounds, self.padding);
                true
            }
            None => false,
        }
    }

    /// Pointer entered a rendered block group: open its popup.
    pub fn pointer_enter(&mut self, geoid: &str) -> bool {
        let Some((_, layer)) = &self.current else {
            return false;
        };
        let Some(feature) = layer.feature(geoid) else {
            return false;
        };
        if self.open_popup.as_deref() == Some(geoid) {
            return true;
        }
        if let Some(previous) = self.open_popup.take() {
            self.surface.close_popup(&previous);
        }
        self.surface.open_popup(geoid, &feature.popup);
        self.open_popup = Some(geoid.to_string());
        true
    }

    pub fn pointer_leave(&mut self, geoid: &str) {
        if self.open_popup.as_deref() == Some(geoid) {
            self.open_popup = None;
            self.surface.close_popup(geoid);
        }
    }
}
