use super::projection::{WORLD_HALF_WIDTH, lon_lat_to_mercator, mercator_to_lon_lat};
use crate::models::geometry::GeometryExtent;
use serde::Serialize;

pub const TILE_SIZE: f64 = 256.0;
pub const MAX_ZOOM: u8 = 19;

/// Centre and zoom of a slippy-map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center_lon: f64,
    pub center_lat: f64,
    pub zoom: u8,
}

impl Viewport {
    /// Whole contiguous US, where the map starts.
    pub fn initial() -> Self {
        Viewport {
            center_lon: -98.5795,
            center_lat: 39.8283,
            zoom: 4,
        }
    }

    /// Largest whole zoom at which `extent`, padded by `padding` pixels on
    /// every side, fits a `width` x `height` pixel map.
    pub fn fit(extent: &GeometryExtent, width: u32, height: u32, padding: u32) -> Self {
        let (minx, miny) = lon_lat_to_mercator(extent.minx, extent.miny);
        let (maxx, maxy) = lon_lat_to_mercator(extent.maxx, extent.maxy);
        let (cx, cy) = ((minx + maxx) / 2.0, (miny + maxy) / 2.0);
        let (center_lon, center_lat) = mercator_to_lon_lat(cx, cy);

        // Padding larger than the map leaves no room; fall back to the raw size
        let usable = |size: u32| {
            let inner = size as f64 - 2.0 * padding as f64;
            if inner > 0.0 { inner } else { size.max(1) as f64 }
        };
        let (w, h) = (usable(width), usable(height));

        let span_x = (maxx - minx).abs();
        let span_y = (maxy - miny).abs();
        // meters per pixel at zoom 0
        let base_resolution = 2.0 * WORLD_HALF_WIDTH / TILE_SIZE;

        let zoom_for = |span: f64, pixels: f64| {
            if span <= 0.0 {
                f64::INFINITY
            } else {
                (base_resolution * pixels / span).log2()
            }
        };
        let zoom = zoom_for(span_x, w).min(zoom_for(span_y, h));
        let zoom = if zoom.is_finite() {
            zoom.floor().clamp(0.0, MAX_ZOOM as f64) as u8
        } else {
            MAX_ZOOM
        };

        Viewport {
            center_lon,
            center_lat,
            zoom,
        }
    }
}
