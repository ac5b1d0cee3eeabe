use geo::BoundingRect;
use serde::Serialize;

/// Lon/lat bounding box of rendered geometry (EPSG:4326).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometryExtent {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl From<(f64, f64, f64, f64)> for GeometryExtent {
    fn from(extent: (f64, f64, f64, f64)) -> Self {
        GeometryExtent {
            minx: extent.0, // minx
            miny: extent.1, // miny
            maxx: extent.2, // maxx
            maxy: extent.3, // maxy
        }
    }
}

impl From<geo::Rect<f64>> for GeometryExtent {
    fn from(rect: geo::Rect<f64>) -> Self {
        let (min, max) = (rect.min(), rect.max());
        GeometryExtent::from((min.x, min.y, max.x, max.y))
    }
}

impl GeometryExtent {
    /// Smallest extent covering both.
    pub fn union(&self, other: &GeometryExtent) -> GeometryExtent {
        GeometryExtent {
            minx: self.minx.min(other.minx),
            miny: self.miny.min(other.miny),
            maxx: self.maxx.max(other.maxx),
            maxy: self.maxy.max(other.maxy),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.minx + self.maxx) / 2.0, (self.miny + self.maxy) / 2.0)
    }

    /// Extent of a single GeoJSON geometry, `None` for empty or unconvertible geometry.
    pub fn of_geometry(geometry: &geojson::Geometry) -> Option<GeometryExtent> {
        let geom = geo::Geometry::<f64>::try_from(geometry.value.clone()).ok()?;
        geom.bounding_rect().map(GeometryExtent::from)
    }

    /// Union of the extents of every geometry, `None` when nothing has coordinates.
    pub fn covering<'a, I>(geometries: I) -> Option<GeometryExtent>
    where
        I: IntoIterator<Item = &'a geojson::Geometry>,
    {
        geometries
            .into_iter()
            .filter_map(GeometryExtent::of_geometry)
            .reduce(|acc, e| acc.union(&e))
    }
}
