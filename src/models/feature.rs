use serde::{Deserialize, Serialize};

/// Properties attached to each block-group feature by the jobs API.
///
/// Every optional field treats JSON `null` and a missing key the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockGroupProperties {
    pub bg_geoid: String,
    #[serde(default)]
    pub total_jobs: Option<f64>,
    /// Only present when the collection came from a filtered query.
    #[serde(default)]
    pub metric_value: Option<f64>,
    #[serde(default)]
    pub ca01: Option<f64>,
    #[serde(default)]
    pub ca02: Option<f64>,
    #[serde(default)]
    pub ca03: Option<f64>,
    #[serde(default)]
    pub active_filters: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockGroupFeature {
    #[serde(default)]
    pub geometry: Option<geojson::Geometry>,
    pub properties: BlockGroupProperties,
}

/// GeoJSON FeatureCollection of block groups for one CBSA.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockGroupCollection {
    #[serde(default)]
    pub features: Vec<BlockGroupFeature>,
}

/// Which number a block group displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectiveMetric {
    Filtered(f64),
    Baseline(f64),
    Missing,
}

impl EffectiveMetric {
    pub fn value(&self) -> f64 {
        match self {
            EffectiveMetric::Filtered(v) | EffectiveMetric::Baseline(v) => *v,
            EffectiveMetric::Missing => 0.0,
        }
    }
}

impl BlockGroupProperties {
    /// `metric_value` wins over `total_jobs` whenever it is present.
    pub fn effective_metric(&self) -> EffectiveMetric {
        match (self.metric_value, self.total_jobs) {
            (Some(v), _) => EffectiveMetric::Filtered(v),
            (None, Some(v)) => EffectiveMetric::Baseline(v),
            (None, None) => EffectiveMetric::Missing,
        }
    }

    /// Active filter codes, `None` when the list is absent or empty.
    pub fn active_filter_codes(&self) -> Option<&[String]> {
        self.active_filters.as_deref().filter(|codes| !codes.is_empty())
    }
}

impl BlockGroupFeature {
    pub fn geoid(&self) -> &str {
        &self.properties.bg_geoid
    }

    pub fn effective_value(&self) -> f64 {
        self.properties.effective_metric().value()
    }
}

impl BlockGroupCollection {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }
}
