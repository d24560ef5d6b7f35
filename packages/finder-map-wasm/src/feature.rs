use geo::BoundingRect;
use geo_types::{Geometry, Rect};
use geozero::ToJson;
use serde_json::{json, Map, Value};

use crate::error::{MapError, Result};

/// A geometry ready to be placed on a map, with free-form properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    geometry: Geometry<f64>,
    properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry,
            properties: Map::new(),
        }
    }

    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    pub fn into_geometry(self) -> Geometry<f64> {
        self.geometry
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: Value) {
        self.properties.insert(key.into(), value);
    }

    /// GeoJSON type name of the geometry, e.g. "Polygon".
    pub fn geometry_type(&self) -> &'static str {
        geometry_type_name(&self.geometry)
    }

    /// Bounding rectangle of the geometry; `None` when it has no coordinates.
    pub fn extent(&self) -> Option<Rect<f64>> {
        self.geometry.bounding_rect()
    }

    /// Encode as a GeoJSON `Feature` object.
    pub fn to_geojson(&self) -> Result<Value> {
        let encoded = self
            .geometry
            .to_json()
            .map_err(|e| MapError::Serialize(e.to_string()))?;
        let geometry: Value = serde_json::from_str(&encoded)?;
        Ok(json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": Value::Object(self.properties.clone()),
        }))
    }
}

impl From<Geometry<f64>> for Feature {
    fn from(geometry: Geometry<f64>) -> Self {
        Feature::new(geometry)
    }
}

pub fn geometry_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "LineString",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Polygon",
        Geometry::Triangle(_) => "Polygon",
    }
}

/// Ordered batch of features handed to the renderer in one go.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Union of all member extents, used to fit the map view.
    pub fn extent(&self) -> Option<Rect<f64>> {
        self.features
            .iter()
            .filter_map(Feature::extent)
            .reduce(|a, b| {
                Rect::new(
                    (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                    (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
                )
            })
    }

    pub fn to_geojson(&self) -> Result<Value> {
        let features = self
            .features
            .iter()
            .map(Feature::to_geojson)
            .collect::<Result<Vec<_>>>()?;
        Ok(json!({
            "type": "FeatureCollection",
            "features": features,
        }))
    }
}

impl From<Vec<Feature>> for FeatureCollection {
    fn from(features: Vec<Feature>) -> Self {
        FeatureCollection::new(features)
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}
