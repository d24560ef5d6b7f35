use crate::error::Result;
use crate::feature::{Feature, FeatureCollection};
use crate::wkt_format::{ReadOptions, WktFormat};

/// Center of a map view plus the WKT geometries (EPSG:4326) to show on it.
///
/// The center is opaque and handed back untouched; only the geometries are
/// interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct MapInformation<C> {
    center: C,
    geometries: Vec<String>,
}

impl<C> MapInformation<C> {
    pub fn new<I, S>(center: C, geometries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            center,
            geometries: geometries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn center(&self) -> &C {
        &self.center
    }

    pub fn geometries(&self) -> &[String] {
        &self.geometries
    }

    /// Parse every geometry and reproject it from EPSG:4326 to EPSG:3857.
    ///
    /// Output order matches `geometries`. A single malformed geometry fails
    /// the whole call with a parse error naming its index.
    pub fn transform_geometries_to_features(&self) -> Result<Vec<Feature>> {
        self.transform_geometries_to_features_with(&ReadOptions::default())
    }

    pub fn transform_geometries_to_features_with(&self, options: &ReadOptions) -> Result<Vec<Feature>> {
        WktFormat::new(*options).read_features(&self.geometries)
    }

    pub fn transform_geometries_to_collection(&self) -> Result<FeatureCollection> {
        self.transform_geometries_to_features().map(FeatureCollection::new)
    }
}
