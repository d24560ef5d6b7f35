// Plain data structures handed across the JS boundary
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TransformedCoordinate {
    pub x: f64,
    pub y: f64,
}

impl From<geo_types::Coord<f64>> for TransformedCoordinate {
    fn from(c: geo_types::Coord<f64>) -> Self {
        Self { x: c.x, y: c.y }
    }
}
