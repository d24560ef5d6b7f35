use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use geo::{CoordsIter, MapCoords};
use geo_types::{Coord, Geometry};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{MapError, Result};

/// Radius of the sphere used by Web Mercator (WGS84 semi-major axis).
pub const RADIUS: f64 = 6_378_137.0;

/// Half the width of the Web Mercator world in meters.
pub const HALF_SIZE: f64 = PI * RADIUS;

/// Largest northing the forward transform returns; keeps the poles finite.
pub fn max_safe_y() -> f64 {
    RADIUS * (PI / 2.0).tan().ln()
}

const EPSG_4326_CODES: &[&str] = &[
    "EPSG:4326",
    "CRS:84",
    "urn:ogc:def:crs:EPSG::4326",
    "urn:ogc:def:crs:EPSG:6.6:4326",
    "urn:ogc:def:crs:OGC:1.3:CRS84",
    "urn:ogc:def:crs:OGC:2:84",
    "http://www.opengis.net/def/crs/OGC/1.3/CRS84",
    "http://www.opengis.net/gml/srs/epsg.xml#4326",
    "urn:x-ogc:def:crs:EPSG:4326",
];

const EPSG_3857_CODES: &[&str] = &[
    "EPSG:3857",
    "EPSG:102100",
    "EPSG:102113",
    "EPSG:900913",
    "urn:ogc:def:crs:EPSG::3857",
    "urn:ogc:def:crs:EPSG:6.18:3:3857",
    "http://www.opengis.net/def/crs/EPSG/0/3857",
    "http://www.opengis.net/gml/srs/epsg.xml#3857",
];

/// The coordinate reference systems a map feature can be read from or into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Projection {
    /// Geographic longitude/latitude on WGS84.
    #[default]
    Epsg4326,
    /// Spherical Web Mercator in meters.
    Epsg3857,
}

impl Projection {
    pub fn code(&self) -> &'static str {
        match self {
            Projection::Epsg4326 => "EPSG:4326",
            Projection::Epsg3857 => "EPSG:3857",
        }
    }

    /// Look up a projection by its numeric EPSG code.
    pub fn from_epsg(epsg: u32) -> Result<Self> {
        match epsg {
            4326 => Ok(Projection::Epsg4326),
            3857 | 102100 | 102113 | 900913 => Ok(Projection::Epsg3857),
            other => Err(MapError::UnknownProjection(format!("EPSG:{}", other))),
        }
    }
}

impl FromStr for Projection {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim();
        if EPSG_4326_CODES.iter().any(|c| c.eq_ignore_ascii_case(code)) {
            Ok(Projection::Epsg4326)
        } else if EPSG_3857_CODES.iter().any(|c| c.eq_ignore_ascii_case(code)) {
            Ok(Projection::Epsg3857)
        } else {
            Err(MapError::UnknownProjection(code.to_string()))
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Projection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

/// Convert a longitude/latitude pair to Web Mercator meters.
pub fn lonlat_to_mercator(coord: Coord<f64>) -> Coord<f64> {
    let x = RADIUS * coord.x.to_radians();
    let y = RADIUS * (PI * (coord.y + 90.0) / 360.0).tan().ln();
    let limit = max_safe_y();
    Coord {
        x,
        y: y.clamp(-limit, limit),
    }
}

/// Convert Web Mercator meters back to longitude/latitude.
pub fn mercator_to_lonlat(coord: Coord<f64>) -> Coord<f64> {
    Coord {
        x: 180.0 * coord.x / HALF_SIZE,
        y: 360.0 * (coord.y / RADIUS).exp().atan() / PI - 90.0,
    }
}

/// Reproject a single coordinate.
pub fn transform_coordinate(coord: Coord<f64>, from: Projection, to: Projection) -> Coord<f64> {
    match (from, to) {
        (Projection::Epsg4326, Projection::Epsg3857) => lonlat_to_mercator(coord),
        (Projection::Epsg3857, Projection::Epsg4326) => mercator_to_lonlat(coord),
        _ => coord,
    }
}

/// Reproject every coordinate of a geometry. Same-projection calls return a copy.
pub fn transform(geometry: &Geometry<f64>, from: Projection, to: Projection) -> Geometry<f64> {
    if from == to {
        return geometry.clone();
    }
    geometry.map_coords(move |c| transform_coordinate(c, from, to))
}

/// Reject geographic coordinates whose latitude lies beyond the poles.
pub fn check_latitudes(geometry: &Geometry<f64>) -> Result<()> {
    match geometry.coords_iter().find(|c| !(-90.0..=90.0).contains(&c.y)) {
        Some(c) => Err(MapError::LatitudeOutOfRange {
            index: None,
            latitude: c.y,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{line_string, point, polygon};

    fn assert_close(actual: Coord<f64>, expected: (f64, f64), eps: f64) {
        assert!((actual.x - expected.0).abs() <= eps, "x mismatch: {actual:?} vs {expected:?}");
        assert!((actual.y - expected.1).abs() <= eps, "y mismatch: {actual:?} vs {expected:?}");
    }

    #[test]
    fn origin_maps_to_origin() {
        let c = lonlat_to_mercator(Coord { x: 0.0, y: 0.0 });
        assert_close(c, (0.0, 0.0), 1e-9);
    }

    #[test]
    fn reference_point_matches_mercator_formula() {
        let c = lonlat_to_mercator(Coord { x: 10.0, y: 20.0 });
        assert_close(c, (1_113_194.907_932_735_7, 2_273_030.926_987_688_5), 1e-4);
    }

    #[test]
    fn antimeridian_is_half_the_world() {
        let c = lonlat_to_mercator(Coord { x: 180.0, y: 0.0 });
        assert_close(c, (HALF_SIZE, 0.0), 1e-6);
        let c = lonlat_to_mercator(Coord { x: -180.0, y: 0.0 });
        assert_close(c, (-HALF_SIZE, 0.0), 1e-6);
    }

    #[test]
    fn poles_stay_finite() {
        let north = lonlat_to_mercator(Coord { x: 0.0, y: 90.0 });
        let south = lonlat_to_mercator(Coord { x: 0.0, y: -90.0 });
        assert!(north.y.is_finite() && north.y > 0.0);
        assert!(south.y.is_finite() && south.y < 0.0);
        assert!(north.y <= max_safe_y());
        assert!(south.y >= -max_safe_y());
    }

    #[test]
    fn latitudes_beyond_the_poles_are_rejected() {
        let inside: Geometry<f64> = line_string![(x: 10.0, y: -90.0), (x: 10.0, y: 90.0)].into();
        assert!(check_latitudes(&inside).is_ok());

        let outside: Geometry<f64> = line_string![(x: 10.0, y: 20.0), (x: 10.0, y: 100.0)].into();
        assert_eq!(
            check_latitudes(&outside),
            Err(MapError::LatitudeOutOfRange {
                index: None,
                latitude: 100.0
            })
        );
    }

    #[test]
    fn inverse_recovers_lonlat() {
        for &(lon, lat) in &[(16.37, 48.21), (-122.42, 37.77), (151.2, -33.87), (0.0, 85.0)] {
            let back = mercator_to_lonlat(lonlat_to_mercator(Coord { x: lon, y: lat }));
            assert_close(back, (lon, lat), 1e-9);
        }
    }

    #[test]
    fn parses_codes_and_aliases() {
        assert_eq!("EPSG:4326".parse::<Projection>().unwrap(), Projection::Epsg4326);
        assert_eq!("CRS:84".parse::<Projection>().unwrap(), Projection::Epsg4326);
        assert_eq!(
            "urn:ogc:def:crs:EPSG::4326".parse::<Projection>().unwrap(),
            Projection::Epsg4326
        );
        assert_eq!("epsg:3857".parse::<Projection>().unwrap(), Projection::Epsg3857);
        assert_eq!("EPSG:900913".parse::<Projection>().unwrap(), Projection::Epsg3857);
        assert_eq!(
            "EPSG:2056".parse::<Projection>(),
            Err(MapError::UnknownProjection("EPSG:2056".to_string()))
        );
    }

    #[test]
    fn numeric_codes() {
        assert_eq!(Projection::from_epsg(4326).unwrap(), Projection::Epsg4326);
        assert_eq!(Projection::from_epsg(102100).unwrap(), Projection::Epsg3857);
        assert!(Projection::from_epsg(31256).is_err());
    }

    #[test]
    fn serde_uses_identifiers() {
        let json = serde_json::to_string(&Projection::Epsg3857).unwrap();
        assert_eq!(json, "\"EPSG:3857\"");
        let parsed: Projection = serde_json::from_str("\"CRS:84\"").unwrap();
        assert_eq!(parsed, Projection::Epsg4326);
        assert!(serde_json::from_str::<Projection>("\"EPSG:1\"").is_err());
    }

    #[test]
    fn transform_same_projection_is_identity() {
        let geometry: Geometry<f64> = point!(x: 10.0, y: 20.0).into();
        let out = transform(&geometry, Projection::Epsg4326, Projection::Epsg4326);
        assert_eq!(out, geometry);
    }

    #[test]
    fn transform_maps_every_vertex() {
        let line: Geometry<f64> = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 20.0)].into();
        let out = transform(&line, Projection::Epsg4326, Projection::Epsg3857);
        let Geometry::LineString(ls) = out else {
            panic!("expected a line string");
        };
        assert_eq!(ls.0.len(), 2);
        assert_close(ls.0[0], (0.0, 0.0), 1e-9);
        assert_close(ls.0[1], (1_113_194.907_932_735_7, 2_273_030.926_987_688_5), 1e-4);
    }

    #[test]
    fn transform_round_trips_polygons() {
        let poly: Geometry<f64> = polygon![
            (x: 16.0, y: 48.0),
            (x: 17.0, y: 48.0),
            (x: 17.0, y: 49.0),
            (x: 16.0, y: 48.0),
        ]
        .into();
        let projected = transform(&poly, Projection::Epsg4326, Projection::Epsg3857);
        let back = transform(&projected, Projection::Epsg3857, Projection::Epsg4326);
        let (Geometry::Polygon(a), Geometry::Polygon(b)) = (poly, back) else {
            panic!("expected polygons");
        };
        for (x, y) in a.exterior().coords().zip(b.exterior().coords()) {
            assert_close(*y, (x.x, x.y), 1e-9);
        }
    }
}
