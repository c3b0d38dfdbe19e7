//! Canonical geometry types shared across the territory crates.
//!
//! These types are the single trust boundary between untyped GeoJSON wire
//! data and the typed geometry algorithms: `Boundary` serializes directly
//! as a GeoJSON `Polygon`/`MultiPolygon` object with `[lng, lat]`
//! coordinate pairs, while `GeoPoint` keeps the struct-field
//! `{latitude, longitude}` order used everywhere inside the engine.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerritoryError};

/// A single ring of `[longitude, latitude]` coordinate pairs.
///
/// A structurally valid ring has at least 4 pairs and is closed (first and
/// last pair equal).
pub type Ring = Vec<[f64; 2]>;

/// A latitude/longitude coordinate pair. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting coordinates outside the valid
    /// latitude/longitude ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(TerritoryError::invalid_argument(format!(
                "latitude {} out of range [-90, 90]",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(TerritoryError::invalid_argument(format!(
                "longitude {} out of range [-180, 180]",
                longitude
            )));
        }
        Ok(Self { latitude, longitude })
    }

    /// Build a point from a GeoJSON `[lng, lat]` pair without range checks.
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self { latitude: pair[1], longitude: pair[0] }
    }

    /// Convert to a GeoJSON `[lng, lat]` pair.
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Containment test, inclusive on all edges. A box with
    /// `min_lng > max_lng` is a wrapped interval crossing the
    /// antimeridian and is tested accordingly.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        if point.latitude < self.min_lat || point.latitude > self.max_lat {
            return false;
        }
        if self.min_lng <= self.max_lng {
            point.longitude >= self.min_lng && point.longitude <= self.max_lng
        } else {
            point.longitude >= self.min_lng || point.longitude <= self.max_lng
        }
    }

    /// Tightest box around a point set. Returns `None` for an empty set.
    /// A single point yields a degenerate (zero-extent) box.
    ///
    /// When the naive longitude span exceeds 180 degrees the point set is
    /// taken to straddle the antimeridian and a wrapped box is emitted
    /// (`min_lng > max_lng`), e.g. points at lng 179 and -179 produce
    /// `min_lng: 179, max_lng: -179`. Point sets genuinely wider than a
    /// hemisphere are out of scope at territory scale.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lng: first.longitude,
            max_lng: first.longitude,
        };
        for p in &points[1..] {
            bbox.min_lat = bbox.min_lat.min(p.latitude);
            bbox.max_lat = bbox.max_lat.max(p.latitude);
            bbox.min_lng = bbox.min_lng.min(p.longitude);
            bbox.max_lng = bbox.max_lng.max(p.longitude);
        }

        if bbox.max_lng - bbox.min_lng > 180.0 {
            // Redo the longitude extent in [0, 360) so the interval does
            // not spuriously span the globe, then map back
            let mut min_shifted = f64::INFINITY;
            let mut max_shifted = f64::NEG_INFINITY;
            for p in points {
                let shifted = if p.longitude < 0.0 { p.longitude + 360.0 } else { p.longitude };
                min_shifted = min_shifted.min(shifted);
                max_shifted = max_shifted.max(shifted);
            }
            bbox.min_lng = unshift_lng(min_shifted);
            bbox.max_lng = unshift_lng(max_shifted);
        }
        Some(bbox)
    }

    /// Expand the box by `degrees` on every side.
    pub fn padded(&self, degrees: f64) -> Self {
        Self {
            min_lat: self.min_lat - degrees,
            max_lat: self.max_lat + degrees,
            min_lng: self.min_lng - degrees,
            max_lng: self.max_lng + degrees,
        }
    }
}

fn unshift_lng(lng: f64) -> f64 {
    if lng > 180.0 {
        lng - 360.0
    } else {
        lng
    }
}

/// Distance units accepted at the API surface. `distance_km` is the
/// canonical primitive; these are conversion sugar only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Miles,
    Meters,
}

impl DistanceUnit {
    /// Convert a distance in kilometers to this unit.
    pub fn from_km(&self, km: f64) -> f64 {
        match self {
            DistanceUnit::Kilometers => km,
            DistanceUnit::Miles => km / 1.60934,
            DistanceUnit::Meters => km * 1000.0,
        }
    }

    /// Convert an area in square kilometers to this unit squared.
    pub fn area_from_km2(&self, km2: f64) -> f64 {
        match self {
            DistanceUnit::Kilometers => km2,
            DistanceUnit::Miles => km2 * 0.386102,
            DistanceUnit::Meters => km2 * 1_000_000.0,
        }
    }
}

/// GeoJSON-compatible territory boundary.
///
/// Serializes as a GeoJSON geometry object: `{"type": "Polygon",
/// "coordinates": [...]}`. A `Polygon` is one outer ring plus zero or more
/// hole rings; a `MultiPolygon` is a non-empty set of such polygons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Boundary {
    Polygon {
        coordinates: Vec<Ring>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Ring>>,
    },
}

impl Boundary {
    /// Create a Polygon boundary from rings (outer first, then holes).
    pub fn polygon(rings: Vec<Ring>) -> Self {
        Boundary::Polygon { coordinates: rings }
    }

    /// Create a MultiPolygon boundary.
    pub fn multi_polygon(polygons: Vec<Vec<Ring>>) -> Self {
        Boundary::MultiPolygon { coordinates: polygons }
    }

    /// Iterate the member polygons (a plain Polygon yields itself once).
    pub fn polygons(&self) -> Vec<&[Ring]> {
        match self {
            Boundary::Polygon { coordinates } => vec![coordinates.as_slice()],
            Boundary::MultiPolygon { coordinates } => {
                coordinates.iter().map(|p| p.as_slice()).collect()
            }
        }
    }

    /// Structural GeoJSON validation: every ring has at least 4 coordinate
    /// pairs within valid lng/lat ranges and is closed, and the polygon
    /// set is non-empty.
    ///
    /// Winding order and self-intersection are not checked.
    pub fn is_valid(&self) -> bool {
        self.check_structure().is_ok()
    }

    /// Like [`Boundary::is_valid`] but reports why the shape was rejected.
    pub fn ensure_valid(&self) -> Result<()> {
        self.check_structure()
            .map_err(TerritoryError::invalid_geometry)
    }

    fn check_structure(&self) -> std::result::Result<(), String> {
        let polygons = self.polygons();
        if polygons.is_empty() {
            return Err("MultiPolygon has no member polygons".to_string());
        }
        for (pi, rings) in polygons.iter().enumerate() {
            if rings.is_empty() {
                return Err(format!("polygon {} has no rings", pi));
            }
            for (ri, ring) in rings.iter().enumerate() {
                if ring.len() < 4 {
                    return Err(format!(
                        "polygon {} ring {} has {} points, need at least 4",
                        pi,
                        ri,
                        ring.len()
                    ));
                }
                if ring.first() != ring.last() {
                    return Err(format!("polygon {} ring {} is not closed", pi, ri));
                }
                for pair in ring.iter() {
                    if !(-180.0..=180.0).contains(&pair[0]) || !(-90.0..=90.0).contains(&pair[1]) {
                        return Err(format!(
                            "polygon {} ring {} has coordinate [{}, {}] out of range",
                            pi, ri, pair[0], pair[1]
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Try to parse from a serde_json::Value holding a GeoJSON geometry.
    /// Returns `None` for non-polygonal or malformed shapes.
    pub fn from_geojson(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Convert to a serde_json::Value (GeoJSON geometry object).
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
