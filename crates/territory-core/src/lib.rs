//! Territory Core - Geometry algorithms, domain models, and the
//! assignment engine for territory management.
//!
//! This crate contains the geospatial computations behind field-sales
//! territory management and the port definitions its collaborators
//! (persistence store, geocoder) must implement.

pub mod config;
pub mod engine;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod models;
pub mod ports;

pub use engine::TerritoryAssignmentEngine;
pub use error::{Result, TerritoryError};
pub use geocode::GeocodeCache;
