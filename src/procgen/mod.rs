//! Procedural generators for the three scales
//!
//! Each generator is a pure function of a seeded stream plus its
//! parameters: same inputs, same field, no hidden state.

pub mod galaxy;
pub mod system;
pub mod universe;

use glam::Vec3;
use serde::Serialize;

use crate::core::types::PointId;

/// Disk motion parameters for a point orbiting its field's center
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitParams {
    pub radius: f32,
    pub speed: f32,
    pub phase: f32,
}

/// One renderable point in a generated field
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialPoint {
    pub id: PointId,
    pub position: Vec3,
    pub color: Vec3,
    pub size: f32,
    /// Seed recorded from the generated position; re-centering moves
    /// the live position but never this
    pub seed: u64,
    /// Present for galaxy-field points, absent at universe scale
    pub orbit: Option<OrbitParams>,
}
