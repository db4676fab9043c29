//! Render snapshots
//!
//! A snapshot is the flat, renderer-facing view of one frame: parallel
//! position/color/size arrays for the active field plus whatever the
//! info panel is showing. Everything is plain arrays and strings so a
//! frontend can consume the JSON without knowing any internal type.

use serde::Serialize;

use crate::core::error::Result;
use crate::core::types::ScaleLevel;
use crate::procgen::OrbitParams;
use crate::simulation::context::SimulationContext;

fn flat(v: glam::Vec3) -> [f32; 3] {
    v.to_array()
}

/// Gas overlay for galaxy scale
#[derive(Debug, Clone, Serialize)]
pub struct NebulaLayer {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub sizes: Vec<f32>,
}

/// The active galaxy's central object
#[derive(Debug, Clone, Serialize)]
pub struct CentralRecord {
    pub designation: String,
    pub position: [f32; 3],
    pub radius: f32,
}

/// The current selection, panel included
#[derive(Debug, Clone, Serialize)]
pub struct TargetRecord {
    pub position: [f32; 3],
    pub panel: crate::catalog::TargetPanel,
}

/// One frame, flattened for a renderer
///
/// The point arrays are parallel: index i across `positions`, `colors`
/// and `sizes` is one point. `orbits` is present at galaxy scale only;
/// system bodies move by integration, so their positions are already
/// live.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub level: ScaleLevel,
    pub universe_age_gyr: f32,
    pub galaxy_age_gyr: f32,
    pub world_offset: [f32; 3],
    pub camera_focus: [f32; 3],
    /// In [0, 1] while a transition is in flight
    pub transition_progress: Option<f32>,
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub sizes: Vec<f32>,
    pub orbits: Option<Vec<OrbitParams>>,
    pub nebula: Option<NebulaLayer>,
    pub central: Option<CentralRecord>,
    pub target: Option<TargetRecord>,
}

impl RenderSnapshot {
    /// Flatten the context's active scale into renderer arrays
    pub fn capture(ctx: &SimulationContext) -> Self {
        let level = ctx.scale.level();
        let mut positions = Vec::new();
        let mut colors = Vec::new();
        let mut sizes = Vec::new();
        let mut orbits = None;
        let mut nebula = None;
        let mut central = None;

        match level {
            ScaleLevel::Universe => {
                positions.reserve(ctx.universe.len());
                colors.reserve(ctx.universe.len());
                sizes.reserve(ctx.universe.len());
                for point in &ctx.universe.points {
                    positions.push(flat(point.position));
                    colors.push(flat(point.color));
                    sizes.push(point.size);
                }
            }
            ScaleLevel::Galaxy => {
                if let Some(realm) = &ctx.galaxy {
                    let mut orbit_params = Vec::with_capacity(realm.field.len());
                    for point in &realm.field.points {
                        positions.push(flat(point.position));
                        colors.push(flat(point.color));
                        sizes.push(point.size);
                        orbit_params.push(point.orbit.unwrap_or(OrbitParams {
                            radius: 0.0,
                            speed: 0.0,
                            phase: 0.0,
                        }));
                    }
                    orbits = Some(orbit_params);
                    nebula = Some(NebulaLayer {
                        positions: realm.field.nebula.iter().map(|p| flat(p.position)).collect(),
                        colors: realm.field.nebula.iter().map(|p| flat(p.color)).collect(),
                        sizes: realm.field.nebula.iter().map(|p| p.size).collect(),
                    });
                    central = Some(CentralRecord {
                        designation: realm.field.central.info.designation.clone(),
                        position: flat(realm.field.central.position),
                        radius: realm.field.central.radius,
                    });
                }
            }
            ScaleLevel::System => {
                if let Some(realm) = &ctx.system {
                    for body in &realm.system.bodies {
                        positions.push(flat(body.position));
                        colors.push(flat(body.color));
                        sizes.push(body.radius);
                    }
                }
            }
        }

        RenderSnapshot {
            level,
            universe_age_gyr: ctx.clock.universe_age_gyr,
            galaxy_age_gyr: ctx.clock.galaxy_age_gyr,
            world_offset: flat(ctx.scale.world_offset),
            camera_focus: flat(ctx.camera_focus),
            transition_progress: ctx.scale.transition().map(|t| t.progress()),
            positions,
            colors,
            sizes,
            orbits,
            nebula,
            central,
            target: ctx.selected.as_ref().map(|s| TargetRecord {
                position: flat(s.position),
                panel: s.descriptor.panel(),
            }),
        }
    }

    pub fn point_count(&self) -> usize {
        self.positions.len()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
