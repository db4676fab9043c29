//! Star-system generation
//!
//! Like galaxies, systems are described before they are built. The
//! descriptor fixes the primary's class, evolution and the star count;
//! `StarSystem::generate` then places bodies with launch velocities the
//! integrator can hold onto. Distances and masses are render-tuned, not
//! astronomical.

use glam::Vec3;

use crate::catalog::composition::Composition;
use crate::catalog::descriptor::{PlanetInfo, SystemInfo};
use crate::catalog::naming;
use crate::catalog::spectrum;
use crate::core::rng::{
    SeededStream, STREAM_COMPOSITION, STREAM_FIELD, STREAM_NAMING, STREAM_SYSTEM,
};
use crate::core::types::BodyId;
use crate::stellar::{classify, evolve, remnant_class, EvolutionState, StellarClass};

/// Central-force constant in render units
///
/// Tuned so an inner planet around a sun-like primary completes an
/// orbit in roughly half a minute of wall clock.
pub const GRAVITATIONAL_CONST: f32 = 800.0;

/// Ring diameter for multi-star placement
pub const STAR_SEPARATION: f32 = 18.0;

/// Innermost planet orbit radius
const PLANET_BASE_DISTANCE: f32 = 26.0;

/// Spacing between successive planet slots
const PLANET_SPACING: f32 = 13.0;

/// Half-width of the per-slot distance jitter
///
/// Must stay under half the spacing or slots could swap order.
const PLANET_JITTER: f32 = 5.0;

/// Outer edge of any generated system, used for camera retreat
pub const SYSTEM_EXTENT: f32 = 120.0;

/// Visual radius multiplier for stars (solar radii to render units)
const STAR_VISUAL_SCALE: f32 = 4.0;
const STAR_VISUAL_MIN: f32 = 0.6;
const STAR_VISUAL_MAX: f32 = 30.0;

const ROCKY_COLOR_A: Vec3 = Vec3::new(0.55, 0.50, 0.45);
const ROCKY_COLOR_B: Vec3 = Vec3::new(0.70, 0.62, 0.50);
const GAS_COLOR_A: Vec3 = Vec3::new(0.80, 0.72, 0.55);
const GAS_COLOR_B: Vec3 = Vec3::new(0.60, 0.70, 0.85);

/// What a system body is; the tag decides how the integrator and the
/// panels treat it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    Star { class: StellarClass },
    Planet { is_gas: bool },
}

/// One body in the active system
///
/// Star masses are in solar masses and feed the integrator's central
/// field; planet masses are in earth masses and are display-only.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemBody {
    pub id: BodyId,
    pub kind: BodyKind,
    pub designation: String,
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    /// Render radius
    pub radius: f32,
    /// Launch distance from the origin; stable under later integration
    pub orbit_radius: f32,
    pub color: Vec3,
    /// Pinned at the origin and skipped by the integrator
    pub is_primary: bool,
    pub composition: Composition,
}

/// The active system's bodies plus the masses the integrator needs
#[derive(Debug, Clone, PartialEq)]
pub struct StarSystem {
    pub seed: u64,
    pub designation: String,
    pub bodies: Vec<SystemBody>,
    /// Mass of the heaviest star, used for planet launch speeds
    pub primary_mass: f32,
    /// Total stellar mass, used for the central field
    pub stellar_mass: f32,
}

/// Build the panel descriptor for the system rooted at `seed`
///
/// The classification roll, the two multiplicity rolls, the formation
/// time and the collapse roll are all fixed draws from the system
/// sub-stream, so a descriptor is reproducible and the field generator
/// can trust its counts.
pub fn describe_system(seed: u64, universe_age_gyr: f32) -> SystemInfo {
    let base = SeededStream::new(seed);

    let mut naming_stream = base.derive(STREAM_NAMING);
    let designation = naming::star_designation(&mut naming_stream);

    let mut stream = base.derive(STREAM_SYSTEM);
    let initial_class = classify(stream.next());

    // Two successive rolls give the 60/30/10 multiplicity split
    let first = stream.next();
    let second = stream.next();
    let rolled_count = if first < 0.6 {
        1
    } else if second < 0.75 {
        2
    } else {
        3
    };

    let max_formation = (universe_age_gyr - 0.05).max(0.0);
    let formation_gyr = stream.range(0.0, max_formation.max(1e-3));
    let remnant = remnant_class(initial_class, stream.next());
    let evolution = evolve(initial_class, formation_gyr, universe_age_gyr);
    let stellar_age_gyr = (universe_age_gyr - formation_gyr).max(0.0);

    let mut info = SystemInfo {
        designation,
        initial_class,
        remnant,
        evolution,
        formation_gyr,
        stellar_age_gyr,
        star_count: rolled_count,
        composition: Composition::generate(&mut base.derive(STREAM_COMPOSITION)),
        spectrum: Vec::new(),
    };
    info.spectrum = spectrum::from_designation(&info.designation);

    // A collapsed black hole swallows any companions: the descriptor
    // advertises a single compact primary
    if info.display_class() == StellarClass::BlackHole {
        info.star_count = 1;
    }

    info
}

/// Descriptor for the system around a galaxy's central object
///
/// Centrals are always collapsed, so the descriptor skips the
/// classification roll and pins a black-hole primary with whatever
/// orbits the seed deals it.
pub fn describe_compact_system(seed: u64, designation: &str, universe_age_gyr: f32) -> SystemInfo {
    let base = SeededStream::new(seed);
    let mut stream = base.derive(STREAM_SYSTEM);

    let formation_gyr = stream.range(0.0, (universe_age_gyr * 0.2).max(1e-3));
    SystemInfo {
        designation: designation.to_owned(),
        initial_class: StellarClass::O,
        remnant: Some(StellarClass::BlackHole),
        evolution: EvolutionState::Remnant,
        formation_gyr,
        stellar_age_gyr: (universe_age_gyr - formation_gyr).max(0.0),
        star_count: 1,
        composition: Composition::generate(&mut base.derive(STREAM_COMPOSITION)),
        spectrum: spectrum::from_designation(designation),
    }
}

impl StarSystem {
    /// Lay out the system described by `info`
    pub fn generate(seed: u64, info: &SystemInfo) -> Self {
        let mut stream = SeededStream::new(seed).derive(STREAM_FIELD);
        let mut bodies = Vec::new();

        let primary_class = info.display_class();
        let star_classes: Vec<StellarClass> = (0..info.star_count)
            .map(|i| {
                if i == 0 {
                    primary_class
                } else {
                    classify(stream.next())
                }
            })
            .collect();

        let stellar_mass: f32 = star_classes
            .iter()
            .map(|c| c.profile().mass_solar)
            .sum();
        let primary_mass = star_classes
            .iter()
            .map(|c| c.profile().mass_solar)
            .fold(0.0f32, f32::max);

        if info.star_count == 1 {
            // Single star (or forced compact primary): pinned at origin
            let class = star_classes[0];
            bodies.push(star_body(
                BodyId(0),
                class,
                info.designation.clone(),
                Vec3::ZERO,
                Vec3::ZERO,
                true,
                &mut stream,
            ));
        } else {
            // Multi-star: evenly spaced ring, everyone moving. Launch
            // speed uses the two-body circular form against the rest of
            // the ring's mass; it underfills the central field, so the
            // pair visibly swings rather than sitting on rails.
            let count = info.star_count as usize;
            for (i, &class) in star_classes.iter().enumerate() {
                let angle = i as f32 * std::f32::consts::TAU / count as f32;
                let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * (STAR_SEPARATION / 2.0);
                let other_mass = stellar_mass - class.profile().mass_solar;
                let speed =
                    (GRAVITATIONAL_CONST * other_mass / (2.0 * STAR_SEPARATION)).sqrt();
                let velocity = Vec3::new(-angle.sin(), 0.0, angle.cos()) * speed;
                bodies.push(star_body(
                    BodyId(i as u32),
                    class,
                    naming::star_component(&info.designation, i),
                    position,
                    velocity,
                    false,
                    &mut stream,
                ));
            }
        }

        let planet_count = stream.int_range(3, 7);
        for i in 0..planet_count {
            let slot = PLANET_BASE_DISTANCE + i as f32 * PLANET_SPACING;
            let distance = slot + (stream.next() - 0.5) * 2.0 * PLANET_JITTER;
            let angle = stream.range(0.0, std::f32::consts::TAU);
            let gas_roll = stream.next();
            let is_gas = i > 2 && gas_roll > 0.3;

            let (mass, radius, color) = if is_gas {
                (
                    stream.range(4.0, 12.0),
                    stream.range(2.2, 4.5),
                    GAS_COLOR_A.lerp(GAS_COLOR_B, stream.next()),
                )
            } else {
                (
                    stream.range(0.5, 2.0),
                    stream.range(0.8, 1.6),
                    ROCKY_COLOR_A.lerp(ROCKY_COLOR_B, stream.next()),
                )
            };

            let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * distance;
            let speed = (GRAVITATIONAL_CONST * primary_mass / distance).sqrt();
            let velocity = Vec3::new(-angle.sin(), 0.0, angle.cos()) * speed;

            bodies.push(SystemBody {
                id: BodyId(bodies.len() as u32),
                kind: BodyKind::Planet { is_gas },
                designation: naming::planet_designation(&info.designation, i as usize),
                position,
                velocity,
                mass,
                radius,
                orbit_radius: distance,
                color,
                is_primary: false,
                composition: Composition::generate(&mut stream),
            });
        }

        tracing::info!(
            designation = %info.designation,
            stars = info.star_count,
            planets = planet_count,
            class = primary_class.label(),
            "star system generated"
        );

        StarSystem {
            seed,
            designation: info.designation.clone(),
            bodies,
            primary_mass,
            stellar_mass,
        }
    }

    pub fn stars(&self) -> impl Iterator<Item = &SystemBody> {
        self.bodies
            .iter()
            .filter(|b| matches!(b.kind, BodyKind::Star { .. }))
    }

    pub fn planets(&self) -> impl Iterator<Item = &SystemBody> {
        self.bodies
            .iter()
            .filter(|b| matches!(b.kind, BodyKind::Planet { .. }))
    }

    pub fn planet_count(&self) -> usize {
        self.planets().count()
    }

    /// Panel descriptor for the planet at tour position `index`
    pub fn planet_descriptor(&self, index: usize) -> Option<PlanetInfo> {
        let body = self.planets().nth(index)?;
        let is_gas = matches!(body.kind, BodyKind::Planet { is_gas: true });
        Some(PlanetInfo {
            designation: body.designation.clone(),
            is_gas,
            orbit_radius: body.orbit_radius,
            mass_label: format!("{:.1} Mearth", body.mass),
            radius_label: format!("{:.1} Rearth", body.radius),
            composition: body.composition.clone(),
        })
    }
}

fn star_body(
    id: BodyId,
    class: StellarClass,
    designation: String,
    position: Vec3,
    velocity: Vec3,
    is_primary: bool,
    stream: &mut SeededStream,
) -> SystemBody {
    let profile = class.profile();
    SystemBody {
        id,
        kind: BodyKind::Star { class },
        designation,
        position,
        velocity,
        mass: profile.mass_solar,
        radius: (profile.radius_solar * STAR_VISUAL_SCALE).clamp(STAR_VISUAL_MIN, STAR_VISUAL_MAX),
        orbit_radius: position.length(),
        color: profile.color,
        is_primary,
        composition: Composition::generate(stream),
    }
}
