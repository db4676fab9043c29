//! Galaxy-scale field generation
//!
//! A galaxy is described before it is built: `describe_galaxy` draws
//! the morphology, age and panel labels from the galaxy's seed, and
//! `GalaxyField::generate` then lays out a point field matching that
//! description. Morphology decides the layout branch, the gas content
//! and how fast the disk turns.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::catalog::composition::Composition;
use crate::catalog::descriptor::{CompactInfo, GalaxyInfo};
use crate::catalog::naming;
use crate::core::rng::{
    position_seed, SeededStream, STREAM_COMPOSITION, STREAM_FIELD, STREAM_GALAXY, STREAM_NAMING,
};
use crate::core::types::PointId;
use crate::procgen::{CelestialPoint, OrbitParams};
use crate::stellar::StellarClass;

/// Radius of a galaxy field in render units
pub const GALAXY_RADIUS: f32 = 2_400.0;

/// Universe age below which only young morphologies form (Gyr)
pub const YOUNG_UNIVERSE_GYR: f32 = 3.0;

/// Universe age above which disks have wound down (Gyr)
pub const OLD_UNIVERSE_GYR: f32 = 10.0;

/// Fraction of a spiral's points that sit in the central bulge
const BULGE_FRACTION: u32 = 5;

/// Bulge radius as a fraction of the galaxy radius
const BULGE_RADIUS_FRACTION: f32 = 0.2;

/// Log-spiral winding constant for the two arms
const SPIRAL_TWIST: f32 = 2.2;

/// Angular scatter around each arm's backbone (radians)
const ARM_SPREAD: f32 = 0.35;

/// Disk thickness as a fraction of the galaxy radius
const DISK_THICKNESS: f32 = 0.08;

/// Fraction of irregular-galaxy points rendered as supernova remnants
const REMNANT_RATE: f32 = 0.1;

/// Point size range at galaxy scale
const POINT_SIZE_MIN: f32 = 0.8;
const POINT_SIZE_MAX: f32 = 2.6;

/// Nebula sprite size range
const NEBULA_SIZE_MIN: f32 = 24.0;
const NEBULA_SIZE_MAX: f32 = 64.0;

const BULGE_COLOR: Vec3 = Vec3::new(1.0, 0.85, 0.62);
const DISK_INNER: Vec3 = Vec3::new(1.0, 0.92, 0.75);
const DISK_OUTER: Vec3 = Vec3::new(0.65, 0.76, 1.0);
const OLD_COLOR_A: Vec3 = Vec3::new(1.0, 0.78, 0.55);
const OLD_COLOR_B: Vec3 = Vec3::new(1.0, 0.88, 0.72);
const YOUNG_COLOR_A: Vec3 = Vec3::new(0.65, 0.78, 1.0);
const YOUNG_COLOR_B: Vec3 = Vec3::new(0.90, 0.95, 1.0);
const REMNANT_COLOR: Vec3 = Vec3::new(1.0, 0.35, 0.25);
const NEBULA_COLOR_A: Vec3 = Vec3::new(0.30, 0.55, 0.95);
const NEBULA_COLOR_B: Vec3 = Vec3::new(0.60, 0.35, 0.95);

/// Galactic morphology, fixed for a galaxy's whole session lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Morphology {
    Spiral,
    Elliptical,
    Lenticular,
    Irregular,
    Proto,
    Quasar,
}

impl Morphology {
    /// Draw a morphology appropriate to the universe age
    ///
    /// A young universe only yields unsettled forms, an old one only
    /// wound-down ones; in between the spiral dominates.
    pub fn draw(stream: &mut SeededStream, universe_age_gyr: f32) -> Morphology {
        let roll = stream.next();
        if universe_age_gyr < YOUNG_UNIVERSE_GYR {
            if roll < 0.35 {
                Morphology::Proto
            } else if roll < 0.75 {
                Morphology::Irregular
            } else {
                Morphology::Quasar
            }
        } else if universe_age_gyr > OLD_UNIVERSE_GYR {
            if roll < 0.6 {
                Morphology::Elliptical
            } else {
                Morphology::Lenticular
            }
        } else if roll < 0.7 {
            Morphology::Spiral
        } else if roll < 0.85 {
            Morphology::Irregular
        } else {
            Morphology::Elliptical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Morphology::Spiral => "spiral",
            Morphology::Elliptical => "elliptical",
            Morphology::Lenticular => "lenticular",
            Morphology::Irregular => "irregular",
            Morphology::Proto => "protogalaxy",
            Morphology::Quasar => "quasar host",
        }
    }

    /// Whether the morphology carries visible gas clouds
    pub fn has_nebulae(&self) -> bool {
        matches!(
            self,
            Morphology::Spiral | Morphology::Irregular | Morphology::Proto | Morphology::Quasar
        )
    }

    /// Disk rotation factor; old pressure-supported forms barely turn
    fn orbit_speed_scale(&self) -> f32 {
        match self {
            Morphology::Spiral | Morphology::Quasar => 1.0,
            Morphology::Irregular | Morphology::Proto => 0.6,
            Morphology::Lenticular => 0.12,
            Morphology::Elliptical => 0.04,
        }
    }

    /// Mass order of magnitude in solar masses
    fn mass_exponent(&self) -> u32 {
        match self {
            Morphology::Proto => 9,
            Morphology::Irregular => 10,
            Morphology::Spiral | Morphology::Lenticular => 11,
            Morphology::Elliptical | Morphology::Quasar => 12,
        }
    }

    /// Visible radius range in kly
    fn radius_range_kly(&self) -> (f32, f32) {
        match self {
            Morphology::Proto => (5.0, 15.0),
            Morphology::Irregular => (8.0, 25.0),
            Morphology::Lenticular => (25.0, 50.0),
            Morphology::Spiral => (30.0, 60.0),
            Morphology::Quasar => (30.0, 70.0),
            Morphology::Elliptical => (40.0, 90.0),
        }
    }
}

/// Build the panel descriptor for the galaxy rooted at `seed`
///
/// Everything the panel shows is drawn from sub-streams of the seed,
/// except the universe age, which gates the morphology and scales the
/// galaxy's own age. Callers cache the result per point so a later
/// describe at a different universe age cannot re-roll the morphology.
pub fn describe_galaxy(seed: u64, universe_age_gyr: f32) -> GalaxyInfo {
    let base = SeededStream::new(seed);

    let mut naming_stream = base.derive(STREAM_NAMING);
    let designation = naming::galaxy_designation(&mut naming_stream);

    let mut stream = base.derive(STREAM_GALAXY);
    let morphology = Morphology::draw(&mut stream, universe_age_gyr);
    let age_gyr = universe_age_gyr * stream.range(0.35, 0.95);

    let mass_label = format!(
        "{:.1}e{} Msun",
        stream.range(1.0, 9.9),
        morphology.mass_exponent()
    );
    let (radius_lo, radius_hi) = morphology.radius_range_kly();
    let radius_label = format!("{:.0} kly", stream.range(radius_lo, radius_hi));

    let mut composition_stream = base.derive(STREAM_COMPOSITION);
    let composition = Composition::generate(&mut composition_stream);

    GalaxyInfo {
        designation,
        morphology,
        age_gyr,
        mass_label,
        radius_label,
        composition,
    }
}

/// The central compact object every galaxy carries at its origin
#[derive(Debug, Clone, PartialEq)]
pub struct CentralObject {
    pub position: Vec3,
    pub radius: f32,
    /// Root for the system realm spawned when the object is entered
    pub seed: u64,
    pub info: CompactInfo,
}

/// A generated galaxy-scale field
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyField {
    pub points: Vec<CelestialPoint>,
    pub nebula: Vec<CelestialPoint>,
    pub central: CentralObject,
}

impl GalaxyField {
    /// Lay out the field described by `info`
    ///
    /// The layout branch is the descriptor's morphology, so a field
    /// always matches the panel that advertised it.
    pub fn generate(seed: u64, info: &GalaxyInfo, star_count: u32) -> Self {
        let start = std::time::Instant::now();
        let mut stream = SeededStream::new(seed).derive(STREAM_FIELD);

        let points = match info.morphology {
            Morphology::Spiral | Morphology::Quasar => spiral_points(&mut stream, star_count),
            Morphology::Elliptical => ellipsoid_points(&mut stream, star_count, 0.62),
            Morphology::Lenticular => ellipsoid_points(&mut stream, star_count, 0.35),
            Morphology::Irregular => blob_points(&mut stream, star_count, 0.5, true),
            Morphology::Proto => blob_points(&mut stream, star_count, 0.3, false),
        };

        let points = with_orbits(points, info.morphology.orbit_speed_scale());

        let nebula = if info.morphology.has_nebulae() {
            nebula_points(&mut stream, star_count, info.morphology)
        } else {
            Vec::new()
        };

        let central_radius = match info.morphology {
            Morphology::Quasar => 0.024 * GALAXY_RADIUS,
            _ => 0.012 * GALAXY_RADIUS,
        };
        let central = CentralObject {
            position: Vec3::ZERO,
            radius: central_radius,
            seed: stream.next_seed(),
            info: CompactInfo {
                designation: naming::central_designation(&info.designation),
                class: StellarClass::BlackHole,
                mass_label: format!("{:.1}e6 Msun", stream.range(0.8, 8.0)),
                radius_label: format!("{:.2} au horizon", stream.range(0.02, 0.3)),
            },
        };

        tracing::info!(
            designation = %info.designation,
            morphology = info.morphology.label(),
            points = points.len(),
            nebulae = nebula.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "galaxy field generated"
        );

        GalaxyField {
            points,
            nebula,
            central,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn position_of(&self, id: PointId) -> Option<Vec3> {
        self.points.get(id.0 as usize).map(|p| p.position)
    }
}

/// Galaxy fields carry a fifth of the universe count, floored so tiny
/// test configs still produce a recognizable disk
pub fn field_star_count(universe_star_count: u32) -> u32 {
    (universe_star_count / 5).max(512)
}

/// Two-arm logarithmic spiral with a spherical bulge
fn spiral_points(stream: &mut SeededStream, star_count: u32) -> Vec<CelestialPoint> {
    let bulge_count = star_count / BULGE_FRACTION;
    let mut points = Vec::with_capacity(star_count as usize);

    for i in 0..star_count {
        let (position, color) = if i < bulge_count {
            let dir = stream.unit_dir();
            let r = stream.next().powf(1.5) * BULGE_RADIUS_FRACTION * GALAXY_RADIUS;
            let warm = stream.next();
            (dir * r, BULGE_COLOR.lerp(DISK_INNER, warm * 0.5))
        } else {
            let arm = (i % 2) as f32;
            let r_norm = 0.06 + 0.94 * stream.next();
            let angle = arm * std::f32::consts::PI
                + SPIRAL_TWIST * (r_norm * 10.0 + 1.0).ln()
                + (stream.next() - 0.5) * ARM_SPREAD * (1.3 - 0.6 * r_norm);
            let radial = r_norm * GALAXY_RADIUS + (stream.next() - 0.5) * 0.05 * GALAXY_RADIUS;
            let y =
                (stream.next() - 0.5) * DISK_THICKNESS * GALAXY_RADIUS * (1.0 - 0.7 * r_norm);
            let position = Vec3::new(radial * angle.cos(), y, radial * angle.sin());
            let blend = (r_norm * 0.8 + stream.next() * 0.4).clamp(0.0, 1.0);
            (position, DISK_INNER.lerp(DISK_OUTER, blend))
        };

        points.push(CelestialPoint {
            id: PointId(i),
            position,
            color,
            size: stream.range(POINT_SIZE_MIN, POINT_SIZE_MAX),
            seed: position_seed(position),
            orbit: None,
        });
    }

    points
}

/// Centrally peaked ellipsoid, squashed on the y axis
fn ellipsoid_points(
    stream: &mut SeededStream,
    star_count: u32,
    squash: f32,
) -> Vec<CelestialPoint> {
    let mut points = Vec::with_capacity(star_count as usize);

    for i in 0..star_count {
        let dir = stream.unit_dir();
        let r = stream.next().powf(2.5) * 0.6 * GALAXY_RADIUS;
        let mut position = dir * r;
        position.y *= squash;
        let color = OLD_COLOR_A.lerp(OLD_COLOR_B, stream.next());

        points.push(CelestialPoint {
            id: PointId(i),
            position,
            color,
            size: stream.range(POINT_SIZE_MIN, POINT_SIZE_MAX),
            seed: position_seed(position),
            orbit: None,
        });
    }

    points
}

/// Clumpy scatter around four attractor blobs
///
/// `with_remnants` additionally renders a slice of points as oversized
/// reddened supernova remnants.
fn blob_points(
    stream: &mut SeededStream,
    star_count: u32,
    radius_scale: f32,
    with_remnants: bool,
) -> Vec<CelestialPoint> {
    let blobs: Vec<Vec3> = (0..4)
        .map(|_| {
            Vec3::new(
                (stream.next() - 0.5) * GALAXY_RADIUS * radius_scale,
                (stream.next() - 0.5) * GALAXY_RADIUS * radius_scale * 0.5,
                (stream.next() - 0.5) * GALAXY_RADIUS * radius_scale,
            )
        })
        .collect();

    let mut points = Vec::with_capacity(star_count as usize);

    for i in 0..star_count {
        let blob = blobs[stream.index(blobs.len())];
        let dir = stream.unit_dir();
        let dist = stream.next().powf(1.7) * 0.35 * GALAXY_RADIUS;
        let position = blob + dir * dist;

        let is_remnant = with_remnants && stream.chance(REMNANT_RATE);
        let color_roll = stream.next();
        let (color, size) = if is_remnant {
            (
                REMNANT_COLOR,
                stream.range(POINT_SIZE_MIN, POINT_SIZE_MAX) * 3.0,
            )
        } else {
            (
                YOUNG_COLOR_A.lerp(YOUNG_COLOR_B, color_roll),
                stream.range(POINT_SIZE_MIN, POINT_SIZE_MAX),
            )
        };

        points.push(CelestialPoint {
            id: PointId(i),
            position,
            color,
            size,
            seed: position_seed(position),
            orbit: None,
        });
    }

    points
}

/// Attach disk-motion parameters to every point
///
/// Orbit radius and phase come from the generated x/z position, speed
/// falls off with radius and is scaled by morphology.
fn with_orbits(mut points: Vec<CelestialPoint>, speed_scale: f32) -> Vec<CelestialPoint> {
    for point in &mut points {
        let radius = (point.position.x * point.position.x
            + point.position.z * point.position.z)
            .sqrt();
        let r_norm = radius / GALAXY_RADIUS;
        point.orbit = Some(OrbitParams {
            radius,
            speed: speed_scale / (r_norm + 0.1).sqrt(),
            phase: point.position.z.atan2(point.position.x),
        });
    }
    points
}

/// Large soft gas sprites threaded through the inner disk
fn nebula_points(
    stream: &mut SeededStream,
    star_count: u32,
    morphology: Morphology,
) -> Vec<CelestialPoint> {
    let count = (star_count / 40).clamp(24, 800);
    let brightness = match morphology {
        Morphology::Quasar => 1.3,
        _ => 1.0,
    };

    (0..count)
        .map(|i| {
            let r = stream.next().sqrt() * 0.75 * GALAXY_RADIUS;
            let theta = stream.range(0.0, std::f32::consts::TAU);
            let y = (stream.next() - 0.5) * 0.1 * GALAXY_RADIUS;
            let position = Vec3::new(r * theta.cos(), y, r * theta.sin());
            let color =
                NEBULA_COLOR_A.lerp(NEBULA_COLOR_B, stream.next()) * brightness;

            CelestialPoint {
                id: PointId(i),
                position,
                color,
                size: stream.range(NEBULA_SIZE_MIN, NEBULA_SIZE_MAX),
                seed: position_seed(position),
                orbit: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_galaxy_deterministic() {
        let a = describe_galaxy(777, 6.0);
        let b = describe_galaxy(777, 6.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_young_universe_morphologies() {
        for seed in 0..200 {
            let info = describe_galaxy(seed, 2.0);
            assert!(
                matches!(
                    info.morphology,
                    Morphology::Proto | Morphology::Irregular | Morphology::Quasar
                ),
                "seed {} produced {:?} at age 2.0",
                seed,
                info.morphology
            );
        }
    }

    #[test]
    fn test_old_universe_morphologies() {
        for seed in 0..200 {
            let info = describe_galaxy(seed, 12.5);
            assert!(
                matches!(
                    info.morphology,
                    Morphology::Elliptical | Morphology::Lenticular
                ),
                "seed {} produced {:?} at age 12.5",
                seed,
                info.morphology
            );
        }
    }

    #[test]
    fn test_middle_age_spiral_dominates() {
        let spirals = (0..300)
            .filter(|&seed| describe_galaxy(seed, 6.0).morphology == Morphology::Spiral)
            .count();
        assert!(
            (150..260).contains(&spirals),
            "{} spirals out of 300 at age 6.0",
            spirals
        );
    }

    #[test]
    fn test_galaxy_age_never_exceeds_universe_age() {
        for seed in 0..100 {
            let info = describe_galaxy(seed, 8.0);
            assert!(info.age_gyr < 8.0, "galaxy older than universe");
            assert!(info.age_gyr > 0.0);
        }
    }

    #[test]
    fn test_field_deterministic() {
        let info = describe_galaxy(31, 6.0);
        let a = GalaxyField::generate(31, &info, 2_000);
        let b = GalaxyField::generate(31, &info, 2_000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_field_count_and_bounds() {
        let info = describe_galaxy(5, 6.0);
        let field = GalaxyField::generate(5, &info, 3_000);
        assert_eq!(field.len(), 3_000);
        for p in &field.points {
            assert!(
                p.position.length() <= GALAXY_RADIUS * 1.3,
                "point at {} outside bound",
                p.position.length()
            );
        }
    }

    #[test]
    fn test_every_point_has_orbit_params() {
        let info = describe_galaxy(6, 6.0);
        let field = GalaxyField::generate(6, &info, 1_000);
        for p in &field.points {
            let orbit = p.orbit.as_ref().unwrap();
            let expected =
                (p.position.x * p.position.x + p.position.z * p.position.z).sqrt();
            assert!((orbit.radius - expected).abs() < 1e-3);
            assert!(orbit.speed > 0.0);
        }
    }

    #[test]
    fn test_elliptical_barely_rotates() {
        let spiral_info = GalaxyInfo {
            morphology: Morphology::Spiral,
            ..describe_galaxy(40, 6.0)
        };
        let elliptical_info = GalaxyInfo {
            morphology: Morphology::Elliptical,
            ..describe_galaxy(40, 6.0)
        };
        let spiral = GalaxyField::generate(40, &spiral_info, 500);
        let elliptical = GalaxyField::generate(40, &elliptical_info, 500);

        let mean_speed = |field: &GalaxyField| {
            field
                .points
                .iter()
                .filter_map(|p| p.orbit.map(|o| o.speed))
                .sum::<f32>()
                / field.len() as f32
        };
        assert!(mean_speed(&elliptical) < mean_speed(&spiral) * 0.1);
    }

    #[test]
    fn test_gas_morphologies_have_nebulae() {
        let spiral = describe_galaxy(50, 6.0);
        let spiral_info = GalaxyInfo {
            morphology: Morphology::Spiral,
            ..spiral.clone()
        };
        let elliptical_info = GalaxyInfo {
            morphology: Morphology::Elliptical,
            ..spiral
        };
        assert!(!GalaxyField::generate(50, &spiral_info, 2_000).nebula.is_empty());
        assert!(GalaxyField::generate(50, &elliptical_info, 2_000).nebula.is_empty());
    }

    #[test]
    fn test_irregular_remnant_fraction() {
        let info = GalaxyInfo {
            morphology: Morphology::Irregular,
            ..describe_galaxy(60, 2.0)
        };
        let field = GalaxyField::generate(60, &info, 4_000);
        // Remnants are tripled in size, so anything above the base cap
        // must be one
        let oversized = field
            .points
            .iter()
            .filter(|p| p.size > POINT_SIZE_MAX)
            .count();
        let fraction = oversized as f32 / field.len() as f32;
        assert!(
            (0.05..0.15).contains(&fraction),
            "remnant fraction {}",
            fraction
        );
    }

    #[test]
    fn test_central_object_at_origin() {
        let info = describe_galaxy(70, 6.0);
        let field = GalaxyField::generate(70, &info, 1_000);
        assert_eq!(field.central.position, Vec3::ZERO);
        assert!(field.central.radius > 0.0);
        assert_eq!(field.central.info.class, StellarClass::BlackHole);
        assert_eq!(
            field.central.info.designation,
            naming::central_designation(&info.designation)
        );
    }

    #[test]
    fn test_field_star_count_scaling() {
        assert_eq!(field_star_count(250_000), 50_000);
        // Tiny configs keep a visible floor
        assert_eq!(field_star_count(100), 512);
    }
}
