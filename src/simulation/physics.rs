//! Central-force orbital integrator
//!
//! Semi-implicit Euler against a single central potential. Bodies do not
//! attract each other; the field strength comes from the system's total
//! stellar mass. That keeps the cost linear in bodies and the circular
//! launches from `StarSystem::generate` visually stable for minutes.

use crate::procgen::system::{StarSystem, GRAVITATIONAL_CONST};

/// Substeps per frame; two keeps fast inner orbits from sagging
const DEFAULT_SUBSTEPS: u32 = 2;

/// Radius floor for the field, so close passes soften instead of blowing up
const DEFAULT_MIN_RADIUS: f32 = 1.5;

#[derive(Debug, Clone, Copy)]
pub struct OrbitalIntegrator {
    pub substeps: u32,
    pub min_radius: f32,
}

impl Default for OrbitalIntegrator {
    fn default() -> Self {
        OrbitalIntegrator {
            substeps: DEFAULT_SUBSTEPS,
            min_radius: DEFAULT_MIN_RADIUS,
        }
    }
}

impl OrbitalIntegrator {
    /// Advance every free body by `dt` seconds
    ///
    /// Velocity updates before position (semi-implicit), which holds
    /// energy well enough on circular orbits. Primaries are pinned and
    /// skipped.
    pub fn step(&self, system: &mut StarSystem, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let mu = GRAVITATIONAL_CONST * system.stellar_mass;
        let sub_dt = dt / self.substeps.max(1) as f32;

        for _ in 0..self.substeps.max(1) {
            for body in system.bodies.iter_mut() {
                if body.is_primary {
                    continue;
                }
                let r = body.position.length().max(self.min_radius);
                let accel = body.position * (-mu / (r * r * r));
                body.velocity += accel * sub_dt;
                body.position += body.velocity * sub_dt;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procgen::system::{describe_system, BodyKind};
    use glam::Vec3;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn test_circular_orbits_hold_radius() {
        let mut info = describe_system(21, 8.0);
        // Single star: launch speeds exactly match the central field
        info.star_count = 1;
        let mut system = StarSystem::generate(21, &info);
        let launch_radii: Vec<f32> = system
            .planets()
            .map(|p| p.orbit_radius)
            .collect();

        let integrator = OrbitalIntegrator::default();
        // Ten seconds of wall clock
        for _ in 0..600 {
            integrator.step(&mut system, FRAME);
        }

        for (planet, launch) in system.planets().zip(launch_radii) {
            let drift = (planet.position.length() - launch).abs() / launch;
            assert!(
                drift < 0.02,
                "{} drifted {:.3} from {:.1}",
                planet.designation,
                drift,
                launch
            );
        }
    }

    #[test]
    fn test_primary_never_moves() {
        let mut info = describe_system(2, 8.0);
        info.star_count = 1;
        let mut system = StarSystem::generate(2, &info);
        let integrator = OrbitalIntegrator::default();
        for _ in 0..120 {
            integrator.step(&mut system, FRAME);
        }
        let star = system.stars().next().unwrap();
        assert_eq!(star.position, Vec3::ZERO);
        assert_eq!(star.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_planets_actually_orbit() {
        let info = describe_system(5, 8.0);
        let mut system = StarSystem::generate(5, &info);
        let start: Vec3 = system.planets().next().unwrap().position;
        let integrator = OrbitalIntegrator::default();
        for _ in 0..300 {
            integrator.step(&mut system, FRAME);
        }
        let end = system.planets().next().unwrap().position;
        assert!(start.distance(end) > 1.0, "planet stuck at launch point");
    }

    #[test]
    fn test_min_radius_softens_close_pass() {
        let info = describe_system(13, 8.0);
        let mut system = StarSystem::generate(13, &info);
        // Drop a planet almost onto the primary with no tangential speed
        for body in system.bodies.iter_mut() {
            if matches!(body.kind, BodyKind::Planet { .. }) {
                body.position = Vec3::new(0.05, 0.0, 0.0);
                body.velocity = Vec3::ZERO;
                break;
            }
        }
        let integrator = OrbitalIntegrator::default();
        for _ in 0..600 {
            integrator.step(&mut system, FRAME);
        }
        for body in &system.bodies {
            assert!(body.position.is_finite(), "{} diverged", body.designation);
            assert!(body.velocity.is_finite(), "{} diverged", body.designation);
        }
    }

    #[test]
    fn test_zero_dt_is_inert() {
        let info = describe_system(8, 8.0);
        let mut system = StarSystem::generate(8, &info);
        let before = system.clone();
        OrbitalIntegrator::default().step(&mut system, 0.0);
        assert_eq!(system, before);
    }
}
