//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Index of a point in a generated field (universe starfield or galaxy disk)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointId(pub u32);

impl PointId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Index of a body in a star system (stars first, then planets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// The three nested scales the sandbox can be focused on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ScaleLevel {
    Universe = 0,
    Galaxy = 1,
    System = 2,
}

impl ScaleLevel {
    /// Numeric depth, 0 at the widest scale
    pub fn depth(&self) -> u8 {
        *self as u8
    }

    /// The next level inward, if any
    pub fn deeper(&self) -> Option<ScaleLevel> {
        match self {
            ScaleLevel::Universe => Some(ScaleLevel::Galaxy),
            ScaleLevel::Galaxy => Some(ScaleLevel::System),
            ScaleLevel::System => None,
        }
    }

    /// The next level outward, if any
    pub fn wider(&self) -> Option<ScaleLevel> {
        match self {
            ScaleLevel::Universe => None,
            ScaleLevel::Galaxy => Some(ScaleLevel::Universe),
            ScaleLevel::System => Some(ScaleLevel::Galaxy),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScaleLevel::Universe => "universe",
            ScaleLevel::Galaxy => "galaxy",
            ScaleLevel::System => "system",
        }
    }
}

/// Rate at which universe age accumulates while focused at universe scale
///
/// At 0.4 Gyr per wall-clock second the field matures from big bang to
/// the present-day cap in about 35 seconds of watching.
pub const UNIVERSE_AGE_RATE: f32 = 0.4;

/// Universe age never advances past the present-day value (Gyr)
pub const UNIVERSE_AGE_CAP: f32 = 13.8;

/// Rate at which the active galaxy ages while focused at galaxy scale
///
/// Slower than the universe rate; galactic evolution reads better when
/// a visit does not sweep the whole age range.
pub const GALAXY_AGE_RATE: f32 = 0.2;

/// Simulation ages, advanced only at the scale that owns each one
///
/// Universe age moves only while the universe field is the active scale,
/// galaxy age only while a galaxy is. Drilling in freezes the wider
/// clock until the view returns.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimClock {
    pub universe_age_gyr: f32,
    pub galaxy_age_gyr: f32,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, level: ScaleLevel, dt: f32) {
        match level {
            ScaleLevel::Universe => {
                self.universe_age_gyr =
                    (self.universe_age_gyr + dt * UNIVERSE_AGE_RATE).min(UNIVERSE_AGE_CAP);
            }
            ScaleLevel::Galaxy => {
                self.galaxy_age_gyr += dt * GALAXY_AGE_RATE;
            }
            ScaleLevel::System => {}
        }
    }

    /// Reset the galaxy-scale clock when a new galaxy becomes active
    pub fn reset_galaxy_age(&mut self, initial_gyr: f32) {
        self.galaxy_age_gyr = initial_gyr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_id_equality() {
        let a = PointId(1);
        let b = PointId(1);
        let c = PointId(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_point_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<PointId, &str> = HashMap::new();
        map.insert(PointId(3), "galaxy");
        assert_eq!(map.get(&PointId(3)), Some(&"galaxy"));
    }

    #[test]
    fn test_scale_ladder() {
        assert_eq!(ScaleLevel::Universe.deeper(), Some(ScaleLevel::Galaxy));
        assert_eq!(ScaleLevel::Galaxy.deeper(), Some(ScaleLevel::System));
        assert_eq!(ScaleLevel::System.deeper(), None);

        assert_eq!(ScaleLevel::System.wider(), Some(ScaleLevel::Galaxy));
        assert_eq!(ScaleLevel::Galaxy.wider(), Some(ScaleLevel::Universe));
        assert_eq!(ScaleLevel::Universe.wider(), None);
    }

    #[test]
    fn test_scale_depth_ordering() {
        assert!(ScaleLevel::Universe.depth() < ScaleLevel::Galaxy.depth());
        assert!(ScaleLevel::Galaxy.depth() < ScaleLevel::System.depth());
    }

    #[test]
    fn test_clock_advances_only_at_owning_level() {
        let mut clock = SimClock::new();
        clock.advance(ScaleLevel::Universe, 2.0);
        assert!((clock.universe_age_gyr - 0.8).abs() < 1e-6);
        assert_eq!(clock.galaxy_age_gyr, 0.0);

        let before = clock.universe_age_gyr;
        clock.advance(ScaleLevel::Galaxy, 2.0);
        assert_eq!(clock.universe_age_gyr, before);
        assert!((clock.galaxy_age_gyr - 0.4).abs() < 1e-6);

        clock.advance(ScaleLevel::System, 10.0);
        assert_eq!(clock.universe_age_gyr, before);
        assert!((clock.galaxy_age_gyr - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_universe_age_caps_at_present_day() {
        let mut clock = SimClock::new();
        clock.advance(ScaleLevel::Universe, 1000.0);
        assert_eq!(clock.universe_age_gyr, UNIVERSE_AGE_CAP);
    }
}
