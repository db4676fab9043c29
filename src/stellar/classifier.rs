//! Stellar classification and evolution
//!
//! Newly formed stars draw a spectral class from an occurrence table,
//! then age through a fixed track: protostar, main sequence, giant,
//! remnant. Lifespans are in Gyr and wildly compressed at the top of
//! the table, which is what makes O-class systems feel rare and short.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stellar age below which a star is still condensing (Gyr)
pub const PROTOSTAR_CUTOFF_GYR: f32 = 0.05;

/// Giant phase lasts 10% of the main-sequence lifespan
pub const GIANT_PHASE_FACTOR: f32 = 1.1;

/// Spectral class, including post-main-sequence remnants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StellarClass {
    O,
    B,
    A,
    F,
    G,
    K,
    M,
    WhiteDwarf,
    NeutronStar,
    BlackHole,
}

/// Static data for one spectral class
#[derive(Debug, Clone, Copy)]
pub struct ClassProfile {
    pub class: StellarClass,
    /// Fraction of newly formed stars landing in this class
    ///
    /// Zero for remnants; they are never drawn directly.
    pub occurrence: f32,
    pub mass_solar: f32,
    pub radius_solar: f32,
    /// Main-sequence lifespan in Gyr
    pub lifespan_gyr: f32,
    pub color: Vec3,
    pub luminosity_label: &'static str,
}

/// Occurrence-ordered table walked by `classify`
///
/// Occurrences sum to 1.0. M dwarfs carry the remainder, matching the
/// real sky where the dim red majority never shows up to the naked eye.
pub const SELECTABLE_CLASSES: [ClassProfile; 7] = [
    ClassProfile {
        class: StellarClass::O,
        occurrence: 0.0003,
        mass_solar: 40.0,
        radius_solar: 10.0,
        lifespan_gyr: 0.004,
        color: Vec3::new(0.61, 0.69, 1.0),
        luminosity_label: "~9e5 Lsun",
    },
    ClassProfile {
        class: StellarClass::B,
        occurrence: 0.0012,
        mass_solar: 10.0,
        radius_solar: 5.0,
        lifespan_gyr: 0.03,
        color: Vec3::new(0.67, 0.75, 1.0),
        luminosity_label: "~2e4 Lsun",
    },
    ClassProfile {
        class: StellarClass::A,
        occurrence: 0.006,
        mass_solar: 2.0,
        radius_solar: 1.7,
        lifespan_gyr: 1.0,
        color: Vec3::new(0.80, 0.84, 1.0),
        luminosity_label: "~40 Lsun",
    },
    ClassProfile {
        class: StellarClass::F,
        occurrence: 0.03,
        mass_solar: 1.3,
        radius_solar: 1.3,
        lifespan_gyr: 4.0,
        color: Vec3::new(0.97, 0.95, 1.0),
        luminosity_label: "~6 Lsun",
    },
    ClassProfile {
        class: StellarClass::G,
        occurrence: 0.076,
        mass_solar: 1.0,
        radius_solar: 1.0,
        lifespan_gyr: 10.0,
        color: Vec3::new(1.0, 0.93, 0.78),
        luminosity_label: "~1 Lsun",
    },
    ClassProfile {
        class: StellarClass::K,
        occurrence: 0.121,
        mass_solar: 0.7,
        radius_solar: 0.8,
        lifespan_gyr: 30.0,
        color: Vec3::new(1.0, 0.82, 0.63),
        luminosity_label: "~0.3 Lsun",
    },
    ClassProfile {
        class: StellarClass::M,
        occurrence: 0.7655,
        mass_solar: 0.3,
        radius_solar: 0.4,
        lifespan_gyr: 200.0,
        color: Vec3::new(1.0, 0.62, 0.44),
        luminosity_label: "~0.04 Lsun",
    },
];

/// Remnant profiles, reached only through `remnant_class`
pub const REMNANT_CLASSES: [ClassProfile; 3] = [
    ClassProfile {
        class: StellarClass::WhiteDwarf,
        occurrence: 0.0,
        mass_solar: 0.6,
        radius_solar: 0.012,
        lifespan_gyr: f32::INFINITY,
        color: Vec3::new(0.90, 0.92, 1.0),
        luminosity_label: "~0.001 Lsun",
    },
    ClassProfile {
        class: StellarClass::NeutronStar,
        occurrence: 0.0,
        mass_solar: 1.4,
        radius_solar: 0.0001,
        lifespan_gyr: f32::INFINITY,
        color: Vec3::new(0.75, 0.82, 1.0),
        luminosity_label: "thermal afterglow",
    },
    ClassProfile {
        class: StellarClass::BlackHole,
        occurrence: 0.0,
        mass_solar: 8.0,
        radius_solar: 0.0002,
        lifespan_gyr: f32::INFINITY,
        color: Vec3::new(0.12, 0.10, 0.16),
        luminosity_label: "accretion-limited",
    },
];

impl StellarClass {
    pub fn profile(&self) -> &'static ClassProfile {
        match self {
            StellarClass::O => &SELECTABLE_CLASSES[0],
            StellarClass::B => &SELECTABLE_CLASSES[1],
            StellarClass::A => &SELECTABLE_CLASSES[2],
            StellarClass::F => &SELECTABLE_CLASSES[3],
            StellarClass::G => &SELECTABLE_CLASSES[4],
            StellarClass::K => &SELECTABLE_CLASSES[5],
            StellarClass::M => &SELECTABLE_CLASSES[6],
            StellarClass::WhiteDwarf => &REMNANT_CLASSES[0],
            StellarClass::NeutronStar => &REMNANT_CLASSES[1],
            StellarClass::BlackHole => &REMNANT_CLASSES[2],
        }
    }

    pub fn is_remnant(&self) -> bool {
        matches!(
            self,
            StellarClass::WhiteDwarf | StellarClass::NeutronStar | StellarClass::BlackHole
        )
    }

    /// Whether this class ever leaves the main sequence
    ///
    /// K and M lifespans exceed the age of the universe, so within the
    /// sandbox they stay on the main sequence no matter how old.
    pub fn leaves_main_sequence(&self) -> bool {
        matches!(
            self,
            StellarClass::O | StellarClass::B | StellarClass::A | StellarClass::F | StellarClass::G
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            StellarClass::O => "O",
            StellarClass::B => "B",
            StellarClass::A => "A",
            StellarClass::F => "F",
            StellarClass::G => "G",
            StellarClass::K => "K",
            StellarClass::M => "M",
            StellarClass::WhiteDwarf => "white dwarf",
            StellarClass::NeutronStar => "neutron star",
            StellarClass::BlackHole => "black hole",
        }
    }
}

/// Evolutionary stage of a star, ordered by age
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EvolutionState {
    Proto,
    MainSequence,
    Giant,
    Remnant,
}

impl EvolutionState {
    pub fn label(&self) -> &'static str {
        match self {
            EvolutionState::Proto => "protostar",
            EvolutionState::MainSequence => "main sequence",
            EvolutionState::Giant => "giant",
            EvolutionState::Remnant => "remnant",
        }
    }
}

/// Pick an initial class from a uniform roll in [0, 1)
///
/// Walks the selectable table in order and returns the first class
/// whose cumulative occurrence exceeds the roll. Falls through to M,
/// which also absorbs any float dust at the top of the range.
pub fn classify(roll: f32) -> StellarClass {
    let mut cumulative = 0.0;
    for profile in &SELECTABLE_CLASSES {
        cumulative += profile.occurrence;
        if roll < cumulative {
            return profile.class;
        }
    }
    StellarClass::M
}

/// Evolutionary state of a star formed at `formation_gyr`, observed at
/// universe age `now_gyr`
pub fn evolve(initial: StellarClass, formation_gyr: f32, now_gyr: f32) -> EvolutionState {
    if initial.is_remnant() {
        return EvolutionState::Remnant;
    }

    let age = (now_gyr - formation_gyr).max(0.0);
    if age < PROTOSTAR_CUTOFF_GYR {
        return EvolutionState::Proto;
    }

    let lifespan = initial.profile().lifespan_gyr;
    if age < lifespan || !initial.leaves_main_sequence() {
        return EvolutionState::MainSequence;
    }

    if age < lifespan * GIANT_PHASE_FACTOR {
        EvolutionState::Giant
    } else {
        EvolutionState::Remnant
    }
}

/// The remnant a progenitor class collapses into, if any
///
/// O and B split between black hole and neutron star on the roll; the
/// middle classes leave white dwarfs; K and M never collapse. Remnant
/// progenitors pass through unchanged.
pub fn remnant_class(progenitor: StellarClass, roll: f32) -> Option<StellarClass> {
    match progenitor {
        StellarClass::O | StellarClass::B => Some(if roll < 0.5 {
            StellarClass::BlackHole
        } else {
            StellarClass::NeutronStar
        }),
        StellarClass::A | StellarClass::F | StellarClass::G => Some(StellarClass::WhiteDwarf),
        StellarClass::K | StellarClass::M => None,
        remnant => Some(remnant),
    }
}
