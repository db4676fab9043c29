//! Catalog descriptors for pick targets
//!
//! A descriptor is everything the info panel needs to describe one
//! structure. The kind tag is explicit and panels are built by
//! matching on it, so adding a new target kind is a compile error
//! until every consumer handles it.

use serde::{Deserialize, Serialize};

use crate::catalog::composition::Composition;
use crate::catalog::spectrum::{self, SpectrumSample};
use crate::procgen::galaxy::Morphology;
use crate::stellar::{EvolutionState, StellarClass};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Descriptor {
    Galaxy(GalaxyInfo),
    System(SystemInfo),
    CompactObject(CompactInfo),
    Planet(PlanetInfo),
}

/// Panel data for a galaxy in the universe field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalaxyInfo {
    pub designation: String,
    /// Chosen once when the galaxy is first described; never redrawn
    pub morphology: Morphology,
    pub age_gyr: f32,
    pub mass_label: String,
    pub radius_label: String,
    pub composition: Composition,
}

/// Panel data for a star system in a galaxy field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub designation: String,
    /// Class the primary formed as
    pub initial_class: StellarClass,
    /// Collapse product for the primary, drawn at description time
    pub remnant: Option<StellarClass>,
    pub evolution: EvolutionState,
    pub formation_gyr: f32,
    /// Stellar age at description time (Gyr)
    pub stellar_age_gyr: f32,
    pub star_count: u32,
    pub composition: Composition,
    pub spectrum: Vec<SpectrumSample>,
}

impl SystemInfo {
    /// The class the panel should show: the remnant once evolution has
    /// run its course, the formation class before that
    pub fn display_class(&self) -> StellarClass {
        if self.evolution == EvolutionState::Remnant {
            self.remnant.unwrap_or(self.initial_class)
        } else {
            self.initial_class
        }
    }
}

/// Panel data for a galaxy's central compact object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactInfo {
    pub designation: String,
    pub class: StellarClass,
    pub mass_label: String,
    pub radius_label: String,
}

/// Panel data for a planet in the active system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetInfo {
    pub designation: String,
    pub is_gas: bool,
    pub orbit_radius: f32,
    pub mass_label: String,
    pub radius_label: String,
    pub composition: Composition,
}

/// Flattened panel fields consumed by displays
#[derive(Debug, Clone, Serialize)]
pub struct TargetPanel {
    pub designation: String,
    pub kind: String,
    pub class_label: String,
    pub age_label: String,
    pub mass_label: String,
    pub radius_label: String,
    pub luminosity_label: String,
    pub composition: String,
    pub spectrum: Vec<SpectrumSample>,
}

impl Descriptor {
    pub fn designation(&self) -> &str {
        match self {
            Descriptor::Galaxy(info) => &info.designation,
            Descriptor::System(info) => &info.designation,
            Descriptor::CompactObject(info) => &info.designation,
            Descriptor::Planet(info) => &info.designation,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Descriptor::Galaxy(_) => "galaxy",
            Descriptor::System(_) => "star system",
            Descriptor::CompactObject(_) => "compact object",
            Descriptor::Planet(_) => "planet",
        }
    }

    /// Build the display panel for this descriptor
    ///
    /// Systems carry their stored spectrum; everything else derives one
    /// from its designation on the fly.
    pub fn panel(&self) -> TargetPanel {
        match self {
            Descriptor::Galaxy(info) => TargetPanel {
                designation: info.designation.clone(),
                kind: self.kind_label().to_string(),
                class_label: info.morphology.label().to_string(),
                age_label: format!("{:.2} Gyr", info.age_gyr),
                mass_label: info.mass_label.clone(),
                radius_label: info.radius_label.clone(),
                luminosity_label: match info.morphology {
                    Morphology::Quasar => "outshines host".to_string(),
                    _ => "integrated starlight".to_string(),
                },
                composition: info.composition.summary(),
                spectrum: spectrum::from_designation(&info.designation),
            },
            Descriptor::System(info) => {
                let class = info.display_class();
                let profile = class.profile();
                TargetPanel {
                    designation: info.designation.clone(),
                    kind: self.kind_label().to_string(),
                    class_label: format!("{} ({})", class.label(), info.evolution.label()),
                    age_label: format!("{:.2} Gyr", info.stellar_age_gyr),
                    mass_label: format!("{:.2} Msun", profile.mass_solar),
                    radius_label: format!("{:.3} Rsun", profile.radius_solar),
                    luminosity_label: profile.luminosity_label.to_string(),
                    composition: info.composition.summary(),
                    spectrum: info.spectrum.clone(),
                }
            }
            Descriptor::CompactObject(info) => TargetPanel {
                designation: info.designation.clone(),
                kind: self.kind_label().to_string(),
                class_label: info.class.label().to_string(),
                age_label: "coeval with host".to_string(),
                mass_label: info.mass_label.clone(),
                radius_label: info.radius_label.clone(),
                luminosity_label: info.class.profile().luminosity_label.to_string(),
                composition: "accretion disk".to_string(),
                spectrum: spectrum::from_designation(&info.designation),
            },
            Descriptor::Planet(info) => TargetPanel {
                designation: info.designation.clone(),
                kind: self.kind_label().to_string(),
                class_label: if info.is_gas { "gas giant" } else { "rocky" }.to_string(),
                age_label: "n/a".to_string(),
                mass_label: info.mass_label.clone(),
                radius_label: info.radius_label.clone(),
                luminosity_label: "albedo only".to_string(),
                composition: info.composition.summary(),
                spectrum: spectrum::from_designation(&info.designation),
            },
        }
    }
}
