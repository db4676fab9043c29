pub mod composition;
pub mod descriptor;
pub mod naming;
pub mod spectrum;

pub use composition::Composition;
pub use descriptor::{
    CompactInfo, Descriptor, GalaxyInfo, PlanetInfo, SystemInfo, TargetPanel,
};
pub use spectrum::SpectrumSample;
