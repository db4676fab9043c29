pub mod classifier;

pub use classifier::{classify, evolve, remnant_class, EvolutionState, StellarClass};
