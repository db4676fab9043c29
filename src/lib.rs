//! Deepfield - Multi-Scale Procedural Astronomy Sandbox

pub mod catalog;
pub mod core;
pub mod procgen;
pub mod simulation;
pub mod stellar;
