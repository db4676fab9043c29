//! Generation configuration with documented constants
//!
//! All tunable generation numbers are collected here with explanations
//! of their purpose. The config is owned by the simulation context;
//! there is no global instance.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::error::{Result, SandboxError};

/// Smallest universe field that still reads as a cosmic web
pub const MIN_STAR_COUNT: u32 = 64;

/// Upper bound on the universe field; above this, generation time and
/// memory stop being interactive
pub const MAX_STAR_COUNT: u32 = 4_000_000;

/// At least this many cluster anchors, so filaments have ends to span
pub const MIN_CLUSTER_COUNT: u32 = 4;

/// Cluster anchors beyond this stop adding visible structure
pub const MAX_CLUSTER_COUNT: u32 = 1_024;

/// Quality presets trading density for generation time
///
/// Presets only pick a (star_count, cluster_count) pair; every other
/// parameter is independent of quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityPreset {
    Low,
    Medium,
    High,
    Ultra,
}

impl QualityPreset {
    pub fn star_count(&self) -> u32 {
        match self {
            QualityPreset::Low => 120_000,
            QualityPreset::Medium => 250_000,
            QualityPreset::High => 500_000,
            QualityPreset::Ultra => 1_000_000,
        }
    }

    pub fn cluster_count(&self) -> u32 {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 96,
            QualityPreset::High => 128,
            QualityPreset::Ultra => 192,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityPreset::Low => "low",
            QualityPreset::Medium => "medium",
            QualityPreset::High => "high",
            QualityPreset::Ultra => "ultra",
        }
    }
}

impl FromStr for QualityPreset {
    type Err = SandboxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "med" | "medium" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            "ultra" => Ok(QualityPreset::Ultra),
            other => Err(SandboxError::UnknownPreset(other.to_string())),
        }
    }
}

/// Configuration for procedural generation
///
/// These values are tuned so the default universe reads as a cosmic web
/// at interactive generation speed. Out-of-range values are clamped
/// rather than rejected, so a hand-edited config file cannot wedge the
/// sandbox at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Session seed; every generated structure is derived from it
    pub seed: u64,

    /// Number of points in the universe starfield
    ///
    /// Galaxy fields scale from this too (one fifth of it), so the
    /// perceived density stays consistent across scales.
    pub star_count: u32,

    /// Number of cluster anchors the cosmic web hangs between
    ///
    /// More anchors means shorter, busier filaments. The visual sweet
    /// spot moves slowly: doubling the star count only wants ~1.4x the
    /// anchors, which is why presets scale them sub-linearly.
    pub cluster_count: u32,

    /// Width of the positional noise around each filament, as a
    /// fraction of the universe radius
    ///
    /// At 0.0 points lie exactly on the anchor-to-anchor lines; at 1.0
    /// the web washes out into an even fog. 0.05 keeps filaments crisp
    /// but organic.
    pub filament_scatter: f32,

    /// Whether the autopilot controller starts enabled
    pub autopilot: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            star_count: QualityPreset::Medium.star_count(),
            cluster_count: QualityPreset::Medium.cluster_count(),
            filament_scatter: 0.05,
            autopilot: true,
        }
    }
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config for a quality preset with an explicit seed
    pub fn preset(preset: QualityPreset, seed: u64) -> Self {
        Self {
            seed,
            star_count: preset.star_count(),
            cluster_count: preset.cluster_count(),
            ..Self::default()
        }
    }

    /// Clamp all fields into their safe ranges, logging anything touched
    pub fn clamped(mut self) -> Self {
        let star_count = self.star_count.clamp(MIN_STAR_COUNT, MAX_STAR_COUNT);
        if star_count != self.star_count {
            tracing::warn!(
                requested = self.star_count,
                clamped = star_count,
                "star_count out of range, clamping"
            );
            self.star_count = star_count;
        }

        let cluster_count = self.cluster_count.clamp(MIN_CLUSTER_COUNT, MAX_CLUSTER_COUNT);
        if cluster_count != self.cluster_count {
            tracing::warn!(
                requested = self.cluster_count,
                clamped = cluster_count,
                "cluster_count out of range, clamping"
            );
            self.cluster_count = cluster_count;
        }

        let scatter = self.filament_scatter.clamp(0.0, 1.0);
        if scatter != self.filament_scatter {
            tracing::warn!(
                requested = self.filament_scatter,
                clamped = scatter,
                "filament_scatter out of range, clamping"
            );
            self.filament_scatter = scatter;
        }

        // Cross-field invariant: never more anchors than points
        if self.cluster_count > self.star_count {
            tracing::warn!(
                cluster_count = self.cluster_count,
                star_count = self.star_count,
                "cluster_count exceeds star_count, clamping"
            );
            self.cluster_count = self.star_count;
        }

        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.star_count < MIN_STAR_COUNT || self.star_count > MAX_STAR_COUNT {
            return Err(format!(
                "star_count ({}) must be in [{}, {}]",
                self.star_count, MIN_STAR_COUNT, MAX_STAR_COUNT
            ));
        }

        if self.cluster_count < MIN_CLUSTER_COUNT || self.cluster_count > MAX_CLUSTER_COUNT {
            return Err(format!(
                "cluster_count ({}) must be in [{}, {}]",
                self.cluster_count, MIN_CLUSTER_COUNT, MAX_CLUSTER_COUNT
            ));
        }

        if !(0.0..=1.0).contains(&self.filament_scatter) {
            return Err(format!(
                "filament_scatter ({}) must be in [0, 1]",
                self.filament_scatter
            ));
        }

        if self.star_count < self.cluster_count {
            return Err(format!(
                "star_count ({}) must be >= cluster_count ({})",
                self.star_count, self.cluster_count
            ));
        }

        Ok(())
    }

    /// Parse a config from TOML, with missing fields taking defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: GenerationConfig = toml::from_str(text)?;
        let config = config.clamped();
        config.validate().map_err(SandboxError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
