//! Synthetic spectral fingerprints
//!
//! Spectra are display flavor: a set of emission lines derived from
//! the designation text, so the same object always shows the same
//! fingerprint without anything being stored.

use serde::{Deserialize, Serialize};

use crate::core::rng::{SeededStream, STREAM_SPECTRUM};

pub const SPECTRUM_SAMPLE_COUNT: usize = 24;

/// One emission line in a panel spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumSample {
    /// Line position across the display band, in [0, 100)
    pub position: f32,
    /// Relative intensity, in [0, 1)
    pub intensity: f32,
}

/// Derive the line set for a designation string
///
/// The designation is folded into a checksum seed, so any two objects
/// with different names get visibly different fingerprints and renames
/// are the only way to change one.
pub fn from_designation(designation: &str) -> Vec<SpectrumSample> {
    let checksum = designation
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
    let mut stream = SeededStream::new(checksum).derive(STREAM_SPECTRUM);

    let mut samples: Vec<SpectrumSample> = (0..SPECTRUM_SAMPLE_COUNT)
        .map(|_| SpectrumSample {
            position: stream.range(0.0, 100.0),
            intensity: stream.next(),
        })
        .collect();
    samples.sort_by(|a, b| a.position.total_cmp(&b.position));
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectrum_is_deterministic() {
        assert_eq!(from_designation("Belara-42"), from_designation("Belara-42"));
    }

    #[test]
    fn test_spectrum_differs_by_designation() {
        assert_ne!(from_designation("Belara-42"), from_designation("Belara-43"));
    }

    #[test]
    fn test_spectrum_shape() {
        let samples = from_designation("DFC-0007*");
        assert_eq!(samples.len(), SPECTRUM_SAMPLE_COUNT);
        for pair in samples.windows(2) {
            assert!(pair[0].position <= pair[1].position, "lines not sorted");
        }
        for s in &samples {
            assert!((0.0..100.0).contains(&s.position));
            assert!((0.0..1.0).contains(&s.intensity));
        }
    }
}
