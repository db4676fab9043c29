//! Bulk composition for catalog panels
//!
//! Every described object gets a hydrogen/helium/metals split plus one
//! highlighted trace element. The three percentages always sum to 100
//! after rounding, because metals are computed as the remainder.

use serde::{Deserialize, Serialize};

use crate::core::rng::SeededStream;

const TRACE_ELEMENTS: [&str; 6] = ["iron", "silicon", "carbon", "oxygen", "neon", "magnesium"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub hydrogen_pct: f32,
    pub helium_pct: f32,
    pub metals_pct: f32,
    pub trace: String,
}

impl Composition {
    pub fn generate(stream: &mut SeededStream) -> Self {
        let hydrogen_pct = round_tenth(stream.range(64.0, 74.0));
        let helium_pct = round_tenth(stream.range(18.0, 24.0));
        let metals_pct = round_tenth(100.0 - hydrogen_pct - helium_pct);
        let trace = TRACE_ELEMENTS[stream.index(TRACE_ELEMENTS.len())].to_string();
        Self {
            hydrogen_pct,
            helium_pct,
            metals_pct,
            trace,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "H {:.1}%, He {:.1}%, metals {:.1}% (trace: {})",
            self.hydrogen_pct, self.helium_pct, self.metals_pct, self.trace
        )
    }
}

fn round_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_sums_to_hundred() {
        for seed in 0..200 {
            let mut stream = SeededStream::new(seed);
            let c = Composition::generate(&mut stream);
            let total = c.hydrogen_pct + c.helium_pct + c.metals_pct;
            assert!((total - 100.0).abs() < 0.05, "sum {} for seed {}", total, seed);
            assert!(c.metals_pct > 0.0, "metals non-positive for seed {}", seed);
        }
    }

    #[test]
    fn test_composition_deterministic() {
        let mut a = SeededStream::new(33);
        let mut b = SeededStream::new(33);
        assert_eq!(Composition::generate(&mut a), Composition::generate(&mut b));
    }

    #[test]
    fn test_summary_mentions_trace() {
        let mut stream = SeededStream::new(5);
        let c = Composition::generate(&mut stream);
        assert!(c.summary().contains(&c.trace));
    }
}
