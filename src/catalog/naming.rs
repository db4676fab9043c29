//! Designation generation for catalog entries
//!
//! Galaxies get catalog numbers, star systems get syllable names, and
//! children (companion stars, planets, central objects) derive their
//! designations from the parent string so a panel always reads as a
//! family.

use crate::core::rng::SeededStream;

const STAR_PREFIXES: [&str; 12] = [
    "Aur", "Bel", "Cyg", "Dra", "Eri", "Kae", "Lyn", "Mir", "Nav", "Oph", "Ser", "Vel",
];

const STAR_SUFFIXES: [&str; 12] = [
    "ion", "ara", "eus", "ith", "an", "is", "or", "une", "ea", "ax", "iel", "os",
];

const COMPONENT_LETTERS: [&str; 4] = ["A", "B", "C", "D"];

const ROMAN_NUMERALS: [&str; 8] = ["I", "II", "III", "IV", "V", "VI", "VII", "VIII"];

/// Catalog number for a galaxy, e.g. "DFC-4821"
pub fn galaxy_designation(stream: &mut SeededStream) -> String {
    format!("DFC-{:04}", stream.index(10_000))
}

/// Syllable name for a star system, e.g. "Belara-42"
pub fn star_designation(stream: &mut SeededStream) -> String {
    let prefix = STAR_PREFIXES[stream.index(STAR_PREFIXES.len())];
    let suffix = STAR_SUFFIXES[stream.index(STAR_SUFFIXES.len())];
    let number = stream.int_range(1, 99);
    format!("{}{}-{}", prefix, suffix, number)
}

/// Component letter for a star in a multi-star system, e.g. "Belara-42 B"
pub fn star_component(system: &str, index: usize) -> String {
    let letter = COMPONENT_LETTERS
        .get(index)
        .copied()
        .unwrap_or(COMPONENT_LETTERS[COMPONENT_LETTERS.len() - 1]);
    format!("{} {}", system, letter)
}

/// Planet designation by orbit order, e.g. "Belara-42 III"
pub fn planet_designation(system: &str, index: usize) -> String {
    match ROMAN_NUMERALS.get(index) {
        Some(numeral) => format!("{} {}", system, numeral),
        None => format!("{} P{}", system, index + 1),
    }
}

/// Designation for a galaxy's central compact object, e.g. "DFC-4821*"
pub fn central_designation(galaxy: &str) -> String {
    format!("{}*", galaxy)
}
