//! Universe-scale starfield generation
//!
//! The cosmic web is faked cheaply: points are scattered along segments
//! between randomly paired cluster anchors, eased toward the ends so
//! density pools at the clusters, then blurred with positional noise.
//! Nothing here is physical, but at half a million points it reads as
//! filaments and voids.

use glam::Vec3;

use crate::core::config::GenerationConfig;
use crate::core::rng::{position_seed, SeededStream, STREAM_UNIVERSE};
use crate::core::types::PointId;
use crate::procgen::CelestialPoint;

/// Radius of the universe field in render units
pub const SCALE_UNIVERSE: f32 = 40_000.0;

/// Point size range at universe scale
const POINT_SIZE_MIN: f32 = 0.6;
const POINT_SIZE_MAX: f32 = 2.2;

/// Color anchors blended per point: hot blue-white, solar warm, cool red
const PALETTE: [Vec3; 3] = [
    Vec3::new(0.62, 0.74, 1.0),
    Vec3::new(1.0, 0.86, 0.64),
    Vec3::new(1.0, 0.45, 0.32),
];

/// The universe-scale point field
#[derive(Debug, Clone, PartialEq)]
pub struct Starfield {
    pub points: Vec<CelestialPoint>,
}

impl Starfield {
    /// Generate the full field from a config
    ///
    /// Point `i` is produced by the `i`-th block of draws from the
    /// universe sub-stream, so a field is reproducible point-by-point
    /// for a given (seed, star_count, cluster_count, scatter) tuple.
    /// Out-of-range counts are clamped to their safe ranges first.
    pub fn generate(config: &GenerationConfig) -> Self {
        let start = std::time::Instant::now();
        let config = config.clone().clamped();
        let mut stream = SeededStream::new(config.seed).derive(STREAM_UNIVERSE);

        // Cluster anchors with a central bias: sqrt pulls mass inward
        // relative to a uniform ball
        let anchors: Vec<Vec3> = (0..config.cluster_count)
            .map(|_| {
                let dir = stream.unit_dir();
                let r = stream.next().sqrt() * SCALE_UNIVERSE;
                dir * r
            })
            .collect();

        let scatter = config.filament_scatter * SCALE_UNIVERSE;
        let mut points = Vec::with_capacity(config.star_count as usize);

        for i in 0..config.star_count {
            let a = anchors[stream.index(anchors.len())];

            // Three candidate far anchors, keep the nearest: filaments
            // prefer short spans, which is what knits the web
            let mut b = anchors[stream.index(anchors.len())];
            let mut best = a.distance_squared(b);
            for _ in 0..2 {
                let candidate = anchors[stream.index(anchors.len())];
                let d = a.distance_squared(candidate);
                if d < best {
                    b = candidate;
                    best = d;
                }
            }

            let t = ease(stream.next());
            let backbone = a.lerp(b, t);

            let noise = Vec3::new(
                (stream.next() - 0.5) * scatter,
                (stream.next() - 0.5) * scatter,
                (stream.next() - 0.5) * scatter,
            );
            let position = backbone + noise;

            let color = palette_blend(stream.next());
            let size = stream.range(POINT_SIZE_MIN, POINT_SIZE_MAX);

            points.push(CelestialPoint {
                id: PointId(i),
                position,
                color,
                size,
                seed: position_seed(position),
                orbit: None,
            });
        }

        tracing::info!(
            points = points.len(),
            clusters = anchors.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "universe field generated"
        );

        Starfield { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn position_of(&self, id: PointId) -> Option<Vec3> {
        self.points.get(id.0 as usize).map(|p| p.position)
    }
}

/// Ease toward the segment ends so density pools at the clusters
///
/// Piecewise quadratic: below the midpoint 2t^2, above it 1 - 2(1-t)^2.
/// Continuous at 0.5 and steeper near both ends than plain lerp.
fn ease(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - 2.0 * (1.0 - t) * (1.0 - t)
    }
}

/// One roll walks the three-anchor palette end to end
fn palette_blend(roll: f32) -> Vec3 {
    if roll < 0.5 {
        PALETTE[0].lerp(PALETTE[1], roll * 2.0)
    } else {
        PALETTE[1].lerp(PALETTE[2], (roll - 0.5) * 2.0)
    }
}
