//! Simulation context
//!
//! Owns every piece of live state: the config, the clocks, the scale
//! machine, the generated realms and the selection. There is no global
//! anywhere; callers hold a `SimulationContext` and thread it through
//! `run_sandbox_tick`. All world mutation funnels through the methods
//! here, so re-centering and realm swaps happen in exactly one place.

use ahash::AHashMap;
use glam::Vec3;

use crate::catalog::{CompactInfo, Descriptor, GalaxyInfo, SystemInfo, TargetPanel};
use crate::core::config::GenerationConfig;
use crate::core::error::{Result, SandboxError};
use crate::core::rng::{SeededStream, STREAM_AUTOPILOT};
use crate::core::types::{BodyId, PointId, ScaleLevel, SimClock};
use crate::procgen::galaxy::{describe_galaxy, field_star_count, GalaxyField, GALAXY_RADIUS};
use crate::procgen::system::{
    describe_compact_system, describe_system, StarSystem, SYSTEM_EXTENT,
};
use crate::procgen::universe::Starfield;
use crate::simulation::autopilot::{AutopilotChoice, AutopilotController, AutopilotView, PriorityTarget};
use crate::simulation::physics::OrbitalIntegrator;
use crate::simulation::scale::{CompletedTransition, ScaleMachine};
use crate::simulation::tick::SandboxEvent;

/// Camera height over a galaxy after ejecting out of it
const GALAXY_RETREAT_FACTOR: f32 = 1.6;

/// Camera height over a system after ejecting out of it
const SYSTEM_RETREAT_FACTOR: f32 = 2.5;

/// The active galaxy: its descriptor, its generated field and the
/// universe point it hangs under
#[derive(Debug)]
pub struct GalaxyRealm {
    pub source: PointId,
    /// Root seed the realm was described and generated from
    pub seed: u64,
    /// Clone of the catalog descriptor; `age_gyr` advances while active
    pub info: GalaxyInfo,
    pub field: GalaxyField,
}

/// The active star system
#[derive(Debug)]
pub struct SystemRealm {
    /// Galaxy field point entered, or None for a central object
    pub source: Option<PointId>,
    pub info: SystemInfo,
    pub system: StarSystem,
}

/// Whatever the info panel is currently describing
#[derive(Debug, Clone)]
pub struct SelectedTarget {
    pub descriptor: Descriptor,
    pub position: Vec3,
    /// Set for planet picks so the selection follows the orbit
    pub body: Option<BodyId>,
}

pub struct SimulationContext {
    pub config: GenerationConfig,
    pub clock: SimClock,
    pub scale: ScaleMachine,
    pub autopilot: AutopilotController,
    pub integrator: OrbitalIntegrator,
    pub universe: Starfield,
    pub galaxy: Option<GalaxyRealm>,
    pub system: Option<SystemRealm>,
    /// Galaxy descriptors by universe point; identity survives revisits
    galaxy_catalog: AHashMap<PointId, GalaxyInfo>,
    pub selected: Option<SelectedTarget>,
    pub camera_focus: Vec3,
}

impl SimulationContext {
    /// Build a context and generate its universe field
    pub fn new(config: GenerationConfig) -> Self {
        let config = config.clamped();
        let universe = Starfield::generate(&config);
        let autopilot = AutopilotController::new(
            SeededStream::new(config.seed).derive(STREAM_AUTOPILOT),
            config.autopilot,
        );
        tracing::info!(
            seed = config.seed,
            points = universe.len(),
            autopilot = config.autopilot,
            "simulation context ready"
        );
        SimulationContext {
            config,
            clock: SimClock::new(),
            scale: ScaleMachine::new(),
            autopilot,
            integrator: OrbitalIntegrator::default(),
            universe,
            galaxy: None,
            system: None,
            galaxy_catalog: AHashMap::new(),
            selected: None,
            camera_focus: Vec3::ZERO,
        }
    }

    /// Throw everything away and regenerate from scratch
    ///
    /// Realms, the descriptor catalog, the clocks and the accumulated
    /// world offset all reset; the autopilot keeps its enabled flag.
    pub fn big_bang(&mut self, seed: Option<u64>) -> Vec<SandboxEvent> {
        if let Some(seed) = seed {
            self.config.seed = seed;
        }
        let enabled = self.autopilot.enabled();
        self.universe = Starfield::generate(&self.config);
        self.clock = SimClock::new();
        self.scale.reset();
        self.galaxy = None;
        self.system = None;
        self.galaxy_catalog.clear();
        self.selected = None;
        self.camera_focus = Vec3::ZERO;
        self.autopilot = AutopilotController::new(
            SeededStream::new(self.config.seed).derive(STREAM_AUTOPILOT),
            enabled,
        );
        tracing::info!(seed = self.config.seed, "big bang");
        vec![SandboxEvent::UniverseRegenerated {
            seed: self.config.seed,
            points: self.universe.len(),
        }]
    }

    /// Descriptor for the galaxy behind a universe point
    ///
    /// First description fixes the galaxy's identity (morphology,
    /// designation, composition); every later call returns the cached
    /// entry no matter how far the universe clock has moved.
    pub fn galaxy_info_for(&mut self, point: PointId) -> Result<GalaxyInfo> {
        if point.0 as usize >= self.universe.len() {
            return Err(SandboxError::TargetOutOfRange {
                index: point.0 as usize,
                count: self.universe.len(),
                context: "universe field",
            });
        }
        if let Some(info) = self.galaxy_catalog.get(&point) {
            return Ok(info.clone());
        }
        let seed = self.config.seed.wrapping_add(point.0 as u64);
        let info = describe_galaxy(seed, self.clock.universe_age_gyr);
        self.galaxy_catalog.insert(point, info.clone());
        Ok(info)
    }

    /// Descriptor for the system behind a galaxy field point
    pub fn system_info_for(&mut self, point: PointId) -> Result<SystemInfo> {
        let realm = self
            .galaxy
            .as_ref()
            .ok_or(SandboxError::NoActiveStructure("galaxy"))?;
        let field_point = realm.field.points.get(point.0 as usize).ok_or(
            SandboxError::TargetOutOfRange {
                index: point.0 as usize,
                count: realm.field.len(),
                context: "galaxy field",
            },
        )?;
        Ok(describe_system(field_point.seed, self.clock.universe_age_gyr))
    }

    /// Select the indexed structure at the current scale
    ///
    /// At universe scale the index addresses starfield points, at galaxy
    /// scale field points, at system scale the planet tour order.
    pub fn pick(&mut self, index: usize) -> Result<Descriptor> {
        let descriptor = match self.scale.level() {
            ScaleLevel::Universe => {
                let point = point_handle(index, self.universe.len(), "universe field")?;
                let position =
                    self.universe
                        .position_of(point)
                        .ok_or(SandboxError::TargetOutOfRange {
                            index,
                            count: self.universe.len(),
                            context: "universe field",
                        })?;
                let info = self.galaxy_info_for(point)?;
                let descriptor = Descriptor::Galaxy(info);
                self.selected = Some(SelectedTarget {
                    descriptor: descriptor.clone(),
                    position,
                    body: None,
                });
                descriptor
            }
            ScaleLevel::Galaxy => {
                let (point, position) = {
                    let realm = self
                        .galaxy
                        .as_ref()
                        .ok_or(SandboxError::NoActiveStructure("galaxy"))?;
                    let point = point_handle(index, realm.field.len(), "galaxy field")?;
                    let position = realm
                        .field
                        .position_of(point)
                        .ok_or(SandboxError::TargetOutOfRange {
                            index,
                            count: realm.field.len(),
                            context: "galaxy field",
                        })?;
                    (point, position)
                };
                let info = self.system_info_for(point)?;
                let descriptor = Descriptor::System(info);
                self.selected = Some(SelectedTarget {
                    descriptor: descriptor.clone(),
                    position,
                    body: None,
                });
                descriptor
            }
            ScaleLevel::System => {
                let realm = self
                    .system
                    .as_ref()
                    .ok_or(SandboxError::NoActiveStructure("system"))?;
                let info = realm.system.planet_descriptor(index).ok_or(
                    SandboxError::TargetOutOfRange {
                        index,
                        count: realm.system.planet_count(),
                        context: "planet tour",
                    },
                )?;
                let body = realm.system.planets().nth(index);
                let (position, body_id) = match body {
                    Some(b) => (b.position, Some(b.id)),
                    None => (Vec3::ZERO, None),
                };
                let descriptor = Descriptor::Planet(info);
                self.selected = Some(SelectedTarget {
                    descriptor: descriptor.clone(),
                    position,
                    body: body_id,
                });
                descriptor
            }
        };
        tracing::info!(
            designation = descriptor.designation(),
            kind = descriptor.kind_label(),
            "target selected"
        );
        Ok(descriptor)
    }

    /// Select the active galaxy's central compact object
    pub fn pick_central(&mut self) -> Result<Descriptor> {
        let realm = self
            .galaxy
            .as_ref()
            .ok_or(SandboxError::NoActiveStructure("galaxy"))?;
        let descriptor = Descriptor::CompactObject(realm.field.central.info.clone());
        self.selected = Some(SelectedTarget {
            descriptor: descriptor.clone(),
            position: realm.field.central.position,
            body: None,
        });
        tracing::info!(
            designation = descriptor.designation(),
            "central object selected"
        );
        Ok(descriptor)
    }

    /// Select the indexed structure and fly toward it
    ///
    /// At universe and galaxy scale this starts a drill-down; at system
    /// scale there is nothing deeper, so the camera just moves to the
    /// planet.
    pub fn warp(&mut self, index: usize) -> Result<Vec<SandboxEvent>> {
        let level = self.scale.level();
        let descriptor = self.pick(index)?;
        let position = self
            .selected
            .as_ref()
            .map(|s| s.position)
            .unwrap_or(Vec3::ZERO);

        let mut events = Vec::new();
        match level {
            ScaleLevel::Universe | ScaleLevel::Galaxy => {
                // pick() validated the index against the field and the
                // handle width, so the narrowing here cannot wrap
                let accepted = self.scale.request_drill_down(
                    position,
                    Some(PointId(index as u32)),
                    Some(descriptor.clone()),
                    self.camera_focus,
                );
                if accepted {
                    events.push(SandboxEvent::TransitionStarted {
                        from: level,
                        to: level.deeper().unwrap_or(level),
                        designation: descriptor.designation().to_string(),
                    });
                }
            }
            ScaleLevel::System => {
                self.camera_focus = position;
                events.push(SandboxEvent::PlanetFocused {
                    designation: descriptor.designation().to_string(),
                });
            }
        }
        Ok(events)
    }

    /// Fly into the active galaxy's central object
    pub fn warp_central(&mut self) -> Result<Vec<SandboxEvent>> {
        let descriptor = self.pick_central()?;
        let position = self
            .selected
            .as_ref()
            .map(|s| s.position)
            .unwrap_or(Vec3::ZERO);
        let mut events = Vec::new();
        let accepted =
            self.scale
                .request_drill_down(position, None, Some(descriptor.clone()), self.camera_focus);
        if accepted {
            events.push(SandboxEvent::TransitionStarted {
                from: ScaleLevel::Galaxy,
                to: ScaleLevel::System,
                designation: descriptor.designation().to_string(),
            });
        }
        Ok(events)
    }

    /// Retreat one scale outward
    ///
    /// No-op at universe scale or while a transition is in flight.
    pub fn request_eject(&mut self) -> Vec<SandboxEvent> {
        let level = self.scale.level();
        let retreat = match level {
            ScaleLevel::Universe => Vec3::ZERO,
            ScaleLevel::Galaxy => Vec3::Y * (GALAXY_RADIUS * GALAXY_RETREAT_FACTOR),
            ScaleLevel::System => Vec3::Y * (SYSTEM_EXTENT * SYSTEM_RETREAT_FACTOR),
        };
        if self.scale.request_eject(retreat, self.camera_focus) {
            vec![SandboxEvent::EjectStarted { from: level }]
        } else {
            Vec::new()
        }
    }

    /// Apply one autopilot decision as if the user had made it
    pub fn apply_choice(&mut self, choice: AutopilotChoice) -> Result<Vec<SandboxEvent>> {
        match choice {
            AutopilotChoice::DrillUniverse(point) => self.warp(point.0 as usize),
            AutopilotChoice::DrillGalaxyPoint(point) => self.warp(point.0 as usize),
            AutopilotChoice::DrillPriority(target) => match &target.descriptor {
                // Central positions move under re-centering; resolve live
                Descriptor::CompactObject(_) => self.warp_central(),
                _ => {
                    self.selected = Some(SelectedTarget {
                        descriptor: target.descriptor.clone(),
                        position: target.position,
                        body: None,
                    });
                    let accepted = self.scale.request_drill_down(
                        target.position,
                        None,
                        Some(target.descriptor.clone()),
                        self.camera_focus,
                    );
                    Ok(if accepted {
                        vec![SandboxEvent::TransitionStarted {
                            from: self.scale.level(),
                            to: ScaleLevel::System,
                            designation: target.descriptor.designation().to_string(),
                        }]
                    } else {
                        Vec::new()
                    })
                }
            },
            AutopilotChoice::FocusPlanet(index) => self.warp(index),
            AutopilotChoice::Eject => Ok(self.request_eject()),
        }
    }

    /// Everything the autopilot is allowed to see this frame
    pub fn autopilot_view(&self) -> AutopilotView {
        AutopilotView {
            level: self.scale.level(),
            transitioning: self.scale.is_transitioning(),
            universe_age_gyr: self.clock.universe_age_gyr,
            universe_points: self.universe.len(),
            galaxy_points: self.galaxy.as_ref().map_or(0, |r| r.field.len()),
            planet_count: self.system.as_ref().map_or(0, |r| r.system.planet_count()),
        }
    }

    /// Land a finished transition: re-center, swap realms, reseed tours
    pub fn complete_transition(&mut self, done: CompletedTransition) -> Vec<SandboxEvent> {
        let mut events = vec![SandboxEvent::TransitionCompleted {
            level: done.to,
            forced: done.forced,
        }];

        match (done.from, done.to) {
            (ScaleLevel::Universe, ScaleLevel::Galaxy) => {
                self.recenter_on(done.target);
                let Some(point) = done.source_point else {
                    tracing::warn!("galaxy transition landed without a source point");
                    return events;
                };
                let reused = matches!(&self.galaxy, Some(realm) if realm.source == point);
                if reused {
                    if let Some(realm) = &self.galaxy {
                        self.clock.reset_galaxy_age(realm.info.age_gyr);
                        tracing::debug!(
                            designation = %realm.info.designation,
                            age_gyr = realm.info.age_gyr,
                            "galaxy realm reused"
                        );
                    }
                } else {
                    self.stash_galaxy_age();
                    let info = match done.payload {
                        Some(Descriptor::Galaxy(info)) => info,
                        _ => match self.galaxy_info_for(point) {
                            Ok(info) => info,
                            Err(err) => {
                                tracing::warn!(%err, "galaxy transition had no descriptor");
                                return events;
                            }
                        },
                    };
                    let seed = self.config.seed.wrapping_add(point.0 as u64);
                    let field =
                        GalaxyField::generate(seed, &info, field_star_count(self.config.star_count));
                    self.clock.reset_galaxy_age(info.age_gyr);
                    self.autopilot.on_galaxy_entered(vec![PriorityTarget {
                        position: field.central.position,
                        descriptor: Descriptor::CompactObject(field.central.info.clone()),
                    }]);
                    self.galaxy = Some(GalaxyRealm {
                        source: point,
                        seed,
                        info,
                        field,
                    });
                }
                if let Some(realm) = &self.galaxy {
                    events.push(SandboxEvent::GalaxyRealmBuilt {
                        designation: realm.info.designation.clone(),
                        morphology: realm.info.morphology,
                        points: realm.field.len(),
                        reused,
                    });
                    self.selected = Some(SelectedTarget {
                        descriptor: Descriptor::Galaxy(realm.info.clone()),
                        position: Vec3::ZERO,
                        body: None,
                    });
                }
            }
            (ScaleLevel::Galaxy, ScaleLevel::System) => {
                self.recenter_on(done.target);
                let universe_age = self.clock.universe_age_gyr;
                let built = match (&done.payload, &self.galaxy) {
                    (Some(Descriptor::System(info)), Some(realm)) => done
                        .source_point
                        .and_then(|p| realm.field.points.get(p.0 as usize))
                        .map(|field_point| (field_point.seed, info.clone())),
                    (Some(Descriptor::CompactObject(cinfo)), Some(realm)) => {
                        let seed = realm.field.central.seed;
                        Some((
                            seed,
                            describe_compact_system(seed, &cinfo.designation, universe_age),
                        ))
                    }
                    _ => None,
                };
                match built {
                    Some((seed, info)) => {
                        let system = StarSystem::generate(seed, &info);
                        events.push(SandboxEvent::SystemRealmBuilt {
                            designation: info.designation.clone(),
                            stars: info.star_count,
                            planets: system.planet_count(),
                        });
                        self.selected = Some(SelectedTarget {
                            descriptor: Descriptor::System(info.clone()),
                            position: Vec3::ZERO,
                            body: None,
                        });
                        self.system = Some(SystemRealm {
                            source: done.source_point,
                            info,
                            system,
                        });
                        self.autopilot.on_system_entered();
                    }
                    None => tracing::warn!("system transition landed without a descriptor"),
                }
            }
            (ScaleLevel::Galaxy, ScaleLevel::Universe) => {
                // Eject: no re-centering, the realm stays cached
                self.stash_galaxy_age();
                self.camera_focus = done.target;
                self.selected = None;
            }
            (ScaleLevel::System, ScaleLevel::Galaxy) => {
                // Eject: the system realm is discarded, the galaxy resumes
                self.system = None;
                self.camera_focus = done.target;
                self.selected = self.galaxy.as_ref().map(|realm| SelectedTarget {
                    descriptor: Descriptor::Galaxy(realm.info.clone()),
                    position: realm.field.central.position,
                    body: None,
                });
            }
            (from, to) => {
                tracing::warn!(from = from.label(), to = to.label(), "unexpected transition");
            }
        }

        events
    }

    /// Panel for whatever is selected, if anything
    pub fn target_panel(&self) -> Option<TargetPanel> {
        self.selected.as_ref().map(|s| s.descriptor.panel())
    }

    /// Central object descriptor of the active galaxy, if any
    pub fn central_info(&self) -> Option<&CompactInfo> {
        self.galaxy.as_ref().map(|r| &r.field.central.info)
    }

    /// Keep the selection glued to its orbiting body
    pub fn refresh_selected(&mut self) {
        let Some(selected) = &mut self.selected else {
            return;
        };
        let Some(body_id) = selected.body else {
            return;
        };
        if let Some(realm) = &self.system {
            if let Some(body) = realm.system.bodies.get(body_id.0 as usize) {
                selected.position = body.position;
            }
        }
    }

    /// Shift every live position so `target` becomes the new origin
    ///
    /// The shift accumulates in `world_offset` and is never undone;
    /// absolute coordinates are always `live + world_offset`.
    fn recenter_on(&mut self, target: Vec3) {
        for point in &mut self.universe.points {
            point.position -= target;
        }
        if let Some(realm) = &mut self.galaxy {
            for point in &mut realm.field.points {
                point.position -= target;
            }
            for point in &mut realm.field.nebula {
                point.position -= target;
            }
            realm.field.central.position -= target;
        }
        if let Some(realm) = &mut self.system {
            for body in &mut realm.system.bodies {
                body.position -= target;
            }
        }
        if let Some(selected) = &mut self.selected {
            selected.position -= target;
        }
        self.scale.world_offset += target;
        self.camera_focus = Vec3::ZERO;
        tracing::debug!(
            ?target,
            offset = ?self.scale.world_offset,
            "world re-centered"
        );
    }

    /// Write the active realm's advanced age back to the catalog
    fn stash_galaxy_age(&mut self) {
        if let Some(realm) = &self.galaxy {
            if let Some(entry) = self.galaxy_catalog.get_mut(&realm.source) {
                entry.age_gyr = realm.info.age_gyr;
            }
        }
    }
}

/// Resolve a raw pick index into a point handle
///
/// The range check runs on the full-width index before the narrowing
/// cast, so an index wider than the handle type cannot wrap into a
/// valid low handle.
fn point_handle(index: usize, count: usize, context: &'static str) -> Result<PointId> {
    match u32::try_from(index) {
        Ok(raw) if index < count => Ok(PointId(raw)),
        _ => Err(SandboxError::TargetOutOfRange {
            index,
            count,
            context,
        }),
    }
}
