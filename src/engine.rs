use crate::algorithms::{
    AlignSeparate, AlignSeparateParams, CrowdParams, CrowdPathFollowing, FlockMode, FlowFollowing,
    FlowParams, PathFollowing, PathParams, SeekParams, SeekTarget, SeparationAndSeek,
    SeparationSeekParams, SimplePathFollowing, StayWithinWalls, WallsParams,
};
use crate::config::SceneConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::spawn::{self, InitialVelocity};
use crate::path::{LinePath, Path};
use crate::sim::{SteeringField, Simulator, VehicleConfig, VehicleSnapshot};
use crate::steering::path_following::PathProbe;
use log::{debug, info};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SCENE_SEEK: &str = "seek";
pub const SCENE_WALLS: &str = "stay-within-walls";
pub const SCENE_FLOWFIELD: &str = "flowfield";
pub const SCENE_PATH_SIMPLE: &str = "path-following-simple";
pub const SCENE_PATH: &str = "path-following";
pub const SCENE_CROWD: &str = "crowd-path-following";
pub const SCENE_SEPARATION_SEEK: &str = "separation-and-seek";
pub const SCENE_ALIGN_SEPARATE: &str = "align-separate";

pub struct SceneInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Whether the scene reacts to [`Engine::set_target`].
    pub uses_target: bool,
}

pub fn scene_catalog() -> &'static [SceneInfo] {
    &[
        SceneInfo {
            id: SCENE_SEEK,
            name: "Seek",
            description: "One vehicle with a trail chases the pointer at unit speed.",
            uses_target: true,
        },
        SceneInfo {
            id: SCENE_WALLS,
            name: "Stay within walls",
            description: "One vehicle launched inside a 30 unit cube steers back at every wall.",
            uses_target: false,
        },
        SceneInfo {
            id: SCENE_FLOWFIELD,
            name: "Flow field",
            description: "200 vehicles drift along a 3D simplex-noise field in a periodic box.",
            uses_target: false,
        },
        SceneInfo {
            id: SCENE_PATH_SIMPLE,
            name: "Path following (segment)",
            description: "A vehicle laps along one straight segment, restarting past its end.",
            uses_target: false,
        },
        SceneInfo {
            id: SCENE_PATH,
            name: "Path following",
            description: "Ten vehicles lap along a random six point polyline.",
            uses_target: false,
        },
        SceneInfo {
            id: SCENE_CROWD,
            name: "Crowd path following",
            description: "Path following weighted against separation for a crowd.",
            uses_target: false,
        },
        SceneInfo {
            id: SCENE_SEPARATION_SEEK,
            name: "Separation and seek",
            description: "A swarm seeks the pointer while keeping apart, in a periodic box.",
            uses_target: true,
        },
        SceneInfo {
            id: SCENE_ALIGN_SEPARATE,
            name: "Align / separate",
            description: "Neighbour alignment or separation, chosen per step by the caller.",
            uses_target: false,
        },
    ]
}

enum SceneKind {
    Seek(SeekTarget),
    Walls(StayWithinWalls),
    Flow(FlowFollowing),
    PathSimple(SimplePathFollowing),
    Path(PathFollowing),
    Crowd(CrowdPathFollowing),
    SeparationSeek(SeparationAndSeek),
    AlignSeparate(AlignSeparate),
}

/// One running scene: the flock, its composed behaviour and a seeded rng for
/// anything regenerated later (waypoints, noise seeds).
pub struct Engine {
    scene_id: &'static str,
    config: SceneConfig,
    sim: Simulator,
    scene: SceneKind,
    rng: StdRng,
    seed: u64,
}

impl Engine {
    /// A catalog scene with its default configuration.
    pub fn new_builtin(scene_id: &str, seed: Option<u64>) -> EngineResult<Self> {
        let mut config = SceneConfig::for_scene(scene_id)?;
        config.seed = seed;
        Self::from_config(config)
    }

    pub fn from_config(config: SceneConfig) -> EngineResult<Self> {
        let scene_id = normalize_scene_id(&config.scene)
            .ok_or_else(|| EngineError::UnknownScene(config.scene.clone()))?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let (scene, vehicles) = build_scene(scene_id, &config, &mut rng)?;
        info!(
            "scene '{}' ready: {} vehicles, seed {}",
            scene_id,
            vehicles.len(),
            seed
        );
        Ok(Self {
            scene_id,
            config,
            sim: Simulator::new(&vehicles),
            scene,
            rng,
            seed,
        })
    }

    pub fn scene_id(&self) -> &'static str { self.scene_id }
    pub fn config(&self) -> &SceneConfig { &self.config }
    pub fn seed(&self) -> u64 { self.seed }
    pub fn len(&self) -> usize { self.sim.len() }
    pub fn is_empty(&self) -> bool { self.sim.is_empty() }
    pub fn steps(&self) -> u64 { self.sim.steps() }
    pub fn elapsed(&self) -> f64 { self.sim.elapsed() }
    pub fn simulator(&self) -> &Simulator { &self.sim }
    pub fn simulator_mut(&mut self) -> &mut Simulator { &mut self.sim }

    /// One unit step with the default mode.
    pub fn tick(&mut self) {
        self.tick_with(FlockMode::default());
    }

    /// One unit step. `mode` only matters for the align/separate scene.
    pub fn tick_with(&mut self, mode: FlockMode) {
        let sim = &mut self.sim;
        match &self.scene {
            SceneKind::Seek(algo) => step(sim, algo),
            SceneKind::Walls(algo) => step(sim, algo),
            SceneKind::Flow(algo) => step(sim, algo),
            SceneKind::PathSimple(algo) => step(sim, algo),
            SceneKind::Path(algo) => step(sim, algo),
            SceneKind::Crowd(algo) => step(sim, algo),
            SceneKind::SeparationSeek(algo) => step(sim, algo),
            SceneKind::AlignSeparate(algo) => step(sim, &algo.with_mode(mode)),
        }
    }

    /// Record a wall-clock frame delta (capped) and advance exactly one unit
    /// step. Returns the delta that was counted.
    pub fn frame(&mut self, delta: f64, mode: FlockMode) -> f64 {
        let counted = self.sim.advance_clock(delta);
        self.tick_with(mode);
        counted
    }

    /// Move the seek target. `None` means no intersection this frame.
    pub fn set_target(&mut self, target: Option<Vector3<f64>>) -> EngineResult<()> {
        match &mut self.scene {
            SceneKind::Seek(algo) => algo.set_target(target),
            SceneKind::SeparationSeek(algo) => algo.set_target(target),
            _ => return Err(mismatch(self.scene_id)),
        }
        Ok(())
    }

    pub fn target(&self) -> Option<&Vector3<f64>> {
        match &self.scene {
            SceneKind::Seek(algo) => algo.target(),
            SceneKind::SeparationSeek(algo) => algo.target(),
            _ => None,
        }
    }

    /// Fresh random waypoints for the polyline scenes.
    pub fn regenerate_path(&mut self) -> EngineResult<()> {
        let path = match &mut self.scene {
            SceneKind::Path(algo) => algo.path_mut(),
            SceneKind::Crowd(algo) => algo.path_mut(),
            _ => return Err(mismatch(self.scene_id)),
        };
        path.regenerate(&mut self.rng);
        debug!("scene '{}': path regenerated", self.scene_id);
        Ok(())
    }

    /// Rebuild the flow field, from `seed` or from the engine rng. Returns the
    /// seed used.
    pub fn rebuild_field(&mut self, seed: Option<u64>) -> EngineResult<u64> {
        let field = match &mut self.scene {
            SceneKind::Flow(algo) => algo.field_mut(),
            _ => return Err(mismatch(self.scene_id)),
        };
        let used = match seed {
            Some(s) => field.init(Some(s)),
            None => field.reseed(&mut self.rng),
        };
        debug!("scene '{}': flow field reseeded with {}", self.scene_id, used);
        Ok(used)
    }

    /// Every vehicle back to its start position.
    pub fn reset(&mut self) {
        self.sim.reset();
        debug!("scene '{}': vehicles reset", self.scene_id);
    }

    pub fn set_trails(&mut self, len: usize) {
        self.sim.set_trails(len);
    }

    pub fn set_seek_params(&mut self, params: SeekParams) -> EngineResult<()> {
        match &mut self.scene {
            SceneKind::Seek(algo) => {
                algo.params = params;
                Ok(())
            }
            _ => Err(mismatch(self.scene_id)),
        }
    }

    pub fn set_walls_params(&mut self, params: WallsParams) -> EngineResult<()> {
        match &mut self.scene {
            SceneKind::Walls(algo) => {
                algo.params = params;
                Ok(())
            }
            _ => Err(mismatch(self.scene_id)),
        }
    }

    pub fn set_crowd_params(&mut self, params: CrowdParams) -> EngineResult<()> {
        match &mut self.scene {
            SceneKind::Crowd(algo) => {
                algo.params = params;
                Ok(())
            }
            _ => Err(mismatch(self.scene_id)),
        }
    }

    /// Replaces weights and box. The current target is kept.
    pub fn set_separation_seek_params(&mut self, params: SeparationSeekParams) -> EngineResult<()> {
        match &mut self.scene {
            SceneKind::SeparationSeek(algo) => {
                let target = algo.target().copied();
                *algo = SeparationAndSeek::new(params);
                algo.set_target(target);
                Ok(())
            }
            _ => Err(mismatch(self.scene_id)),
        }
    }

    pub fn set_align_separate_params(&mut self, params: AlignSeparateParams) -> EngineResult<()> {
        match &mut self.scene {
            SceneKind::AlignSeparate(algo) => {
                *algo = AlignSeparate::new(params);
                Ok(())
            }
            _ => Err(mismatch(self.scene_id)),
        }
    }

    /// Polyline of the current path scene, or the segment's two endpoints.
    pub fn path_points_flat(&self) -> Vec<f32> {
        match &self.scene {
            SceneKind::Path(algo) => algo.path().points_flat(),
            SceneKind::Crowd(algo) => algo.path().points_flat(),
            SceneKind::PathSimple(algo) => {
                let p = algo.path();
                [p.start, p.end]
                    .iter()
                    .flat_map(|v| [v.x as f32, v.y as f32, v.z as f32])
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.scene {
            SceneKind::Path(algo) => Some(algo.path()),
            SceneKind::Crowd(algo) => Some(algo.path()),
            _ => None,
        }
    }

    pub fn line_path(&self) -> Option<&LinePath> {
        match &self.scene {
            SceneKind::PathSimple(algo) => Some(algo.path()),
            _ => None,
        }
    }

    /// Per-cell line buffer of the flow field; empty for other scenes.
    pub fn flow_vectors_flat(&self) -> Vec<f32> {
        match &self.scene {
            SceneKind::Flow(algo) => algo.field().vectors_flat(),
            _ => Vec::new(),
        }
    }

    /// Path-following debug state for every vehicle, computed from the
    /// current waypoints.
    pub fn path_probes(&self) -> Vec<PathProbe> {
        match self.path() {
            Some(path) => self.sim.vehicles().iter().map(|v| v.probe_path(path)).collect(),
            None => Vec::new(),
        }
    }

    pub fn positions_flat(&self) -> Vec<f32> { self.sim.positions_flat() }
    pub fn states_flat(&self) -> Vec<f32> { self.sim.states_flat() }
    pub fn trails_flat(&self) -> Vec<f32> { self.sim.trails_flat() }
    pub fn snapshots(&self) -> Vec<VehicleSnapshot> { self.sim.snapshots() }
}

#[cfg(feature = "parallel")]
fn step<F: SteeringField + ?Sized>(sim: &mut Simulator, field: &F) {
    sim.step_par_with_field(field);
}

#[cfg(not(feature = "parallel"))]
fn step<F: SteeringField + ?Sized>(sim: &mut Simulator, field: &F) {
    sim.step_with_field(field);
}

fn mismatch(scene: &str) -> EngineError {
    EngineError::ParamsMismatch {
        scene: scene.to_string(),
    }
}

fn normalize_scene_id(id: &str) -> Option<&'static str> {
    scene_catalog().iter().find(|s| s.id == id).map(|s| s.id)
}

fn build_scene(
    id: &'static str,
    config: &SceneConfig,
    rng: &mut StdRng,
) -> EngineResult<(SceneKind, Vec<VehicleConfig>)> {
    let extent = Vector3::from(config.extent);
    let path_params = PathParams {
        points: config.path_points,
        extent: config.extent,
        radius: config.path_radius,
    };
    let built = match id {
        SCENE_SEEK => (
            SceneKind::Seek(SeekTarget::new(SeekParams::default())),
            spawn::at_origin(config, InitialVelocity::Forward, rng),
        ),
        SCENE_WALLS => (
            SceneKind::Walls(StayWithinWalls::new(WallsParams {
                box_size: config.extent[0],
            })),
            spawn::at_origin(config, InitialVelocity::Launch, rng),
        ),
        SCENE_FLOWFIELD => {
            let params = FlowParams {
                extent: config.extent,
                resolution: config.resolution,
            };
            let algo = FlowFollowing::new(params, rng.gen_range(0..10_000_000))?;
            (
                SceneKind::Flow(algo),
                spawn::scattered(config, InitialVelocity::Rest, rng),
            )
        }
        SCENE_PATH_SIMPLE => {
            let mut line = LinePath::across(extent);
            line.radius = config.path_radius;
            let vehicles = spawn::at_path_start(config, &line.start, InitialVelocity::Forward, rng);
            (SceneKind::PathSimple(SimplePathFollowing::new(line)), vehicles)
        }
        SCENE_PATH => {
            let algo = PathFollowing::new(path_params, rng)?;
            let vehicles =
                spawn::at_path_start(config, algo.path().first(), InitialVelocity::Forward, rng);
            (SceneKind::Path(algo), vehicles)
        }
        SCENE_CROWD => {
            let path = path_params.build(rng)?;
            let vehicles = spawn::at_path_start(config, path.first(), InitialVelocity::Jitter, rng);
            (
                SceneKind::Crowd(CrowdPathFollowing::new(CrowdParams::default(), path)),
                vehicles,
            )
        }
        SCENE_SEPARATION_SEEK => {
            let params = SeparationSeekParams {
                extent: config.extent,
                ..SeparationSeekParams::default()
            };
            (
                SceneKind::SeparationSeek(SeparationAndSeek::new(params)),
                spawn::scattered(config, InitialVelocity::Jitter, rng),
            )
        }
        SCENE_ALIGN_SEPARATE => {
            let params = AlignSeparateParams {
                extent: config.extent,
                ..AlignSeparateParams::default()
            };
            (
                SceneKind::AlignSeparate(AlignSeparate::new(params)),
                spawn::scattered(config, InitialVelocity::Jitter, rng),
            )
        }
        other => return Err(EngineError::UnknownScene(other.to_string())),
    };
    Ok(built)
}
