use crate::engine::{
    SCENE_ALIGN_SEPARATE, SCENE_CROWD, SCENE_FLOWFIELD, SCENE_PATH, SCENE_PATH_SIMPLE,
    SCENE_SEEK, SCENE_SEPARATION_SEEK, SCENE_WALLS,
};
use crate::error::{ConfigError, EngineError, EngineResult};
use crate::math::SpeedClamp;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;

pub const DEFAULT_TRAIL_LENGTH: usize = 100;

/// Closed interval a per-vehicle motion limit is drawn from. `min == max`
/// gives every vehicle the same value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: f64,
    pub max: f64,
}

impl SpeedRange {
    pub fn fixed(value: f64) -> Self {
        Self { min: value, max: value }
    }

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        self.min + rng.gen_range(0.0..1.0) * (self.max - self.min)
    }
}

/// Everything needed to build a scene. Missing fields take the defaults of
/// the `seek` scene, so use [`SceneConfig::for_scene`] as the starting point
/// for anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub scene: String,
    /// Drives spawning, waypoints and the noise field; random when `None`.
    pub seed: Option<u64>,
    pub vehicles: usize,
    pub extent: [f64; 3],
    /// Flow field cell size.
    pub resolution: f64,
    pub path_points: usize,
    pub path_radius: f64,
    pub max_speed: SpeedRange,
    pub max_force: SpeedRange,
    pub separation_radius: f64,
    pub trail_length: Option<usize>,
    pub speed_clamp: SpeedClamp,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scene: SCENE_SEEK.to_string(),
            seed: None,
            vehicles: 1,
            extent: [30.0; 3],
            resolution: 5.0,
            path_points: 6,
            path_radius: 2.0,
            max_speed: SpeedRange::fixed(0.3),
            max_force: SpeedRange::fixed(0.004),
            separation_radius: crate::DEFAULT_RADIUS,
            trail_length: Some(DEFAULT_TRAIL_LENGTH),
            speed_clamp: SpeedClamp::PerAxis,
        }
    }
}

impl SceneConfig {
    /// Defaults for one of the catalog scenes.
    pub fn for_scene(id: &str) -> EngineResult<Self> {
        let base = Self {
            scene: id.to_string(),
            ..Self::default()
        };
        let cfg = match id {
            SCENE_SEEK => base,
            SCENE_WALLS => Self {
                max_force: SpeedRange::fixed(0.005),
                ..base
            },
            SCENE_FLOWFIELD => Self {
                vehicles: 200,
                extent: [40.0; 3],
                max_speed: SpeedRange::new(0.2, 0.5),
                max_force: SpeedRange::new(0.0, 0.002),
                trail_length: None,
                ..base
            },
            SCENE_PATH_SIMPLE => Self {
                extent: [100.0, 20.0, 30.0],
                max_speed: SpeedRange::new(0.2, 0.5),
                max_force: SpeedRange::new(0.0, 0.01),
                ..base
            },
            SCENE_PATH => Self {
                vehicles: 10,
                extent: [100.0, 20.0, 30.0],
                max_speed: SpeedRange::new(0.2, 0.3),
                max_force: SpeedRange::fixed(0.005),
                ..base
            },
            SCENE_CROWD => Self {
                vehicles: 10,
                extent: [100.0, 20.0, 30.0],
                max_speed: SpeedRange::new(0.2, 0.3),
                max_force: SpeedRange::fixed(0.005),
                ..base
            },
            SCENE_SEPARATION_SEEK => Self {
                vehicles: 20,
                extent: [80.0, 60.0, 60.0],
                max_speed: SpeedRange::fixed(0.3),
                max_force: SpeedRange::fixed(0.005),
                ..base
            },
            SCENE_ALIGN_SEPARATE => Self {
                vehicles: 10,
                extent: [80.0, 60.0, 60.0],
                max_speed: SpeedRange::fixed(0.2),
                max_force: SpeedRange::fixed(0.005),
                trail_length: None,
                ..base
            },
            other => return Err(EngineError::UnknownScene(other.to_string())),
        };
        Ok(cfg)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn load<P: AsRef<FsPath>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    pub fn trail_len(&self) -> usize {
        self.trail_length.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene_catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn every_catalog_scene_has_defaults() {
        for info in scene_catalog() {
            let cfg = SceneConfig::for_scene(info.id).unwrap();
            assert_eq!(cfg.scene, info.id);
            assert!(cfg.vehicles > 0);
        }
        assert!(matches!(
            SceneConfig::for_scene("boids"),
            Err(EngineError::UnknownScene(_))
        ));
    }

    #[test]
    fn ron_round_trip_keeps_fields() {
        let cfg = SceneConfig::for_scene(SCENE_FLOWFIELD).unwrap();
        let text = cfg.to_ron_string().unwrap();
        assert_eq!(SceneConfig::from_ron_str(&text).unwrap(), cfg);
    }

    #[test]
    fn partial_ron_fills_defaults() {
        let cfg = SceneConfig::from_ron_str(r#"(scene: "path-following", vehicles: 3, seed: Some(9))"#)
            .unwrap();
        assert_eq!(cfg.vehicles, 3);
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.path_points, 6);
        assert_eq!(cfg.speed_clamp, SpeedClamp::PerAxis);
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        assert!(matches!(
            SceneConfig::from_ron_str("(vehicles: \"many\")"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn range_samples_stay_inside() {
        let mut rng = StdRng::seed_from_u64(1);
        let r = SpeedRange::new(0.2, 0.5);
        for _ in 0..100 {
            let s = r.sample(&mut rng);
            assert!((0.2..=0.5).contains(&s));
        }
        assert_eq!(SpeedRange::fixed(0.3).sample(&mut rng), 0.3);
    }
}
