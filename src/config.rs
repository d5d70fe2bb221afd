use std::f32::consts::FRAC_PI_4;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::maze::{self, MazeError};
use crate::player::Speeds;
use crate::raycast::RayParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Maze(#[from] MazeError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapSource {
    /// The hand-authored 9x10 map.
    Fixed,
    /// Randomized depth-first maze plus extra open rooms.
    Maze {
        width: usize,
        height: usize,
        extra_rooms: usize,
    },
}

impl Default for MapSource {
    fn default() -> Self {
        MapSource::Maze {
            width: 21,
            height: 21,
            extra_rooms: 10,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    pub size: f32,            // square side in pixels
    pub offset: [f32; 2],     // top-left corner on the canvas
    pub visible_cells: usize, // cells shown around the player on each axis
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            size: 100.0,
            offset: [0.0, 500.0],
            visible_cells: 7,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spawn {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
}

impl Default for Spawn {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            angle: 1.0,
        }
    }
}

/// One engine covers every demo: the map strategy and the mini-map overlay are
/// plain settings. Loaded from RON; any field left out keeps its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub screen_width: usize,
    pub screen_height: usize,
    pub rays: usize,
    pub fov: f32,
    pub move_speed: f32,
    pub turn_speed: f32,
    pub ray_step: f32,
    pub max_steps: u32,
    pub projection: f32,
    pub dither_size: usize,
    pub spawn: Spawn,
    pub map: MapSource,
    pub minimap: Option<MinimapConfig>,
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            rays: 200,
            fov: FRAC_PI_4,
            move_speed: 0.025,
            turn_speed: 0.025,
            ray_step: 0.1,
            max_steps: 400,
            projection: 300.0,
            dither_size: 8,
            spawn: Spawn::default(),
            map: MapSource::default(),
            minimap: Some(MinimapConfig::default()),
            seed: None,
        }
    }
}

/// The three demos, in order of features added.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Hand-authored map.
    Fixed,
    /// Generated maze.
    Maze,
    /// Generated maze with a mini-map overlay.
    MazeMinimap,
}

impl EngineConfig {
    pub fn preset(preset: Preset) -> Self {
        let base = Self::default();
        match preset {
            Preset::Fixed => Self {
                map: MapSource::Fixed,
                minimap: None,
                ..base
            },
            Preset::Maze => Self {
                minimap: None,
                ..base
            },
            Preset::MazeMinimap => base,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.screen_width == 0 || self.screen_height == 0 {
            return invalid("screen size must be non-zero");
        }
        if self.rays == 0 {
            return invalid("rays must be at least 1");
        }
        let floats = [
            self.fov,
            self.move_speed,
            self.turn_speed,
            self.ray_step,
            self.projection,
            self.spawn.x,
            self.spawn.y,
            self.spawn.angle,
        ];
        if !floats.iter().all(|v| v.is_finite()) {
            return invalid("numeric settings must be finite");
        }
        if self.fov <= 0.0 {
            return invalid("fov must be positive");
        }
        if self.ray_step <= 0.0 {
            return invalid("ray_step must be positive");
        }
        if self.projection <= 0.0 {
            return invalid("projection must be positive");
        }
        if self.move_speed < 0.0 || self.turn_speed < 0.0 {
            return invalid("speeds must not be negative");
        }
        if self.dither_size == 0 {
            return invalid("dither_size must be at least 1");
        }
        if let Some(minimap) = &self.minimap {
            let finite = minimap.size.is_finite() && minimap.offset.iter().all(|v| v.is_finite());
            if !finite || minimap.visible_cells == 0 || minimap.size <= 0.0 {
                return invalid("minimap needs a positive size and at least one visible cell");
            }
        }
        if let MapSource::Maze { width, height, .. } = self.map {
            maze::check_dimensions(width, height)?;
        }
        Ok(())
    }

    pub fn ray_params(&self) -> RayParams {
        RayParams {
            step: self.ray_step,
            max_steps: self.max_steps,
            projection: self.projection,
        }
    }

    pub fn speeds(&self) -> Speeds {
        Speeds {
            linear: self.move_speed,
            angular: self.turn_speed,
        }
    }
}
