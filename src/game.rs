use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, trace_span, warn};

use crate::canvas::Canvas;
use crate::config::{ConfigError, EngineConfig, MapSource};
use crate::input::InputSource;
use crate::maze;
use crate::player::{Player, Speeds};
use crate::raycast::{self, RayParams};
use crate::renderer;
use crate::world::Grid;

/// Everything one running demo owns. The window layer feeds it input and
/// presents its canvas.
pub struct Game {
    config: EngineConfig,
    grid: Grid,
    player: Player,
    ray_params: RayParams,
    speeds: Speeds,
    canvas: Canvas,
}

/// Builds the map the config asks for. Maze maps always use a seeded RNG; a
/// missing seed is drawn at random and logged so the run can be reproduced.
pub fn build_grid(config: &EngineConfig) -> Result<Grid, ConfigError> {
    match config.map {
        MapSource::Fixed => Ok(Grid::fixed_demo()),
        MapSource::Maze {
            width,
            height,
            extra_rooms,
        } => {
            let seed = config.seed.unwrap_or_else(rand::random);
            info!(seed, width, height, extra_rooms, "generating maze");
            let mut rng = StdRng::seed_from_u64(seed);
            Ok(maze::generate(width, height, extra_rooms, &mut rng)?)
        }
    }
}

impl Game {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = build_grid(&config)?;
        Ok(Self::with_grid(config, grid))
    }

    pub fn with_grid(config: EngineConfig, grid: Grid) -> Self {
        let spawn = config.spawn;
        let mut player = Player::new(spawn.x, spawn.y, spawn.angle);
        player.fov = config.fov;
        if player.is_touching_wall(&grid) {
            warn!(x = spawn.x, y = spawn.y, "spawn point is inside a wall");
        }
        info!(
            width = grid.width(),
            height = grid.height(),
            open = grid.open_cells(),
            minimap = config.minimap.is_some(),
            "map ready"
        );

        Self {
            ray_params: config.ray_params(),
            speeds: config.speeds(),
            canvas: Canvas::new(config.screen_width, config.screen_height),
            config,
            grid,
            player,
        }
    }

    /// One frame: clear, move the player if the window has focus, draw.
    pub fn frame(&mut self, input: &impl InputSource, focused: bool) {
        let _span = trace_span!("frame").entered();

        self.canvas.clear(0);

        if focused {
            self.player.update(input, &self.grid, self.speeds);
        }

        let hits = raycast::cast_fan(&self.grid, &self.player, self.config.rays, &self.ray_params);
        renderer::render_view(&mut self.canvas, &hits, self.config.dither_size);

        if let Some(minimap) = &self.config.minimap {
            renderer::draw_minimap(&mut self.canvas, &self.grid, &self.player, minimap);
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[cfg(test)]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[cfg(test)]
    pub fn player(&self) -> &Player {
        &self.player
    }
}
