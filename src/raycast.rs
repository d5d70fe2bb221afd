use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::player::Player;
use crate::world::Grid;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayParams {
    pub step: f32,      // march increment in grid units
    pub max_steps: u32, // hard cap, bounds the search radius to step * max_steps
    pub projection: f32,
}

impl Default for RayParams {
    fn default() -> Self {
        Self {
            step: 0.1,
            max_steps: 400,
            projection: 300.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub wall_height: f32,
}

/// Fixed-step march from `origin` along `angle` until the point enters a wall
/// cell or the step cap is reached. Not an exact grid traversal: accuracy is
/// bounded by `params.step` and thin corners can be skipped at grazing angles.
pub fn cast_ray(grid: &Grid, origin: [f32; 2], angle: f32, params: &RayParams) -> RayHit {
    let dx = angle.cos() * params.step;
    let dy = angle.sin() * params.step;

    let [mut x, mut y] = origin;
    let mut steps = 0;
    while steps < params.max_steps && !grid.is_wall_at(x, y) {
        x += dx;
        y += dy;
        steps += 1;
    }

    let distance = ((x - origin[0]).powi(2) + (y - origin[1]).powi(2)).sqrt();
    // Starting inside a wall gives distance 0; floor the divisor at one step
    let wall_height = params.projection / distance.max(params.step);

    RayHit {
        distance,
        wall_height,
    }
}

/// Ray `i` of `rays` has angle `player.angle - fov/2 + i * fov/rays`.
#[inline]
pub fn ray_angle(player: &Player, i: usize, rays: usize) -> f32 {
    player.angle - player.fov * 0.5 + i as f32 * (player.fov / rays as f32)
}

/// Casts the whole field of view. Rays are independent, so they run in parallel.
pub fn cast_fan(grid: &Grid, player: &Player, rays: usize, params: &RayParams) -> Vec<RayHit> {
    let origin = [player.x, player.y];
    (0..rays)
        .into_par_iter()
        .map(|i| cast_ray(grid, origin, ray_angle(player, i, rays), params))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    use super::*;
    use crate::world::Cell;

    fn assert_close(actual: f32, expected: f32, tol: f32) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected} +/- {tol}, got {actual}"
        );
    }

    #[test]
    fn distance_to_grid_aligned_wall() {
        let grid = Grid::fixed_demo();
        let params = RayParams::default();
        let tol = params.step + 1e-3;

        // Row 1 is open from x = 1 through x = 7; x = 8 is the border.
        let hit = cast_ray(&grid, [1.5, 1.5], 0.0, &params);
        assert_close(hit.distance, 6.5, tol);

        // Column 1 is open from y = 1 through y = 8.
        let hit = cast_ray(&grid, [1.5, 1.5], FRAC_PI_2, &params);
        assert_close(hit.distance, 7.5, tol);

        // Straight back into the west border.
        let hit = cast_ray(&grid, [1.5, 1.5], PI, &params);
        assert_close(hit.distance, 0.5, tol);
    }

    #[test]
    fn fixed_map_from_spawn_facing_east() {
        let grid = Grid::fixed_demo();
        let params = RayParams::default();
        let hit = cast_ray(&grid, [1.0, 1.0], 0.0, &params);
        assert!(hit.distance.is_finite());
        assert!(hit.distance > 0.0 && hit.distance <= 8.0);
        assert_close(hit.wall_height, 300.0 / hit.distance, 1e-3);
    }

    #[test]
    fn step_cap_bounds_search_radius() {
        let grid = Grid::filled(100, 100, Cell::Open);
        let params = RayParams::default();
        let hit = cast_ray(&grid, [50.0, 50.0], FRAC_PI_4 / 3.0, &params);
        let cap = params.step * params.max_steps as f32;
        assert_close(hit.distance, cap, params.step + 1e-3);

        let mut prev = 0.0;
        for max_steps in [10, 100, 200, 400, 800] {
            let params = RayParams {
                max_steps,
                ..params
            };
            let d = cast_ray(&grid, [50.0, 50.0], 0.3, &params).distance;
            assert!(d >= prev);
            prev = d;
        }
    }

    #[test]
    fn open_map_without_border_terminates() {
        let grid = Grid::filled(5, 5, Cell::Open);
        let hit = cast_ray(&grid, [2.5, 2.5], 0.0, &RayParams::default());
        assert_close(hit.distance, 2.5, 0.101);
    }

    #[test]
    fn origin_inside_wall_has_finite_height() {
        let grid = Grid::fixed_demo();
        let params = RayParams::default();
        let hit = cast_ray(&grid, [0.5, 0.5], 1.0, &params);
        assert_eq!(hit.distance, 0.0);
        assert!(hit.wall_height.is_finite());
        assert_close(hit.wall_height, params.projection / params.step, 1e-2);
    }

    #[test]
    fn fan_spans_field_of_view() {
        let grid = Grid::fixed_demo();
        let player = Player::new(1.5, 1.5, FRAC_PI_4);
        let hits = cast_fan(&grid, &player, 200, &RayParams::default());
        assert_eq!(hits.len(), 200);
        assert_close(ray_angle(&player, 0, 200), player.angle - player.fov / 2.0, 1e-6);
        assert!(ray_angle(&player, 199, 200) < player.angle + player.fov / 2.0);
        assert!(hits.iter().all(|h| h.distance > 0.0 && h.wall_height > 0.0));
    }
}
