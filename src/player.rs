use std::f32::consts::{FRAC_PI_4, TAU};

use crate::input::{Action, InputSource};
use crate::world::Grid;

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,     // position in grid units
    pub y: f32,
    pub angle: f32, // heading in radians, kept in [0, 2π)
    pub fov: f32,   // horizontal field of view in radians
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Speeds {
    pub linear: f32,  // grid units per frame
    pub angular: f32, // radians per frame
}

impl Default for Speeds {
    fn default() -> Self {
        Self {
            linear: 0.025,
            angular: 0.025,
        }
    }
}

impl Player {
    pub fn new(x: f32, y: f32, angle: f32) -> Self {
        Self {
            x,
            y,
            angle: wrap_angle(angle),
            fov: FRAC_PI_4,
        }
    }

    #[inline]
    pub fn direction(&self) -> [f32; 2] {
        [self.angle.cos(), self.angle.sin()]
    }

    #[inline]
    pub fn cell(&self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }

    pub fn is_touching_wall(&self, grid: &Grid) -> bool {
        grid.is_wall_at(self.x, self.y)
    }

    /// One frame of movement. The move is applied tentatively and fully undone
    /// (both axes) if the player ends up in a wall; turning is never undone.
    pub fn update(&mut self, input: &impl InputSource, grid: &Grid, speeds: Speeds) {
        let (old_x, old_y) = (self.x, self.y);
        let [dx, dy] = self.direction();

        if input.is_held(Action::Forward) {
            self.x += dx * speeds.linear;
            self.y += dy * speeds.linear;
        }
        if input.is_held(Action::Back) {
            self.x -= dx * speeds.linear;
            self.y -= dy * speeds.linear;
        }
        if input.is_held(Action::TurnLeft) {
            self.angle -= speeds.angular;
        }
        if input.is_held(Action::TurnRight) {
            self.angle += speeds.angular;
        }
        self.angle = wrap_angle(self.angle);

        if self.is_touching_wall(grid) {
            self.x = old_x;
            self.y = old_y;
        }
    }
}

/// Maps any angle into [0, 2π).
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU { 0.0 } else { a }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::world::{Cell, Grid};

    fn held(actions: &[Action]) -> HashSet<Action> {
        actions.iter().copied().collect()
    }

    #[test]
    fn forward_moves_along_heading() {
        let grid = Grid::filled(5, 5, Cell::Open);
        let mut player = Player::new(2.5, 2.5, 0.0);
        player.update(&held(&[Action::Forward]), &grid, Speeds::default());
        assert!((player.x - 2.525).abs() < 1e-5);
        assert!((player.y - 2.5).abs() < 1e-5);

        player.update(&held(&[Action::Back]), &grid, Speeds::default());
        assert!((player.x - 2.5).abs() < 1e-5);
    }

    #[test]
    fn blocked_move_reverts_position_but_keeps_turn() {
        let grid = Grid::fixed_demo();
        // Facing the west border from just inside cell (1, 1)
        let mut player = Player::new(1.01, 1.5, std::f32::consts::PI);
        let before = (player.x, player.y);
        let speeds = Speeds::default();

        player.update(&held(&[Action::Forward, Action::TurnRight]), &grid, speeds);
        assert_eq!((player.x, player.y), before);
        assert!((player.angle - (std::f32::consts::PI + speeds.angular)).abs() < 1e-5);
    }

    #[test]
    fn diagonal_into_corner_blocks_both_axes() {
        let grid = Grid::fixed_demo();
        // Near the north-west corner of (1, 1), heading up-left. Moving in x
        // alone would be legal, but the combined move lands in a wall.
        let mut player = Player::new(1.5, 1.01, 1.25 * std::f32::consts::PI);
        player.update(&held(&[Action::Forward]), &grid, Speeds::default());
        assert_eq!((player.x, player.y), (1.5, 1.01));
    }

    #[test]
    fn out_of_bounds_counts_as_wall() {
        let grid = Grid::filled(2, 2, Cell::Open);
        let mut player = Player::new(1.99, 1.0, 0.0);
        player.update(&held(&[Action::Forward]), &grid, Speeds::default());
        assert_eq!(player.x, 1.99);
    }

    #[test]
    fn no_input_is_a_no_op() {
        let grid = Grid::fixed_demo();
        let mut player = Player::new(1.0, 1.0, 1.0);
        player.update(&held(&[]), &grid, Speeds::default());
        assert_eq!((player.x, player.y, player.angle), (1.0, 1.0, 1.0));
    }

    #[test]
    fn wrap_angle_edges() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert_eq!(wrap_angle(TAU), 0.0);
        assert!((wrap_angle(-0.025) - (TAU - 0.025)).abs() < 1e-5);
        assert!(wrap_angle(-1e-9) < TAU);
    }

    fn action_strategy() -> impl Strategy<Value = Vec<Action>> {
        prop::collection::vec(prop::sample::select(Action::ALL.to_vec()), 0..4)
    }

    proptest! {
        #[test]
        fn heading_stays_in_range(
            start in -20.0f32..20.0,
            frames in prop::collection::vec(action_strategy(), 1..300),
        ) {
            let grid = Grid::fixed_demo();
            let mut player = Player::new(1.5, 1.5, start);
            prop_assert!((0.0..TAU).contains(&player.angle));
            for actions in frames {
                player.update(&held(&actions), &grid, Speeds::default());
                prop_assert!((0.0..TAU).contains(&player.angle), "angle {}", player.angle);
                prop_assert!(!grid.is_wall_at(player.x, player.y));
            }
        }
    }
}
