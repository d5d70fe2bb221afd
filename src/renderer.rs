use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle};

use crate::canvas::{Canvas, pack_rgb, to_rgb888};
use crate::config::MinimapConfig;
use crate::player::Player;
use crate::raycast::RayHit;
use crate::world::Grid;

pub const SKY: u32 = pack_rgb(20, 0, 20);
pub const GROUND: u32 = pack_rgb(60, 0, 60);
pub const MINIMAP_WALL: u32 = pack_rgb(150, 0, 150);
pub const MINIMAP_OPEN: u32 = pack_rgb(0, 0, 0);
pub const MARKER: u32 = pack_rgb(200, 200, 200);

const WALL_BASE: f32 = 180.0;
const DITHER_BOOST: f32 = 10.0;
const HEADING_LENGTH: f32 = 2.0; // in cells

/// Wall brightness: darker with distance, `dither` adds a fixed boost.
#[inline]
pub fn shade(distance: f32, dither: bool) -> u8 {
    let base = if dither {
        WALL_BASE + DITHER_BOOST
    } else {
        WALL_BASE
    };
    let darkness = 1.0 + distance / 4.0;
    (base / darkness).floor().clamp(0.0, 255.0) as u8
}

/// Checkerboard of diagonal bands, `dither_size` pixels per period.
#[inline]
fn dithered(ray: usize, y: usize, dither_size: usize) -> bool {
    // (ray + y) % size < size / 2, kept exact for odd sizes
    ((ray + y) % dither_size) * 2 < dither_size
}

/// Sky, ground, then one vertical slice per ray hit.
pub fn render_view(canvas: &mut Canvas, hits: &[RayHit], dither_size: usize) {
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    let horizon = (canvas.height() / 2) as f32;

    canvas.fill_rect(0.0, 0.0, w, horizon, SKY);
    canvas.fill_rect(0.0, horizon, w, h - horizon, GROUND);

    if hits.is_empty() {
        return;
    }
    let slice_width = w / hits.len() as f32;
    for (i, hit) in hits.iter().enumerate() {
        draw_wall_slice(canvas, i, hit, slice_width, horizon, dither_size);
    }
}

fn draw_wall_slice(
    canvas: &mut Canvas,
    ray: usize,
    hit: &RayHit,
    slice_width: f32,
    horizon: f32,
    dither_size: usize,
) {
    // Rows floor(top) + j for j in 0..ceil(height), clipped to the canvas
    let top = (horizon - hit.wall_height * 0.5).floor() as i64;
    let rows = hit.wall_height.ceil() as i64;
    let y0 = top.max(0);
    let y1 = (top + rows).min(canvas.height() as i64);

    let x = ray as f32 * slice_width;
    for y in y0..y1 {
        let y = y as usize;
        let c = shade(hit.distance, dithered(ray, y, dither_size));
        canvas.fill_rect(x, y as f32, slice_width, 1.0, pack_rgb(c, 0, c));
    }
}

/// Window of cells around the player, a marker and a heading line.
pub fn draw_minimap(canvas: &mut Canvas, grid: &Grid, player: &Player, cfg: &MinimapConfig) {
    let (cell_x, cell_y) = player.cell();
    let before = (cfg.visible_cells / 2) as i64;
    let after = cfg.visible_cells.div_ceil(2) as i64;

    let x_start = (cell_x - before).max(0);
    let x_end = (cell_x + after).min(grid.width() as i64);
    let y_start = (cell_y - before).max(0);
    let y_end = (cell_y + after).min(grid.height() as i64);
    if x_end <= x_start || y_end <= y_start {
        return;
    }

    let scale_x = cfg.size / (x_end - x_start) as f32;
    let scale_y = cfg.size / (y_end - y_start) as f32;
    let [ox, oy] = cfg.offset;

    for y in y_start..y_end {
        for x in x_start..x_end {
            let color = if grid.is_wall(x, y) {
                MINIMAP_WALL
            } else {
                MINIMAP_OPEN
            };
            canvas.fill_rect(
                (x - x_start) as f32 * scale_x + ox,
                (y - y_start) as f32 * scale_y + oy,
                scale_x,
                scale_y,
                color,
            );
        }
    }

    let map_x = player.x - x_start as f32;
    let map_y = player.y - y_start as f32;
    let marker = pixel_point(map_x * scale_x + ox, map_y * scale_y + oy);
    let color = to_rgb888(MARKER);

    // Radius scale_x / 2
    let _ = Circle::with_center(marker, scale_x.round() as u32)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(canvas);

    let [dx, dy] = player.direction();
    let tip = pixel_point(
        (map_x + dx * HEADING_LENGTH) * scale_x + ox,
        (map_y + dy * HEADING_LENGTH) * scale_y + oy,
    );
    let _ = Line::new(marker, tip)
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(canvas);
}

#[inline]
fn pixel_point(x: f32, y: f32) -> Point {
    Point::new(x.floor() as i32, y.floor() as i32)
}
