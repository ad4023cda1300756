use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::trace;

use crate::camera::Camera;
use crate::error::RenderError;
use crate::framebuffer::{BLUE, Framebuffer, GREEN, RED, Rgba, WHITE, YELLOW, pack_rgba, shade};
use crate::map::TileGrid;
use crate::vector::{Vec2f, Vec2i};

/// Per-channel darkening applied to walls hit on their Y face.
pub const SIDE_SHADE: u8 = 40;

pub const CEILING_COLOR: Rgba = pack_rgba(30, 30, 70);
pub const FLOOR_COLOR: Rgba = pack_rgba(40, 40, 40);

/// Axis of the last DDA step before the hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    X,
    Y,
}

impl Side {
    /// 0 for X, 1 for Y.
    #[inline]
    pub fn index(self) -> u8 {
        match self {
            Side::X => 0,
            Side::Y => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub cell: Vec2i,
    pub tile: u8,
    pub side: Side,
    /// Distance along the camera's forward axis, in units of the ray vector.
    pub perp_distance: f32,
    /// DDA iterations taken.
    pub steps: usize,
}

/// Vertical wall span of one column: wall in `[y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallSlice {
    pub y0: usize,
    pub y1: usize,
    pub color: Rgba,
}

#[inline]
pub fn wall_color(tile: u8) -> Rgba {
    match tile {
        1 => RED,
        2 => GREEN,
        3 => BLUE,
        4 => WHITE,
        _ => YELLOW,
    }
}

/// Ray through screen column `x` of `width`: `direction + plane * cam_x`,
/// with `cam_x` running over [-1, 1).
#[inline]
pub fn column_ray(camera: &Camera, x: usize, width: usize) -> Vec2f {
    let cam_x = 2.0 * (x as f32 / width as f32) - 1.0;
    camera.direction + camera.plane * cam_x
}

/// DDA traversal from `origin` along `ray` until the first nonzero tile.
///
/// A zero ray component gives an infinite delta distance (IEEE `1/0`), so that
/// axis is never chosen. Leaving the grid is an error: only enclosed grids
/// guarantee termination.
pub fn cast_ray(grid: &TileGrid, origin: Vec2f, ray: Vec2f) -> Result<RayHit, RenderError> {
    let mut cell = origin.floor_to_vec2i();
    if grid.tile_at(cell.x, cell.y).is_none() {
        return Err(RenderError::GridTraversal { column: 0, cell });
    }

    let delta = Vec2f::new((1.0 / ray.x).abs(), (1.0 / ray.y).abs());

    let (step_x, mut side_x) = if ray.x < 0.0 {
        (-1, (origin.x - cell.x as f32) * delta.x)
    } else {
        (1, (cell.x as f32 + 1.0 - origin.x) * delta.x)
    };
    let (step_y, mut side_y) = if ray.y < 0.0 {
        (-1, (origin.y - cell.y as f32) * delta.y)
    } else {
        (1, (cell.y as f32 + 1.0 - origin.y) * delta.y)
    };

    let mut steps = 0;
    loop {
        let side = if side_x < side_y {
            side_x += delta.x;
            cell.x += step_x;
            Side::X
        } else {
            side_y += delta.y;
            cell.y += step_y;
            Side::Y
        };
        steps += 1;

        match grid.tile_at(cell.x, cell.y) {
            None => return Err(RenderError::GridTraversal { column: 0, cell }),
            Some(0) => continue,
            Some(tile) => {
                // Pre-increment side distance, which keeps the view fisheye free.
                let perp_distance = match side {
                    Side::X => side_x - delta.x,
                    Side::Y => side_y - delta.y,
                };
                return Ok(RayHit {
                    cell,
                    tile,
                    side,
                    perp_distance,
                    steps,
                });
            }
        }
    }
}

/// Projects a hit onto a screen of `height` rows.
pub fn project_column(hit: &RayHit, height: usize) -> Result<WallSlice, RenderError> {
    let distance = hit.perp_distance;
    if !(distance > 0.0 && distance.is_finite()) {
        return Err(RenderError::DegenerateProjection {
            column: 0,
            distance,
        });
    }

    // Float to int casts saturate, so a tiny distance just fills the column.
    let line_height = (height as f32 / distance).floor() as i64;
    let center = (height / 2) as i64;
    let y0 = (center - line_height / 2).max(0);
    // Zero rows leave an empty span at the top.
    let y1 = (center + line_height / 2).min(height as i64 - 1).max(y0);

    let mut color = wall_color(hit.tile);
    if hit.side == Side::Y {
        color = shade(color, SIDE_SHADE);
    }

    Ok(WallSlice {
        y0: y0 as usize,
        y1: y1 as usize,
        color,
    })
}

fn cast_column(
    grid: &TileGrid,
    camera: &Camera,
    x: usize,
    width: usize,
    height: usize,
) -> Result<WallSlice, RenderError> {
    let ray = column_ray(camera, x, width);
    let hit = cast_ray(grid, camera.position, ray).map_err(|e| e.at_column(x))?;
    project_column(&hit, height).map_err(|e| e.at_column(x))
}

/// Renders the first-person view of `grid` into `fb`.
///
/// Columns are traced in parallel against read-only inputs, then written one
/// by one, each touching only its own pixels. On error nothing is written.
pub fn render_scene(
    fb: &mut Framebuffer,
    grid: &TileGrid,
    camera: &Camera,
) -> Result<(), RenderError> {
    let (width, height) = (fb.width(), fb.height());
    if width == 0 || height == 0 {
        return Ok(());
    }

    let slices: Vec<WallSlice> = (0..width)
        .into_par_iter()
        .map(|x| cast_column(grid, camera, x, width, height))
        .collect::<Result<_, _>>()?;

    for (x, slice) in slices.iter().enumerate() {
        fb.v_line(x, 0, slice.y0, CEILING_COLOR);
        fb.v_line(x, slice.y0, slice.y1, slice.color);
        fb.v_line(x, slice.y1, height, FLOOR_COLOR);
    }
    trace!(columns = width, "rendered scene");
    Ok(())
}
