//! Top-down debug view of a [`Map`] drawn straight into the pixel buffer.

use crate::camera::Camera;
use crate::framebuffer::{BLACK, BLUE, Framebuffer, RED, Rgba, WHITE};
use crate::map::Map;
use crate::vector::{Vec2f, Vec2i};

pub const PLAYER_RADIUS: f32 = 1.5;
pub const VERTEX_RADIUS: f32 = 1.0;
pub const LINE_COLOR: Rgba = WHITE;
pub const VERTEX_COLOR: Rgba = BLUE;
pub const PLAYER_COLOR: Rgba = RED;

/// Bresenham line from `p0` to `p1`.
///
/// Stepping stops at the first pixel outside the buffer. The endpoint is then
/// written on its own, and only if it is inside the buffer.
pub fn draw_line(fb: &mut Framebuffer, p0: Vec2i, p1: Vec2i, color: Rgba) {
    let dx = (p1.x - p0.x).abs();
    let dy = (p1.y - p0.y).abs();
    let sx = if p0.x < p1.x { 1 } else { -1 };
    let sy = if p0.y < p1.y { 1 } else { -1 };
    let mut err = dx - dy;

    let (mut x, mut y) = (p0.x, p0.y);
    while (x != p1.x || y != p1.y) && fb.in_bounds(x, y) {
        fb.set_pixel(x, y, color);

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
    fb.set_pixel(p1.x, p1.y, color);
}

/// Fills the square `[center - radius, center + radius)` clipped to the buffer.
pub fn draw_filled_square(fb: &mut Framebuffer, center: Vec2f, radius: f32, color: Rgba) {
    let (w, h) = (fb.width() as f32, fb.height() as f32);
    let x0 = (center.x - radius).clamp(0.0, w) as i32;
    let x1 = (center.x + radius).clamp(0.0, w) as i32;
    let y0 = (center.y - radius).clamp(0.0, h) as i32;
    let y1 = (center.y + radius).clamp(0.0, h) as i32;

    for y in y0..y1 {
        for x in x0..x1 {
            fb.set_pixel(x, y, color);
        }
    }
}

pub fn draw_map_lines(fb: &mut Framebuffer, map: &Map, color: Rgba) {
    for (a, b) in map.segments() {
        draw_line(fb, a, b, color);
    }
}

pub fn draw_vertices(fb: &mut Framebuffer, map: &Map, color: Rgba) {
    for v in map.vertices() {
        draw_filled_square(fb, v.to_vec2f(), VERTEX_RADIUS, color);
    }
}

/// Player square plus one heading pixel three units ahead.
pub fn draw_camera(fb: &mut Framebuffer, camera: &Camera, color: Rgba) {
    draw_filled_square(fb, camera.position, PLAYER_RADIUS, color);
    let tip = (camera.position + camera.direction * 3.0).to_vec2i();
    fb.set_pixel(tip.x, tip.y, WHITE);
}

pub fn render_overlay(fb: &mut Framebuffer, map: &Map, camera: &Camera) {
    fb.clear(BLACK);
    draw_map_lines(fb, map, LINE_COLOR);
    draw_vertices(fb, map, VERTEX_COLOR);
    draw_camera(fb, camera, PLAYER_COLOR);
}
