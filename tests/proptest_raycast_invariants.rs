//! Property-based invariant tests for the DDA ray caster and camera.
//!
//! 1. Rays from any empty cell of an enclosed grid hit a wall within
//!    `width + height` steps
//! 2. The perpendicular distance lands exactly on the hit cell's face and
//!    equals the distance a brute-force small-step marcher finds
//! 3. Rotation round trips and keeps the field of view

use proptest::prelude::*;
use wadcaster::camera::Camera;
use wadcaster::map::TileGrid;
use wadcaster::raycaster::{Side, cast_ray, column_ray};
use wadcaster::vector::{Vec2f, Vec2i};

// ── Strategies ──────────────────────────────────────────────────────────

fn empty_cells(grid: &TileGrid) -> Vec<Vec2i> {
    let mut out = Vec::new();
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            if grid.tile_at(x, y) == Some(0) {
                out.push(Vec2i::new(x, y));
            }
        }
    }
    out
}

fn origin_strategy(grid: &TileGrid) -> impl Strategy<Value = Vec2f> {
    (prop::sample::select(empty_cells(grid)), 0.05f32..0.95, 0.05f32..0.95)
        .prop_map(|(cell, fx, fy)| Vec2f::new(cell.x as f32 + fx, cell.y as f32 + fy))
}

fn angle_strategy() -> impl Strategy<Value = f32> {
    -std::f32::consts::PI..std::f32::consts::PI
}

/// Parameter `t` of the first sample along `origin + ray * t` that is inside a
/// wall, marching in steps of `dt` up to `limit`.
fn march(grid: &TileGrid, origin: Vec2f, ray: Vec2f, dt: f32, limit: f32) -> Option<f32> {
    let mut i = 0u32;
    loop {
        let t = i as f32 * dt;
        if t > limit {
            return None;
        }
        let cell = (origin + ray * t).floor_to_vec2i();
        if grid.tile_at(cell.x, cell.y) != Some(0) {
            return Some(t);
        }
        i += 1;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Termination inside enclosed grids
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn enclosed_grid_always_terminates(
        origin in origin_strategy(&TileGrid::demo()),
        angle in angle_strategy(),
        scale in 0.25f32..4.0,
    ) {
        let grid = TileGrid::demo();
        let ray = Vec2f::new(angle.cos(), angle.sin()) * scale;
        let hit = cast_ray(&grid, origin, ray).unwrap();

        prop_assert!(hit.steps <= grid.width() + grid.height(), "took {} steps", hit.steps);
        prop_assert!(hit.side.index() <= 1);
        prop_assert_ne!(hit.tile, 0);
        prop_assert_eq!(grid.tile_at(hit.cell.x, hit.cell.y), Some(hit.tile));
        prop_assert!(hit.perp_distance > 0.0);
    }

    #[test]
    fn axis_aligned_rays_terminate(
        origin in origin_strategy(&TileGrid::enclosed(8, 8, 1)),
        axis in 0usize..4,
    ) {
        let grid = TileGrid::enclosed(8, 8, 1);
        let ray = [
            Vec2f::new(1.0, 0.0),
            Vec2f::new(-1.0, 0.0),
            Vec2f::new(0.0, 1.0),
            Vec2f::new(0.0, -1.0),
        ][axis];
        let hit = cast_ray(&grid, origin, ray).unwrap();
        let expected_side = if axis < 2 { Side::X } else { Side::Y };
        prop_assert_eq!(hit.side, expected_side);
        prop_assert!(hit.steps <= 16);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Fisheye-free perpendicular distance
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn perp_distance_matches_marched_hit(
        origin in origin_strategy(&TileGrid::demo()),
        heading in angle_strategy(),
        x in 0usize..64,
    ) {
        let grid = TileGrid::demo();
        let camera = Camera::new(origin, Vec2f::new(heading.cos(), heading.sin()), 66.0);
        let ray = column_ray(&camera, x, 64);
        let hit = cast_ray(&grid, origin, ray).unwrap();
        let perp = hit.perp_distance;

        // The hit point sits on the face of the hit cell that was crossed.
        let p = origin + ray * perp;
        let eps = 1e-3;
        let (cx, cy) = (hit.cell.x as f32, hit.cell.y as f32);
        match hit.side {
            Side::X => {
                let face = if ray.x > 0.0 { cx } else { cx + 1.0 };
                prop_assert!((p.x - face).abs() < eps, "p {:?} face x {}", p, face);
                prop_assert!(p.y > cy - eps && p.y < cy + 1.0 + eps);
            }
            Side::Y => {
                let face = if ray.y > 0.0 { cy } else { cy + 1.0 };
                prop_assert!((p.y - face).abs() < eps, "p {:?} face y {}", p, face);
                prop_assert!(p.x > cx - eps && p.x < cx + 1.0 + eps);
            }
        }

        // A brute-force marcher along the same ray meets the first wall at `perp`.
        let dt = 1e-3;
        let first_wall = march(&grid, origin, ray, dt, perp + 64.0);
        prop_assert!(first_wall.is_some());
        let first_wall = first_wall.unwrap_or_default();
        prop_assert!((first_wall - perp).abs() <= 2.0 * dt, "marched {} dda {}", first_wall, perp);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Camera rotation
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn rotate_then_unrotate_restores(
        heading in angle_strategy(),
        angle in -10.0f32..10.0,
        fov in 10.0f32..170.0,
    ) {
        let heading = Vec2f::new(heading.cos(), heading.sin());
        let mut camera = Camera::new(Vec2f::new(4.0, 4.0), heading, fov);
        let original = camera;
        camera.rotate(angle);
        camera.rotate(-angle);

        let tol = 1e-4 * (1.0 + original.plane.length());
        prop_assert!((camera.direction - original.direction).length() < tol);
        prop_assert!((camera.plane - original.plane).length() < tol);
    }

    #[test]
    fn rotation_keeps_plane_length(
        heading in angle_strategy(),
        angles in prop::collection::vec(-1.0f32..1.0, 1..50),
    ) {
        let mut camera = Camera::new(Vec2f::ZERO, Vec2f::new(heading.cos(), heading.sin()), 66.0);
        let length = camera.plane.length();
        for a in angles {
            camera.rotate(a);
        }
        prop_assert!((camera.plane.length() - length).abs() < 1e-4);
        prop_assert!(camera.direction.dot(camera.plane).abs() < 1e-4);
    }
}
