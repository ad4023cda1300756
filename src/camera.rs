use crate::vector::Vec2f;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec2f,  // (x, y) in map space
    pub direction: Vec2f, // unit heading
    pub plane: Vec2f,     // view plane, perpendicular to direction; length is tan(fov / 2)
}

impl Camera {
    /// Camera at `position` looking along `direction` with a horizontal field
    /// of view of `fov_deg` degrees. A zero direction falls back to +X.
    pub fn new(position: Vec2f, direction: Vec2f, fov_deg: f32) -> Self {
        let direction = direction.normalize().unwrap_or(Vec2f::new(1.0, 0.0));
        let half = (0.5 * fov_deg.to_radians()).tan();
        // With y growing downward this puts the left screen edge on the viewer's left.
        let plane = Vec2f::new(-direction.y, direction.x) * half;
        Self {
            position,
            direction,
            plane,
        }
    }

    /// Rotates direction and view plane together, keeping the field of view.
    #[inline]
    pub fn rotate(&mut self, angle: f32) {
        self.direction = self.direction.rotated(angle);
        self.plane = self.plane.rotated(angle);
    }

    /// Moves along the heading; negative `distance` moves backward.
    #[inline]
    pub fn move_by(&mut self, distance: f32) {
        self.position = self.position + self.direction * distance;
    }
}
