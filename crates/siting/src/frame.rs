//! Mapping between the solver's site frame and the display frame.
//!
//! The solver works in local meters with x east, y north and z up. The display
//! is y-up. The two differ by a fixed rotation of -90° about x and nothing
//! else; meshes are placed by applying this once, never by per-call-site
//! rotations or flips.

use foundation::math::Vec3;

/// Rigid transform from solver coordinates to display coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DisplayFrame {
    /// Uniform scale applied after the rotation.
    pub scale: f64,
}

impl Default for DisplayFrame {
    fn default() -> Self {
        Self::CALIBRATED
    }
}

impl DisplayFrame {
    /// Solver meters map 1:1 onto display units.
    pub const CALIBRATED: DisplayFrame = DisplayFrame { scale: 1.0 };

    /// `(x, y, z)` east/north/up to `(x, z, -y)`.
    pub fn to_display(&self, p: Vec3) -> Vec3 {
        Vec3::new(p.x, p.z, -p.y).scale(self.scale)
    }

    pub fn to_solver(&self, p: Vec3) -> Vec3 {
        let q = p.scale(1.0 / self.scale);
        Vec3::new(q.x, -q.z, q.y)
    }

    pub fn points_to_display(&self, points: &[Vec3]) -> Vec<Vec3> {
        points.iter().map(|p| self.to_display(*p)).collect()
    }

    /// Row-major 4x4 matrix of [`DisplayFrame::to_display`], for renderers
    /// that take a model matrix.
    pub fn matrix(&self) -> [[f64; 4]; 4] {
        let s = self.scale;
        [
            [s, 0.0, 0.0, 0.0],
            [0.0, 0.0, s, 0.0],
            [0.0, -s, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }
}
