use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Integer dimensions of the volume grid. Marker positions stay within
/// `[0, nx] x [0, ny] x [0, nz]` inclusive; touching an edge reverses the
/// marker's direction rather than clamping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingExtent {
    pub nx: u32,
    pub ny: u32,
    pub nz: u32,
}

impl BoundingExtent {
    pub fn new(nx: u32, ny: u32, nz: u32) -> Self {
        Self { nx, ny, nz }
    }

    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.nx as f32, self.ny as f32, self.nz as f32)
    }

    /// Grid-space center, rounded so that unit-step markers seeded here stay
    /// on integer coordinates.
    pub fn center_grid(&self) -> Vec3 {
        (self.as_vec3() * 0.5).round()
    }

    /// Fractional index of the mid axial slice.
    pub fn mid_slice_k(&self) -> f32 {
        self.nz as f32 * 0.5
    }

    pub fn contains(&self, p: Vec3) -> bool {
        let b = self.as_vec3();
        p.x >= 0.0 && p.x <= b.x && p.y >= 0.0 && p.y <= b.y && p.z >= 0.0 && p.z <= b.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_inside() {
        let extent = BoundingExtent::new(100, 100, 50);
        assert!(extent.contains(Vec3::ZERO));
        assert!(extent.contains(Vec3::new(100.0, 100.0, 50.0)));
        assert!(!extent.contains(Vec3::new(100.1, 0.0, 0.0)));
        assert!(!extent.contains(Vec3::new(0.0, -0.1, 0.0)));
    }
}
