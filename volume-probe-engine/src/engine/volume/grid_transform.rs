use bevy::prelude::*;
use thiserror::Error;

/// Raised when a manifest carries a singular grid-to-world matrix.
/// The session cannot place probes without a valid mapping.
#[derive(Debug, Error)]
#[error("grid-to-world matrix is not invertible (determinant {determinant})")]
pub struct InvalidTransformError {
    pub determinant: f32,
}

const DETERMINANT_EPSILON: f32 = 1e-6;

/// Affine mapping between volume index coordinates (IJK) and world
/// coordinates (LPS). The inverse is computed once at construction and the
/// pair stays immutable for the session.
#[derive(Debug, Clone, Copy)]
pub struct GridTransform {
    grid_to_world: Mat4,
    world_to_grid: Mat4,
}

impl GridTransform {
    pub fn new(grid_to_world: Mat4) -> Result<Self, InvalidTransformError> {
        let determinant = grid_to_world.determinant();
        if determinant.abs() < DETERMINANT_EPSILON {
            return Err(InvalidTransformError { determinant });
        }
        Ok(Self {
            grid_to_world,
            world_to_grid: grid_to_world.inverse(),
        })
    }

    /// Map a grid point to world space.
    pub fn apply(&self, grid_point: Vec3) -> Vec3 {
        self.grid_to_world.transform_point3(grid_point)
    }

    /// Map a world point back to grid space.
    pub fn apply_inverse(&self, world_point: Vec3) -> Vec3 {
        self.world_to_grid.transform_point3(world_point)
    }

    pub fn grid_to_world(&self) -> Mat4 {
        self.grid_to_world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-3, "{a} != {b}");
    }

    #[test]
    fn round_trips_grid_points() {
        // Anisotropic spacing plus an origin offset, typical of CT volumes.
        let mat = Mat4::from_scale_rotation_translation(
            Vec3::new(0.5, 0.5, 2.0),
            Quat::from_rotation_z(0.3),
            Vec3::new(-120.0, 45.0, -60.0),
        );
        let transform = GridTransform::new(mat).expect("invertible");

        for p in [
            Vec3::ZERO,
            Vec3::new(100.0, 100.0, 50.0),
            Vec3::new(12.0, 73.0, 25.0),
        ] {
            assert_close(transform.apply_inverse(transform.apply(p)), p);
        }
    }

    #[test]
    fn inverse_matches_matrix_inverse() {
        let mat = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let transform = GridTransform::new(mat).expect("invertible");
        let world = transform.apply(Vec3::new(4.0, 5.0, 6.0));
        assert_close(world, Vec3::new(5.0, 7.0, 9.0));
        assert_close(transform.apply_inverse(world), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn rejects_singular_matrix() {
        let err = GridTransform::new(Mat4::ZERO);
        assert!(err.is_err());
    }
}
