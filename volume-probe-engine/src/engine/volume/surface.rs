use bevy::prelude::*;

use super::extent::BoundingExtent;
use super::grid_transform::GridTransform;

/// The dataset's mid axial slice as a world-space rectangle. The probe
/// widget raycasts against it to derive its reference position.
#[derive(Resource, Debug, Clone)]
pub struct SurfaceMesh {
    center: Vec3,
    /// Half-edge along the grid i axis, in world space.
    half_u: Vec3,
    /// Half-edge along the grid j axis, in world space.
    half_v: Vec3,
    normal: Vec3,
}

/// Tag for the rendered slice quad so panel toggles can find it.
#[derive(Component)]
pub struct SurfaceQuad;

impl SurfaceMesh {
    /// Build the slice rectangle spanning `[0, nx] x [0, ny]` at `k = nz / 2`,
    /// mapped through the grid-to-world transform.
    pub fn from_volume(transform: &GridTransform, extent: &BoundingExtent) -> Self {
        let k = extent.mid_slice_k();
        let b = extent.as_vec3();
        let origin = transform.apply(Vec3::new(0.0, 0.0, k));
        let u_corner = transform.apply(Vec3::new(b.x, 0.0, k));
        let v_corner = transform.apply(Vec3::new(0.0, b.y, k));

        let half_u = (u_corner - origin) * 0.5;
        let half_v = (v_corner - origin) * 0.5;
        Self {
            center: origin + half_u + half_v,
            half_u,
            half_v,
            normal: half_u.cross(half_v).normalize(),
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Ray-rectangle intersection. `None` is a miss, never an error; callers
    /// keep their last valid position.
    pub fn raycast(&self, ray: Ray3d) -> Option<Vec3> {
        let dir = ray.direction.as_vec3();
        let denom = dir.dot(self.normal);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (self.center - ray.origin).dot(self.normal) / denom;
        if t <= 0.0 {
            return None;
        }
        let point = ray.origin + dir * t;

        // Project the hit onto the slice edges and reject points outside.
        let offset = point - self.center;
        let u_len = self.half_u.length();
        let v_len = self.half_v.length();
        let u = offset.dot(self.half_u / u_len);
        let v = offset.dot(self.half_v / v_len);
        if u.abs() <= u_len && v.abs() <= v_len {
            Some(point)
        } else {
            None
        }
    }

    /// Transform for the rendered slice quad (unit rectangle scaled to the
    /// slice edges).
    pub fn quad_transform(&self) -> Transform {
        let u_len = self.half_u.length();
        let v_len = self.half_v.length();
        let rotation = Quat::from_mat3(&Mat3::from_cols(
            self.half_u / u_len,
            self.half_v / v_len,
            self.normal,
        ));
        Transform {
            translation: self.center,
            rotation,
            scale: Vec3::new(u_len * 2.0, v_len * 2.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_surface() -> SurfaceMesh {
        let transform = GridTransform::new(Mat4::IDENTITY).expect("invertible");
        SurfaceMesh::from_volume(&transform, &BoundingExtent::new(100, 100, 50))
    }

    fn ray(origin: Vec3, dir: Vec3) -> Ray3d {
        Ray3d::new(origin, Dir3::new(dir).expect("non-zero"))
    }

    #[test]
    fn hits_slice_center() {
        let surface = unit_surface();
        let hit = surface
            .raycast(ray(Vec3::new(50.0, 50.0, 100.0), Vec3::NEG_Z))
            .expect("hit");
        assert!((hit - Vec3::new(50.0, 50.0, 25.0)).length() < 1e-4);
    }

    #[test]
    fn misses_outside_rectangle() {
        let surface = unit_surface();
        assert!(
            surface
                .raycast(ray(Vec3::new(150.0, 50.0, 100.0), Vec3::NEG_Z))
                .is_none()
        );
    }

    #[test]
    fn misses_parallel_ray() {
        let surface = unit_surface();
        assert!(
            surface
                .raycast(ray(Vec3::new(50.0, 50.0, 100.0), Vec3::X))
                .is_none()
        );
    }

    #[test]
    fn misses_plane_behind_origin() {
        let surface = unit_surface();
        assert!(
            surface
                .raycast(ray(Vec3::new(50.0, 50.0, 100.0), Vec3::Z))
                .is_none()
        );
    }
}
