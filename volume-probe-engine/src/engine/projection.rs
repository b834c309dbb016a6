use bevy::prelude::*;
use bevy::render::camera::CameraProjection;
use thiserror::Error;

/// Per-frame projection failure. Recovered locally by hiding the affected
/// overlay for the frame; never propagated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("point projects behind the camera plane")]
    BehindCamera,
}

/// Maps world-space points to top-left-origin viewport pixels. Built fresh
/// each frame from the current camera so probes never render against a stale
/// view.
#[derive(Debug, Clone, Copy)]
pub struct ScreenProjector {
    view_from_world: Mat4,
    clip_from_view: Mat4,
    viewport: Vec2,
}

impl ScreenProjector {
    pub fn new(
        camera_transform: &GlobalTransform,
        projection: &Projection,
        viewport: Vec2,
    ) -> Self {
        Self::from_matrices(
            camera_transform.compute_matrix().inverse(),
            projection.get_clip_from_view(),
            viewport,
        )
    }

    pub fn from_matrices(view_from_world: Mat4, clip_from_view: Mat4, viewport: Vec2) -> Self {
        Self {
            view_from_world,
            clip_from_view,
            viewport,
        }
    }

    /// World point to viewport pixels: view transform, projection, perspective
    /// divide, then NDC `[-1, 1]` to pixels with the y axis flipped to match
    /// the UI's top-left origin.
    pub fn project(&self, world_point: Vec3) -> Result<Vec2, ProjectionError> {
        let view = self.view_from_world.transform_point3(world_point);
        let clip = self.clip_from_view * view.extend(1.0);
        if clip.w <= 0.0 {
            return Err(ProjectionError::BehindCamera);
        }
        let ndc = clip.truncate() / clip.w;
        Ok(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector() -> ScreenProjector {
        // Camera at +100 on Z looking down the negative Z axis.
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -100.0));
        let clip = Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, 1.0, 0.1, 10_000.0);
        ScreenProjector::from_matrices(view, clip, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn centered_point_maps_to_viewport_center() {
        let screen = projector().project(Vec3::ZERO).expect("in front");
        assert!((screen - Vec2::new(400.0, 300.0)).length() < 1e-2);
    }

    #[test]
    fn higher_world_point_maps_to_smaller_y() {
        let p = projector();
        let center = p.project(Vec3::ZERO).expect("in front");
        let above = p.project(Vec3::new(0.0, 10.0, 0.0)).expect("in front");
        assert!(above.y < center.y);
        assert!((above.x - center.x).abs() < 1e-2);
    }

    #[test]
    fn behind_camera_returns_sentinel() {
        let result = projector().project(Vec3::new(0.0, 0.0, 200.0));
        assert_eq!(result, Err(ProjectionError::BehindCamera));
    }
}
