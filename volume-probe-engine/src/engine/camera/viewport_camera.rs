use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;

/// Orbit camera state around the dataset. The camera transform eases toward
/// the pose derived from these values every frame, so probe projection always
/// reads the transform actually used for rendering.
#[derive(Resource)]
pub struct ViewportCamera {
    pub focus_point: Vec3,
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl ViewportCamera {
    /// Frame a loaded volume: orbit the world center at a distance scaled to
    /// the dataset's world size.
    pub fn framing(center: Vec3, world_size: f32) -> Self {
        Self {
            focus_point: center,
            distance: (world_size * 1.5).max(10.0),
            pitch: -0.4,
            yaw: 0.6,
        }
    }

    fn pose(&self) -> (Vec3, Quat) {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        let position = self.focus_point + rotation * (Vec3::Z * self.distance);
        (position, rotation)
    }
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            focus_point: Vec3::ZERO,
            distance: 180.0,
            pitch: -0.4,
            yaw: 0.6,
        }
    }
}

/// Right-drag orbits, mouse wheel dollies. Left button is reserved for the
/// probe widget.
pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        viewport_camera.yaw += -mouse_delta.x * yaw_sens;
        viewport_camera.pitch += -mouse_delta.y * pitch_sens;
        viewport_camera.pitch = viewport_camera.pitch.clamp(-1.55, 1.55);
    }

    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        let dolly_speed = (viewport_camera.distance * 0.1).clamp(0.5, 200.0);
        viewport_camera.distance =
            (viewport_camera.distance - scroll_accum * dolly_speed).max(1.0);
    }

    let (target_pos, target_rot) = viewport_camera.pose();
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target_pos, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target_rot, lerp_speed);
}
