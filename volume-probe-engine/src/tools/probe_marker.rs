use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::Rng;

use crate::engine::overlay::{OverlayAnchor, spawn_overlay};
use crate::engine::projection::ScreenProjector;
use crate::engine::volume::extent::BoundingExtent;
use crate::engine::volume::manifest::VolumeAssets;
use constants::probe_settings::{MARKER_COLOUR, MARKER_POOL_SIZE};
use constants::render_settings::MARKER_MESH_SIZE;

/// One roaming probe. Owns its grid position and bounce direction; world and
/// screen positions are derived every frame, never cached across camera
/// moves.
#[derive(Component, Debug, Clone)]
pub struct ProbeMarker {
    pub id: u32,
    pub grid_position: Vec3,
    pub direction: IVec3,
    pub world_position: Vec3,
    pub screen_position: Option<Vec2>,
}

impl ProbeMarker {
    pub fn new(id: u32, grid_position: Vec3, direction: IVec3) -> Self {
        // Probes roam the axial slice they were seeded on.
        let direction = IVec3::new(direction.x, direction.y, 0);
        Self {
            id,
            grid_position,
            direction,
            world_position: Vec3::ZERO,
            screen_position: None,
        }
    }

    /// One tick of the bounce rule: an axis at or beyond its bound turns
    /// inward before the unit step, so positions never leave
    /// `[0, extent]` and a marker sitting on a corner turns on both axes in
    /// the same tick.
    pub fn advance(&mut self, extent: &BoundingExtent) {
        let bounds = extent.as_vec3();
        if self.grid_position.x >= bounds.x {
            self.direction.x = -1;
        } else if self.grid_position.x <= 0.0 {
            self.direction.x = 1;
        }
        if self.grid_position.y >= bounds.y {
            self.direction.y = -1;
        } else if self.grid_position.y <= 0.0 {
            self.direction.y = 1;
        }
        self.grid_position += self.direction.as_vec3();
    }

    /// Random in-slice direction, re-rolled so no marker starts stationary.
    pub fn random_direction(rng: &mut impl Rng) -> IVec3 {
        loop {
            let x = rng.gen_range(-1..=1);
            let y = rng.gen_range(-1..=1);
            if x != 0 || y != 0 {
                return IVec3::new(x, y, 0);
            }
        }
    }
}

/// Style fields the settings panel edits per marker.
#[derive(Component, Debug, Clone)]
pub struct MarkerStyle {
    pub colour: Color,
    pub show_mesh: bool,
    pub show_overlay: bool,
    pub show_measurement: bool,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            colour: MARKER_COLOUR,
            show_mesh: true,
            show_overlay: true,
            show_measurement: true,
        }
    }
}

/// Exclusive owner of the marker entities for the session.
#[derive(Resource, Default)]
pub struct MarkerPool {
    pub entities: Vec<Entity>,
    pub seeded: bool,
}

/// Spawn the fixed marker pool at the dataset's center once the volume is in.
pub fn seed_markers(
    mut commands: Commands,
    volume: Res<VolumeAssets>,
    mut pool: ResMut<MarkerPool>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if pool.seeded || !volume.is_loaded {
        return;
    }
    let (Some(transform), Some(extent)) = (volume.transform, volume.extent) else {
        return;
    };

    let seed_grid = extent.center_grid();
    let seed_world = transform.apply(seed_grid);
    let mut rng = rand::thread_rng();
    for id in 0..MARKER_POOL_SIZE {
        let direction = ProbeMarker::random_direction(&mut rng);
        let mut marker = ProbeMarker::new(id as u32, seed_grid, direction);
        marker.world_position = seed_world;

        let entity = commands
            .spawn((
                marker,
                MarkerStyle::default(),
                OverlayAnchor::new(MARKER_COLOUR),
                Mesh3d(meshes.add(Cuboid::new(
                    MARKER_MESH_SIZE,
                    MARKER_MESH_SIZE,
                    MARKER_MESH_SIZE,
                ))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: MARKER_COLOUR,
                    emissive: MARKER_COLOUR.to_linear(),
                    unlit: true,
                    ..default()
                })),
                Transform::from_translation(seed_world),
            ))
            .id();
        spawn_overlay(&mut commands, entity, MARKER_COLOUR);
        pool.entities.push(entity);
    }
    pool.seeded = true;
    info!("Seeded {MARKER_POOL_SIZE} probe markers at grid {seed_grid}");
}

/// Advance every marker one bounce step and recompute its world position,
/// keeping the mesh transform in lockstep with the grid state.
pub fn advance_markers(
    volume: Res<VolumeAssets>,
    mut markers: Query<(&mut ProbeMarker, &mut Transform)>,
) {
    let (Some(transform), Some(extent)) = (volume.transform, volume.extent) else {
        return;
    };
    for (mut marker, mut mesh_transform) in &mut markers {
        marker.advance(&extent);
        marker.world_position = transform.apply(marker.grid_position);
        mesh_transform.translation = marker.world_position;
    }
}

/// Project markers to viewport pixels and refresh their overlay anchors. A
/// marker behind the camera keeps `screen_position = None` and its overlay
/// hides for the frame.
pub fn project_markers(
    cameras: Query<(&GlobalTransform, &Projection), With<Camera3d>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut markers: Query<(&mut ProbeMarker, &MarkerStyle, &mut OverlayAnchor)>,
) {
    let Ok((camera_transform, projection)) = cameras.single() else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let projector = ScreenProjector::new(
        camera_transform,
        projection,
        Vec2::new(window.width(), window.height()),
    );

    for (mut marker, style, mut anchor) in &mut markers {
        marker.screen_position = projector.project(marker.world_position).ok();
        anchor.screen = marker.screen_position;
        anchor.visible = style.show_overlay;
        anchor.colour = style.colour;
        anchor.text = style.show_measurement.then(|| readout(&marker));
    }
}

fn readout(marker: &ProbeMarker) -> String {
    let g = marker.grid_position;
    let w = marker.world_position;
    format!(
        "IJK {} {} {}\nLPS {:.1} {:.1} {:.1} mm",
        g.x as i32, g.y as i32, g.z as i32, w.x, w.y, w.z
    )
}

/// Push edited styles down to the marker meshes.
pub fn apply_marker_style(
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut markers: Query<
        (
            &MarkerStyle,
            &MeshMaterial3d<StandardMaterial>,
            &mut Visibility,
        ),
        Changed<MarkerStyle>,
    >,
) {
    for (style, material, mut visibility) in &mut markers {
        if let Some(mat) = materials.get_mut(&material.0) {
            mat.base_color = style.colour;
            mat.emissive = style.colour.to_linear();
        }
        *visibility = if style.show_mesh {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent() -> BoundingExtent {
        BoundingExtent::new(100, 100, 50)
    }

    #[test]
    fn reverses_at_upper_bound() {
        let mut marker = ProbeMarker::new(0, Vec3::new(100.0, 40.0, 25.0), IVec3::new(1, 1, 0));
        marker.advance(&extent());
        assert_eq!(marker.direction.x, -1);
        assert_eq!(marker.grid_position.x, 99.0);
        assert_eq!(marker.grid_position.y, 41.0);
    }

    #[test]
    fn reverses_at_lower_bound() {
        let mut marker = ProbeMarker::new(0, Vec3::new(0.0, 40.0, 25.0), IVec3::new(-1, 0, 0));
        marker.advance(&extent());
        assert_eq!(marker.direction.x, 1);
        assert_eq!(marker.grid_position.x, 1.0);
    }

    #[test]
    fn corner_reverses_both_axes_in_one_tick() {
        let mut marker = ProbeMarker::new(0, Vec3::new(100.0, 100.0, 25.0), IVec3::new(1, 1, 0));
        marker.advance(&extent());
        assert_eq!(marker.direction, IVec3::new(-1, -1, 0));
        assert_eq!(marker.grid_position, Vec3::new(99.0, 99.0, 25.0));
    }

    #[test]
    fn stays_in_bounds_for_many_ticks() {
        // Ten markers seeded at the grid center, 200 ticks each.
        let extent = extent();
        let seed = extent.center_grid();
        let mut rng = rand::thread_rng();
        for _ in 0..10 {
            let mut marker = ProbeMarker::new(0, seed, ProbeMarker::random_direction(&mut rng));
            for _ in 0..200 {
                marker.advance(&extent);
                assert!(
                    extent.contains(marker.grid_position),
                    "escaped at {}",
                    marker.grid_position
                );
            }
        }
    }

    #[test]
    fn never_leaves_its_slice() {
        let extent = extent();
        let mut marker = ProbeMarker::new(0, extent.center_grid(), IVec3::new(1, -1, 1));
        assert_eq!(marker.direction.z, 0);
        for _ in 0..50 {
            marker.advance(&extent);
        }
        assert_eq!(marker.grid_position.z, extent.center_grid().z);
    }

    #[test]
    fn random_direction_is_never_zero() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let d = ProbeMarker::random_direction(&mut rng);
            assert!(d.x != 0 || d.y != 0);
            assert_eq!(d.z, 0);
        }
    }
}
