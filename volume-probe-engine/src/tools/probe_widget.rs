use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::engine::overlay::{OverlayAnchor, spawn_overlay};
use crate::engine::projection::ScreenProjector;
use crate::engine::volume::manifest::VolumeAssets;
use crate::engine::volume::surface::SurfaceMesh;
use constants::probe_settings::{
    WIDGET_ACTIVE_COLOUR, WIDGET_DEFAULT_COLOUR, WIDGET_HOVER_COLOUR, WIDGET_HOVER_RADIUS,
    WIDGET_SELECTED_COLOUR,
};
use constants::render_settings::WIDGET_MESH_RADIUS;

/// Interaction state of the probe widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeState {
    #[default]
    Idle,
    Hovered,
    Active,
    Selected,
}

/// Discrete pointer events the host routes to the widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    EnterHit,
    LeaveHit,
    Down,
    Move { hit: Option<Vec3> },
    Up,
    DownElsewhere,
}

/// Whole-widget colour per state. Colour is applied atomically with the
/// state, never per sub-object.
#[derive(Debug, Clone)]
pub struct StatePalette {
    pub idle: Color,
    pub hovered: Color,
    pub active: Color,
    pub selected: Color,
}

impl Default for StatePalette {
    fn default() -> Self {
        Self {
            idle: WIDGET_DEFAULT_COLOUR,
            hovered: WIDGET_HOVER_COLOUR,
            active: WIDGET_ACTIVE_COLOUR,
            selected: WIDGET_SELECTED_COLOUR,
        }
    }
}

impl StatePalette {
    pub fn colour_for(&self, state: ProbeState) -> Color {
        match state {
            ProbeState::Idle => self.idle,
            ProbeState::Hovered => self.hovered,
            ProbeState::Active => self.active,
            ProbeState::Selected => self.selected,
        }
    }
}

/// The single user-manipulated probe. One per session, spawned once the
/// surface mesh exists.
#[derive(Component, Debug, Clone)]
pub struct ProbeWidget {
    pub state: ProbeState,
    pub reference_position: Vec3,
    pub palette: StatePalette,
    pub show_mesh: bool,
    pub show_overlay: bool,
    pub show_measurement: bool,
}

impl ProbeWidget {
    pub fn new(reference_position: Vec3) -> Self {
        Self {
            state: ProbeState::Idle,
            reference_position,
            palette: StatePalette::default(),
            show_mesh: true,
            show_overlay: true,
            show_measurement: true,
        }
    }

    pub fn colour(&self) -> Color {
        self.palette.colour_for(self.state)
    }

    /// Apply one pointer event. Pairs with no defined transition are no-ops,
    /// so stray events (a pointer-down with no prior hover, repeated moves)
    /// can never corrupt the state. A move with a raycast miss keeps the last
    /// valid reference position. Returns whether state or position changed.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        use PointerEvent::*;
        use ProbeState::*;
        match (self.state, event) {
            (Idle, EnterHit) => {
                self.state = Hovered;
                true
            }
            (Hovered, LeaveHit) => {
                self.state = Idle;
                true
            }
            (Hovered, Down) => {
                self.state = Active;
                true
            }
            (Active, Move { hit }) => match hit {
                Some(point) => {
                    self.reference_position = point;
                    true
                }
                None => false,
            },
            (Active, Up) => {
                self.state = Selected;
                true
            }
            (Selected, DownElsewhere) => {
                self.state = Idle;
                true
            }
            _ => false,
        }
    }
}

/// Spawn the widget at the surface center once the slice mesh is available.
pub fn spawn_widget(
    mut commands: Commands,
    surface: Option<Res<SurfaceMesh>>,
    existing: Query<(), With<ProbeWidget>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(surface) = surface else {
        return;
    };
    if !existing.is_empty() {
        return;
    }

    let widget = ProbeWidget::new(surface.center());
    let colour = widget.colour();
    let entity = commands
        .spawn((
            widget,
            OverlayAnchor::new(colour),
            Mesh3d(meshes.add(Sphere::new(WIDGET_MESH_RADIUS))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: colour,
                emissive: colour.to_linear(),
                unlit: true,
                ..default()
            })),
            Transform::from_translation(surface.center()),
        ))
        .id();
    spawn_overlay(&mut commands, entity, colour);
    info!("Probe widget ready at {}", surface.center());
}

/// Translate raw pointer input into widget transitions. Hover means the
/// cursor ray hits the surface within a small radius of the widget; a miss
/// while dragging keeps the last valid position.
pub fn widget_pointer_input(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&GlobalTransform, &Camera), With<Camera3d>>,
    mouse: Res<ButtonInput<MouseButton>>,
    surface: Option<Res<SurfaceMesh>>,
    mut widgets: Query<(&mut ProbeWidget, &mut Transform)>,
) {
    let Some(surface) = surface else {
        return;
    };
    let Ok((mut widget, mut transform)) = widgets.single_mut() else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((camera_transform, camera)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_pos) else {
        return;
    };

    let hit = surface.raycast(ray);
    let near_widget =
        hit.is_some_and(|p| p.distance(widget.reference_position) <= WIDGET_HOVER_RADIUS);

    let event = match widget.state {
        ProbeState::Idle if near_widget => Some(PointerEvent::EnterHit),
        ProbeState::Hovered if mouse.just_pressed(MouseButton::Left) => Some(PointerEvent::Down),
        ProbeState::Hovered if !near_widget => Some(PointerEvent::LeaveHit),
        ProbeState::Active if mouse.just_released(MouseButton::Left) => Some(PointerEvent::Up),
        ProbeState::Active => Some(PointerEvent::Move { hit }),
        ProbeState::Selected if mouse.just_pressed(MouseButton::Left) && !near_widget => {
            Some(PointerEvent::DownElsewhere)
        }
        _ => None,
    };
    let Some(event) = event else {
        return;
    };

    if widget.handle(event) {
        transform.translation = widget.reference_position;
    }
}

/// Refresh the widget's overlay anchor from its state and the current camera.
pub fn project_widget(
    cameras: Query<(&GlobalTransform, &Projection), With<Camera3d>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    volume: Res<VolumeAssets>,
    mut widgets: Query<(&ProbeWidget, &mut OverlayAnchor)>,
) {
    let Ok((widget, mut anchor)) = widgets.single_mut() else {
        return;
    };
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

    anchor.screen = projector.project(widget.reference_position).ok();
    anchor.visible = widget.show_overlay;
    anchor.colour = widget.colour();
    anchor.text = widget.show_measurement.then(|| {
        let w = widget.reference_position;
        match volume.transform {
            Some(transform) => {
                let g = transform.apply_inverse(w);
                format!(
                    "IJK {:.0} {:.0} {:.0}\nLPS {:.1} {:.1} {:.1} mm",
                    g.x, g.y, g.z, w.x, w.y, w.z
                )
            }
            None => format!("LPS {:.1} {:.1} {:.1} mm", w.x, w.y, w.z),
        }
    });
}

/// Push the state colour and mesh visibility down to the widget mesh.
pub fn apply_widget_style(
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut widgets: Query<
        (
            &ProbeWidget,
            &MeshMaterial3d<StandardMaterial>,
            &mut Visibility,
        ),
        Changed<ProbeWidget>,
    >,
) {
    for (widget, material, mut visibility) in &mut widgets {
        if let Some(mat) = materials.get_mut(&material.0) {
            mat.base_color = widget.colour();
            mat.emissive = widget.colour().to_linear();
        }
        *visibility = if widget.show_mesh {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> ProbeWidget {
        ProbeWidget::new(Vec3::new(50.0, 50.0, 25.0))
    }

    #[test]
    fn happy_path_walks_all_states() {
        let mut w = widget();
        assert!(w.handle(PointerEvent::EnterHit));
        assert_eq!(w.state, ProbeState::Hovered);
        assert!(w.handle(PointerEvent::Down));
        assert_eq!(w.state, ProbeState::Active);

        let target = Vec3::new(10.0, 20.0, 25.0);
        assert!(w.handle(PointerEvent::Move { hit: Some(target) }));
        assert_eq!(w.reference_position, target);

        assert!(w.handle(PointerEvent::Up));
        assert_eq!(w.state, ProbeState::Selected);
        assert_eq!(w.reference_position, target);

        assert!(w.handle(PointerEvent::DownElsewhere));
        assert_eq!(w.state, ProbeState::Idle);
    }

    #[test]
    fn colour_follows_state() {
        let mut w = widget();
        assert_eq!(w.colour(), w.palette.idle);
        w.handle(PointerEvent::EnterHit);
        assert_eq!(w.colour(), w.palette.hovered);
        w.handle(PointerEvent::Down);
        assert_eq!(w.colour(), w.palette.active);
        w.handle(PointerEvent::Up);
        assert_eq!(w.colour(), w.palette.selected);
    }

    #[test]
    fn repeated_moves_stay_active() {
        let mut w = widget();
        w.handle(PointerEvent::EnterHit);
        w.handle(PointerEvent::Down);
        w.handle(PointerEvent::Move {
            hit: Some(Vec3::X),
        });
        w.handle(PointerEvent::Move {
            hit: Some(Vec3::Y),
        });
        assert_eq!(w.state, ProbeState::Active);
        assert_eq!(w.reference_position, Vec3::Y);
    }

    #[test]
    fn pointer_down_without_hover_is_ignored() {
        let mut w = widget();
        let before = w.colour();
        assert!(!w.handle(PointerEvent::Down));
        assert_eq!(w.state, ProbeState::Idle);
        assert_eq!(w.colour(), before);
    }

    #[test]
    fn miss_while_dragging_keeps_last_position() {
        let mut w = widget();
        w.handle(PointerEvent::EnterHit);
        w.handle(PointerEvent::Down);
        w.handle(PointerEvent::Move {
            hit: Some(Vec3::new(5.0, 6.0, 25.0)),
        });
        assert!(!w.handle(PointerEvent::Move { hit: None }));
        assert_eq!(w.state, ProbeState::Active);
        assert_eq!(w.reference_position, Vec3::new(5.0, 6.0, 25.0));
    }

    #[test]
    fn undefined_transitions_are_no_ops() {
        let mut w = widget();
        assert!(!w.handle(PointerEvent::Up));
        assert!(!w.handle(PointerEvent::LeaveHit));
        assert_eq!(w.state, ProbeState::Idle);

        w.handle(PointerEvent::EnterHit);
        w.handle(PointerEvent::Down);
        w.handle(PointerEvent::Up);
        // Selected ignores everything except pointer-down-elsewhere.
        assert!(!w.handle(PointerEvent::EnterHit));
        assert!(!w.handle(PointerEvent::Up));
        assert_eq!(w.state, ProbeState::Selected);
    }
}
