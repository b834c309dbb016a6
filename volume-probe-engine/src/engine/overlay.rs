use bevy::prelude::*;
use constants::render_settings::{OVERLAY_FONT_SIZE, OVERLAY_GLYPH_SIZE, OVERLAY_TEXT_OFFSET};

/// Screen-space annotation state a probe recomputes once per frame. The UI
/// node never reads probe internals directly; this anchor is the only
/// contract between a probe and its overlay.
#[derive(Component, Debug, Clone)]
pub struct OverlayAnchor {
    /// Projected pixel position, `None` while the probe is behind the camera.
    pub screen: Option<Vec2>,
    pub visible: bool,
    pub text: Option<String>,
    pub colour: Color,
}

impl OverlayAnchor {
    pub fn new(colour: Color) -> Self {
        Self {
            screen: None,
            visible: false,
            text: None,
            colour,
        }
    }
}

/// UI glyph following one probe's screen position.
#[derive(Component)]
pub struct ProbeOverlay {
    pub target: Entity,
}

/// Measurement text hanging off an overlay glyph.
#[derive(Component)]
pub struct OverlayReadout;

/// Spawn the overlay node for a probe entity: an absolutely positioned glyph
/// square with a readout text child.
pub fn spawn_overlay(commands: &mut Commands, target: Entity, colour: Color) -> Entity {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Px(OVERLAY_GLYPH_SIZE),
                height: Val::Px(OVERLAY_GLYPH_SIZE),
                ..default()
            },
            BackgroundColor(colour),
            Visibility::Hidden,
            ProbeOverlay { target },
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: OVERLAY_FONT_SIZE,
                    ..default()
                },
                TextColor(colour),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(OVERLAY_TEXT_OFFSET),
                    top: Val::Px(0.0),
                    ..default()
                },
                OverlayReadout,
            ));
        })
        .id()
}

/// Reposition and restyle every overlay from its owner's anchor. A probe with
/// no screen position this frame is hidden, not plotted at a garbled spot.
pub fn sync_overlays(
    owners: Query<&OverlayAnchor>,
    mut overlays: Query<(&ProbeOverlay, &mut Node, &mut Visibility, &mut BackgroundColor)>,
) {
    for (overlay, mut node, mut visibility, mut background) in &mut overlays {
        let Ok(anchor) = owners.get(overlay.target) else {
            continue;
        };
        match anchor.screen {
            Some(screen) if anchor.visible => {
                node.left = Val::Px(screen.x - OVERLAY_GLYPH_SIZE * 0.5);
                node.top = Val::Px(screen.y - OVERLAY_GLYPH_SIZE * 0.5);
                *visibility = Visibility::Visible;
            }
            _ => {
                *visibility = Visibility::Hidden;
            }
        }
        *background = BackgroundColor(anchor.colour);
    }
}

/// Update the measurement readouts, hiding the text when the owner has
/// measurements disabled.
pub fn sync_overlay_readouts(
    owners: Query<&OverlayAnchor>,
    overlays: Query<&ProbeOverlay>,
    mut readouts: Query<
        (&ChildOf, &mut Text, &mut TextColor, &mut Visibility),
        (With<OverlayReadout>, Without<ProbeOverlay>),
    >,
) {
    for (child_of, mut text, mut colour, mut visibility) in &mut readouts {
        let Ok(overlay) = overlays.get(child_of.parent()) else {
            continue;
        };
        let Ok(anchor) = owners.get(overlay.target) else {
            continue;
        };
        match &anchor.text {
            Some(readout) => {
                if text.0 != *readout {
                    text.0 = readout.clone();
                }
                colour.0 = anchor.colour;
                *visibility = Visibility::Inherited;
            }
            None => {
                *visibility = Visibility::Hidden;
            }
        }
    }
}

/// Release overlay nodes whose probe has been despawned. Keeps scene teardown
/// from leaking UI elements.
pub fn despawn_orphaned_overlays(
    mut commands: Commands,
    overlays: Query<(Entity, &ProbeOverlay)>,
    owners: Query<(), With<OverlayAnchor>>,
) {
    for (entity, overlay) in &overlays {
        if owners.get(overlay.target).is_err() {
            commands.entity(entity).despawn();
        }
    }
}
