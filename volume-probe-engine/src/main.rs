use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy_common_assets::json::JsonAssetPlugin;

mod engine;
mod tools;

use engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use engine::overlay::{despawn_orphaned_overlays, sync_overlay_readouts, sync_overlays};
use engine::volume::manifest::{VolumeAssets, VolumeManifest};
use engine::volume::surface::{SurfaceMesh, SurfaceQuad};
use tools::panel::{PanelToggles, PanelUpdate, apply_panel_updates, panel_keyboard_shortcuts};
use tools::probe_marker::{
    MarkerPool, advance_markers, apply_marker_style, project_markers, seed_markers,
};
use tools::probe_widget::{
    apply_widget_style, project_widget, spawn_widget, widget_pointer_input,
};

const VOLUME_MANIFEST_PATH: &'static str = "volumes/adi_brain_manifest.json";

/// Tracks the in-flight manifest load until the volume resources are built.
#[derive(Resource, Default)]
struct VolumeLoader {
    handle: Option<Handle<VolumeManifest>>,
    loaded: bool,
}

fn main() {
    create_app().run();
}

fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(JsonAssetPlugin::<VolumeManifest>::new(&["json"]))
        .init_resource::<VolumeLoader>()
        .init_resource::<VolumeAssets>()
        .init_resource::<MarkerPool>()
        .init_resource::<ViewportCamera>()
        .init_resource::<PanelToggles>()
        .add_event::<PanelUpdate>()
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (load_volume_system, seed_markers, spawn_widget).chain(),
        )
        .add_systems(
            Update,
            (camera_controller, panel_keyboard_shortcuts, fps_text_update_system),
        )
        // One probe tick: pointer input and panel edits land before the
        // simulate -> transform -> project -> overlay chain reads them, so no
        // frame can render a state/style mismatch.
        .add_systems(
            Update,
            (
                widget_pointer_input,
                apply_panel_updates,
                advance_markers,
                project_markers,
                project_widget,
                apply_marker_style,
                apply_widget_style,
                sync_overlays,
                sync_overlay_readouts,
                despawn_orphaned_overlays,
            )
                .chain(),
        );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(Window {
            title: "Volume Probe".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

/// Load the volume manifest and build the session resources: grid transform,
/// extent, raycast surface, and camera framing. A singular grid-to-world
/// matrix is fatal; the session cannot place probes without it.
fn load_volume_system(
    mut volume_loader: ResMut<VolumeLoader>,
    mut volume: ResMut<VolumeAssets>,
    mut viewport_camera: ResMut<ViewportCamera>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<VolumeManifest>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut app_exit: EventWriter<AppExit>,
) {
    if volume_loader.handle.is_none() {
        info!("Loading volume manifest from {VOLUME_MANIFEST_PATH}");
        volume_loader.handle = Some(asset_server.load(VOLUME_MANIFEST_PATH));
        return;
    }
    if volume_loader.loaded {
        return;
    }
    let Some(handle) = volume_loader.handle.as_ref() else {
        return;
    };
    let Some(manifest) = manifests.get(handle) else {
        return;
    };
    volume_loader.loaded = true;

    let transform = match manifest.grid_transform() {
        Ok(transform) => transform,
        Err(err) => {
            error!("Volume manifest unusable: {err}");
            app_exit.write(AppExit::error());
            return;
        }
    };
    let extent = manifest.dimensions;
    let world_center = transform.apply(extent.center_grid());
    *volume = VolumeAssets {
        transform: Some(transform),
        extent: Some(extent),
        world_center,
        is_loaded: true,
    };

    // The rendered mid-slice doubles as the widget's raycast target.
    let surface = SurfaceMesh::from_volume(&transform, &extent);
    commands.spawn((
        Mesh3d(meshes.add(Rectangle::new(1.0, 1.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.80, 0.85, 0.90, 0.35),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            cull_mode: None,
            ..default()
        })),
        surface.quad_transform(),
        SurfaceQuad,
    ));
    commands.insert_resource(surface);

    let world_size = (transform.apply(extent.as_vec3()) - transform.apply(Vec3::ZERO)).length();
    *viewport_camera = ViewportCamera::framing(world_center, world_size);

    info!("Volume loaded: extent {extent:?}, world center {world_center}");
}

#[derive(Component)]
struct FpsText;

fn setup(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(150.0, 50.0, 50.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));

    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}
