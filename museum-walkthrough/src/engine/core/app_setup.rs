use bevy::app::Animation;
use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use bevy_rapier3d::prelude::{NoUserData, RapierPhysicsPlugin};
// Crate engine modules
use crate::constants::camera::PHYSICS_LENGTH_UNIT;
use crate::constants::path::LAYOUT_EXTENSION;
use crate::engine::animation::swing::{SwingAngle, pose_swinging_meshes};
use crate::engine::assets::museum_layout::MuseumLayout;
use crate::engine::camera::first_person::{
    CameraCollisionEvent, first_person_controller, report_camera_collisions,
};
use crate::engine::core::launch_config::LaunchConfig;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::layout_loader::{LayoutLoader, load_layout_system, start_loading};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::scene_loader::{SceneLoader, spawn_scene_when_ready};
use crate::engine::loading::scene_setup::configure_scene;
use crate::engine::systems::debug_overlay::{
    DebugOverlayState, reflect_debug_overlay, spawn_debug_overlay, toggle_debug_overlay,
    update_debug_details,
};
use crate::engine::systems::fps_tracking::{fps_notification_system, fps_text_update_system};
// Crate interaction modules
use crate::interaction::dispatch::pick_on_pointer_down;
use crate::interaction::doors::{DoorClips, DoorCommand, apply_door_commands};
use crate::interaction::exhibits::ExhibitsPlugin;
use crate::interaction::triggers::handle_trigger_collisions;
// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;
// Transitions
use crate::engine::core::app_state::{
    AppState, WalkthroughSet, report_failure, transition_to_running, transition_to_scene_spawned,
};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers MuseumLayout as a loadable asset type from *.layout.json files.
        .add_plugins(JsonAssetPlugin::<MuseumLayout>::new(&[LAYOUT_EXTENSION]))
        // Static trimesh colliders and the camera's character controller.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().with_length_unit(PHYSICS_LENGTH_UNIT))
        .add_plugins(WebRpcPlugin)
        .register_type::<SwingAngle>();

    // Plugin for the exhibit info modal
    app.add_plugins(ExhibitsPlugin);

    // Initialise resources early
    app.insert_resource(LaunchConfig::from_environment())
        .init_resource::<LoadingProgress>()
        .init_resource::<LayoutLoader>()
        .init_resource::<SceneLoader>()
        .init_resource::<DoorClips>()
        .init_resource::<DebugOverlayState>()
        .add_event::<DoorCommand>()
        .add_event::<CameraCollisionEvent>();

    // State-based system scheduling
    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (
                // Loading phase systems
                load_layout_system,
                spawn_scene_when_ready,
                transition_to_scene_spawned,
            )
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(OnEnter(AppState::SceneSpawned), configure_scene)
        .add_systems(
            Update,
            transition_to_running.run_if(in_state(AppState::SceneSpawned)),
        )
        .add_systems(OnEnter(AppState::Failed), report_failure);

    // Runtime systems - only run once the scene is wired
    app.configure_sets(
        Update,
        (WalkthroughSet::Input, WalkthroughSet::Dispatch)
            .chain()
            .run_if(in_state(AppState::Running)),
    )
    .add_systems(
        Update,
        (
            first_person_controller,
            report_camera_collisions,
            pick_on_pointer_down,
            handle_trigger_collisions,
        )
            .chain()
            .in_set(WalkthroughSet::Input),
    )
    .add_systems(Update, apply_door_commands.in_set(WalkthroughSet::Dispatch))
    // Door players sample swing angles; turn them into rotations before propagation.
    .add_systems(
        PostUpdate,
        pose_swinging_meshes
            .after(Animation)
            .before(TransformSystem::TransformPropagate),
    );

    // Diagnostics run in every state so a failed load can still be inspected.
    app.add_systems(
        Update,
        (
            toggle_debug_overlay,
            reflect_debug_overlay,
            update_debug_details,
            fps_text_update_system,
        )
            .chain(),
    )
    .add_systems(
        Update,
        fps_notification_system.run_if(in_state(AppState::Running)),
    );

    app
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands, launch_config: Res<LaunchConfig>) {
    info!("=== MUSEUM WALKTHROUGH ({}) ===", launch_config.variant());
    spawn_debug_overlay(&mut commands);
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        filter: "info,wgpu_core=warn,wgpu_hal=warn,museum_walkthrough=debug".into(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
