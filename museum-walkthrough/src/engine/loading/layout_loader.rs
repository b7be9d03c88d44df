use crate::engine::assets::museum_layout::{LightLayout, MuseumLayout};
use crate::engine::camera::first_person::spawn_walkthrough_camera;
use crate::engine::core::app_state::AppState;
use crate::engine::core::launch_config::LaunchConfig;
use crate::engine::error::SceneSetupError;
use crate::engine::loading::progress::{LoadingProgress, record_failure};
use crate::engine::loading::scene_loader::SceneLoader;
use bevy::asset::LoadState;
use bevy::prelude::*;

#[derive(Resource, Default)]
pub struct LayoutLoader {
    handle: Option<Handle<MuseumLayout>>,
    path: String,
}

// Start the loading process
pub fn start_loading(
    mut layout_loader: ResMut<LayoutLoader>,
    asset_server: Res<AssetServer>,
    launch_config: Res<LaunchConfig>,
) {
    let layout_path = launch_config.layout_path();
    info!("Loading layout from: {}", layout_path);
    layout_loader.handle = Some(asset_server.load(&layout_path));
    layout_loader.path = layout_path;
}

/// Validate the layout, spawn camera and light, then request the model it names.
pub fn load_layout_system(
    mut loading_progress: ResMut<LoadingProgress>,
    layout_loader: Res<LayoutLoader>,
    mut scene_loader: ResMut<SceneLoader>,
    mut next_state: ResMut<NextState<AppState>>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    layouts: Res<Assets<MuseumLayout>>,
) {
    if loading_progress.layout_loaded {
        return;
    }

    let Some(handle) = layout_loader.handle.as_ref() else {
        return;
    };

    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle) {
        let error = SceneSetupError::AssetLoad {
            path: layout_loader.path.clone(),
            reason: err.to_string(),
        };
        record_failure(&mut loading_progress, &mut next_state, error);
        return;
    }

    let Some(layout) = layouts.get(handle) else {
        return;
    };

    if let Err(err) = layout.validate() {
        record_failure(
            &mut loading_progress,
            &mut next_state,
            SceneSetupError::from(err),
        );
        return;
    }

    info!("✓ Layout `{}` loaded", layout.name);
    commands.insert_resource(layout.clone());
    loading_progress.layout_loaded = true;

    spawn_walkthrough_camera(&mut commands, &layout.camera);
    spawn_lighting(&mut commands, &layout.light);

    info!("Loading model from: {}", layout.model);
    scene_loader.request(layout.model.clone(), asset_server.load(layout.model.clone()));
}

/// Sky-from-above lighting: flat ambient fill plus one directional light shining
/// down the inverse of the layout's up-vector.
fn spawn_lighting(commands: &mut Commands, light: &LightLayout) {
    commands.insert_resource(AmbientLight {
        brightness: light.brightness,
        ..default()
    });

    let sky = Vec3::from(light.direction).normalize_or(Vec3::Y);
    let up = if sky.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };
    commands.spawn((
        Name::new("sky_light"),
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::IDENTITY.looking_to(-sky, up),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::path::LAYOUT_EXTENSION;
    use bevy::asset::AssetMetaCheck;
    use bevy::state::app::StatesPlugin;
    use bevy_common_assets::json::JsonAssetPlugin;
    use std::time::Duration;

    fn loading_app(variant: &str) -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin {
                meta_check: AssetMetaCheck::Never,
                ..default()
            },
            StatesPlugin,
        ))
        .add_plugins(JsonAssetPlugin::<MuseumLayout>::new(&[LAYOUT_EXTENSION]))
        .init_state::<AppState>()
        .insert_resource(LaunchConfig::with_variant(variant).expect("valid variant"))
        .init_resource::<LoadingProgress>()
        .init_resource::<LayoutLoader>()
        .init_resource::<SceneLoader>()
        .add_systems(Startup, start_loading)
        .add_systems(
            Update,
            load_layout_system.run_if(in_state(AppState::Loading)),
        );
        app
    }

    #[test]
    fn missing_layout_file_fails_the_load() {
        let mut app = loading_app("missing_wing");

        for _ in 0..500 {
            app.update();
            if *app.world().resource::<State<AppState>>().get() == AppState::Failed {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Failed
        );
        let progress = app.world().resource::<LoadingProgress>();
        assert!(!progress.layout_loaded);
        let failure = progress.failure.as_deref().expect("failure recorded");
        assert!(failure.contains("layouts/missing_wing.layout.json"), "{failure}");
    }
}
