use crate::engine::core::app_state::AppState;
use crate::engine::error::SceneSetupError;
use crate::engine::loading::progress::{LoadingProgress, record_failure};
use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;

/// Root entity of the spawned museum model.
#[derive(Component, Debug)]
pub struct MuseumSceneRoot;

#[derive(Resource, Default)]
pub struct SceneLoader {
    gltf: Option<Handle<Gltf>>,
    path: String,
    root: Option<Entity>,
}

impl SceneLoader {
    pub fn request(&mut self, path: String, handle: Handle<Gltf>) {
        self.path = path;
        self.gltf = Some(handle);
    }

    pub fn gltf(&self) -> Option<&Handle<Gltf>> {
        self.gltf.as_ref()
    }

    pub fn root(&self) -> Option<Entity> {
        self.root
    }

    #[cfg(test)]
    pub fn with_root(root: Entity) -> Self {
        Self {
            root: Some(root),
            ..default()
        }
    }
}

/// Spawn the model's default scene once the glTF has been parsed.
pub fn spawn_scene_when_ready(
    mut loading_progress: ResMut<LoadingProgress>,
    mut scene_loader: ResMut<SceneLoader>,
    mut next_state: ResMut<NextState<AppState>>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
) {
    if !loading_progress.layout_loaded || loading_progress.model_loaded {
        return;
    }

    let Some(handle) = scene_loader.gltf.clone() else {
        return;
    };

    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(&handle) {
        let error = SceneSetupError::AssetLoad {
            path: scene_loader.path.clone(),
            reason: err.to_string(),
        };
        record_failure(&mut loading_progress, &mut next_state, error);
        return;
    }

    let Some(gltf) = gltfs.get(&handle) else {
        return;
    };

    let Some(scene) = gltf
        .default_scene
        .clone()
        .or_else(|| gltf.scenes.first().cloned())
    else {
        let error = SceneSetupError::NoScene(scene_loader.path.clone());
        record_failure(&mut loading_progress, &mut next_state, error);
        return;
    };

    info!("✓ Model `{}` loaded, spawning scene", scene_loader.path);
    let root = commands
        .spawn((Name::new("museum"), MuseumSceneRoot, SceneRoot(scene)))
        .observe(mark_scene_spawned)
        .id();

    scene_loader.root = Some(root);
    loading_progress.model_loaded = true;
}

fn mark_scene_spawned(
    _trigger: Trigger<SceneInstanceReady>,
    mut loading_progress: ResMut<LoadingProgress>,
) {
    info!("✓ Museum scene instance ready");
    loading_progress.scene_spawned = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::AssetMetaCheck;
    use bevy::state::app::StatesPlugin;
    use std::time::Duration;

    const MISSING_MODEL: &str = "models/missing.glb";

    fn model_app() -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin {
                meta_check: AssetMetaCheck::Never,
                ..default()
            },
            StatesPlugin,
        ))
        .init_asset::<Gltf>()
        .init_state::<AppState>()
        .init_resource::<LoadingProgress>()
        .init_resource::<SceneLoader>()
        .add_systems(
            Update,
            spawn_scene_when_ready.run_if(in_state(AppState::Loading)),
        );

        let handle = app.world().resource::<AssetServer>().load(MISSING_MODEL);
        app.world_mut()
            .resource_mut::<SceneLoader>()
            .request(MISSING_MODEL.to_string(), handle);
        app.world_mut().resource_mut::<LoadingProgress>().layout_loaded = true;
        app
    }

    #[test]
    fn unloadable_model_fails_the_load() {
        let mut app = model_app();

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
        assert!(!progress.model_loaded);
        let failure = progress.failure.as_deref().expect("failure recorded");
        assert!(failure.starts_with("failed to load `models/missing.glb`"), "{failure}");
        assert!(app.world().resource::<SceneLoader>().root().is_none());
    }
}
