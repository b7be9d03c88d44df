use crate::engine::assets::museum_layout::MuseumLayout;
use crate::engine::loading::progress::LoadingProgress;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    SceneSpawned,
    Running,
    /// Terminal: a content or asset error stopped setup.
    Failed,
}

/// Ordering of the per-frame walkthrough systems.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkthroughSet {
    /// Camera movement, picking and trigger contacts.
    Input,
    /// Door commands and exhibit selection.
    Dispatch,
}

// Transition to SceneSpawned state
pub fn transition_to_scene_spawned(
    loading_progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.scene_spawned && loading_progress.failure.is_none() {
        info!("→ Transitioning to SceneSpawned state");
        next_state.set(AppState::SceneSpawned);
    }
}

// Final transition to running state
pub fn transition_to_running(
    loading_progress: Res<LoadingProgress>,
    layout: Option<Res<MuseumLayout>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if !loading_progress.scene_configured || loading_progress.failure.is_some() {
        return;
    }

    let variant = layout.map(|layout| layout.name.clone()).unwrap_or_default();
    info!("→ Museum `{}` ready, transitioning to Running state", variant);
    rpc_interface.send_notification("scene_ready", serde_json::json!({ "variant": variant }));
    next_state.set(AppState::Running);
}

pub fn report_failure(loading_progress: Res<LoadingProgress>, mut rpc_interface: ResMut<WebRpcInterface>) {
    let reason = loading_progress
        .failure
        .clone()
        .unwrap_or_else(|| "unknown error".to_string());
    error!("→ Setup stopped in Failed state: {}", reason);
    rpc_interface.send_notification("scene_failed", serde_json::json!({ "reason": reason }));
}
