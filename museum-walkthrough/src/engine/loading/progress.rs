use crate::engine::core::app_state::AppState;
use bevy::prelude::*;
use std::fmt::Display;

#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub layout_loaded: bool,
    pub model_loaded: bool,
    pub scene_spawned: bool,
    pub scene_configured: bool,
    pub failure: Option<String>,
}

/// Record a fatal loading error and stop the pipeline.
pub fn record_failure(
    progress: &mut LoadingProgress,
    next_state: &mut NextState<AppState>,
    error: impl Display,
) {
    let message = error.to_string();
    error!("Museum setup failed: {}", message);
    progress.failure = Some(message);
    next_state.set(AppState::Failed);
}
