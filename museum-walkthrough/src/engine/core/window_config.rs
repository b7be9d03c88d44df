use bevy::prelude::*;
use bevy::window::PresentMode;

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        use crate::constants::path::CANVAS_SELECTOR;

        Window {
            title: "Museum Walkthrough".into(),
            canvas: Some(CANVAS_SELECTOR.into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: false,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Museum Walkthrough".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
