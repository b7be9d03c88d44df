use super::state::*;
use crate::constants::render_settings::{BUTTON_COLOUR, BUTTON_HOVER_COLOUR, BUTTON_PRESSED_COLOUR};
use bevy::prelude::*;

// Close button hides the modal
pub fn close_button_interaction(
    mut q: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>, With<InfoCloseButton>)>,
    mut modal: ResMut<InfoModalState>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => { modal.close(); *bg = BackgroundColor(BUTTON_PRESSED_COLOUR); }
            Interaction::Hovered => *bg = BackgroundColor(BUTTON_HOVER_COLOUR),
            Interaction::None    => *bg = BackgroundColor(BUTTON_COLOUR),
        }
    }
}

// Link button opens the current exhibit's link
pub fn link_button_interaction(
    mut q: Query<(&Interaction, &mut BackgroundColor), (Changed<Interaction>, With<Button>, With<InfoLinkButton>)>,
    modal: Res<InfoModalState>,
) {
    for (interaction, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                if let Some(link) = modal.current().and_then(|info| info.link.as_ref()) {
                    open_external_link(&link.url);
                }
                *bg = BackgroundColor(BUTTON_PRESSED_COLOUR);
            }
            Interaction::Hovered => *bg = BackgroundColor(BUTTON_HOVER_COLOUR),
            Interaction::None    => *bg = BackgroundColor(BUTTON_COLOUR),
        }
    }
}

pub fn close_info_on_escape(keyboard: Res<ButtonInput<KeyCode>>, mut modal: ResMut<InfoModalState>) {
    if keyboard.just_pressed(KeyCode::Escape) && modal.is_open() {
        modal.close();
    }
}

/// Open `url` in a new browser tab. Native builds only log it.
pub fn open_external_link(url: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        let opened = web_sys::window()
            .map(|window| window.open_with_url_and_target(url, "_blank"));
        match opened {
            Some(Ok(_)) => info!("Opened exhibit link {}", url),
            Some(Err(e)) => error!("Failed to open exhibit link {}: {:?}", url, e),
            None => error!("Window object not available"),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        info!("Exhibit link: {}", url);
    }
}
