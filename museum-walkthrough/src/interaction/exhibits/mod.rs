//! Clickable exhibits and the information modal.
//!
//! An exhibit is a named mesh paired with a fixed title/body/link triple from
//! the layout. Clicking the mesh (or a `show_exhibit` RPC) shows that triple in
//! a modal overlay; nothing else is stored.
//!
//! ## Modal Flow
//!
//! ```text
//! pointer-down on exhibit / show_exhibit RPC
//!   └─> ExhibitSelected
//!       └─> show_selected_exhibits()
//!           ├─> InfoModalState::show()   (revision bumps on every show)
//!           ├─> exhibit_selected notification
//!           └─> reflect_info_modal() redraws the overlay
//! ```
//!
//! The close button, Escape and the `close_info` RPC all hide the modal. While
//! it is open, clicks are not forwarded to the scene.

/// Close and link button handlers plus the Escape shortcut.
pub mod interactions;

/// Exhibit registry, modal state and the selection event.
pub mod state;

/// Modal spawning and state reflection.
pub mod ui;

use bevy::prelude::*;

pub use state::{ExhibitId, ExhibitRegistry, ExhibitSelected, InfoModalState};

use interactions::{close_button_interaction, close_info_on_escape, link_button_interaction};
use state::show_selected_exhibits;
use ui::{reflect_info_modal, spawn_info_modal};

// Registers the info modal, its state and its systems.
pub struct ExhibitsPlugin;

impl Plugin for ExhibitsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InfoModalState>()
            .add_event::<ExhibitSelected>()
            .add_systems(Startup, spawn_info_modal)
            .add_systems(
                Update,
                (
                    show_selected_exhibits,
                    close_button_interaction,
                    link_button_interaction,
                    close_info_on_escape,
                    reflect_info_modal,
                )
                    .chain(),
            );
    }
}
