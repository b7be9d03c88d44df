use bevy::color::Color;

pub const OVERLAY_FONT_SIZE: f32 = 14.0;
pub const OVERLAY_TEXT_COLOUR: Color = Color::srgb(1.0, 0.0, 0.0);

pub const MODAL_WIDTH: f32 = 520.0;
pub const MODAL_TITLE_FONT_SIZE: f32 = 26.0;
pub const MODAL_BODY_FONT_SIZE: f32 = 16.0;
pub const MODAL_BACKDROP_COLOUR: Color = Color::srgba(0.0, 0.0, 0.0, 0.55);
pub const MODAL_PANEL_COLOUR: Color = Color::srgb(0.10, 0.11, 0.13);
pub const BUTTON_COLOUR: Color = Color::srgb(0.22, 0.24, 0.28);
pub const BUTTON_HOVER_COLOUR: Color = Color::srgb(0.26, 0.28, 0.32);
pub const BUTTON_PRESSED_COLOUR: Color = Color::srgb(0.18, 0.20, 0.24);

/// Seconds between FPS notifications pushed to the host page.
pub const FPS_NOTIFICATION_INTERVAL: f32 = 0.5;

pub const AMBIENT_BRIGHTNESS: f32 = 600.0;
