//! Compile-time settings shared across the walkthrough.

/// Door animation timing and swing angles.
pub mod animation;

/// First-person camera defaults used when a layout omits a value.
pub mod camera;

/// Asset locations and variant selection keys.
pub mod path;

/// Overlay styling and diagnostic intervals.
pub mod render_settings;
