//! Runtime diagnostics: FPS reporting and the hidden debug overlay.

/// Inspector chord toggle and overlay text (FPS, camera position, door states).
pub mod debug_overlay;

/// FPS text updates and periodic `fps_update` notifications.
pub mod fps_tracking;
