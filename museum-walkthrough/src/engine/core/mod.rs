//! Core application setup and state management.
//!
//! Handles application lifecycle, variant selection, window configuration,
//! state transitions and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with asset loading systems, the walkthrough runtime
/// and platform-specific configurations.
pub mod app_setup;

/// Application state machine and loading progress transitions.
///
/// Moves from layout/model loading through scene configuration to runtime, or to `Failed`.
pub mod app_state;

/// Museum variant selection from the environment (native) or URL query (WASM).
pub mod launch_config;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
