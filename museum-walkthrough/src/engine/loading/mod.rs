//! Startup loading pipeline for the museum scene.
//!
//! Layout manifest first, then the glTF model it names, then the one-time
//! scene configuration that wires collision flags and interaction tables.

/// Layout manifest loading, camera and light spawn once it parses.
pub mod layout_loader;

/// Loading progress tracking resource for state transitions.
pub mod progress;

/// glTF model loading and scene instance spawning.
pub mod scene_loader;

/// One-time scene configuration: colliders, hidden meshes, materials and interaction tables.
pub mod scene_setup;
