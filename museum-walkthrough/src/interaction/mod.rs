//! Interactive behaviour of the museum: doors, trigger volumes and exhibits.
//!
//! Every interaction is resolved through explicit tables built once the scene
//! is configured. Door state lives in one record per door. Door leaves and
//! exhibit meshes map straight to what they belong to; hinges are animated
//! but never clicked.
//!
//! ## Dispatch Flow
//!
//! ```text
//! Pointer-down                     Camera collision
//!   └─> pick_on_pointer_down()       └─> handle_trigger_collisions()
//!       └─> resolve_target()             ├─> ColliderDisabled (fires once)
//!           ├─> DoorCommand::Toggle      └─> DoorCommand::Open per linked door
//!           └─> ExhibitSelected
//!
//! DoorCommand
//!   └─> apply_door_commands()
//!       ├─> DoorRegistry flips the per-door boolean
//!       ├─> leaf AnimationPlayer replays the open/close node
//!       └─> door_toggled notification
//! ```
//!
//! ## Door Animation
//! - Four shared one-second clips (30 frames at 30 fps) about the mesh's local Z axis
//! - Left doors swing `0 → −90°`, right doors `0 → +90°`; closing plays the reverse
//! - Re-triggering mid-swing restarts from the first key

/// Pointer picking and hit → door/exhibit resolution.
pub mod dispatch;

/// Door records, canned clips and the command system.
pub mod doors;

/// Info modal and exhibit selection.
pub mod exhibits;

/// One-shot trigger volumes that open doors on contact.
pub mod triggers;
