use std::f32::consts::FRAC_PI_2;

/// Keyframe rate of the canned door rotations.
pub const DOOR_ANIMATION_FPS: f32 = 30.0;

/// Last keyframe of every door rotation, so a swing lasts one second.
pub const DOOR_ANIMATION_FRAMES: f32 = 30.0;

/// Rotation of a fully opened door leaf. Left doors swing negative, right doors positive.
pub const DOOR_OPEN_ANGLE: f32 = FRAC_PI_2;

/// Animation target names shared by every door. Each door's leaf owns the
/// player, so the same clips drive all of them.
pub const DOOR_LEAF_TARGET: &str = "door_leaf";
pub const DOOR_HINGE_TARGET: &str = "door_hinge";
