/// Eye position the walkthrough starts from.
pub const START_POSITION: [f32; 3] = [-175.0, 25.0, -45.0];

/// Initial heading in radians, facing into the entrance hall.
pub const START_YAW: f32 = 1.57;

/// Collision ellipsoid radii. The eye sits on top of the ellipsoid.
pub const ELLIPSOID_RADII: [f32; 3] = [5.0, 12.5, 5.0];

/// Gravity displacement added once per frame at `GRAVITY_REFERENCE_FPS`.
pub const GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Frame rate the per-frame gravity displacement is authored against. Other
/// frame rates scale it so the fall speed stays the same.
pub const GRAVITY_REFERENCE_FPS: f32 = 60.0;

pub const WALK_SPEED: f32 = 40.0;
pub const LOOK_SENSITIVITY: f32 = 0.004;
pub const MAX_PITCH: f32 = 1.55;

/// Frame delta cap so a stalled frame cannot launch the camera through a wall.
pub const MAX_FRAME_DELTA: f32 = 0.05;

/// Gap the character controller keeps between the camera capsule and geometry.
pub const CONTROLLER_SKIN: f32 = 0.1;

/// Steps down this tall are followed instead of falling off them.
pub const GROUND_SNAP: f32 = 2.0;

/// Typical object size in scene units, handed to the physics solver tolerances.
pub const PHYSICS_LENGTH_UNIT: f32 = 10.0;

pub const PICK_DISTANCE: f32 = 2000.0;

pub const NEAR_PLANE: f32 = 0.5;
pub const FIELD_OF_VIEW: f32 = 0.8;
