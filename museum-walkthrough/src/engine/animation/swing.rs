use bevy::prelude::*;

/// Authored rotation of an animated mesh. Swing angles rotate relative to it.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct RestRotation(pub Quat);

/// Angle about the local Z axis, written by the door animation clips.
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct SwingAngle {
    pub radians: f32,
}

pub fn posed_rotation(rest: Quat, radians: f32) -> Quat {
    rest * Quat::from_rotation_z(radians)
}

/// Pose every mesh whose swing angle the animation player just moved.
pub fn pose_swinging_meshes(
    mut swinging: Query<(&SwingAngle, &RestRotation, &mut Transform), Changed<SwingAngle>>,
) {
    for (angle, rest, mut transform) in &mut swinging {
        transform.rotation = posed_rotation(rest.0, angle.radians);
    }
}
