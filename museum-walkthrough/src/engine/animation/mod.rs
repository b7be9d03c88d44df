//! Door swing animation on top of Bevy's animation player.
//!
//! Door clips do not animate `Transform` directly. They animate a
//! [`swing::SwingAngle`] on the leaf and the hinge, and
//! [`swing::pose_swinging_meshes`] turns that angle into a rotation about the
//! mesh's local Z axis, relative to the rotation the mesh was authored with.
//! Leaf and hinge therefore share one key-set even when their rest poses differ.
//!
//! ## Frame Order
//!
//! ```text
//! PostUpdate
//!   ├─> bevy::animation::Animation      (player samples SwingAngle)
//!   ├─> pose_swinging_meshes()          (SwingAngle → Transform::rotation)
//!   └─> TransformPropagate
//! ```

/// Swing angle component, rest pose and the posing system.
pub mod swing;
