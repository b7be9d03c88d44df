//! First-person walkthrough camera.
//!
//! WASD/arrow movement, mouse-drag look and gravity. With collisions enabled
//! the body is moved by a rapier kinematic character controller whose capsule
//! stands in for the layout's ellipsoid; its contacts feed the trigger volumes.

/// Camera spawn, collision settings and the controller systems.
pub mod first_person;
