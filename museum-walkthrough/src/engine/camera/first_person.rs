use crate::constants::camera::{
    CONTROLLER_SKIN, FIELD_OF_VIEW, GRAVITY_REFERENCE_FPS, GROUND_SNAP, MAX_FRAME_DELTA, MAX_PITCH,
    NEAR_PLANE,
};
use crate::engine::assets::museum_layout::CameraLayout;
use bevy::input::mouse::MouseMotion;
use bevy::math::EulerRot;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{
    CharacterLength, Collider, KinematicCharacterController, KinematicCharacterControllerOutput,
};

/// Look and walk state of the walkthrough camera. Lives on the body entity,
/// whose translation is the eye position.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct FirstPersonCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub look_sensitivity: f32,
}

/// The rendering camera, a child of the body. Only its rotation changes.
#[derive(Component, Debug)]
pub struct WalkthroughEye;

/// Collision ellipsoid and gravity flags. Fixed when the camera is spawned;
/// there are no setters.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CollisionSettings {
    ellipsoid: Vec3,
    check_collisions: bool,
    apply_gravity: bool,
    gravity: Vec3,
}

/// The camera body touched a collider this frame.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraCollisionEvent {
    pub entity: Entity,
}

impl CollisionSettings {
    pub fn from_layout(layout: &CameraLayout) -> Self {
        Self {
            ellipsoid: Vec3::from(layout.ellipsoid).max(Vec3::splat(f32::EPSILON)),
            check_collisions: layout.check_collisions,
            apply_gravity: layout.apply_gravity,
            gravity: Vec3::from(layout.gravity),
        }
    }

    pub fn check_collisions(&self) -> bool {
        self.check_collisions
    }

    pub fn apply_gravity(&self) -> bool {
        self.apply_gravity
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Capsule standing in for the ellipsoid: horizontal radius from the wider
    /// of x/z, total height twice the vertical radius.
    pub fn capsule(&self) -> (f32, f32) {
        let radius = self.ellipsoid.x.max(self.ellipsoid.z).min(self.ellipsoid.y);
        let half_height = (self.ellipsoid.y - radius).max(0.0);
        (half_height, radius)
    }

    /// Offset from the eye down to the shape centre. The eye sits on top.
    pub fn shape_offset(&self) -> Vec3 {
        Vec3::NEG_Y * self.ellipsoid.y
    }

    pub fn character_controller(&self) -> KinematicCharacterController {
        let (half_height, radius) = self.capsule();
        KinematicCharacterController {
            custom_shape: Some((
                Collider::capsule_y(half_height, radius),
                self.shape_offset(),
                Quat::IDENTITY,
            )),
            up: Vec3::Y,
            offset: CharacterLength::Absolute(CONTROLLER_SKIN),
            snap_to_ground: Some(CharacterLength::Absolute(GROUND_SNAP)),
            slide: true,
            ..default()
        }
    }
}

/// Spawn the camera body at the layout's eye position, with the rendering
/// camera as its child. Returns the body.
pub fn spawn_walkthrough_camera(commands: &mut Commands, layout: &CameraLayout) -> Entity {
    let settings = CollisionSettings::from_layout(layout);

    let mut body = commands.spawn((
        Name::new("camera_body"),
        Transform::from_translation(Vec3::from(layout.position)),
        Visibility::default(),
        FirstPersonCamera {
            yaw: layout.yaw,
            pitch: 0.0,
            speed: layout.speed,
            look_sensitivity: layout.look_sensitivity,
        },
        settings,
    ));
    if settings.check_collisions() {
        body.insert(settings.character_controller());
    }

    body.with_children(|parent| {
        parent.spawn((
            Name::new("main_camera"),
            WalkthroughEye,
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                fov: FIELD_OF_VIEW,
                near: NEAR_PLANE,
                ..default()
            }),
            Transform::from_rotation(Quat::from_rotation_y(layout.yaw)),
        ));
    })
    .id()
}

/// Unit walk direction on the ground plane from WASD / arrow keys.
pub fn walk_direction(keyboard: &ButtonInput<KeyCode>, yaw: f32) -> Vec3 {
    let heading = Quat::from_rotation_y(yaw);
    let forward = heading * Vec3::NEG_Z;
    let right = heading * Vec3::X;

    let mut wish = Vec3::ZERO;
    if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) { wish += forward; }
    if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) { wish -= forward; }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) { wish += right; }
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) { wish -= right; }

    wish.normalize_or_zero()
}

/// Walk plus gravity for one frame.
///
/// Gravity is a per-frame displacement authored at `GRAVITY_REFERENCE_FPS` and
/// only joins a move: a camera that is not walking stays where it is.
pub fn frame_displacement(wish: Vec3, speed: f32, settings: &CollisionSettings, delta: f32) -> Vec3 {
    let mut displacement = wish * speed * delta;
    if settings.apply_gravity() && wish != Vec3::ZERO {
        displacement += settings.gravity() * delta * GRAVITY_REFERENCE_FPS;
    }
    displacement
}

pub fn first_person_controller(
    mut bodies: Query<(
        &mut Transform,
        &mut FirstPersonCamera,
        &CollisionSettings,
        Option<&mut KinematicCharacterController>,
    )>,
    mut eyes: Query<&mut Transform, (With<WalkthroughEye>, Without<FirstPersonCamera>)>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    time: Res<Time>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    let Ok((mut transform, mut camera, settings, controller)) = bodies.single_mut() else {
        return;
    };

    // Drag to look
    if mouse_button.any_pressed([MouseButton::Left, MouseButton::Right]) && mouse_delta != Vec2::ZERO {
        let sensitivity = camera.look_sensitivity;
        camera.yaw -= mouse_delta.x * sensitivity;
        camera.pitch = (camera.pitch - mouse_delta.y * sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }
    let look = Quat::from_euler(EulerRot::YXZ, camera.yaw, camera.pitch, 0.0);
    for mut eye in &mut eyes {
        eye.rotation = look;
    }

    let delta = time.delta_secs().min(MAX_FRAME_DELTA);
    let wish = walk_direction(&keyboard, camera.yaw);
    let displacement = frame_displacement(wish, camera.speed, settings, delta);

    match controller {
        // The physics step moves the body and reports contacts.
        Some(mut controller) => {
            controller.translation = (displacement != Vec3::ZERO).then_some(displacement);
        }
        None => transform.translation += displacement,
    }
}

/// Every collider hit at most once, in contact order.
pub fn unique_contacts(hits: impl IntoIterator<Item = Entity>) -> Vec<Entity> {
    let mut contacts: Vec<Entity> = Vec::new();
    for hit in hits {
        if !contacts.contains(&hit) {
            contacts.push(hit);
        }
    }
    contacts
}

/// Forward the character controller's contacts from the last physics step.
pub fn report_camera_collisions(
    outputs: Query<&KinematicCharacterControllerOutput, (With<FirstPersonCamera>, Changed<KinematicCharacterControllerOutput>)>,
    mut collisions: EventWriter<CameraCollisionEvent>,
) {
    for output in &outputs {
        for entity in unique_contacts(output.collisions.iter().map(|hit| hit.entity)) {
            collisions.write(CameraCollisionEvent { entity });
        }
    }
}
