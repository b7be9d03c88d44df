use crate::constants::camera::PICK_DISTANCE;
use crate::engine::camera::first_person::WalkthroughEye;
use crate::interaction::doors::{DoorAction, DoorCommand, DoorId, DoorRegistry};
use crate::interaction::exhibits::{ExhibitId, ExhibitRegistry, ExhibitSelected, InfoModalState};
use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Where an interaction came from, for logging and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionSource {
    Pointer,
    Trigger,
    Rpc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionTarget {
    Door(DoorId),
    Exhibit(ExhibitId),
}

/// Resolve a picked entity to what it belongs to by walking up the hierarchy.
///
/// Picks land on primitive entities; doors and exhibits are registered on the
/// named node above them. The walk stops at the first registered entity. Door
/// parts that only open from triggers resolve to nothing.
pub fn resolve_target(
    hit: Entity,
    parent_of: impl Fn(Entity) -> Option<Entity>,
    doors: Option<&DoorRegistry>,
    exhibits: Option<&ExhibitRegistry>,
) -> Option<InteractionTarget> {
    let mut current = Some(hit);
    while let Some(entity) = current {
        if let Some(doors) = doors {
            if let Some(door) = doors.lookup(entity) {
                let clickable = doors.get(door).is_some_and(|record| record.open_on_click);
                return clickable.then_some(InteractionTarget::Door(door));
            }
        }
        if let Some(exhibit) = exhibits.and_then(|registry| registry.lookup(entity)) {
            return Some(InteractionTarget::Exhibit(exhibit));
        }
        current = parent_of(entity);
    }
    None
}

/// Clicks reach the scene only while no UI element claims the pointer.
pub fn pointer_reaches_scene<'a>(
    modal: &InfoModalState,
    interactions: impl IntoIterator<Item = &'a Interaction>,
) -> bool {
    !modal.is_open() && interactions.into_iter().all(|i| *i == Interaction::None)
}

/// Closest visible mesh along `ray` within pick range.
pub fn closest_pick(ray_cast: &mut MeshRayCast, ray: Ray3d) -> Option<Entity> {
    let settings = MeshRayCastSettings::default().with_visibility(RayCastVisibility::Visible);
    ray_cast
        .cast_ray(ray, &settings)
        .iter()
        .filter(|(_, hit)| hit.distance <= PICK_DISTANCE)
        .min_by(|a, b| a.1.distance.total_cmp(&b.1.distance))
        .map(|(entity, _)| *entity)
}

/// Pointer-down picking: closest visible mesh under the cursor, dispatched to
/// its door or exhibit.
pub fn pick_on_pointer_down(
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<WalkthroughEye>>,
    mut ray_cast: MeshRayCast,
    parents: Query<&ChildOf>,
    ui_elements: Query<&Interaction>,
    doors: Option<Res<DoorRegistry>>,
    exhibits: Option<Res<ExhibitRegistry>>,
    modal: Res<InfoModalState>,
    mut door_commands: EventWriter<DoorCommand>,
    mut exhibit_events: EventWriter<ExhibitSelected>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }

    // UI owns the click
    if !pointer_reaches_scene(&modal, &ui_elements) {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };

    let Some(hit) = closest_pick(&mut ray_cast, ray) else {
        return;
    };

    let target = resolve_target(
        hit,
        |entity| parents.get(entity).ok().map(|child_of| child_of.parent()),
        doors.as_deref(),
        exhibits.as_deref(),
    );

    match target {
        Some(InteractionTarget::Door(door)) => {
            door_commands.write(DoorCommand {
                door,
                action: DoorAction::Toggle,
                source: InteractionSource::Pointer,
            });
        }
        Some(InteractionTarget::Exhibit(exhibit)) => {
            exhibit_events.write(ExhibitSelected {
                exhibit,
                source: InteractionSource::Pointer,
            });
        }
        None => debug!("Pointer hit {:?} has no interaction", hit),
    }
}
