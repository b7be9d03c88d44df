use crate::engine::camera::first_person::CameraCollisionEvent;
use crate::interaction::dispatch::InteractionSource;
use crate::interaction::doors::{DoorAction, DoorCommand, DoorId};
use bevy::prelude::*;
use bevy_rapier3d::prelude::ColliderDisabled;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct TriggerRecord {
    pub mesh: String,
    pub doors: Vec<DoorId>,
    /// Collider-bearing mesh entities making up the volume.
    pub parts: Vec<Entity>,
    pub fired: bool,
}

/// Invisible trigger volumes, keyed by every collider entity they own.
#[derive(Resource, Debug, Clone, Default)]
pub struct TriggerRegistry {
    triggers: Vec<TriggerRecord>,
    by_part: HashMap<Entity, usize>,
}

impl TriggerRegistry {
    pub fn register(&mut self, mesh: &str, doors: Vec<DoorId>, parts: Vec<Entity>) {
        let index = self.triggers.len();
        for part in &parts {
            self.by_part.insert(*part, index);
        }
        self.triggers.push(TriggerRecord {
            mesh: mesh.to_string(),
            doors,
            parts,
            fired: false,
        });
    }

    /// Mark the trigger owning `part` as fired. Returns it only the first time.
    pub fn fire(&mut self, part: Entity) -> Option<&TriggerRecord> {
        let index = *self.by_part.get(&part)?;
        let trigger = self.triggers.get_mut(index)?;
        if trigger.fired {
            return None;
        }
        trigger.fired = true;
        Some(trigger)
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

/// Camera touched a trigger volume: switch its collision off and open its doors.
pub fn handle_trigger_collisions(
    mut collisions: EventReader<CameraCollisionEvent>,
    registry: Option<ResMut<TriggerRegistry>>,
    mut commands: Commands,
    mut door_commands: EventWriter<DoorCommand>,
) {
    let Some(mut registry) = registry.filter(|registry| !registry.is_empty()) else {
        collisions.clear();
        return;
    };

    for collision in collisions.read() {
        let Some(trigger) = registry.fire(collision.entity) else {
            continue;
        };

        info!("Trigger `{}` fired", trigger.mesh);
        for part in &trigger.parts {
            commands.entity(*part).insert(ColliderDisabled);
        }
        for door in &trigger.doors {
            door_commands.write(DoorCommand {
                door: *door,
                action: DoorAction::Open,
                source: InteractionSource::Trigger,
            });
        }
    }
}
