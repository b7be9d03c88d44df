use crate::constants::animation::{
    DOOR_ANIMATION_FPS, DOOR_ANIMATION_FRAMES, DOOR_HINGE_TARGET, DOOR_LEAF_TARGET,
    DOOR_OPEN_ANGLE,
};
use crate::engine::animation::swing::SwingAngle;
use crate::engine::assets::museum_layout::{DoorLayout, DoorSwing};
use crate::engine::error::SceneSetupError;
use crate::interaction::dispatch::InteractionSource;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::animation::animation_curves::{AnimatableCurve, AnimatableKeyframeCurve};
use bevy::animation::graph::{AnimationGraph, AnimationGraphHandle, AnimationNodeIndex};
use bevy::animation::{AnimationClip, AnimationPlayer, AnimationTarget, AnimationTargetId, animated_field};
use bevy::prelude::*;
use std::collections::HashMap;

/// Index of a door in the `DoorRegistry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoorId(pub usize);

/// Explicit per-door state. `opened` always matches the last clip started.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorRecord {
    pub id: String,
    pub swing: DoorSwing,
    pub leaf: Entity,
    pub hinge: Entity,
    pub open_on_click: bool,
    pub opened: bool,
}

/// State change to play on a door's leaf player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorMotion {
    pub door: DoorId,
    pub opened: bool,
    pub leaf: Entity,
}

pub fn leaf_target() -> AnimationTargetId {
    AnimationTargetId::from_name(&Name::new(DOOR_LEAF_TARGET))
}

pub fn hinge_target() -> AnimationTargetId {
    AnimationTargetId::from_name(&Name::new(DOOR_HINGE_TARGET))
}

/// Recipe for the four canned door rotations about local Z.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct DoorClips {
    duration: f32,
    open_angle: f32,
}

impl DoorClips {
    pub fn new(fps: f32, frames: f32, open_angle: f32) -> Self {
        Self {
            duration: frames / fps,
            open_angle,
        }
    }

    pub fn clip_name(swing: DoorSwing, opening: bool) -> &'static str {
        match (swing, opening) {
            (DoorSwing::Left, true) => "left_door_open",
            (DoorSwing::Left, false) => "left_door_close",
            (DoorSwing::Right, true) => "right_door_open",
            (DoorSwing::Right, false) => "right_door_close",
        }
    }

    /// Swing angle over time: closed is 0, open is the signed open angle.
    pub fn curve(
        &self,
        swing: DoorSwing,
        opening: bool,
    ) -> Result<AnimatableKeyframeCurve<f32>, SceneSetupError> {
        let open = match swing {
            DoorSwing::Left => -self.open_angle,
            DoorSwing::Right => self.open_angle,
        };
        let (from, to) = if opening { (0.0, open) } else { (open, 0.0) };

        AnimatableKeyframeCurve::new([(0.0, from), (self.duration, to)]).map_err(|err| {
            SceneSetupError::DoorAnimation {
                clip: Self::clip_name(swing, opening).to_string(),
                reason: err.to_string(),
            }
        })
    }

    /// One clip moving leaf and hinge through the same key-set.
    pub fn clip(&self, swing: DoorSwing, opening: bool) -> Result<AnimationClip, SceneSetupError> {
        let curve = self.curve(swing, opening)?;
        let mut clip = AnimationClip::default();
        for target in [leaf_target(), hinge_target()] {
            clip.add_curve_to_target(
                target,
                AnimatableCurve::new(animated_field!(SwingAngle::radians), curve.clone()),
            );
        }
        Ok(clip)
    }

    /// Add the four clips and one graph per swing direction.
    pub fn build_graphs(
        &self,
        clips: &mut Assets<AnimationClip>,
        graphs: &mut Assets<AnimationGraph>,
    ) -> Result<DoorGraphs, SceneSetupError> {
        let mut graph_for = |swing: DoorSwing| -> Result<DoorAnimations, SceneSetupError> {
            let open = clips.add(self.clip(swing, true)?);
            let close = clips.add(self.clip(swing, false)?);
            let (graph, nodes) = AnimationGraph::from_clips([open, close]);
            Ok(DoorAnimations {
                graph: graphs.add(graph),
                open: nodes[0],
                close: nodes[1],
            })
        };

        Ok(DoorGraphs {
            left: graph_for(DoorSwing::Left)?,
            right: graph_for(DoorSwing::Right)?,
        })
    }
}

impl Default for DoorClips {
    fn default() -> Self {
        Self::new(DOOR_ANIMATION_FPS, DOOR_ANIMATION_FRAMES, DOOR_OPEN_ANGLE)
    }
}

/// Graph and node indices a door leaf plays from.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct DoorAnimations {
    pub graph: Handle<AnimationGraph>,
    pub open: AnimationNodeIndex,
    pub close: AnimationNodeIndex,
}

impl DoorAnimations {
    pub fn node(&self, opening: bool) -> AnimationNodeIndex {
        if opening { self.open } else { self.close }
    }
}

#[derive(Debug, Clone)]
pub struct DoorGraphs {
    pub left: DoorAnimations,
    pub right: DoorAnimations,
}

impl DoorGraphs {
    pub fn for_swing(&self, swing: DoorSwing) -> &DoorAnimations {
        match swing {
            DoorSwing::Left => &self.left,
            DoorSwing::Right => &self.right,
        }
    }
}

/// Make a registered door animatable: the leaf gets the player, the hinge
/// follows it.
pub fn attach_door_animation(commands: &mut Commands, record: &DoorRecord, graphs: &DoorGraphs) {
    let animations = graphs.for_swing(record.swing).clone();
    commands.entity(record.hinge).insert((
        SwingAngle::default(),
        AnimationTarget {
            id: hinge_target(),
            player: record.leaf,
        },
    ));
    commands.entity(record.leaf).insert((
        SwingAngle::default(),
        AnimationTarget {
            id: leaf_target(),
            player: record.leaf,
        },
        AnimationPlayer::default(),
        AnimationGraphHandle(animations.graph.clone()),
        animations,
    ));
}

/// Every door of the loaded variant, plus the leaf entity → door table used by picking.
#[derive(Resource, Debug, Clone, Default)]
pub struct DoorRegistry {
    doors: Vec<DoorRecord>,
    by_leaf: HashMap<Entity, DoorId>,
}

impl DoorRegistry {
    pub fn register(&mut self, layout: &DoorLayout, leaf: Entity, hinge: Entity) -> DoorId {
        let door = DoorId(self.doors.len());
        self.doors.push(DoorRecord {
            id: layout.id.clone(),
            swing: layout.swing,
            leaf,
            hinge,
            open_on_click: layout.open_on_click,
            opened: false,
        });
        // Hinges animate but are not clickable.
        self.by_leaf.insert(leaf, door);
        door
    }

    /// Door whose leaf is `entity`.
    pub fn lookup(&self, entity: Entity) -> Option<DoorId> {
        self.by_leaf.get(&entity).copied()
    }

    pub fn find(&self, id: &str) -> Option<DoorId> {
        self.doors
            .iter()
            .position(|record| record.id == id)
            .map(DoorId)
    }

    pub fn get(&self, door: DoorId) -> Option<&DoorRecord> {
        self.doors.get(door.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DoorRecord> {
        self.doors.iter()
    }

    pub fn len(&self) -> usize {
        self.doors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    /// Flip the door. `None` for an unknown id.
    pub fn toggle(&mut self, door: DoorId) -> Option<DoorMotion> {
        let record = self.doors.get_mut(door.0)?;
        record.opened = !record.opened;
        Some(Self::motion(door, record))
    }

    /// Open a closed door. Already open doors are left alone.
    pub fn open(&mut self, door: DoorId) -> Option<DoorMotion> {
        let record = self.doors.get_mut(door.0)?;
        if record.opened {
            return None;
        }
        record.opened = true;
        Some(Self::motion(door, record))
    }

    pub fn states(&self) -> impl Iterator<Item = (&str, bool)> {
        self.doors
            .iter()
            .map(|record| (record.id.as_str(), record.opened))
    }

    fn motion(door: DoorId, record: &DoorRecord) -> DoorMotion {
        DoorMotion {
            door,
            opened: record.opened,
            leaf: record.leaf,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorAction {
    Toggle,
    Open,
}

/// Request to move a door, from a click, a trigger volume or the host page.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorCommand {
    pub door: DoorId,
    pub action: DoorAction,
    pub source: InteractionSource,
}

/// Apply door commands and play the matching clip on the door's leaf player.
pub fn apply_door_commands(
    mut events: EventReader<DoorCommand>,
    registry: Option<ResMut<DoorRegistry>>,
    mut players: Query<(&mut AnimationPlayer, &DoorAnimations)>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let Some(mut registry) = registry else {
        events.clear();
        return;
    };

    for event in events.read() {
        let motion = match event.action {
            DoorAction::Toggle => registry.toggle(event.door),
            DoorAction::Open => registry.open(event.door),
        };
        let Some(motion) = motion else {
            continue;
        };
        let Some(record) = registry.get(motion.door) else {
            continue;
        };

        match players.get_mut(motion.leaf) {
            Ok((mut player, animations)) => {
                // Restarting an in-flight swing replaces it from the first key.
                player.stop_all();
                player.play(animations.node(motion.opened)).replay();
                debug!(
                    "Playing `{}` on {:?}",
                    DoorClips::clip_name(record.swing, motion.opened),
                    motion.leaf
                );
            }
            Err(_) => warn!("Door `{}` has no animation player", record.id),
        }

        info!(
            "Door `{}` {} via {:?}",
            record.id,
            if motion.opened { "opening" } else { "closing" },
            event.source
        );
        rpc_interface.send_notification(
            "door_toggled",
            serde_json::json!({
                "door": record.id,
                "opened": motion.opened,
            }),
        );
    }
}
