use crate::constants::render_settings::{OVERLAY_FONT_SIZE, OVERLAY_TEXT_COLOUR};
use crate::engine::camera::first_person::FirstPersonCamera;
use crate::interaction::doors::DoorRegistry;
use bevy::prelude::*;

#[derive(Resource, Default, Debug)]
pub struct DebugOverlayState {
    pub visible: bool,
}

#[derive(Component)]
pub struct DebugOverlayRoot;
#[derive(Component)]
pub struct FpsText;
#[derive(Component)]
pub struct DebugDetailsText;

/// Ctrl+Alt+Shift+I, either side of each modifier.
pub fn is_inspector_chord(keyboard: &ButtonInput<KeyCode>) -> bool {
    keyboard.just_pressed(KeyCode::KeyI)
        && keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight])
        && keyboard.any_pressed([KeyCode::AltLeft, KeyCode::AltRight])
        && keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight])
}

pub fn toggle_debug_overlay(keyboard: Res<ButtonInput<KeyCode>>, mut state: ResMut<DebugOverlayState>) {
    if is_inspector_chord(&keyboard) {
        state.visible = !state.visible;
        info!("Debug overlay {}", if state.visible { "shown" } else { "hidden" });
    }
}

pub fn spawn_debug_overlay(commands: &mut Commands) {
    commands
        .spawn((
            DebugOverlayRoot,
            Name::new("DebugOverlay"),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                display: Display::None,
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: OVERLAY_FONT_SIZE,
                    ..default()
                },
                TextColor(OVERLAY_TEXT_COLOUR),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: OVERLAY_FONT_SIZE,
                    ..default()
                },
                TextColor(OVERLAY_TEXT_COLOUR),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                DebugDetailsText,
            ));
        });
}

pub fn reflect_debug_overlay(
    state: Res<DebugOverlayState>,
    mut roots: Query<&mut Node, With<DebugOverlayRoot>>,
) {
    if !state.is_changed() { return; }
    if let Ok(mut n) = roots.single_mut() {
        n.display = if state.visible { Display::Flex } else { Display::None };
    }
}

pub fn describe_walkthrough(eye: Vec3, doors: Option<&DoorRegistry>) -> String {
    let mut lines = vec![format!("Camera: ({:.1}, {:.1}, {:.1})", eye.x, eye.y, eye.z)];
    if let Some(doors) = doors {
        lines.extend(doors.states().map(|(id, opened)| {
            format!("{}: {}", id, if opened { "open" } else { "closed" })
        }));
    }
    lines.join("\n")
}

pub fn update_debug_details(
    state: Res<DebugOverlayState>,
    cameras: Query<&Transform, With<FirstPersonCamera>>,
    doors: Option<Res<DoorRegistry>>,
    mut texts: Query<&mut Text, With<DebugDetailsText>>,
) {
    if !state.visible { return; }
    let Ok(camera) = cameras.single() else { return; };

    let details = describe_walkthrough(camera.translation, doors.as_deref());
    for mut text in &mut texts {
        if text.0 != details {
            text.0 = details.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::museum_layout::{DoorLayout, DoorSwing};
    use bevy::ecs::system::RunSystemOnce;

    fn chord_world(keys: &[KeyCode]) -> World {
        let mut world = World::new();
        world.init_resource::<DebugOverlayState>();
        let mut keyboard = ButtonInput::<KeyCode>::default();
        for key in keys {
            keyboard.press(*key);
        }
        world.insert_resource(keyboard);
        world
    }

    #[test]
    fn full_chord_toggles_overlay() {
        let mut world = chord_world(&[
            KeyCode::ControlLeft,
            KeyCode::AltRight,
            KeyCode::ShiftLeft,
            KeyCode::KeyI,
        ]);
        world.run_system_once(toggle_debug_overlay).expect("toggle");
        assert!(world.resource::<DebugOverlayState>().visible);
    }

    #[test]
    fn partial_chord_is_ignored() {
        let mut world = chord_world(&[KeyCode::ControlLeft, KeyCode::ShiftLeft, KeyCode::KeyI]);
        world.run_system_once(toggle_debug_overlay).expect("toggle");
        assert!(!world.resource::<DebugOverlayState>().visible);
    }

    #[test]
    fn details_list_camera_and_doors() {
        let mut world = World::new();
        let leaf = world.spawn_empty().id();
        let hinge = world.spawn_empty().id();
        let mut doors = DoorRegistry::default();
        let fox = doors.register(
            &DoorLayout {
                id: "fox_door".into(),
                leaf: "Box105".into(),
                hinge: "Box106".into(),
                swing: DoorSwing::Right,
                open_on_click: true,
            },
            leaf,
            hinge,
        );
        doors.toggle(fox);

        let text = describe_walkthrough(Vec3::new(-175.0, 25.0, -45.0), Some(&doors));
        assert_eq!(text, "Camera: (-175.0, 25.0, -45.0)\nfox_door: open");
    }
}
