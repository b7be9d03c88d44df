use super::state::*;
use crate::constants::render_settings::{
    BUTTON_COLOUR, MODAL_BACKDROP_COLOUR, MODAL_BODY_FONT_SIZE, MODAL_PANEL_COLOUR,
    MODAL_TITLE_FONT_SIZE, MODAL_WIDTH,
};
use bevy::prelude::*;

// Spawns the hidden info modal: backdrop, panel, title, body and the button row
pub fn spawn_info_modal(mut commands: Commands) {
    commands
        .spawn((
            InfoModalRoot,
            Name::new("InfoModal"),
            BackgroundColor(MODAL_BACKDROP_COLOUR),
            GlobalZIndex(10),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                display: Display::None,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
        ))
        .with_children(|backdrop| {
            backdrop
                .spawn((
                    Name::new("InfoPanel"),
                    BackgroundColor(MODAL_PANEL_COLOUR),
                    BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                    Node {
                        width: Val::Px(MODAL_WIDTH),
                        max_width: Val::Percent(90.0),
                        padding: UiRect::all(Val::Px(20.0)),
                        row_gap: Val::Px(12.0),
                        border: UiRect::all(Val::Px(1.0)),
                        display: Display::Flex,
                        flex_direction: FlexDirection::Column,
                        ..default()
                    },
                ))
                .with_children(|panel| {
                    panel.spawn((
                        InfoTitleText,
                        Text::new(""),
                        TextFont { font_size: MODAL_TITLE_FONT_SIZE, ..default() },
                        TextColor(Color::srgb(1.0, 1.0, 1.0)),
                    ));
                    panel.spawn((
                        InfoBodyText,
                        Text::new(""),
                        TextFont { font_size: MODAL_BODY_FONT_SIZE, ..default() },
                        TextColor(Color::srgb(0.85, 0.85, 0.85)),
                    ));

                    panel
                        .spawn(Node {
                            width: Val::Percent(100.0),
                            column_gap: Val::Px(8.0),
                            display: Display::Flex,
                            justify_content: JustifyContent::FlexEnd,
                            ..default()
                        })
                        .with_children(|row| {
                            row.spawn((InfoLinkButton, Button, Name::new("InfoLinkButton"), BackgroundColor(BUTTON_COLOUR), button_node()))
                                .with_children(|btn| {
                                    btn.spawn((
                                        InfoLinkLabel,
                                        Text::new(""),
                                        TextFont { font_size: 16.0, ..default() },
                                        TextColor(Color::srgb(1.0, 1.0, 1.0)),
                                    ));
                                });

                            row.spawn((InfoCloseButton, Button, Name::new("InfoCloseButton"), BackgroundColor(BUTTON_COLOUR), button_node()))
                                .with_children(|btn| {
                                    btn.spawn((
                                        Text::new("Close"),
                                        TextFont { font_size: 16.0, ..default() },
                                        TextColor(Color::srgb(1.0, 1.0, 1.0)),
                                    ));
                                });
                        });
                });
        });
}

fn button_node() -> Node {
    Node {
        height: Val::Px(36.0),
        padding: UiRect::axes(Val::Px(14.0), Val::Px(0.0)),
        display: Display::Flex,
        align_items: AlignItems::Center,
        justify_content: JustifyContent::Center,
        ..default()
    }
}

/// Mirror `InfoModalState` into the modal nodes whenever it changes.
pub fn reflect_info_modal(
    modal: Res<InfoModalState>,
    mut nodes: ParamSet<(
        Query<&mut Node, With<InfoModalRoot>>,
        Query<&mut Node, With<InfoLinkButton>>,
    )>,
    mut texts: ParamSet<(
        Query<&mut Text, With<InfoTitleText>>,
        Query<&mut Text, With<InfoBodyText>>,
        Query<&mut Text, With<InfoLinkLabel>>,
    )>,
) {
    if !modal.is_changed() { return; }

    let info = modal.current();
    if let Ok(mut n) = nodes.p0().single_mut() {
        n.display = if info.is_some() { Display::Flex } else { Display::None };
    }
    if let Ok(mut n) = nodes.p1().single_mut() {
        n.display = if info.is_some_and(|i| i.link.is_some()) { Display::Flex } else { Display::None };
    }

    let Some(info) = info else { return; };
    if let Ok(mut t) = texts.p0().single_mut() {
        *t = Text::new(info.title.clone());
    }
    if let Ok(mut t) = texts.p1().single_mut() {
        *t = Text::new(info.body.clone());
    }
    if let (Some(link), Ok(mut t)) = (info.link.as_ref(), texts.p2().single_mut()) {
        *t = Text::new(link.label.clone());
    }
}
