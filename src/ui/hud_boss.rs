//! UI domain: boss health bar UI.

use bevy::prelude::*;

use crate::boss::{BossHealthChanged, BossHealthVisibility, BossLifecycle};

const BOSS_HEALTHBAR_WIDTH: f32 = 400.0;
const BOSS_HEALTHBAR_HEIGHT: f32 = 24.0;
const BOSS_HEALTHBAR_BOTTOM: f32 = 40.0;

/// Marker for the boss health bar UI container
#[derive(Component)]
pub struct BossHealthBarUI {
    pub owner: Entity,
}

/// Marker for the boss health bar fill element
#[derive(Component)]
pub struct BossHealthBarFill {
    pub owner: Entity,
}

/// Marker for boss name label
#[derive(Component)]
pub struct BossNameLabel {
    pub owner: Entity,
}

/// Bar colour for a phase: deeper and darker as the fight progresses.
pub fn phase_color(phase_index: usize) -> Color {
    match phase_index {
        0 => Color::srgb(0.8, 0.1, 0.1),
        1 => Color::srgb(0.9, 0.4, 0.1),
        _ => Color::srgb(0.6, 0.0, 0.0),
    }
}

/// Fill fraction for a health reading; an empty max shows an empty bar.
pub fn fill_percent(current: u32, max: u32) -> f32 {
    if max == 0 {
        return 0.0;
    }
    (current as f32 / max as f32).clamp(0.0, 1.0) * 100.0
}

/// Spawn a hidden bar for every new boss. It is revealed when the boss's
/// intro starts.
pub(crate) fn spawn_boss_healthbar(
    mut commands: Commands,
    boss_query: Query<(Entity, &BossLifecycle), Added<BossLifecycle>>,
    existing_bars: Query<&BossHealthBarFill>,
) {
    for (boss_entity, lifecycle) in &boss_query {
        // Check if this boss already has a health bar
        let has_bar = existing_bars.iter().any(|bar| bar.owner == boss_entity);
        if has_bar {
            continue;
        }

        // Spawn boss health bar UI at bottom center of screen
        commands
            .spawn((
                BossHealthBarUI { owner: boss_entity },
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(BOSS_HEALTHBAR_BOTTOM),
                    left: Val::Percent(50.0),
                    margin: UiRect::left(Val::Px(-BOSS_HEALTHBAR_WIDTH / 2.0)),
                    width: Val::Px(BOSS_HEALTHBAR_WIDTH),
                    height: Val::Px(BOSS_HEALTHBAR_HEIGHT),
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::Start,
                    border: UiRect::all(Val::Px(2.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.05, 0.05, 0.05, 0.9)),
                BorderColor::all(Color::srgb(0.6, 0.1, 0.1)),
                Visibility::Hidden,
            ))
            .with_children(|parent| {
                // Starts empty; the intro fills it
                parent.spawn((
                    BossHealthBarFill { owner: boss_entity },
                    Node {
                        width: Val::Percent(0.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(phase_color(0)),
                ));
            });

        // Spawn boss name label above the health bar
        commands.spawn((
            BossNameLabel { owner: boss_entity },
            Text::new(lifecycle.definition().name.clone()),
            TextFont {
                font_size: 18.0,
                ..default()
            },
            TextColor(Color::srgb(0.9, 0.9, 0.9)),
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(BOSS_HEALTHBAR_BOTTOM + BOSS_HEALTHBAR_HEIGHT + 8.0),
                left: Val::Percent(50.0),
                margin: UiRect::left(Val::Px(-BOSS_HEALTHBAR_WIDTH / 2.0)),
                ..default()
            },
            Visibility::Hidden,
        ));
    }
}

pub(crate) fn show_boss_healthbar(
    mut visibility_events: MessageReader<BossHealthVisibility>,
    mut bar_query: Query<(&BossHealthBarUI, &mut Visibility), Without<BossNameLabel>>,
    mut name_query: Query<(&BossNameLabel, &mut Visibility), Without<BossHealthBarUI>>,
) {
    for event in visibility_events.read() {
        let visibility = if event.visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        };
        for (bar, mut bar_visibility) in &mut bar_query {
            if bar.owner == event.boss {
                *bar_visibility = visibility;
            }
        }
        for (label, mut label_visibility) in &mut name_query {
            if label.owner == event.boss {
                *label_visibility = visibility;
            }
        }
    }
}

pub(crate) fn update_boss_healthbar(
    mut health_events: MessageReader<BossHealthChanged>,
    boss_query: Query<&BossLifecycle>,
    mut fill_query: Query<(&BossHealthBarFill, &mut Node, &mut BackgroundColor)>,
) {
    for event in health_events.read() {
        let phase_index = boss_query
            .get(event.boss)
            .map_or(0, |lifecycle| lifecycle.current_phase_index());

        for (fill, mut node, mut bg_color) in &mut fill_query {
            if fill.owner != event.boss {
                continue;
            }
            node.width = Val::Percent(fill_percent(event.current, event.max));
            bg_color.0 = phase_color(phase_index);
        }
    }
}

pub(crate) fn cleanup_boss_healthbar(
    mut commands: Commands,
    boss_query: Query<(), With<BossLifecycle>>,
    bar_query: Query<(Entity, &BossHealthBarUI)>,
    name_query: Query<(Entity, &BossNameLabel)>,
) {
    for (bar_entity, bar) in &bar_query {
        if boss_query.get(bar.owner).is_err() {
            commands.entity(bar_entity).despawn();
        }
    }
    for (name_entity, label) in &name_query {
        if boss_query.get(label.owner).is_err() {
            commands.entity(name_entity).despawn();
        }
    }
}
