//! Collision domain — резолвер trigger-контактов
//!
//! Чистый диспетчер: классифицирует контакт по authored-категории и
//! раздаёт эффекты. Session state — только счётчики ракет/капсул,
//! сбрасываемые на GameStart.
//!
//! Твёрдые столкновения (платформа, враг) обрабатывает movement —
//! здесь только Trigger-путь.

use bevy::prelude::*;

pub mod events;

pub use events::*;

use crate::bridge::{
    AchievementSubmit, AudioCue, AvatarExploded, UiCommand, ACHIEVEMENT_MISSILE_MAGNET,
};
use crate::components::{
    Avatar, AvatarColor, CannonAmmo, ColorKind, ContactCategory, ForceField, Inactive,
    PickupItem, PickupKind, SizeScale, Weapon,
};
use crate::lifecycle::SessionBegan;
use crate::stats::{SessionKey, StatStoreHandle};

/// Конфигурация резолвера (задаётся при setup)
#[derive(Resource, Debug, Clone, Copy)]
pub struct CollisionConfig {
    /// Lifetime-порог ракетных попаданий для achievement
    pub missile_achievement_milestone: i64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            missile_achievement_milestone: 10,
        }
    }
}

/// Session счётчики резолвера (сбрасываются на GameStart)
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SessionCounters {
    pub missiles_collided: u32,
    pub capsules: u32,
}

/// Latch поданных achievement'ов (lifetime, не сбрасывается)
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct AchievementTracker {
    pub missile_milestone_submitted: bool,
}

/// Система: сброс session счётчиков на начало сессии
///
/// Слушает SessionBegan — дублирующий GameStart мид-сессии счётчики
/// не трогает.
pub fn reset_counters_on_start(
    mut began: EventReader<SessionBegan>,
    mut counters: ResMut<SessionCounters>,
) {
    if began.is_empty() {
        return;
    }
    began.clear();

    *counters = SessionCounters::default();
}

/// Система: диспатч trigger-контактов
///
/// Тотальная функция над категориями: Enemy здесь no-op (авторитетный
/// путь — Persist в movement), Platform/Unknown игнорируются.
/// Отсутствующий ожидаемый компонент — malformed input: warning + no-op.
pub fn resolve_trigger_contacts(
    mut contacts: EventReader<ContactEvent>,
    categories: Query<&ContactCategory>,
    inactive: Query<(), With<Inactive>>,
    mut counters: ResMut<SessionCounters>,
    config: Res<CollisionConfig>,
    mut tracker: ResMut<AchievementTracker>,
    mut store: ResMut<StatStoreHandle>,
    mut avatars: Query<
        (&mut ForceField, &mut Weapon, &mut SizeScale, &mut AvatarColor),
        With<Avatar>,
    >,
    mut pickups: Query<&mut PickupItem>,
    mut cannons: Query<&mut CannonAmmo>,
    mut ui: EventWriter<UiCommand>,
    mut audio: EventWriter<AudioCue>,
    mut explosions: EventWriter<AvatarExploded>,
    mut achievements: EventWriter<AchievementSubmit>,
    mut commands: Commands,
) {
    for contact in contacts.read() {
        if contact.kind != ContactKind::Trigger {
            continue;
        }

        // Погашенный объект триггеров больше не даёт
        if inactive.contains(contact.other) {
            continue;
        }

        let category = categories
            .get(contact.other)
            .copied()
            .unwrap_or(ContactCategory::Unknown);

        let Ok((mut force_field, mut weapon, mut size, mut color)) =
            avatars.get_mut(contact.avatar)
        else {
            continue;
        };

        match category {
            ContactCategory::Coin => {
                size.grow();
                ui.write(UiCommand::AddCoin);
                audio.write(AudioCue::CoinPickup);
                commands.entity(contact.other).insert(Inactive);
            }

            ContactCategory::Cannon => {
                if let Ok(mut ammo) = cannons.get_mut(contact.other) {
                    ammo.refill();
                } else {
                    crate::logger::log_warning("Resolver: cannon contact without CannonAmmo");
                }
            }

            ContactCategory::Pickup => {
                counters.capsules += 1;

                let Ok(mut item) = pickups.get_mut(contact.other) else {
                    crate::logger::log_warning("Resolver: pickup contact without PickupItem");
                    continue;
                };

                item.picked = true; // pickup сам доигрывает despawn-анимацию
                audio.write(AudioCue::CapsulePickup);

                match item.kind {
                    PickupKind::Red => color.change(ColorKind::Red),
                    PickupKind::Green => color.change(ColorKind::Green),
                    PickupKind::Blue => color.change(ColorKind::Blue),
                    PickupKind::Yellow => color.change(ColorKind::Yellow),
                    PickupKind::Shoot => weapon.start_firing(),
                    PickupKind::Force => force_field.activate(),
                    PickupKind::Unknown => {
                        crate::logger::log_warning("Resolver: unknown pickup kind, no-op");
                    }
                }
            }

            ContactCategory::Missile => {
                commands.entity(contact.other).insert(Inactive);

                if force_field.is_on() {
                    // Поле поглощает ровно один опасный контакт
                    force_field.deactivate();
                    weapon.stop_firing();
                    audio.write(AudioCue::ShieldAbsorb);
                    continue;
                }

                counters.missiles_collided += 1;
                store.set_value(
                    SessionKey::MissilesCollided,
                    i64::from(counters.missiles_collided),
                );

                let lifetime = store.lifetime_total(SessionKey::MissilesCollided);
                if lifetime >= config.missile_achievement_milestone
                    && !tracker.missile_milestone_submitted
                {
                    tracker.missile_milestone_submitted = true;
                    achievements.write(AchievementSubmit {
                        id: ACHIEVEMENT_MISSILE_MAGNET,
                    });
                    crate::logger::log_info(&format!(
                        "Resolver: missile milestone reached ({} lifetime hits)",
                        lifetime
                    ));
                }

                explosions.write(AvatarExploded {
                    avatar: contact.avatar,
                });
                audio.write(AudioCue::Explosion);
            }

            // Авторитетный путь врага — Persist в movement (без двойного счёта)
            ContactCategory::Enemy => {}

            ContactCategory::Platform | ContactCategory::Unknown => {}
        }
    }
}

/// Plugin резолвера
pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ContactEvent>()
            .init_resource::<SessionCounters>()
            .init_resource::<AchievementTracker>()
            .init_resource::<CollisionConfig>()
            .add_systems(
                Update,
                (reset_counters_on_start, resolve_trigger_contacts)
                    .chain()
                    .after(crate::lifecycle::apply_phase_transitions),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_default_zero() {
        let counters = SessionCounters::default();
        assert_eq!(counters.missiles_collided, 0);
        assert_eq!(counters.capsules, 0);
    }

    #[test]
    fn test_default_milestone() {
        let config = CollisionConfig::default();
        assert_eq!(config.missile_achievement_milestone, 10);
    }
}
