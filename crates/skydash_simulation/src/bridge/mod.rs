//! Bridge события (simulation → host layer)
//!
//! Всё наружу — fire-and-forget: UI, аудио, VFX взрыва, achievement
//! сабмиты. Host дренит очереди и исполняет на своей стороне; ядро
//! ответов не ждёт.

use bevy::prelude::*;

/// Id achievement'а за накопленные ракетные попадания
pub const ACHIEVEMENT_MISSILE_MAGNET: &str = "skydash.missile_magnet";

/// Команды для UI host'а
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum UiCommand {
    SetDistance(f32),
    AddCoin,
}

/// Аудио-кьюи
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Jump,
    DoubleJump,
    CoinPickup,
    CapsulePickup,
    /// Поле поглотило ракету
    ShieldAbsorb,
    Explosion,
}

/// Event: на аватаре нужно проиграть взрыв (VFX на стороне host)
#[derive(Event, Debug, Clone)]
pub struct AvatarExploded {
    pub avatar: Entity,
}

/// Event: запрос сабмита achievement'а во внешний сервис
#[derive(Event, Debug, Clone)]
pub struct AchievementSubmit {
    pub id: &'static str,
}

/// Plugin: регистрация bridge-очередей
pub struct BridgePlugin;

impl Plugin for BridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<UiCommand>()
            .add_event::<AudioCue>()
            .add_event::<AvatarExploded>()
            .add_event::<AchievementSubmit>();
    }
}
