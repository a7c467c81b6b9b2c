//! SKYDASH Simulation Core
//!
//! ECS-ядро side-scroll раннера на Bevy 0.16: state machine движения
//! аватара, резолвер контактов, lifecycle-шина, session статистика.
//!
//! Архитектура:
//! - ECS = game state + rules (движение, контакты, статистика)
//! - Host layer = physics detection, рендер, ввод, персистентность
//!   (наружу — bridge события и StatStore trait object)

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod bridge;
pub mod collision;
pub mod components;
pub mod lifecycle;
pub mod logger;
pub mod movement;
pub mod pickup;
pub mod stats;

// Re-export базовых типов для удобства
pub use bridge::*;
pub use collision::{
    AchievementTracker, CollisionConfig, CollisionPlugin, ContactEvent, ContactKind,
    SessionCounters,
};
pub use components::*;
pub use lifecycle::{
    GameInit, GameOver, GamePhase, GameStart, LifecyclePlugin, LiftTriggered, ReinitTimer,
    RequestGameOver, SessionBegan, SessionEnded,
};
pub use movement::{
    apply_jump, spawn_avatar, JumpIntent, JumpOutcome, MovementConfig, MovementPlugin,
    MovementState,
};
pub use pickup::{spawn_capsule, CapsulePlace, PickupPlugin};
pub use stats::{
    InMemoryStatStore, RunStats, SessionKey, StatStore, StatStoreHandle, StatsPlugin,
};

// Re-export logger API (host ставит свой принтер через set_logger)
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            // Подсистемы
            .add_plugins((
                LifecyclePlugin,
                MovementPlugin,
                CollisionPlugin,
                components::CapabilityPlugin,
                PickupPlugin,
                StatsPlugin,
                BridgePlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается фиксированным виртуальным шагом 1/60 сек за update —
/// тики воспроизводимы независимо от wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();

    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0));

    app
}

/// Snapshot мира для сравнения детерминизма
///
/// Собирает компоненты типа T в детерминированный байтовый формат
/// (сортировка по Entity ID, сериализация через Debug).
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
