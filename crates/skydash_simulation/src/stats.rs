//! Session статистика и внешний stat store
//!
//! Ядро пишет наружу через trait object StatStore (host подставляет свою
//! персистентность — файл сейвов, облако). RunStats собирается один раз
//! за сессию на GameOver; повторный GameOver в той же сессии flush не
//! дублирует.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::collision::SessionCounters;
use crate::components::Avatar;
use crate::lifecycle::{SessionBegan, SessionEnded};
use crate::movement::MovementState;

/// Ключи session-статистики в сейве
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKey {
    Distance,
    MaxVelocity,
    MaxAltitude,
    EnemiesCollided,
    MissilesCollided,
    Capsules,
}

impl SessionKey {
    pub fn as_str(&self) -> &str {
        match self {
            SessionKey::Distance => "distance",
            SessionKey::MaxVelocity => "max_velocity",
            SessionKey::MaxAltitude => "max_altitude",
            SessionKey::EnemiesCollided => "enemies_collided",
            SessionKey::MissilesCollided => "missiles_collided",
            SessionKey::Capsules => "capsules",
        }
    }
}

/// Внешнее хранилище статистики
///
/// set_value перезаписывает значение текущей сессии; begin_session
/// сворачивает прошлую сессию в lifetime-тоталы. lifetime_total
/// включает текущую сессию (нужно резолверу для achievement-порога).
pub trait StatStore: Send + Sync {
    fn set_value(&mut self, key: SessionKey, value: i64);
    fn session_value(&self, key: SessionKey) -> i64;
    fn lifetime_total(&self, key: SessionKey) -> i64;
    fn begin_session(&mut self);
}

/// In-memory реализация (headless запуски и тесты)
#[derive(Debug, Default)]
pub struct InMemoryStatStore {
    session: HashMap<SessionKey, i64>,
    lifetime: HashMap<SessionKey, i64>,
}

impl StatStore for InMemoryStatStore {
    fn set_value(&mut self, key: SessionKey, value: i64) {
        self.session.insert(key, value);
    }

    fn session_value(&self, key: SessionKey) -> i64 {
        self.session.get(&key).copied().unwrap_or(0)
    }

    fn lifetime_total(&self, key: SessionKey) -> i64 {
        self.lifetime.get(&key).copied().unwrap_or(0) + self.session_value(key)
    }

    fn begin_session(&mut self) {
        for (key, value) in self.session.drain() {
            *self.lifetime.entry(key).or_insert(0) += value;
        }
    }
}

/// Resource-обёртка над trait object (host подменяет свою реализацию)
#[derive(Resource)]
pub struct StatStoreHandle(pub Box<dyn StatStore>);

impl Default for StatStoreHandle {
    fn default() -> Self {
        Self(Box::new(InMemoryStatStore::default()))
    }
}

impl StatStoreHandle {
    pub fn new<S: StatStore + 'static>(store: S) -> Self {
        Self(Box::new(store))
    }

    pub fn set_value(&mut self, key: SessionKey, value: i64) {
        self.0.set_value(key, value);
    }

    pub fn session_value(&self, key: SessionKey) -> i64 {
        self.0.session_value(key)
    }

    pub fn lifetime_total(&self, key: SessionKey) -> i64 {
        self.0.lifetime_total(key)
    }

    pub fn begin_session(&mut self) {
        self.0.begin_session();
    }
}

/// Latch: статистика текущей сессии уже сброшена в store
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SessionFlushed(pub bool);

/// Итог сессии (write-once на GameOver)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub distance: i64,
    pub max_velocity: i64,
    pub max_altitude: i64,
    pub enemies_collided: i64,
    pub missiles_collided: i64,
    pub capsules: i64,
}

impl RunStats {
    /// Сборка из session state; float-метрики округляются вниз
    pub fn collect(state: &MovementState, counters: &SessionCounters) -> Self {
        Self {
            distance: state.distance_traveled.floor() as i64,
            max_velocity: state.max_velocity.floor() as i64,
            max_altitude: state.max_altitude.floor() as i64,
            enemies_collided: i64::from(state.enemies_collided),
            missiles_collided: i64::from(counters.missiles_collided),
            capsules: i64::from(counters.capsules),
        }
    }

    pub fn flush_to(&self, store: &mut StatStoreHandle) {
        store.set_value(SessionKey::Distance, self.distance);
        store.set_value(SessionKey::MaxVelocity, self.max_velocity);
        store.set_value(SessionKey::MaxAltitude, self.max_altitude);
        store.set_value(SessionKey::EnemiesCollided, self.enemies_collided);
        store.set_value(SessionKey::MissilesCollided, self.missiles_collided);
        store.set_value(SessionKey::Capsules, self.capsules);
    }
}

/// Система: новая сессия (SessionBegan)
///
/// Прошлые session-значения уходят в lifetime-тоталы, flush-latch
/// снимается. Слушает принятый переход, не сырой GameStart — дубликат
/// мид-сессии ничего не сбрасывает.
pub fn begin_session_on_start(
    mut began: EventReader<SessionBegan>,
    mut store: ResMut<StatStoreHandle>,
    mut flushed: ResMut<SessionFlushed>,
) {
    if began.is_empty() {
        return;
    }
    began.clear();

    store.begin_session();
    flushed.0 = false;
}

/// Система: flush RunStats на конец сессии (ровно один раз)
pub fn flush_run_stats_on_over(
    mut ended: EventReader<SessionEnded>,
    mut flushed: ResMut<SessionFlushed>,
    avatars: Query<&MovementState, With<Avatar>>,
    counters: Res<SessionCounters>,
    mut store: ResMut<StatStoreHandle>,
) {
    if ended.is_empty() {
        return;
    }
    ended.clear();

    // Повторный GameOver в той же сессии — без flush
    if flushed.0 {
        return;
    }

    for state in avatars.iter() {
        let stats = RunStats::collect(state, &counters);
        stats.flush_to(&mut store);
        flushed.0 = true;

        crate::logger::log_info(&format!(
            "Stats: session flushed (distance {}, max velocity {}, max altitude {})",
            stats.distance, stats.max_velocity, stats.max_altitude
        ));
    }
}

/// Plugin статистики
pub struct StatsPlugin;

impl Plugin for StatsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StatStoreHandle>()
            .init_resource::<SessionFlushed>()
            .add_systems(
                Update,
                (begin_session_on_start, flush_run_stats_on_over)
                    .chain()
                    .after(crate::lifecycle::apply_phase_transitions),
            );
    }
}
