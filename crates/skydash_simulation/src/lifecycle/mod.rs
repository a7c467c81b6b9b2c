//! Lifecycle domain — фазы игрового цикла и отложенный re-init
//!
//! Содержит:
//! - события шины (GameInit/GameStart/RequestGameOver/GameOver/LiftTriggered)
//! - GamePhase resource (Init → Start → Lift → Over)
//! - арбитр RequestGameOver → GameOver
//! - ReinitTimer: отложенный GameInit после Over (cancel = снятие ресурса)

use bevy::prelude::*;

pub mod events;

pub use events::*;

/// Задержка перед автоматическим re-init после GameOver (секунды)
pub const REINIT_DELAY_SECS: f32 = 0.5;

/// Отложенный re-init: единственный запланированный callback после Over
///
/// Внешне форсированный GameInit снимает ресурс — это и есть cancel.
#[derive(Resource, Debug)]
pub struct ReinitTimer(pub Timer);

impl ReinitTimer {
    pub fn new() -> Self {
        Self(Timer::from_seconds(REINIT_DELAY_SECS, TimerMode::Once))
    }
}

impl Default for ReinitTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Система: арбитр завершения сессии
///
/// В продакшене запрос подтверждает внешний game-flow контроллер; здесь
/// его роль играет этот арбитр (host со своим арбитром просто читает
/// RequestGameOver сам и шлёт GameOver).
pub fn confirm_game_over_requests(
    mut requests: EventReader<RequestGameOver>,
    phase: Res<GamePhase>,
    mut overs: EventWriter<GameOver>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    // Подтверждаем только из игровых фаз; дубликаты за кадр сливаются в один
    if matches!(*phase, GamePhase::Start | GamePhase::Lift { .. }) {
        overs.write(GameOver);
    }
}

/// Система: применение фазовых переходов от событий шины
///
/// Дублирующий переход (GameStart вне Init, GameOver вне Start/Lift)
/// идемпотентен: логируется и не даёт наблюдаемого эффекта.
pub fn apply_phase_transitions(
    mut inits: EventReader<GameInit>,
    mut starts: EventReader<GameStart>,
    mut overs: EventReader<GameOver>,
    mut phase: ResMut<GamePhase>,
    reinit: Option<Res<ReinitTimer>>,
    mut began: EventWriter<SessionBegan>,
    mut ended: EventWriter<SessionEnded>,
    mut commands: Commands,
) {
    for _ in inits.read() {
        *phase = GamePhase::Init;

        // Форсированный Init отменяет отложенный re-init
        if reinit.is_some() {
            commands.remove_resource::<ReinitTimer>();
        }

        crate::logger::log_info("Lifecycle: phase → Init");
    }

    for _ in starts.read() {
        if *phase != GamePhase::Init {
            crate::logger::log_warning("Lifecycle: GameStart ignored (phase is not Init)");
            continue;
        }

        *phase = GamePhase::Start;
        began.write(SessionBegan);
        crate::logger::log_info("Lifecycle: phase → Start");
    }

    for _ in overs.read() {
        if !matches!(*phase, GamePhase::Start | GamePhase::Lift { .. }) {
            crate::logger::log_warning("Lifecycle: GameOver ignored (session not running)");
            continue;
        }

        *phase = GamePhase::Over;
        ended.write(SessionEnded);
        commands.insert_resource(ReinitTimer::new());
        crate::logger::log_info("Lifecycle: phase → Over");
    }
}

/// Система: тик отложенного re-init
///
/// По истечении таймера шлёт GameInit на шину и снимает себя.
pub fn tick_reinit_timer(
    reinit: Option<ResMut<ReinitTimer>>,
    time: Res<Time>,
    mut inits: EventWriter<GameInit>,
    mut commands: Commands,
) {
    let Some(mut reinit) = reinit else {
        return;
    };

    if reinit.0.tick(time.delta()).finished() {
        commands.remove_resource::<ReinitTimer>();
        inits.write(GameInit);
    }
}

/// Plugin жизненного цикла
pub struct LifecyclePlugin;

impl Plugin for LifecyclePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GameInit>()
            .add_event::<GameStart>()
            .add_event::<RequestGameOver>()
            .add_event::<GameOver>()
            .add_event::<LiftTriggered>()
            .add_event::<SessionBegan>()
            .add_event::<SessionEnded>()
            .init_resource::<GamePhase>()
            .add_systems(
                Update,
                (
                    confirm_game_over_requests,
                    apply_phase_transitions,
                    tick_reinit_timer,
                )
                    .chain(),
            );
    }
}
