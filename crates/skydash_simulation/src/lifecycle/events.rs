//! Lifecycle события игрового цикла
//!
//! Типизированная замена глобального pub/sub: подписка — это EventReader
//! параметр системы, она создаётся вместе с системой и умирает вместе с
//! ней, висячих подписок через перезагрузки сцен не бывает.

use bevy::prelude::*;

/// Сброс сессии: аватар на стартовую позицию, статистика в ноль
#[derive(Event, Debug, Clone, Copy)]
pub struct GameInit;

/// Старт сессии: включение актуации (единственный переход Init → Start)
#[derive(Event, Debug, Clone, Copy)]
pub struct GameStart;

/// Ядро просит завершить сессию (падение ниже порога)
///
/// Подтверждается арбитром → GameOver. Edge-triggered: повторные запросы
/// в той же сессии гасятся latch'ем в MovementState.
#[derive(Event, Debug, Clone, Copy)]
pub struct RequestGameOver;

/// Подтверждённое завершение сессии
#[derive(Event, Debug, Clone, Copy)]
pub struct GameOver;

/// Скриптовый lift-переход (лифт в конце уровня)
#[derive(Event, Debug, Clone, Copy)]
pub struct LiftTriggered;

/// Внутреннее событие: переход Init → Start принят, началась новая сессия
///
/// Дублирующий GameStart его не генерирует — подписчики безопасно
/// сбрасывают session state (счётчики, flush-latch).
#[derive(Event, Debug, Clone, Copy)]
pub struct SessionBegan;

/// Внутреннее событие: переход в Over принят, сессия закончилась
#[derive(Event, Debug, Clone, Copy)]
pub struct SessionEnded;

/// Текущая фаза жизненного цикла
///
/// Ровно одна активна; Lift несёт свой interpolation target как
/// per-state данные (FSM-состояния с данными).
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub enum GamePhase {
    /// Entry/reset состояние; в Start только по явному GameStart
    #[default]
    Init,
    /// Актуация включена, обрабатывается ввод
    Start,
    /// Скриптовый override: ввод игнорируется, lerp к target
    Lift { target: Vec3 },
    /// Актуация выключена, аватар скрыт
    Over,
}
