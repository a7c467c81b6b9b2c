//! Movement компоненты: конфигурация актуации и session state

use bevy::prelude::*;

/// Вертикальная скорость, ниже которой double jump уже не разрешён
/// (аватар "уже быстро падает")
pub const DOUBLE_JUMP_MIN_VERTICAL_SPEED: f32 = -1.0;

/// Допуск по высоте, при котором lift снапится точно в target
pub const LIFT_SNAP_TOLERANCE: f32 = 0.1;

/// Конфигурация движения (задаётся при спавне, в runtime не меняется)
#[derive(Component, Debug, Clone, Copy)]
pub struct MovementConfig {
    /// Forward-ускорение пока аватар на платформе (m/s²)
    pub acceleration: f32,
    /// Импульс прыжка (velocity-change)
    pub jump_velocity: Vec3,
    /// Множитель импульса double jump
    pub double_jump_multiplier: f32,
    /// Высота, ниже которой падение завершает сессию
    pub game_over_y: f32,
    /// Скорость интерполяции lift-перехода
    pub lift_speed: f32,
    /// Сдвиг вперёд за fixed tick в auto-advance режиме
    pub auto_move_step: f32,
    /// Режим актуации: false — ручной (гравитация + прыжки), true — auto-advance
    pub auto_move: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            acceleration: 5.0,
            jump_velocity: Vec3::new(0.0, 7.0, 0.0),
            double_jump_multiplier: 1.2,
            game_over_y: -10.0,
            lift_speed: 2.0,
            auto_move_step: 0.1,
            auto_move: false,
        }
    }
}

/// Session state аватара: якорь, статистика, флаги
///
/// Мутируется только системами movement (тик + обработчики событий).
#[derive(Component, Debug, Clone)]
pub struct MovementState {
    /// Референсная стартовая позиция сессии (lift переякоривает x)
    pub start_anchor: Vec3,
    /// Пройденная дистанция; неубывающая до следующего Init
    pub distance_traveled: f32,
    /// Running max |velocity|
    pub max_velocity: f32,
    /// Running max высоты
    pub max_altitude: f32,
    /// Сколько раз врезались во врагов за сессию
    pub enemies_collided: u32,
    /// true iff активен Persist-контакт с платформой
    pub touching_platform: bool,
    /// Double jump уже потрачен в текущем airborne-цикле
    pub on_double_jump: bool,
    /// Latch: RequestGameOver уже отправлен в этой сессии
    pub game_over_requested: bool,
}

impl MovementState {
    pub fn new(start_anchor: Vec3) -> Self {
        Self {
            start_anchor,
            distance_traveled: 0.0,
            max_velocity: 0.0,
            max_altitude: 0.0,
            enemies_collided: 0,
            touching_platform: false,
            on_double_jump: false,
            game_over_requested: false,
        }
    }

    /// Сброс на Init: статистика и флаги в ноль, якорь сохраняется
    pub fn reset(&mut self) {
        self.distance_traveled = 0.0;
        self.max_velocity = 0.0;
        self.max_altitude = 0.0;
        self.enemies_collided = 0;
        self.touching_platform = false;
        self.on_double_jump = false;
        self.game_over_requested = false;
    }

    /// Контакт с платформой: приземлились — double jump снова доступен
    pub fn set_grounded(&mut self) {
        self.touching_platform = true;
        self.on_double_jump = false;
    }
}
