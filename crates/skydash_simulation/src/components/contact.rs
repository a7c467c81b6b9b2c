//! Компоненты контактируемых объектов мира
//!
//! Категория задаётся при авторинге контента как enum-компонент на entity —
//! резолвер делает exhaustive match вместо разбора display-строк.
//! Unknown зарезервирован для forward compatibility.

use bevy::prelude::*;

/// Категория контактируемого объекта (authored at content time)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactCategory {
    Coin,
    Cannon,
    Pickup,
    Missile,
    Enemy,
    Platform,
    /// Объект без осмысленной категории — контакты с ним игнорируются
    Unknown,
}

/// Семантика капсулы-pickup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Red,
    Green,
    Blue,
    Yellow,
    /// Активирует оружие
    Shoot,
    /// Активирует защитное поле
    Force,
    /// Нераспознанный вид — no-op при подборе
    Unknown,
}

impl PickupKind {
    /// Парсер для контент-пайплайнов, кодирующих вид в label материала
    /// ("capsule_Red" стиль). Не используется в runtime-диспатче.
    pub fn from_label(label: &str) -> Self {
        let Some(tag) = label.split('_').nth(1) else {
            return PickupKind::Unknown;
        };

        match tag {
            "Red" => PickupKind::Red,
            "Green" => PickupKind::Green,
            "Blue" => PickupKind::Blue,
            "Yellow" => PickupKind::Yellow,
            "Shoot" => PickupKind::Shoot,
            "Force" => PickupKind::Force,
            _ => PickupKind::Unknown,
        }
    }
}

/// Капсула-pickup: вид + флаг "подобрана"
///
/// picked выставляет резолвер; модуль pickup по нему останавливает
/// анимацию и запускает despawn.
#[derive(Component, Debug, Clone, Copy)]
pub struct PickupItem {
    pub kind: PickupKind,
    pub picked: bool,
}

impl PickupItem {
    pub fn new(kind: PickupKind) -> Self {
        Self {
            kind,
            picked: false,
        }
    }
}

/// Боезапас пушки (контакт с аватаром пополняет его)
#[derive(Component, Debug, Clone, Copy)]
pub struct CannonAmmo {
    pub rounds: u32,
    pub capacity: u32,
}

impl CannonAmmo {
    pub fn new(capacity: u32) -> Self {
        Self {
            rounds: capacity,
            capacity,
        }
    }

    pub fn refill(&mut self) {
        self.rounds = self.capacity;
    }
}

/// Marker: объект деактивирован (аналог SetActive(false) на стороне host)
///
/// Вставляется на подобранные монеты и отработавшие ракеты; host
/// перестаёт их рисовать, системы симуляции их пропускают.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Inactive;

/// Marker: враг уже в контакте с аватаром (текущий эпизод столкновения)
///
/// Persist-контакты приходят каждый тик; маркер восстанавливает
/// enter-once семантику. Снимается на End.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct EnemyEngaged;

/// Деспавн entity по таймауту
#[derive(Component, Debug)]
pub struct DespawnAfter {
    pub timer: Timer,
}

impl DespawnAfter {
    pub fn new(secs: f32) -> Self {
        Self {
            timer: Timer::from_seconds(secs, TimerMode::Once),
        }
    }
}
