//! Contact события от host substrate
//!
//! Physics-слой host'а детектит контакты и присылает их сюда; симуляция
//! сама collision detection не делает.

use bevy::prelude::*;

/// Вид контактного уведомления
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Trigger-пересечение (монеты, капсулы, ракеты, пушки)
    Trigger,
    /// Продолжающееся твёрдое столкновение (платформы, враги);
    /// приходит каждый тик, пока контакт активен
    Persist,
    /// Контакт закончился
    End,
}

/// Контакт аватара с объектом мира
///
/// Категория объекта НЕ на проводе — это authored-компонент
/// ContactCategory на самом entity (см. components::contact).
#[derive(Event, Debug, Clone)]
pub struct ContactEvent {
    /// Entity аватара
    pub avatar: Entity,
    /// Контактируемый объект
    pub other: Entity,
    pub kind: ContactKind,
}
