//! Базовые компоненты аватара: Avatar, PhysicsBody, Hidden

use bevy::prelude::*;

/// Marker component для управляемого аватара
///
/// Системы движения и резолвер контактов работают только с entity,
/// несущими этот компонент. В single-player сцене он ровно один.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Avatar;

/// Кинематическое тело аватара
///
/// Velocity интегрируем сами в FixedUpdate; host substrate отвечает
/// только за collision detection (присылает ContactEvent).
#[derive(Component, Debug, Clone, Copy)]
pub struct PhysicsBody {
    /// Текущая скорость (m/s)
    pub velocity: Vec3,
    /// Гравитация (m/s²), применяется пока аватар в воздухе
    pub gravity: f32,
    /// true — тело inert для физики (Init/Over, auto-advance)
    pub kinematic: bool,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            gravity: -9.81, // Earth gravity
            kinematic: true, // до первого GameStart тело спит
        }
    }
}

/// Marker: entity скрыта от рендера (host не рисует её)
///
/// Вставляется при спавне и на GameOver, снимается на GameInit.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Hidden;
