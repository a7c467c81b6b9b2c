//! Movement events

use bevy::prelude::*;

/// Event: намерение прыгнуть (jump input edge)
///
/// Генерируется:
/// - host input system (кнопка/тач)
/// - тесты напрямую
///
/// Обрабатывается process_jump_intents: вне фазы Start — silent no-op.
#[derive(Event, Debug, Clone)]
pub struct JumpIntent {
    pub entity: Entity,
}
