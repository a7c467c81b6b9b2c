//! Movement domain — state machine актуации аватара
//!
//! Содержит:
//! - MovementConfig / MovementState (конфигурация + session state)
//! - JumpIntent (event от host input)
//! - системы: фазовые реакции, FixedUpdate-актуация, дистанция и
//!   fall-check, lift-интерполяция, контактные пути (платформа/враг)

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

pub use components::*;
pub use events::*;
pub use systems::*;

/// Plugin движения
///
/// Update-системы упорядочены после применения фазовых переходов, чтобы
/// видеть уже актуальную GamePhase в том же кадре.
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<JumpIntent>();

        app.add_systems(
            FixedUpdate,
            (
                apply_platform_thrust,
                apply_gravity,
                apply_auto_advance,
                integrate_velocity,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                on_game_init,
                on_session_began,
                on_session_ended,
                handle_platform_contacts,
                handle_enemy_contacts,
                process_jump_intents,
                enter_lift,
                tick_lift,
                track_distance_and_fall,
                track_running_maxima,
            )
                .chain()
                .after(crate::lifecycle::apply_phase_transitions),
        );
    }
}
