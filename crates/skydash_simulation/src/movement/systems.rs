//! Movement системы: фазовые реакции аватара, актуация, прыжки, lift
//!
//! Архитектура:
//! - FixedUpdate: thrust/gravity/auto-advance/интеграция velocity
//! - Update: ввод (JumpIntent), дистанция и fall-check, running maxima,
//!   lift-интерполяция, контактные пути (платформа, враг)
//!
//! Collision detection на стороне host substrate — сюда приходят только
//! ContactEvent'ы.

use bevy::prelude::*;

use crate::bridge::{AudioCue, UiCommand};
use crate::collision::events::{ContactEvent, ContactKind};
use crate::components::{
    Avatar, AvatarColor, ContactCategory, EnemyEngaged, ForceField, Hidden, PhysicsBody,
    SizeScale, Weapon,
};
use crate::lifecycle::{
    GameInit, GamePhase, LiftTriggered, RequestGameOver, SessionBegan, SessionEnded,
};
use crate::movement::components::{
    MovementConfig, MovementState, DOUBLE_JUMP_MIN_VERTICAL_SPEED, LIFT_SNAP_TOLERANCE,
};
use crate::movement::events::JumpIntent;

/// Результат обработки jump input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Прыжок с платформы
    Ground,
    /// Второй прыжок в воздухе
    Double,
    /// Ни одно условие не выполнено — no-op
    Ignored,
}

/// Чистая логика прыжка (система поверх неё — тонкий слой)
///
/// Импульс — velocity-change дельта:
/// - на платформе: velocity += jump_velocity, платформа и double jump сброшены
/// - в воздухе, double jump не потрачен, ещё не падаем быстро:
///   velocity += jump_velocity × multiplier, double jump потрачен
pub fn apply_jump(
    body: &mut PhysicsBody,
    state: &mut MovementState,
    config: &MovementConfig,
) -> JumpOutcome {
    if state.touching_platform {
        state.on_double_jump = false;
        state.touching_platform = false;
        body.velocity += config.jump_velocity;
        JumpOutcome::Ground
    } else if !state.on_double_jump && body.velocity.y > DOUBLE_JUMP_MIN_VERTICAL_SPEED {
        state.on_double_jump = true;
        body.velocity += config.jump_velocity * config.double_jump_multiplier;
        JumpOutcome::Double
    } else {
        JumpOutcome::Ignored
    }
}

/// Spawn helper: аватар со всеми компонентами
///
/// До первого GameInit скрыт и кинематичен.
pub fn spawn_avatar(commands: &mut Commands, config: MovementConfig, position: Vec3) -> Entity {
    commands
        .spawn((
            Avatar,
            Transform::from_translation(position),
            PhysicsBody::default(),
            MovementState::new(position),
            config,
            ForceField::default(),
            Weapon::default(),
            SizeScale::default(),
            AvatarColor::default(),
            Hidden,
        ))
        .id()
}

// --- Фазовые реакции ---

/// Система: GameInit — сброс сессии
///
/// Статистика и флаги в ноль, аватар на якорь, тело спит (kinematic),
/// видимость включена, GUI дистанция обнулена.
pub fn on_game_init(
    mut inits: EventReader<GameInit>,
    mut avatars: Query<
        (Entity, &mut Transform, &mut PhysicsBody, &mut MovementState),
        With<Avatar>,
    >,
    mut ui: EventWriter<UiCommand>,
    mut commands: Commands,
) {
    if inits.is_empty() {
        return;
    }
    inits.clear();

    for (entity, mut transform, mut body, mut state) in avatars.iter_mut() {
        state.reset();

        transform.translation = state.start_anchor;
        transform.rotation = Quat::IDENTITY;

        body.velocity = Vec3::ZERO;
        body.kinematic = true;

        commands.entity(entity).remove::<Hidden>();
        ui.write(UiCommand::SetDistance(0.0));
    }
}

/// Система: начало сессии — включение актуации
///
/// Слушает SessionBegan (не сырой GameStart): отвергнутый дублирующий
/// переход тело не будит. В auto-advance режиме тело остаётся
/// кинематичным (перемещение через Translate, не через velocity).
pub fn on_session_began(
    mut began: EventReader<SessionBegan>,
    mut avatars: Query<(&MovementConfig, &mut PhysicsBody), With<Avatar>>,
) {
    if began.is_empty() {
        return;
    }
    began.clear();

    for (config, mut body) in avatars.iter_mut() {
        body.kinematic = config.auto_move;
    }
}

/// Система: конец сессии — выключение актуации
///
/// Поле и оружие гасим, тело снова кинематично, аватар скрыт.
/// Flush статистики живёт в модуле stats.
pub fn on_session_ended(
    mut ended: EventReader<SessionEnded>,
    mut avatars: Query<
        (Entity, &mut PhysicsBody, &mut ForceField, &mut Weapon),
        With<Avatar>,
    >,
    mut commands: Commands,
) {
    if ended.is_empty() {
        return;
    }
    ended.clear();

    for (entity, mut body, mut force_field, mut weapon) in avatars.iter_mut() {
        force_field.deactivate();
        weapon.stop_firing();

        body.velocity = Vec3::ZERO;
        body.kinematic = true;

        commands.entity(entity).insert(Hidden);
    }
}

// --- Ввод ---

/// Система: обработка jump input
///
/// Вне фазы Start и в auto-advance режиме — silent no-op (invalid-state
/// action по таксономии ошибок).
pub fn process_jump_intents(
    mut intents: EventReader<JumpIntent>,
    phase: Res<GamePhase>,
    mut avatars: Query<(&MovementConfig, &mut PhysicsBody, &mut MovementState), With<Avatar>>,
    mut audio: EventWriter<AudioCue>,
) {
    for intent in intents.read() {
        if *phase != GamePhase::Start {
            continue;
        }

        let Ok((config, mut body, mut state)) = avatars.get_mut(intent.entity) else {
            continue;
        };

        if config.auto_move {
            continue;
        }

        match apply_jump(&mut body, &mut state, config) {
            JumpOutcome::Ground => {
                audio.write(AudioCue::Jump);
            }
            JumpOutcome::Double => {
                audio.write(AudioCue::DoubleJump);
            }
            JumpOutcome::Ignored => {}
        }
    }
}

// --- FixedUpdate актуация ---

/// Система: forward-ускорение пока на платформе (ручной режим)
pub fn apply_platform_thrust(
    phase: Res<GamePhase>,
    mut avatars: Query<(&MovementConfig, &MovementState, &mut PhysicsBody), With<Avatar>>,
    time: Res<Time<Fixed>>,
) {
    if *phase != GamePhase::Start {
        return;
    }

    let delta = time.delta_secs();

    for (config, state, mut body) in avatars.iter_mut() {
        if config.auto_move || body.kinematic {
            continue;
        }

        if state.touching_platform {
            body.velocity.x += config.acceleration * delta;
        }
    }
}

/// Система: гравитация (ручной режим)
///
/// На платформе гравитация не копится; остаточная отрицательная
/// вертикальная скорость гасится (collision response — на стороне host,
/// headless-симуляция без этого проваливалась бы сквозь платформу).
pub fn apply_gravity(
    phase: Res<GamePhase>,
    mut avatars: Query<(&MovementConfig, &MovementState, &mut PhysicsBody), With<Avatar>>,
    time: Res<Time<Fixed>>,
) {
    if *phase != GamePhase::Start {
        return;
    }

    let delta = time.delta_secs();

    for (config, state, mut body) in avatars.iter_mut() {
        if config.auto_move || body.kinematic {
            continue;
        }

        if state.touching_platform {
            if body.velocity.y < 0.0 {
                body.velocity.y = 0.0;
            }
        } else {
            let gravity = body.gravity;
            body.velocity.y += gravity * delta;
        }
    }
}

/// Система: auto-advance перемещение (фиксированный сдвиг за тик)
pub fn apply_auto_advance(
    phase: Res<GamePhase>,
    mut avatars: Query<(&MovementConfig, &mut Transform), With<Avatar>>,
) {
    if *phase != GamePhase::Start {
        return;
    }

    for (config, mut transform) in avatars.iter_mut() {
        if config.auto_move {
            transform.translation.x += config.auto_move_step;
        }
    }
}

/// Система: интеграция velocity → Transform
pub fn integrate_velocity(
    phase: Res<GamePhase>,
    mut avatars: Query<(&PhysicsBody, &mut Transform), With<Avatar>>,
    time: Res<Time<Fixed>>,
) {
    if *phase != GamePhase::Start {
        return;
    }

    let delta = time.delta_secs();

    for (body, mut transform) in avatars.iter_mut() {
        if !body.kinematic {
            transform.translation += body.velocity * delta;
        }
    }
}

// --- Update bookkeeping ---

/// Система: дистанция + fall-based game over
///
/// Ручной режим: дистанция — running max (x − anchor.x); первый провал
/// ниже game_over_y шлёт RequestGameOver ровно один раз за сессию.
/// Auto-advance: дистанция трекает x напрямую, fall-check отсутствует.
pub fn track_distance_and_fall(
    phase: Res<GamePhase>,
    mut avatars: Query<(&Transform, &MovementConfig, &mut MovementState), With<Avatar>>,
    mut ui: EventWriter<UiCommand>,
    mut requests: EventWriter<RequestGameOver>,
) {
    if *phase != GamePhase::Start {
        return;
    }

    for (transform, config, mut state) in avatars.iter_mut() {
        if config.auto_move {
            state.distance_traveled = transform.translation.x;
        } else {
            let traveled = transform.translation.x - state.start_anchor.x;
            if traveled > state.distance_traveled {
                state.distance_traveled = traveled;
            }

            if transform.translation.y < config.game_over_y && !state.game_over_requested {
                state.game_over_requested = true;
                requests.write(RequestGameOver);
                crate::logger::log_info("Movement: fell below game-over altitude");
            }
        }

        ui.write(UiCommand::SetDistance(state.distance_traveled));
    }
}

/// Система: running maxima |velocity| и высоты (Start и Lift)
pub fn track_running_maxima(
    phase: Res<GamePhase>,
    mut avatars: Query<(&Transform, &PhysicsBody, &mut MovementState), With<Avatar>>,
) {
    if !matches!(*phase, GamePhase::Start | GamePhase::Lift { .. }) {
        return;
    }

    for (transform, body, mut state) in avatars.iter_mut() {
        let speed = body.velocity.length();
        if speed > state.max_velocity {
            state.max_velocity = speed;
        }

        if transform.translation.y > state.max_altitude {
            state.max_altitude = transform.translation.y;
        }
    }
}

// --- Lift ---

/// Система: вход в lift-переход
///
/// Target — якорь сессии с x текущей позиции; якорь переставляется сразу.
pub fn enter_lift(
    mut lifts: EventReader<LiftTriggered>,
    mut phase: ResMut<GamePhase>,
    mut avatars: Query<(Entity, &Transform, &mut MovementState), With<Avatar>>,
    mut commands: Commands,
) {
    if lifts.is_empty() {
        return;
    }
    lifts.clear();

    if *phase != GamePhase::Start {
        crate::logger::log_warning("Movement: LiftTriggered ignored (phase is not Start)");
        return;
    }

    for (entity, transform, mut state) in avatars.iter_mut() {
        let mut target = state.start_anchor;
        target.x = transform.translation.x;

        state.start_anchor = target;
        *phase = GamePhase::Lift { target };

        commands.entity(entity).remove::<Hidden>();
        crate::logger::log_info("Movement: lift started");
    }
}

/// Система: lift-интерполяция
///
/// Lerp позиции и slerp поворота к target; в пределах допуска по высоте —
/// точный снап, переякоривание на новую горизонталь, возврат в Start.
pub fn tick_lift(
    mut phase: ResMut<GamePhase>,
    mut avatars: Query<(&mut Transform, &MovementConfig, &mut MovementState), With<Avatar>>,
    time: Res<Time>,
) {
    let GamePhase::Lift { target } = *phase else {
        return;
    };

    let delta = time.delta_secs();

    for (mut transform, config, mut state) in avatars.iter_mut() {
        let s = (config.lift_speed * delta).min(1.0);
        transform.translation = transform.translation.lerp(target, s);
        transform.rotation = transform.rotation.slerp(Quat::IDENTITY, s);

        if (target.y - transform.translation.y).abs() < LIFT_SNAP_TOLERANCE {
            let mut anchor = target;
            anchor.x = transform.translation.x;

            transform.translation = anchor;
            transform.rotation = Quat::IDENTITY;
            state.start_anchor = anchor;

            *phase = GamePhase::Start;
            crate::logger::log_info("Movement: lift finished, session re-anchored");
        }
    }
}

// --- Контактные пути (владение здесь, не в резолвере) ---

/// Система: контакты с платформой → touching_platform
///
/// Persist выставляет флаг (и возвращает double jump), End снимает.
pub fn handle_platform_contacts(
    mut contacts: EventReader<ContactEvent>,
    categories: Query<&ContactCategory>,
    mut avatars: Query<&mut MovementState, With<Avatar>>,
) {
    for contact in contacts.read() {
        let category = categories
            .get(contact.other)
            .copied()
            .unwrap_or(ContactCategory::Unknown);
        if category != ContactCategory::Platform {
            continue;
        }

        let Ok(mut state) = avatars.get_mut(contact.avatar) else {
            continue;
        };

        match contact.kind {
            ContactKind::Persist => {
                if !state.touching_platform {
                    state.set_grounded();
                }
            }
            ContactKind::End => {
                state.touching_platform = false;
            }
            ContactKind::Trigger => {}
        }
    }
}

/// Система: столкновения с врагом (авторитетный путь)
///
/// Первый Persist эпизода (маркер EnemyEngaged): поле активно — оно
/// поглощает контакт и гаснет; иначе счётчик, стоп оружия, shrink обоих.
/// Trigger-вариант врага обрабатывается резолвером как no-op — двойного
/// счёта нет.
pub fn handle_enemy_contacts(
    mut contacts: EventReader<ContactEvent>,
    categories: Query<&ContactCategory>,
    engaged: Query<(), With<EnemyEngaged>>,
    mut avatars: Query<
        (&mut MovementState, &mut ForceField, &mut Weapon, &mut SizeScale),
        With<Avatar>,
    >,
    mut enemies: Query<&mut SizeScale, Without<Avatar>>,
    mut commands: Commands,
) {
    for contact in contacts.read() {
        let category = categories
            .get(contact.other)
            .copied()
            .unwrap_or(ContactCategory::Unknown);
        if category != ContactCategory::Enemy {
            continue;
        }

        match contact.kind {
            ContactKind::Persist => {
                if engaged.contains(contact.other) {
                    continue; // эпизод уже учтён
                }
                commands.entity(contact.other).insert(EnemyEngaged);

                let Ok((mut state, mut force_field, mut weapon, mut size)) =
                    avatars.get_mut(contact.avatar)
                else {
                    continue;
                };

                if force_field.is_on() {
                    // Поле поглощает контакт, урон не применяется
                    force_field.deactivate();
                    continue;
                }

                state.enemies_collided += 1;
                weapon.stop_firing();
                size.shrink();

                if let Ok(mut enemy_size) = enemies.get_mut(contact.other) {
                    enemy_size.shrink();
                }
            }
            ContactKind::End => {
                if let Ok(mut entity_commands) = commands.get_entity(contact.other) {
                    entity_commands.remove::<EnemyEngaged>();
                }
            }
            ContactKind::Trigger => {}
        }
    }
}
