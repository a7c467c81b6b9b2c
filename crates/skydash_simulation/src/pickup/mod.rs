//! Pickup domain — размещение и анимация капсул
//!
//! Косметика simulation-space: капсула висит над платформой, крутится и
//! качается по синусоиде. Подобранная капсула (PickupItem.picked от
//! резолвера) гасит анимацию и деспавнится по таймауту.

use bevy::prelude::*;
use rand::Rng;

use crate::components::{ContactCategory, DespawnAfter, Inactive, PickupItem, PickupKind};
use crate::DeterministicRng;

/// Высота подвеса капсулы над верхом платформы
pub const CAPSULE_HEIGHT_OFFSET: f32 = 5.0;

/// Сколько капсула доигрывает после подбора до деспавна
pub const PICKUP_DESPAWN_SECS: f32 = 0.6;

/// Параметры размещения/анимации капсулы
#[derive(Component, Debug, Clone)]
pub struct CapsulePlace {
    /// Точка подвеса (центр боба)
    pub initial_position: Vec3,
    /// Угловая скорость вращения (градусы/сек по осям)
    pub rotation_velocity: Vec3,
    /// Амплитуда вертикального боба
    pub bob_amplitude: f32,
    /// Фаза боба (градусы, 0..360)
    pub counter: u32,
    /// false — анимация остановлена (подобрана/убрана)
    pub active: bool,
}

impl Default for CapsulePlace {
    fn default() -> Self {
        Self {
            initial_position: Vec3::ZERO,
            rotation_velocity: Vec3::new(0.0, 90.0, 45.0),
            bob_amplitude: 1.0,
            counter: 0,
            active: true,
        }
    }
}

impl CapsulePlace {
    /// Подвесить над платформой со случайным начальным наклоном
    pub fn place(
        &mut self,
        transform: &mut Transform,
        platform_position: Vec3,
        platform_half_height: f32,
        rng: &mut DeterministicRng,
    ) {
        let mut position = platform_position;
        position.y += platform_half_height + CAPSULE_HEIGHT_OFFSET;

        self.initial_position = position;
        self.active = true;

        let tilt_x: f32 = rng.rng.gen_range(0.0..5.0);
        let tilt_z: f32 = rng.rng.gen_range(0.0..100.0);
        transform.rotation = Quat::from_euler(
            EulerRot::XYZ,
            tilt_x.to_radians(),
            0.0,
            tilt_z.to_radians(),
        );
        transform.translation = position;
    }

    /// Вернуть в пул со случайной фазой боба
    pub fn reset(&mut self, rng: &mut DeterministicRng) {
        self.active = true;
        self.counter = rng.rng.gen_range(0..360);
    }

    pub fn remove(&mut self) {
        self.active = false;
    }
}

/// Spawn helper: капсула над платформой
pub fn spawn_capsule(
    commands: &mut Commands,
    rng: &mut DeterministicRng,
    kind: PickupKind,
    platform_position: Vec3,
    platform_half_height: f32,
) -> Entity {
    let mut place = CapsulePlace::default();
    let mut transform = Transform::default();
    place.place(&mut transform, platform_position, platform_half_height, rng);

    commands
        .spawn((
            ContactCategory::Pickup,
            PickupItem::new(kind),
            place,
            transform,
        ))
        .id()
}

/// Система: вращение + синусоидальный боб
pub fn animate_capsules(
    mut capsules: Query<(&mut Transform, &mut CapsulePlace)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut place) in capsules.iter_mut() {
        if !place.active {
            continue;
        }

        place.counter += 1;

        let spin = place.rotation_velocity * delta;
        transform.rotate(Quat::from_euler(
            EulerRot::XYZ,
            spin.x.to_radians(),
            spin.y.to_radians(),
            spin.z.to_radians(),
        ));

        let phase = std::f32::consts::PI * place.counter as f32 / 180.0;
        transform.translation = place.initial_position;
        transform.translation.y += phase.sin() * place.bob_amplitude;

        if place.counter > 360 {
            place.counter = 0;
        }
    }
}

/// Система: подобранная капсула гасит анимацию и уходит на деспавн
pub fn retire_picked_pickups(
    mut pickups: Query<
        (Entity, &PickupItem, Option<&mut CapsulePlace>),
        Without<DespawnAfter>,
    >,
    mut commands: Commands,
) {
    for (entity, item, place) in pickups.iter_mut() {
        if !item.picked {
            continue;
        }

        if let Some(mut place) = place {
            place.remove();
        }

        commands
            .entity(entity)
            .insert((Inactive, DespawnAfter::new(PICKUP_DESPAWN_SECS)));
    }
}

/// Система: деспавн entities с истёкшим DespawnAfter
pub fn despawn_after_timeout(
    mut pending: Query<(Entity, &mut DespawnAfter)>,
    time: Res<Time>,
    mut commands: Commands,
) {
    for (entity, mut despawn) in pending.iter_mut() {
        if despawn.timer.tick(time.delta()).finished() {
            crate::logger::log(&format!("⚰️ Despawning pickup {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}

/// Plugin капсул
pub struct PickupPlugin;

impl Plugin for PickupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (retire_picked_pickups, animate_capsules, despawn_after_timeout).chain(),
        );
    }
}
