//! Способности аватара: ForceField, Weapon, SizeScale, AvatarColor
//!
//! Capability-компоненты висят на entity аватара и мутируются системами
//! movement/collision напрямую (явные зависимости вместо runtime lookup).
//! Auto-fire оружия живёт здесь же (component + система + plugin в одном
//! файле, как kinematic контроллер).

use bevy::prelude::*;

/// Защитное поле аватара
///
/// Инвариант: on == true только между activate() и первым из
/// (а) поглощения одного опасного контакта, (б) явного deactivate().
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ForceField {
    pub on: bool,
}

impl ForceField {
    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn activate(&mut self) {
        self.on = true;
    }

    pub fn deactivate(&mut self) {
        self.on = false;
    }
}

/// Оружие аватара (auto-fire пока firing == true)
#[derive(Component, Debug, Clone, Copy)]
pub struct Weapon {
    pub firing: bool,
    /// Интервал между выстрелами (секунды)
    pub fire_interval: f32,
    /// Оставшийся cooldown до следующего выстрела
    pub cooldown: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            firing: false,
            fire_interval: 0.25, // 4 выстрела/сек
            cooldown: 0.0,
        }
    }
}

impl Weapon {
    pub fn start_firing(&mut self) {
        self.firing = true;
        self.cooldown = 0.0; // первый выстрел сразу
    }

    pub fn stop_firing(&mut self) {
        self.firing = false;
    }
}

/// Event: оружие выстрелило (simulation → host)
///
/// Host layer спавнит визуальный снаряд; симуляция владеет только
/// cooldown state.
#[derive(Event, Debug, Clone)]
pub struct WeaponFired {
    pub shooter: Entity,
}

/// Размер тела (монеты растят, враги сжимают)
#[derive(Component, Debug, Clone, Copy)]
pub struct SizeScale {
    pub scale: f32,
    /// Шаг grow/shrink
    pub step: f32,
    pub min: f32,
    pub max: f32,
}

impl Default for SizeScale {
    fn default() -> Self {
        Self {
            scale: 1.0,
            step: 0.1,
            min: 0.5,
            max: 2.0,
        }
    }
}

impl SizeScale {
    pub fn grow(&mut self) {
        self.scale = (self.scale + self.step).min(self.max);
    }

    pub fn shrink(&mut self) {
        self.scale = (self.scale - self.step).max(self.min);
    }
}

/// Цвета, в которые красят аватар цветные капсулы
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorKind {
    Red,
    Green,
    Blue,
    Yellow,
}

/// Текущий цвет аватара
#[derive(Component, Debug, Clone, Copy)]
pub struct AvatarColor {
    pub current: ColorKind,
}

impl Default for AvatarColor {
    fn default() -> Self {
        Self {
            current: ColorKind::Blue,
        }
    }
}

impl AvatarColor {
    pub fn change(&mut self, color: ColorKind) {
        self.current = color;
    }
}

/// Система: auto-fire оружия (FixedUpdate)
///
/// Пока firing — тикаем cooldown и шлём WeaponFired каждые fire_interval.
pub fn tick_weapon_fire(
    mut weapons: Query<(Entity, &mut Weapon)>,
    time: Res<Time<Fixed>>,
    mut fired: EventWriter<WeaponFired>,
) {
    let delta = time.delta_secs();

    for (entity, mut weapon) in weapons.iter_mut() {
        if !weapon.firing {
            continue;
        }

        weapon.cooldown -= delta;
        if weapon.cooldown <= 0.0 {
            weapon.cooldown = weapon.fire_interval;
            fired.write(WeaponFired { shooter: entity });
        }
    }
}

/// Plugin для capability-систем
pub struct CapabilityPlugin;

impl Plugin for CapabilityPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<WeaponFired>()
            .add_systems(FixedUpdate, tick_weapon_fire);
    }
}
