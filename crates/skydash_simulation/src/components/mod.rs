//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - avatar: сам аватар (marker, кинематика, видимость)
//! - capabilities: способности аватара (ForceField, Weapon, SizeScale, AvatarColor)
//! - contact: контактируемые объекты мира (категории, монеты, капсулы, ракеты, платформы)

pub mod avatar;
pub mod capabilities;
pub mod contact;

// Re-exports для удобного импорта
pub use avatar::*;
pub use capabilities::*;
pub use contact::*;
