//! Combat unit domain
//!
//! CombatEntity + три под-поведения на общем состоянии:
//! - animation: idle/moving/windup/attacking/recovery/knockback от абсолютного времени
//! - knockback: линейное смещение по x, наклон, возврат на baseline
//! - reactor: урон, частицы по категориям, статус-эффекты с иммунитетами
//!
//! Ничего здесь не читает часы и не трогает глобальный RNG: `now` и
//! `RandomSource` приходят снаружи (см. `combat` systems).

pub mod animation;
pub mod entity;
pub mod knockback;
pub mod particles;
pub mod reactor;
pub mod render;

#[cfg(test)]
mod test_support;

pub use animation::*;
pub use entity::*;
pub use knockback::*;
pub use particles::*;
pub use reactor::*;
pub use render::*;
