//! Hit particles.
//!
//! Каждый unit владеет своими очередями частиц, по одной на категорию
//! урона. Никакого общего mutable списка между unit'ами.

use std::collections::BTreeMap;
use std::fmt::Debug;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::{DrawSurface, FrameHandle};

/// Damage category → particle visual.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect, Serialize, Deserialize,
)]
pub enum DamageCategory {
    /// Gunfire (smoke puffs)
    Kinetic,
    /// Melee impacts
    Physical,
    /// Electric arcs
    Elemental,
    /// Gas clouds
    Chemical,
}

impl DamageCategory {
    /// Draw/prune order.
    pub const ALL: [DamageCategory; 4] = [
        DamageCategory::Kinetic,
        DamageCategory::Physical,
        DamageCategory::Elemental,
        DamageCategory::Chemical,
    ];

    /// Accepts category names and the legacy attack-type names.
    /// Unknown types return `None` (no particles, not an error).
    pub fn parse(damage_type: &str) -> Option<Self> {
        match damage_type.trim().to_ascii_lowercase().as_str() {
            "kinetic" | "gun" => Some(DamageCategory::Kinetic),
            "physical" | "physic" => Some(DamageCategory::Physical),
            "elemental" | "electric" => Some(DamageCategory::Elemental),
            "chemical" | "gas" => Some(DamageCategory::Chemical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DamageCategory::Kinetic => "kinetic",
            DamageCategory::Physical => "physical",
            DamageCategory::Elemental => "elemental",
            DamageCategory::Chemical => "chemical",
        }
    }
}

/// A transient visual owned by a unit.
pub trait ParticleEffect: Send + Sync + Debug {
    /// Advance one tick. `false` = expired, drop it.
    fn update(&mut self) -> bool;

    fn draw(&self, surface: &mut dyn DrawSurface);
}

/// Builds the particle for a category at a world point.
pub trait ParticleFactory: Send + Sync {
    fn spawn(&self, category: DamageCategory, x: f32, y: f32) -> Box<dyn ParticleEffect>;
}

/// Fixed set of per-category particle queues.
#[derive(Debug, Default)]
pub struct ParticleQueues {
    kinetic: Vec<Box<dyn ParticleEffect>>,
    physical: Vec<Box<dyn ParticleEffect>>,
    elemental: Vec<Box<dyn ParticleEffect>>,
    chemical: Vec<Box<dyn ParticleEffect>>,
}

impl ParticleQueues {
    pub fn queue(&self, category: DamageCategory) -> &[Box<dyn ParticleEffect>] {
        match category {
            DamageCategory::Kinetic => &self.kinetic,
            DamageCategory::Physical => &self.physical,
            DamageCategory::Elemental => &self.elemental,
            DamageCategory::Chemical => &self.chemical,
        }
    }

    fn queue_mut(&mut self, category: DamageCategory) -> &mut Vec<Box<dyn ParticleEffect>> {
        match category {
            DamageCategory::Kinetic => &mut self.kinetic,
            DamageCategory::Physical => &mut self.physical,
            DamageCategory::Elemental => &mut self.elemental,
            DamageCategory::Chemical => &mut self.chemical,
        }
    }

    pub fn push(&mut self, category: DamageCategory, effect: Box<dyn ParticleEffect>) {
        self.queue_mut(category).push(effect);
    }

    /// Tick every particle once, dropping the expired ones. Queues are independent.
    pub fn prune(&mut self) {
        for category in DamageCategory::ALL {
            self.queue_mut(category).retain_mut(|effect| effect.update());
        }
    }

    pub fn len(&self, category: DamageCategory) -> usize {
        self.queue(category).len()
    }

    pub fn total(&self) -> usize {
        DamageCategory::ALL.iter().map(|c| self.len(*c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        for category in DamageCategory::ALL {
            for effect in self.queue(category) {
                effect.draw(surface);
            }
        }
    }
}

/// Built-in particle: drifts up for a fixed number of ticks.
#[derive(Debug, Clone)]
pub struct HitSpark {
    pub category: DamageCategory,
    pub position: Vec2,
    pub frame: FrameHandle,
    pub ticks_left: u32,
}

impl HitSpark {
    const DRIFT_PER_TICK: f32 = 0.5;
}

impl ParticleEffect for HitSpark {
    fn update(&mut self) -> bool {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        self.position.y -= Self::DRIFT_PER_TICK;
        self.ticks_left > 0
    }

    fn draw(&self, surface: &mut dyn DrawSurface) {
        surface.blit(self.frame, self.position, 0.0);
    }
}

#[derive(Debug, Clone)]
pub struct HitSparkFactory {
    pub lifetime_ticks: u32,
    pub frames: BTreeMap<DamageCategory, FrameHandle>,
    pub fallback: FrameHandle,
}

impl Default for HitSparkFactory {
    fn default() -> Self {
        // Handles 1000+ зарезервированы под частицы
        let frames = DamageCategory::ALL
            .into_iter()
            .enumerate()
            .map(|(i, category)| (category, FrameHandle(1000 + i as u32)))
            .collect();

        Self {
            lifetime_ticks: 12,
            frames,
            fallback: FrameHandle(0),
        }
    }
}

impl ParticleFactory for HitSparkFactory {
    fn spawn(&self, category: DamageCategory, x: f32, y: f32) -> Box<dyn ParticleEffect> {
        Box::new(HitSpark {
            category,
            position: Vec2::new(x, y),
            frame: self.frames.get(&category).copied().unwrap_or(self.fallback),
            ticks_left: self.lifetime_ticks,
        })
    }
}
