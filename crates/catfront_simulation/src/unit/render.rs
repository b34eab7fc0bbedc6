//! Render seam: unit → draw calls.

use bevy::prelude::*;

use super::{CombatEntity, FrameHandle};

/// Anything that accepts 2D raster placement.
pub trait DrawSurface {
    fn blit(&mut self, frame: FrameHandle, center: Vec2, rotation_deg: f32);

    /// Visible area; `None` = draw everything.
    fn bounds(&self) -> Option<Rect> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlitCall {
    pub frame: FrameHandle,
    pub center: Vec2,
    pub rotation_deg: f32,
}

/// Surface that records every blit (headless runs, tests).
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub calls: Vec<BlitCall>,
    pub viewport: Option<Rect>,
}

impl RecordingSurface {
    pub fn with_viewport(viewport: Rect) -> Self {
        Self {
            calls: Vec::new(),
            viewport: Some(viewport),
        }
    }
}

impl DrawSurface for RecordingSurface {
    fn blit(&mut self, frame: FrameHandle, center: Vec2, rotation_deg: f32) {
        self.calls.push(BlitCall {
            frame,
            center,
            rotation_deg,
        });
    }

    fn bounds(&self) -> Option<Rect> {
        self.viewport
    }
}

impl CombatEntity {
    /// Blit the current frame (tilted by the knockback rotation), then particles.
    ///
    /// Does not advance animation; the tick loop owns the clock.
    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        let visible = surface
            .bounds()
            .map_or(true, |bounds| !bounds.intersect(self.get_rect()).is_empty());

        if visible {
            let frame = self.get_current_frame();
            surface.blit(frame, self.visual_center(), -self.knockback.rotation);
        }

        self.particles.draw(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::rng::ScriptedRandom;
    use crate::unit::{HitSparkFactory, ReactorContext};

    #[test]
    fn test_draw_blits_current_frame_with_negated_tilt() {
        let mut unit = scenario_unit();
        unit.knock_back(0, None);
        unit.update_animation(150);

        let mut surface = RecordingSurface::default();
        unit.draw(&mut surface);

        assert_eq!(surface.calls.len(), 1);
        let call = surface.calls[0];
        // Knockback рисуется кадрами moving
        assert!((10..=12).contains(&call.frame.0));
        assert_eq!(call.center, unit.visual_center());
        assert!((call.rotation_deg + 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_draw_culls_body_outside_viewport_but_keeps_particles() {
        let mut unit = scenario_unit();
        let factory = HitSparkFactory::default();
        let mut rng = ScriptedRandom::new();
        let mut ctx = ReactorContext {
            now: 0,
            rng: &mut rng,
            particles: &factory,
        };
        unit.take_damage(1.0, "physical", &mut ctx);
        assert_eq!(unit.particles.total(), 3);

        let mut surface = RecordingSurface::with_viewport(Rect::new(0.0, 0.0, 100.0, 100.0));
        unit.draw(&mut surface);

        assert_eq!(surface.calls.len(), 3);
        assert!(surface.calls.iter().all(|call| call.rotation_deg == 0.0));
    }

    #[test]
    fn test_draw_does_not_touch_state() {
        let mut unit = scenario_unit();
        unit.begin_attack(0);
        unit.update_animation(50);
        let state = unit.anim_state;
        let progress = unit.anim_progress;

        let mut surface = RecordingSurface::default();
        unit.draw(&mut surface);
        unit.draw(&mut surface);

        assert_eq!(unit.anim_state, state);
        assert_eq!(unit.anim_progress, progress);
        assert_eq!(surface.calls[0], surface.calls[1]);
    }
}
