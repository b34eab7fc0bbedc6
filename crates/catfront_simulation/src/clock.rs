//! Simulation clock
//!
//! Один монотонный счётчик миллисекунд на весь мир. Сэмплируется один раз
//! в начале FixedUpdate (`advance_sim_clock`), дальше все системы читают
//! только `SimClock`, два чтения внутри тика всегда совпадают.

use bevy::prelude::*;

/// Monotonic simulation time in milliseconds.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct SimClock {
    pub now_ms: u64,
}

impl SimClock {
    pub fn new(now_ms: u64) -> Self {
        Self { now_ms }
    }

    /// Never moves backwards, even if the source clock does.
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

/// System: sample fixed-step time once per tick.
pub fn advance_sim_clock(time: Res<Time<Fixed>>, mut clock: ResMut<SimClock>) {
    let now_ms = time.elapsed().as_millis() as u64;
    clock.advance_to(now_ms);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let mut clock = SimClock::new(100);
        clock.advance_to(250);
        assert_eq!(clock.now_ms, 250);

        clock.advance_to(200); // назад не ходим
        assert_eq!(clock.now_ms, 250);
    }
}
