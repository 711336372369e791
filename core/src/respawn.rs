/// Deferred ball spawns, counted down in simulation time.
///
/// Each release schedules its own spawn. Timers only advance through
/// [`tick`](RespawnScheduler::tick), so nothing can fire once the owning game
/// stops ticking; [`cancel_all`](RespawnScheduler::cancel_all) also closes the
/// scheduler so a late `schedule` after teardown is ignored.
#[derive(Debug, Clone, Default)]
pub struct RespawnScheduler {
    seconds_left: Vec<f64>,
    closed: bool,
}

impl RespawnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay: f64) {
        if self.closed {
            return;
        }
        self.seconds_left.push(delay.max(0.0));
    }

    /// Advance all timers by `dt`. Returns how many came due.
    pub fn tick(&mut self, dt: f64) -> usize {
        if self.closed {
            return 0;
        }
        for t in &mut self.seconds_left {
            *t -= dt;
        }
        let before = self.seconds_left.len();
        // half-step tolerance so 3.0s at 1/60 fires on step 180, not 181
        let epsilon = dt * 0.5;
        self.seconds_left.retain(|t| *t > epsilon);
        before - self.seconds_left.len()
    }

    pub fn pending_count(&self) -> usize {
        self.seconds_left.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Drop all pending timers and refuse new ones. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.seconds_left.len();
        self.seconds_left.clear();
        self.closed = true;
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn fires_after_delay() {
        let mut respawn = RespawnScheduler::new();
        respawn.schedule(3.0);

        let mut fired_at = None;
        for step in 1..=200 {
            if respawn.tick(DT) > 0 {
                fired_at = Some(step);
                break;
            }
        }
        assert_eq!(fired_at, Some(180));
        assert_eq!(respawn.pending_count(), 0);
    }

    #[test]
    fn does_not_fire_early() {
        let mut respawn = RespawnScheduler::new();
        respawn.schedule(1.0);
        for _ in 0..59 {
            assert_eq!(respawn.tick(DT), 0);
        }
        assert_eq!(respawn.tick(DT), 1);
    }

    #[test]
    fn independent_timers_fire_separately() {
        let mut respawn = RespawnScheduler::new();
        respawn.schedule(0.5);
        respawn.schedule(1.0);
        let mut fired = 0;
        for _ in 0..31 {
            fired += respawn.tick(DT);
        }
        assert_eq!(fired, 1);
        assert_eq!(respawn.pending_count(), 1);
    }

    #[test]
    fn cancel_drops_pending_and_blocks_new_timers() {
        let mut respawn = RespawnScheduler::new();
        respawn.schedule(0.1);
        respawn.schedule(0.2);
        assert_eq!(respawn.cancel_all(), 2);
        assert!(respawn.is_closed());

        respawn.schedule(0.1);
        assert_eq!(respawn.pending_count(), 0);
        for _ in 0..60 {
            assert_eq!(respawn.tick(DT), 0);
        }
    }

    #[test]
    fn zero_delay_fires_on_next_tick() {
        let mut respawn = RespawnScheduler::new();
        respawn.schedule(0.0);
        assert_eq!(respawn.tick(DT), 1);
    }
}
