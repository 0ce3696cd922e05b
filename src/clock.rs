use std::{thread::sleep, time::{Duration, Instant}};

use crate::game::TickClock;

/// Paces the game loop by sleeping out whatever is left of the current tick
/// period. The first call returns immediately.
#[derive(Debug, Default)]
pub struct FrameClock {
    last_tick: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        FrameClock { last_tick: None }
    }
}

impl TickClock for FrameClock {
    fn wait_for_tick(&mut self, ticks_per_second: u32) {
        let period = Duration::from_secs_f64(1.0 / ticks_per_second.max(1) as f64);

        if let Some(last) = self.last_tick {
            let deadline = last + period;
            let now = Instant::now();
            if deadline > now {
                sleep(deadline - now);
            }
        }

        self.last_tick = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_tick_waits_for_the_period() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.wait_for_tick(50);
        assert!(start.elapsed() < Duration::from_millis(20));

        clock.wait_for_tick(50);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn late_ticks_do_not_sleep() {
        let mut clock = FrameClock::new();
        clock.wait_for_tick(100);
        sleep(Duration::from_millis(15));

        let before = Instant::now();
        clock.wait_for_tick(100);
        assert!(before.elapsed() < Duration::from_millis(10));
    }
}
