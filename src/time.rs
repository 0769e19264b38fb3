use std::time::Instant;

use crate::config::TimeConfig;

/// How an outer loop schedules ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pacing {
    /// Fixed `1 / target_fps` steps, no waiting.
    #[default]
    Deterministic,
    /// Wait between ticks and measure dt on the wall clock.
    Paced,
}

/// Time source for the loop: a fixed step of `1 / target_fps` for
/// deterministic simulation, or the wall clock.
#[derive(Debug, Clone)]
pub enum Clock {
    Fixed { step: f32, elapsed: f32 },
    Wall { start: Instant, last: Instant, delta: f32 },
}

impl Clock {
    pub fn fixed(target_fps: f32) -> Self {
        Clock::Fixed {
            step: 1.0 / target_fps,
            elapsed: 0.0,
        }
    }

    pub fn wall() -> Self {
        let now = Instant::now();
        Clock::Wall {
            start: now,
            last: now,
            delta: 0.0,
        }
    }

    /// Clock matching `pacing`. Deterministic runs always step by `1 / target_fps`.
    pub fn for_pacing(pacing: Pacing, config: &TimeConfig) -> Self {
        match pacing {
            Pacing::Deterministic => Self::fixed(config.target_fps),
            Pacing::Paced => Self::wall(),
        }
    }

    pub fn from_config(config: &TimeConfig) -> Self {
        if config.use_manual_time {
            Self::fixed(config.target_fps)
        } else {
            Self::wall()
        }
    }

    /// Advance to the next tick and return its delta time in seconds.
    pub fn advance(&mut self) -> f32 {
        match self {
            Clock::Fixed { step, elapsed } => {
                *elapsed += *step;
                *step
            }
            Clock::Wall { last, delta, .. } => {
                let now = Instant::now();
                *delta = now.duration_since(*last).as_secs_f32();
                *last = now;
                *delta
            }
        }
    }

    /// Delta time of the most recent tick.
    pub fn delta_time(&self) -> f32 {
        match self {
            Clock::Fixed { step, .. } => *step,
            Clock::Wall { delta, .. } => *delta,
        }
    }

    /// Seconds since the clock started.
    pub fn time(&self) -> f32 {
        match self {
            Clock::Fixed { elapsed, .. } => *elapsed,
            Clock::Wall { start, .. } => start.elapsed().as_secs_f32(),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_steps_by_target_fps() {
        let mut clock = Clock::fixed(50.0);
        assert_eq!(clock.advance(), 0.02);
        clock.advance();
        assert!((clock.time() - 0.04).abs() < 1e-6);
        assert_eq!(clock.delta_time(), 0.02);
    }

    #[test]
    fn config_selects_clock() {
        let mut config = TimeConfig::default();
        assert!(Clock::from_config(&config).is_fixed());
        config.use_manual_time = false;
        let mut clock = Clock::from_config(&config);
        assert!(!clock.is_fixed());
        assert!(clock.advance() >= 0.0);
    }

    #[test]
    fn pacing_selects_clock() {
        let mut config = TimeConfig::default();
        config.use_manual_time = false;
        assert!(Clock::for_pacing(Pacing::Deterministic, &config).is_fixed());
        assert!(!Clock::for_pacing(Pacing::Paced, &config).is_fixed());
    }
}
