use std::{
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use crate::{config::PacingConfig, Result, SortVizError};

/// Live-adjustable speed setting. Larger is faster.
///
/// The handle is shared between the foreground, which adjusts it, and the run
/// thread, which reads it once per step.
#[derive(Debug, Clone)]
pub struct Speed {
    value: Arc<AtomicU32>,
    min: u32,
    max: u32,
}

impl Speed {
    /// Starts at the configured default, clamped into the configured range.
    pub fn new(config: &PacingConfig) -> Self {
        let initial = config.default_speed.clamp(config.speed_min, config.speed_max);
        Self {
            value: Arc::new(AtomicU32::new(initial)),
            min: config.speed_min,
            max: config.speed_max,
        }
    }

    /// Current speed.
    pub fn get(&self) -> u32 {
        self.value.load(Ordering::Relaxed)
    }

    /// Takes effect from the next step of an active run.
    pub fn set(&self, speed: u32) -> Result<()> {
        if !(self.min..=self.max).contains(&speed) {
            return Err(SortVizError::validation(format!(
                "speed {speed} outside {}..={}",
                self.min, self.max
            )));
        }
        self.value.store(speed, Ordering::Relaxed);
        Ok(())
    }

    /// Moves the speed by `delta`, stopping at the range ends. Returns the new
    /// speed.
    pub fn nudge(&self, delta: i64) -> u32 {
        let target = i64::from(self.get())
            .saturating_add(delta)
            .clamp(i64::from(self.min), i64::from(self.max));
        let speed = u32::try_from(target).unwrap_or(self.max);
        self.value.store(speed, Ordering::Relaxed);
        speed
    }

    /// Number of pacing units between two steps: `max + 1 - speed`.
    pub fn units(&self) -> u32 {
        self.max.saturating_add(1) - self.get().min(self.max)
    }
}

/// Sleeps the run thread between steps. The sole driver of animation speed.
#[derive(Debug, Clone)]
pub struct Pacer {
    speed: Speed,
    unit: Duration,
}

impl Pacer {
    pub fn new(speed: Speed, unit: Duration) -> Self {
        Self { speed, unit }
    }

    pub fn delay(&self) -> Duration {
        self.unit * self.speed.units()
    }

    pub fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_shrinks_as_speed_grows() {
        let config = PacingConfig::default();
        let speed = Speed::new(&config);
        let pacer = Pacer::new(speed.clone(), config.unit());

        assert_eq!(pacer.delay(), Duration::from_millis(401));
        speed.set(500).unwrap();
        assert_eq!(pacer.delay(), Duration::from_millis(1));
        speed.set(1).unwrap();
        assert_eq!(pacer.delay(), Duration::from_millis(500));
    }

    #[test]
    fn rejects_out_of_range_speed() {
        let speed = Speed::new(&PacingConfig::default());
        assert!(speed.set(0).unwrap_err().is_validation());
        assert!(speed.set(501).is_err());
        assert_eq!(speed.get(), 100);
    }

    #[test]
    fn nudge_clamps_to_range() {
        let speed = Speed::new(&PacingConfig::default());
        assert_eq!(speed.nudge(50), 150);
        assert_eq!(speed.nudge(-1_000), 1);
        assert_eq!(speed.nudge(i64::MAX / 2), 500);
        assert_eq!(speed.get(), 500);
    }

    #[test]
    fn units_do_not_overflow_at_the_top_of_the_range() {
        let config = PacingConfig {
            speed_min: 1,
            speed_max: u32::MAX,
            default_speed: 1,
            unit_micros: 0,
        };
        let speed = Speed::new(&config);
        assert_eq!(speed.units(), u32::MAX - 1);
        speed.set(u32::MAX).unwrap();
        assert_eq!(speed.units(), 0);
    }

    #[test]
    fn zero_unit_never_sleeps() {
        let config = PacingConfig {
            unit_micros: 0,
            ..PacingConfig::default()
        };
        let pacer = Pacer::new(Speed::new(&config), config.unit());
        assert!(pacer.delay().is_zero());
    }
}
